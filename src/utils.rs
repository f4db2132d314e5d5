use rand::{distributions::Alphanumeric, thread_rng, Rng};
use std::{env, path::PathBuf, time::Duration};
use url::Url;

pub const STORAGE_BASE_URL: &str = "https://commoncrawl.s3.amazonaws.com/";
pub const LOG_FILE: &str = "watlinks.log";
pub const WAT_RECORD_CONTENT_TYPE: &str = "application/json";

/// Host of a url, or None when the url has no host or cannot be parsed at
/// all. A parse failure is logged and recovered, never raised.
pub fn host_of(url: &str) -> Option<String> {
    match Url::parse(url) {
        Ok(u) => u.host_str().map(|h| h.to_string()),
        Err(e) => {
            error!("unable to parse url {}: {}", url, e);
            None
        }
    }
}

pub fn jitter(duration: Duration) -> Duration {
    let mut rng = thread_rng();
    let rndm = rng.gen_range(1.0..10.0);
    duration.mul_f64(rndm)
}

pub fn get_random_string(len: i32) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len as usize)
        .map(char::from)
        .collect()
}

pub fn temp_download_path() -> PathBuf {
    env::temp_dir().join(format!("watlinks-{}", get_random_string(11)))
}
