use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use crate::{
    types::PipelineError,
    utils::{jitter, temp_download_path},
};

const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// A downloaded copy of a remote object. The local file is deleted when the
/// handle is dropped, whether or not processing of its contents succeeded, so
/// a long batch never accumulates stale downloads.
#[derive(Debug)]
pub struct LocalCopy {
    path: PathBuf,
}

impl LocalCopy {
    pub fn new(path: PathBuf) -> LocalCopy {
        LocalCopy { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LocalCopy {
    fn drop(&mut self) {
        info!("removing {}", self.path.display());
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("could not remove {}: {}", self.path.display(), e);
        }
    }
}

pub struct Fetcher {
    client: reqwest::blocking::Client,
    retries: u8,
}

impl Fetcher {
    pub fn new(retries: u8) -> anyhow::Result<Fetcher> {
        // wat files run to hundreds of megabytes, so the whole-request
        // timeout has to go
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()?;

        Ok(Fetcher { client, retries })
    }

    /// Downloads `url` in full to a transient local file. With `retries` at
    /// zero a single failed attempt is final; otherwise each failure is
    /// logged and retried after a jittered delay.
    pub fn fetch(&self, url: &str) -> Result<LocalCopy, PipelineError> {
        let mut attempt = 0u8;
        loop {
            match self.fetch_once(url) {
                Ok(local) => return Ok(local),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        "transfer of {} failed, retry {}/{}: {}",
                        url, attempt, self.retries, e
                    );
                    thread::sleep(jitter(RETRY_BASE_DELAY));
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn fetch_once(&self, url: &str) -> Result<LocalCopy, PipelineError> {
        let mut resp = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| PipelineError::Transfer(format!("could not fetch {}: {}", url, e)))?;

        let path = temp_download_path();
        let mut file = File::create(&path).map_err(|e| {
            PipelineError::Transfer(format!(
                "could not create local copy {}: {}",
                path.display(),
                e
            ))
        })?;

        // the guard now owns the path, so an interrupted body stream still
        // cleans up the partial file
        let local = LocalCopy::new(path);
        io::copy(&mut resp, &mut file).map_err(|e| {
            PipelineError::Transfer(format!("transfer of {} interrupted: {}", url, e))
        })?;

        info!("downloaded {} to {}", url, local.path().display());
        Ok(local)
    }
}
