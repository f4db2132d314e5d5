use std::collections::HashMap;

use crate::utils::host_of;

// These are the web archive host names that we will look for
lazy_static! {
    static ref ARCHIVE_HOSTS: HashMap<&'static str, &'static str> = HashMap::from([
        ("web.archive.org", "InternetArchive"),
        ("wayback.archive.org", "InternetArchive"),
        ("archive.is", "ArchiveToday"),
        ("archive.vn", "ArchiveToday"),
        ("archive.today", "ArchiveToday"),
        ("www.webcitation.org", "Webcitation"),
        ("webcitation.org", "Webcitation"),
        ("perma.cc", "PermaCC"),
        ("webrecorder.io", "Webrecorder"),
        ("conifer.rhizome.org", "Webrecorder"),
        ("webcache.googleusercontent.com", "Google"),
    ]);
}

/// Mapping from hostname to archive-service label. Lookups are pure; several
/// hostnames may carry the same label.
#[derive(Debug, Clone)]
pub struct HostRegistry {
    hosts: HashMap<String, String>,
}

impl HostRegistry {
    pub fn builtin() -> HostRegistry {
        HostRegistry {
            hosts: ARCHIVE_HOSTS
                .iter()
                .map(|(host, service)| (host.to_string(), service.to_string()))
                .collect(),
        }
    }

    pub fn from_pairs<I, S>(pairs: I) -> HostRegistry
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        HostRegistry {
            hosts: pairs
                .into_iter()
                .map(|(host, service)| (host.into(), service.into()))
                .collect(),
        }
    }

    pub fn lookup(&self, host: &str) -> Option<&str> {
        self.hosts.get(host).map(|service| service.as_str())
    }

    pub fn service_for_url(&self, url: &str) -> Option<&str> {
        let host = host_of(url)?;
        self.lookup(&host)
    }
}
