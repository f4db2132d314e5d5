use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
};

use flate2::read::MultiGzDecoder;

use crate::{
    fetcher::{Fetcher, LocalCopy},
    types::PipelineError,
};

/// Fetches the manifest of a snapshot and returns the lazy sequence of
/// absolute WAT file urls listed in it. A failed manifest fetch propagates
/// here and aborts the run.
pub fn wat_paths(
    fetcher: &Fetcher,
    storage_base: &str,
    snapshot_id: &str,
) -> anyhow::Result<ManifestPaths> {
    let manifest_url = format!("{}crawl-data/{}/wat.paths.gz", storage_base, snapshot_id);
    info!("fetching manifest {}", manifest_url);
    let local = fetcher.fetch(&manifest_url)?;
    ManifestPaths::from_local(local, storage_base)
}

/// Line-oriented walk over a downloaded manifest. Decompresses as it goes,
/// trims each line, skips empty ones, and prefixes the storage base to turn
/// relative paths into urls. Single pass; the local manifest copy is removed
/// once, when the sequence is dropped, not per line.
pub struct ManifestPaths {
    lines: Lines<BufReader<MultiGzDecoder<File>>>,
    storage_base: String,
    _local: LocalCopy,
}

impl ManifestPaths {
    pub fn from_local(local: LocalCopy, storage_base: &str) -> anyhow::Result<ManifestPaths> {
        let file = File::open(local.path()).map_err(|e| {
            PipelineError::Parse(format!(
                "could not open manifest copy {}: {}",
                local.path().display(),
                e
            ))
        })?;

        Ok(ManifestPaths {
            lines: BufReader::new(MultiGzDecoder::new(file)).lines(),
            storage_base: storage_base.to_string(),
            _local: local,
        })
    }
}

impl Iterator for ManifestPaths {
    type Item = anyhow::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Some(Ok(format!("{}{}", self.storage_base, line)));
                }
                Err(e) => {
                    return Some(Err(PipelineError::Parse(format!(
                        "could not read manifest line: {}",
                        e
                    ))
                    .into()))
                }
            }
        }
    }
}
