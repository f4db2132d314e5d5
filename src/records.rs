use std::{path::Path, time::Instant};

use warc::{WarcHeader, WarcReader};

use crate::{
    extractor::extract_archive_links,
    fetcher::Fetcher,
    registry::HostRegistry,
    types::{OutputRow, PipelineError},
    utils::WAT_RECORD_CONTENT_TYPE,
    wat::WatDocument,
};

/// Processes one WAT file end to end: fetch, walk its archive records, hand
/// every matched archive link to `emit` in record order, then drop the local
/// copy. The copy is released on the failure paths too, before the error
/// reaches the caller.
pub fn process_wat<F>(
    fetcher: &Fetcher,
    registry: &HostRegistry,
    wat_url: &str,
    emit: F,
) -> anyhow::Result<()>
where
    F: FnMut(OutputRow) -> anyhow::Result<()>,
{
    let start = Instant::now();
    let local = fetcher.fetch(wat_url)?;
    scan_wat_file(local.path(), registry, emit)?;
    drop(local);
    info!(
        "finished {}: {:.3} seconds",
        wat_url,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Walks the archive records of a downloaded WAT file. Only records tagged
/// `application/json` carry the page metadata of interest; everything else
/// in the stream (request/response envelopes, warcinfo) is skipped silently.
pub fn scan_wat_file<F>(path: &Path, registry: &HostRegistry, mut emit: F) -> anyhow::Result<()>
where
    F: FnMut(OutputRow) -> anyhow::Result<()>,
{
    let mut reader = WarcReader::from_path_gzip(path).map_err(|e| {
        PipelineError::Parse(format!(
            "could not open archive records in {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut records = reader.stream_records();
    while let Some(item) = records.next_item() {
        let record = item.map_err(|e| {
            PipelineError::Parse(format!(
                "could not read archive record from {}: {}",
                path.display(),
                e
            ))
        })?;

        let content_type = record
            .header(WarcHeader::ContentType)
            .map(|value| value.to_string())
            .unwrap_or_default();

        // buffering the body also advances the stream past skipped records
        let record = record.into_buffered().map_err(|e| {
            PipelineError::Parse(format!(
                "could not read record body from {}: {}",
                path.display(),
                e
            ))
        })?;

        if content_type != WAT_RECORD_CONTENT_TYPE {
            continue;
        }

        let doc: WatDocument = serde_json::from_slice(record.body()).map_err(|e| {
            PipelineError::Parse(format!("could not decode metadata document: {}", e))
        })?;

        for row in extract_archive_links(&doc, registry) {
            emit(row)?;
        }
    }

    Ok(())
}
