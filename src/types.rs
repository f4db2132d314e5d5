use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("transfer_error: {0}")]
    Transfer(String),
    #[error("parse_error: {0}")]
    Parse(String),
}

/// One link to a known web-archive service, in the exact column order of the
/// output file. The provenance fields locate the container record the link
/// was found in, so the raw archived content can be re-fetched later.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub source_url: Option<String>,
    pub source_host: Option<String>,
    pub archive_url: String,
    pub archive_service: String,
    pub link_text: Option<String>,
    pub path: Option<String>,
    // url-bearing links in the whole source document, not matched rows
    pub link_count: usize,
    pub warc: Option<String>,
    pub offset: Option<String>,
    pub inflated_length: Option<String>,
    pub deflated_length: Option<String>,
}

impl OutputRow {
    pub const COLUMNS: [&'static str; 11] = [
        "source_url",
        "source_host",
        "archive_url",
        "archive_service",
        "link_text",
        "path",
        "link_count",
        "warc",
        "offset",
        "inflated_length",
        "deflated_length",
    ];
}
