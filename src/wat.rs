use std::fmt;

use serde::Deserialize;

/// Decoded form of one WAT metadata payload.
///
/// The schema only names the paths the pipeline reads; everything else in the
/// document is ignored. Every level defaults when absent, so a sparse
/// document reads as "field missing" through the accessors, never as a
/// decode error.
#[derive(Debug, Default, Deserialize)]
pub struct WatDocument {
    #[serde(rename = "Envelope", default)]
    envelope: Envelope,
    #[serde(rename = "Container", default)]
    container: Container,
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(rename = "WARC-Header-Metadata", default)]
    warc_headers: WarcHeaderMetadata,
    #[serde(rename = "Payload-Metadata", default)]
    payload: PayloadMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct WarcHeaderMetadata {
    #[serde(rename = "WARC-Target-URI")]
    target_uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PayloadMetadata {
    #[serde(rename = "HTTP-Response-Metadata", default)]
    http_response: HttpResponseMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct HttpResponseMetadata {
    #[serde(rename = "HTML-Metadata", default)]
    html: HtmlMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct HtmlMetadata {
    #[serde(rename = "Links", default)]
    links: Vec<Link>,
}

/// One outbound link discovered in the crawled page.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Link {
    pub url: Option<String>,
    pub text: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Container {
    #[serde(rename = "Filename")]
    filename: Option<String>,
    #[serde(rename = "Offset")]
    offset: Option<Scalar>,
    #[serde(rename = "Gzip-Metadata", default)]
    gzip: GzipMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct GzipMetadata {
    #[serde(rename = "Inflated-Length")]
    inflated_length: Option<Scalar>,
    #[serde(rename = "Deflated-Length")]
    deflated_length: Option<Scalar>,
}

/// Container byte counts appear as strings in some WAT generations and as
/// bare numbers in others.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(u64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", n),
        }
    }
}

impl WatDocument {
    pub fn target_uri(&self) -> Option<&str> {
        self.envelope.warc_headers.target_uri.as_deref()
    }

    pub fn links(&self) -> &[Link] {
        &self.envelope.payload.http_response.html.links
    }

    pub fn warc_filename(&self) -> Option<&str> {
        self.container.filename.as_deref()
    }

    pub fn offset(&self) -> Option<String> {
        self.container.offset.as_ref().map(|s| s.to_string())
    }

    pub fn inflated_length(&self) -> Option<String> {
        self.container
            .gzip
            .inflated_length
            .as_ref()
            .map(|s| s.to_string())
    }

    pub fn deflated_length(&self) -> Option<String> {
        self.container
            .gzip
            .deflated_length
            .as_ref()
            .map(|s| s.to_string())
    }
}
