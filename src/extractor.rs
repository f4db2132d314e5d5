use crate::{registry::HostRegistry, types::OutputRow, utils::host_of, wat::WatDocument};

/// Filters one page's discovered links down to the ones pointing at a known
/// web-archive service, one output row per match.
///
/// `link_count` is the number of url-bearing links in the whole document and
/// is attached identically to every row the document produces; a page with
/// forty outbound links and one archive link yields one row with a count of
/// forty.
pub fn extract_archive_links(doc: &WatDocument, registry: &HostRegistry) -> Vec<OutputRow> {
    let source_url = doc.target_uri();
    let source_host = source_url.and_then(host_of);
    let links = doc.links();

    let link_count = links
        .iter()
        .filter(|link| link.url.as_deref().map_or(false, |url| !url.is_empty()))
        .count();

    let mut rows = Vec::new();
    for link in links {
        let url = match link.url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => continue,
        };

        // only keep links to a known web archive
        let service = match host_of(url).and_then(|host| registry.lookup(&host)) {
            Some(service) => service.to_string(),
            None => continue,
        };

        rows.push(OutputRow {
            source_url: source_url.map(|u| u.to_string()),
            source_host: source_host.clone(),
            archive_url: url.to_string(),
            archive_service: service,
            link_text: link.text.clone(),
            path: link.path.clone(),
            link_count,
            warc: doc.warc_filename().map(|f| f.to_string()),
            offset: doc.offset(),
            inflated_length: doc.inflated_length(),
            deflated_length: doc.deflated_length(),
        });
    }

    rows
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> WatDocument {
        serde_json::from_value(value).unwrap()
    }

    fn page(links: serde_json::Value) -> WatDocument {
        doc(json!({
            "Envelope": {
                "WARC-Header-Metadata": { "WARC-Target-URI": "http://example.com/a" },
                "Payload-Metadata": {
                    "HTTP-Response-Metadata": { "HTML-Metadata": { "Links": links } }
                }
            },
            "Container": {
                "Filename": "CC-MAIN-20181020-00000.warc.gz",
                "Offset": "904",
                "Gzip-Metadata": { "Inflated-Length": "766", "Deflated-Length": "518" }
            }
        }))
    }

    #[test]
    fn keeps_only_links_to_known_archives() {
        let doc = page(json!([
            { "url": "https://web.archive.org/x" },
            { "url": "https://example.org/y" }
        ]));

        let rows = extract_archive_links(&doc, &HostRegistry::builtin());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].archive_url, "https://web.archive.org/x");
        assert_eq!(rows[0].archive_service, "InternetArchive");
        assert_eq!(rows[0].link_count, 2);
        assert_eq!(rows[0].source_url.as_deref(), Some("http://example.com/a"));
        assert_eq!(rows[0].source_host.as_deref(), Some("example.com"));
    }

    #[test]
    fn link_count_covers_the_whole_document() {
        let doc = page(json!([
            { "url": "https://web.archive.org/x" },
            { "url": "https://perma.cc/y" },
            { "url": "https://example.org/z" },
            { "text": "counted nowhere" },
            { "url": "" }
        ]));

        let rows = extract_archive_links(&doc, &HostRegistry::builtin());

        // two matches, but the count covers all three url-bearing links
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.link_count == 3));
    }

    #[test]
    fn rows_of_one_document_share_source_and_provenance() {
        let doc = page(json!([
            { "url": "https://web.archive.org/x", "text": "first" },
            { "url": "https://archive.is/y", "text": "second", "path": "A@/href" }
        ]));

        let rows = extract_archive_links(&doc, &HostRegistry::builtin());

        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.source_url.as_deref(), Some("http://example.com/a"));
            assert_eq!(row.source_host.as_deref(), Some("example.com"));
            assert_eq!(row.link_count, 2);
            assert_eq!(row.warc.as_deref(), Some("CC-MAIN-20181020-00000.warc.gz"));
            assert_eq!(row.offset.as_deref(), Some("904"));
            assert_eq!(row.inflated_length.as_deref(), Some("766"));
            assert_eq!(row.deflated_length.as_deref(), Some("518"));
        }
        assert_eq!(rows[0].link_text.as_deref(), Some("first"));
        assert_eq!(rows[1].link_text.as_deref(), Some("second"));
        assert_eq!(rows[1].path.as_deref(), Some("A@/href"));
        assert_eq!(rows[1].archive_service, "ArchiveToday");
    }

    #[test]
    fn no_matches_yields_no_rows() {
        let doc = page(json!([
            { "url": "https://example.org/y" },
            { "url": "/relative" }
        ]));

        assert!(extract_archive_links(&doc, &HostRegistry::builtin()).is_empty());
    }

    #[test]
    fn a_missing_link_list_is_empty() {
        let doc = doc(json!({
            "Envelope": {
                "WARC-Header-Metadata": { "WARC-Target-URI": "http://example.com/a" }
            }
        }));

        assert!(extract_archive_links(&doc, &HostRegistry::builtin()).is_empty());
    }

    #[test]
    fn an_unparsable_source_url_leaves_the_host_empty() {
        let doc = doc(json!({
            "Envelope": {
                "WARC-Header-Metadata": { "WARC-Target-URI": "no scheme at all" },
                "Payload-Metadata": {
                    "HTTP-Response-Metadata": {
                        "HTML-Metadata": {
                            "Links": [ { "url": "https://web.archive.org/x" } ]
                        }
                    }
                }
            }
        }));

        let rows = extract_archive_links(&doc, &HostRegistry::builtin());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].source_url.as_deref(), Some("no scheme at all"));
        assert_eq!(rows[0].source_host, None);
    }

    #[test]
    fn missing_provenance_passes_through_as_absent() {
        let doc = doc(json!({
            "Envelope": {
                "Payload-Metadata": {
                    "HTTP-Response-Metadata": {
                        "HTML-Metadata": {
                            "Links": [ { "url": "https://perma.cc/x" } ]
                        }
                    }
                }
            }
        }));

        let rows = extract_archive_links(&doc, &HostRegistry::builtin());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].source_url, None);
        assert_eq!(rows[0].source_host, None);
        assert_eq!(rows[0].warc, None);
        assert_eq!(rows[0].offset, None);
        assert_eq!(rows[0].inflated_length, None);
        assert_eq!(rows[0].deflated_length, None);
        assert_eq!(rows[0].link_count, 1);
    }

    #[test]
    fn registry_injection_changes_what_matches() {
        let doc = page(json!([ { "url": "https://archive.example/x" } ]));

        assert!(extract_archive_links(&doc, &HostRegistry::builtin()).is_empty());

        let custom = HostRegistry::from_pairs([("archive.example", "Example")]);
        let rows = extract_archive_links(&doc, &custom);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].archive_service, "Example");
    }
}
