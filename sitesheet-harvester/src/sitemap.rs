//! Classification of fetched sitemap documents.
//!
//! A sitemap document either indexes other sitemaps (`<sitemap><loc>`
//! entries), lists content pages (`<url><loc>` entries), or is neither and
//! contributes nothing.

use crate::error::{HarvestError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// File suffix a sitemap URL is expected to carry.
pub const SITEMAP_SUFFIX: &str = ".xml";

/// Placeholder for a `<sitemap>` entry whose `<loc>` has no text.
pub const NO_SITEMAP: &str = "No Sitemap";

/// Placeholder for a `<url>` entry whose `<loc>` has no text.
pub const NO_URL: &str = "No URL";

/// What a sitemap document turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDoc {
    /// A sitemap index; holds the child sitemap locations.
    Index(Vec<String>),
    /// A leaf sitemap; holds the page locations.
    Leaf(Vec<String>),
    /// Well-formed XML with neither `<sitemap>` nor `<url>` entries.
    Invalid,
}

enum Entry {
    Sitemap,
    Url,
}

/// Parse a sitemap document and classify it.
///
/// Entries are matched on local names, so namespace prefixes are tolerated.
/// Only a `<loc>` that is a direct child of the entry, in the entry's own
/// namespace, counts as the entry's location; extension elements such as
/// `<image:loc>` inside a `<url>` are ignored. A `<loc>` with no text content
/// is replaced by a sentinel rather than dropped, preserving entry counts.
/// Malformed XML is an error.
pub fn classify(xml: &str) -> Result<SitemapDoc> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut children: Vec<String> = Vec::new();
    let mut pages: Vec<String> = Vec::new();
    let mut entry: Option<Entry> = None;
    let mut entry_prefix: Option<Vec<u8>> = None;
    // Open elements below the current entry; its direct children sit at 0.
    let mut depth = 0usize;
    let mut in_loc = false;
    let mut loc_text: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if entry.is_none() {
                    let kind = match e.local_name().as_ref() {
                        b"sitemap" => Some(Entry::Sitemap),
                        b"url" => Some(Entry::Url),
                        _ => None,
                    };
                    if kind.is_some() {
                        entry = kind;
                        entry_prefix = e.name().prefix().map(|p| p.as_ref().to_vec());
                        depth = 0;
                        in_loc = false;
                        loc_text = None;
                    }
                } else {
                    if depth == 0
                        && e.local_name().as_ref() == b"loc"
                        && e.name().prefix().map(|p| p.as_ref().to_vec()) == entry_prefix
                    {
                        in_loc = true;
                    }
                    depth += 1;
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_loc {
                    let text = e.unescape().unwrap_or_default().trim().to_string();
                    if !text.is_empty() {
                        loc_text = Some(text);
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                if in_loc {
                    let text = String::from_utf8_lossy(e).trim().to_string();
                    if !text.is_empty() {
                        loc_text = Some(text);
                    }
                }
            }
            Ok(Event::End(_)) => {
                if entry.is_some() {
                    if depth == 0 {
                        match entry.take() {
                            Some(Entry::Sitemap) => children
                                .push(loc_text.take().unwrap_or_else(|| NO_SITEMAP.to_string())),
                            Some(Entry::Url) => {
                                pages.push(loc_text.take().unwrap_or_else(|| NO_URL.to_string()))
                            }
                            None => {}
                        }
                    } else {
                        depth -= 1;
                        if depth == 0 {
                            in_loc = false;
                        }
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                if entry.is_none() {
                    match e.local_name().as_ref() {
                        // Self-closing entries still count, with sentinel locations.
                        b"sitemap" => children.push(NO_SITEMAP.to_string()),
                        b"url" => pages.push(NO_URL.to_string()),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(HarvestError::InvalidXml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if !children.is_empty() {
        Ok(SitemapDoc::Index(children))
    } else if !pages.is_empty() {
        Ok(SitemapDoc::Leaf(pages))
    } else {
        Ok(SitemapDoc::Invalid)
    }
}

/// Whether a URL carries the recognized sitemap suffix.
pub fn has_sitemap_suffix(url: &str) -> bool {
    url.ends_with(SITEMAP_SUFFIX)
}
