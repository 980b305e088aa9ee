use serde::{Deserialize, Serialize};

/// Number of heading levels tracked per page (h1 through h6).
pub const HEADING_LEVELS: usize = 6;

/// Metadata extracted from one successfully fetched page.
///
/// Every field is produced from the same fetch; a record is only ever built
/// whole, by the task that performed the fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    /// Ordered text contents of all h1..h6 elements, one list per level.
    pub headings: [Vec<String>; HEADING_LEVELS],
}

impl PageRecord {
    pub fn new(url: String) -> Self {
        Self {
            url,
            title: String::new(),
            description: String::new(),
            keywords: String::new(),
            headings: Default::default(),
        }
    }
}

/// The ordered records harvested from one leaf sitemap. Empty means the leaf
/// produced no exportable data.
pub type SitemapResult = Vec<PageRecord>;
