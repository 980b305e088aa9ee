use crate::error::{HarvestError, Result};
use crate::record::{HEADING_LEVELS, PageRecord, SitemapResult};
use crate::resolver::build_client;
use crate::sitemap::{self, SitemapDoc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// Placeholder for a page without a `<title>` element.
pub const NO_TITLE: &str = "No title";

/// Placeholder for a page without a description meta tag.
pub const NO_DESCRIPTION: &str = "No description";

/// Placeholder for a page without a keywords meta tag.
pub const NO_KEYWORDS: &str = "No keywords";

/// Harvests page metadata from one leaf sitemap at a time.
///
/// All pages of a leaf are fetched through a bounded worker pool; each
/// worker assembles its page's record locally and hands it back whole, so
/// concurrent completions can never interleave fields across pages.
pub struct PageHarvester {
    client: Client,
    concurrency: usize,
}

impl PageHarvester {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self::with_client(build_client(timeout_secs))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            concurrency: 8,
        }
    }

    /// Cap on simultaneous page fetches per leaf sitemap.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Fetch a leaf sitemap and harvest every page it references.
    ///
    /// Pages that fail to fetch or return a non-2xx status are omitted from
    /// the result; they never become blank rows and never abort the rest of
    /// the leaf. The surviving records are returned in the leaf's `<loc>`
    /// order, reconstructed after the concurrent join.
    pub async fn harvest(&self, sitemap_url: &str) -> Result<SitemapResult> {
        let response = self.client.get(sitemap_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: sitemap_url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;

        let pages = match sitemap::classify(&body)? {
            SitemapDoc::Leaf(pages) => pages,
            other => {
                warn!("{} is not a leaf sitemap ({:?}), nothing to harvest", sitemap_url, other);
                return Ok(Vec::new());
            }
        };
        debug!("Harvesting {} page(s) from {}", pages.len(), sitemap_url);

        let fetches = pages.into_iter().enumerate().map(|(position, page_url)| {
            let client = self.client.clone();
            async move {
                match fetch_page(&client, &page_url).await {
                    Ok(record) => Some((position, record)),
                    Err(e) => {
                        warn!("Skipping page {}: {}", page_url, e);
                        None
                    }
                }
            }
        });

        let mut indexed: Vec<(usize, PageRecord)> = stream::iter(fetches)
            .buffer_unordered(self.concurrency)
            .filter_map(|outcome| async move { outcome })
            .collect()
            .await;

        indexed.sort_by_key(|(position, _)| *position);
        Ok(indexed.into_iter().map(|(_, record)| record).collect())
    }
}

impl Default for PageHarvester {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_page(client: &Client, url: &str) -> Result<PageRecord> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.text().await?;
    Ok(extract_record(url, &body))
}

/// Extract all ten metadata fields from one page's HTML.
fn extract_record(url: &str, html: &str) -> PageRecord {
    let document = Html::parse_document(html);
    let mut record = PageRecord::new(url.to_string());

    let title_selector = Selector::parse("title").unwrap();
    record.title = document
        .select(&title_selector)
        .next()
        .map(element_text)
        .unwrap_or_else(|| NO_TITLE.to_string());

    record.description = meta_content(&document, "description")
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());
    record.keywords = meta_content(&document, "keywords")
        .unwrap_or_else(|| NO_KEYWORDS.to_string());

    for level in 0..HEADING_LEVELS {
        let selector = Selector::parse(&format!("h{}", level + 1)).unwrap();
        record.headings[level] = document.select(&selector).map(element_text).collect();
    }

    record
}

fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{}"]"#, name)).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.to_string())
}

fn element_text(element: scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
