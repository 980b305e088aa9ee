use crate::error::{HarvestError, Result};
use crate::sitemap::{self, SitemapDoc};
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};
use url::Url;

pub(crate) fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .user_agent("Sitesheet/0.1 (https://github.com/trapdoorsec/sitesheet)")
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .connect_timeout(std::time::Duration::from_secs(timeout_secs.div_ceil(2)))
        .pool_max_idle_per_host(50)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .expect("Failed to create HTTP client")
}

/// Walks a sitemap hierarchy down to its leaf sitemaps.
///
/// Only the root node is fallible: a root with the wrong suffix, an
/// unreachable host, a non-2xx status, or unparseable XML is surfaced to the
/// caller. Failures below the root degrade to an empty contribution from
/// that branch.
pub struct SitemapResolver {
    client: Client,
}

impl SitemapResolver {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self::with_client(build_client(timeout_secs))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Resolve a root sitemap URL to the set of leaf sitemap URLs reachable
    /// through `<sitemap><loc>` edges.
    ///
    /// The traversal carries a visited set, so self-referential and cyclic
    /// indexes terminate. The returned list is de-duplicated and preserves
    /// discovery order.
    pub async fn resolve(&self, root_url: &str) -> Result<Vec<String>> {
        if !sitemap::has_sitemap_suffix(root_url) {
            return Err(HarvestError::InvalidUrl(format!(
                "{} does not end in {}",
                root_url,
                sitemap::SITEMAP_SUFFIX
            )));
        }
        Url::parse(root_url)
            .map_err(|e| HarvestError::InvalidUrl(format!("Invalid URL {}: {}", root_url, e)))?;

        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        let mut leaves: Vec<String> = Vec::new();

        visited.insert(root_url.to_string());
        match self.fetch_and_classify(root_url).await? {
            SitemapDoc::Leaf(_) => leaves.push(root_url.to_string()),
            SitemapDoc::Index(children) => queue.extend(children),
            SitemapDoc::Invalid => {
                return Err(HarvestError::InvalidXml(format!(
                    "{} is not a sitemap document",
                    root_url
                )));
            }
        }

        while let Some(url) = queue.pop_front() {
            if !visited.insert(url.clone()) {
                debug!("Skipping already-visited sitemap {}", url);
                continue;
            }
            if !sitemap::has_sitemap_suffix(&url) {
                warn!("Skipping sitemap entry without {} suffix: {}", sitemap::SITEMAP_SUFFIX, url);
                continue;
            }

            match self.fetch_and_classify(&url).await {
                Ok(SitemapDoc::Leaf(_)) => leaves.push(url),
                Ok(SitemapDoc::Index(children)) => queue.extend(children),
                Ok(SitemapDoc::Invalid) => {
                    warn!("Sitemap {} has no <sitemap> or <url> entries, skipping", url);
                }
                Err(e) => {
                    warn!("Failed to resolve sitemap {}: {}", url, e);
                }
            }
        }

        debug!("Resolved {} leaf sitemap(s)", leaves.len());
        Ok(leaves)
    }

    async fn fetch_and_classify(&self, url: &str) -> Result<SitemapDoc> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        sitemap::classify(&body)
    }
}

impl Default for SitemapResolver {
    fn default() -> Self {
        Self::new()
    }
}
