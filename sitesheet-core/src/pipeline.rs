use crate::spreadsheet;
use sitesheet_harvester::{HarvestError, PageHarvester, SitemapResolver};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// The root sitemap itself could not be resolved; nothing was produced.
#[derive(Debug, Error)]
#[error("Rejected sitemap root {url}: {reason}")]
pub struct Rejection {
    pub url: String,
    #[source]
    pub reason: HarvestError,
}

/// One exportable spreadsheet, paired with the leaf sitemap it came from.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub source_url: String,
    pub filename: String,
    pub bytes: Vec<u8>,
    pub record_count: usize,
}

/// Options for configuring a pipeline invocation
pub struct PipelineOptions {
    pub timeout_secs: u64,
    /// Cap on simultaneous page fetches per leaf sitemap.
    pub page_concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            page_concurrency: 8,
        }
    }
}

/// Callback for reporting pipeline progress
pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Drives resolve → harvest → encode for one root URL.
///
/// Every invocation owns its own state; nothing is shared across concurrent
/// runs. Dropping the `run` future cancels the invocation as a unit,
/// including all in-flight page fetches of the current leaf.
pub struct Pipeline {
    resolver: SitemapResolver,
    harvester: PageHarvester,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_options(PipelineOptions::default())
    }

    pub fn with_options(options: PipelineOptions) -> Self {
        Self {
            resolver: SitemapResolver::with_timeout(options.timeout_secs),
            harvester: PageHarvester::with_timeout(options.timeout_secs)
                .with_concurrency(options.page_concurrency),
        }
    }

    /// Run the full pipeline, returning one artifact per leaf sitemap that
    /// produced at least one record. An empty list is a valid outcome; only
    /// a root-level failure is an error. Harvest and encode failures for an
    /// individual leaf are logged and that leaf is skipped.
    pub async fn run(&self, root_url: &str) -> Result<Vec<Artifact>, Rejection> {
        self.run_with_progress(root_url, None).await
    }

    pub async fn run_with_progress(
        &self,
        root_url: &str,
        progress: Option<ProgressCallback>,
    ) -> Result<Vec<Artifact>, Rejection> {
        let report = |message: String| {
            if let Some(ref callback) = progress {
                callback(message);
            }
        };

        report(format!("Resolving {}", root_url));
        let leaves = self
            .resolver
            .resolve(root_url)
            .await
            .map_err(|reason| Rejection {
                url: root_url.to_string(),
                reason,
            })?;
        info!("Resolved {} leaf sitemap(s) from {}", leaves.len(), root_url);

        let total = leaves.len();
        let mut artifacts = Vec::new();
        for (index, leaf) in leaves.into_iter().enumerate() {
            report(format!("Harvesting sitemap {}/{}: {}", index + 1, total, leaf));

            let records = match self.harvester.harvest(&leaf).await {
                Ok(records) => records,
                Err(e) => {
                    warn!("Skipping sitemap {}: {}", leaf, e);
                    continue;
                }
            };
            if records.is_empty() {
                debug!("Sitemap {} produced no records, suppressing export", leaf);
                continue;
            }

            match spreadsheet::encode(&records) {
                Ok(bytes) => artifacts.push(Artifact {
                    filename: spreadsheet::artifact_filename(&leaf),
                    source_url: leaf,
                    bytes,
                    record_count: records.len(),
                }),
                Err(e) => {
                    warn!("Failed to encode spreadsheet for {}: {}", leaf, e);
                }
            }
        }

        info!("Pipeline complete: {} artifact(s)", artifacts.len());
        Ok(artifacts)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
