use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid sitemap XML: {0}")]
    InvalidXml(String),

    #[error("Invalid HTML: {0}")]
    InvalidHtml(String),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
