pub mod error;
pub mod harvester;
pub mod record;
pub mod resolver;
pub mod sitemap;

pub use error::HarvestError;
pub use harvester::PageHarvester;
pub use record::PageRecord;
pub use resolver::SitemapResolver;
pub use sitemap::SitemapDoc;
