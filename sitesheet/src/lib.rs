// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{artifact_path, sanitize_filename, write_artifacts};

// Re-export pipeline functionality from sitesheet-core
pub use sitesheet_core::{Artifact, Pipeline, PipelineOptions, Rejection};
