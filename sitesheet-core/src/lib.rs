pub mod pipeline;
pub mod spreadsheet;

pub use pipeline::{Artifact, Pipeline, PipelineOptions, Rejection};
pub use spreadsheet::{artifact_filename, encode};
