use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitesheet_core::pipeline::ProgressCallback;
use sitesheet_core::{Artifact, Pipeline, PipelineOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Make an artifact name safe for the local filesystem.
///
/// Artifact names are derived from sitemap URLs, so they carry scheme
/// separators, slashes and query characters that cannot appear in a file
/// name. All of those collapse to underscores.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '?' | '&' | '=' | '#' | '"' | '<' | '>' | '|' | '*' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

/// Where an artifact lands inside the chosen output directory.
pub fn artifact_path(output_dir: &Path, artifact: &Artifact) -> PathBuf {
    output_dir.join(sanitize_filename(&artifact.filename))
}

/// Write every artifact to disk, returning the written paths.
pub fn write_artifacts(output_dir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, String> {
    fs::create_dir_all(output_dir).map_err(|e| {
        format!(
            "Failed to create output directory {}: {}",
            output_dir.display(),
            e
        )
    })?;

    let mut written = Vec::new();
    for artifact in artifacts {
        let path = artifact_path(output_dir, artifact);
        fs::write(&path, &artifact.bytes)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        written.push(path);
    }
    Ok(written)
}

pub async fn handle_harvest(args: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let url = args.get_one::<Url>("url").unwrap();
    let threads = args.get_one::<usize>("threads").unwrap_or(&8);
    let timeout = args.get_one::<u64>("timeout").unwrap_or(&10);
    let output = args.get_one::<String>("output").unwrap();
    let expanded_output = shellexpand::tilde(output);
    let output_dir = PathBuf::from(expanded_output.as_ref());

    println!("\nHarvesting {}", url.as_str().bright_white());
    println!("Page workers: {}", threads);
    println!("Output directory: {}\n", output_dir.display());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Starting...");

    let spinner_clone = spinner.clone();
    let progress: ProgressCallback = Arc::new(move |message: String| {
        spinner_clone.set_message(message);
    });

    let pipeline = Pipeline::with_options(PipelineOptions {
        timeout_secs: *timeout,
        page_concurrency: *threads,
    });

    match pipeline.run_with_progress(url.as_str(), Some(progress)).await {
        Ok(artifacts) => {
            spinner.finish_and_clear();

            if artifacts.is_empty() {
                eprintln!(
                    "{} No sitemap under {} produced any records; nothing exported.",
                    "✗".red().bold(),
                    url.as_str()
                );
                std::process::exit(1);
            }

            match write_artifacts(&output_dir, &artifacts) {
                Ok(paths) => {
                    println!("{} Harvest complete!\n", "✓".green().bold());
                    for (artifact, path) in artifacts.iter().zip(paths.iter()) {
                        println!(
                            "  {} {}  ({} page{})",
                            "•".green(),
                            path.display(),
                            artifact.record_count,
                            if artifact.record_count == 1 { "" } else { "s" }
                        );
                    }
                }
                Err(e) => {
                    eprintln!("{} {}", "✗".red().bold(), e);
                    std::process::exit(1);
                }
            }
        }
        Err(rejection) => {
            spinner.finish_and_clear();
            eprintln!("{} {}", "✗".red().bold(), rejection);
            std::process::exit(1);
        }
    }
}
