//! Build command - generates the static site

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;
use folio_generator::{BuildStats, Builder};

/// Run the build command.
///
/// Builds the static site from content files to the output directory.
pub fn run(
    config_path: &Path,
    output: Option<&Path>,
    drafts: bool,
    base_url: Option<&str>,
) -> Result<BuildStats> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, drafts, ?base_url, "Starting build");

    let mut config =
        Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;

    if drafts {
        config.build.drafts = true;
    }

    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base_url from CLI");
        config.site.base_url = url.trim_end_matches('/').to_string();
    }

    tracing::debug!(?config, "Loaded configuration");

    let mut builder = Builder::new(config);
    if let Some(output) = output {
        builder = builder.with_output_dir(output);
    }
    let output_dir = builder.output_dir().to_path_buf();

    let stats = builder.build().wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Pages:      {}", stats.pages);
    println!("  Layouted:   {}", stats.layouted);
    println!("  Unwrapped:  {}", stats.unwrapped);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output_dir.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(stats)
}
