//! New command - create new content with front matter

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr, bail};
use folio_core::{Config, config::ContentConfig, meta::title_from_slug, slug::slugify};
use folio_generator::LayoutTable;

/// Run the new command.
///
/// Creates a content file with boilerplate front matter. When the site
/// configuration can be loaded, the file goes into its content directory and
/// `layout` must name a registered layout.
pub fn run(config_path: &Path, path: &Path, layout: Option<&str>, mdx: bool) -> Result<PathBuf> {
    tracing::info!(?path, ?layout, mdx, "Creating new content");

    let content_dir = match Config::load_with_env(config_path) {
        Ok(config) => {
            if let Some(key) = layout {
                let table = LayoutTable::from_config(&config).wrap_err("Failed to load layouts")?;
                table
                    .require(key, path)
                    .wrap_err("Refusing to create content with an unknown layout")?;
            }
            config.content_dir()
        }
        Err(e) => {
            tracing::warn!(error = %e, "no usable configuration, using default content directory");
            ContentConfig::default().dir
        }
    };

    let ext = if mdx { "mdx" } else { "md" };
    let full_path = content_dir.join(path);
    let file_path = if full_path.extension().is_some() {
        full_path
    } else {
        full_path.with_extension(ext)
    };

    if file_path.exists() {
        bail!("File already exists: {}", file_path.display());
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }

    fs::write(&file_path, generate_frontmatter(&file_path, layout))
        .wrap_err("Failed to write file")?;

    tracing::info!(?file_path, "Created new content file");
    println!("Created: {}", file_path.display());

    Ok(file_path)
}

fn generate_frontmatter(path: &Path, layout: Option<&str>) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "untitled".to_string());
    let title = title_from_slug(&stem);
    let date = Utc::now().format("%Y-%m-%d").to_string();
    let layout_line = layout
        .map(|key| format!("layout: {key}\n"))
        .unwrap_or_default();

    format!(
        r#"---
{layout_line}title: "{title}"
date: {date}
draft: true
tags: []
---

Write your content here.
"#
    )
}
