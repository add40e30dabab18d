//! Content types and structures.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::frontmatter::Frontmatter;

/// Type of content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Markdown content (.md files).
    Markdown,
    /// Markdown with embedded components (.mdx files).
    Mdx,
}

impl ContentType {
    /// Determine content type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "mdx" => Some(Self::Mdx),
            _ => None,
        }
    }

    /// Get the canonical file extension for this content type.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Mdx => "mdx",
        }
    }
}

/// Location of a content file relative to the content root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    /// Path relative to the content root.
    pub path: PathBuf,

    /// URL slug derived from the path, without leading or trailing slashes.
    pub slug: String,

    /// Content type based on extension.
    pub content_type: ContentType,
}

impl ContentPath {
    /// Parse a path relative to the content root.
    ///
    /// Returns `None` unless the extension is one of `extensions`.
    ///
    /// - `blog/my-first-post.md` → slug `blog/my-first-post`
    /// - `blog/index.md` → slug `blog`
    /// - `index.mdx` → slug `` (site root)
    pub fn from_path(path: &Path, extensions: &[String]) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if !extensions.iter().any(|e| e.eq_ignore_ascii_case(extension)) {
            return None;
        }
        let content_type = ContentType::from_extension(extension)?;

        let stem = path.file_stem()?.to_str()?;
        let parent = path.parent().unwrap_or(Path::new(""));
        let parent = parent
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let slug = if stem == "index" {
            parent
        } else if parent.is_empty() {
            stem.to_string()
        } else {
            format!("{parent}/{stem}")
        };

        Some(Self {
            path: path.to_path_buf(),
            slug: slug.trim_matches('/').to_string(),
            content_type,
        })
    }

    /// The final path segment, as a `[slug]` route parameter would see it.
    pub fn route_slug(&self) -> &str {
        self.slug.rsplit('/').next().unwrap_or("")
    }

    /// First path component of a nested slug (`blog` for `blog/hello`).
    pub fn section(&self) -> Option<&str> {
        self.slug.split_once('/').map(|(section, _)| section)
    }

    /// Get the URL path for this content.
    pub fn url_path(&self) -> String {
        format!("/{}", self.slug)
    }

    /// Output file for this content inside `output_dir`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        if self.slug.is_empty() {
            output_dir.join("index.html")
        } else {
            output_dir.join(&self.slug).join("index.html")
        }
    }
}

/// A compiled content document.
#[derive(Debug, Clone)]
pub struct ParsedContent {
    /// Parsed front matter.
    pub frontmatter: Frontmatter,

    /// Rendered HTML content.
    pub html: String,

    /// Raw source content (without front matter).
    pub raw: String,

    /// Table of contents extracted from headings.
    pub toc: Vec<TocEntry>,
}

impl ParsedContent {
    /// Description from front matter, or a plain-text excerpt of the body.
    pub fn summary(&self, max_chars: usize) -> String {
        match &self.frontmatter.description {
            Some(description) => description.clone(),
            None => truncate_at_word_boundary(strip_html(&self.html).trim(), max_chars),
        }
    }

    /// Word count of the raw body.
    pub fn word_count(&self) -> usize {
        self.raw.split_whitespace().count()
    }
}

/// Table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,

    /// Heading text.
    pub text: String,

    /// Anchor ID for linking.
    pub id: String,
}

/// Strip HTML tags from content.
fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate text at word boundary, respecting UTF-8 character boundaries.
fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncate_byte_idx = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let truncated = &text[..truncate_byte_idx];

    if let Some(last_space_byte) = truncated.rfind(' ') {
        format!("{}...", &truncated[..last_space_byte])
    } else {
        format!("{truncated}...")
    }
}
