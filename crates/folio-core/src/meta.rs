//! Slug-to-metadata resolution.
//!
//! [`resolve`] derives a page's title and description from its slug alone. It
//! is pure: the same slug always yields the same [`PageData`], and it never
//! fails. Callers that may later need a real content lookup should go through
//! [`ContentMetadataSource`](crate::source::ContentMetadataSource) instead of
//! calling this directly.

use serde::{Deserialize, Serialize};

/// Title and description for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Human-readable title.
    pub title: String,

    /// One-line description.
    pub description: String,
}

/// Data handed to the routing layer for a single page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageData {
    /// The slug exactly as requested.
    pub slug: String,

    /// Metadata for the page.
    pub meta: PageMetadata,
}

impl PageData {
    /// Pair a slug with its metadata.
    pub fn new(slug: impl Into<String>, meta: PageMetadata) -> Self {
        Self {
            slug: slug.into(),
            meta,
        }
    }
}

/// Resolve a slug into page data.
///
/// ```
/// use folio_core::meta::resolve;
///
/// let data = resolve("my-first-post");
/// assert_eq!(data.meta.title, "My First Post");
/// assert_eq!(data.meta.description, "This is the my-first-post blog post.");
/// ```
pub fn resolve(slug: &str) -> PageData {
    PageData::new(
        slug,
        PageMetadata {
            title: title_from_slug(slug),
            description: describe(slug),
        },
    )
}

/// Title-case a slug: split on `-`, uppercase the first character of every
/// word, join with single spaces.
///
/// The rest of each word is left as is, and empty words stay empty.
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn describe(slug: &str) -> String {
    format!("This is the {slug} blog post.")
}
