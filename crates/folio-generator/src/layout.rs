//! Layout table and front-matter layout binding.
//!
//! A document that declares `layout: <key>` is rendered through the layout
//! registered under that key. A key that is not in the table stops the build:
//! silently emitting the page unwrapped would hide a typo until someone
//! looked at the output.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use folio_core::{Config, ParsedContent};
use thiserror::Error;
use tracing::debug;

use crate::template::{DEFAULT_BLOG_LAYOUT, Template};

/// Key of the built-in blog layout.
pub const BLOG_LAYOUT: &str = "blog";

/// Layout errors.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A document names a layout that is not registered.
    #[error("unknown layout '{key}' in {} (available: {available})", path.display())]
    Unresolved {
        key: String,
        path: PathBuf,
        available: String,
    },

    /// A configured layout file could not be read.
    #[error("failed to load layout '{key}' from {}: {source}", path.display())]
    Load {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Mapping from layout key to layout template. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct LayoutTable {
    layouts: BTreeMap<String, Template>,
}

impl LayoutTable {
    /// Build the table from `[layouts]`, reading each file once.
    ///
    /// The built-in `blog` layout is present unless the configuration maps
    /// `blog` to its own file.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut table = Self::builtin();

        for (key, file) in &config.layouts {
            let path = config.resolve_path(file);
            let source = fs::read_to_string(&path).map_err(|source| LayoutError::Load {
                key: key.clone(),
                path: path.clone(),
                source,
            })?;
            debug!(key = %key, path = %path.display(), "loaded layout");
            table.insert(Template::new(key.as_str(), source));
        }

        Ok(table)
    }

    /// Table holding only the built-in layouts.
    pub fn builtin() -> Self {
        let mut table = Self::default();
        table.insert(Template::new(BLOG_LAYOUT, DEFAULT_BLOG_LAYOUT));
        table
    }

    /// Register a layout under its template name.
    pub fn insert(&mut self, template: Template) {
        self.layouts.insert(template.name().to_string(), template);
    }

    pub fn get(&self, key: &str) -> Option<&Template> {
        self.layouts.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.layouts.contains_key(key)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    fn available(&self) -> String {
        if self.layouts.is_empty() {
            "none".to_string()
        } else {
            self.keys().collect::<Vec<_>>().join(", ")
        }
    }

    /// Look up `key`, reporting `path` as the referencing file on failure.
    pub fn require(&self, key: &str, path: &Path) -> Result<&Template> {
        self.get(key).ok_or_else(|| LayoutError::Unresolved {
            key: key.to_string(),
            path: path.to_path_buf(),
            available: self.available(),
        })
    }
}

/// How a document is wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// No layout declared; the compiled document is the page body.
    Unwrapped,
    /// Wrapped in the layout with this key.
    Layout(String),
}

impl Binding {
    pub fn layout_key(&self) -> Option<&str> {
        match self {
            Self::Unwrapped => None,
            Self::Layout(key) => Some(key),
        }
    }
}

/// Binds documents to layouts by their front-matter `layout` key.
#[derive(Debug, Clone, Copy)]
pub struct LayoutBinder<'a> {
    table: &'a LayoutTable,
}

impl<'a> LayoutBinder<'a> {
    pub fn new(table: &'a LayoutTable) -> Self {
        Self { table }
    }

    /// Decide the binding for one compiled document.
    pub fn bind(&self, doc: &ParsedContent, path: &Path) -> Result<Binding> {
        match doc.frontmatter.layout_key() {
            None => Ok(Binding::Unwrapped),
            Some(key) => {
                self.table.require(key, path)?;
                Ok(Binding::Layout(key.to_string()))
            }
        }
    }

    pub fn table(&self) -> &'a LayoutTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use folio_core::Frontmatter;
    use tempfile::TempDir;

    use super::*;

    fn doc_with_layout(layout: Option<&str>) -> ParsedContent {
        ParsedContent {
            frontmatter: Frontmatter {
                layout: layout.map(str::to_string),
                ..Default::default()
            },
            html: "<p>Hi</p>".to_string(),
            raw: "Hi".to_string(),
            toc: Vec::new(),
        }
    }

    #[test]
    fn test_builtin_has_blog() {
        let table = LayoutTable::builtin();
        assert!(table.contains(BLOG_LAYOUT));
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["blog"]);
    }

    #[test]
    fn test_bind_without_layout() {
        let table = LayoutTable::builtin();
        let binder = LayoutBinder::new(&table);
        let binding = binder
            .bind(&doc_with_layout(None), Path::new("about.md"))
            .unwrap();
        assert_eq!(binding, Binding::Unwrapped);
    }

    #[test]
    fn test_bind_blank_layout_is_unwrapped() {
        let table = LayoutTable::builtin();
        let binder = LayoutBinder::new(&table);
        let binding = binder
            .bind(&doc_with_layout(Some("  ")), Path::new("about.md"))
            .unwrap();
        assert_eq!(binding, Binding::Unwrapped);
    }

    #[test]
    fn test_bind_blog() {
        let table = LayoutTable::builtin();
        let binder = LayoutBinder::new(&table);
        let binding = binder
            .bind(&doc_with_layout(Some("blog")), Path::new("blog/post.md"))
            .unwrap();
        assert_eq!(binding, Binding::Layout("blog".to_string()));
        assert_eq!(binding.layout_key(), Some("blog"));
    }

    #[test]
    fn test_bind_unknown_layout_fails() {
        let table = LayoutTable::builtin();
        let binder = LayoutBinder::new(&table);
        let err = binder
            .bind(&doc_with_layout(Some("nonexistent")), Path::new("blog/post.md"))
            .unwrap_err();

        match err {
            LayoutError::Unresolved {
                key,
                path,
                available,
            } => {
                assert_eq!(key, "nonexistent");
                assert_eq!(path, PathBuf::from("blog/post.md"));
                assert_eq!(available, "blog");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bind_unknown_layout_after_delimiter_in_value() {
        let table = LayoutTable::builtin();
        let binder = LayoutBinder::new(&table);
        let path = Path::new("blog/post.md");
        let doc = folio_parser::ParserRegistry::new()
            .parse("---\ntitle: A --- B\nlayout: nonexistent\n---\n\nBody\n", path)
            .unwrap();

        assert!(matches!(
            binder.bind(&doc, path),
            Err(LayoutError::Unresolved { key, .. }) if key == "nonexistent"
        ));
    }

    #[test]
    fn test_binding_is_deterministic() {
        let table = LayoutTable::builtin();
        let binder = LayoutBinder::new(&table);
        let doc = doc_with_layout(Some("blog"));
        let first = binder.bind(&doc, Path::new("a.md")).unwrap();
        let second = binder.bind(&doc, Path::new("a.md")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_table_reports_none() {
        let table = LayoutTable::default();
        let err = table.require("blog", Path::new("x.md")).unwrap_err();
        assert!(err.to_string().contains("available: none"));
    }

    #[test]
    fn test_from_config_loads_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("layouts")).unwrap();
        fs::write(
            dir.path().join("layouts/docs.html"),
            "<main>{{ content }}</main>",
        )
        .unwrap();
        fs::write(
            dir.path().join("layouts/blog.html"),
            "<article class=\"custom\">{{ content }}</article>",
        )
        .unwrap();

        let config = Config::parse(
            r#"
[site]
title = "Test"
base_url = "https://example.com"

[layouts]
docs = "layouts/docs.html"
blog = "layouts/blog.html"
"#,
            dir.path(),
        )
        .unwrap();

        let table = LayoutTable::from_config(&config).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.get("docs").unwrap().source().contains("<main>"));
        assert!(table.get("blog").unwrap().source().contains("custom"));
    }

    #[test]
    fn test_from_config_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::parse(
            r#"
[site]
title = "Test"
base_url = "https://example.com"

[layouts]
docs = "layouts/missing.html"
"#,
            dir.path(),
        )
        .unwrap();

        let err = LayoutTable::from_config(&config).unwrap_err();
        assert!(matches!(err, LayoutError::Load { ref key, .. } if key == "docs"));
    }
}
