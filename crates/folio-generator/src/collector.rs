//! Content collection.
//!
//! Walks the content directory and compiles every content file into a
//! [`Document`].

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use folio_core::{Config, ContentPath, ParsedContent};
use folio_parser::{ParserError, ParserRegistry};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory walk error.
    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Parser error.
    #[error("parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParserError,
    },

    /// Two files map to the same slug (e.g. `post.md` and `post.mdx`).
    #[error("duplicate slug '{slug}': {} and {}", first.display(), second.display())]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// A compiled content file.
#[derive(Debug, Clone)]
pub struct Document {
    /// Location relative to the content root, with slug and type.
    pub path: ContentPath,
    /// Absolute (or root-relative) file path, for diagnostics.
    pub source: PathBuf,
    pub parsed: ParsedContent,
}

/// Collected site content.
#[derive(Debug, Default)]
pub struct SiteContent {
    /// All documents indexed by slug.
    pub documents: BTreeMap<String, Document>,

    /// Document slugs grouped by section (first path component).
    pub sections: HashMap<String, Vec<String>>,
}

impl SiteContent {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&Document> {
        self.documents.get(slug)
    }

    /// Documents of one section, in slug order.
    pub fn section(&self, name: &str) -> Vec<&Document> {
        let mut docs: Vec<_> = self
            .sections
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|slug| self.documents.get(slug))
            .collect();
        docs.sort_by(|a, b| a.path.slug.cmp(&b.path.slug));
        docs
    }

    fn insert(&mut self, doc: Document) -> Result<()> {
        let slug = doc.path.slug.clone();
        if let Some(existing) = self.documents.get(&slug) {
            return Err(CollectorError::DuplicateSlug {
                slug,
                first: existing.source.clone(),
                second: doc.source,
            });
        }

        if let Some(section) = doc.path.section() {
            self.sections
                .entry(section.to_string())
                .or_default()
                .push(slug.clone());
        }

        self.documents.insert(slug, doc);
        Ok(())
    }
}

/// Content collector that walks directories and parses files.
#[derive(Debug)]
pub struct ContentCollector {
    config: Config,
    parser: ParserRegistry,
    content_dir: PathBuf,
}

impl ContentCollector {
    /// Create a collector for the configured content directory.
    pub fn new(config: &Config) -> Self {
        Self {
            parser: ParserRegistry::with_theme(&config.build.syntax_theme),
            content_dir: config.content_dir(),
            config: config.clone(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Collect all content from the content directory.
    ///
    /// A missing content directory yields an empty site. Any file that fails
    /// to parse fails the whole collection.
    pub fn collect(&self) -> Result<SiteContent> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let files = self.find_content_files()?;
        info!(count = files.len(), "found content files");

        let parsed = files
            .par_iter()
            .map(|(path, relative)| self.parse_file(path, relative))
            .collect::<Result<Vec<_>>>()?;

        let mut content = SiteContent::default();
        for doc in parsed {
            if doc.parsed.frontmatter.draft && !self.config.build.drafts {
                debug!(slug = %doc.path.slug, "skipping draft");
                continue;
            }
            content.insert(doc)?;
        }

        info!(
            documents = content.documents.len(),
            sections = content.sections.len(),
            "content collection complete"
        );

        Ok(content)
    }

    /// Content files as (full path, ContentPath) pairs.
    fn find_content_files(&self) -> Result<Vec<(PathBuf, ContentPath)>> {
        if !self.content_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.content_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.content_dir) else {
                continue;
            };
            if let Some(content_path) =
                ContentPath::from_path(relative, &self.config.content.extensions)
            {
                files.push((entry.path().to_path_buf(), content_path));
            }
        }

        Ok(files)
    }

    fn parse_file(&self, path: &Path, content_path: &ContentPath) -> Result<Document> {
        debug!(path = %path.display(), "parsing file");

        let source = fs::read_to_string(path).map_err(|source| CollectorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = self
            .parser
            .parse(&source, path)
            .map_err(|source| CollectorError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Document {
            path: content_path.clone(),
            source: path.to_path_buf(),
            parsed,
        })
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
