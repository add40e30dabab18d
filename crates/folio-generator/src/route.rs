//! The `/blog/[slug]` route.
//!
//! The route asks its [`ContentMetadataSource`] for page data, merges in the
//! statically compiled document when there is one, and renders the result
//! through the `blog` layout.

use std::{collections::HashMap, path::PathBuf};

use async_trait::async_trait;
use folio_core::{
    ContentMetadataSource, LoadError, MetadataStore, PageData, PageMetadata, ParsedContent,
    StoreError, resolve,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    collector::{Document, SiteContent},
    html::{HtmlError, PageRenderer, PageView, SUMMARY_CHARS},
    layout::{BLOG_LAYOUT, Binding, LayoutError},
};

/// URL section served by [`BlogRoute`].
pub const BLOG_SECTION: &str = "blog";

/// Route pattern, used as the referencing location in layout errors.
pub const ROUTE_PATTERN: &str = "blog/[slug]";

/// Route errors.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Html(#[from] HtmlError),
}

impl RouteError {
    /// Whether the request may succeed if retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Load(e) if e.is_retryable())
    }
}

/// In-process metadata store built from collected content.
///
/// Keys are route slugs (`my-first-post`, not `blog/my-first-post`).
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    entries: HashMap<String, PageMetadata>,
}

impl PageIndex {
    /// Index the documents of the `blog` section.
    pub fn from_content(content: &SiteContent) -> Self {
        Self::from_documents(content.section(BLOG_SECTION))
    }

    /// Index arbitrary documents. The first document wins on a route slug clash.
    pub fn from_documents<'a>(docs: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut index = Self::default();
        for doc in docs {
            let slug = doc.path.route_slug();
            if index.entries.contains_key(slug) {
                warn!(slug, path = %doc.source.display(), "duplicate route slug, keeping first");
                continue;
            }
            index.insert(slug, metadata_for(slug, &doc.parsed));
        }
        debug!(entries = index.entries.len(), "built page index");
        index
    }

    pub fn insert(&mut self, slug: impl Into<String>, meta: PageMetadata) {
        self.entries.insert(slug.into(), meta);
    }

    pub fn get(&self, slug: &str) -> Option<&PageMetadata> {
        self.entries.get(slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl MetadataStore for PageIndex {
    async fn fetch(&self, slug: &str) -> Result<Option<PageMetadata>, StoreError> {
        Ok(self.entries.get(slug).cloned())
    }
}

/// Front matter values where present, slug-derived values otherwise.
fn metadata_for(slug: &str, doc: &ParsedContent) -> PageMetadata {
    let derived = resolve(slug).meta;
    let fm = &doc.frontmatter;

    PageMetadata {
        title: fm.title.clone().unwrap_or(derived.title),
        description: fm.description.clone().unwrap_or(derived.description),
    }
}

/// Handler for `/blog/[slug]`.
#[derive(Debug)]
pub struct BlogRoute<'a> {
    source: ContentMetadataSource,
    renderer: PageRenderer<'a>,
}

impl<'a> BlogRoute<'a> {
    /// Create the route. Fails if the renderer has no `blog` layout.
    pub fn new(
        source: ContentMetadataSource,
        renderer: PageRenderer<'a>,
    ) -> Result<Self, LayoutError> {
        renderer
            .layouts()
            .require(BLOG_LAYOUT, &PathBuf::from(ROUTE_PATTERN))?;
        Ok(Self { source, renderer })
    }

    pub fn source(&self) -> &ContentMetadataSource {
        &self.source
    }

    /// Load page data for `slug`.
    pub async fn load(&self, slug: &str) -> Result<PageData, LoadError> {
        self.source.load(slug).await
    }

    /// Load and render the page for `slug`.
    ///
    /// `compiled` is the statically compiled document for this slug, if any.
    /// Its front matter title and description take precedence over the loaded
    /// ones, and its HTML becomes the page content.
    pub async fn render(
        &self,
        slug: &str,
        compiled: Option<&ParsedContent>,
    ) -> Result<String, RouteError> {
        let data = self.load(slug).await?;
        debug!(slug, source = self.source.kind(), compiled = compiled.is_some(), "rendering blog route");

        let view = merge(data, compiled);
        Ok(self
            .renderer
            .render_view(&view, &Binding::Layout(BLOG_LAYOUT.to_string()))?)
    }
}

fn merge(data: PageData, compiled: Option<&ParsedContent>) -> PageView {
    let PageData { slug, meta } = data;
    let mut view = PageView {
        source: PathBuf::from(BLOG_SECTION).join(&slug),
        url_path: format!("/{BLOG_SECTION}/{slug}"),
        slug,
        title: meta.title,
        description: Some(meta.description),
        ..PageView::default()
    };

    if let Some(doc) = compiled {
        let fm = &doc.frontmatter;
        if let Some(title) = &fm.title {
            view.title = title.clone();
        }
        if let Some(description) = &fm.description {
            view.description = Some(description.clone());
        }
        view.date = fm.date;
        view.tags = fm.tags.clone();
        view.extra = fm
            .extra_scalars()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let summary = doc.summary(SUMMARY_CHARS);
        view.summary = (!summary.is_empty()).then_some(summary);
        view.content = doc.html.clone();
        view.toc = doc.toc.clone();
        view.word_count = doc.word_count();
    }

    view
}
