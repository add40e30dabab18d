//! Page rendering.
//!
//! Every page ends up in the `base` document shell. Pages bound to a layout
//! are first rendered through that layout; unwrapped pages put the compiled
//! document straight into the shell.

use std::path::PathBuf;

use chrono::NaiveDate;
use folio_core::{Config, ContentPath, ParsedContent, TocEntry, meta::resolve};
use thiserror::Error;
use tracing::debug;

use crate::{
    layout::{Binding, LayoutError, LayoutTable},
    route::BLOG_SECTION,
    template::{
        BASE_TEMPLATE_NAME, TemplateContext, TemplateError, TemplateRegistry, escape_html,
    },
    theme::THEME_CSS_FILE,
};

/// Maximum length of a summary excerpted from the document body.
pub const SUMMARY_CHARS: usize = 160;

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Layout lookup failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Everything a page template can show, independent of where it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    /// File (or logical source) the page was produced from.
    pub source: PathBuf,
    pub slug: String,
    pub url_path: String,
    pub title: String,
    pub description: Option<String>,
    /// Plain-text excerpt of the body.
    pub summary: Option<String>,
    pub date: Option<NaiveDate>,
    pub tags: Vec<String>,
    /// Scalar front matter fields outside the known keys.
    pub extra: Vec<(String, String)>,
    /// Compiled document HTML.
    pub content: String,
    pub toc: Vec<TocEntry>,
    pub word_count: usize,
}

impl PageView {
    /// View of a compiled document.
    ///
    /// Front matter wins. Otherwise titles come from the route slug, blog
    /// posts get the slug-derived description and other pages a summary of
    /// the body.
    pub fn from_document(doc: &ParsedContent, path: &ContentPath) -> Self {
        let fm = &doc.frontmatter;
        let derived = resolve(path.route_slug()).meta;
        let summary = doc.summary(SUMMARY_CHARS);
        let summary = (!summary.is_empty()).then_some(summary);

        let title = fm.title.clone().unwrap_or(derived.title);
        let description = match (&fm.description, path.section()) {
            (Some(description), _) => Some(description.clone()),
            (None, Some(BLOG_SECTION)) => Some(derived.description),
            (None, _) => summary.clone(),
        };

        Self {
            source: path.path.clone(),
            slug: path.slug.clone(),
            url_path: path.url_path(),
            title,
            description,
            summary,
            date: fm.date,
            tags: fm.tags.clone(),
            extra: fm
                .extra_scalars()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            content: doc.html.clone(),
            toc: doc.toc.clone(),
            word_count: doc.word_count(),
        }
    }
}

/// Renders pages into complete HTML documents.
#[derive(Debug)]
pub struct PageRenderer<'a> {
    config: &'a Config,
    layouts: &'a LayoutTable,
    templates: TemplateRegistry,
}

impl<'a> PageRenderer<'a> {
    pub fn new(config: &'a Config, layouts: &'a LayoutTable) -> Self {
        Self {
            config,
            layouts,
            templates: TemplateRegistry::new(),
        }
    }

    pub fn layouts(&self) -> &'a LayoutTable {
        self.layouts
    }

    /// Render a compiled document with its binding.
    pub fn render(
        &self,
        doc: &ParsedContent,
        binding: &Binding,
        path: &ContentPath,
    ) -> Result<String> {
        self.render_view(&PageView::from_document(doc, path), binding)
    }

    /// Render a prepared page view.
    pub fn render_view(&self, view: &PageView, binding: &Binding) -> Result<String> {
        debug!(slug = %view.slug, layout = ?binding.layout_key(), "rendering page");

        let body = match binding {
            Binding::Unwrapped => view.content.clone(),
            Binding::Layout(key) => {
                let layout = self.layouts.require(key, &view.source)?;
                layout.render(&self.layout_context(view))?
            }
        };

        Ok(self
            .templates
            .render(BASE_TEMPLATE_NAME, &self.base_context(view, &body))?)
    }

    /// Context for layout templates.
    ///
    /// Extra front matter fields go in first so the known keys always win.
    fn layout_context(&self, view: &PageView) -> TemplateContext {
        let mut ctx = TemplateContext::new();
        for (key, value) in &view.extra {
            ctx.insert(key.as_str(), escape_html(value));
        }

        ctx.insert("title", escape_html(self.page_title(view)));
        ctx.insert("slug", escape_html(&view.slug));
        ctx.insert("url", escape_html(&view.url_path));
        ctx.insert("content", view.content.as_str());
        ctx.insert("site_title", escape_html(&self.config.site.title));
        ctx.insert_opt("description", view.description.as_deref().map(escape_html));
        ctx.insert_opt("summary", view.summary.as_deref().map(escape_html));
        if let Some(date) = view.date {
            ctx.insert("date", date.format("%Y-%m-%d").to_string());
            ctx.insert("date_formatted", date.format("%B %-d, %Y").to_string());
        }
        if !view.tags.is_empty() {
            ctx.insert("tags", escape_html(&view.tags.join(", ")));
            ctx.insert("tags_html", tags_html(&view.tags));
        }
        if !view.toc.is_empty() {
            ctx.insert("toc_html", toc_html(&view.toc));
        }
        ctx.insert("word_count", view.word_count.to_string());
        ctx
    }

    fn base_context(&self, view: &PageView, body: &str) -> TemplateContext {
        let site = &self.config.site;
        let title = self.page_title(view);

        let mut ctx = TemplateContext::new()
            .with_var("lang", escape_html(&site.language))
            .with_var("title", escape_html(title))
            .with_var("canonical_url", escape_html(&self.config.url_for(&view.url_path)))
            .with_var("theme_css_url", format!("/{THEME_CSS_FILE}"))
            .with_var("body", body);

        if title != site.title {
            ctx.insert("site_title_suffix", format!(" | {}", escape_html(&site.title)));
        }
        ctx.insert_opt(
            "description",
            view.description
                .as_deref()
                .or(site.description.as_deref())
                .map(escape_html),
        );
        ctx.insert_opt("author", site.author.as_deref().map(escape_html));
        ctx
    }

    /// The page title, or the site title for pages without one (the root index).
    fn page_title<'v>(&'v self, view: &'v PageView) -> &'v str {
        if view.title.is_empty() {
            &self.config.site.title
        } else {
            &view.title
        }
    }
}

fn tags_html(tags: &[String]) -> String {
    let items: String = tags
        .iter()
        .map(|tag| format!(r#"<li class="tag">{}</li>"#, escape_html(tag)))
        .collect();
    format!(r#"<ul class="tags">{items}</ul>"#)
}

fn toc_html(toc: &[TocEntry]) -> String {
    let items: String = toc
        .iter()
        .map(|entry| {
            format!(
                r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
                entry.level,
                escape_html(&entry.id),
                escape_html(&entry.text)
            )
        })
        .collect();
    format!(r#"<nav class="toc"><ul>{items}</ul></nav>"#)
}
