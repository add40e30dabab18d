//! Build orchestration.
//!
//! A build runs in two phases. Planning loads the layout table, collects
//! content and binds every document to its layout; nothing is written. Only
//! a complete plan is rendered to disk, so an unresolved layout anywhere
//! leaves the output directory untouched.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use folio_core::Config;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    collector::{CollectorError, ContentCollector, SiteContent},
    html::{HtmlError, PageRenderer},
    layout::{Binding, LayoutBinder, LayoutError, LayoutTable},
    theme::{THEME_CSS_FILE, ThemeTokens},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Layout error.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// HTML generation error.
    #[error("HTML error in {}: {source}", path.display())]
    Html {
        path: PathBuf,
        #[source]
        source: HtmlError,
    },
}

impl BuildError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of pages written.
    pub pages: usize,

    /// Pages rendered through a layout.
    pub layouted: usize,

    /// Pages rendered without a layout.
    pub unwrapped: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Collected content with every document bound to its layout.
#[derive(Debug)]
pub struct BuildPlan {
    pub layouts: LayoutTable,
    pub content: SiteContent,
    /// Binding per document slug.
    pub bindings: BTreeMap<String, Binding>,
}

impl BuildPlan {
    pub fn layouted(&self) -> usize {
        self.bindings
            .values()
            .filter(|b| matches!(b, Binding::Layout(_)))
            .count()
    }

    pub fn unwrapped(&self) -> usize {
        self.bindings.len() - self.layouted()
    }
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a builder writing to the configured output directory.
    pub fn new(config: Config) -> Self {
        Self {
            output_dir: config.output_dir(),
            config,
        }
    }

    /// Override the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Load layouts, collect content and bind every document.
    ///
    /// Fails on the first document whose layout key is not in the table.
    pub fn plan(&self) -> Result<BuildPlan> {
        let layouts = LayoutTable::from_config(&self.config)?;
        info!(layouts = layouts.len(), "loaded layout table");

        let content = ContentCollector::new(&self.config).collect()?;

        let binder = LayoutBinder::new(&layouts);
        let mut bindings = BTreeMap::new();
        for (slug, doc) in &content.documents {
            let binding = binder.bind(&doc.parsed, &doc.source)?;
            debug!(slug = %slug, layout = ?binding.layout_key(), "bound document");
            bindings.insert(slug.clone(), binding);
        }

        Ok(BuildPlan {
            layouts,
            content,
            bindings,
        })
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();

        info!(
            content = %self.config.content_dir().display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        let plan = self.plan()?;

        self.clean_output()?;
        let pages = self.write_pages(&plan)?;
        self.write_theme()?;

        let stats = BuildStats {
            pages,
            layouted: plan.layouted(),
            unwrapped: plan.unwrapped(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            pages = stats.pages,
            layouted = stats.layouted,
            unwrapped = stats.unwrapped,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Clean the output directory.
    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir).map_err(|e| BuildError::io(&self.output_dir, e))?;
        }
        fs::create_dir_all(&self.output_dir).map_err(|e| BuildError::io(&self.output_dir, e))?;
        Ok(())
    }

    /// Render and write every planned document.
    fn write_pages(&self, plan: &BuildPlan) -> Result<usize> {
        let renderer = PageRenderer::new(&self.config, &plan.layouts);
        let docs: Vec<_> = plan.content.documents.iter().collect();

        info!(count = docs.len(), "generating HTML pages");

        docs.par_iter()
            .map(|(slug, doc)| {
                let binding = plan.bindings.get(*slug).unwrap_or(&Binding::Unwrapped);
                let html = renderer
                    .render(&doc.parsed, binding, &doc.path)
                    .map_err(|source| BuildError::Html {
                        path: doc.source.clone(),
                        source,
                    })?;

                let output_path = doc.path.output_path(&self.output_dir);
                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
                }
                fs::write(&output_path, html).map_err(|e| BuildError::io(&output_path, e))?;

                debug!(path = %output_path.display(), "wrote page");
                Ok::<_, BuildError>(())
            })
            .collect::<Result<Vec<()>>>()
            .map(|written| written.len())
    }

    fn write_theme(&self) -> Result<()> {
        let css = ThemeTokens::from_config(&self.config.theme).to_css();
        let path = self.output_dir.join(THEME_CSS_FILE);
        fs::write(&path, css).map_err(|e| BuildError::io(&path, e))?;
        debug!(path = %path.display(), "wrote theme stylesheet");
        Ok(())
    }
}
