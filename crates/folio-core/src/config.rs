//! Site configuration management.
//!
//! A [`Config`] is built once when a build (or a single command) starts and is
//! passed by reference to everything that needs it. Nothing reads global state.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    content::ContentType,
    error::{CoreError, Result},
};

/// Default configuration file name, looked up relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

/// Main configuration structure for Folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Content source settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Layout table: layout key to template path.
    #[serde(default)]
    pub layouts: BTreeMap<String, PathBuf>,

    /// Design tokens consumed by the renderer.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Directory the configuration was loaded from.
    #[serde(skip)]
    pub root: PathBuf,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Language code used for the `lang` attribute.
    #[serde(default = "default_language")]
    pub language: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,
}

/// Content source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Content root, relative to the configuration file.
    #[serde(default = "default_content_dir")]
    pub dir: PathBuf,

    /// File extensions compiled as content.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for the generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Whether to render drafts.
    #[serde(default)]
    pub drafts: bool,

    /// Syntax highlighting theme name.
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,
}

/// Design tokens: font stacks, color scales and shadows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Sans-serif font stack, most preferred first.
    #[serde(default = "default_font_sans")]
    pub font_sans: Vec<String>,

    /// Named color scales (e.g. `primary`) mapping shade to CSS color.
    #[serde(default = "default_colors")]
    pub colors: BTreeMap<String, BTreeMap<String, String>>,

    /// Named box shadows.
    #[serde(default = "default_shadows")]
    pub shadows: BTreeMap<String, String>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("src/content")
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "mdx".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_syntax_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_font_sans() -> Vec<String> {
    [
        "Inter",
        "ui-sans-serif",
        "system-ui",
        "-apple-system",
        "BlinkMacSystemFont",
        "Segoe UI",
        "Roboto",
        "Helvetica Neue",
        "Arial",
        "sans-serif",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_colors() -> BTreeMap<String, BTreeMap<String, String>> {
    let primary = [
        ("50", "#faf5ff"),
        ("100", "#f3e8ff"),
        ("200", "#e9d5ff"),
        ("300", "#d8b4fe"),
        ("400", "#c084fc"),
        ("500", "#a855f7"),
        ("600", "#9333ea"),
        ("700", "#7e22ce"),
        ("800", "#6b21a8"),
        ("900", "#581c87"),
        ("950", "#3b0764"),
    ]
    .into_iter()
    .map(|(shade, color)| (shade.to_string(), color.to_string()))
    .collect();

    BTreeMap::from([("primary".to_string(), primary)])
}

fn default_shadows() -> BTreeMap<String, String> {
    BTreeMap::from([(
        "soft".to_string(),
        "0 2px 15px -3px rgba(0, 0, 0, 0.07), 0 10px 20px -2px rgba(0, 0, 0, 0.04)".to_string(),
    )])
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            extensions: default_extensions(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            drafts: false,
            syntax_theme: default_syntax_theme(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            font_sans: default_font_sans(),
            colors: default_colors(),
            shadows: default_shadows(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content, config_root(path)).map_err(|e| match e {
            CoreError::Toml(source) => CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                source,
            ),
            other => other,
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration, layering `FOLIO__SECTION__KEY` environment variables
    /// over the file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.root = config_root(path);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML source, resolving relative paths against `root`.
    pub fn parse(content: &str, root: impl Into<PathBuf>) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.root = root.into();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        if self.content.extensions.is_empty() {
            return Err(CoreError::config(
                "content.extensions must list at least one extension",
            ));
        }

        if let Some(ext) = self
            .content
            .extensions
            .iter()
            .find(|ext| ContentType::from_extension(ext).is_none())
        {
            return Err(CoreError::config(format!(
                "content.extensions: unsupported extension '{ext}'"
            )));
        }

        if self.layouts.keys().any(|key| key.trim().is_empty()) {
            return Err(CoreError::config("layouts: layout keys cannot be empty"));
        }

        Ok(())
    }

    /// Resolve a configured path against the configuration root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Absolute (or root-relative) content directory.
    pub fn content_dir(&self) -> PathBuf {
        self.resolve_path(&self.content.dir)
    }

    /// Absolute (or root-relative) output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.build.output_dir)
    }

    /// Whether files with this extension are compiled as content.
    pub fn is_content_extension(&self, ext: &str) -> bool {
        self.content
            .extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

fn config_root(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
