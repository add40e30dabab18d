//! Folio Generator Library
//!
//! Turns compiled content into a static site.
//!
//! # Modules
//!
//! - [`template`] - HTML template system with variable interpolation
//! - [`layout`] - Layout table and front-matter layout binding
//! - [`theme`] - Theme tokens as CSS custom properties
//! - [`html`] - Page rendering into the document shell
//! - [`collector`] - Content collection
//! - [`route`] - The `/blog/[slug]` route and its in-process page index
//! - [`build`] - Build orchestration

pub mod build;
pub mod collector;
pub mod html;
pub mod layout;
pub mod route;
pub mod template;
pub mod theme;

pub use build::{BuildError, BuildPlan, BuildStats, Builder};
pub use collector::{CollectorError, ContentCollector, Document, SiteContent};
pub use html::{HtmlError, PageRenderer, PageView};
pub use layout::{BLOG_LAYOUT, Binding, LayoutBinder, LayoutError, LayoutTable};
pub use route::{BlogRoute, PageIndex, RouteError};
pub use template::{Template, TemplateContext, TemplateRegistry};
pub use theme::ThemeTokens;
