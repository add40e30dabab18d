//! Folio Core Library
//!
//! Core types, configuration, error handling and slug metadata resolution for
//! the Folio content pipeline.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod meta;
pub mod slug;
pub mod source;

pub use config::Config;
pub use content::{ContentPath, ContentType, ParsedContent, TocEntry};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
pub use meta::{PageData, PageMetadata, resolve};
pub use source::{ContentMetadataSource, LoadError, MetadataStore, StoreError};
