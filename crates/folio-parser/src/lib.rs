//! Folio Parser Library
//!
//! Compiles Markdown and MDX content files into HTML documents.

pub mod markdown;
pub mod mdx;
pub mod syntax;

use std::path::Path;

use folio_core::content::{ContentType, ParsedContent};
pub use markdown::MarkdownParser;
pub use syntax::SyntaxHighlighter;
use thiserror::Error;

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Markdown parsing error.
    #[error("markdown error: {0}")]
    Markdown(#[from] markdown::MarkdownError),

    /// Unknown file extension.
    #[error("unknown file extension: {0}")]
    UnknownExtension(String),
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Trait for content parsers.
pub trait ContentParser {
    /// Parse content from a string and file path.
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent>;
}

impl ContentParser for MarkdownParser {
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        Ok(MarkdownParser::parse(self, content, path)?)
    }
}

/// Registry for content parsers with auto-detection by extension.
#[derive(Debug, Default)]
pub struct ParserRegistry {
    markdown: MarkdownParser,
}

impl ParserRegistry {
    /// Create a new parser registry with default parsers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser registry with a custom syntax theme.
    pub fn with_theme(theme: &str) -> Self {
        Self {
            markdown: MarkdownParser::with_theme(theme),
        }
    }

    /// Parse content, picking the parser from the file extension.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ParserError::UnknownExtension("(none)".to_string()))?;

        match ContentType::from_extension(ext) {
            Some(ContentType::Markdown) => Ok(self.markdown.parse(content, path)?),
            Some(ContentType::Mdx) => Ok(self.markdown.parse_mdx(content, path)?),
            None => Err(ParserError::UnknownExtension(ext.to_string())),
        }
    }

    /// Get the markdown parser.
    pub fn markdown(&self) -> &MarkdownParser {
        &self.markdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_markdown() {
        let registry = ParserRegistry::new();
        let content = r#"---
layout: blog
---

# Hello"#;

        let result = registry.parse(content, Path::new("test.md")).unwrap();
        assert_eq!(result.frontmatter.layout_key(), Some("blog"));
    }

    #[test]
    fn test_registry_mdx() {
        let registry = ParserRegistry::new();
        let content = "import X from './x.svelte';\n\n# Hello\n";

        let result = registry.parse(content, Path::new("test.mdx")).unwrap();
        assert!(!result.html.contains("import"));
        assert!(result.html.contains("Hello"));
    }

    #[test]
    fn test_registry_unknown_extension() {
        let registry = ParserRegistry::new();
        let result = registry.parse("content", Path::new("test.svelte"));

        assert!(matches!(result, Err(ParserError::UnknownExtension(_))));
    }

    #[test]
    fn test_registry_no_extension() {
        let registry = ParserRegistry::new();
        let result = registry.parse("content", Path::new("README"));

        assert!(matches!(result, Err(ParserError::UnknownExtension(ref e)) if e == "(none)"));
    }

    #[test]
    fn test_content_parser_trait() {
        let parser = MarkdownParser::new();
        let content = r#"---
title: "Trait Test"
---

Content"#;

        let result: Result<ParsedContent> =
            ContentParser::parse(&parser, content, Path::new("test.md"));
        assert!(result.is_ok());
    }
}
