//! Markdown parser using pulldown-cmark.

use std::{collections::HashSet, path::Path};

use folio_core::{
    content::{ParsedContent, TocEntry},
    frontmatter::parse_frontmatter,
    slug::slugify,
};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use thiserror::Error;

use crate::{mdx::strip_esm, syntax::SyntaxHighlighter};

/// Markdown parsing errors.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Failed to parse front matter.
    #[error("front matter error: {0}")]
    Frontmatter(#[from] folio_core::error::CoreError),
}

/// Result type for markdown operations.
pub type Result<T> = std::result::Result<T, MarkdownError>;

/// Markdown parser with syntax highlighting support.
#[derive(Debug)]
pub struct MarkdownParser {
    highlighter: SyntaxHighlighter,
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A heading whose events are held back until its anchor id is known.
struct PendingHeading<'a> {
    level: HeadingLevel,
    id: Option<CowStr<'a>>,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    text: String,
    events: Vec<Event<'a>>,
}

struct PendingCode {
    lang: Option<String>,
    source: String,
}

impl MarkdownParser {
    /// Create a new markdown parser with default options.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            highlighter: SyntaxHighlighter::default(),
            options,
        }
    }

    /// Create a parser with a custom syntax theme.
    pub fn with_theme(theme: &str) -> Self {
        Self {
            highlighter: SyntaxHighlighter::new(theme),
            ..Self::new()
        }
    }

    /// Parse a Markdown document with front matter.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        let (html, toc) = self.render_markdown(&body);

        Ok(ParsedContent {
            frontmatter,
            html,
            raw: body,
            toc,
        })
    }

    /// Parse an MDX document: front matter, then ESM statements are dropped
    /// and the rest is compiled as Markdown.
    pub fn parse_mdx(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        let body = strip_esm(&body);
        let (html, toc) = self.render_markdown(&body);

        Ok(ParsedContent {
            frontmatter,
            html,
            raw: body,
            toc,
        })
    }

    /// Render markdown to HTML with heading anchors, TOC and highlighted code.
    fn render_markdown(&self, content: &str) -> (String, Vec<TocEntry>) {
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut toc = Vec::new();
        let mut used_ids = self.explicit_heading_ids(content);
        let mut heading: Option<PendingHeading<'_>> = None;
        let mut code: Option<PendingCode> = None;

        for event in Parser::new_ext(content, self.options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code = Some(PendingCode {
                        lang,
                        source: String::new(),
                    });
                }

                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code.take() {
                        let highlighted = self
                            .highlighter
                            .highlight(&block.source, block.lang.as_deref());
                        events.push(Event::Html(highlighted.into()));
                    }
                }

                Event::Text(text) if code.is_some() => {
                    if let Some(block) = code.as_mut() {
                        block.source.push_str(&text);
                    }
                }

                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => {
                    heading = Some(PendingHeading {
                        level,
                        id,
                        classes,
                        attrs,
                        text: String::new(),
                        events: Vec::new(),
                    });
                }

                Event::End(TagEnd::Heading(_)) => {
                    if let Some(pending) = heading.take() {
                        let id = match pending.id {
                            Some(id) => id.to_string(),
                            None => unique_id(slugify(&pending.text), &mut used_ids),
                        };
                        toc.push(TocEntry {
                            level: pending.level as u8,
                            text: pending.text,
                            id: id.clone(),
                        });
                        events.push(Event::Start(Tag::Heading {
                            level: pending.level,
                            id: Some(id.into()),
                            classes: pending.classes,
                            attrs: pending.attrs,
                        }));
                        events.extend(pending.events);
                        events.push(Event::End(TagEnd::Heading(pending.level)));
                    }
                }

                other => match heading.as_mut() {
                    Some(pending) => {
                        if let Event::Text(text) | Event::Code(text) = &other {
                            pending.text.push_str(text);
                        }
                        pending.events.push(other);
                    }
                    None => events.push(other),
                },
            }
        }

        let mut output = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        (output, toc)
    }

    /// `{#id}` anchors written by the author. Generated ids must avoid these
    /// wherever the heading appears in the document.
    fn explicit_heading_ids(&self, content: &str) -> HashSet<String> {
        Parser::new_ext(content, self.options)
            .filter_map(|event| match event {
                Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
                _ => None,
            })
            .collect()
    }
}

/// Deduplicate heading anchors: `intro`, `intro-1`, `intro-2`, ...
fn unique_id(base: String, used: &mut HashSet<String>) -> String {
    let base = if base.is_empty() {
        "section".to_string()
    } else {
        base
    };
    let mut id = base.clone();
    let mut n = 1;
    while used.contains(&id) {
        id = format!("{base}-{n}");
        n += 1;
    }
    used.insert(id.clone());
    id
}
