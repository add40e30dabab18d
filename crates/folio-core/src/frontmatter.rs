//! Front matter parsing for content files.

use std::{collections::BTreeMap, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Front matter metadata for content files.
///
/// Only `layout` drives compilation. The remaining known keys feed the page
/// metadata, and anything else is forwarded to the layout through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Layout key looked up in the layout table. Absent means no layout.
    #[serde(default)]
    pub layout: Option<String>,

    /// Page title.
    #[serde(default)]
    pub title: Option<String>,

    /// Page description for meta tags and summaries.
    #[serde(default)]
    pub description: Option<String>,

    /// Publication date (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Tags for the page.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Any other keys.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Delimiter types for front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML front matter delimited by `---`.
    Yaml,
    /// TOML front matter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into front matter and body.
///
/// Both delimiters must sit on a line of their own. Returns `None` when the
/// content does not open with a delimiter line or the block is never closed.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();

    let (opening, rest) = content.split_once('\n')?;
    if opening.trim_end() != delimiter {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = rest[..offset].trim();
            let body = rest[offset + line.len()..].trim_start();
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse front matter from a string.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((Frontmatter::default(), content.to_string()));
    };

    if fm_str.is_empty() {
        return Ok((Frontmatter::default(), body.to_string()));
    }

    let frontmatter: Frontmatter = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
    };

    Ok((frontmatter, body.to_string()))
}

impl Frontmatter {
    /// The declared layout key, if any. Blank values count as absent.
    pub fn layout_key(&self) -> Option<&str> {
        self.layout
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Scalar `extra` values rendered as strings, for template interpolation.
    ///
    /// Sequences, mappings and nulls are skipped.
    pub fn extra_scalars(&self) -> impl Iterator<Item = (&str, String)> {
        self.extra.iter().filter_map(|(key, value)| {
            let rendered = match value {
                serde_yaml::Value::String(s) => s.clone(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some((key.as_str(), rendered))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_yaml_frontmatter() {
        let content = r#"---
layout: blog
title: "Hello World"
---

This is the body content."#;

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Yaml);
        assert!(fm.contains("layout:"));
        assert!(body.starts_with("This is the body"));
    }

    #[test]
    fn test_split_toml_frontmatter() {
        let content = r#"+++
layout = "blog"
+++

This is the body content."#;

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Toml);
        assert!(fm.contains("layout ="));
        assert!(body.starts_with("This is the body"));
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "Just some content without front matter.";
        assert!(split_frontmatter(content).is_none());
    }

    #[test]
    fn test_delimiter_inside_value_does_not_close_block() {
        let content = "---\ntitle: Notes --- part 2\nlayout: blog\n---\n\nBody\n";
        let (fm, body) = parse_frontmatter(content, Path::new("notes.md")).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Notes --- part 2"));
        assert_eq!(fm.layout_key(), Some("blog"));
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_closing_delimiter_must_be_whole_line() {
        let content = "---\nlayout: blog\n---- not a delimiter\n---\r\nBody";
        let (_, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(fm, "layout: blog\n---- not a delimiter");
        assert_eq!(body, "Body");

        let content = "+++\ntitle = \"a +++ b\"\n+++";
        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Toml);
        assert_eq!(fm, "title = \"a +++ b\"");
        assert_eq!(body, "");
    }

    #[test]
    fn test_rule_line_is_not_frontmatter() {
        assert!(split_frontmatter("----\nlayout: blog\n---\n").is_none());
        assert!(split_frontmatter("--- layout: blog ---\nBody").is_none());
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let (_, fm, body) = split_frontmatter("---\n---\nBody").expect("split");
        assert_eq!(fm, "");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unclosed_frontmatter_is_body() {
        let content = "---\nlayout: blog\n\nNo closing delimiter.";
        let (fm, body) = parse_frontmatter(content, Path::new("test.md")).expect("parse");
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
layout: blog
title: "Test Post"
date: 2024-01-14
draft: false
tags:
  - rust
  - svelte
---

Content here."#;

        let (fm, body) = parse_frontmatter(content, Path::new("test.md")).expect("parse");

        assert_eq!(fm.layout_key(), Some("blog"));
        assert_eq!(fm.title.as_deref(), Some("Test Post"));
        assert_eq!(fm.date, NaiveDate::from_ymd_opt(2024, 1, 14));
        assert!(!fm.draft);
        assert_eq!(fm.tags, vec!["rust", "svelte"]);
        assert_eq!(body, "Content here.");
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = r#"+++
layout = "blog"
title = "Test Post"
draft = true
tags = ["rust", "test"]
+++

Content here."#;

        let (fm, body) = parse_frontmatter(content, Path::new("test.md")).expect("parse");

        assert_eq!(fm.layout_key(), Some("blog"));
        assert!(fm.draft);
        assert_eq!(fm.tags, vec!["rust", "test"]);
        assert_eq!(body, "Content here.");
    }

    #[test]
    fn test_missing_layout_means_none() {
        let content = "---\ntitle: About\n---\n\nHi.";
        let (fm, _) = parse_frontmatter(content, Path::new("about.md")).expect("parse");
        assert_eq!(fm.layout_key(), None);
    }

    #[test]
    fn test_blank_layout_means_none() {
        let content = "---\nlayout: \"  \"\n---\n\nHi.";
        let (fm, _) = parse_frontmatter(content, Path::new("about.md")).expect("parse");
        assert_eq!(fm.layout_key(), None);
    }

    #[test]
    fn test_layout_key_is_trimmed() {
        let fm = Frontmatter {
            layout: Some(" blog ".to_string()),
            ..Default::default()
        };
        assert_eq!(fm.layout_key(), Some("blog"));
    }

    #[test]
    fn test_frontmatter_with_extra_fields() {
        let content = r#"---
layout: blog
author: "Ada"
reading_minutes: 4
featured: true
gallery:
  - one.jpg
---

Body"#;

        let (fm, _body) = parse_frontmatter(content, Path::new("test.md")).expect("parse");

        let extras: BTreeMap<_, _> = fm.extra_scalars().collect();
        assert_eq!(extras.get("author").map(String::as_str), Some("Ada"));
        assert_eq!(extras.get("reading_minutes").map(String::as_str), Some("4"));
        assert_eq!(extras.get("featured").map(String::as_str), Some("true"));
        assert!(!extras.contains_key("gallery"));
        assert!(fm.extra.contains_key("gallery"));
    }

    #[test]
    fn test_malformed_frontmatter_is_error() {
        let content = "---\nlayout: [unclosed\n---\n\nBody";
        let err = parse_frontmatter(content, Path::new("broken.md")).unwrap_err();
        assert!(matches!(err, CoreError::Frontmatter { .. }));
        assert!(err.to_string().contains("broken.md"));
    }
}
