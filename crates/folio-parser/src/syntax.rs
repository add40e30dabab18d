//! Syntax highlighting for fenced code blocks.

use syntect::{highlighting::ThemeSet, html::highlighted_html_for_string, parsing::SyntaxSet};

/// Theme used when none is configured or the configured one is unknown.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Syntax highlighter using syntect.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme: String,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

impl SyntaxHighlighter {
    /// Create a highlighter, falling back to [`DEFAULT_THEME`] for unknown themes.
    pub fn new(theme: &str) -> Self {
        let mut highlighter = Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme: DEFAULT_THEME.to_string(),
        };
        if !highlighter.set_theme(theme) {
            tracing::warn!(theme, fallback = DEFAULT_THEME, "unknown syntax theme");
        }
        highlighter
    }

    /// Name of the active theme.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Switch theme. Returns `false` and keeps the current one if `theme` is unknown.
    pub fn set_theme(&mut self, theme: &str) -> bool {
        if self.theme_set.themes.contains_key(theme) {
            self.theme = theme.to_string();
            true
        } else {
            false
        }
    }

    /// Highlight code with the given language token.
    ///
    /// Unknown languages are highlighted as plain text; if syntect fails the
    /// code is emitted escaped inside `<pre><code>`.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang
            .and_then(|l| self.syntax_set.find_syntax_by_token(l))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self.theme_set.themes.get(&self.theme) else {
            return plain_block(code, lang);
        };

        highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
            .unwrap_or_else(|_| plain_block(code, lang))
    }
}

fn plain_block(code: &str, lang: Option<&str>) -> String {
    let lang_class = lang
        .map(|l| format!(" class=\"language-{}\"", escape_html(l)))
        .unwrap_or_default();
    format!("<pre><code{lang_class}>{}</code></pre>", escape_html(code))
}

/// Escape HTML special characters.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust() {
        let highlighter = SyntaxHighlighter::default();
        let html = highlighter.highlight("fn main() {}\n", Some("rust"));

        assert!(html.contains("<pre"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_highlight_unknown_language() {
        let highlighter = SyntaxHighlighter::default();
        let html = highlighter.highlight("some code\n", Some("unknown_lang_xyz"));
        assert!(html.contains("some code"));
    }

    #[test]
    fn test_highlight_no_language() {
        let highlighter = SyntaxHighlighter::default();
        let html = highlighter.highlight("plain text\n", None);
        assert!(html.contains("plain text"));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let highlighter = SyntaxHighlighter::new("no-such-theme");
        assert_eq!(highlighter.theme(), DEFAULT_THEME);
    }

    #[test]
    fn test_set_theme() {
        let mut highlighter = SyntaxHighlighter::default();
        assert!(highlighter.set_theme("InspiredGitHub"));
        assert_eq!(highlighter.theme(), "InspiredGitHub");
        assert!(!highlighter.set_theme("nope"));
        assert_eq!(highlighter.theme(), "InspiredGitHub");
    }

    #[test]
    fn test_plain_block_escapes() {
        assert_eq!(
            plain_block("<b>", Some("html")),
            "<pre><code class=\"language-html\">&lt;b&gt;</code></pre>"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
    }
}
