//! MDX preprocessing.
//!
//! MDX bodies may start statements with `import` / `export` to pull in
//! components. Those statements belong to the rendering framework, so they are
//! removed before the body is compiled as Markdown. JSX-looking tags in the
//! body are left alone and pass through as inline HTML.

/// Remove top-level ESM statements from an MDX body.
///
/// A statement starts on a line beginning with `import ` or `export ` outside
/// a fenced code block and continues while braces stay open. A blank line
/// always ends it, so an unbalanced `{` cannot swallow the rest of the body.
pub fn strip_esm(body: &str) -> String {
    let mut out = Vec::new();
    let mut fence: Option<&str> = None;
    let mut open_braces: i32 = 0;

    for line in body.lines() {
        let trimmed = line.trim_start();

        if open_braces > 0 {
            if trimmed.is_empty() {
                open_braces = 0;
            } else {
                open_braces += brace_delta(line);
                continue;
            }
        }

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            out.push(line);
            continue;
        }

        if trimmed.starts_with("```") {
            fence = Some("```");
        } else if trimmed.starts_with("~~~") {
            fence = Some("~~~");
        } else if line.starts_with("import ") || line.starts_with("export ") {
            open_braces = brace_delta(line).max(0);
            continue;
        }

        out.push(line);
    }

    let mut stripped = out.join("\n");
    if body.ends_with('\n') {
        stripped.push('\n');
    }
    stripped.trim_start_matches('\n').to_string()
}

fn brace_delta(line: &str) -> i32 {
    line.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_single_line_imports() {
        let body = "import Card from '$lib/Card.svelte';\n\n# Title\n\nText\n";
        assert_eq!(strip_esm(body), "# Title\n\nText\n");
    }

    #[test]
    fn test_strips_multi_line_export() {
        let body = "export const meta = {\n  draft: false,\n};\n\n# Title\n";
        assert_eq!(strip_esm(body), "# Title\n");
    }

    #[test]
    fn test_strips_export_default() {
        let body = "export default function Layout({ children }) {\n  return children;\n}\n\n# Title\n";
        assert_eq!(strip_esm(body), "# Title\n");

        let body = "export default Layout;\n\nText\n";
        assert_eq!(strip_esm(body), "Text\n");
    }

    #[test]
    fn test_unbalanced_brace_ends_at_blank_line() {
        let body = "export const meta = {\n  draft: false,\n\n# Title\n\nText\n";
        assert_eq!(strip_esm(body), "# Title\n\nText\n");
    }

    #[test]
    fn test_keeps_code_fences() {
        let body = "```js\nimport x from 'y';\n```\n";
        assert_eq!(strip_esm(body), body);
    }

    #[test]
    fn test_keeps_indented_import_text() {
        let body = "Paragraph\n  import is a word here\n";
        assert_eq!(strip_esm(body), body);
    }

    #[test]
    fn test_keeps_jsx_tags() {
        let body = "<Card title=\"Hi\" />\n\nText\n";
        assert_eq!(strip_esm(body), body);
    }
}
