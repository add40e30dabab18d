//! Slug helpers.
//!
//! A canonical slug is one or more lowercase words joined by single hyphens,
//! e.g. `my-first-post`. The resolver accepts any string; these helpers are
//! for producing and checking slugs, not for gating resolution.

/// Whether `slug` is in canonical form.
pub fn is_canonical(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('-').all(|word| {
            !word.is_empty()
                && word
                    .chars()
                    .all(|c| c.is_lowercase() || c.is_ascii_digit())
        })
}

/// The final segment of a URL path (`/blog/my-first-post/` → `my-first-post`).
pub fn route_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

/// Convert text to a canonical slug.
///
/// Lowercases, keeps alphanumerics, turns whitespace, `-` and `_` into single
/// hyphens and drops everything else.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
