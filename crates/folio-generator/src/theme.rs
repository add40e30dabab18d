//! Theme tokens rendered as CSS custom properties.

use std::fmt::Write;

use folio_core::config::ThemeConfig;

/// File name of the generated stylesheet, relative to the output root.
pub const THEME_CSS_FILE: &str = "theme.css";

/// Design tokens from `[theme]`, ready to be written as a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeTokens {
    font_sans: String,
    colors: Vec<(String, String)>,
    shadows: Vec<(String, String)>,
}

impl ThemeTokens {
    pub fn from_config(theme: &ThemeConfig) -> Self {
        let font_sans = theme
            .font_sans
            .iter()
            .map(|family| quote_family(family))
            .collect::<Vec<_>>()
            .join(", ");

        let mut colors = Vec::new();
        for (scale, shades) in &theme.colors {
            let mut shades: Vec<_> = shades.iter().collect();
            // "50" < "100" numerically, not lexically
            shades.sort_by_key(|(shade, _)| (shade.parse::<u32>().unwrap_or(u32::MAX), shade.as_str()));
            for (shade, value) in shades {
                colors.push((format!("--color-{scale}-{shade}"), value.clone()));
            }
        }

        let shadows = theme
            .shadows
            .iter()
            .map(|(name, value)| (format!("--shadow-{name}"), value.clone()))
            .collect();

        Self {
            font_sans,
            colors,
            shadows,
        }
    }

    /// Look up a generated custom property by name, e.g. `--color-primary-500`.
    pub fn get(&self, property: &str) -> Option<&str> {
        if property == "--font-sans" {
            return (!self.font_sans.is_empty()).then_some(self.font_sans.as_str());
        }
        self.colors
            .iter()
            .chain(&self.shadows)
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Render the stylesheet: a `:root` block plus a few utility classes.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");

        if !self.font_sans.is_empty() {
            let _ = writeln!(css, "  --font-sans: {};", self.font_sans);
        }
        for (name, value) in self.colors.iter().chain(&self.shadows) {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push_str("}\n");

        if !self.font_sans.is_empty() {
            css.push_str("\n.font-sans {\n  font-family: var(--font-sans);\n}\n");
        }
        for (name, _) in &self.shadows {
            let class = name.trim_start_matches("--");
            let _ = write!(css, "\n.{class} {{\n  box-shadow: var({name});\n}}\n");
        }

        css
    }
}

/// Quote font family names that contain spaces.
fn quote_family(family: &str) -> String {
    if family.contains(' ') && !family.starts_with('"') {
        format!("\"{family}\"")
    } else {
        family.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_default_theme_tokens() {
        let tokens = ThemeTokens::from_config(&ThemeConfig::default());

        assert_eq!(tokens.get("--color-primary-500"), Some("#a855f7"));
        assert_eq!(tokens.get("--color-primary-950"), Some("#3b0764"));
        assert!(tokens.get("--shadow-soft").unwrap().contains("rgba"));
        assert!(tokens.get("--font-sans").unwrap().starts_with("Inter, "));
        assert!(tokens.get("--font-sans").unwrap().contains("\"Segoe UI\""));
        assert_eq!(tokens.get("--color-missing-1"), None);
    }

    #[test]
    fn test_shades_sorted_numerically() {
        let tokens = ThemeTokens::from_config(&ThemeConfig::default());
        let css = tokens.to_css();

        let p50 = css.find("--color-primary-50:").unwrap();
        let p100 = css.find("--color-primary-100:").unwrap();
        let p950 = css.find("--color-primary-950:").unwrap();
        assert!(p50 < p100);
        assert!(p100 < p950);
    }

    #[test]
    fn test_css_output() {
        let theme = ThemeConfig {
            font_sans: vec!["Inter".to_string(), "sans-serif".to_string()],
            colors: BTreeMap::from([(
                "accent".to_string(),
                BTreeMap::from([("500".to_string(), "#ff0000".to_string())]),
            )]),
            shadows: BTreeMap::from([("soft".to_string(), "0 1px 2px black".to_string())]),
        };

        let css = ThemeTokens::from_config(&theme).to_css();
        assert!(css.starts_with(":root {\n"));
        assert!(css.contains("  --font-sans: Inter, sans-serif;\n"));
        assert!(css.contains("  --color-accent-500: #ff0000;\n"));
        assert!(css.contains("  --shadow-soft: 0 1px 2px black;\n"));
        assert!(css.contains(".shadow-soft {\n  box-shadow: var(--shadow-soft);\n}"));
        assert!(css.contains(".font-sans {\n  font-family: var(--font-sans);\n}"));
    }

    #[test]
    fn test_empty_theme() {
        let theme = ThemeConfig {
            font_sans: Vec::new(),
            colors: BTreeMap::new(),
            shadows: BTreeMap::new(),
        };
        assert_eq!(ThemeTokens::from_config(&theme).to_css(), ":root {\n}\n");
    }
}
