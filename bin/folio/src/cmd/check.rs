//! Check command - validate configuration, content and layout references

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use folio_core::{Config, ContentPath, slug::is_canonical};
use folio_generator::{LayoutBinder, LayoutTable};
use folio_parser::ParserRegistry;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Unlike a build, every problem is collected before reporting.
pub fn run(config_path: &Path, strict: bool) -> Result<ValidationResult> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let result = validate(config_path);

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(result)
}

/// Run every check and collect the findings.
pub fn validate(config_path: &Path) -> ValidationResult {
    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e}");
            result.add_error(format!("Configuration error: {e}"));
            return result;
        }
    };
    check_config_values(&config, &mut result);

    println!("\nChecking layouts...");
    let layouts = match LayoutTable::from_config(&config) {
        Ok(table) => {
            let keys: Vec<_> = table.keys().collect();
            println!("  ✓ {} layout(s): {}", table.len(), keys.join(", "));
            Some(table)
        }
        Err(e) => {
            println!("  ✗ {e}");
            result.add_error(e.to_string());
            None
        }
    };

    let content_dir = config.content_dir();
    if content_dir.is_dir() {
        println!("\nChecking content files...");
        validate_content_files(&config, &content_dir, layouts.as_ref(), &mut result);
    } else {
        result.add_warning(format!(
            "Content directory does not exist: {}",
            content_dir.display()
        ));
    }

    result
}

/// Parse every content file and bind it against the layout table.
fn validate_content_files(
    config: &Config,
    dir: &Path,
    layouts: Option<&LayoutTable>,
    result: &mut ValidationResult,
) {
    let registry = ParserRegistry::with_theme(&config.build.syntax_theme);
    let binder = layouts.map(LayoutBinder::new);
    let mut checked = 0;
    let mut failed = 0;

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let relative = path.strip_prefix(dir).unwrap_or(path);
        let Some(content_path) = ContentPath::from_path(relative, &config.content.extensions)
        else {
            continue;
        };

        checked += 1;

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                result.add_error(format!("{}: Failed to read file: {e}", path.display()));
                failed += 1;
                continue;
            }
        };

        let parsed = match registry.parse(&content, path) {
            Ok(parsed) => parsed,
            Err(e) => {
                result.add_error(format!("{}: Parse error: {e}", path.display()));
                failed += 1;
                continue;
            }
        };

        if let Some(binder) = &binder
            && let Err(e) = binder.bind(&parsed, path)
        {
            result.add_error(e.to_string());
            failed += 1;
            continue;
        }

        let route_slug = content_path.route_slug();
        if !route_slug.is_empty() && !is_canonical(route_slug) {
            result.add_warning(format!(
                "{}: slug '{route_slug}' is not lowercase-hyphenated",
                path.display()
            ));
        }
    }

    if failed == 0 {
        println!("  ✓ All {checked} content files valid");
    } else {
        println!("  ✗ {failed}/{checked} content files have errors");
    }
}

/// Check configuration values for common issues.
fn check_config_values(config: &Config, result: &mut ValidationResult) {
    if !config.site.base_url.starts_with("http") {
        result.add_warning("site.base_url should start with http:// or https://");
    }

    let output = config.output_dir();
    if output.exists() && !output.is_dir() {
        result.add_error(format!(
            "Output path exists but is not a directory: {}",
            output.display()
        ));
    }

    println!("  ✓ Configuration values checked");
}
