//! Resolve command - print the page data for a blog slug

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use folio_core::{Config, ContentMetadataSource, slug::route_segment};
use folio_generator::{BlogRoute, ContentCollector, LayoutTable, PageIndex, PageRenderer};

/// Flags for [`run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Pretty-print JSON.
    pub pretty: bool,
    /// The argument is a URL path; resolve its last segment.
    pub from_path: bool,
    /// Use the site's blog content as the metadata source.
    pub lookup: bool,
    /// Print the rendered page instead of JSON.
    pub html: bool,
}

impl ResolveOptions {
    /// Whether the site configuration is needed at all.
    fn needs_config(&self) -> bool {
        self.lookup || self.html
    }
}

/// Run the resolve command and print the result to stdout.
pub async fn run(config_path: &Path, input: &str, options: ResolveOptions) -> Result<()> {
    let output = render(config_path, input, options).await?;
    println!("{output}");
    Ok(())
}

/// Produce the command output without printing it.
///
/// Plain slug derivation needs no configuration file; `--lookup` and
/// `--html` load the site.
pub async fn render(config_path: &Path, input: &str, options: ResolveOptions) -> Result<String> {
    let slug = if options.from_path {
        route_segment(input)
    } else {
        input
    };
    tracing::info!(slug, ?options, "Resolving slug");

    if !options.needs_config() {
        let data = ContentMetadataSource::StaticDerivation
            .load(slug)
            .await
            .wrap_err_with(|| format!("Failed to resolve '{slug}'"))?;
        return to_json(&data, options.pretty);
    }

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let layouts = LayoutTable::from_config(&config).wrap_err("Failed to load layouts")?;

    let content = ContentCollector::new(&config)
        .collect()
        .wrap_err("Failed to collect content")?;

    let source = if options.lookup {
        ContentMetadataSource::remote(PageIndex::from_content(&content))
    } else {
        ContentMetadataSource::StaticDerivation
    };

    let route = BlogRoute::new(source, PageRenderer::new(&config, &layouts))
        .wrap_err("Blog route is unavailable")?;

    if options.html {
        let compiled = content
            .get(&format!("blog/{slug}"))
            .map(|doc| &doc.parsed);
        return route
            .render(slug, compiled)
            .await
            .wrap_err_with(|| format!("Failed to render '{slug}'"));
    }

    let data = route
        .load(slug)
        .await
        .wrap_err_with(|| format!("Failed to resolve '{slug}'"))?;
    to_json(&data, options.pretty)
}

fn to_json(data: &folio_core::PageData, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(data)
    } else {
        serde_json::to_string(data)
    };
    json.wrap_err("Failed to serialize page data")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn site(root: &Path) -> std::path::PathBuf {
        let config_path = root.join("folio.toml");
        fs::write(
            &config_path,
            r#"
[site]
title = "Resolve"
base_url = "https://resolve.example.com"

[content]
dir = "content"
"#,
        )
        .unwrap();
        fs::create_dir_all(root.join("content/blog")).unwrap();
        fs::write(
            root.join("content/blog/hello-world.md"),
            "---\nlayout: blog\ntitle: Hi Everyone\ndescription: Greetings.\n---\n\nBody text.\n",
        )
        .unwrap();
        config_path
    }

    #[tokio::test]
    async fn test_resolve_static_needs_no_config() {
        let out = render(
            Path::new("does-not-exist.toml"),
            "my-first-post",
            ResolveOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            out,
            r#"{"slug":"my-first-post","meta":{"title":"My First Post","description":"This is the my-first-post blog post."}}"#
        );
    }

    #[tokio::test]
    async fn test_resolve_from_path() {
        let options = ResolveOptions {
            from_path: true,
            ..Default::default()
        };
        let out = render(Path::new("x.toml"), "/blog/hello-world/", options)
            .await
            .unwrap();
        assert!(out.contains(r#""title":"Hello World""#));
    }

    #[tokio::test]
    async fn test_resolve_pretty() {
        let options = ResolveOptions {
            pretty: true,
            ..Default::default()
        };
        let out = render(Path::new("x.toml"), "a", options).await.unwrap();
        assert!(out.contains("\n  \"slug\": \"a\""));
    }

    #[tokio::test]
    async fn test_resolve_lookup() {
        let dir = TempDir::new().unwrap();
        let config_path = site(dir.path());
        let options = ResolveOptions {
            lookup: true,
            ..Default::default()
        };

        let out = render(&config_path, "hello-world", options).await.unwrap();
        assert!(out.contains(r#""title":"Hi Everyone""#));
        assert!(out.contains(r#""description":"Greetings.""#));

        let err = render(&config_path, "missing", options).await.unwrap_err();
        assert!(format!("{err:?}").contains("no content found for slug 'missing'"));
    }

    #[tokio::test]
    async fn test_resolve_html() {
        let dir = TempDir::new().unwrap();
        let config_path = site(dir.path());
        let options = ResolveOptions {
            html: true,
            ..Default::default()
        };

        let out = render(&config_path, "hello-world", options).await.unwrap();
        assert!(out.contains("<h1 class=\"blog-post__title\">Hi Everyone</h1>"));
        assert!(out.contains("<p>Body text.</p>"));

        // no compiled document: the derived metadata still renders
        let out = render(&config_path, "not-written-yet", options).await.unwrap();
        assert!(out.contains("<h1 class=\"blog-post__title\">Not Written Yet</h1>"));
    }
}
