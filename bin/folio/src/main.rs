//! Folio CLI
//!
//! Static content pipeline: Markdown/MDX compilation, front matter layouts
//! and slug metadata resolution.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use folio::cmd;
use folio_core::config::DEFAULT_CONFIG_FILE;

/// Command-line interface for Folio.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "A static content pipeline for Markdown and MDX blogs"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the static site
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include draft content
        #[arg(long)]
        drafts: bool,
        /// Override site base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Validate configuration, content and layout references
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Print the page data for a blog slug as JSON
    Resolve {
        /// Slug to resolve (e.g., my-first-post)
        slug: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Treat the argument as a URL path and use its last segment
        #[arg(long)]
        path: bool,
        /// Look the slug up in the site's blog content instead of deriving it
        #[arg(long)]
        lookup: bool,
        /// Render the full blog page instead of printing JSON
        #[arg(long, conflicts_with = "pretty")]
        html: bool,
    },
    /// Create new content with front matter
    New {
        /// Path for the new content, relative to the content directory
        /// (e.g., blog/my-article)
        path: PathBuf,
        /// Layout key to put in the front matter
        #[arg(short, long, default_value = "blog", conflicts_with = "no_layout")]
        layout: String,
        /// Do not declare a layout
        #[arg(long)]
        no_layout: bool,
        /// Create an MDX file instead of Markdown
        #[arg(long)]
        mdx: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            drafts,
            base_url,
        } => {
            cmd::build::run(&cli.config, output.as_deref(), drafts, base_url.as_deref())?;
        }
        Commands::Check { strict } => {
            cmd::check::run(&cli.config, strict)?;
        }
        Commands::Resolve {
            slug,
            pretty,
            path,
            lookup,
            html,
        } => {
            let options = cmd::resolve::ResolveOptions {
                pretty,
                from_path: path,
                lookup,
                html,
            };
            cmd::resolve::run(&cli.config, &slug, options).await?;
        }
        Commands::New {
            path,
            layout,
            no_layout,
            mdx,
        } => {
            let layout = (!no_layout).then_some(layout.as_str());
            cmd::new::run(&cli.config, &path, layout, mdx)?;
        }
    }

    Ok(())
}
