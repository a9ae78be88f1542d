use clap::{Parser, Subcommand};
use inkpress::{config, context, generate, scan};
use std::path::{Path, PathBuf};
use tera::Tera;

#[derive(Parser)]
#[command(name = "inkpress")]
#[command(about = "Static site generator for markdown blogs")]
#[command(long_about = "\
Static site generator for markdown blogs

Your filesystem is the data source. The first line of every markdown file is
its title, the rest is the body, and the publication date lives inside the
file as an appended marker comment that survives copies and touches.

Content structure:

  site/
  ├── site.toml                # Site config (optional)
  ├── _posts/                  # Blog posts → yyyy/mm/dd/name.html
  │   ├── hello.md
  │   ├── _unlisted.md         # One underscore: rendered, not listed
  │   └── __draft.md           # Two underscores: never rendered
  ├── _templates/              # Tera templates, looked up by name
  │   ├── post.html
  │   ├── page.html
  │   └── index.html           # Front page (latest posts + pages)
  ├── index.json               # Root context, inherited by every page
  ├── about.md                 # Page → /about.html
  ├── about.json               # Page-local context overrides
  └── docs/
      ├── index.md             # Directory index → /docs/
      ├── index.json           # Directory context (overrides parent)
      └── setup.md             # Page → /docs/setup.html

Template resolution (first found wins):
  Own path (docs/setup.html) → directory (docs.html) → default (page.html)

Run 'inkpress gen-config' to print a documented site.toml.")]
#[command(version)]
struct Cli {
    /// Source directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Templates directory (default: <source>/_templates, see site.toml)
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "_site", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site: scan content, render everything to the output directory
    Build,
    /// Load and validate content and templates without writing output
    Check,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.source)?;
    config.validate()?;

    let templates_root = cli
        .templates
        .clone()
        .unwrap_or_else(|| cli.source.join(&config.templates_dir));
    if !templates_root.is_dir() {
        return Err(format!(
            "templates directory not found: {}",
            templates_root.display()
        )
        .into());
    }
    let tera = load_templates(&templates_root)?;

    match cli.command {
        Command::Build => {
            println!("==> Scanning {}", cli.source.display());
            let site = scan::scan(&cli.source, &config, &tera, &cli.output)?;

            println!("==> Rendering {} items → {}", site.items.len(), cli.output.display());
            let summary = generate::generate(&tera, &site, &config, &cli.output)?;

            println!(
                "==> Build complete: {} pages rendered, {} drafts skipped",
                summary.rendered, summary.skipped_drafts
            );
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site = scan::scan(&cli.source, &config, &tera, &cli.output)?;
            if context::try_resolve_template(&tera, &config.index_template).is_none() {
                return Err(format!(
                    "front page template not found: {}",
                    config.index_template
                )
                .into());
            }
            println!("==> Content is valid: {} items", site.items.len());
        }
        Command::GenConfig => unreachable!("handled before config load"),
    }

    Ok(())
}

/// Load every `.html` template under the templates root, named by relative
/// path.
fn load_templates(root: &Path) -> Result<Tera, tera::Error> {
    Tera::new(&format!("{}/**/*.html", root.display()))
}
