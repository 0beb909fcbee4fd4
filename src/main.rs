//! CLI entry point for blogdb

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogdb::commands;
use blogdb::config::Settings;
use blogdb::prompt::StdinPrompt;
use blogdb::Blog;

#[derive(Parser)]
#[command(name = "blogdb")]
#[command(version)]
#[command(about = "A static blog generator backed by a SQLite content store", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Template directory (overrides blog.toml)
    #[arg(short, long, global = true)]
    templates: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the blog database and default templates
    Init {
        /// Base URL of the blog, including any preceding folders
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Add a post from a markdown file
    Add {
        /// Markdown source file
        file: PathBuf,

        /// Short description of the post
        #[arg(long)]
        desc: Option<String>,
    },

    /// Update a post from a new source file, or rebuild every post
    #[command(alias = "u")]
    Update {
        /// Post id (omit to rebuild everything)
        id: Option<i64>,

        /// New markdown source file
        file: Option<PathBuf>,

        /// New description of the post
        #[arg(long)]
        desc: Option<String>,
    },

    /// Remove a post
    Rm {
        /// Post id
        id: i64,
    },

    /// List posts, newest first
    #[command(alias = "ls")]
    List {
        /// Maximum number of posts (0 for all)
        #[arg(short, long, default_value = "0")]
        limit: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogdb=debug,info"
    } else {
        "blogdb=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    let mut settings = Settings::load(&base_dir)?;
    if let Some(templates) = cli.templates {
        settings.template_dir = templates;
    }

    let mut prompt = StdinPrompt;

    if let Commands::Init { url } = &cli.command {
        let blog = commands::init::init_blog(settings, url.as_deref(), &mut prompt)?;
        println!(
            "Initialized blog in {:?} ({})",
            base_dir,
            blog.store.config().host_url
        );
        return Ok(());
    }

    let blog = Blog::open_or_create(settings, &mut prompt)?;

    match cli.command {
        Commands::Init { .. } => {}

        Commands::Add { file, desc } => {
            let post = blog.add_post(&file, desc.as_deref(), &mut prompt)?;
            println!(
                "Added post {}: {}",
                post.id,
                blog.store.config().post_url(post.id)
            );
        }

        Commands::Update { id, file, desc } => match (id, file) {
            (None, None) => {
                let count = blog.update_all(&mut prompt)?;
                println!("Rebuilt {} post(s)", count);
            }
            (Some(id), Some(file)) => {
                let post = blog.update_post(id, &file, desc.as_deref(), &mut prompt)?;
                println!("Updated post {}: {}", post.id, post.title);
            }
            (Some(id), None) => bail!("missing source file to update post {}", id),
            (None, Some(_)) => bail!("missing post id to update"),
        },

        Commands::Rm { id } => {
            if blog.remove_post(id)? {
                println!("Removed post {}", id);
            }
        }

        Commands::List { limit, json } => {
            commands::list::run(&blog, limit, json)?;
        }
    }

    Ok(())
}
