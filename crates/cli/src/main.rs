//! Game Rankings CLI
//!
//! Command-line interface for rebuilding and inspecting leaderboards.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use rankings_cli::commands::leaderboard::PageSelector;
use rankings_cli::commands::{categories, leaderboard, migrate, registry, update, CommandContext};
use rankings_cli::output::{colors, spinner, OutputFormat};
use rankings_cli::Render;
use rankings_common::{init_tracing, AppConfig};

/// Output format for CLI commands
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum CliOutputFormat {
    /// JSON output
    Json,
    /// Table output (default)
    #[default]
    Table,
    /// Plain text output
    Plain,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "rankings")]
#[command(author, version, about = "Game Rankings CLI")]
#[command(long_about = "Command-line interface for the game rankings engine.\n\n\
    Rebuild a single leaderboard, inspect categories and pages, and manage the schema.")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value = "table")]
    format: CliOutputFormat,

    /// Database connection URL (overrides config)
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recompute one leaderboard immediately
    #[command(alias = "u")]
    UpdateRankings {
        /// Category id (e.g. bp, eventLocationCompletion)
        category: String,

        /// Subcategory id (e.g. all, 2024-05)
        subcategory: String,

        /// Game id
        game: String,
    },

    /// List the ranking categories of a game
    #[command(alias = "c")]
    Categories {
        /// Game id
        game: String,
    },

    /// Show one leaderboard page
    #[command(alias = "p")]
    Page {
        /// Game id
        game: String,

        /// Category id
        category: String,

        /// Subcategory id
        subcategory: String,

        /// Page number
        #[arg(long, conflicts_with = "player")]
        page: Option<String>,

        /// Show the page this player appears on
        #[arg(long)]
        player: Option<String>,
    },

    /// Discover the category registry of a game
    Registry {
        /// Game id
        game: String,

        /// Persist the registry of every configured game
        #[arg(long)]
        persist: bool,
    },

    /// Apply database migrations
    Migrate,
}

fn print(value: &impl Render, format: OutputFormat) -> Result<()> {
    println!("{}", value.render(format)?);
    Ok(())
}

async fn execute(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }

    let format: OutputFormat = cli.format.into();
    let ctx = CommandContext::connect(&config, format).await?;

    match cli.command {
        Commands::UpdateRankings {
            category,
            subcategory,
            game,
        } => {
            let pb = spinner(&format!("Updating {}/{} for {}...", category, subcategory, game));
            let result = update::update_rankings(&ctx, &category, &subcategory, &game).await;
            pb.finish_and_clear();
            print(&result?, format)
        }
        Commands::Categories { game } => print(&categories::list(&ctx, &game).await?, format),
        Commands::Page {
            game,
            category,
            subcategory,
            page,
            player,
        } => {
            let selector = PageSelector { page, player };
            let page = leaderboard::show(&ctx, &game, &category, &subcategory, selector).await?;
            print(&page, format)
        }
        Commands::Registry { game, persist } => {
            let pb = spinner(&format!("Discovering categories for {}...", game));
            let result = registry::show(&ctx, &game, persist).await;
            pb.finish_and_clear();
            print(&result?, format)
        }
        Commands::Migrate => {
            migrate::run(&ctx).await?;
            println!("{}", colors::success("Migrations applied"));
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let log_level = if cli.verbose { "debug" } else { "warn" };
    init_tracing("rankings-cli", false, log_level)?;

    let verbose = cli.verbose;
    if let Err(e) = execute(cli).await {
        use colored::Colorize;
        eprintln!("{} {}", "Error:".red().bold(), e);
        if verbose {
            eprintln!("\n{}", colors::dim("Backtrace:"));
            eprintln!("{:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}
