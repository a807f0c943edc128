//! CLI administration tool for shortcode.
//!
//! Works directly against the configured database, without the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a short link
//! cargo run --bin admin -- create https://example.com/a --alias promo --ttl 3600
//!
//! # Inspect a short link (does not count a click)
//! cargo run --bin admin -- stats promo
//!
//! # Totals across the store
//! cargo run --bin admin -- summary
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`shortcode::config`].

use shortcode::application::services::MappingService;
use shortcode::config::{self, Config};
use shortcode::domain::entities::MappingState;
use shortcode::infrastructure::database::Database;
use shortcode::state::DynMappingService;

use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for managing shortcode.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Create {
        /// Target URL (http or https)
        url: String,

        /// Custom alias instead of a random code
        #[arg(short, long)]
        alias: Option<String>,

        /// Lifetime in seconds
        #[arg(short, long)]
        ttl: Option<i64>,
    },

    /// Show statistics for one short link
    Stats {
        /// Short code or alias
        code: String,
    },

    /// Show totals across all short links
    Summary,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Failed to load configuration")?;
    let database = Database::connect(&config.database.url, config.pool_settings())
        .await
        .context("Failed to connect to database")?;
    database.migrate().await?;

    let service = build_service(&database, &config);

    match cli.command {
        Commands::Create { url, alias, ttl } => create_link(&service, url, alias, ttl).await?,
        Commands::Stats { code } => show_stats(&service, &code).await?,
        Commands::Summary => show_summary(&service).await?,
        Commands::Db { action } => match action {
            DbAction::Check => check_database(&service, &database).await?,
        },
    }

    Ok(())
}

fn build_service(database: &Database, config: &Config) -> DynMappingService {
    MappingService::new(database.mapping_repository(), config.mapping_settings())
}

/// Creates a short link through the same service the API uses.
async fn create_link(
    service: &DynMappingService,
    url: String,
    alias: Option<String>,
    ttl: Option<i64>,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let ttl = ttl
        .map(|seconds| TimeDelta::try_seconds(seconds).context("TTL is out of range"))
        .transpose()?;

    let mapping = service
        .create(url, ttl, alias)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create short link: {}", e))?;

    println!("{}", "✅ Short link created!".green().bold());
    println!();
    println!("  Code:    {}", mapping.code.bright_yellow().bold());
    println!(
        "  URL:     {}",
        service.short_url(&mapping.code).bright_cyan()
    );
    println!("  Target:  {}", mapping.target.cyan());
    match mapping.expires_at {
        Some(expires_at) => println!(
            "  Expires: {}",
            expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().yellow()
        ),
        None => println!("  Expires: {}", "never".bright_black()),
    }
    println!();

    Ok(())
}

/// Displays one mapping without recording a click.
async fn show_stats(service: &DynMappingService, code: &str) -> Result<()> {
    println!("{}", "📊 Link Statistics".bright_blue().bold());
    println!();

    let mapping = service
        .get_stats(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", code, e))?;

    let status = match mapping.state_at(Utc::now()) {
        MappingState::Active => "ACTIVE".green(),
        MappingState::Expired => "EXPIRED".red(),
    };

    println!("  Code:    {}", mapping.code.bright_yellow().bold());
    println!("  Target:  {}", mapping.target.cyan());
    println!("  Status:  {}", status);
    println!(
        "  Clicks:  {}",
        mapping.click_count.to_string().bright_white().bold()
    );
    println!(
        "  Created: {}",
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    if let Some(expires_at) = mapping.expires_at {
        println!(
            "  Expires: {}",
            expires_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
                .bright_black()
        );
    }
    println!();

    Ok(())
}

/// Displays store-wide totals.
async fn show_summary(service: &DynMappingService) -> Result<()> {
    println!("{}", "📊 Summary".bright_blue().bold());
    println!();

    let summary = service
        .summary()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load summary: {}", e))?;

    println!(
        "  Links:  {}",
        summary.mappings.to_string().bright_white().bold()
    );
    println!(
        "  Clicks: {}",
        summary.clicks.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Checks the database connection.
async fn check_database(service: &DynMappingService, database: &Database) -> Result<()> {
    print!("Checking {} connection... ", database.backend_name());

    match service.check_storage().await {
        Ok(()) => {
            println!("{}", "✅ OK".green().bold());
            Ok(())
        }
        Err(e) => {
            println!("{}", "❌ FAILED".red().bold());
            Err(anyhow::anyhow!("Database check failed: {}", e))
        }
    }
}
