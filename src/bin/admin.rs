//! CLI administration tool for TinyLink.
//!
//! Inspects and removes links and checks the database without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List active links
//! cargo run --bin admin -- links list
//!
//! # Show one link, deleted or not
//! cargo run --bin admin -- links show abc123
//!
//! # Soft-delete a link
//! cargo run --bin admin -- links delete abc123
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `BASE_URL` (optional): used to print full short URLs

use tinylink::application::services::LinkService;
use tinylink::config::Config;
use tinylink::domain::entities::Link;
use tinylink::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

type PgLinkService = LinkService<PgLinkRepository>;

/// CLI tool for managing TinyLink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List active links, newest first
    List,

    /// Show a single link, including deleted ones
    Show {
        /// Short code
        code: String,
    },

    /// Soft-delete a link
    Delete {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repo);

    match action {
        LinkAction::List => list_links(&service).await?,
        LinkAction::Show { code } => show_link(&service, &code).await?,
        LinkAction::Delete { code, yes } => delete_link(&service, &code, yes).await?,
    }

    Ok(())
}

/// Prints active links as a table.
///
/// # Output Format
///
/// ```text
/// Links
///
///   Code      Clicks   Created            URL
///   ─────────────────────────────────────────────────────────────
///   abc123    42       2025-01-15 10:30   https://example.com/page
/// ```
async fn list_links(service: &PgLinkService) -> Result<()> {
    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    let links = service
        .list_links()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<9} {:<8} {:<18} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<9} {:<8} {:<18} {}",
            link.code.cyan(),
            link.clicks.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Prints every stored field of one link.
async fn show_link(service: &PgLinkService, code: &str) -> Result<()> {
    let link = service
        .get_link_any(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    print_link(&link);
    Ok(())
}

/// Soft-deletes a link after confirmation.
///
/// Already deleted links are reported and left alone.
async fn delete_link(service: &PgLinkService, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Link".bright_blue().bold());
    println!();

    let link = service
        .get_link_any(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if link.deleted {
        println!("{}", "⚠️  This link is already deleted".yellow());
        return Ok(());
    }

    print_link(&link);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!();
    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

fn print_link(link: &Link) {
    let listen_addr = std::env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let base_url = Config::load_base_url(&listen_addr);
    let status = if link.deleted {
        "DELETED".red()
    } else {
        "ACTIVE".green()
    };
    let last_clicked = link
        .last_clicked
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    println!("  Code:         {}", link.code.cyan().bold());
    println!("  Short URL:    {}/{}", base_url, link.code);
    println!("  URL:          {}", link.url);
    println!("  Clicks:       {}", link.clicks.to_string().bright_green());
    println!(
        "  Created:      {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black()
    );
    println!("  Last clicked: {}", last_clicked.bright_black());
    println!("  Status:       {}", status);
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let (active, deleted, clicks): (i64, i64, i64) = sqlx::query_as(
                "SELECT COUNT(*) FILTER (WHERE NOT deleted), \
                        COUNT(*) FILTER (WHERE deleted), \
                        COALESCE(SUM(clicks), 0)::BIGINT \
                 FROM links",
            )
            .fetch_one(pool)
            .await?;

            println!("  PostgreSQL:    {}", version.bright_white());
            println!("  Active links:  {}", active.to_string().bright_green().bold());
            println!("  Deleted links: {}", deleted.to_string().bright_black());
            println!("  Total clicks:  {}", clicks.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
