//! CLI administration tool for linkpulse.
//!
//! Inspects links and performs database operations without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Apply migrations
//! cargo run --bin admin -- db migrate
//!
//! # Show totals
//! cargo run --bin admin -- stats
//!
//! # Show analytics for one link
//! cargo run --bin admin -- analytics my-link
//! ```
//!
//! # Environment Variables
//!
//! Same database variables as the server (`DATABASE_URL` or `DB_*`).

use linkpulse::application::services::{AnalyticsReport, AnalyticsService, LinkService};
use linkpulse::config::{Config, mask_connection_string};
use linkpulse::infrastructure::persistence::{PgClickRepository, PgUrlRepository};
use linkpulse::server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkpulse.
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
    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Show link and click totals
    Stats,

    /// Show analytics for a short code
    Analytics {
        /// Short code or alias
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = server::connect_pool(&config).await?;

    let result = match cli.command {
        Commands::Db { action } => handle_db_action(action, &pool, &config).await,
        Commands::Stats => handle_stats(&pool).await,
        Commands::Analytics { code } => handle_analytics(&code, &pool, &config).await,
    };

    pool.close().await;
    result
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!(
                "{} {}",
                "Checking database connection:".bright_blue(),
                mask_connection_string(&config.database_url).bright_black()
            );

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✔ Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            println!("{}", "Applying migrations...".bright_blue());

            server::migrate(pool).await?;

            println!("{}", "✔ Migrations up to date".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Displays totals across all links.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await?;

    let expired_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE expires_at < NOW()")
            .fetch_one(pool)
            .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:   {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Expired: {}",
        expired_count.to_string().yellow().bold()
    );
    println!(
        "  Clicks:  {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Prints the same report `GET /api/analytics/{code}` returns.
///
/// # Output Format
///
/// ```text
/// Analytics for my-link
///
///   Target:   https://example.com
///   Created:  2025-01-15 10:30
///   Expires:  never
///   Clicks:   3
///
///   Geography
///     US         2
///     Unknown    1
///
///   Recent clicks
///     2025-01-15 10:41  8.8.8.8          US
/// ```
async fn handle_analytics(code: &str, pool: &PgPool, config: &Config) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let links = Arc::new(LinkService::new(
        Arc::new(PgUrlRepository::new(pool.clone())),
        config.base_url.clone(),
    ));
    let analytics = AnalyticsService::new(links, Arc::new(PgClickRepository::new(pool)));

    let report = fetch_report(&analytics, code).await?;
    print_report(&report);
    Ok(())
}

/// Loads the report, printing a failure line before returning the error so
/// the process exits non-zero.
async fn fetch_report(analytics: &AnalyticsService, code: &str) -> Result<AnalyticsReport> {
    match analytics.get_analytics(code).await {
        Ok(report) => Ok(report),
        Err(e) => {
            println!("{} {}", "✘".red().bold(), e.message().red());
            anyhow::bail!("analytics for {code} failed: {}", e.message());
        }
    }
}

fn print_report(report: &AnalyticsReport) {
    println!(
        "{} {}",
        "Analytics for".bright_blue().bold(),
        report.short_code.cyan().bold()
    );
    println!();
    println!("  Target:   {}", report.original_url.bright_white());
    println!(
        "  Created:  {}",
        report.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    let expires = report
        .expires_at
        .map(|e| e.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());
    println!("  Expires:  {}", expires.bright_black());
    println!(
        "  Clicks:   {}",
        report.click_count.to_string().bright_green().bold()
    );
    println!();

    println!("  {}", "Geography".bright_white().bold());
    if report.geography.is_empty() {
        println!("    {}", "No clicks yet".yellow());
    }
    for (country, count) in &report.geography {
        println!("    {:<10} {}", country.cyan(), count);
    }
    println!();

    println!("  {}", "Recent clicks".bright_white().bold());
    for click in &report.recent_clicks {
        println!(
            "    {}  {:<16} {}",
            click.clicked_at.format("%Y-%m-%d %H:%M").to_string().bright_black(),
            click.ip_address.as_deref().unwrap_or("-"),
            click.country.cyan()
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkpulse::domain::entities::NewUrlMapping;
    use linkpulse::domain::repositories::UrlRepository;
    use linkpulse::infrastructure::persistence::InMemoryStore;

    fn analytics_over(store: Arc<InMemoryStore>) -> AnalyticsService {
        let links = Arc::new(LinkService::new(store.clone(), "http://sho.rt"));
        AnalyticsService::new(links, store)
    }

    #[tokio::test]
    async fn test_unknown_code_is_an_error() {
        let analytics = analytics_over(Arc::new(InMemoryStore::new()));

        let err = fetch_report(&analytics, "missing").await.unwrap_err();

        assert!(err.to_string().contains("URL not found"));
    }

    #[tokio::test]
    async fn test_known_code_returns_report() {
        let store = Arc::new(InMemoryStore::new());
        store
            .create(NewUrlMapping {
                original_url: "https://example.com".to_string(),
                short_code: "known".to_string(),
                expires_at: None,
            })
            .await
            .unwrap();

        let report = fetch_report(&analytics_over(store), "known").await.unwrap();

        assert_eq!(report.short_code, "known");
        assert_eq!(report.click_count, 0);
    }
}
