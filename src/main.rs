//! Terminal front end for the URL shortener client.
//!
//! Renders links and visit statistics; all behaviour lives in the library.
//!
//! # Usage
//!
//! ```bash
//! # Start a session
//! cargo run -- login --email me@example.com
//!
//! # Shorten, list, edit
//! cargo run -- shorten https://www.rust-lang.org
//! cargo run -- list
//! cargo run -- update abc123 https://doc.rust-lang.org --rename docs
//! cargo run -- delete docs
//!
//! # Statistics for every link, or one link
//! cargo run -- stats
//! cargo run -- stats abc123 --json
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing_subscriber::EnvFilter;

use shortener_dashboard::application::services::{LinkOverview, LinkReport};
use shortener_dashboard::config::{self, Config};
use shortener_dashboard::domain::analytics::{DailyBucket, MonthlyBucket};
use shortener_dashboard::prelude::*;

const BAR_WIDTH: u64 = 40;
const HISTORY_LIMIT: usize = 10;

/// Client for a URL shortening service.
#[derive(Parser)]
#[command(name = "shortener-dashboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        email: Option<String>,
    },

    /// End the session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Shorten a URL
    Shorten {
        url: String,
    },

    /// List your links
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Change the destination (and optionally the slug) of a link
    Update {
        slug: String,
        url: String,

        /// New slug
        #[arg(long, value_name = "NEW_SLUG")]
        rename: Option<String>,
    },

    /// Delete a link
    Delete {
        slug: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show visit statistics for all links, or one link in detail
    Stats {
        slug: Option<String>,

        /// Print JSON instead of charts
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    init_tracing(&config);
    config.print_summary();

    let state = AppState::from_config(&config).context("Failed to initialise client")?;
    let mut events = state.refresher.subscribe();

    let result = run(cli.command, &state).await;
    report_session_events(&mut events);

    if let Err(e) = &result
        && let Some(app_error) = e.downcast_ref::<AppError>()
    {
        tracing::debug!(error = %app_error.to_json(), "command failed");
    }

    result
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Prints a hint for session changes the command caused.
fn report_session_events(events: &mut broadcast::Receiver<SessionEvent>) {
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Invalidated { reason }) => {
                eprintln!();
                eprintln!("{} {}", "⚠️  Session ended:".yellow().bold(), reason);
                eprintln!(
                    "   Log in again with: {}",
                    "shortener-dashboard login".bright_cyan()
                );
            }
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

async fn run(command: Commands, state: &AppState) -> Result<()> {
    match command {
        Commands::Login { email } => login(state, email).await,
        Commands::Register { email } => register(state, email).await,
        Commands::Logout => logout(state).await,
        Commands::Whoami => whoami(state).await,
        Commands::Shorten { url } => shorten(state, &url).await,
        Commands::List { json } => list(state, json).await,
        Commands::Update { slug, url, rename } => update(state, slug, url, rename).await,
        Commands::Delete { slug, yes } => delete(state, &slug, yes).await,
        Commands::Stats { slug, json } => match slug {
            Some(slug) => link_stats(state, &slug, json).await,
            None => overview(state, json).await,
        },
    }
}

fn prompt_email(email: Option<String>) -> Result<String> {
    match email {
        Some(e) => Ok(e),
        None => Ok(Input::new().with_prompt("Email").interact_text()?),
    }
}

async fn login(state: &AppState, email: Option<String>) -> Result<()> {
    println!("{}", "🔑 Log in".bright_blue().bold());
    println!();

    let email = prompt_email(email)?;
    let password = Password::new().with_prompt("Password").interact()?;

    state.auth.login(&email, &password).await?;

    println!();
    println!("{}", "✅ Logged in".green().bold());
    Ok(())
}

async fn register(state: &AppState, email: Option<String>) -> Result<()> {
    println!("{}", "📝 Create account".bright_blue().bold());
    println!();

    let email = prompt_email(email)?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    let response = state.auth.register(&email, &password).await?;

    println!();
    println!("{}", "✅ Account created".green().bold());
    println!("  User ID: {}", response.user_id.bright_black());
    println!(
        "  Log in with: {}",
        format!("shortener-dashboard login --email {email}").bright_cyan()
    );
    Ok(())
}

async fn logout(state: &AppState) -> Result<()> {
    if !state.auth.is_authenticated() {
        println!("{}", "Not logged in".yellow());
        return Ok(());
    }

    state.auth.logout().await?;
    println!("{}", "👋 Logged out".green());
    Ok(())
}

async fn whoami(state: &AppState) -> Result<()> {
    let user = state.auth.current_user().await?;
    println!("  Email: {}", user.email.cyan());
    println!("  ID:    {}", user.id.bright_black());
    Ok(())
}

async fn shorten(state: &AppState, url: &str) -> Result<()> {
    let link = state.urls.create(url).await?;

    println!("{}", "✅ Short link created".green().bold());
    println!("  {}", state.urls.short_url(&link.slug).bright_yellow().bold());
    println!("  → {}", link.original_url.bright_black());
    Ok(())
}

async fn list(state: &AppState, json: bool) -> Result<()> {
    let links = state.urls.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  No links yet".yellow());
        println!(
            "  Create one with: {}",
            "shortener-dashboard shorten <URL>".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<12} {:<32} {}",
        "Slug".bright_white().bold(),
        "Short URL".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<12} {:<32} {}",
            link.slug.cyan(),
            state.urls.short_url(&link.slug),
            link.original_url.bright_black()
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    Ok(())
}

async fn update(
    state: &AppState,
    slug: String,
    url: String,
    rename: Option<String>,
) -> Result<()> {
    let mut change = LinkUpdate::url(slug, url);
    if let Some(new_slug) = rename {
        change = change.with_new_slug(new_slug);
    }

    let link = state.urls.update(&change).await?;

    println!("{}", "✅ Link updated".green().bold());
    println!("  {}", state.urls.short_url(&link.slug).bright_yellow());
    println!("  → {}", link.original_url.bright_black());
    Ok(())
}

async fn delete(state: &AppState, slug: &str, skip_confirm: bool) -> Result<()> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {}?", state.urls.short_url(slug)))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    state.urls.delete(slug).await?;
    println!("{}", "✅ Link deleted".green().bold());
    Ok(())
}

async fn overview(state: &AppState, json: bool) -> Result<()> {
    let rows = state.dashboard.overview().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    if rows.is_empty() {
        println!("{}", "  No links yet".yellow());
        return Ok(());
    }

    print_overview(&rows);
    Ok(())
}

fn print_overview(rows: &[LinkOverview]) {
    println!(
        "  {:<12} {:>8} {:<18} {}",
        "Slug".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Last visit".bright_white().bold(),
        "Short URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for row in rows {
        let last_visit = row
            .last_visit
            .map(format_local)
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<12} {:>8} {:<18} {}",
            row.link.slug.cyan(),
            row.clicks.to_string().bright_white(),
            last_visit.bright_black(),
            row.short_url
        );
    }

    let total: u64 = rows.iter().map(|row| row.clicks).sum();
    println!();
    println!("  Total clicks: {}", total.to_string().bright_white().bold());
}

async fn link_stats(state: &AppState, slug: &str, json: bool) -> Result<()> {
    let report = state.dashboard.link_report(slug, &Local::now()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &LinkReport) {
    println!(
        "{} {}",
        "📊".bright_blue(),
        report.short_url.bright_yellow().bold()
    );
    println!("   → {}", report.link.original_url.bright_black());
    println!();

    let Some(summary) = report.summary else {
        println!("{}", "  No visits yet".yellow());
        return;
    };

    println!("  Today:      {}", summary.today.to_string().bright_white().bold());
    println!("  Yesterday:  {}", summary.yesterday);
    println!("  Last week:  {}", summary.last_week);
    println!("  Last month: {}", summary.last_month);
    println!("  Total:      {}", summary.total.to_string().bright_white().bold());
    println!();

    println!("{}", "Last 14 days".bright_white().bold());
    print_daily(&report.daily);
    println!();

    println!("{}", "Last 6 months".bright_white().bold());
    print_monthly(&report.monthly);
    println!();

    println!("{}", "Recent visits".bright_white().bold());
    for visit in report.history.iter().take(HISTORY_LIMIT) {
        println!("  {}", format_local(visit.visited_at).bright_black());
    }
    if report.history.len() > HISTORY_LIMIT {
        println!(
            "  {}",
            format!("… and {} more", report.history.len() - HISTORY_LIMIT).bright_black()
        );
    }
}

fn print_daily(buckets: &[DailyBucket]) {
    let max = buckets.iter().map(|b| b.visits).max().unwrap_or(0);
    for bucket in buckets {
        println!(
            "  {} {:<7} {:>5} {}",
            bucket.weekday_label.bright_black(),
            bucket.display_label,
            bucket.visits,
            bar(bucket.visits, max).green()
        );
    }
}

fn print_monthly(buckets: &[MonthlyBucket]) {
    let max = buckets.iter().map(|b| b.visits).max().unwrap_or(0);
    for bucket in buckets {
        println!(
            "  {:<8} {:>7} {}",
            bucket.display_label,
            bucket.visits,
            bar(bucket.visits, max).cyan()
        );
    }
}

fn bar(value: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let width = (value * BAR_WIDTH).div_ceil(max);
    "█".repeat(width as usize)
}

fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
