//! School Portal - Operator CLI
//!
//! Selects the storage backend exactly as the portal does at startup, then
//! runs one maintenance command against it.
//!
//! ```bash
//! portal check
//! portal seed
//! portal show --parent PO-2025-May-00001
//! portal verify --token 0b7e...
//! portal resend --email parent@example.com
//! ```

mod commands;

use clap::{Parser, Subcommand};
use portal_core::{select_backend, DatabaseConfig};

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Application name
pub const APP_NAME: &str = "portal";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// CLI
// =============================================================================

/// School portal storage operator
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Inspect and maintain the school portal store")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Database connection string (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the active backend and row counts
    Check,
    /// Insert a demo school, parent, students and notification
    Seed,
    /// Print the store, or one parent's dashboard, as JSON
    Show {
        /// Parent identifier, e.g. PO-2025-May-00001
        #[arg(long)]
        parent: Option<String>,
    },
    /// Confirm an account by its verification token
    Verify {
        /// Token from the verification link
        #[arg(long)]
        token: String,
    },
    /// Issue a new verification token for an unverified account
    Resend {
        /// Login email of the account
        #[arg(long)]
        email: String,
    },
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("{} v{}", APP_NAME, APP_VERSION);

    let mut config = DatabaseConfig::from_env();
    if let Some(url) = cli.database_url {
        config = config.with_url(url);
    }

    let selected = select_backend(&config).await;
    let store = selected.backend.as_ref();

    match cli.command {
        Command::Check => {
            let summary = commands::check(store, selected.kind).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Seed => {
            let report = commands::seed(store).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Show { parent } => {
            let value = commands::show(store, parent.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Verify { token } => {
            let parent = commands::verify(store, &token).await?;
            println!("{} verified", parent.parent_id);
        }
        Command::Resend { email } => {
            let parent = commands::resend(store, &email).await?;
            let token = parent.verification_token.unwrap_or_default();
            println!("{} new token: {}", parent.parent_id, token);
        }
    }

    Ok(())
}
