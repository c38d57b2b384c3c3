//! DigitDraw CLI - Database migrations and credit reconciliation.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! digitdraw-cli migrate
//!
//! # Manually grant credits (e.g., to reconcile a charge that was taken
//! # at the gateway but never credited because the ledger write failed)
//! digitdraw-cli grant -e user@example.com -c 5 --charge-id ch_123
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `grant` - Grant credits to a user, recording a purchase row

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "digitdraw-cli")]
#[command(author, version, about = "DigitDraw CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Grant credits to a user, recording a purchase row
    Grant {
        /// Email of the user to credit
        #[arg(short, long)]
        email: String,

        /// Number of credits to grant
        #[arg(short, long)]
        credits: u32,

        /// Gateway charge id being reconciled, if any
        #[arg(long)]
        charge_id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Grant {
            email,
            credits,
            charge_id,
        } => {
            commands::grant::run(&email, credits, charge_id.as_deref()).await?;
        }
    }
    Ok(())
}
