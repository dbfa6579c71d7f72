//! KULTR CLI - Database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! kultr-cli migrate
//!
//! # Create a user
//! kultr-cli user create -n "Kim Lee" -e kim@kultr.store -r admin
//!
//! # List users (newest first)
//! kultr-cli user list --search kim
//!
//! # Dashboard counters
//! kultr-cli user stats
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "kultr-cli")]
#[command(author, version, about = "KULTR CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run admin database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address (must be unique)
        #[arg(short, long)]
        email: String,

        /// Free-text role (defaults to `user`)
        #[arg(short, long)]
        role: Option<String>,
    },
    /// List users, newest first
    List {
        /// Case-insensitive match on name or email
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum rows to show
        #[arg(short, long, default_value_t = 25)]
        limit: i64,
    },
    /// Show user counters
    Stats,
}

#[tokio::main]
async fn main() {
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
        Commands::User { action } => match action {
            UserAction::Create { name, email, role } => {
                commands::users::create(&name, &email, role.as_deref()).await?;
            }
            UserAction::List { search, limit } => commands::users::list(search, limit).await?,
            UserAction::Stats => commands::users::stats().await?,
        },
    }
    Ok(())
}
