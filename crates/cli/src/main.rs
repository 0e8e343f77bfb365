//! Storekeep CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sk-cli migrate
//!
//! # Load demo users, stores, products, orders and reviews
//! sk-cli seed
//!
//! # Remove all seeded data
//! sk-cli seed --undo
//!
//! # Create a user
//! sk-cli user create -e seller@example.com -u seller -p 'a-long-password'
//! ```
//!
//! # Environment Variables
//!
//! - `STOREKEEP_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sk-cli")]
#[command(author, version, about = "Storekeep CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo data
    Seed {
        /// Delete all rows instead of inserting
        #[arg(long)]
        undo: bool,
    },
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
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { undo: false } => commands::seed::run().await?,
        Commands::Seed { undo: true } => commands::seed::undo().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                username,
                password,
            } => {
                commands::user::create(&email, &username, &password).await?;
            }
        },
    }
    Ok(())
}
