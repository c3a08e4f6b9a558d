//! TechFix-IT CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply the schema and the session table
//! tf-cli migrate
//!
//! # Create an admin account (password from --password or ADMIN_PASSWORD)
//! tf-cli admin create -e admin@example.com -n "Admin Name"
//!
//! # Reset an admin's password
//! tf-cli admin set-password -e admin@example.com
//!
//! # Insert the privacy policy and terms of service pages if missing
//! tf-cli seed legal
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tf-cli")]
#[command(author, version, about = "TechFix-IT CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed fixed content
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Initial password
        #[arg(short, long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Replace an admin's password
    SetPassword {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// New password
        #[arg(short, long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the privacy policy and terms of service if they are missing
    Legal,
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
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => {
                commands::admin::create_user(&email, &name, &password).await?;
            }
            AdminAction::SetPassword { email, password } => {
                commands::admin::set_password(&email, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Legal => {
                commands::seed::legal_pages().await?;
            }
        },
    }
    Ok(())
}
