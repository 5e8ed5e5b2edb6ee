//! CLI administration tool for url-registry.
//!
//! Works directly against the configured backend, without the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Issue an identity token (random user id unless one is given)
//! cargo run --bin admin -- token sign
//! cargo run --bin admin -- token sign 0b6c3ae4-5c5e-4a7b-9a59-1d7a2f7c1e11
//!
//! # Check a token
//! cargo run --bin admin -- token verify <token>
//!
//! # Shorten, resolve and list URLs
//! cargo run --bin admin -- url shorten https://example.com --user <uuid>
//! cargo run --bin admin -- url resolve abcd1234
//! cargo run --bin admin -- url list <uuid>
//!
//! # Check the backend
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `COOKIE_SECRET` is required, and the backend is chosen
//! by `DATABASE_DSN` / `FILE_STORAGE_PATH` / `STORAGE`.

use url_registry::application::UrlUseCases;
use url_registry::application::commands::{
    CreateUrlCommand, GetUrlByHashCommand, GetUrlsByUserIdCommand,
};
use url_registry::application::services::IdentitySigner;
use url_registry::config::{self, Config, StorageKind};
use url_registry::domain::UrlRegistry;
use url_registry::domain::repositories::UrlStorage;
use url_registry::error::AppError;
use url_registry::server::build_storage;
use url_registry::utils::code_generator::RandomHashGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for managing url-registry.
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
    /// Issue and check identity tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Work with stored URLs
    Url {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Backend operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Sign a user id (a random one if omitted)
    Sign { user_id: Option<Uuid> },

    /// Verify a token and print its user id
    Verify { token: String },
}

#[derive(Subcommand)]
enum UrlAction {
    /// Register a URL
    Shorten {
        url: String,

        /// Owner of the new record
        #[arg(short, long)]
        user: Option<Uuid>,
    },

    /// Show the URL behind a hash
    Resolve { hash: String },

    /// List URLs owned by a user
    List { user_id: Uuid },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check that the backend is reachable
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &config),
        Commands::Url { action } => handle_url_action(action, &config).await,
        Commands::Db { action } => handle_db_action(action, &config).await,
    }
}

fn handle_token_action(action: TokenAction, config: &Config) -> Result<()> {
    let signer = IdentitySigner::new(config.cookie_secret.as_bytes());

    match action {
        TokenAction::Sign { user_id } => {
            let user_id = user_id.unwrap_or_else(Uuid::new_v4);
            let token = signer.sign(&user_id.to_string());

            println!("{}", "🔑 Identity token".bright_blue().bold());
            println!();
            println!("  User:  {}", user_id.to_string().cyan());
            println!("  Token: {}", token.bright_yellow().bold());
            println!();
            println!("  Cookie: {}={}", "user_id".bright_cyan(), token);
        }
        TokenAction::Verify { token } => match signer.verify(&token) {
            Ok(user_id) => {
                println!("{}", "✅ Valid token".green().bold());
                println!("  User: {}", user_id.cyan());
            }
            Err(e) => {
                println!("{} {}", "❌ Invalid token:".red().bold(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

async fn handle_url_action(action: UrlAction, config: &Config) -> Result<()> {
    if config.storage == StorageKind::Memory {
        println!(
            "{}",
            "⚠️  Memory storage is empty on every start; set DATABASE_DSN or FILE_STORAGE_PATH"
                .yellow()
        );
    }

    let storage = build_storage(config).await?;
    let use_cases = UrlUseCases::new(
        Arc::new(UrlRegistry::new(storage)),
        Arc::new(RandomHashGenerator::default()),
        config.timeouts(),
    );

    match action {
        UrlAction::Shorten { url, user } => {
            let command = CreateUrlCommand {
                original_url: url,
                correlation_id: None,
                user_id: user,
            };

            match use_cases.create.execute(command).await {
                Ok(record) => {
                    println!("{}", "✅ URL registered".green().bold());
                    println!("  Short: {}{}", config.base_url, record.hash.bright_yellow());
                }
                Err(AppError::DuplicateEntry {
                    existing_hash: Some(hash),
                    ..
                }) => {
                    println!("{}", "⚠️  URL already registered".yellow());
                    println!("  Short: {}{}", config.base_url, hash.bright_yellow());
                }
                Err(e) => return Err(e).context("Failed to register URL"),
            }
        }
        UrlAction::Resolve { hash } => {
            let record = use_cases
                .get_by_hash
                .execute(GetUrlByHashCommand { hash })
                .await
                .context("Lookup failed")?;

            println!("  Hash:     {}", record.hash.cyan());
            println!("  URL:      {}", record.original_url);
            println!(
                "  Created:  {}",
                record
                    .created_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .bright_black()
            );
            if let Some(user_id) = record.user_id {
                println!("  Owner:    {}", user_id.to_string().bright_black());
            }
        }
        UrlAction::List { user_id } => {
            let records = use_cases
                .get_by_user_id
                .execute(GetUrlsByUserIdCommand { user_id })
                .await
                .context("Lookup failed")?;

            println!("{}", "📋 User URLs".bright_blue().bold());
            println!();

            if records.is_empty() {
                println!("{}", "  No URLs found".yellow());
                return Ok(());
            }

            println!(
                "  {:<10} {}",
                "Hash".bright_white().bold(),
                "Original URL".bright_white().bold()
            );
            println!("  {}", "─".repeat(60).bright_black());

            for record in &records {
                println!("  {:<10} {}", record.hash.cyan(), record.original_url);
            }

            println!();
            println!(
                "  Total: {}",
                records.len().to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking backend...".bright_blue());

            let storage = build_storage(config).await?;
            storage.ping().await.context("Backend ping failed")?;

            println!(
                "{} ({})",
                "✅ Backend is reachable".green().bold(),
                config.storage.name()
            );
        }
    }

    Ok(())
}
