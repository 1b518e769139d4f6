use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use cardstore::cli::{Cli, Command};
use cardstore::config::Config;
use cardstore::{Card, CardSummary, Store};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("{}", e))?;

    debug!(?level, "Logging initialized");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(url) = cli.url {
        config.store.url = url;
    }

    info!(url = %config.store.url, "cards starting");
    let store = Store::with_config(&config.store);

    match cli.command {
        Command::Query { query, limit } => {
            let query = query.join(" ");
            let cards = store.cards().await;
            let hits = cards.query(&query);
            if hits.is_empty() {
                println!("No cards match {}", query.yellow());
            }
            for card in hits.iter().take(limit) {
                print_summary(card);
            }
            if hits.len() > limit {
                println!("{}", format!("... and {} more", hits.len() - limit).dimmed());
            }
        }
        Command::Lookup { name } => {
            let name = name.join(" ");
            let cards = store.cards().await;
            match cards.lookup_normalized(&name) {
                Some(card) => print_card(card),
                None => println!("{} No card named {}", "✗".red(), name.yellow()),
            }
        }
        Command::Watch => {
            let cards = store.cards().await;
            println!("{} Loaded {} cards (etag {})", "✓".green(), cards.len(), store.etag().cyan());
            loop {
                tokio::select! {
                    cards = store.wait_for_update() => {
                        println!("{} Updated to {} cards (etag {})", "✓".green(), cards.len(), store.etag().cyan());
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("shutting down...");
                        break;
                    }
                }
            }
        }
    }

    store.close()?;
    Ok(())
}

fn print_summary(card: &Card) {
    let summary = CardSummary::from_card(card);
    println!("{}", summary.title.bold());
    if !summary.description.is_empty() {
        println!("  {}", summary.description.dimmed());
    }
}

fn print_card(card: &Card) {
    println!("{} {}", card.name.bold(), card.mana_cost.cyan());
    println!("{}", card.type_line);
    if !card.text.is_empty() {
        println!("{}", card.text);
    }
    if !card.power.is_empty() || !card.toughness.is_empty() {
        println!("{}/{}", card.power, card.toughness);
    }
    if !card.flavor.is_empty() {
        println!("{}", card.flavor.italic().dimmed());
    }
    for legality in &card.legalities {
        println!("  {}: {}", legality.format, legality.legality);
    }
    println!("{}", cardstore::render::image_url(&card.name).underline());
}
