//! # sf-cli
//!
//! Command-line front end for SmartFood.
//!
//! - `smartfood goal status/init/refresh/set` - inspect and set the nutrition goal
//! - `smartfood balance` / `progress` - today's balance and deficit history
//! - `smartfood analyze/record/quick-record` - recognise and log meals
//! - `smartfood foods ...` - browse the food catalogue
//! - `smartfood system ...` - where the service is reachable
//! - `smartfood nav <path>` - run the goal gate against a route

mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use sf_api::{ProgressRange, ServiceClient};
use sf_goal::{FileStore, GoalManager};
use tracing_subscriber::EnvFilter;

use crate::commands::Context;
use crate::config::AppConfig;

/// SmartFood: photo-based calorie and protein tracking.
#[derive(Parser)]
#[command(name = "smartfood", version, about)]
struct Cli {
    /// Configuration file.
    #[arg(long, default_value = "smartfood.toml")]
    config: PathBuf,

    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or set the nutrition goal.
    Goal {
        #[command(subcommand)]
        command: commands::goal::GoalCommands,
    },
    /// Show today's remaining calories and protein.
    Balance,
    /// Show the calorie deficit history.
    Progress {
        #[arg(long, value_enum, default_value_t = RangeArg::All)]
        range: RangeArg,
    },
    /// Recognise the food in a photo.
    Analyze {
        /// Image file to upload.
        image: PathBuf,
    },
    /// Record a meal for a recognised portion.
    Record {
        /// Image reference stored with the record.
        #[arg(long, default_value = "")]
        image_url: String,
        /// Recognised food name.
        #[arg(long)]
        food: String,
        /// Portion id chosen from `analyze` or `foods portions`.
        #[arg(long)]
        portion: u64,
    },
    /// Record a meal by portion id, without a photo.
    QuickRecord {
        portion: u64,
    },
    /// Browse the food catalogue.
    Foods {
        #[command(subcommand)]
        command: commands::food::FoodCommands,
    },
    /// Show where the service can be reached.
    System {
        #[command(subcommand)]
        command: commands::system::SystemCommands,
    },
    /// Check whether navigation to a route would be allowed.
    Nav {
        /// Route path, e.g. "/record".
        path: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RangeArg {
    Week,
    Month,
    All,
}

impl From<RangeArg> for ProgressRange {
    fn from(range: RangeArg) -> Self {
        match range {
            RangeArg::Week => ProgressRange::Week,
            RangeArg::Month => ProgressRange::Month,
            RangeArg::All => ProgressRange::All,
        }
    }
}

fn init_logging(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("sf_api=info".parse()?)
        .add_directive("sf_goal=info".parse()?)
        .add_directive("sf_cli=info".parse()?);

    // Logs go to stderr so command output on stdout stays clean.
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    let mut config = AppConfig::load_or_default(&cli.config);
    config.apply_env();

    let client = Arc::new(ServiceClient::new(&config.client)?);
    let store = Arc::new(FileStore::new(&config.goal.store_path)?);
    let session = Arc::new(FileStore::new(config.session_path())?);
    let goals = GoalManager::new(client.clone(), store, config.goal.decision_deadline());
    let ctx = Context {
        client,
        goals,
        session,
        settle_timeout: config.client.request_timeout(),
    };

    match &cli.command {
        Commands::Goal { command } => commands::goal::execute(command, &ctx).await,
        Commands::Balance => commands::record::balance(&ctx).await,
        Commands::Progress { range } => commands::record::progress(&ctx, (*range).into()).await,
        Commands::Analyze { image } => commands::record::analyze(&ctx, image).await,
        Commands::Record {
            image_url,
            food,
            portion,
        } => commands::record::record(&ctx, image_url, food, *portion).await,
        Commands::QuickRecord { portion } => commands::record::quick_record(&ctx, *portion).await,
        Commands::Foods { command } => commands::food::execute(command, &ctx).await,
        Commands::System { command } => commands::system::execute(command, &ctx).await,
        Commands::Nav { path } => commands::nav::execute(&ctx, path).await,
    }
}
