#[macro_use]
extern crate tracing;

#[macro_use]
extern crate eyre;

mod core;

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use tokio::{runtime::Builder as RuntimeBuilder, signal};
use tsuki_psql::{Database, PoolConfig, PoolRunner};

use crate::core::{logging, BotConfig, Context};

#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Connect to all services and run until Ctrl+C
    Run,
    /// Database management
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Create all tables
    Init,
}

fn main() {
    let args = Args::parse();

    let runtime = RuntimeBuilder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Could not build runtime");

    if let Err(err) = dotenvy::dotenv() {
        panic!("Failed to prepare .env variables: {err}");
    }

    let _log_worker_guard = logging::init();

    let res = match args.command.unwrap_or(Command::Run) {
        Command::Run => runtime.block_on(async_main()),
        Command::Db {
            action: DbAction::Init,
        } => runtime.block_on(init_database()),
    };

    if let Err(source) = res {
        error!(?source, "Critical error in main");
    }
}

async fn async_main() -> Result<()> {
    BotConfig::init().context("Failed to initialize config")?;

    let ctx = Context::init().await.context("Failed to create context")?;

    ctx.startup().await.context("Failed startup checks")?;

    match signal::ctrl_c().await {
        Ok(_) => info!("Received Ctrl+C"),
        Err(err) => error!(?err, "Failed to await Ctrl+C"),
    }

    ctx.shutdown().await;
    info!("Shutting down");

    Ok(())
}

async fn init_database() -> Result<()> {
    BotConfig::init().context("Failed to initialize config")?;

    let config = PoolConfig::new(BotConfig::get().database_url.clone());

    let psql = Database::create_pool(&config, true)
        .await
        .context("Failed to build database")?;

    psql.close().await;

    Ok(())
}
