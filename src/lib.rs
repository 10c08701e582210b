pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod state;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use scheduler::Scheduler;
use state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        print_usage();
        return Ok(());
    };

    let state = AppState::new(config).await?;

    match command {
        Commands::Daemon => run_daemon(state).await,
        Commands::Refresh { id: Some(id) } => cli::commands::cmd_refresh_one(&state, id).await,
        Commands::Refresh { id: None } => cli::commands::cmd_refresh_all(&state).await,
        Commands::Popularity => cli::commands::cmd_recompute_popularity(&state).await,
        Commands::Add { query } => cli::commands::cmd_add_show(&state, &query.join(" ")).await,
        Commands::Search { query } => {
            cli::commands::cmd_search_shows(&state, &query.join(" ")).await
        }
        Commands::List => cli::commands::cmd_list_shows(&state).await,
        Commands::Info { id } => cli::commands::cmd_show_info(&state, id).await,
        Commands::Episodes { id } => cli::commands::cmd_list_episodes(&state, id).await,
        Commands::Watched {
            show_id,
            season,
            number,
            unset,
        } => cli::commands::cmd_set_watched(&state, show_id, season, number, !unset).await,
        Commands::Ignore {
            show_id,
            user,
            unset,
        } => cli::commands::cmd_ignore_show(&state, show_id, user, !unset).await,
        Commands::Remove { id } => cli::commands::cmd_remove_show(&state, id).await,
        Commands::Import { file, yes } => cli::commands::cmd_bulk_import(&state, &file, yes).await,
    }
}

async fn run_daemon(state: AppState) -> anyhow::Result<()> {
    info!(
        "Showarr v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    state.store.ping().await?;

    if !state.config.scheduler.enabled {
        anyhow::bail!("Scheduler is disabled in config; nothing to do in daemon mode");
    }

    let scheduler = Scheduler::new(Arc::new(state));

    let shutdown_scheduler = scheduler.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            shutdown_scheduler.stop().await;
        }
    });

    scheduler.run().await
}

fn print_usage() {
    println!("Showarr - TV show tracker");
    println!();
    println!("Usage: showarr <command>");
    println!();
    println!("Common commands:");
    println!("  daemon              Run with the refresh scheduler");
    println!("  add \"show name\"     Search the catalog and add a show");
    println!("  list                List tracked shows");
    println!("  refresh [id]        Refresh everything, or one show");
    println!("  import <file>       Bulk-import from a list of names");
    println!();
    println!("Run 'showarr --help' for the full list.");
}
