//! CLI module - command-line interface for Showarr
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand};

/// Showarr - TV show tracker
/// Mirrors an external show catalog into a local store and keeps it fresh
#[derive(Parser)]
#[command(name = "showarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as background daemon with scheduler
    #[command(alias = "d")]
    Daemon,

    /// Refresh all eligible shows, or a single show by id
    Refresh {
        /// Catalog show id; omit to refresh everything
        id: Option<i32>,
    },

    /// Recompute popularity scores for all shows
    Popularity,

    /// Search the catalog and add a show
    #[command(alias = "a")]
    Add {
        /// Search query for the show
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Search the catalog without adding
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// List all tracked shows
    #[command(alias = "ls", alias = "l")]
    List,

    /// Show details about a tracked show
    #[command(alias = "i")]
    Info {
        /// Catalog show id
        id: i32,
    },

    /// List a show's episodes
    Episodes {
        /// Catalog show id
        id: i32,
    },

    /// Mark an episode watched (or unwatched with --unset)
    Watched {
        show_id: i32,
        season: i32,
        number: i32,
        #[arg(long)]
        unset: bool,
    },

    /// Ignore a show for a user (or un-ignore with --unset)
    Ignore {
        show_id: i32,
        /// Acting user id
        #[arg(long, default_value_t = 1)]
        user: i32,
        #[arg(long)]
        unset: bool,
    },

    /// Remove a show and everything attached to it
    #[command(alias = "rm", alias = "r")]
    Remove {
        /// Catalog show id
        id: i32,
    },

    /// Bulk-import shows from a file of names, one per line
    Import {
        /// Path to the name list
        file: String,
        /// Skip the confirmation prompt and import every match
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
