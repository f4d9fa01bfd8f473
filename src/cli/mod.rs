//! CLI module - command-line interface for Watchlist
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Watchlist - a single-user movie watchlist
#[derive(Parser)]
#[command(name = "watchlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Initialize the db
    Initdb {
        /// Create after drop
        #[arg(long)]
        drop: bool,
    },

    /// Generate the admin account
    Admin {
        /// The username used to login
        #[arg(long)]
        username: String,

        /// The passwd used to login
        #[arg(long)]
        passwd: String,
    },

    /// Generate fake data
    Forge,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
