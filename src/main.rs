//! Cinedex - command line client for the Cinedex movie service
//!
//! Searches movie metadata through the public OMDB and TMDB APIs and talks
//! to the Cinedex service itself for account registration and login.
//!
//! # Usage
//!
//! ```bash
//! cinedex search "blade runner"
//! cinedex trending --json
//! cinedex login user@example.com --password hunter2
//! ```

// Allow dead code: modules are shared with the library crate, and the CLI
// does not exercise every library item (e.g. the in-memory session store)
#![allow(dead_code)]

mod api;
mod cli;
mod commands;
mod config;
mod models;
mod session;

use std::io;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::{Cli, Command, Output};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let output = Output::new(&cli);

    let exit_code = match cli.command {
        Command::Search(cmd) => commands::search_cmd(cmd, &output).await,
        Command::Lookup(cmd) => commands::lookup_cmd(cmd, &output).await,
        Command::Popular(cmd) => commands::popular_cmd(cmd, &output).await,
        Command::Trending(cmd) => commands::trending_cmd(cmd, &output).await,
        Command::Register(cmd) => commands::register_cmd(cmd, &output).await,
        Command::Login(cmd) => commands::login_cmd(cmd, &output).await,
        Command::Logout => commands::logout_cmd(&output),
        Command::Status => commands::status_cmd(&output),
    };

    std::process::exit(exit_code.into());
}
