//! CLI - Command Line Interface for Cinedex
//!
//! Designed for scripting as well as interactive use. All output is
//! JSON-parseable with `--json`.
//!
//! # Examples
//!
//! ```bash
//! # Search for movies
//! cinedex search "the batman" --json
//!
//! # Exact-title lookup via OMDB
//! cinedex lookup "Inception"
//!
//! # Account handling
//! cinedex register user@example.com --password hunter2
//! cinedex login user@example.com --password hunter2
//! cinedex status
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Authentication failed or required
    AuthFailed = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Cinedex - command line client for the Cinedex movie service
#[derive(Parser, Debug)]
#[command(
    name = "cinedex",
    version,
    about = "Command line client for the Cinedex movie service",
    after_help = "EXAMPLES:\n\
                  cinedex search \"blade runner\"       Search TMDB\n\
                  cinedex lookup \"Inception\"          Exact-title lookup via OMDB\n\
                  cinedex trending                     This week's trending movies\n\
                  cinedex login me@example.com -p pw   Log in and store the session"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for movies
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Look up the best match for an exact title
    #[command(visible_alias = "l")]
    Lookup(LookupCmd),

    /// Get the current popular movies
    #[command(visible_alias = "p")]
    Popular(PopularCmd),

    /// Get this week's trending movies
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Register a new account
    Register(RegisterCmd),

    /// Log in and store the session
    Login(LoginCmd),

    /// Clear the stored session
    Logout,

    /// Show authentication status
    Status,
}

/// Metadata provider selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    /// The Movie Database (default)
    #[default]
    Tmdb,
    /// The Open Movie Database
    Omdb,
}

/// Search for movies by free-text query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Metadata provider to query
    #[arg(long, short = 'P', value_enum, default_value = "tmdb")]
    pub provider: Provider,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Look up the best match for an exact title (OMDB)
#[derive(Args, Debug)]
pub struct LookupCmd {
    /// Movie title
    #[arg(required = true)]
    pub title: String,
}

/// Get the current popular movies (TMDB)
#[derive(Args, Debug)]
pub struct PopularCmd {
    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Get this week's trending movies (TMDB, at most 10)
#[derive(Args, Debug)]
pub struct TrendingCmd {}

/// Register a new account
#[derive(Args, Debug)]
pub struct RegisterCmd {
    /// Account email
    #[arg(required = true)]
    pub email: String,

    /// Account password
    #[arg(long, short = 'p', required = true)]
    pub password: String,
}

/// Log in and store the session
#[derive(Args, Debug)]
pub struct LoginCmd {
    /// Account email
    #[arg(required = true)]
    pub email: String,

    /// Account password
    #[arg(long, short = 'p', required = true)]
    pub password: String,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet and JSON modes)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
