//! Command-line interface for urllink.
//!
//! The CLI drives the field customizer without a hosting framework: each line
//! of input is one row's raw field value, rendered against the template of one
//! column.
//!
//! # Commands
//!
//! - `render` - render rows of a column to markup or JSON
//! - `substitute` - substitute one payload into a template
//!
//! # Global Options
//!
//! - `--verbose` - debug logging
//! - `--quiet` - no logging at all
//! - `--config <path>` - configuration file (default `urllink.toml`)
//!
//! Without `--verbose`/`--quiet` warnings are logged, which includes every
//! suppressed row. `RUST_LOG` overrides the level when set.
//!
//! # Examples
//!
//! ```bash
//! urllink render --column DocLink rows.jsonl
//! cat rows.jsonl | urllink --config team.toml render --column DocLink --format json
//! urllink substitute --template 'https://x/{id}' --payload '{"id": "7"}'
//! ```

mod render;
mod substitute;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use render::{OutputFormat, RenderCommand};
pub use substitute::SubstituteCommand;

/// Logging configuration derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter, `None` disables logging
    pub log_level: Option<String>,
    /// Custom configuration file path
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a configuration with logging off and the default config file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over [`CliConfig::log_level`] unless
    /// logging is disabled. Calling this twice is harmless.
    pub fn init_logging(&self) {
        let Some(level) = &self.log_level else {
            return;
        };

        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(level)
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Main CLI structure for urllink.
#[derive(Parser, Debug)]
#[command(
    name = "urllink",
    about = "Render JSON row values as links built from column URL templates",
    version,
    long_about = "urllink fetches each column's URL template once, substitutes {name} tokens with values from every row's JSON payload, and renders the row as a link when the payload has a Title."
)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable all logging, including warnings for suppressed rows
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file (default: ./urllink.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render rows of a column
    Render(RenderCommand),

    /// Substitute a payload into a template
    Substitute(SubstituteCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the parsed flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Render(cmd) => cmd.execute(config.config_path).await,
            Commands::Substitute(cmd) => cmd.execute(),
        }
    }
}
