// ABOUTME: Main application orchestration for the formkit CLI
// ABOUTME: Coordinates logging setup and command dispatch

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::commands;
use super::{Args, Commands};

pub struct App;

impl App {
    pub fn new() -> Self {
        Self
    }

    /// Initialize logging based on CLI flags
    pub fn init_logging(&self, verbose: bool, no_color: bool) {
        let log_level = if verbose { "debug" } else { "info" };
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(!no_color)
            .with_target(false)
            .init();

        debug!("Logging initialized with level: {}", log_level);
    }

    /// Run the application with parsed arguments
    pub fn run(&self, args: Args) -> Result<()> {
        self.init_logging(args.verbose, args.no_color);

        match args.command {
            Commands::Render {
                fields,
                template,
                values,
                errors,
                views,
                translations,
                shared_key,
                base_url,
            } => commands::render(
                &fields,
                &template,
                values.as_deref(),
                errors.as_deref(),
                views,
                translations.as_deref(),
                shared_key,
                base_url,
            ),
            Commands::Check { fields, views } => commands::check(&fields, views),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
