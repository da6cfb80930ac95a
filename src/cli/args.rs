// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for formkit

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "formkit")]
#[command(about = "Render form markup from a declarative field schema and templates")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a page template against a field schema and request state
    Render {
        #[arg(help = "Path to field schema JSON file")]
        fields: PathBuf,

        #[arg(help = "Path to page template file")]
        template: PathBuf,

        #[arg(long, help = "Submitted values JSON file")]
        values: Option<PathBuf>,

        #[arg(long, help = "Validation errors JSON file")]
        errors: Option<PathBuf>,

        #[arg(long, help = "Views directory for partial overrides")]
        views: Option<PathBuf>,

        #[arg(long, help = "Flat translations JSON file")]
        translations: Option<PathBuf>,

        #[arg(long, default_value = "", help = "Shared translation key prefix")]
        shared_key: String,

        #[arg(long, help = "Base URL for relative link resolution")]
        base_url: Option<String>,
    },

    /// Validate a field schema and check that all backing partials resolve
    Check {
        #[arg(help = "Path to field schema JSON file")]
        fields: PathBuf,

        #[arg(long, help = "Views directory for partial overrides")]
        views: Option<PathBuf>,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
