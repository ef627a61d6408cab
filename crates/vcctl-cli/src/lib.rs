//! vcctl CLI library

pub mod commands;
pub mod config;
pub mod error;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};

/// vcctl - command line client for Volcano
#[derive(Parser, Debug)]
#[command(name = "vcctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate job templates from jobs and run jobs from templates
    Template(commands::template::TemplateArgs),
}

impl Cli {
    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Template(args) => commands::template::run(args).await,
        }
    }
}
