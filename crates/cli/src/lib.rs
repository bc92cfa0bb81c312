//! Argument parsing for the `exchange` smoke-test binary.
//!
//! Not a normative interface - the engine's only real entry point is
//! `matching_engine::MatchingEngine::submit`. This just gives the demo
//! binary something to take on the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "exchange")]
#[command(about = "Single-asset limit order matching engine demo")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a handful of sample submissions against the configured engine
    Run {
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,
    },

    /// Validate a configuration file without running anything
    Validate {
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,
    },

    /// Write a configuration file populated with defaults
    Init {
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}