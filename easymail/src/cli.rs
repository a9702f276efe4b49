//! Command-line interface definitions for easymail

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the easymail application
#[derive(Parser)]
#[command(name = "easymail")]
#[command(version)]
#[command(about = "Compose multi-section HTML emails", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for easymail
#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample draft and configuration
    Init {
        /// Directory to initialize (defaults to current directory)
        path: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Replay a draft through the composer and export the email
    Build {
        /// Draft file
        #[arg(value_name = "DRAFT", default_value = "draft.toml")]
        draft: PathBuf,

        /// Output file for the exported markup
        #[arg(short, long, default_value = "email.html")]
        output: PathBuf,

        /// Composer configuration (placeholders and styles)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Read an exported email back and print it as a draft
    Load {
        /// Exported markup file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}
