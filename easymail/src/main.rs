//! easymail - editable email composer
//!
//! A CLI tool that replays drafts through the composer and exports
//! inline-styled HTML email bodies.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use easymail::{Composer, ComposerConfig, Draft, FileClipboard, MemoryClipboard};
use std::path::{Path, PathBuf};

const DRAFT_FILE: &str = "draft.toml";
const CONFIG_FILE: &str = "easymail.toml";

/// Main entry point for the easymail CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force } => {
            handle_init_command(path, force)?;
        }

        Commands::Build {
            draft,
            output,
            config,
            verbose,
        } => {
            init_logging(verbose);
            handle_build_command(&draft, &output, config.as_deref())?;
        }

        Commands::Load { input, verbose } => {
            init_logging(verbose);
            handle_load_command(&input)?;
        }
    }

    Ok(())
}

/// Initialize logging if verbose
fn init_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

/// Handle the init command
fn handle_init_command(path: Option<PathBuf>, force: bool) -> Result<()> {
    let target_path = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_path.exists() {
        std::fs::create_dir_all(&target_path)
            .with_context(|| format!("Failed to create directory {}", target_path.display()))?;
    }

    let draft_path = target_path.join(DRAFT_FILE);
    let config_path = target_path.join(CONFIG_FILE);
    if !force {
        for existing in [&draft_path, &config_path] {
            if existing.exists() {
                anyhow::bail!(
                    "{} already exists. Use --force to overwrite.",
                    existing.display()
                );
            }
        }
    }

    std::fs::write(&draft_path, easymail::draft::SAMPLE_DRAFT)
        .with_context(|| format!("Failed to write {}", draft_path.display()))?;
    ComposerConfig::default()
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("✓ Created {}", draft_path.display());
    println!("✓ Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} with your email content", DRAFT_FILE);
    println!("  2. Run 'easymail build' to export the email");

    Ok(())
}

/// Handle the build command
fn handle_build_command(draft_path: &Path, output: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => ComposerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ComposerConfig::default(),
    };

    let draft = Draft::load(draft_path)
        .with_context(|| format!("Failed to load draft from {}", draft_path.display()))?;

    let mut composer = Composer::new(config, FileClipboard::new(output))
        .context("Failed to set up the composer")?;
    println!("{}", composer.doc_info().window_title());

    draft.replay(&mut composer);
    let report = composer.export().context("Failed to export the email")?;
    if let Some(notice) = composer.take_notice() {
        println!("{}", notice.message());
    }
    if !report.copied {
        anyhow::bail!("Failed to write {}", output.display());
    }

    println!(
        "✓ Exported {} sections to {} ({} bytes)",
        composer.document().len(),
        output.display(),
        report.markup.len()
    );
    Ok(())
}

/// Handle the load command
fn handle_load_command(input: &Path) -> Result<()> {
    let markup = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let mut composer = Composer::new(ComposerConfig::default(), MemoryClipboard::new())
        .context("Failed to set up the composer")?;
    let count = composer
        .load_markup(&markup)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    log::info!("Recovered {} sections from {}", count, input.display());

    let draft = Draft::capture(&composer);
    print!("{}", draft.to_toml().context("Failed to serialize draft")?);
    Ok(())
}
