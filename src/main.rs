//! icon-sprite - bundle a folder of SVG icons into per-namespace sprites.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod generator;
mod icon;
mod loader;
mod logger;
mod pipeline;
mod sprite;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SpriteConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SpriteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { watch, .. } => cli::build::build_sprites(config, *watch),
        Commands::Serve { .. } => cli::serve::serve_sprites(config),
        Commands::Resolve { args } => cli::resolve::resolve_icons(args, &config),
    }
}
