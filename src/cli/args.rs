//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Build SVG icon sprites, serve them and resolve icon references
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Icon source directory (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Sprite output directory (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Config file path (default: icon-sprite.toml)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build sprites, the icon name listing and the manifest
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Keep running and rebuild when icons change
        #[arg(short, long)]
        watch: bool,
    },

    /// Serve built sprites over HTTP
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable file watching for auto-rebuild
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Resolve icon references through the sprite loader
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Remove sprites left over from earlier builds
    #[arg(short, long)]
    pub clean: bool,

    /// Keep the first icon on duplicate names instead of failing
    #[arg(short, long)]
    pub lenient: bool,

    /// Optimize each icon with a lossless usvg round trip
    #[arg(short = 'O', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub optimize: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Icon references (`home`, `social:facebook`)
    #[arg(value_name = "ICON", required = true)]
    pub icons: Vec<String>,

    /// Base URL the sprites are served from
    #[arg(short, long = "base-url", value_hint = clap::ValueHint::Url)]
    pub base_url: Option<String>,

    /// Session file backing the persisted cache tier
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub session: Option<PathBuf>,

    /// Print `<svg><use/></svg>` markup instead of the href
    #[arg(short, long)]
    pub markup: bool,

    /// Drop every cached sprite before resolving
    #[arg(long)]
    pub fresh: bool,
}
