use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "npm-license-validator")]
#[command(about = "Validate the licenses of a node project's dependencies against a policy")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate dependency licenses
    Check(CheckArgs),
    /// Initialize configuration with preset policy
    Init {
        /// Policy preset
        policy: InitPreset,

        /// Project root (default: current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Add exceptions for every package that currently fails validation
    Fix {
        /// Project root (default: current directory)
        path: Option<PathBuf>,

        /// Show changes without applying them
        #[arg(long)]
        dry_run: bool,
    },
    /// Show or validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Args)]
pub struct CheckArgs {
    /// Project root containing package.json (default: current directory)
    pub path: Option<PathBuf>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip devDependencies of the root package
    #[arg(long)]
    pub production: bool,

    /// Maximum dependency depth to walk
    #[arg(long)]
    pub depth: Option<usize>,

    /// Additional allowed license (repeatable)
    #[arg(short, long = "license", value_name = "ID")]
    pub licenses: Vec<String>,

    /// Additional package exception, e.g. foo@^1.0.0 (repeatable)
    #[arg(short, long = "exception", value_name = "SPEC")]
    pub exceptions: Vec<String>,

    /// Exit with code 0 even on violations
    #[arg(long)]
    pub exit_zero: bool,
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, ValueEnum)]
pub enum InitPreset {
    Green,
    Yellow,
    Red,
}
