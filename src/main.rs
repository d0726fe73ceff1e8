use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => commands::handle_check(args, cli.quiet, cli.verbose),
        Commands::Init { policy, path } => commands::handle_init(policy, path, cli.quiet),
        Commands::Fix { path, dry_run } => commands::handle_fix(path, dry_run, cli.quiet, cli.verbose),
        Commands::Config { show, validate } => commands::handle_config(show, validate, cli.quiet),
    }
}
