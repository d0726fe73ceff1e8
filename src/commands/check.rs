use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use crate::cli::{CheckArgs, OutputFormat};
use npm_license_validator::config::{load_config_from, Config};
use npm_license_validator::output::format_table_output;
use npm_license_validator::{DiscoveryOptions, ExceptionRule, LicensePolicy, ValidationReport, Validator};

pub fn handle_check(args: CheckArgs, quiet: bool, verbose: bool) -> Result<()> {
    let root = project_root(args.path.clone())?;

    // Load configuration from license-policy.toml
    let config = load_config_from(&root)?;

    // CLI arguments override config values
    let policy = merged_policy(&config, &args)?;
    let production = args.production || config.production.unwrap_or(false);
    let depth = args.depth.or(config.depth);

    let report = run_validation(&root, &policy, production, depth, verbose)?;

    if !report.result.invalids.is_empty() && !quiet {
        eprintln!(
            "License violations found: {} of {} packages invalid",
            report.result.invalids.len(),
            report.result.packages.len()
        );
    }

    // Determine output format
    let format = args.format.unwrap_or_else(|| match config.format.as_deref() {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Table,
    });

    let output_content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Table => {
            let mut table = format_table_output(&report, verbose);
            if verbose {
                table.push('\n');
                table.push_str(&report.summary);
            }
            table
        }
    };

    match args.output {
        Some(path) => fs::write(&path, output_content)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            if !quiet {
                println!("{}", output_content);
            }
        }
    }

    if !report.result.is_valid() && !args.exit_zero && config.fail_on_violations.unwrap_or(true) {
        if !quiet {
            eprintln!("Exiting with error due to invalid licenses");
        }
        std::process::exit(1);
    }

    Ok(())
}

pub fn project_root(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

pub fn run_validation(
    root: &Path,
    policy: &LicensePolicy,
    production: bool,
    depth: Option<usize>,
    verbose: bool,
) -> Result<ValidationReport> {
    let validator = Validator::new(DiscoveryOptions {
        production,
        depth,
        verbose,
    });

    if verbose {
        eprintln!(
            "Validating {} against {} allowed license(s) and {} exception(s)",
            root.display(),
            policy.allowed.len(),
            policy.exceptions.len()
        );
    }

    Ok(validator.check(root, policy)?)
}

fn merged_policy(config: &Config, args: &CheckArgs) -> Result<LicensePolicy> {
    let mut policy = config.policy.clone().unwrap_or_default();

    let exceptions = args
        .exceptions
        .iter()
        .map(|spec| ExceptionRule::parse(spec))
        .collect::<Result<Vec<_>, _>>()?;
    policy.extend(args.licenses.iter().cloned(), exceptions);

    Ok(policy)
}
