use anyhow::Result;
use std::path::PathBuf;
use super::check::{project_root, run_validation};
use npm_license_validator::config::{add_exceptions_to_config, config_path, load_config_from};
use npm_license_validator::exceptions;
use npm_license_validator::license::split_identity;
use npm_license_validator::ExceptionRule;

pub fn handle_fix(path: Option<PathBuf>, dry_run: bool, quiet: bool, verbose: bool) -> Result<()> {
    let root = project_root(path)?;
    let config = load_config_from(&root)?;

    let Some(policy) = config.policy.as_ref() else {
        if !quiet {
            eprintln!("No policy configured. Run 'npm-license-validator init <policy>' first.");
        }
        std::process::exit(1);
    };

    let report = run_validation(
        &root,
        policy,
        config.production.unwrap_or(false),
        config.depth,
        verbose,
    )?;

    if report.result.is_valid() {
        if !quiet {
            println!("No violations found, nothing to fix");
        }
        return Ok(());
    }

    // Pin each exception to the exact installed version where a range can express it
    let mut pinned = Vec::with_capacity(report.result.invalids.len());
    for identity in &report.result.invalids {
        let rule = exceptions::pin(identity)?;
        if !rule.is_scoped() && split_identity(identity).1.is_some() && !quiet {
            eprintln!(
                "Warning: {} has a version no range can match, excepting every version of {}",
                identity, rule
            );
        }
        let license = report.result.packages.get(identity).map_or("", String::as_str);
        pinned.push((rule, license));
    }

    if dry_run {
        if !quiet {
            println!("Would add {} exceptions to {}:", pinned.len(), config_path(&root).display());
            for (rule, license) in &pinned {
                println!("  - {} ({})", rule, license);
            }
        }
        return Ok(());
    }

    let rules: Vec<ExceptionRule> = pinned.iter().map(|(rule, _)| rule.clone()).collect();
    let added = add_exceptions_to_config(&config_path(&root), &rules)?;

    if !quiet {
        println!("Added {} exceptions to {}:", added, config_path(&root).display());
        for (rule, license) in &pinned {
            println!("  ✅ {} ({})", rule, license);
        }
    }

    Ok(())
}
