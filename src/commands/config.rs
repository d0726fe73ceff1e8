use anyhow::Result;
use npm_license_validator::config::load_config;

pub fn handle_config(show: bool, validate: bool, quiet: bool) -> Result<()> {
    if !show && !validate {
        if !quiet {
            eprintln!("Use --show or --validate");
        }
        std::process::exit(1);
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            if !quiet {
                eprintln!("❌ Configuration validation failed: {:#}", e);
            }
            std::process::exit(1);
        }
    };

    if show && !quiet {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    if validate {
        let has_policy = config.policy.as_ref().is_some_and(|policy| !policy.is_empty());
        if !has_policy {
            if !quiet {
                eprintln!("❌ No licenses or packages specified in [policy]");
            }
            std::process::exit(1);
        }
        if !quiet {
            println!("✅ Configuration is valid");
        }
    }

    Ok(())
}
