use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::exceptions::ExceptionRule;
use crate::policy::LicensePolicy;

/// Project configuration file, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "license-policy.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Output format (table, json)
    pub format: Option<String>,

    /// Skip devDependencies of the root package
    pub production: Option<bool>,

    /// Maximum dependency depth to walk
    pub depth: Option<usize>,

    /// Exit non-zero when invalid licenses are found
    pub fail_on_violations: Option<bool>,

    /// Embedded policy configuration
    pub policy: Option<LicensePolicy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Some("table".to_string()),
            production: Some(false),
            depth: None,
            fail_on_violations: Some(true),
            policy: None,
        }
    }
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Load configuration from `<root>/license-policy.toml`, falling back to defaults.
pub fn load_config_from(root: &Path) -> Result<Config> {
    let path = config_path(root);

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(config)
}

/// Load configuration from the current directory
pub fn load_config() -> Result<Config> {
    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_config_from(&root)
}

/// Append package exceptions to `[policy].packages`, keeping the rest of the file intact.
pub fn add_exceptions_to_config(path: &Path, exceptions: &[ExceptionRule]) -> Result<usize> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "{} not found. Run 'npm-license-validator init <policy>' first.",
            path.display()
        ));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let policy = doc
        .get_mut("policy")
        .and_then(|item| item.as_table_like_mut())
        .ok_or_else(|| anyhow::anyhow!("No [policy] section found in {}", path.display()))?;

    if policy.get("packages").is_none() {
        policy.insert("packages", toml_edit::value(toml_edit::Array::new()));
    }

    let packages = policy
        .get_mut("packages")
        .and_then(|item| item.as_array_mut())
        .ok_or_else(|| anyhow::anyhow!("Invalid packages format in {}", path.display()))?;

    let mut added = 0;
    for exception in exceptions {
        let exists = packages
            .iter()
            .any(|value| value.as_str() == Some(exception.specifier()));
        if !exists {
            packages.push(exception.specifier());
            added += 1;
        }
    }

    fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(added)
}
