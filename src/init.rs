use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use crate::config::config_path;

#[derive(Debug, Clone, Copy)]
pub enum InitPreset {
    Green,
    Yellow,
    Red,
}

/// Write a preset policy into `<root>/license-policy.toml`.
pub fn generate_config(root: &Path, preset: InitPreset) -> Result<()> {
    generate_config_at_path(config_path(root), preset)
}

/// Write a preset into `path`, creating the file or replacing only the keys
/// the preset defines in an existing one.
pub fn generate_config_at_path<P: AsRef<Path>>(path: P, preset: InitPreset) -> Result<()> {
    let path = path.as_ref();
    let preset_doc = get_preset_config(preset)
        .parse::<toml_edit::DocumentMut>()
        .context("Invalid preset config format")?;

    if !path.exists() {
        fs::write(path, preset_doc.to_string())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        return Ok(());
    }

    let existing = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut doc = existing
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    for (key, item) in preset_doc.iter() {
        doc[key] = item.clone();
    }

    fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn get_preset_config(preset: InitPreset) -> &'static str {
    match preset {
        InitPreset::Red => include_str!("../presets/red.toml"),
        InitPreset::Green => include_str!("../presets/green.toml"),
        InitPreset::Yellow => include_str!("../presets/yellow.toml"),
    }
}
