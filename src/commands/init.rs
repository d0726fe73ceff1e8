use anyhow::Result;
use std::path::PathBuf;
use crate::cli::InitPreset;
use super::check::project_root;
use npm_license_validator::init;

pub fn handle_init(policy: InitPreset, path: Option<PathBuf>, quiet: bool) -> Result<()> {
    let init_preset = match policy {
        InitPreset::Green => init::InitPreset::Green,
        InitPreset::Yellow => init::InitPreset::Yellow,
        InitPreset::Red => init::InitPreset::Red,
    };

    let root = project_root(path)?;
    let result = init::generate_config(&root, init_preset);

    if result.is_ok() && !quiet {
        println!("✅ Configuration initialized successfully");
    }

    result
}
