use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use super::Dependency;
use crate::validator::Discovery;

/// Declared when a package carries no license metadata at all.
pub const UNKNOWN_LICENSE: &str = "UNKNOWN";

const LICENSE_FILE_PATTERNS: &[&str] = &["LICEN[CS]E*", "COPYING*", "UNLICEN[CS]E*"];

/// Options controlling the dependency walk.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Skip the root package's devDependencies
    pub production: bool,
    /// Maximum dependency depth below the root package
    pub depth: Option<usize>,
    /// Print warnings about unresolvable dependencies
    pub verbose: bool,
}

/// Discovers installed packages by resolving `package.json` dependencies
/// through `node_modules`, the way node itself would.
#[derive(Debug, Clone, Default)]
pub struct NodeModulesDiscovery {
    options: DiscoveryOptions,
}

impl NodeModulesDiscovery {
    pub fn new(options: DiscoveryOptions) -> Self {
        Self { options }
    }
}

impl Discovery for NodeModulesDiscovery {
    fn find(&self, root: &Path) -> Result<Option<Vec<Dependency>>> {
        let manifest = root.join("package.json");
        if !manifest.is_file() {
            anyhow::bail!("No package.json file found in {}", root.display());
        }

        let mut walker = Walker {
            root,
            options: &self.options,
            visited: HashMap::new(),
            identities: HashSet::new(),
            records: Vec::new(),
        };
        walker.visit(root, 0)?;

        Ok(Some(walker.records))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    name: Option<String>,
    version: Option<String>,
    license: Option<Value>,
    licenses: Option<Value>,
    #[serde(default)]
    dependencies: IndexMap<String, Value>,
    #[serde(default)]
    dev_dependencies: IndexMap<String, Value>,
    #[serde(default)]
    optional_dependencies: IndexMap<String, Value>,
}

fn read_manifest(path: &Path) -> Result<PackageManifest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

struct Walker<'a> {
    root: &'a Path,
    options: &'a DiscoveryOptions,
    /// Shallowest depth each directory has been walked at
    visited: HashMap<PathBuf, usize>,
    identities: HashSet<String>,
    records: Vec<Dependency>,
}

impl Walker<'_> {
    fn visit(&mut self, dir: &Path, depth: usize) -> Result<()> {
        if let Some(&seen) = self.visited.get(dir) {
            // A shallower path reaches more of the tree under a depth limit
            if self.options.depth.is_none() || seen <= depth {
                return Ok(());
            }
        }
        self.visited.insert(dir.to_path_buf(), depth);

        let is_root = depth == 0;
        let manifest_path = dir.join("package.json");
        let manifest = match read_manifest(&manifest_path) {
            Ok(manifest) => manifest,
            // The root manifest is required; broken dependency manifests are skipped
            Err(e) if is_root => return Err(e),
            Err(e) => {
                self.warn(format!("Skipping {}: {:#}", dir.display(), e));
                return Ok(());
            }
        };

        let name = manifest.name.clone().unwrap_or_else(|| {
            dir.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        let version = manifest.version.clone().unwrap_or_else(|| "0.0.0".to_string());
        let identity = format!("{}@{}", name, version);

        if self.identities.insert(identity.clone()) {
            let mut candidates = declared_licenses(&manifest);
            if candidates.is_empty() {
                candidates = guess_from_license_file(dir).into_iter().collect();
            }
            if candidates.is_empty() {
                candidates.push(UNKNOWN_LICENSE.to_string());
            }
            self.records.push(Dependency { identity, candidates });
        }

        if self.options.depth.is_some_and(|max| depth >= max) {
            return Ok(());
        }

        let mut wanted: Vec<(&String, bool)> = manifest
            .dependencies
            .keys()
            .map(|name| (name, false))
            .collect();
        wanted.extend(manifest.optional_dependencies.keys().map(|name| (name, true)));
        if is_root && !self.options.production {
            wanted.extend(manifest.dev_dependencies.keys().map(|name| (name, false)));
        }

        for (dep_name, optional) in wanted {
            match self.resolve(dir, dep_name) {
                Some(path) => self.visit(&path, depth + 1)?,
                None if optional => {}
                None => self.warn(format!(
                    "Dependency '{}' of {} is not installed",
                    dep_name, name
                )),
            }
        }

        Ok(())
    }

    /// Look for `node_modules/<name>` from `from` upwards, stopping at the root.
    fn resolve(&self, from: &Path, name: &str) -> Option<PathBuf> {
        let mut current = Some(from);
        while let Some(dir) = current {
            let candidate = dir.join("node_modules").join(name);
            if candidate.join("package.json").is_file() {
                return Some(candidate);
            }
            if dir == self.root {
                break;
            }
            current = dir.parent();
        }
        None
    }

    fn warn(&self, message: String) {
        if self.options.verbose {
            eprintln!("Warning: {}", message);
        }
    }
}

/// Licenses declared in `license` / legacy `licenses`, in declaration order.
fn declared_licenses(manifest: &PackageManifest) -> Vec<String> {
    let mut found = IndexSet::new();
    for field in [&manifest.license, &manifest.licenses].into_iter().flatten() {
        collect_license_values(field, &mut found);
    }
    found.into_iter().collect()
}

fn collect_license_values(value: &Value, found: &mut IndexSet<String>) {
    match value {
        Value::String(s) if !s.trim().is_empty() => {
            found.insert(s.trim().to_string());
        }
        Value::Object(obj) => {
            if let Some(Value::String(kind)) = obj.get("type") {
                if !kind.trim().is_empty() {
                    found.insert(kind.trim().to_string());
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_license_values(item, found);
            }
        }
        _ => {}
    }
}

/// Guess a license from a LICENSE/COPYING file; guesses carry a trailing `*`.
fn guess_from_license_file(dir: &Path) -> Option<String> {
    let patterns: Vec<Pattern> = LICENSE_FILE_PATTERNS
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::default()
    };

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            patterns.iter().any(|p| p.matches_with(&name, options))
        })
        .map(|entry| entry.path())
        .collect();
    files.sort();

    files.iter().find_map(|file| {
        let text = fs::read_to_string(file).ok()?;
        identify_license_text(&text).map(|id| format!("{}*", id))
    })
}

fn identify_license_text(text: &str) -> Option<&'static str> {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let lower = text.to_lowercase();

    if lower.contains("permission is hereby granted, free of charge") {
        return Some("MIT");
    }
    if lower.contains("permission to use, copy, modify, and/or distribute this software for any purpose") {
        return Some("ISC");
    }
    if lower.contains("apache license") && lower.contains("version 2.0") {
        return Some("Apache-2.0");
    }
    if lower.contains("gnu lesser general public license") {
        return Some(if lower.contains("version 3") { "LGPL-3.0" } else { "LGPL-2.1" });
    }
    if lower.contains("gnu affero general public license") {
        return Some("AGPL-3.0");
    }
    if lower.contains("gnu general public license") {
        return Some(if lower.contains("version 3") { "GPL-3.0" } else { "GPL-2.0" });
    }
    if lower.contains("mozilla public license") && lower.contains("2.0") {
        return Some("MPL-2.0");
    }
    if lower.contains("this is free and unencumbered software released into the public domain") {
        return Some("Unlicense");
    }
    if lower.contains("redistribution and use in source and binary forms") {
        return Some(if lower.contains("neither the name") { "BSD-3-Clause" } else { "BSD-2-Clause" });
    }

    None
}
