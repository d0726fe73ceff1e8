use anyhow::Result;
use std::collections::BTreeSet;
use crate::license::Dependency;
use crate::policy::ValidationResult;
use crate::validator::{Formatter, ValidationReport};

/// Plain-text listing of every discovered package and its declared licenses.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormatter;

impl Formatter for StandardFormatter {
    fn render(&self, packages: &[Dependency]) -> Result<String> {
        let mut output = String::new();
        let mut seen = BTreeSet::new();

        for package in packages {
            output.push_str(&format!(
                "{} [license(s): {}]\n",
                package.identity,
                package.candidates.join(", ")
            ));
            seen.extend(package.candidates.iter().map(String::as_str));
        }

        output.push_str(&format!(
            "\nLICENSES: {}\n",
            seen.into_iter().collect::<Vec<_>>().join(", ")
        ));

        Ok(output)
    }
}

pub fn format_table_output(report: &ValidationReport, verbose: bool) -> String {
    let mut output = String::new();
    let result = &report.result;

    // Summary header
    let total = result.packages.len();
    let invalid = result.invalids.len();

    output.push_str(&format!("📦 License Validation ({} packages)\n", total));
    output.push_str(&format!(
        "✅ {} compliant  🚫 {} invalid  📜 {} licenses matched\n\n",
        total - invalid,
        invalid,
        result.licenses.len()
    ));

    if verbose {
        output.push_str("📦 All Packages:\n");
        output.push_str(&format_package_table(result, true));
    } else if result.invalids.is_empty() {
        output.push_str("✅ No invalid licenses found!\n");
    } else {
        output.push_str("⚠️  Invalid Licenses:\n");
        output.push_str(&format_package_table(result, false));
    }

    if !verbose && total > invalid {
        output.push_str(&format!("\n💡 Run with --verbose to see all {} packages\n", total));
    }

    output
}

fn format_package_table(result: &ValidationResult, show_all: bool) -> String {
    let rows: Vec<(&String, &String)> = result
        .packages
        .iter()
        .filter(|(identity, _)| show_all || result.is_invalid(identity))
        .collect();

    if rows.is_empty() {
        return "No packages found.\n".to_string();
    }

    let mut output = String::new();

    // Table header
    output.push_str("┌───────────────────────────┬───────────────────────────┬──────────┐\n");
    output.push_str("│ Package                   │ License                   │ Status   │\n");
    output.push_str("├───────────────────────────┼───────────────────────────┼──────────┤\n");

    for (identity, license) in rows {
        let status = if result.is_invalid(identity) {
            "🚫 Invalid"
        } else if result.is_excepted(identity) {
            "⚠️ Except"
        } else {
            "✅ OK"
        };
        output.push_str(&format!(
            "│ {:<25} │ {:<25} │ {:<8} │\n",
            truncate(identity, 25),
            truncate(license, 25),
            status
        ));
    }

    output.push_str("└───────────────────────────┴───────────────────────────┴──────────┘\n");

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}
