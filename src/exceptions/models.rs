use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A policy override for one package, optionally scoped to a version range.
///
/// Written as an npm-style specifier: `foo`, `foo@1.0.0`, `foo@^1.0.0`,
/// `@scope/foo@~2.1`. The specifier is kept verbatim for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExceptionRule {
    pub package_name: String,
    pub version_range: Option<String>,
    specifier: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid exception rule '{0}': a package name is required")]
pub struct ExceptionRuleError(pub String);

impl ExceptionRule {
    pub fn parse(specifier: &str) -> Result<Self, ExceptionRuleError> {
        let trimmed = specifier.trim();

        // A leading '@' belongs to a scoped package name
        let (name, range) = match trimmed.rfind('@') {
            Some(at) if at > 0 => (&trimmed[..at], Some(trimmed[at + 1..].trim())),
            _ => (trimmed, None),
        };

        let name = name.trim();
        if name.is_empty() || name == "@" {
            return Err(ExceptionRuleError(specifier.to_string()));
        }

        Ok(Self {
            package_name: name.to_string(),
            version_range: range.filter(|r| !r.is_empty()).map(str::to_string),
            specifier: trimmed.to_string(),
        })
    }

    /// The rule as originally written.
    pub fn specifier(&self) -> &str {
        &self.specifier
    }

    pub fn is_scoped(&self) -> bool {
        self.version_range.is_some()
    }
}

impl FromStr for ExceptionRule {
    type Err = ExceptionRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ExceptionRule {
    type Error = ExceptionRuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ExceptionRule> for String {
    fn from(rule: ExceptionRule) -> Self {
        rule.specifier
    }
}

impl fmt::Display for ExceptionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.specifier)
    }
}
