use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use crate::exceptions::ExceptionRule;

/// License policy: an allow-list plus per-package exceptions.
///
/// In the config file `licenses` holds the allow-list and `packages` holds
/// exception specifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensePolicy {
    /// Policy name (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Allowed license identifiers or exact composite expressions
    #[serde(default, rename = "licenses")]
    pub allowed: IndexSet<String>,
    /// Package exceptions, e.g. `foo@^1.0.0`
    #[serde(default, rename = "packages")]
    pub exceptions: Vec<ExceptionRule>,
}

impl LicensePolicy {
    pub fn new<I, S>(allowed: I, exceptions: Vec<ExceptionRule>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            allowed: allowed.into_iter().map(Into::into).collect(),
            exceptions,
        }
    }

    /// True when neither licenses nor exceptions are configured.
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.exceptions.is_empty()
    }

    /// Merge extra allowed licenses and exceptions (CLI overrides) into this policy.
    pub fn extend(&mut self, allowed: impl IntoIterator<Item = String>, exceptions: impl IntoIterator<Item = ExceptionRule>) {
        self.allowed.extend(allowed);
        for rule in exceptions {
            if !self.exceptions.contains(&rule) {
                self.exceptions.push(rule);
            }
        }
    }
}
