use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use super::config::LicensePolicy;
use super::matcher::Decision;
use crate::license::Dependency;

/// Aggregate outcome of checking a dependency tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// identity → license shown for it, in traversal order
    pub packages: IndexMap<String, String>,
    /// Distinct allow-listed declarations that justified a compliant package
    pub licenses: IndexSet<String>,
    /// Non-compliant identities, in traversal order
    pub invalids: Vec<String>,
    /// Identities let through by a package exception, in traversal order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excepted: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.invalids.is_empty()
    }

    pub fn is_invalid(&self, identity: &str) -> bool {
        self.invalids.iter().any(|invalid| invalid == identity)
    }

    pub fn is_excepted(&self, identity: &str) -> bool {
        self.excepted.iter().any(|excepted| excepted == identity)
    }
}

/// Fold per-dependency decisions into a result, preserving input order.
pub fn assemble<I>(decisions: I) -> ValidationResult
where
    I: IntoIterator<Item = Decision>,
{
    let mut result = ValidationResult::default();

    for decision in decisions {
        if !decision.compliant {
            result.invalids.push(decision.identity.clone());
        } else if decision.is_exception() {
            result.excepted.push(decision.identity.clone());
        } else if let Some(matched) = decision.matched {
            result.licenses.insert(matched);
        }
        result.packages.insert(decision.identity, decision.display_license);
    }

    result
}

impl LicensePolicy {
    /// Check every dependency and assemble the result.
    ///
    /// Decisions are independent, so they are computed in parallel; `collect`
    /// keeps them in input order.
    pub fn check(&self, dependencies: &[Dependency]) -> ValidationResult {
        let decisions: Vec<Decision> = dependencies
            .par_iter()
            .map(|dependency| self.select(dependency))
            .collect();

        assemble(decisions)
    }
}
