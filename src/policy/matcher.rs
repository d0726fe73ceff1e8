use serde::{Deserialize, Serialize};
use super::config::LicensePolicy;
use crate::exceptions;
use crate::license::{satisfied, Dependency};

/// The verdict for one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub identity: String,
    /// What the report shows for this package
    pub display_license: String,
    /// The declaration that satisfied the allow-list, if any
    pub matched: Option<String>,
    pub compliant: bool,
}

impl Decision {
    /// Whether the decision came from a package exception rather than a license match.
    pub fn is_exception(&self) -> bool {
        self.compliant && self.matched.is_none()
    }
}

impl LicensePolicy {
    /// Decide whether `dependency` complies with this policy.
    ///
    /// An exception rule overrides the license check entirely. Otherwise the
    /// declared licenses are tried in order and the first allowed one wins.
    pub fn select(&self, dependency: &Dependency) -> Decision {
        let Some(first) = dependency.candidates.first() else {
            return Decision {
                identity: dependency.identity.clone(),
                display_license: String::new(),
                matched: None,
                compliant: false,
            };
        };

        if let Some(rule) = exceptions::resolve(&dependency.identity, &self.exceptions) {
            return Decision {
                identity: dependency.identity.clone(),
                display_license: format!("{} (exception: {})", first, rule.specifier()),
                matched: None,
                compliant: true,
            };
        }

        match dependency
            .candidates
            .iter()
            .find(|candidate| satisfied(candidate.as_str(), &self.allowed))
        {
            Some(candidate) => Decision {
                identity: dependency.identity.clone(),
                display_license: candidate.clone(),
                matched: Some(candidate.clone()),
                compliant: true,
            },
            None => Decision {
                identity: dependency.identity.clone(),
                display_license: dependency.candidates.join(", "),
                matched: None,
                compliant: false,
            },
        }
    }
}
