use serde::{Deserialize, Serialize};

pub mod expression;
pub mod extractor;

pub use expression::{satisfied, ExprKind, Expression, ExpressionError};
pub use extractor::{DiscoveryOptions, NodeModulesDiscovery};

/// A discovered package and the license declarations found for it.
///
/// `candidates` keeps discovery order; the first declaration that satisfies a
/// policy wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// `name@version`
    #[serde(rename = "pkg")]
    pub identity: String,
    #[serde(rename = "licenses")]
    pub candidates: Vec<String>,
}

impl Dependency {
    pub fn new<I, S>(identity: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identity: identity.into(),
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

/// Split `name@version` at the last `@` that is not the scope marker.
pub fn split_identity(identity: &str) -> (&str, Option<&str>) {
    match identity.rfind('@') {
        Some(at) if at > 0 => (&identity[..at], Some(&identity[at + 1..])),
        _ => (identity, None),
    }
}
