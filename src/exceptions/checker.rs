use super::models::{ExceptionRule, ExceptionRuleError};
use super::version;
use crate::license::split_identity;

/// Find the first rule covering `identity` (`name@version`).
///
/// Rules are tried in order; a rule applies when its package name matches and
/// its version range (if any) accepts the dependency's version.
pub fn resolve<'a>(identity: &str, rules: &'a [ExceptionRule]) -> Option<&'a ExceptionRule> {
    let (name, version) = split_identity(identity);
    let version = version.unwrap_or_default();

    rules.iter().find(|rule| {
        rule.package_name == name && version::matches(version, rule.version_range.as_deref())
    })
}

/// Build the narrowest rule that covers `identity`.
///
/// Normally the exact `name@version`. When the installed version is not one
/// a range can match (e.g. `1.0`), falls back to a rule on the bare name.
pub fn pin(identity: &str) -> Result<ExceptionRule, ExceptionRuleError> {
    let exact = ExceptionRule::parse(identity)?;
    if resolve(identity, std::slice::from_ref(&exact)).is_some() {
        return Ok(exact);
    }
    ExceptionRule::parse(split_identity(identity).0)
}
