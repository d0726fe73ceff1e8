use semver::{Version, VersionReq};

/// Check whether `version` falls inside an npm-style `range`.
///
/// A missing range covers every version. Unparsable versions or ranges never
/// match, so a broken exception rule can't grant anything.
pub fn matches(version: &str, range: Option<&str>) -> bool {
    let Some(range) = range else {
        return true;
    };

    let Some(version) = parse_version(version) else {
        return false;
    };

    match parse_range(range) {
        Some(alternatives) => alternatives.iter().any(|req| req.matches(&version)),
        None => false,
    }
}

fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim();
    let version = version
        .strip_prefix('=')
        .unwrap_or(version)
        .trim_start_matches(['v', 'V']);
    Version::parse(version).ok()
}

/// Parse `a || b || c` into one requirement per alternative.
fn parse_range(range: &str) -> Option<Vec<VersionReq>> {
    range.split("||").map(parse_comparator_set).collect()
}

/// Translate one npm comparator set into `semver` syntax.
///
/// npm separates comparators with whitespace, allows hyphen ranges and treats
/// a bare version as exact, whereas `semver` wants commas and reads a bare
/// version as a caret requirement.
fn parse_comparator_set(set: &str) -> Option<VersionReq> {
    let tokens: Vec<&str> = set.split_whitespace().collect();

    let comparators = match tokens.as_slice() {
        [] => return Some(VersionReq::STAR),
        [low, "-", high] => vec![
            format!(">={}", strip_v(low)),
            format!("<={}", strip_v(high)),
        ],
        _ => join_operators(&tokens)?
            .iter()
            .map(|token| normalize_comparator(token))
            .collect(),
    };

    VersionReq::parse(&comparators.join(", ")).ok()
}

/// Glue detached operators back onto their operand (`>= 1.0.0` → `>=1.0.0`).
fn join_operators(tokens: &[&str]) -> Option<Vec<String>> {
    let mut joined = Vec::with_capacity(tokens.len());
    let mut pending: Option<&str> = None;

    for token in tokens {
        if is_operator(token) {
            if pending.is_some() {
                return None;
            }
            pending = Some(token);
            continue;
        }
        match pending.take() {
            Some(op) => joined.push(format!("{}{}", op, token)),
            None => joined.push(token.to_string()),
        }
    }

    // dangling operator
    if pending.is_some() {
        return None;
    }
    Some(joined)
}

fn is_operator(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^'))
}

fn normalize_comparator(token: &str) -> String {
    let split = token
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
        .unwrap_or(token.len());
    let (op, operand) = token.split_at(split);
    let operand = strip_v(operand);

    if !op.is_empty() {
        return format!("{}{}", op, operand);
    }
    if is_wildcard(operand) {
        return operand.to_string();
    }
    format!("={}", operand)
}

fn is_wildcard(operand: &str) -> bool {
    operand
        .split('.')
        .any(|part| matches!(part, "*" | "x" | "X"))
}

fn strip_v(operand: &str) -> &str {
    operand.trim_start_matches(['v', 'V'])
}
