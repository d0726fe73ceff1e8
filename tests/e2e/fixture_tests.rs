use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use npm_license_validator::{
    validate, Dependency, Discovery, ExceptionRule, Formatter, LicensePolicy, ValidateError,
    ValidationReport, Validator,
};
use super::helpers::TestProject;

#[derive(Debug)]
struct BrokenTool(&'static str);

impl fmt::Display for BrokenTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BrokenTool {}

enum Found {
    Packages(Vec<Dependency>),
    Nothing,
    Fails,
}

impl Discovery for Found {
    fn find(&self, _root: &Path) -> anyhow::Result<Option<Vec<Dependency>>> {
        match self {
            Found::Packages(packages) => Ok(Some(packages.clone())),
            Found::Nothing => Ok(None),
            Found::Fails => Err(BrokenTool("discovery exploded").into()),
        }
    }
}

struct Text {
    fails: bool,
}

impl Formatter for Text {
    fn render(&self, packages: &[Dependency]) -> anyhow::Result<String> {
        if self.fails {
            return Err(BrokenTool("formatter exploded").into());
        }
        Ok(format!("{} packages", packages.len()))
    }
}

fn fixture() -> Vec<Dependency> {
    vec![
        Dependency::new("my-app@1.0.0", ["MIT"]),
        Dependency::new("dual@2.1.0", ["(GPL-2.0 OR MIT)"]),
        Dependency::new("both@0.4.0", ["(MIT AND Apache-2.0)"]),
        Dependency::new("legacy@0.9.1", ["WTFPL"]),
        Dependency::new("@scope/tool@3.0.0", ["GPL-3.0"]),
        Dependency::new("mystery@1.0.0", Vec::<String>::new()),
    ]
}

fn validator(found: Found) -> Validator<Found, Text> {
    Validator::with_collaborators(found, Text { fails: false })
}

fn run(
    validator: &Validator<Found, Text>,
    root: Option<&Path>,
    policy: Option<&LicensePolicy>,
) -> Result<ValidationReport, ValidateError> {
    let outcome = RefCell::new(None);
    validator
        .run(root, policy, Some(|result| *outcome.borrow_mut() = Some(result)))
        .expect("handler delivery never returns an error");
    outcome.into_inner().expect("handler was called")
}

#[test]
fn test_fixture_against_policy() {
    let temp_dir = tempfile::tempdir().unwrap();
    let policy = LicensePolicy::new(
        ["MIT", "Apache-2.0"],
        vec![ExceptionRule::parse("legacy@~0.9.0").unwrap()],
    );

    let report = run(&validator(Found::Packages(fixture())), Some(temp_dir.path()), Some(&policy)).unwrap();
    let result = report.result;

    assert_eq!(result.packages["my-app@1.0.0"], "MIT");
    assert_eq!(result.packages["dual@2.1.0"], "(GPL-2.0 OR MIT)");
    assert_eq!(result.packages["both@0.4.0"], "(MIT AND Apache-2.0)");
    assert_eq!(result.packages["legacy@0.9.1"], "WTFPL (exception: legacy@~0.9.0)");
    assert_eq!(result.packages["@scope/tool@3.0.0"], "GPL-3.0");
    assert_eq!(result.packages["mystery@1.0.0"], "");

    assert_eq!(result.invalids, vec!["@scope/tool@3.0.0", "mystery@1.0.0"]);
    assert!(result.licenses.contains("MIT"));
    assert!(!result.licenses.contains("WTFPL"));
    assert_eq!(report.summary, "6 packages");
}

#[test]
fn test_scoped_exception_with_range() {
    let temp_dir = tempfile::tempdir().unwrap();
    let covered = LicensePolicy::new(["MIT"], vec![ExceptionRule::parse("@scope/tool@>=3 <4").unwrap()]);
    let missed = LicensePolicy::new(["MIT"], vec![ExceptionRule::parse("@scope/tool@^2.0.0").unwrap()]);

    let report = run(&validator(Found::Packages(fixture())), Some(temp_dir.path()), Some(&covered)).unwrap();
    assert!(!report.result.is_invalid("@scope/tool@3.0.0"));

    let report = run(&validator(Found::Packages(fixture())), Some(temp_dir.path()), Some(&missed)).unwrap();
    assert!(report.result.is_invalid("@scope/tool@3.0.0"));
}

#[test]
fn test_argument_errors_reach_handler() {
    let temp_dir = tempfile::tempdir().unwrap();
    let validator = validator(Found::Packages(fixture()));
    let policy = LicensePolicy::new(["MIT"], vec![]);

    let err = run(&validator, None, Some(&policy)).unwrap_err();
    assert!(matches!(err, ValidateError::MissingRootDir));

    let missing = temp_dir.path().join("nope");
    let err = run(&validator, Some(&missing), Some(&policy)).unwrap_err();
    assert!(err.to_string().starts_with("invalid rootDir"));

    let err = run(&validator, Some(temp_dir.path()), None).unwrap_err();
    assert_eq!(err.to_string(), "invalid options: a policy is required");

    let err = run(&validator, Some(temp_dir.path()), Some(&LicensePolicy::default())).unwrap_err();
    assert_eq!(err.to_string(), "no licenses or packages specified");
    assert!(err.is_argument_error());
}

#[test]
fn test_without_handler_errors_are_returned() {
    let temp_dir = tempfile::tempdir().unwrap();
    let validator = validator(Found::Packages(fixture()));
    let policy = LicensePolicy::new(["MIT"], vec![]);
    type Handler = fn(Result<ValidationReport, ValidateError>);

    let err = validator.run::<Handler>(None, Some(&policy), None).unwrap_err();
    assert!(matches!(err, ValidateError::MissingRootDir));

    let err = validator.run::<Handler>(Some(temp_dir.path()), Some(&policy), None).unwrap_err();
    assert_eq!(err.to_string(), "no callback specified");
}

#[test]
fn test_collaborator_errors_pass_through() {
    let temp_dir = tempfile::tempdir().unwrap();
    let policy = LicensePolicy::new(["MIT"], vec![]);

    let err = run(&validator(Found::Fails), Some(temp_dir.path()), Some(&policy)).unwrap_err();
    match err {
        ValidateError::Discovery(inner) => {
            assert_eq!(inner.downcast_ref::<BrokenTool>().unwrap().0, "discovery exploded");
        }
        other => panic!("unexpected error: {other}"),
    }

    let validator = Validator::with_collaborators(Found::Packages(fixture()), Text { fails: true });
    let err = run(&validator, Some(temp_dir.path()), Some(&policy)).unwrap_err();
    assert!(matches!(err, ValidateError::Format(_)));
    assert_eq!(err.to_string(), "formatter exploded");
}

#[test]
fn test_unusable_discovery_output() {
    let temp_dir = tempfile::tempdir().unwrap();
    let policy = LicensePolicy::new(["MIT"], vec![]);

    let err = run(&validator(Found::Nothing), Some(temp_dir.path()), Some(&policy)).unwrap_err();
    assert_eq!(err.to_string(), "license discovery returned invalid data");

    let err = run(&validator(Found::Packages(vec![])), Some(temp_dir.path()), Some(&policy)).unwrap_err();
    assert_eq!(err.to_string(), "license discovery found no licenses");
}

#[test]
fn test_validate_with_production_collaborators() {
    let test_env = TestProject::new();
    test_env.init_node_project("app", "MIT", &["gpl-thing"]);
    test_env.install("gpl-thing", "2.0.0", "GPL-3.0");
    let policy = LicensePolicy::new(["MIT"], vec![]);

    let outcome = RefCell::new(None);
    validate(
        Some(test_env.root()),
        Some(&policy),
        Some(|result| *outcome.borrow_mut() = Some(result)),
    )
    .unwrap();

    let report: ValidationReport = outcome.into_inner().unwrap().unwrap();
    assert_eq!(report.result.invalids, vec!["gpl-thing@2.0.0"]);
    assert_eq!(report.result.packages["app@1.0.0"], "MIT");
    assert!(report.summary.contains("gpl-thing@2.0.0 [license(s): GPL-3.0]"));

    type Handler = fn(Result<ValidationReport, ValidateError>);
    let err = validate::<Handler>(Some(test_env.root()), Some(&policy), None).unwrap_err();
    assert!(matches!(err, ValidateError::NoCallback));
}
