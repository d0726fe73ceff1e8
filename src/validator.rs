use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::error::ValidateError;
use crate::license::{Dependency, DiscoveryOptions, NodeModulesDiscovery};
use crate::output::StandardFormatter;
use crate::policy::{LicensePolicy, ValidationResult};

/// Finds installed packages and their declared licenses.
///
/// `Ok(None)` means the collaborator produced nothing usable.
pub trait Discovery {
    fn find(&self, root: &Path) -> Result<Option<Vec<Dependency>>>;
}

/// Renders discovered packages as human-readable text.
pub trait Formatter {
    fn render(&self, packages: &[Dependency]) -> Result<String>;
}

/// Everything a successful run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub generated_at: DateTime<Utc>,
    pub root: PathBuf,
    #[serde(flatten)]
    pub result: ValidationResult,
    /// Formatter output for the raw discovered data
    pub summary: String,
}

/// How a run reports its outcome, fixed once at entry.
pub enum Delivery<F> {
    /// Failures are returned straight to the caller
    Immediate,
    /// Every outcome, including argument errors, goes to the handler
    Handler(F),
}

impl<F> Delivery<F>
where
    F: FnOnce(Result<ValidationReport, ValidateError>),
{
    pub fn from_handler(handler: Option<F>) -> Self {
        match handler {
            Some(handler) => Delivery::Handler(handler),
            None => Delivery::Immediate,
        }
    }

    fn fail(self, err: ValidateError) -> Result<(), ValidateError> {
        match self {
            Delivery::Immediate => Err(err),
            Delivery::Handler(handler) => {
                handler(Err(err));
                Ok(())
            }
        }
    }
}

/// Runs validations with a discovery and a formatting collaborator.
///
/// [`Validator::new`] wires up the production ones; tests plug in doubles via
/// [`Validator::with_collaborators`].
pub struct Validator<D = NodeModulesDiscovery, F = StandardFormatter> {
    discovery: D,
    formatter: F,
}

impl Validator {
    /// Validator backed by the `node_modules` walker and the standard formatter.
    pub fn new(options: DiscoveryOptions) -> Self {
        Self {
            discovery: NodeModulesDiscovery::new(options),
            formatter: StandardFormatter,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DiscoveryOptions::default())
    }
}

impl<D: Discovery, F: Formatter> Validator<D, F> {
    pub fn with_collaborators(discovery: D, formatter: F) -> Self {
        Self { discovery, formatter }
    }

    /// Run a validation and hand the outcome to `on_complete`.
    ///
    /// With a handler, every error (argument errors included) is delivered to
    /// it and this returns `Ok(())`. Without one, argument errors are returned
    /// directly, ending with [`ValidateError::NoCallback`] once the other
    /// arguments check out.
    pub fn run<C>(
        &self,
        root: Option<&Path>,
        policy: Option<&LicensePolicy>,
        on_complete: Option<C>,
    ) -> Result<(), ValidateError>
    where
        C: FnOnce(Result<ValidationReport, ValidateError>),
    {
        let delivery = Delivery::from_handler(on_complete);

        let (root, policy) = match check_arguments(root, policy) {
            Ok(args) => args,
            Err(err) => return delivery.fail(err),
        };

        match delivery {
            Delivery::Immediate => Err(ValidateError::NoCallback),
            Delivery::Handler(handler) => {
                handler(self.execute(root, policy));
                Ok(())
            }
        }
    }

    /// Run a validation and return the outcome directly.
    pub fn check(&self, root: &Path, policy: &LicensePolicy) -> Result<ValidationReport, ValidateError> {
        let (root, policy) = check_arguments(Some(root), Some(policy))?;
        self.execute(root, policy)
    }

    fn execute(&self, root: &Path, policy: &LicensePolicy) -> Result<ValidationReport, ValidateError> {
        let packages = self
            .discovery
            .find(root)
            .map_err(ValidateError::Discovery)?
            .ok_or(ValidateError::InvalidData)?;

        if packages.is_empty() {
            return Err(ValidateError::NoLicenses);
        }

        let summary = self
            .formatter
            .render(&packages)
            .map_err(ValidateError::Format)?;

        Ok(ValidationReport {
            generated_at: Utc::now(),
            root: root.to_path_buf(),
            result: policy.check(&packages),
            summary,
        })
    }
}

/// Convenience entry point using the production collaborators.
pub fn validate<C>(
    root: Option<&Path>,
    policy: Option<&LicensePolicy>,
    on_complete: Option<C>,
) -> Result<(), ValidateError>
where
    C: FnOnce(Result<ValidationReport, ValidateError>),
{
    Validator::new(DiscoveryOptions::default()).run(root, policy, on_complete)
}

fn check_arguments<'a>(
    root: Option<&'a Path>,
    policy: Option<&'a LicensePolicy>,
) -> Result<(&'a Path, &'a LicensePolicy), ValidateError> {
    let root = match root {
        Some(root) if !root.as_os_str().is_empty() => root,
        _ => return Err(ValidateError::MissingRootDir),
    };

    let metadata = fs::metadata(root).map_err(|source| ValidateError::RootDirUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ValidateError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let policy = policy.ok_or(ValidateError::InvalidOptions)?;
    if policy.is_empty() {
        return Err(ValidateError::NoLicensesOrPackages);
    }

    Ok((root, policy))
}
