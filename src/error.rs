use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a validation run.
///
/// Argument errors are checked before any discovery happens. Collaborator
/// errors are passed through untouched so callers can downcast them.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// Root directory missing or empty
    #[error("invalid rootDir: a non-empty project root path is required")]
    MissingRootDir,

    /// Root directory could not be inspected (usually because it does not exist)
    #[error("invalid rootDir: {}: {source}", path.display())]
    RootDirUnreadable { path: PathBuf, source: io::Error },

    /// Root path exists but is not a directory
    #[error("invalid rootDir: {} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("invalid options: a policy is required")]
    InvalidOptions,

    #[error("no licenses or packages specified")]
    NoLicensesOrPackages,

    #[error("no callback specified")]
    NoCallback,

    /// Error raised by the discovery collaborator, unmodified
    #[error(transparent)]
    Discovery(anyhow::Error),

    /// Discovery produced nothing usable
    #[error("license discovery returned invalid data")]
    InvalidData,

    #[error("license discovery found no licenses")]
    NoLicenses,

    /// Error raised by the formatting collaborator, unmodified
    #[error(transparent)]
    Format(anyhow::Error),
}

impl ValidateError {
    /// True for the argument errors checked before discovery runs.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            ValidateError::MissingRootDir
                | ValidateError::RootDirUnreadable { .. }
                | ValidateError::NotADirectory { .. }
                | ValidateError::InvalidOptions
                | ValidateError::NoLicensesOrPackages
                | ValidateError::NoCallback
        )
    }
}
