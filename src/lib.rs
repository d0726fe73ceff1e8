pub mod config;
pub mod error;
pub mod exceptions;
pub mod init;
pub mod license;
pub mod output;
pub mod policy;
pub mod validator;

// Re-export main types for easy access
pub use error::ValidateError;
pub use exceptions::{ExceptionRule, ExceptionRuleError};
pub use license::{Dependency, DiscoveryOptions, NodeModulesDiscovery};
pub use output::StandardFormatter;
pub use policy::{LicensePolicy, Decision, ValidationResult};
pub use validator::{validate, Delivery, Discovery, Formatter, ValidationReport, Validator};
