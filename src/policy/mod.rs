pub mod config;
pub mod matcher;
pub mod checker;

// Re-export main types
pub use config::LicensePolicy;
pub use matcher::Decision;
pub use checker::{assemble, ValidationResult};
