pub mod checker;
pub mod models;
pub mod version;

// Re-export commonly used items
pub use checker::{pin, resolve};
pub use models::{ExceptionRule, ExceptionRuleError};
