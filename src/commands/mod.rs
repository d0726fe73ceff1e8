pub mod check;
pub mod init;
pub mod fix;
pub mod config;

pub use check::handle_check;
pub use init::handle_init;
pub use fix::handle_fix;
pub use config::handle_config;
