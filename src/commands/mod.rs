//! Command implementations

pub mod clean;
pub mod init;

pub use clean::run_clean;
pub use init::run_init;
