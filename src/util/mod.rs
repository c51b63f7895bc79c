//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod overrides;

pub use config::Config;
pub use diagnostic::Diagnostic;
pub use overrides::Overrides;
