//! Command implementations

pub mod completions;
pub mod env;
pub mod print;
