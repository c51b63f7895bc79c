//! Capstan - A build-environment configuration resolver for HPC toolchains
//!
//! This crate derives a consistent, validated set of build configuration
//! variables (network fabric, communication layer, communication substrate,
//! atomics strategy, rpmalloc add-on) from user overrides, detected platform
//! facts, and detected compiler facts. The resolved variables are consumed
//! downstream to select compiler and linker flags.

pub mod facts;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for Capstan unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted fact provider and context
/// builders for exercising the resolvers without a real toolchain.
#[cfg(test)]
pub mod test_support;

pub use facts::{FactProvider, Selector};
pub use resolver::context::{Provenance, Resolution, ResolverContext};
pub use resolver::errors::ConfigError;
pub use resolver::{AtomicsSelector, VarKey};
pub use util::diagnostic::Diagnostic;
pub use util::overrides::Overrides;
