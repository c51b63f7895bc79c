//! Detected facts about the build environment.
//!
//! Fact providers answer questions about the platform and the toolchain
//! (platform family, compiler vendor and version, capability probes).
//! They are populated once at process start and treated as immutable;
//! resolution memoization guarantees each fact is needed at most once
//! per variable.

pub mod compiler;
pub mod platform;

use std::fmt;

use anyhow::Result;
use semver::Version;

pub use compiler::DetectedFacts;

/// Discriminates the host-system and target-system variants of a
/// configuration variable or fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// The system the build tools run on.
    Host,
    /// The system the built program runs on.
    Target,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Host => write!(f, "host"),
            Selector::Target => write!(f, "target"),
        }
    }
}

/// Source of detected platform and compiler facts.
///
/// The production implementation probes the running system (and may
/// invoke the compiler binary, a synchronous, non-cancelable call).
/// Tests substitute a scripted provider. A probe failure is fatal to
/// the whole resolution pass.
pub trait FactProvider {
    /// Platform family tag, e.g. `cray-xc`, `hpe-cray-ex`, `darwin`,
    /// `linux64`.
    fn platform_family(&self, selector: Selector) -> Result<String>;

    /// Compiler vendor tag, e.g. `gnu`, `clang`, `intel`,
    /// `cray-prgenv-gnu`.
    fn compiler_vendor(&self, selector: Selector) -> Result<String>;

    /// Compiler version. Only the major and minor components
    /// participate in decisions; the patch level is carried for
    /// diagnostics.
    fn compiler_version(&self, selector: Selector) -> Result<Version>;

    /// Whether the target compiler supports C11 standard atomics.
    /// Only consulted for the clang vendor branch.
    fn has_std_atomics(&self) -> Result<bool>;
}
