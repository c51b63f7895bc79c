//! The configuration variable resolvers.
//!
//! Each variable has one resolution function that consults the override
//! source first, then falls back to inference from facts and other
//! resolved variables, then to a hard default. The dependency graph
//! between variables is small, fixed, and acyclic:
//!
//! ```text
//! network         -> platform facts
//! comm            -> network
//! comm-substrate  -> comm, network
//! atomics/network -> comm, atomics/target
//! atomics/target  -> compiler facts, platform facts
//! rpmalloc        -> mem
//! ```
//!
//! All queries go through [`context::ResolverContext::get`], which
//! memoizes per (variable, selector) key and makes repeated queries
//! answer-stable within one process.

pub mod atomics;
pub mod comm;
pub mod context;
pub mod errors;
pub mod mem;
pub mod network;
pub mod rpmalloc;
pub mod substrate;

use std::fmt;

use crate::facts::Selector;

/// Override variable names.
pub mod vars {
    use crate::facts::Selector;

    pub const NETWORK: &str = "CAPSTAN_NETWORK";
    pub const COMM: &str = "CAPSTAN_COMM";
    pub const COMM_SUBSTRATE: &str = "CAPSTAN_COMM_SUBSTRATE";
    pub const NETWORK_ATOMICS: &str = "CAPSTAN_NETWORK_ATOMICS";
    pub const ATOMICS: &str = "CAPSTAN_ATOMICS";
    pub const TARGET_RPMALLOC: &str = "CAPSTAN_TARGET_RPMALLOC";
    pub const TARGET_MEM: &str = "CAPSTAN_TARGET_MEM";
    pub const HOST_MEM: &str = "CAPSTAN_HOST_MEM";

    /// Memory-allocator variable name for a selector.
    pub fn mem(selector: Selector) -> &'static str {
        match selector {
            Selector::Host => HOST_MEM,
            Selector::Target => TARGET_MEM,
        }
    }

    /// Platform-family hint variable for a selector.
    pub fn platform(selector: Selector) -> &'static str {
        match selector {
            Selector::Host => "CAPSTAN_HOST_PLATFORM",
            Selector::Target => "CAPSTAN_TARGET_PLATFORM",
        }
    }

    /// Compiler hint variable for a selector.
    pub fn compiler(selector: Selector) -> &'static str {
        match selector {
            Selector::Host => "CAPSTAN_HOST_COMPILER",
            Selector::Target => "CAPSTAN_TARGET_COMPILER",
        }
    }
}

/// Discriminates the two flavors of the atomics variable family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicsSelector {
    /// Atomics executed by the network hardware/runtime.
    Network,
    /// Atomics strategy compiled into target code.
    Target,
}

impl fmt::Display for AtomicsSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomicsSelector::Network => write!(f, "network"),
            AtomicsSelector::Target => write!(f, "target"),
        }
    }
}

/// Memoization key: one logical configuration variable per variant,
/// discriminated by selector where the variable has flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKey {
    Network,
    Comm,
    CommSubstrate,
    Atomics(AtomicsSelector),
    Rpmalloc(Selector),
    Mem(Selector),
}

impl VarKey {
    /// The override variable name this key answers for.
    pub fn variable_name(&self) -> &'static str {
        match self {
            VarKey::Network => vars::NETWORK,
            VarKey::Comm => vars::COMM,
            VarKey::CommSubstrate => vars::COMM_SUBSTRATE,
            VarKey::Atomics(AtomicsSelector::Network) => vars::NETWORK_ATOMICS,
            VarKey::Atomics(AtomicsSelector::Target) => vars::ATOMICS,
            VarKey::Rpmalloc(_) => vars::TARGET_RPMALLOC,
            VarKey::Mem(selector) => vars::mem(*selector),
        }
    }
}

impl fmt::Display for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKey::Network => write!(f, "network"),
            VarKey::Comm => write!(f, "comm"),
            VarKey::CommSubstrate => write!(f, "comm-substrate"),
            VarKey::Atomics(selector) => write!(f, "atomics({selector})"),
            VarKey::Rpmalloc(selector) => write!(f, "rpmalloc({selector})"),
            VarKey::Mem(selector) => write!(f, "mem({selector})"),
        }
    }
}
