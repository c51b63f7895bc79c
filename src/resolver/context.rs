//! The resolver context: overrides, facts, and the memoization cache.
//!
//! All resolution goes through [`ResolverContext::get`]. A resolver may
//! recursively query other variables through the same entry point; the
//! recursion is bounded by the fixed, acyclic dependency graph. The
//! cache is write-once per key, so a resolver body executes at most
//! once per (variable, selector) pair and repeated queries return the
//! identical value without re-reading overrides or re-probing facts.
//!
//! The context is single-threaded by contract; `RefCell` documents that.

use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::Result;

use crate::facts::{DetectedFacts, FactProvider, Selector};
use crate::resolver::errors::ConfigError;
use crate::resolver::{atomics, comm, mem, network, rpmalloc, substrate, AtomicsSelector, VarKey};
use crate::util::config::{global_config_path, load_config, project_config_path};
use crate::util::diagnostic::Diagnostic;
use crate::util::overrides::Overrides;

/// Where a resolved value came from. Display-only; downstream logic
/// never branches on provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The user supplied the value explicitly.
    Override,
    /// Derived from platform/compiler facts or other resolved variables.
    Inferred,
    /// The hard fallback when nothing else applied.
    Default,
}

/// The concrete value chosen for a configuration variable, with its
/// provenance and any advisory warnings produced while resolving it.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub value: String,
    pub provenance: Provenance,
    pub warnings: Vec<Diagnostic>,
}

impl Resolution {
    pub fn overridden(value: impl Into<String>) -> Self {
        Resolution {
            value: value.into(),
            provenance: Provenance::Override,
            warnings: Vec::new(),
        }
    }

    pub fn inferred(value: impl Into<String>) -> Self {
        Resolution {
            value: value.into(),
            provenance: Provenance::Inferred,
            warnings: Vec::new(),
        }
    }

    pub fn fallback(value: impl Into<String>) -> Self {
        Resolution {
            value: value.into(),
            provenance: Provenance::Default,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: Diagnostic) -> Self {
        self.warnings.push(warning);
        self
    }
}

/// Owns the override source, the fact provider, and the memoization
/// cache. There is no ambient global state; every resolve call receives
/// the context explicitly.
pub struct ResolverContext {
    overrides: Overrides,
    facts: Box<dyn FactProvider>,
    cache: RefCell<HashMap<VarKey, Resolution>>,
    in_flight: RefCell<Vec<VarKey>>,
}

impl ResolverContext {
    pub fn new(overrides: Overrides, facts: Box<dyn FactProvider>) -> Self {
        ResolverContext {
            overrides,
            facts,
            cache: RefCell::new(HashMap::new()),
            in_flight: RefCell::new(Vec::new()),
        }
    }

    /// Build a context from the config files, the process environment,
    /// and system-probing fact providers.
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let project_path = project_config_path(&cwd);
        let config = match global_config_path() {
            Some(global) => load_config(&global, &project_path),
            None => load_config(&project_path, &project_path),
        };

        let overrides = Overrides::from_env(&config);
        let facts = DetectedFacts::new(overrides.clone());
        Ok(ResolverContext::new(overrides, Box::new(facts)))
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn facts(&self) -> &dyn FactProvider {
        &*self.facts
    }

    /// Resolve a variable, memoized.
    ///
    /// The first call for a key runs the full resolution/validation
    /// pipeline; every later call returns the cached resolution.
    pub fn get(&self, key: VarKey) -> Result<Resolution, ConfigError> {
        if let Some(hit) = self.cache.borrow().get(&key) {
            return Ok(hit.clone());
        }

        // The fixed graph is acyclic by construction; a cycle here is a
        // programming defect in a resolver, so fail loudly.
        {
            let stack = self.in_flight.borrow();
            if stack.contains(&key) {
                panic!(
                    "dependency cycle while resolving {}: stack {:?}",
                    key, stack
                );
            }
        }

        self.in_flight.borrow_mut().push(key);
        let result = self.dispatch(key);
        self.in_flight.borrow_mut().pop();

        let resolution = result?;
        tracing::debug!("resolved {} = {}", key, resolution.value);
        self.cache
            .borrow_mut()
            .insert(key, resolution.clone());
        Ok(resolution)
    }

    /// Resolve a variable and return just its token.
    pub fn value(&self, key: VarKey) -> Result<String, ConfigError> {
        self.get(key).map(|resolution| resolution.value)
    }

    fn dispatch(&self, key: VarKey) -> Result<Resolution, ConfigError> {
        match key {
            VarKey::Network => network::resolve(self),
            VarKey::Comm => comm::resolve(self),
            VarKey::CommSubstrate => substrate::resolve(self),
            VarKey::Atomics(AtomicsSelector::Network) => atomics::resolve_network(self),
            VarKey::Atomics(AtomicsSelector::Target) => atomics::resolve_target(self),
            VarKey::Rpmalloc(selector) => rpmalloc::resolve(self, selector),
            VarKey::Mem(selector) => mem::resolve(self, selector),
        }
    }
}

/// The variables printed by `capstan env`, in dependency order.
pub fn display_order() -> [VarKey; 7] {
    [
        VarKey::Network,
        VarKey::Comm,
        VarKey::CommSubstrate,
        VarKey::Atomics(AtomicsSelector::Target),
        VarKey::Atomics(AtomicsSelector::Network),
        VarKey::Mem(Selector::Target),
        VarKey::Rpmalloc(Selector::Target),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context_with, MockFacts};

    #[test]
    fn test_cache_returns_identical_value() {
        let ctx = context_with(&[], MockFacts::generic_linux());
        let first = ctx.get(VarKey::Network).unwrap();
        let second = ctx.get(VarKey::Network).unwrap();
        assert_eq!(first.value, second.value);
        assert_eq!(first.provenance, second.provenance);
    }

    #[test]
    fn test_cache_suppresses_fact_probes() {
        let facts = MockFacts::new("cray-xc", "gnu", semver::Version::new(13, 2, 0), true);
        let counters = facts.counters();
        let ctx = context_with(&[], facts);

        ctx.get(VarKey::Network).unwrap();
        let after_first = counters.platform_calls.get();
        assert!(after_first > 0);

        ctx.get(VarKey::Network).unwrap();
        ctx.get(VarKey::Network).unwrap();
        assert_eq!(counters.platform_calls.get(), after_first);
    }

    #[test]
    fn test_value_shortcut() {
        let ctx = context_with(&[("CAPSTAN_NETWORK", "aries")], MockFacts::generic_linux());
        assert_eq!(ctx.value(VarKey::Network).unwrap(), "aries");
    }
}
