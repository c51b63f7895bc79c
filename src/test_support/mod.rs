//! Mocks and builders for unit tests.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use semver::Version;

use crate::facts::{FactProvider, Selector};
use crate::resolver::context::ResolverContext;
use crate::util::overrides::Overrides;

/// Call counters for asserting that memoization suppresses probes.
#[derive(Debug, Default)]
pub struct Counters {
    pub platform_calls: Cell<usize>,
    pub vendor_calls: Cell<usize>,
    pub version_calls: Cell<usize>,
    pub probe_calls: Cell<usize>,
}

/// Scripted fact provider.
#[derive(Debug, Clone)]
pub struct MockFacts {
    platform: String,
    vendor: String,
    version: Version,
    std_atomics: bool,
    counters: Rc<Counters>,
}

impl MockFacts {
    pub fn new(
        platform: impl Into<String>,
        vendor: impl Into<String>,
        version: Version,
        std_atomics: bool,
    ) -> Self {
        MockFacts {
            platform: platform.into(),
            vendor: vendor.into(),
            version,
            std_atomics,
            counters: Rc::new(Counters::default()),
        }
    }

    /// A commodity linux box with a recent gcc.
    pub fn generic_linux() -> Self {
        MockFacts::new("linux64", "gnu", Version::new(13, 2, 0), true)
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_compiler(mut self, vendor: impl Into<String>, version: Version) -> Self {
        self.vendor = vendor.into();
        self.version = version;
        self
    }

    pub fn with_std_atomics(mut self, std_atomics: bool) -> Self {
        self.std_atomics = std_atomics;
        self
    }

    pub fn counters(&self) -> Rc<Counters> {
        Rc::clone(&self.counters)
    }
}

impl FactProvider for MockFacts {
    fn platform_family(&self, _selector: Selector) -> Result<String> {
        self.counters.platform_calls.set(self.counters.platform_calls.get() + 1);
        Ok(self.platform.clone())
    }

    fn compiler_vendor(&self, _selector: Selector) -> Result<String> {
        self.counters.vendor_calls.set(self.counters.vendor_calls.get() + 1);
        Ok(self.vendor.clone())
    }

    fn compiler_version(&self, _selector: Selector) -> Result<Version> {
        self.counters.version_calls.set(self.counters.version_calls.get() + 1);
        Ok(self.version.clone())
    }

    fn has_std_atomics(&self) -> Result<bool> {
        self.counters.probe_calls.set(self.counters.probe_calls.get() + 1);
        Ok(self.std_atomics)
    }
}

/// Build a context from override pairs and a scripted fact provider.
pub fn context_with(pairs: &[(&str, &str)], facts: MockFacts) -> ResolverContext {
    let overrides = Overrides::from_pairs(pairs.iter().copied());
    ResolverContext::new(overrides, Box::new(facts))
}
