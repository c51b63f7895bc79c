//! Compiler vendor/version detection and capability probes.
//!
//! Vendor and version come from running the compiler with `--version`
//! and parsing its banner. On Cray/HPE machines the loaded programming
//! environment names the vendor directly. The standard-atomics probe
//! test-compiles a snippet, since clang's support depends on the system
//! headers it was paired with.

use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use semver::Version;
use which::which;

use crate::facts::platform::detect_platform_family;
use crate::facts::{FactProvider, Selector};
use crate::resolver::vars;
use crate::util::overrides::Overrides;

/// Fact provider that probes the running system.
#[derive(Debug, Clone)]
pub struct DetectedFacts {
    overrides: Overrides,
}

impl DetectedFacts {
    pub fn new(overrides: Overrides) -> Self {
        DetectedFacts { overrides }
    }

    /// Locate the C compiler for the given selector.
    ///
    /// Priority: explicit override, then `CC`, then the usual names on
    /// `PATH`.
    fn compiler_path(&self, selector: Selector) -> Result<PathBuf> {
        if let Some(name) = self.overrides.get(vars::compiler(selector)) {
            // A bare vendor tag selects the vendor, not a binary.
            if !is_vendor_tag(name) {
                return which(name).with_context(|| {
                    format!("configured {selector} compiler `{name}` not found")
                });
            }
        }

        if let Ok(cc) = std::env::var("CC") {
            if !cc.is_empty() {
                return Ok(PathBuf::from(cc));
            }
        }

        which("cc")
            .or_else(|_| which("gcc"))
            .or_else(|_| which("clang"))
            .context("no C compiler found; set CC or install gcc/clang")
    }

    fn version_banner(&self, selector: Selector) -> Result<String> {
        let cc = self.compiler_path(selector)?;
        let output = Command::new(&cc)
            .arg("--version")
            .output()
            .with_context(|| format!("failed to run `{} --version`", cc.display()))?;

        if !output.status.success() {
            bail!("`{} --version` exited with {}", cc.display(), output.status);
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl FactProvider for DetectedFacts {
    fn platform_family(&self, selector: Selector) -> Result<String> {
        Ok(detect_platform_family(&self.overrides, selector))
    }

    fn compiler_vendor(&self, selector: Selector) -> Result<String> {
        if let Some(vendor) = self.overrides.get(vars::compiler(selector)) {
            // An override naming a known vendor tag short-circuits
            // detection; anything else is treated as a compiler to probe.
            if is_vendor_tag(vendor) {
                return Ok(vendor.to_string());
            }
        }

        // A loaded Cray programming environment names the vendor.
        if let Ok(pe) = std::env::var("PE_ENV") {
            if let Some(vendor) = prgenv_vendor(&pe) {
                tracing::info!("compiler vendor ({selector}) from PE_ENV: {vendor}");
                return Ok(vendor.to_string());
            }
        }

        let banner = self.version_banner(selector)?;
        let vendor = vendor_from_banner(&banner)?;
        tracing::info!("compiler vendor ({selector}): {vendor}");
        Ok(vendor.to_string())
    }

    fn compiler_version(&self, selector: Selector) -> Result<Version> {
        let banner = self.version_banner(selector)?;
        let version = version_from_banner(&banner)
            .with_context(|| format!("could not parse a version from: {}", banner.trim()))?;
        tracing::info!("compiler version ({selector}): {version}");
        Ok(version)
    }

    fn has_std_atomics(&self) -> Result<bool> {
        let cc = self.compiler_path(Selector::Target)?;

        let dir = tempfile::tempdir().context("failed to create probe directory")?;
        let source = dir.path().join("std_atomics_probe.c");
        let object = dir.path().join("std_atomics_probe.o");

        std::fs::write(
            &source,
            "#include <stdatomic.h>\n\
             #ifdef __STDC_NO_ATOMICS__\n\
             #error no standard atomics\n\
             #endif\n\
             atomic_int probe;\n",
        )
        .context("failed to write probe source")?;

        let status = Command::new(&cc)
            .arg("-c")
            .arg(&source)
            .arg("-o")
            .arg(&object)
            .status()
            .with_context(|| format!("failed to run probe with `{}`", cc.display()))?;

        tracing::debug!("standard-atomics probe: {}", status.success());
        Ok(status.success())
    }
}

/// Vendor tags we recognize as direct overrides.
fn is_vendor_tag(value: &str) -> bool {
    matches!(
        value,
        "gnu"
            | "mpi-gnu"
            | "clang"
            | "llvm"
            | "intel"
            | "allinea"
            | "cray-prgenv-gnu"
            | "cray-prgenv-cray"
            | "cray-prgenv-intel"
            | "cray-prgenv-allinea"
    )
}

/// Map a `PE_ENV` value onto a vendor tag.
fn prgenv_vendor(pe: &str) -> Option<&'static str> {
    match pe.to_uppercase().as_str() {
        "GNU" => Some("cray-prgenv-gnu"),
        "CRAY" => Some("cray-prgenv-cray"),
        "INTEL" => Some("cray-prgenv-intel"),
        "ALLINEA" | "ARM" => Some("cray-prgenv-allinea"),
        _ => None,
    }
}

/// Classify a `--version` banner into a vendor tag.
fn vendor_from_banner(banner: &str) -> Result<&'static str> {
    let lower = banner.to_lowercase();
    if lower.contains("clang") {
        Ok("clang")
    } else if lower.contains("icc") || lower.contains("oneapi") || lower.contains("intel") {
        Ok("intel")
    } else if lower.contains("gcc") || lower.contains("free software foundation") {
        Ok("gnu")
    } else {
        bail!("unrecognized compiler banner: {}", banner.trim())
    }
}

/// Pull the first dotted version out of a `--version` banner.
fn version_from_banner(banner: &str) -> Option<Version> {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    let re = VERSION_RE
        .get_or_init(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("static regex"));

    let caps = re.captures(banner)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    Some(Version::new(major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_from_gcc_banner() {
        let banner = "gcc (Ubuntu 13.2.0-4ubuntu3) 13.2.0\n\
                      Copyright (C) 2023 Free Software Foundation, Inc.";
        assert_eq!(vendor_from_banner(banner).unwrap(), "gnu");
    }

    #[test]
    fn test_vendor_from_clang_banner() {
        let banner = "Apple clang version 15.0.0 (clang-1500.1.0.2.5)";
        assert_eq!(vendor_from_banner(banner).unwrap(), "clang");
    }

    #[test]
    fn test_vendor_unrecognized() {
        assert!(vendor_from_banner("tcc version unknown").is_err());
    }

    #[test]
    fn test_version_from_banner() {
        let banner = "gcc (GCC) 4.8.5 20150623 (Red Hat 4.8.5-44)";
        assert_eq!(version_from_banner(banner), Some(Version::new(4, 8, 5)));
    }

    #[test]
    fn test_version_without_patch() {
        assert_eq!(
            version_from_banner("cc thing 12.3"),
            Some(Version::new(12, 3, 0))
        );
    }

    #[test]
    fn test_prgenv_mapping() {
        assert_eq!(prgenv_vendor("GNU"), Some("cray-prgenv-gnu"));
        assert_eq!(prgenv_vendor("cray"), Some("cray-prgenv-cray"));
        assert_eq!(prgenv_vendor("PGI"), None);
    }
}
