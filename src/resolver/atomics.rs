//! Atomics strategy resolution, in two flavors.
//!
//! The network flavor names the atomics executed by the comm runtime
//! and must agree with the resolved comm layer. The target flavor names
//! the mechanism compiled into target code (C standard atomics,
//! compiler intrinsics, or mutexes) and is decided from the compiler
//! vendor, its version, and the platform word size. The two flavors are
//! deliberately coupled: network atomics are only enabled when target
//! atomics did not fall back to locks.

use semver::Version;

use crate::facts::platform::is_32_bit;
use crate::facts::Selector;
use crate::resolver::context::{Provenance, Resolution, ResolverContext};
use crate::resolver::errors::{check_valid, ConfigError};
use crate::resolver::{vars, AtomicsSelector, VarKey};
use crate::util::diagnostic::Diagnostic;

pub const VALID_NETWORK_ATOMICS: &[&str] = &["none", "ofi", "ugni"];
pub const VALID_TARGET_ATOMICS: &[&str] = &["cstdlib", "intrinsics", "locks"];

/// The platform family with no lock-based atomics support.
const NO_LOCKS_PLATFORM: &str = "darwin";

pub(crate) fn resolve_network(ctx: &ResolverContext) -> Result<Resolution, ConfigError> {
    let comm = ctx.value(VarKey::Comm)?;

    match ctx.overrides().get(vars::NETWORK_ATOMICS) {
        None => {
            let enabled = (comm == "ofi" || comm == "ugni")
                && ctx.value(VarKey::Atomics(AtomicsSelector::Target))? != "locks";
            if enabled {
                Ok(Resolution::inferred(comm))
            } else {
                Ok(Resolution::inferred("none"))
            }
        }
        Some("gasnet") => Err(ConfigError::NotSupported {
            variable: vars::NETWORK_ATOMICS,
            value: "gasnet".to_string(),
        }),
        Some(value) => {
            check_valid(vars::NETWORK_ATOMICS, value, VALID_NETWORK_ATOMICS)?;
            // `none` is always acceptable; anything else must match the
            // comm layer that would execute it.
            if value != "none" && value != comm {
                return Err(ConfigError::IncompatibleCombination {
                    variable: vars::NETWORK_ATOMICS,
                    value: value.to_string(),
                    other_variable: vars::COMM,
                    other_value: comm,
                });
            }
            Ok(Resolution::overridden(value))
        }
    }
}

pub(crate) fn resolve_target(ctx: &ResolverContext) -> Result<Resolution, ConfigError> {
    let override_val = ctx.overrides().get(vars::ATOMICS);
    let user_specified = override_val.is_some();
    let mut is_intel = false;

    let (value, provenance) = match override_val {
        Some(value) => (value.to_string(), Provenance::Override),
        None => {
            let vendor = ctx.facts().compiler_vendor(Selector::Target)?;
            is_intel = vendor == "intel" || vendor == "cray-prgenv-intel";
            match infer_target(ctx, &vendor)? {
                Some(value) => (value.to_string(), Provenance::Inferred),
                // Neither cstdlib nor intrinsics is usable.
                None => ("locks".to_string(), Provenance::Default),
            }
        }
    };

    check_valid(vars::ATOMICS, &value, VALID_TARGET_ATOMICS)?;

    let mut resolution = Resolution {
        value: value.clone(),
        provenance,
        warnings: Vec::new(),
    };

    if value == "intrinsics" {
        let mut msg = format!(
            "using {}=intrinsics is a known performance issue",
            vars::ATOMICS
        );
        if is_intel {
            msg.push_str(" but is required for portability with Intel compilers for the time being");
        } else if user_specified {
            msg.push_str(&format!(": please consider using {}=cstdlib", vars::ATOMICS));
        }
        resolution = resolution.with_warning(Diagnostic::warning(msg));
    }

    if value == "locks" {
        let platform = ctx.facts().platform_family(Selector::Target)?;
        if platform == NO_LOCKS_PLATFORM {
            return Err(ConfigError::UnsupportedOnPlatform {
                variable: vars::ATOMICS,
                value,
                platform,
            });
        }
    }

    Ok(resolution)
}

/// Decision table keyed by (vendor, version, word size).
///
/// Recent mainstream and LLVM-based compilers get C standard atomics.
/// gcc below 5 has buggy or missing pieces of the cstdlib
/// implementation, so capable-but-older gcc gets intrinsics; gcc 4.1
/// through 4.7 only supports 64-bit atomics on 64-bit platforms. clang
/// needs a probe because its cstdlib support depends on the system
/// headers. Anything below the capability floor returns `None` and the
/// caller falls back to locks.
fn infer_target(
    ctx: &ResolverContext,
    vendor: &str,
) -> Result<Option<&'static str>, ConfigError> {
    let choice = match vendor {
        "gnu" | "cray-prgenv-gnu" | "mpi-gnu" => {
            let version = ctx.facts().compiler_version(Selector::Target)?;
            let platform = ctx.facts().platform_family(Selector::Target)?;
            if version >= Version::new(5, 0, 0) {
                Some("cstdlib")
            } else if version >= Version::new(4, 8, 0) {
                Some("intrinsics")
            } else if version >= Version::new(4, 1, 0) && !is_32_bit(&platform) {
                Some("intrinsics")
            } else {
                None
            }
        }
        "intel" | "cray-prgenv-intel" => Some("intrinsics"),
        "cray-prgenv-cray" => Some("cstdlib"),
        "allinea" | "cray-prgenv-allinea" => Some("cstdlib"),
        "clang" => {
            if ctx.facts().has_std_atomics()? {
                Some("cstdlib")
            } else {
                Some("intrinsics")
            }
        }
        "llvm" => Some("cstdlib"),
        _ => None,
    };

    Ok(choice)
}
