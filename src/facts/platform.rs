//! Platform family detection.
//!
//! Maps the running system (or user hints) onto a platform family tag.
//! Cray/HPE machines advertise themselves through their programming
//! environment; everything else falls back to a generic OS tag with a
//! word-size suffix.

use std::path::Path;

use crate::facts::Selector;
use crate::resolver::vars;
use crate::util::overrides::Overrides;

/// Detect the platform family for the given selector.
///
/// Precedence:
/// 1. Explicit override (`CAPSTAN_TARGET_PLATFORM` / `CAPSTAN_HOST_PLATFORM`)
/// 2. Cray/HPE programming-environment markers
/// 3. Generic OS tag with word-size suffix (`linux64`, `linux32`,
///    `darwin`, `windows`)
pub fn detect_platform_family(overrides: &Overrides, selector: Selector) -> String {
    if let Some(value) = overrides.get(vars::platform(selector)) {
        tracing::debug!("platform family ({selector}) from override: {value}");
        return value.to_string();
    }

    if let Some(family) = detect_cray_family() {
        tracing::debug!("platform family ({selector}) from PE markers: {family}");
        return family;
    }
    if has_cray_pe() {
        tracing::debug!("Cray PE installed but no network target advertised");
    }

    let family = generic_family();
    tracing::debug!("platform family ({selector}) from OS facts: {family}");
    family
}

/// Recognize Cray/HPE machines from their programming environment.
fn detect_cray_family() -> Option<String> {
    // The PE exports the interconnect it was built for; absent that,
    // the presence of /etc/opt/cray alone is not enough to pick a family.
    let network_target = std::env::var("CRAYPE_NETWORK_TARGET").ok()?;

    let family = match network_target.as_str() {
        "aries" => "cray-xc",
        "slingshot10" | "slingshot11" | "ofi" => "hpe-cray-ex",
        _ => return None,
    };

    Some(family.to_string())
}

/// Generic fallback tag derived from the OS and pointer width.
fn generic_family() -> String {
    match std::env::consts::OS {
        "macos" => "darwin".to_string(),
        "windows" => "windows".to_string(),
        os => {
            if cfg!(target_pointer_width = "32") {
                format!("{os}32")
            } else {
                format!("{os}64")
            }
        }
    }
}

/// Whether a platform family tag names a 32-bit system.
pub fn is_32_bit(family: &str) -> bool {
    family.ends_with("32")
}

/// Whether the Cray PE appears to be installed at all. Used for
/// diagnostics only, never for family selection.
pub fn has_cray_pe() -> bool {
    std::env::var("CRAYPE_DIR").is_ok() || Path::new("/etc/opt/cray").exists()
}
