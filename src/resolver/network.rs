//! Network fabric resolution.
//!
//! Picks the physical interconnect family. Specific platform families
//! imply a fabric outright; failing that, an explicit comm-layer
//! override (and, for gasnet, its substrate override) can be reverse-
//! mapped to the fabric it was written for. `unset` is a valid terminal
//! answer meaning "could not infer", distinct from `none` meaning
//! "explicitly no network"; nothing on the inference path is fatal.

use crate::facts::Selector;
use crate::resolver::context::{Resolution, ResolverContext};
use crate::resolver::errors::{check_valid, ConfigError};
use crate::resolver::vars;
use crate::util::overrides::Overrides;

pub const VALID_NETWORKS: &[&str] = &[
    "none",
    "unset",
    "slingshot",
    "infiniband",
    "ethernet",
    "efa",
    "aries",
];

pub(crate) fn resolve(ctx: &ResolverContext) -> Result<Resolution, ConfigError> {
    if let Some(value) = ctx.overrides().get(vars::NETWORK) {
        check_valid(vars::NETWORK, value, VALID_NETWORKS)?;
        return Ok(Resolution::overridden(value));
    }

    let platform = ctx.facts().platform_family(Selector::Target)?;
    let fabric = match platform.as_str() {
        // One platform family per fabric.
        "cray-xc" => "aries",
        "hpe-cray-ex" => "slingshot",
        "cray-cs" | "hpe-apollo" | "pwr6" => "infiniband",
        _ => {
            return Ok(match fabric_from_comm_override(ctx.overrides()) {
                Some(fabric) => Resolution::inferred(fabric),
                None => Resolution::fallback("unset"),
            });
        }
    };

    Ok(Resolution::inferred(fabric))
}

/// Reverse-map explicit comm-layer/substrate overrides to the fabric
/// they were written for. Returns `None` when the combination is
/// unresolvable. A substrate override with no comm override implies
/// the gasnet layer and is mapped the same way.
fn fabric_from_comm_override(overrides: &Overrides) -> Option<&'static str> {
    match overrides.get(vars::COMM) {
        None | Some("gasnet") => fabric_from_substrate_override(overrides),
        Some("none") => Some("none"),
        Some("ugni") => Some("aries"),
        // We could consult a provider hint for ofi, but there is no
        // reliable mapping back to a single fabric.
        Some(_) => None,
    }
}

fn fabric_from_substrate_override(overrides: &Overrides) -> Option<&'static str> {
    match overrides.get(vars::COMM_SUBSTRATE)? {
        "aries" => Some("aries"),
        "ofi" => Some("slingshot"),
        "ibv" => Some("infiniband"),
        "udp" => Some("ethernet"),
        _ => None,
    }
}
