//! Communication layer resolution.
//!
//! An explicit override is taken verbatim: the variables that depend on
//! the comm layer perform the compatibility checks themselves, so an
//! unrecognized value surfaces there rather than here. Without an
//! override the layer follows from the resolved network fabric.

use crate::resolver::context::{Resolution, ResolverContext};
use crate::resolver::errors::ConfigError;
use crate::resolver::{vars, VarKey};

/// The comm layers the fabric table can produce.
pub const KNOWN_COMM_LAYERS: &[&str] = &["none", "ugni", "ofi", "gasnet"];

pub(crate) fn resolve(ctx: &ResolverContext) -> Result<Resolution, ConfigError> {
    if let Some(value) = ctx.overrides().get(vars::COMM) {
        return Ok(Resolution::overridden(value));
    }

    let network = ctx.value(VarKey::Network)?;
    let comm = match network.as_str() {
        "aries" => "ugni",
        "slingshot" => "ofi",
        "infiniband" => "gasnet",
        "ethernet" => "gasnet",
        "efa" => "ofi",
        _ => "none",
    };

    Ok(Resolution::inferred(comm))
}
