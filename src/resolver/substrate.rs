//! GASNet substrate resolution.
//!
//! Only meaningful when the comm layer is gasnet; every other layer
//! gets `none`. The override is taken verbatim, matching the comm
//! layer's lazy validation.

use crate::resolver::context::{Resolution, ResolverContext};
use crate::resolver::errors::ConfigError;
use crate::resolver::{vars, VarKey};

pub(crate) fn resolve(ctx: &ResolverContext) -> Result<Resolution, ConfigError> {
    if let Some(value) = ctx.overrides().get(vars::COMM_SUBSTRATE) {
        return Ok(Resolution::overridden(value));
    }

    let comm = ctx.value(VarKey::Comm)?;
    if comm != "gasnet" {
        return Ok(Resolution::inferred("none"));
    }

    let network = ctx.value(VarKey::Network)?;
    let substrate = match network.as_str() {
        "aries" => "aries",
        "slingshot" => "ofi",
        "infiniband" => "ibv",
        _ => "udp",
    };

    Ok(Resolution::inferred(substrate))
}
