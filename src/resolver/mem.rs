//! Memory allocator selection.
//!
//! Consumed by the rpmalloc add-on but not owned by it: this variable
//! names the allocator the runtime is built against, with a per-selector
//! default when the user expresses no preference.

use crate::facts::Selector;
use crate::resolver::context::{Resolution, ResolverContext};
use crate::resolver::errors::{check_valid, ConfigError};
use crate::resolver::vars;

pub const VALID_MEM: &[&str] = &["cstdlib", "jemalloc", "mimalloc", "rpmalloc"];

pub(crate) fn resolve(
    ctx: &ResolverContext,
    selector: Selector,
) -> Result<Resolution, ConfigError> {
    let variable = vars::mem(selector);

    if let Some(value) = ctx.overrides().get(variable) {
        check_valid(variable, value, VALID_MEM)?;
        return Ok(Resolution::overridden(value));
    }

    let default = match selector {
        Selector::Host => "cstdlib",
        Selector::Target => "jemalloc",
    };
    Ok(Resolution::fallback(default))
}
