//! rpmalloc add-on resolution.
//!
//! The bundled rpmalloc sources are only built when the memory
//! allocator actually is rpmalloc, or when the user asks for them
//! explicitly. Host builds do not carry the add-on at all.

use crate::facts::Selector;
use crate::resolver::context::{Resolution, ResolverContext};
use crate::resolver::errors::{check_valid, ConfigError};
use crate::resolver::{vars, VarKey};

pub const VALID_RPMALLOC: &[&str] = &["none", "bundled"];

pub(crate) fn resolve(
    ctx: &ResolverContext,
    selector: Selector,
) -> Result<Resolution, ConfigError> {
    if selector == Selector::Host {
        return Err(ConfigError::UnsupportedFlag {
            variable: "rpmalloc",
            selector,
        });
    }

    let mem = ctx.value(VarKey::Mem(Selector::Target))?;

    match ctx.overrides().get(vars::TARGET_RPMALLOC) {
        Some(value) => {
            if mem == "rpmalloc" && value == "none" {
                return Err(ConfigError::AllocatorConflict {
                    variable: vars::TARGET_RPMALLOC,
                    other_variable: vars::TARGET_MEM,
                });
            }
            check_valid(vars::TARGET_RPMALLOC, value, VALID_RPMALLOC)?;
            Ok(Resolution::overridden(value))
        }
        None => {
            if mem == "rpmalloc" {
                Ok(Resolution::inferred("bundled"))
            } else {
                Ok(Resolution::fallback("none"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context_with, MockFacts};

    #[test]
    fn test_host_selector_is_fatal() {
        let ctx = context_with(&[], MockFacts::generic_linux());
        let err = ctx.get(VarKey::Rpmalloc(Selector::Host)).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFlag { .. }));
        assert_eq!(
            err.to_string(),
            "rpmalloc is not yet supported for host builds"
        );
    }

    #[test]
    fn test_follows_mem_variable() {
        let ctx = context_with(&[("CAPSTAN_TARGET_MEM", "rpmalloc")], MockFacts::generic_linux());
        assert_eq!(
            ctx.value(VarKey::Rpmalloc(Selector::Target)).unwrap(),
            "bundled"
        );

        let ctx = context_with(&[], MockFacts::generic_linux());
        assert_eq!(
            ctx.value(VarKey::Rpmalloc(Selector::Target)).unwrap(),
            "none"
        );
    }

    #[test]
    fn test_none_override_conflicts_with_rpmalloc_mem() {
        let ctx = context_with(
            &[
                ("CAPSTAN_TARGET_MEM", "rpmalloc"),
                ("CAPSTAN_TARGET_RPMALLOC", "none"),
            ],
            MockFacts::generic_linux(),
        );
        let err = ctx.get(VarKey::Rpmalloc(Selector::Target)).unwrap_err();
        assert!(matches!(err, ConfigError::AllocatorConflict { .. }));
        let message = err.to_string();
        assert!(message.contains("CAPSTAN_TARGET_RPMALLOC"));
        assert!(message.contains("CAPSTAN_TARGET_MEM"));
    }

    #[test]
    fn test_override_validated() {
        let ctx = context_with(
            &[("CAPSTAN_TARGET_RPMALLOC", "system")],
            MockFacts::generic_linux(),
        );
        let err = ctx.get(VarKey::Rpmalloc(Selector::Target)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_bundled_override_without_rpmalloc_mem() {
        let ctx = context_with(
            &[("CAPSTAN_TARGET_RPMALLOC", "bundled")],
            MockFacts::generic_linux(),
        );
        assert_eq!(
            ctx.value(VarKey::Rpmalloc(Selector::Target)).unwrap(),
            "bundled"
        );
    }
}
