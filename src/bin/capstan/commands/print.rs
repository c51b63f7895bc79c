//! `capstan print` command
//!
//! Resolves one variable and writes its token plus a newline to stdout.
//! Advisory warnings go to stderr and never change the value.

use anyhow::Result;

use crate::cli::{PrintArgs, Variable};
use capstan::util::diagnostic;
use capstan::{AtomicsSelector, ConfigError, ResolverContext, Selector, VarKey};

pub fn execute(args: PrintArgs, color: bool) -> Result<()> {
    let key = var_key(&args)?;
    let ctx = ResolverContext::from_env()?;

    let resolution = match ctx.get(key) {
        Ok(resolution) => resolution,
        Err(err) => return Err(fatal(err, color)),
    };

    for warning in &resolution.warnings {
        diagnostic::emit(warning, color);
    }

    println!("{}", resolution.value);
    Ok(())
}

/// Map the CLI variable and selector flags onto a resolver key.
fn var_key(args: &PrintArgs) -> Result<VarKey> {
    // --target is the default; it only exists so scripts can be explicit.
    let selector = match (args.host, args.target) {
        (true, _) => Selector::Host,
        (false, _) => Selector::Target,
    };

    let key = match args.variable {
        Variable::Network => VarKey::Network,
        Variable::Comm => VarKey::Comm,
        Variable::CommSubstrate => VarKey::CommSubstrate,
        Variable::Atomics => {
            if args.network {
                VarKey::Atomics(AtomicsSelector::Network)
            } else {
                VarKey::Atomics(AtomicsSelector::Target)
            }
        }
        Variable::Rpmalloc => VarKey::Rpmalloc(selector),
        Variable::Mem => VarKey::Mem(selector),
    };

    if args.network && !matches!(key, VarKey::Atomics(_)) {
        anyhow::bail!("--network only applies to the atomics variable");
    }
    if args.host && !matches!(key, VarKey::Rpmalloc(_) | VarKey::Mem(_)) {
        anyhow::bail!("--host only applies to rpmalloc and mem");
    }

    Ok(key)
}

/// Emit a fatal configuration error as a diagnostic and surface a
/// terse anyhow error for the exit path.
pub(crate) fn fatal(err: ConfigError, color: bool) -> anyhow::Error {
    diagnostic::emit(&err.to_diagnostic(), color);
    anyhow::anyhow!("configuration is invalid")
}
