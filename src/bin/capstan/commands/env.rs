//! `capstan env` command
//!
//! Prints every configuration variable in dependency order. Overridden
//! values are marked with `*`; advisory warnings are emitted once, after
//! the table.

use anyhow::Result;

use crate::cli::EnvArgs;
use capstan::resolver::context::display_order;
use capstan::util::diagnostic;
use capstan::{Provenance, ResolverContext};

pub fn execute(args: EnvArgs, color: bool) -> Result<()> {
    let ctx = ResolverContext::from_env()?;

    let mut warnings = Vec::new();
    for key in display_order() {
        let resolution = match ctx.get(key) {
            Ok(resolution) => resolution,
            Err(err) => return Err(super::print::fatal(err, color)),
        };

        let marker = if resolution.provenance == Provenance::Override {
            " *"
        } else {
            ""
        };
        println!("{}: {}{}", key.variable_name(), resolution.value, marker);

        warnings.extend(resolution.warnings);
    }

    if !args.quiet {
        for warning in &warnings {
            diagnostic::emit(warning, color);
        }
    }

    Ok(())
}
