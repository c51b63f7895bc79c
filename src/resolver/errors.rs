//! Configuration error types and diagnostics.
//!
//! Every error here is fatal: resolution is fail-fast, since silently
//! guessing a build configuration risks a miscompiled artifact.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::facts::Selector;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Fatal error during configuration resolution.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ConfigError {
    /// An override is not in the variable's legal value set.
    #[error("{variable} must be one of {legal:?}, got `{value}`")]
    #[diagnostic(code(capstan::resolve::invalid_value))]
    InvalidValue {
        variable: &'static str,
        value: String,
        legal: &'static [&'static str],
    },

    /// A value that is recognized but deliberately unsupported, with a
    /// message distinct from the generic invalid-value error.
    #[error("{variable}={value} is not supported")]
    #[diagnostic(code(capstan::resolve::not_supported))]
    NotSupported {
        variable: &'static str,
        value: String,
    },

    /// Two resolved variables contradict each other.
    #[error("{variable}={value} is incompatible with {other_variable}={other_value}")]
    #[diagnostic(code(capstan::resolve::incompatible))]
    IncompatibleCombination {
        variable: &'static str,
        value: String,
        other_variable: &'static str,
        other_value: String,
    },

    /// A value is legal in general but disallowed on the detected
    /// platform.
    #[error("{variable}={value} is not supported on {platform}")]
    #[diagnostic(code(capstan::resolve::unsupported_on_platform))]
    UnsupportedOnPlatform {
        variable: &'static str,
        value: String,
        platform: String,
    },

    /// A resolver was invoked with a selector it does not serve.
    #[error("{variable} is not yet supported for {selector} builds")]
    #[diagnostic(code(capstan::resolve::unsupported_flag))]
    UnsupportedFlag {
        variable: &'static str,
        selector: Selector,
    },

    /// The rpmalloc add-on was disabled while the paired allocator
    /// requires it.
    #[error("{variable} must not be `none` when {other_variable} is `rpmalloc`")]
    #[diagnostic(code(capstan::resolve::allocator_conflict))]
    AllocatorConflict {
        variable: &'static str,
        other_variable: &'static str,
    },

    /// A fact provider failed while probing the build environment.
    #[error("failed to probe the build environment: {0:#}")]
    #[diagnostic(code(capstan::resolve::probe_failed))]
    Probe(anyhow::Error),
}

impl From<anyhow::Error> for ConfigError {
    fn from(err: anyhow::Error) -> Self {
        ConfigError::Probe(err)
    }
}

impl ConfigError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigError::InvalidValue {
                variable,
                value,
                legal,
            } => Diagnostic::error(format!(
                "{} must be one of {:?}, got `{}`",
                variable, legal, value
            ))
            .with_suggestion(suggestions::CHECK_OVERRIDE),

            ConfigError::NotSupported { variable, value } => {
                Diagnostic::error(format!("{}={} is not supported", variable, value))
                    .with_suggestion(suggestions::CHECK_OVERRIDE)
            }

            ConfigError::IncompatibleCombination {
                variable,
                value,
                other_variable,
                other_value,
            } => Diagnostic::error(format!(
                "{}={} is incompatible with {}={}",
                variable, value, other_variable, other_value
            ))
            .with_context(format!("{} resolved to `{}`", other_variable, other_value))
            .with_suggestion(suggestions::CHECK_PAIRING),

            ConfigError::UnsupportedOnPlatform {
                variable,
                value,
                platform,
            } => Diagnostic::error(format!(
                "{}={} is not supported on {}",
                variable, value, platform
            ))
            .with_suggestion(suggestions::CHECK_OVERRIDE),

            ConfigError::UnsupportedFlag { variable, selector } => Diagnostic::error(format!(
                "{} is not yet supported for {} builds",
                variable, selector
            )),

            ConfigError::AllocatorConflict {
                variable,
                other_variable,
            } => Diagnostic::error(format!(
                "{} must not be `none` when {} is `rpmalloc`",
                variable, other_variable
            ))
            .with_suggestion(suggestions::CHECK_PAIRING),

            ConfigError::Probe(source) => {
                Diagnostic::error(format!("failed to probe the build environment: {:#}", source))
                    .with_suggestion(suggestions::PROBE_FAILED)
            }
        }
    }
}

/// Check a value against a variable's legal set.
pub fn check_valid(
    variable: &'static str,
    value: &str,
    legal: &'static [&'static str],
) -> Result<(), ConfigError> {
    if legal.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            variable,
            value: value.to_string(),
            legal,
        })
    }
}
