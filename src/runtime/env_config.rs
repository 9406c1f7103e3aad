//! Environment variable support for [`QueueConfig`].
//!
//! # Configuration Precedence
//!
//! 1. **Programmatic**: values set via builder methods (`max_steps(64)`)
//! 2. **Environment variables**: values from `DEFERRED_*` env vars
//! 3. **Defaults**: built-in defaults from [`QueueConfig::default()`]
//!
//! # Supported Environment Variables
//!
//! | Variable | Type | Maps to |
//! |----------|------|---------|
//! | `DEFERRED_MAX_STEPS` | `u64` or `none` | `max_steps` |

use crate::error::Error;
use crate::runtime::config::QueueConfig;

/// Environment variable name for the per-flush step budget.
pub const ENV_MAX_STEPS: &str = "DEFERRED_MAX_STEPS";

/// Apply environment variable overrides to a [`QueueConfig`].
///
/// Only variables that are set in the environment are applied.
/// Returns an error if a variable is set but contains an unparseable value.
pub fn apply_env_overrides(config: &mut QueueConfig) -> Result<(), Error> {
    if let Some(val) = read_env(ENV_MAX_STEPS) {
        config.max_steps = parse_step_limit(ENV_MAX_STEPS, &val)?;
    }
    Ok(())
}

/// Read an environment variable, returning `None` if unset.
fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_step_limit(var_name: &str, val: &str) -> Result<Option<u64>, Error> {
    let trimmed = val.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    trimmed.parse::<u64>().map(Some).map_err(|e| {
        Error::invalid_config(format!(
            "invalid value for {var_name}: expected u64 or \"none\", got {val:?} ({e})"
        ))
    })
}
