//! Per-evaluation configuration.
//!
//! An [`EvalConfig`] is built once by the caller and handed by reference to
//! the graph builder and evaluator for a single pass. Nothing in the engine
//! keeps global state.

use serde::{Deserialize, Serialize};

/// Maximum number of alias hops followed when resolving a cell.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// What `x / 0` evaluates to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DivisionPolicy {
    /// Fail the pass with a division-by-zero error.
    #[default]
    Error,
    /// IEEE semantics: signed infinity, `0 / 0` is NaN.
    Infinity,
}

impl std::str::FromStr for DivisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(DivisionPolicy::Error),
            "infinity" | "inf" => Ok(DivisionPolicy::Infinity),
            other => Err(format!(
                "Unknown division policy: {} (expected error or infinity)",
                other
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    pub max_depth: usize,
    pub division: DivisionPolicy,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            division: DivisionPolicy::Error,
        }
    }
}
