//! Evaluation settings.

use serde::{Deserialize, Serialize};

/// What `x / 0` evaluates to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DivisionByZero {
    /// Fail the formula; the cell shows the formula error sentinel.
    #[default]
    Error,
    /// Produce positive infinity.
    Infinity,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub division_by_zero: DivisionByZero,
}
