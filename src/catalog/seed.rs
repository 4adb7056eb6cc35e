//! Built-in formulas shipped with the explorer

use crate::error::Result;
use crate::formula::Formula;

/// Seed catalog as JSON, embedded at compile time
pub const SEED_JSON: &str = include_str!("../../assets/formulas.json");

/// Parse the built-in formulas in catalog order
pub fn builtin_formulas() -> Result<Vec<Formula>> {
    Ok(serde_json::from_str(SEED_JSON)?)
}
