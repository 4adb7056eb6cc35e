//! # Formulas
//!
//! A [`Formula`] pairs an expression with its [`Parameter`] sliders and the
//! metadata a catalog browser displays. Formulas are plain values: cloning
//! one clones every parameter, which is how the active formula stays
//! independent of the catalog's canonical entry.

pub mod formula;
pub mod parameter;

pub use formula::{Formula, FormulaError};
pub use parameter::Parameter;
