//! # formula-explorer
//!
//! `formula-explorer` is the core of an interactive function plotter: a
//! catalog of parameterized formulas, a compile-once expression evaluator
//! with a real-or-complex value domain, and a sampler that turns the active
//! formula into plottable points.
//!
//! The library provides:
//! - An expression parser and compiler for algebraic formulas in one free variable `x`
//! - Sampling that marks undefined, non-finite and complex points instead of plotting them
//! - A formula catalog with upsert admission, search and category grouping
//! - A workbench holding the active formula and its parameter values
//! - An assistant exchange that can add formulas through an `addFormula` tool call
//!
//! ## Basic Usage
//!
//! ```
//! use formula_explorer::workbench::Workbench;
//!
//! let mut bench = Workbench::with_defaults().unwrap();
//! bench.select("gaussian");
//! bench.set_param("c", 0.5);
//!
//! let render = bench.render();
//! assert_eq!(render.name, "Gaussian (Normal) Distribution");
//! assert!(render.samples.iter().all(|s| s.y.is_some()));
//! ```

pub mod error;

pub mod config;
pub mod logging;

// Evaluation
pub mod expression;
pub mod sampling;

// Formulas and their catalog
pub mod catalog;
pub mod formula;
pub mod workbench;

#[cfg(feature = "assistant")]
pub mod assistant;

// Re-exports for convenience
pub use catalog::{Admission, Catalog};
pub use config::{AdmissionPolicy, ExplorerConfig};
pub use error::{ExplorerError, Result};
pub use expression::{CompiledExpression, ExpressionError, ParameterShape};
pub use formula::{Formula, Parameter};
pub use sampling::{sample, y_domain, AxisRange, PlotSample};
pub use workbench::{RenderData, Workbench};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
