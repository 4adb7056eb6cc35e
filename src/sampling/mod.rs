//! # Plot Sampling
//!
//! Turns a formula into the ordered sequence of `(x, y)` samples a chart
//! draws. The expression is compiled once per call; each abscissa gets its
//! own [`Binding`] and is classified independently, so an undefined point
//! never disturbs its neighbours.
//!
//! ```rust
//! use formula_explorer::formula::Parameter;
//! use formula_explorer::sampling::sample;
//!
//! let params = vec![
//!     Parameter::new("a", 1.0, -10.0, 10.0, 0.1),
//!     Parameter::new("b", 0.0, -10.0, 10.0, 0.1),
//! ];
//! let samples = sample("a*x+b", &params, -10.0, 10.0, 5);
//! let ys: Vec<_> = samples.iter().map(|s| s.y).collect();
//! assert_eq!(ys, vec![Some(-10.0), Some(-5.0), Some(0.0), Some(5.0), Some(10.0)]);
//! ```

pub mod cache;

use log::{debug, trace, warn};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::config::SamplingConfig;
use crate::error::{ExplorerError, Result};
use crate::expression::{Binding, CompiledExpression, IMAGINARY_TOLERANCE};
use crate::formula::{Formula, Parameter};

pub use cache::{CacheStats, PlotCache};

/// Default number of samples across the x-range
pub const DEFAULT_SAMPLE_COUNT: usize = 300;

/// One plotted point; `y` is `None` where the function has no finite real value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotSample {
    pub x: f64,
    pub y: Option<f64>,
}

impl PlotSample {
    /// Whether the sample can be drawn
    pub fn is_defined(&self) -> bool {
        self.y.is_some()
    }
}

/// Closed interval on one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Create a range without validating it
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check that both bounds are finite and `min < max`
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ExplorerError::InvalidRange(format!(
                "bounds must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min >= self.max {
            return Err(ExplorerError::InvalidRange(format!(
                "min ({}) must be less than max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Width of the range
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::new(-10.0, 10.0)
    }
}

/// Equally spaced abscissas `x_i = min + i * (max - min) / (count - 1)`
///
/// Both endpoints are included when `count >= 2`; `count == 1` yields only
/// `min`.
pub fn abscissas(range: AxisRange, count: usize) -> Result<Array1<f64>> {
    range.validate()?;
    Ok(Array1::linspace(range.min, range.max, count))
}

/// Evaluate a compiled expression at every abscissa
///
/// `values` are the parameter values in the compiled expression's shape
/// order. Evaluation failures and non-real results become `None`.
pub fn sample_compiled(
    compiled: &CompiledExpression,
    values: &[f64],
    grid: &Array1<f64>,
    tolerance: f64,
) -> Vec<PlotSample> {
    let samples: Vec<PlotSample> = grid
        .iter()
        .map(|&x| {
            let y = Binding::new(compiled.shape(), values, x)
                .and_then(|binding| compiled.evaluate(&binding))
                .map(|value| value.to_real(tolerance));

            match y {
                Ok(y) => PlotSample { x, y },
                Err(e) => {
                    trace!("'{}' undefined at x={}: {}", compiled.source(), x, e);
                    PlotSample { x, y: None }
                }
            }
        })
        .collect();

    let undefined = samples.iter().filter(|s| !s.is_defined()).count();
    if undefined > 0 {
        debug!(
            "'{}': {} of {} samples undefined",
            compiled.source(),
            undefined,
            samples.len()
        );
    }
    samples
}

/// Sample a formula over a range
///
/// Returns an empty sequence when the range is invalid or the expression
/// does not compile; the failure is logged, never propagated.
pub fn sample_formula(formula: &Formula, range: AxisRange, config: &SamplingConfig) -> Vec<PlotSample> {
    let grid = match abscissas(range, config.sample_count) {
        Ok(grid) => grid,
        Err(e) => {
            warn!("Not sampling formula '{}': {}", formula.id, e);
            return Vec::new();
        }
    };

    let compiled = match CompiledExpression::compile(&formula.expression, &formula.shape()) {
        Ok(compiled) => compiled,
        Err(e) => {
            warn!(
                "Formula '{}' does not compile ('{}'): {}",
                formula.id, formula.expression, e
            );
            return Vec::new();
        }
    };

    sample_compiled(&compiled, &formula.values(), &grid, config.imaginary_tolerance)
}

/// Sample an expression with the given parameters over `[x_min, x_max]`
pub fn sample(
    expression: &str,
    params: &[Parameter],
    x_min: f64,
    x_max: f64,
    count: usize,
) -> Vec<PlotSample> {
    let mut formula = Formula::new("", "", "", expression);
    formula.params = params.to_vec();
    let config = SamplingConfig {
        sample_count: count,
        imaginary_tolerance: IMAGINARY_TOLERANCE,
    };
    sample_formula(&formula, AxisRange::new(x_min, x_max), &config)
}

/// Y-axis range for a chart of `samples`
///
/// Defaults to `[-10, 10]` without any defined sample, widens a flat curve
/// by one unit each way, and otherwise pads the data range by 10% clamped to
/// `[-100, 100]`. When clamping would leave an empty interval the padded
/// range is used unclamped.
pub fn y_domain(samples: &[PlotSample]) -> AxisRange {
    let mut ys = samples.iter().filter_map(|s| s.y).filter(|y| y.is_finite());

    let Some(first) = ys.next() else {
        return AxisRange::default();
    };
    let (min, max) = ys.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));

    let padding = (max - min) * 0.1;
    if padding == 0.0 {
        return AxisRange::new(min - 1.0, max + 1.0);
    }

    let clamped = AxisRange::new((min - padding).max(-100.0), (max + padding).min(100.0));
    if clamped.min < clamped.max {
        clamped
    } else {
        AxisRange::new(min - padding, max + padding)
    }
}
