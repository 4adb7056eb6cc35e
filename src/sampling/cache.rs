//! Memoized sampling for repeated renders
//!
//! A chart re-renders far more often than its inputs change. [`PlotCache`]
//! keeps the last compiled expression and the last sample set, recompiling
//! only when the expression text or parameter names change and resampling
//! only when values, range or count change.

use log::{debug, warn};

use super::{abscissas, sample_compiled, AxisRange, PlotSample};
use crate::config::SamplingConfig;
use crate::expression::{CompiledExpression, ExpressionError, ParameterShape};
use crate::formula::Formula;

/// Counters describing how much work the cache has done
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of times an expression was compiled
    pub compilations: usize,

    /// Number of times a full sample set was evaluated
    pub evaluations: usize,

    /// Number of requests served from the cache
    pub hits: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct CompileKey {
    expression: String,
    shape: ParameterShape,
}

#[derive(Debug, Clone, PartialEq)]
struct SampleKey {
    compile: CompileKey,
    values: Vec<f64>,
    range: AxisRange,
    count: usize,
    tolerance: f64,
}

/// Last compiled expression and sample set
#[derive(Debug, Default)]
pub struct PlotCache {
    compiled: Option<(CompileKey, Result<CompiledExpression, ExpressionError>)>,
    sampled: Option<SampleKey>,
    samples: Vec<PlotSample>,
    stats: CacheStats,
}

impl PlotCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples for `formula` over `range`, computed only if an input changed
    pub fn samples(
        &mut self,
        formula: &Formula,
        range: AxisRange,
        config: &SamplingConfig,
    ) -> &[PlotSample] {
        let compile = CompileKey {
            expression: formula.expression.clone(),
            shape: formula.shape(),
        };
        let key = SampleKey {
            compile: compile.clone(),
            values: formula.values(),
            range,
            count: config.sample_count,
            tolerance: config.imaginary_tolerance,
        };

        if self.sampled.as_ref() == Some(&key) {
            self.stats.hits += 1;
            return &self.samples;
        }

        self.samples = self.compute(formula, &key);
        self.sampled = Some(key);
        &self.samples
    }

    /// Work done so far
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop everything cached
    pub fn clear(&mut self) {
        self.compiled = None;
        self.sampled = None;
        self.samples.clear();
    }

    fn compute(&mut self, formula: &Formula, key: &SampleKey) -> Vec<PlotSample> {
        let grid = match abscissas(key.range, key.count) {
            Ok(grid) => grid,
            Err(e) => {
                warn!("Not sampling formula '{}': {}", formula.id, e);
                return Vec::new();
            }
        };

        let stale = !matches!(&self.compiled, Some((cached, _)) if *cached == key.compile);
        if stale {
            debug!("Compiling '{}'", key.compile.expression);
            self.stats.compilations += 1;
            let result = CompiledExpression::compile(&key.compile.expression, &key.compile.shape);
            self.compiled = Some((key.compile.clone(), result));
        }

        match &self.compiled {
            Some((_, Ok(compiled))) => {
                self.stats.evaluations += 1;
                sample_compiled(compiled, &key.values, &grid, key.tolerance)
            }
            Some((_, Err(e))) => {
                warn!(
                    "Formula '{}' does not compile ('{}'): {}",
                    formula.id, key.compile.expression, e
                );
                Vec::new()
            }
            None => Vec::new(),
        }
    }
}
