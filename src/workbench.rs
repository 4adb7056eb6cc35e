//! # Workbench
//!
//! Holds the catalog together with the *active formula*: the one formula
//! currently plotted and edited. The active formula is always a deep copy of
//! a catalog entry, so moving a slider never touches the catalog and
//! re-selecting a formula restores its stored defaults.
//!
//! ```rust
//! use formula_explorer::workbench::Workbench;
//!
//! let mut bench = Workbench::with_defaults().unwrap();
//! assert!(bench.select("quadratic"));
//! assert!(bench.set_param("c", 2.0));
//!
//! let render = bench.render();
//! assert_eq!(render.samples.len(), 300);
//! assert_eq!(bench.catalog().get("quadratic").unwrap().param("c").unwrap().value, 0.0);
//! ```

use log::debug;
use serde::Serialize;

use crate::catalog::{Admission, Catalog};
use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result};
use crate::formula::Formula;
use crate::sampling::{y_domain, AxisRange, CacheStats, PlotCache, PlotSample};

/// Everything a renderer needs to draw the active formula
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderData {
    pub id: String,
    pub name: String,
    pub display_latex: String,
    pub samples: Vec<PlotSample>,
    pub y_domain: AxisRange,
}

/// Catalog plus the active formula and plot state
#[derive(Debug)]
pub struct Workbench {
    catalog: Catalog,
    active: Formula,
    x_range: AxisRange,
    config: ExplorerConfig,
    cache: PlotCache,
}

impl Workbench {
    /// Create a workbench over `catalog`, activating its first formula
    ///
    /// The catalog adopts the configured admission policy.
    pub fn new(catalog: Catalog, config: ExplorerConfig) -> Result<Self> {
        config.x_range.validate()?;
        let catalog = catalog.with_policy(config.admission_policy);
        let active = catalog
            .first()
            .cloned()
            .ok_or_else(|| ExplorerError::FormulaNotFound("catalog is empty".to_string()))?;

        Ok(Self {
            catalog,
            active,
            x_range: config.x_range,
            config,
            cache: PlotCache::new(),
        })
    }

    /// Built-in catalog with the default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(Catalog::builtin()?, ExplorerConfig::default())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// The formula being plotted
    pub fn active(&self) -> &Formula {
        &self.active
    }

    /// Make a copy of the catalog entry `id` active
    ///
    /// Returns `false` and changes nothing when `id` is unknown.
    pub fn select(&mut self, id: &str) -> bool {
        match self.catalog.get(id) {
            Some(formula) => {
                self.active = formula.clone();
                true
            }
            None => {
                debug!("select: no formula '{}'", id);
                false
            }
        }
    }

    /// Set a parameter of the active formula
    ///
    /// The value is stored as given, even outside the slider bounds. Returns
    /// `false` when the active formula has no parameter `name`.
    pub fn set_param(&mut self, name: &str, value: f64) -> bool {
        match self.active.param_mut(name) {
            Some(param) => {
                param.value = value;
                true
            }
            None => {
                debug!("set_param: '{}' has no parameter '{}'", self.active.id, name);
                false
            }
        }
    }

    /// Restore the active formula's parameters from its catalog entry
    pub fn reset_params(&mut self) -> bool {
        match self.catalog.get(&self.active.id) {
            Some(formula) => {
                self.active.params = formula.params.clone();
                true
            }
            None => false,
        }
    }

    /// Admit a formula into the catalog and make a copy of it active
    pub fn admit(&mut self, formula: Formula) -> Result<Admission> {
        let admission = self.catalog.admit(formula.clone())?;
        self.active = formula;
        Ok(admission)
    }

    /// Current x-range of the plot
    pub fn x_range(&self) -> AxisRange {
        self.x_range
    }

    /// Change the x-range; rejects ranges that are empty, inverted or not finite
    pub fn set_x_range(&mut self, min: f64, max: f64) -> Result<()> {
        let range = AxisRange::new(min, max);
        range.validate()?;
        self.x_range = range;
        Ok(())
    }

    /// Samples of the active formula over the current x-range
    pub fn samples(&mut self) -> &[PlotSample] {
        self.cache.samples(&self.active, self.x_range, &self.config.sampling)
    }

    /// Samples plus display metadata for the active formula
    pub fn render(&mut self) -> RenderData {
        let samples = self.samples().to_vec();
        RenderData {
            id: self.active.id.clone(),
            name: self.active.name.clone(),
            display_latex: self.active.display_latex.clone(),
            y_domain: y_domain(&samples),
            samples,
        }
    }

    /// Work done by the plot cache
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
