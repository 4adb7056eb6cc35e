//! # Formula Catalog
//!
//! An ordered, in-memory list of [`Formula`]s keyed by id. The catalog is
//! seeded from the built-in set and grows through [`Catalog::admit`], which
//! inserts a new formula or replaces the one with the same id in place.
//! Nothing is ever removed.
//!
//! ```rust
//! use formula_explorer::catalog::{Admission, Catalog};
//! use formula_explorer::formula::Formula;
//!
//! let mut catalog = Catalog::builtin().unwrap();
//! let before = catalog.len();
//!
//! let damped = Formula::new("damped", "Damped Oscillation", "Physics", "e^(-x) * sin(2*x)");
//! assert_eq!(catalog.admit(damped.clone()).unwrap(), Admission::Inserted);
//! assert_eq!(catalog.admit(damped).unwrap(), Admission::Replaced);
//! assert_eq!(catalog.len(), before + 1);
//! ```

pub mod seed;

use log::{debug, info};

use crate::config::AdmissionPolicy;
use crate::error::Result;
use crate::expression::CompiledExpression;
use crate::formula::{Formula, FormulaError};

pub use seed::{builtin_formulas, SEED_JSON};

/// Outcome of a successful admission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The id was new; the formula was appended
    Inserted,
    /// A formula with the same id was overwritten in place
    Replaced,
}

/// Ordered collection of formulas with unique ids
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    formulas: Vec<Formula>,
    policy: AdmissionPolicy,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding the built-in formulas
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        for formula in builtin_formulas()? {
            catalog.admit(formula)?;
        }
        debug!("Seeded catalog with {} formulas", catalog.len());
        Ok(catalog)
    }

    /// Use `policy` for subsequent admissions
    pub fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current admission policy
    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    /// Insert a formula, or replace the existing one with the same id
    ///
    /// # Errors
    ///
    /// Fails with [`FormulaError::EmptyId`] when the id is empty or blank.
    /// Under [`AdmissionPolicy::Strict`] also fails when the expression does
    /// not compile or references identifiers missing from `params`.
    pub fn admit(&mut self, formula: Formula) -> Result<Admission> {
        if formula.id.trim().is_empty() {
            return Err(FormulaError::EmptyId.into());
        }
        if self.policy == AdmissionPolicy::Strict {
            validate(&formula)?;
        }

        match self.position(&formula.id) {
            Some(index) => {
                info!("Replacing formula '{}'", formula.id);
                self.formulas[index] = formula;
                Ok(Admission::Replaced)
            }
            None => {
                info!("Adding formula '{}'", formula.id);
                self.formulas.push(formula);
                Ok(Admission::Inserted)
            }
        }
    }

    /// Look up a formula by id
    pub fn get(&self, id: &str) -> Option<&Formula> {
        self.formulas.iter().find(|f| f.id == id)
    }

    /// Whether a formula with `id` exists
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// First formula in catalog order
    pub fn first(&self) -> Option<&Formula> {
        self.formulas.first()
    }

    /// Formulas in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Formula> {
        self.formulas.iter()
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// Formulas whose name, description or category contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<&Formula> {
        self.formulas.iter().filter(|f| f.matches(query)).collect()
    }

    /// Distinct categories in order of first appearance
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for formula in &self.formulas {
            if !categories.contains(&formula.category.as_str()) {
                categories.push(&formula.category);
            }
        }
        categories
    }

    /// Formulas matching `query`, grouped by category
    ///
    /// Groups follow category order of first appearance, formulas keep
    /// catalog order, and categories without a match are omitted.
    pub fn grouped(&self, query: &str) -> Vec<(&str, Vec<&Formula>)> {
        let matching = self.search(query);
        self.categories()
            .into_iter()
            .filter_map(|category| {
                let members: Vec<&Formula> = matching
                    .iter()
                    .copied()
                    .filter(|f| f.category == category)
                    .collect();
                (!members.is_empty()).then_some((category, members))
            })
            .collect()
    }

    /// Serialize the catalog as a JSON array
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.formulas)?)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.formulas.iter().position(|f| f.id == id)
    }
}

/// Strict admission checks
fn validate(formula: &Formula) -> std::result::Result<(), FormulaError> {
    let invalid = |message: String| FormulaError::InvalidExpression {
        id: formula.id.clone(),
        message,
    };

    let shape = formula.shape();
    shape.validate().map_err(|e| invalid(e.to_string()))?;
    CompiledExpression::compile(&formula.expression, &shape).map_err(|e| invalid(e.to_string()))?;

    let names = formula
        .uncovered_identifiers()
        .map_err(|e| invalid(e.to_string()))?;
    if !names.is_empty() {
        return Err(FormulaError::UncoveredIdentifiers {
            id: formula.id.clone(),
            names,
        });
    }
    Ok(())
}
