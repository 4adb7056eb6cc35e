//! Catalog entry pairing an expression with display metadata

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::parameter::Parameter;
use crate::expression::{constant, ExprResult, Expression, ParameterShape, FREE_VARIABLE};

/// Errors that can occur when admitting a formula
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Formula id must not be empty")]
    EmptyId,

    #[error("Formula '{id}' has an invalid expression: {message}")]
    InvalidExpression { id: String, message: String },

    #[error("Formula '{id}' references undeclared identifiers: {}", .names.join(", "))]
    UncoveredIdentifiers { id: String, names: Vec<String> },
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formula {
    /// Unique key within the catalog
    pub id: String,

    /// Display name
    pub name: String,

    /// Grouping used by the catalog browser
    pub category: String,

    /// Expression in the grammar of [`crate::expression`]
    pub expression: String,

    /// LaTeX rendering for display
    pub display_latex: String,

    /// Parameters in display order
    #[serde(default)]
    pub params: Vec<Parameter>,

    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

impl Formula {
    /// Create a formula without parameters
    ///
    /// # Examples
    ///
    /// ```
    /// use formula_explorer::formula::{Formula, Parameter};
    ///
    /// let formula = Formula::new("linear", "Linear", "Algebra", "a * x + b")
    ///     .with_param(Parameter::new("a", 1.0, -10.0, 10.0, 0.1))
    ///     .with_param(Parameter::new("b", 0.0, -10.0, 10.0, 0.1));
    /// assert_eq!(formula.params.len(), 2);
    /// assert!(formula.uncovered_identifiers().unwrap().is_empty());
    /// ```
    pub fn new(id: &str, name: &str, category: &str, expression: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            expression: expression.to_string(),
            display_latex: String::new(),
            params: Vec::new(),
            description: String::new(),
        }
    }

    /// Append a parameter
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Set the LaTeX rendering
    pub fn with_latex(mut self, display_latex: &str) -> Self {
        self.display_latex = display_latex.to_string();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Look up a parameter by name
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Look up a parameter by name for mutation
    pub fn param_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.params.iter_mut().find(|p| p.name == name)
    }

    /// Parameter names in binding order
    pub fn shape(&self) -> ParameterShape {
        ParameterShape::new(self.params.iter().map(|p| p.name.as_str()))
    }

    /// Current parameter values in binding order
    pub fn values(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.value).collect()
    }

    /// Identifiers in the expression that are neither `x`, a constant, nor a parameter
    ///
    /// Returns the parse error when the expression does not parse.
    pub fn uncovered_identifiers(&self) -> ExprResult<Vec<String>> {
        let expression = Expression::parse(&self.expression)?;
        Ok(expression
            .variables()
            .into_iter()
            .filter(|name| {
                name != FREE_VARIABLE && self.param(name).is_none() && constant(name).is_none()
            })
            .collect())
    }

    /// Comma-separated `name=value` listing of the current parameters
    pub fn params_summary(&self) -> String {
        self.params
            .iter()
            .map(Parameter::assignment)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Case-insensitive match of `query` against name, description and category
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.category.to_lowercase().contains(&query)
    }
}
