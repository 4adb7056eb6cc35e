//! Slider-bound numeric parameter of a formula

use serde::{Deserialize, Serialize};

/// A named numeric input to a formula's expression
///
/// `min`, `max` and `step` describe the slider presenting the parameter.
/// Keeping `value` inside `[min, max]` is the slider's job; nothing in the
/// evaluator clamps or rejects out-of-range values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name referenced by the expression
    pub name: String,

    /// Current value
    pub value: f64,

    /// Lower slider bound
    pub min: f64,

    /// Upper slider bound
    pub max: f64,

    /// Slider granularity
    pub step: f64,

    /// Human-readable annotation
    #[serde(default)]
    pub description: String,
}

impl Parameter {
    /// Create a parameter with slider bounds
    ///
    /// # Examples
    ///
    /// ```
    /// use formula_explorer::formula::Parameter;
    ///
    /// let param = Parameter::new("a", 1.0, -10.0, 10.0, 0.1).with_description("slope");
    /// assert_eq!(param.name, "a");
    /// assert!(param.in_bounds());
    /// ```
    pub fn new(name: &str, value: f64, min: f64, max: f64, step: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            min,
            max,
            step,
            description: String::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Whether the current value lies inside the slider bounds
    pub fn in_bounds(&self) -> bool {
        self.min <= self.value && self.value <= self.max
    }

    /// `name=value` form used when describing parameters to the assistant
    pub fn assignment(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}
