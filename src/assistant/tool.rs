//! The `addFormula` tool offered to the conversational service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use super::AssistantError;
use crate::formula::{Formula, Parameter};

/// Name under which the tool is declared
pub const ADD_FORMULA: &str = "addFormula";

/// Category given to formulas whose tool call omits one
pub const DEFAULT_CATEGORY: &str = "Custom";

/// A tool invocation requested by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub args: JsonValue,
}

/// The result of a tool invocation, reported back to the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub name: String,
    pub response: JsonValue,
}

impl ToolResponse {
    /// Successful invocation with a plain-text result
    pub fn success(name: &str, result: &str) -> Self {
        Self {
            name: name.to_string(),
            response: json!({ "result": result }),
        }
    }

    /// Failed invocation with a plain-text reason
    pub fn failure(name: &str, error: &str) -> Self {
        Self {
            name: name.to_string(),
            response: json!({ "error": error }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.response.get("error").is_some()
    }
}

/// Arguments of an `addFormula` call
///
/// Everything except `expression` may be omitted; see [`AddFormulaArgs::into_formula`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFormulaArgs {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub expression: String,
    #[serde(default)]
    pub display_latex: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Vec<Parameter>,
}

impl AddFormulaArgs {
    /// Decode the JSON arguments of a tool call
    pub fn from_json(args: &JsonValue) -> Result<Self, AssistantError> {
        serde_json::from_value(args.clone())
            .map_err(|e| AssistantError::InvalidToolArguments(e.to_string()))
    }

    /// Build the formula to admit
    ///
    /// A missing or blank id becomes `custom-<millis since epoch>` taken from
    /// `now`; a missing category becomes `Custom`; a missing name falls back
    /// to the id.
    pub fn into_formula(self, now: DateTime<Utc>) -> Formula {
        let id = non_blank(self.id).unwrap_or_else(|| format!("custom-{}", now.timestamp_millis()));
        let name = non_blank(self.name).unwrap_or_else(|| id.clone());
        let category = non_blank(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Formula {
            id,
            name,
            category,
            expression: self.expression,
            display_latex: self.display_latex.unwrap_or_default(),
            params: self.params,
            description: self.description.unwrap_or_default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Text reported to the service after a formula was admitted
pub fn success_message(name: &str) -> String {
    format!("Successfully added formula \"{}\". The user is now viewing it.", name)
}

/// Declaration of the `addFormula` tool in JSON-schema form
pub fn tool_declaration() -> JsonValue {
    json!({
        "name": ADD_FORMULA,
        "description": "Add a new mathematical formula to the application library. Use this when \
                        the user asks to see a function or graph that is not in the current list.",
        "parameters": {
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "Unique ID (e.g. \"damped-oscillation\")." },
                "name": { "type": "string", "description": "Display name (e.g. \"Damped Oscillation\")." },
                "category": { "type": "string", "description": "Category name (e.g. \"Physics\", \"Advanced\")." },
                "expression": {
                    "type": "string",
                    "description": "Expression using x as the variable, with explicit multiplication \
                                    (e.g. \"e^(-x) * sin(2*x)\")."
                },
                "displayLatex": { "type": "string", "description": "LaTeX for display (e.g. \"e^{-x} \\sin(2x)\")." },
                "description": { "type": "string", "description": "Brief description of the formula." },
                "params": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Parameter name (e.g. \"a\", \"k\")." },
                            "value": { "type": "number", "description": "Default value." },
                            "min": { "type": "number", "description": "Minimum value." },
                            "max": { "type": "number", "description": "Maximum value." },
                            "step": { "type": "number", "description": "Step size." },
                            "description": { "type": "string", "description": "Parameter description." }
                        },
                        "required": ["name", "value", "min", "max", "step", "description"]
                    }
                }
            },
            "required": ["id", "name", "category", "expression", "displayLatex", "description", "params"]
        }
    })
}
