//! Text sent to the service on the user's behalf

use crate::formula::Formula;

/// Wrap a user message with a description of the formula on screen
///
/// # Examples
///
/// ```
/// use formula_explorer::assistant::context_prompt;
/// use formula_explorer::formula::{Formula, Parameter};
///
/// let formula = Formula::new("linear", "Linear Function", "Basic Algebra", "a * x + b")
///     .with_latex("y = ax + b")
///     .with_param(Parameter::new("a", 1.0, -10.0, 10.0, 0.1))
///     .with_param(Parameter::new("b", 0.0, -10.0, 10.0, 0.1));
///
/// let prompt = context_prompt(&formula, "What is the slope?");
/// assert!(prompt.contains("Linear Function (y = ax + b)"));
/// assert!(prompt.contains("a=1, b=0"));
/// assert!(prompt.ends_with("What is the slope?"));
/// ```
pub fn context_prompt(formula: &Formula, message: &str) -> String {
    format!(
        "Currently displayed formula: {} ({}).\nCurrent parameters: {}.\nUser question: {}",
        formula.name,
        formula.display_latex,
        formula.params_summary(),
        message
    )
}

/// A canned question offered as a one-click shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 3] = [
    QuickAction {
        label: "Analyze properties",
        prompt: "Using the current parameters, analyze the domain, range, monotonicity and \
                 symmetry of this function in detail.",
    },
    QuickAction {
        label: "Real-world applications",
        prompt: "Give concrete examples of where this function is used in everyday life, \
                 science or engineering.",
    },
    QuickAction {
        label: "Add damped oscillation",
        prompt: "Please add a damped oscillation formula to the library.",
    },
];
