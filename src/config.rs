//! Configuration options for the explorer.
//!
//! Every struct here has a `Default` matching the behavior of the interactive
//! application, and the whole tree round-trips through JSON so a host can
//! keep its settings in a file. Fields missing from a JSON document take
//! their default values.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::expression::IMAGINARY_TOLERANCE;
use crate::sampling::{AxisRange, DEFAULT_SAMPLE_COUNT};

/// How the catalog treats formulas whose expression may not evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdmissionPolicy {
    /// Admit anything with a non-empty id; bad expressions surface when sampled
    #[default]
    FailLate,

    /// Reject formulas that do not compile or reference undeclared identifiers
    Strict,
}

/// Sampling options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SamplingConfig {
    /// Number of samples across the x-range. Default: 300
    pub sample_count: usize,

    /// Largest imaginary magnitude still plotted as real. Default: 1e-10
    pub imaginary_tolerance: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            imaginary_tolerance: IMAGINARY_TOLERANCE,
        }
    }
}

/// Assistant exchange options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssistantConfig {
    /// First message shown in a fresh transcript
    pub welcome_message: String,

    /// Message appended when a turn fails
    pub fallback_message: String,

    /// How long to wait for a service event before checking for cancellation. Default: 50ms
    pub poll_interval_ms: u64,

    /// Longest a turn may wait for the service before failing. Default: 120s; `None` waits until cancelled
    pub turn_timeout_ms: Option<u64>,

    /// Model identifier passed through to the service
    pub model: String,

    /// Instruction describing the assistant's role
    pub system_instruction: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            welcome_message: "Hello! I'm your formula assistant. Ask me about the function \
                              on screen, or ask me to add a new one, like \"draw a cardioid\" \
                              or \"add a damped oscillation\"."
                .to_string(),
            fallback_message: "Sorry, I ran into a problem. Please try again later.".to_string(),
            poll_interval_ms: 50,
            turn_timeout_ms: Some(120_000),
            model: "gemini-2.5-flash".to_string(),
            system_instruction: "You are a mathematics tutor inside a function plotting tool. \
                                 Explain the displayed formula and its parameters concisely. \
                                 When the user asks for a new function, call addFormula with \
                                 an expression using x as the variable and one entry in params \
                                 for every other identifier."
                .to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExplorerConfig {
    /// Initial x-range of the plot. Default: [-10, 10]
    pub x_range: AxisRange,

    /// Sampling options
    pub sampling: SamplingConfig,

    /// Catalog admission policy. Default: FailLate
    pub admission_policy: AdmissionPolicy,

    /// Assistant options
    pub assistant: AssistantConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            x_range: AxisRange::default(),
            sampling: SamplingConfig::default(),
            admission_policy: AdmissionPolicy::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

impl ExplorerConfig {
    /// Parse a configuration from a JSON string
    ///
    /// # Examples
    ///
    /// ```
    /// use formula_explorer::config::{AdmissionPolicy, ExplorerConfig};
    ///
    /// let config = ExplorerConfig::from_json(r#"{"admissionPolicy": "strict"}"#).unwrap();
    /// assert_eq!(config.admission_policy, AdmissionPolicy::Strict);
    /// assert_eq!(config.sampling.sample_count, 300);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to a pretty-printed JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Save the configuration to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
