//! # Conversational Assistant
//!
//! A chat transcript and the exchange with an external conversational
//! service. The service streams reply text and may call the `addFormula`
//! tool, which admits a formula into the catalog and makes it active.
//!
//! The service itself is abstract: anything implementing
//! [`AssistantService`] can be run on a thread with [`spawn`] and driven by
//! an [`Assistant`].
//!
//! ```rust
//! use formula_explorer::assistant::{spawn, Assistant, CancelHandle, ExchangeState, ScriptedService, Step};
//! use formula_explorer::config::AssistantConfig;
//! use formula_explorer::workbench::Workbench;
//!
//! let service = ScriptedService::new().reply(vec![Step::token("It is a line."), Step::Finish]);
//! let (client, _thread) = spawn(service);
//! let mut assistant = Assistant::connect(client, AssistantConfig::default()).unwrap();
//! let mut bench = Workbench::with_defaults().unwrap();
//!
//! let outcome = assistant.run_turn(&mut bench, "What is this?", &CancelHandle::new());
//! assert_eq!(outcome.state, ExchangeState::Done);
//! assert_eq!(assistant.transcript().last().unwrap().content, "It is a line.");
//! ```

pub mod exchange;
pub mod prompt;
pub mod scripted;
pub mod service;
pub mod tool;
pub mod transcript;

use thiserror::Error;

pub use exchange::{Assistant, CancelHandle, ExchangeState, TurnOutcome};
pub use prompt::{context_prompt, QuickAction, QUICK_ACTIONS};
pub use scripted::{ScriptedService, Step};
pub use service::{
    channel, spawn, AssistantService, RequestId, ServiceClient, ServiceEndpoint, ServiceEvent,
    ServiceRequest,
};
pub use tool::{
    success_message, tool_declaration, AddFormulaArgs, ToolCall, ToolResponse, ADD_FORMULA,
};
pub use transcript::{ChatMessage, MessageId, Role, Transcript};

/// Errors that can occur during an assistant exchange
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssistantError {
    #[error("Assistant service disconnected")]
    Disconnected,

    #[error("Assistant service error: {0}")]
    Service(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidToolArguments(String),

    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("A reply is still in progress")]
    Busy,

    #[error("No reply finished within {0} ms")]
    TimedOut(u64),
}
