//! One user turn with the assistant, as an explicit state machine
//!
//! ```text
//! Idle -> AwaitingFirstToken -> Streaming -> AwaitingToolResult -> StreamingFollowUp -> Done
//!                  \_______________\_______________\____________________\___________-> Failed
//! ```
//!
//! A turn appends the user message and an empty model placeholder, sends
//! the context-wrapped message, then consumes [`ServiceEvent`]s. Tool calls
//! are executed synchronously against the [`Workbench`] and their result is
//! sent back as a new request whose reply is appended to the same
//! placeholder. The turn is done when every request it sent has finished.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, info, warn};

use super::prompt::context_prompt;
use super::service::{RequestId, ServiceClient, ServiceEvent, ServiceRequest};
use super::tool::{success_message, tool_declaration, AddFormulaArgs, ToolCall, ToolResponse, ADD_FORMULA};
use super::transcript::{MessageId, Role, Transcript};
use super::AssistantError;
use crate::catalog::Admission;
use crate::config::AssistantConfig;
use crate::workbench::Workbench;

/// Where the current turn stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    AwaitingFirstToken,
    Streaming,
    AwaitingToolResult,
    StreamingFollowUp,
    Done,
    Failed,
}

impl ExchangeState {
    /// Whether a turn is in flight
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            ExchangeState::AwaitingFirstToken
                | ExchangeState::Streaming
                | ExchangeState::AwaitingToolResult
                | ExchangeState::StreamingFollowUp
        )
    }
}

/// Shared flag for cancelling a running turn from another thread
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Summary of a finished turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub state: ExchangeState,
    /// Formula ids admitted through tool calls, in call order
    pub admitted: Vec<(String, Admission)>,
    pub error: Option<AssistantError>,
}

#[derive(Debug)]
struct Turn {
    placeholder: MessageId,
    pending: HashSet<RequestId>,
    follow_ups: HashSet<RequestId>,
    started: HashSet<RequestId>,
    admitted: Vec<(String, Admission)>,
}

/// Chat transcript plus the exchange with a service
#[derive(Debug)]
pub struct Assistant {
    client: ServiceClient,
    config: AssistantConfig,
    transcript: Transcript,
    state: ExchangeState,
    turn: Option<Turn>,
    last_error: Option<AssistantError>,
    last_admitted: Vec<(String, Admission)>,
    next_request: u64,
}

impl Assistant {
    /// Open a conversation over `client`
    ///
    /// Sends the model, system instruction and tool declaration, and starts
    /// the transcript with the welcome message.
    pub fn connect(client: ServiceClient, config: AssistantConfig) -> Result<Self, AssistantError> {
        client.send(ServiceRequest::Open {
            model: config.model.clone(),
            system_instruction: config.system_instruction.clone(),
            tools: vec![tool_declaration()],
        })?;

        Ok(Self {
            client,
            transcript: Transcript::with_welcome(&config.welcome_message),
            config,
            state: ExchangeState::Idle,
            turn: None,
            last_error: None,
            last_admitted: Vec::new(),
            next_request: 0,
        })
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Send `message` and process events until the turn ends or `cancel` is set
    ///
    /// A turn still pending after the configured turn timeout fails with
    /// [`AssistantError::TimedOut`].
    pub fn run_turn(
        &mut self,
        workbench: &mut Workbench,
        message: &str,
        cancel: &CancelHandle,
    ) -> TurnOutcome {
        if let Err(e) = self.begin(workbench, message) {
            return TurnOutcome {
                state: self.state,
                admitted: Vec::new(),
                error: Some(e),
            };
        }

        let started = Instant::now();
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let deadline = self.config.turn_timeout_ms.map(Duration::from_millis);
        while self.state.is_pending() {
            if cancel.is_cancelled() {
                self.cancel();
                break;
            }
            if let Some(limit) = deadline {
                let elapsed = started.elapsed();
                if elapsed >= limit {
                    self.fail(AssistantError::TimedOut(limit.as_millis() as u64));
                    break;
                }
                self.poll(workbench, interval.min(limit - elapsed));
            } else {
                self.poll(workbench, interval);
            }
        }

        TurnOutcome {
            state: self.state,
            admitted: std::mem::take(&mut self.last_admitted),
            error: self.last_error.take(),
        }
    }

    /// Start a turn without waiting for the reply
    ///
    /// Fails without touching the transcript when the message is blank or a
    /// turn is already in flight. A failure to reach the service ends the
    /// turn as [`ExchangeState::Failed`] instead.
    pub fn begin(&mut self, workbench: &Workbench, message: &str) -> Result<(), AssistantError> {
        if self.state.is_pending() {
            return Err(AssistantError::Busy);
        }
        if message.trim().is_empty() {
            return Err(AssistantError::EmptyMessage);
        }

        self.last_error = None;
        self.last_admitted.clear();
        self.transcript.push(Role::User, message);
        let placeholder = self.transcript.push(Role::Model, "");

        let id = self.next_request_id();
        self.turn = Some(Turn {
            placeholder,
            pending: HashSet::from([id]),
            follow_ups: HashSet::new(),
            started: HashSet::new(),
            admitted: Vec::new(),
        });
        self.state = ExchangeState::AwaitingFirstToken;

        let text = context_prompt(workbench.active(), message);
        if let Err(e) = self.client.send(ServiceRequest::Message { id, text }) {
            self.fail(e);
        }
        Ok(())
    }

    /// Wait up to `timeout` for one event and apply it
    pub fn poll(&mut self, workbench: &mut Workbench, timeout: Duration) -> ExchangeState {
        if !self.state.is_pending() {
            return self.state;
        }
        match self.client.recv_timeout(timeout) {
            Ok(Some(event)) => self.handle_event(workbench, event),
            Ok(None) => {}
            Err(e) => self.fail(e),
        }
        self.state
    }

    /// Apply one service event to the current turn
    ///
    /// Events for requests outside the current turn are ignored.
    pub fn handle_event(&mut self, workbench: &mut Workbench, event: ServiceEvent) {
        let Some(mut turn) = self.turn.take() else {
            debug!("Ignoring event for {:?} outside a turn", event.request());
            return;
        };
        if !turn.pending.contains(&event.request()) {
            debug!("Ignoring stale event for {:?}", event.request());
            self.turn = Some(turn);
            return;
        }

        match event {
            ServiceEvent::Token { request, text } => {
                if !text.is_empty() {
                    self.append_token(&mut turn, request, &text);
                }
                self.turn = Some(turn);
            }
            ServiceEvent::ToolCall { call, .. } => {
                let (response, admitted) = execute_tool(workbench, &call);
                turn.admitted.extend(admitted);

                let id = self.next_request_id();
                turn.pending.insert(id);
                turn.follow_ups.insert(id);
                self.state = ExchangeState::AwaitingToolResult;
                self.turn = Some(turn);

                if let Err(e) = self.client.send(ServiceRequest::ToolResult { id, response }) {
                    self.fail(e);
                }
            }
            ServiceEvent::Finished { request } => {
                turn.pending.remove(&request);
                if turn.pending.is_empty() {
                    self.finish(turn, ExchangeState::Done);
                } else {
                    self.turn = Some(turn);
                }
            }
            ServiceEvent::Error { message, .. } => {
                self.turn = Some(turn);
                self.fail(AssistantError::Service(message));
            }
        }
    }

    /// End the current turn early, keeping any text received so far
    pub fn cancel(&mut self) {
        if let Some(turn) = self.turn.take() {
            info!("Assistant turn cancelled");
            self.finish(turn, ExchangeState::Done);
        }
    }

    fn append_token(&mut self, turn: &mut Turn, request: RequestId, text: &str) {
        if turn.follow_ups.contains(&request) {
            if turn.started.insert(request) {
                let has_text = self
                    .transcript
                    .get(turn.placeholder)
                    .is_some_and(|m| !m.content.is_empty());
                if has_text {
                    self.transcript.append(turn.placeholder, "\n");
                }
            }
            self.state = ExchangeState::StreamingFollowUp;
        } else if self.state == ExchangeState::AwaitingFirstToken {
            self.state = ExchangeState::Streaming;
        }
        self.transcript.append(turn.placeholder, text);
    }

    fn fail(&mut self, error: AssistantError) {
        warn!("Assistant turn failed: {}", error);
        if let Some(turn) = self.turn.take() {
            self.finish(turn, ExchangeState::Failed);
        } else {
            self.state = ExchangeState::Failed;
        }
        self.transcript.push(Role::Model, &self.config.fallback_message);
        self.last_error = Some(error);
    }

    fn finish(&mut self, turn: Turn, state: ExchangeState) {
        let empty = self
            .transcript
            .get(turn.placeholder)
            .is_some_and(|m| m.content.is_empty());
        if empty {
            self.transcript.remove(turn.placeholder);
        }
        self.last_admitted = turn.admitted;
        self.state = state;
    }

    fn next_request_id(&mut self) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        id
    }
}

/// Run a tool call against the workbench
fn execute_tool(workbench: &mut Workbench, call: &ToolCall) -> (ToolResponse, Option<(String, Admission)>) {
    if call.name != ADD_FORMULA {
        warn!("Service called unknown tool '{}'", call.name);
        let error = AssistantError::UnknownTool(call.name.clone());
        return (ToolResponse::failure(&call.name, &error.to_string()), None);
    }

    let args = match AddFormulaArgs::from_json(&call.args) {
        Ok(args) => args,
        Err(e) => {
            warn!("Rejected {} call: {}", ADD_FORMULA, e);
            return (ToolResponse::failure(ADD_FORMULA, &e.to_string()), None);
        }
    };

    let formula = args.into_formula(Utc::now());
    let id = formula.id.clone();
    let name = formula.name.clone();
    match workbench.admit(formula) {
        Ok(admission) => {
            info!("Assistant added formula '{}' ({:?})", id, admission);
            (
                ToolResponse::success(ADD_FORMULA, &success_message(&name)),
                Some((id, admission)),
            )
        }
        Err(e) => {
            warn!("Assistant formula '{}' rejected: {}", id, e);
            let reason = format!("Could not add formula \"{}\": {}", name, e);
            (ToolResponse::failure(ADD_FORMULA, &reason), None)
        }
    }
}
