//! Message channel between the explorer and a conversational service
//!
//! The explorer never talks to a network itself. An [`AssistantService`]
//! implementation runs on its own thread, receives [`ServiceRequest`]s and
//! streams [`ServiceEvent`]s back; both directions are `std::sync::mpsc`
//! channels.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};
use serde_json::Value as JsonValue;

use super::tool::{ToolCall, ToolResponse};
use super::AssistantError;

/// Identifier tying events to the request that caused them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Request sent to the service
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceRequest {
    /// Start a conversation; sent once before any message
    Open {
        model: String,
        system_instruction: String,
        tools: Vec<JsonValue>,
    },

    /// A user message, already wrapped with context
    Message { id: RequestId, text: String },

    /// Result of a tool call made while answering an earlier request
    ToolResult { id: RequestId, response: ToolResponse },
}

impl ServiceRequest {
    /// Id of the request, if it expects a reply
    pub fn id(&self) -> Option<RequestId> {
        match self {
            ServiceRequest::Open { .. } => None,
            ServiceRequest::Message { id, .. } | ServiceRequest::ToolResult { id, .. } => Some(*id),
        }
    }
}

/// Event streamed back by the service
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEvent {
    /// A chunk of reply text
    Token { request: RequestId, text: String },

    /// The service wants a tool invoked
    ToolCall { request: RequestId, call: ToolCall },

    /// No more events will follow for `request`
    Finished { request: RequestId },

    /// The request failed
    Error { request: RequestId, message: String },
}

impl ServiceEvent {
    /// Request the event belongs to
    pub fn request(&self) -> RequestId {
        match self {
            ServiceEvent::Token { request, .. }
            | ServiceEvent::ToolCall { request, .. }
            | ServiceEvent::Finished { request }
            | ServiceEvent::Error { request, .. } => *request,
        }
    }
}

/// A conversational backend
///
/// `handle` is called once per request, in order, on the service thread.
/// It must eventually send either `Finished` or `Error` for every request
/// with an id.
pub trait AssistantService: Send + 'static {
    fn handle(&mut self, request: ServiceRequest, events: &Sender<ServiceEvent>);
}

/// Explorer side of the channel pair
#[derive(Debug)]
pub struct ServiceClient {
    requests: Sender<ServiceRequest>,
    events: Receiver<ServiceEvent>,
}

/// Service side of the channel pair
#[derive(Debug)]
pub struct ServiceEndpoint {
    pub requests: Receiver<ServiceRequest>,
    pub events: Sender<ServiceEvent>,
}

/// Create a connected client/endpoint pair
pub fn channel() -> (ServiceClient, ServiceEndpoint) {
    let (request_tx, request_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();
    (
        ServiceClient {
            requests: request_tx,
            events: event_rx,
        },
        ServiceEndpoint {
            requests: request_rx,
            events: event_tx,
        },
    )
}

/// Run `service` on a new thread and return the client connected to it
///
/// The thread exits once the client is dropped.
pub fn spawn<S: AssistantService>(mut service: S) -> (ServiceClient, JoinHandle<()>) {
    let (client, endpoint) = channel();
    let handle = thread::spawn(move || {
        for request in endpoint.requests.iter() {
            debug!("Service handling {:?}", request.id());
            service.handle(request, &endpoint.events);
        }
        debug!("Service channel closed");
    });
    (client, handle)
}

impl ServiceClient {
    /// Send a request
    pub fn send(&self, request: ServiceRequest) -> Result<(), AssistantError> {
        self.requests.send(request).map_err(|_| {
            warn!("Assistant service is no longer receiving requests");
            AssistantError::Disconnected
        })
    }

    /// Wait up to `timeout` for the next event
    ///
    /// `Ok(None)` means the timeout elapsed.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<ServiceEvent>, AssistantError> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(AssistantError::Disconnected),
        }
    }
}
