//! A service that replays canned replies
//!
//! Useful for demos and tests: each request with an id consumes the next
//! reply from the script. An exhausted script answers with an error event.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};

use super::service::{AssistantService, ServiceEvent, ServiceRequest};
use super::tool::ToolCall;

/// One event of a scripted reply
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Token(String),
    ToolCall(ToolCall),
    Finish,
    Fail(String),
}

impl Step {
    pub fn token(text: &str) -> Self {
        Step::Token(text.to_string())
    }
}

/// Replays a fixed sequence of replies
#[derive(Debug, Default)]
pub struct ScriptedService {
    replies: VecDeque<Vec<Step>>,
    seen: Option<Sender<ServiceRequest>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply to the next request
    pub fn reply(mut self, steps: Vec<Step>) -> Self {
        self.replies.push_back(steps);
        self
    }

    /// Also forward every received request to the returned receiver
    pub fn recording(mut self) -> (Self, Receiver<ServiceRequest>) {
        let (tx, rx) = mpsc::channel();
        self.seen = Some(tx);
        (self, rx)
    }
}

impl AssistantService for ScriptedService {
    fn handle(&mut self, request: ServiceRequest, events: &Sender<ServiceEvent>) {
        if let Some(seen) = &self.seen {
            let _ = seen.send(request.clone());
        }
        let Some(id) = request.id() else {
            return;
        };

        let Some(steps) = self.replies.pop_front() else {
            let _ = events.send(ServiceEvent::Error {
                request: id,
                message: "no scripted reply left".to_string(),
            });
            return;
        };

        for step in steps {
            let event = match step {
                Step::Token(text) => ServiceEvent::Token { request: id, text },
                Step::ToolCall(call) => ServiceEvent::ToolCall { request: id, call },
                Step::Finish => ServiceEvent::Finished { request: id },
                Step::Fail(message) => ServiceEvent::Error { request: id, message },
            };
            if events.send(event).is_err() {
                return;
            }
        }
    }
}
