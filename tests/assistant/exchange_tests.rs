//! Tests for complete assistant turns

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use formula_explorer::assistant::{
    spawn, Assistant, AssistantError, AssistantService, CancelHandle, ExchangeState, Role,
    ScriptedService, ServiceEvent, ServiceRequest, Step, ToolCall, ADD_FORMULA,
};
use formula_explorer::config::AssistantConfig;
use formula_explorer::Admission;
use serde_json::json;

use crate::test_helpers::workbench;

fn add_formula(args: serde_json::Value) -> ToolCall {
    ToolCall {
        name: ADD_FORMULA.to_string(),
        args,
    }
}

fn model_messages(assistant: &Assistant) -> Vec<String> {
    assistant
        .transcript()
        .messages()
        .iter()
        .skip(1)
        .filter(|m| m.role == Role::Model)
        .map(|m| m.content.clone())
        .collect()
}

#[test]
fn test_welcome_message() {
    let (client, _thread) = spawn(ScriptedService::new());
    let assistant = Assistant::connect(client, AssistantConfig::default()).unwrap();
    let first = &assistant.transcript().messages()[0];
    assert_eq!(first.role, Role::Model);
    assert!(first.content.contains("cardioid"));
    assert_eq!(assistant.state(), ExchangeState::Idle);
}

#[test]
fn test_tool_call_for_existing_id_replaces_and_acknowledges_once() {
    let call = add_formula(json!({
        "id": "sin",
        "name": "Damped Sine",
        "category": "Trigonometry",
        "expression": "a * e^(-k * x) * sin(x)",
        "displayLatex": "y = a e^{-kx} \\sin x",
        "description": "A sine wave with decaying amplitude",
        "params": [
            { "name": "a", "value": 2, "min": 0.1, "max": 5, "step": 0.1, "description": "amplitude" },
            { "name": "k", "value": 0.2, "min": 0, "max": 1, "step": 0.05, "description": "damping" }
        ]
    }));
    let service = ScriptedService::new()
        .reply(vec![Step::ToolCall(call), Step::Finish])
        .reply(vec![
            Step::token("I replaced the sine "),
            Step::token("with a damped one."),
            Step::Finish,
        ]);
    let (client, _thread) = spawn(service);
    let mut assistant = Assistant::connect(client, AssistantConfig::default()).unwrap();
    let mut bench = workbench(5);
    let len = bench.catalog().len();

    let outcome = assistant.run_turn(&mut bench, "Make the sine wave decay", &CancelHandle::new());

    assert_eq!(outcome.state, ExchangeState::Done);
    assert_eq!(outcome.admitted, vec![("sin".to_string(), Admission::Replaced)]);
    assert_eq!(bench.catalog().len(), len);
    assert_eq!(bench.active().name, "Damped Sine");
    assert_eq!(bench.catalog().get("sin").unwrap().params.len(), 2);
    assert_eq!(
        model_messages(&assistant),
        vec!["I replaced the sine with a damped one."]
    );

    // The new formula renders with its own parameters
    let render = bench.render();
    assert_eq!(render.samples.len(), 5);
    assert!(render.samples.iter().all(|s| s.y.is_some()));
}

#[test]
fn test_two_tool_calls_in_one_turn() {
    let first = add_formula(json!({ "id": "c1", "name": "One", "expression": "x" }));
    let second = add_formula(json!({ "id": "c2", "name": "Two", "expression": "2 * x" }));
    let service = ScriptedService::new()
        .reply(vec![
            Step::token("Adding both."),
            Step::ToolCall(first),
            Step::ToolCall(second),
            Step::Finish,
        ])
        .reply(vec![Step::token("First added."), Step::Finish])
        .reply(vec![Step::token("Second added."), Step::Finish]);
    let (client, _thread) = spawn(service);
    let mut assistant = Assistant::connect(client, AssistantConfig::default()).unwrap();
    let mut bench = workbench(5);

    let outcome = assistant.run_turn(&mut bench, "add two lines", &CancelHandle::new());
    assert_eq!(outcome.state, ExchangeState::Done);
    assert_eq!(outcome.admitted.len(), 2);
    assert_eq!(bench.active().id, "c2");
    assert_eq!(
        model_messages(&assistant),
        vec!["Adding both.\nFirst added.\nSecond added."]
    );
}

#[test]
fn test_rejected_tool_call_is_reported_back() {
    let config = formula_explorer::ExplorerConfig {
        admission_policy: formula_explorer::AdmissionPolicy::Strict,
        ..Default::default()
    };
    let mut bench = formula_explorer::Workbench::new(
        formula_explorer::Catalog::builtin().unwrap(),
        config,
    )
    .unwrap();

    let call = add_formula(json!({ "id": "bad", "name": "Bad", "expression": "q * x" }));
    let (service, seen) = ScriptedService::new()
        .reply(vec![Step::ToolCall(call), Step::Finish])
        .reply(vec![Step::token("Sorry, that failed."), Step::Finish])
        .recording();
    let (client, _thread) = spawn(service);
    let mut assistant = Assistant::connect(client, AssistantConfig::default()).unwrap();

    let outcome = assistant.run_turn(&mut bench, "add q*x", &CancelHandle::new());
    assert_eq!(outcome.state, ExchangeState::Done);
    assert!(outcome.admitted.is_empty());
    assert!(!bench.catalog().contains("bad"));
    assert_eq!(bench.active().id, "linear");

    let response = seen
        .try_iter()
        .find_map(|r| match r {
            ServiceRequest::ToolResult { response, .. } => Some(response),
            _ => None,
        })
        .unwrap();
    assert!(response.is_error());
    assert!(response.response["error"].as_str().unwrap().contains("Bad"));
}

/// Streams one token per request and never finishes
struct Stalling;

impl AssistantService for Stalling {
    fn handle(&mut self, request: ServiceRequest, events: &Sender<ServiceEvent>) {
        if let Some(id) = request.id() {
            let _ = events.send(ServiceEvent::Token {
                request: id,
                text: "Thinking about it".to_string(),
            });
        }
    }
}

#[test]
fn test_cancel_from_another_thread() {
    let (client, _thread) = spawn(Stalling);
    let mut assistant = Assistant::connect(client, AssistantConfig::default()).unwrap();
    let mut bench = workbench(5);

    let cancel = CancelHandle::new();
    let remote = cancel.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        remote.cancel();
    });

    let outcome = assistant.run_turn(&mut bench, "long question", &cancel);
    canceller.join().unwrap();

    assert_eq!(outcome.state, ExchangeState::Done);
    assert!(outcome.error.is_none());
    assert_eq!(model_messages(&assistant), vec!["Thinking about it"]);
}

#[test]
fn test_stalled_service_hits_turn_timeout() {
    let (client, _thread) = spawn(Stalling);
    let config = AssistantConfig {
        turn_timeout_ms: Some(200),
        ..AssistantConfig::default()
    };
    let fallback = config.fallback_message.clone();
    let mut assistant = Assistant::connect(client, config).unwrap();
    let mut bench = workbench(5);

    let outcome = assistant.run_turn(&mut bench, "long question", &CancelHandle::new());
    assert_eq!(outcome.state, ExchangeState::Failed);
    assert_eq!(outcome.error, Some(AssistantError::TimedOut(200)));
    assert_eq!(
        model_messages(&assistant),
        vec!["Thinking about it".to_string(), fallback]
    );
}

#[test]
fn test_failure_leaves_assistant_usable() {
    let service = ScriptedService::new()
        .reply(vec![Step::Fail("503".to_string())])
        .reply(vec![Step::token("Back online."), Step::Finish]);
    let (client, _thread) = spawn(service);
    let config = AssistantConfig::default();
    let fallback = config.fallback_message.clone();
    let mut assistant = Assistant::connect(client, config).unwrap();
    let mut bench = workbench(5);

    let outcome = assistant.run_turn(&mut bench, "hello?", &CancelHandle::new());
    assert_eq!(outcome.state, ExchangeState::Failed);

    let outcome = assistant.run_turn(&mut bench, "hello again", &CancelHandle::new());
    assert_eq!(outcome.state, ExchangeState::Done);
    assert_eq!(model_messages(&assistant), vec![fallback, "Back online.".to_string()]);
}
