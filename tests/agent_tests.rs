//! Tests for the ReAct agent loop.

mod common;

use std::sync::Arc;

use common::MockProvider;
use parley::agent::{create_react_agent, CALENDAR_AGENT_PROMPT};
use parley::error::ParleyError;
use parley::tools::builtin::current_datetime_tool;
use parley::tools::{AgentTool, AgentToolParameters, Tool};
use parley::types::*;
use pretty_assertions::assert_eq;

fn echo_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "echo",
        "Echo the input back",
        AgentToolParameters::object()
            .string("text", "Text to echo", true)
            .build(),
        |args, _ctx| async move {
            let text = args.get_str("text")?;
            Ok(serde_json::json!({ "echo": text }))
        },
    ))
}

fn failing_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "broken",
        "Always fails",
        AgentToolParameters::empty(),
        |_args, _ctx| async move {
            Err(ParleyError::ToolExecution {
                tool_name: "broken".into(),
                message: "calendar unavailable".into(),
            })
        },
    ))
}

#[tokio::test]
async fn answers_without_tools() {
    let provider = Arc::new(MockProvider::new("mock-model"));
    provider.queue_response("Hello there");

    let agent = create_react_agent(provider.clone(), "calendar_agent", None, vec![]);
    let state = agent
        .invoke(vec![ModelMessage::user("hi")])
        .await
        .unwrap();

    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.last_reply().as_deref(), Some("Hello there"));
    assert_eq!(state.finish_reason, Some(FinishReason::Stop));
    assert_eq!(state.usage.total_tokens, 30);

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].tools.is_none());
}

#[tokio::test]
async fn system_prompt_is_prepended_but_not_stored() {
    let provider = Arc::new(MockProvider::new("mock-model"));
    provider.queue_response("ok");

    let agent = create_react_agent(
        provider.clone(),
        "calendar_agent",
        Some("You manage calendars.".into()),
        vec![],
    );
    let state = agent.invoke(vec![ModelMessage::user("hi")]).await.unwrap();

    let sent = &provider.requests()[0].messages;
    assert_eq!(sent[0].role, Role::System);
    assert_eq!(sent[0].text(), "You manage calendars.");
    assert!(state.messages.iter().all(|m| m.role != Role::System));
}

#[tokio::test]
async fn tool_call_round_trip() {
    let provider = Arc::new(MockProvider::new("mock-model"));
    provider.queue_tool_call("call_1", "echo", serde_json::json!({"text": "ping"}));
    provider.queue_response("The tool said ping");

    let agent = create_react_agent(provider.clone(), "calendar_agent", None, vec![echo_tool()]);
    let state = agent.invoke(vec![ModelMessage::user("echo ping")]).await.unwrap();

    // user, assistant(tool call), tool result, assistant(final)
    assert_eq!(state.messages.len(), 4);
    assert_eq!(state.messages[2].role, Role::Tool);
    match &state.messages[2].content[0] {
        ContentPart::ToolResult(result) => {
            assert_eq!(result.tool_call_id, "call_1");
            assert_eq!(result.tool_name, "echo");
            assert_eq!(result.result, serde_json::json!({"echo": "ping"}));
            assert!(!result.is_error);
        }
        other => panic!("expected tool result, got {other:?}"),
    }
    assert_eq!(state.last_reply().as_deref(), Some("The tool said ping"));
    assert_eq!(state.usage.total_tokens, 45);

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    let tools = requests[0].tools.as_ref().unwrap();
    assert_eq!(tools[0].name, "echo");
    assert_eq!(requests[1].messages.len(), 3);
}

#[tokio::test]
async fn unknown_tool_is_reported_to_the_model() {
    let provider = Arc::new(MockProvider::new("mock-model"));
    provider.queue_tool_call("call_1", "delete_everything", serde_json::json!({}));
    provider.queue_response("I can't do that");

    let agent = create_react_agent(provider, "calendar_agent", None, vec![echo_tool()]);
    let state = agent.invoke(vec![ModelMessage::user("go")]).await.unwrap();

    match &state.messages[2].content[0] {
        ContentPart::ToolResult(result) => {
            assert!(result.is_error);
            assert!(result.result["error"]
                .as_str()
                .unwrap()
                .contains("delete_everything"));
        }
        other => panic!("expected tool result, got {other:?}"),
    }
    assert_eq!(state.last_reply().as_deref(), Some("I can't do that"));
}

#[tokio::test]
async fn failing_tool_does_not_abort_the_run() {
    let provider = Arc::new(MockProvider::new("mock-model"));
    provider.queue_tool_call("call_1", "broken", serde_json::json!({}));
    provider.queue_response("The calendar is down");

    let agent = create_react_agent(provider, "calendar_agent", None, vec![failing_tool()]);
    let reply = agent.reply("what's on today?").await.unwrap();
    assert_eq!(reply, "The calendar is down");
}

#[tokio::test]
async fn iteration_limit_stops_the_loop() {
    let provider = Arc::new(MockProvider::new("mock-model"));
    for i in 0..3 {
        provider.queue_tool_call(&format!("call_{i}"), "echo", serde_json::json!({"text": "again"}));
    }

    let agent = create_react_agent(provider.clone(), "calendar_agent", None, vec![echo_tool()])
        .with_max_iterations(2);
    let state = agent.invoke(vec![ModelMessage::user("loop")]).await.unwrap();

    assert_eq!(provider.requests().len(), 2);
    assert_eq!(state.finish_reason, Some(FinishReason::Length));
    assert!(state.last_reply().is_none());
}

#[tokio::test]
async fn reply_with_images_sends_text_then_images() {
    let provider = Arc::new(MockProvider::new("mock-model"));
    provider.queue_response("A red square");

    let agent = create_react_agent(provider.clone(), "calendar_agent", None, vec![]);
    let image = ImageContent::from_data_url("data:image/png;base64,iVBORw==").unwrap();
    let reply = agent
        .reply_with_images("what is this?", vec![image.clone()])
        .await
        .unwrap();
    assert_eq!(reply, "A red square");

    let sent = &provider.requests()[0].messages[0];
    assert_eq!(sent.role, Role::User);
    assert_eq!(
        sent.content,
        vec![
            ContentPart::Text {
                text: "what is this?".into()
            },
            ContentPart::Image(image),
        ]
    );
}

#[tokio::test]
async fn provider_errors_propagate() {
    let provider = Arc::new(MockProvider::new("mock-model"));
    let agent = create_react_agent(provider, "calendar_agent", None, vec![]);
    let err = agent.reply("hi").await.unwrap_err();
    assert!(matches!(err, ParleyError::Api { status: 500, .. }));
}

#[tokio::test]
async fn calendar_agent_with_datetime_tool() {
    let provider = Arc::new(MockProvider::new("mock-model"));
    provider.queue_tool_call("call_1", "current_datetime", serde_json::json!({}));
    provider.queue_response("It is Monday");

    let prompt = CALENDAR_AGENT_PROMPT.render(&std::collections::HashMap::from([(
        "today",
        "2026-10-19".to_string(),
    )]));
    let agent = create_react_agent(
        provider.clone(),
        "calendar_agent",
        Some(prompt),
        vec![current_datetime_tool()],
    );
    let state = agent.invoke(vec![ModelMessage::user("what day is it?")]).await.unwrap();

    match &state.messages[2].content[0] {
        ContentPart::ToolResult(result) => {
            assert!(!result.is_error);
            assert_eq!(result.result["utc_offset"], "+00:00");
            assert!(result.result["weekday"].is_string());
        }
        other => panic!("expected tool result, got {other:?}"),
    }
    assert!(provider.requests()[0].messages[0]
        .text()
        .contains("Today is 2026-10-19."));
}
