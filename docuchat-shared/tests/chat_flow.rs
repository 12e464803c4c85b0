//! Chat orchestration and conversation session behaviour.

mod common;

use common::Harness;
use serde_json::json;
use shared::{
    KeyValueStore, LoadingId, MemoryStore, Message, MessageRole, RequestBody, SendState,
    SinkEvent, StaticAuth, WidgetError,
};

#[tokio::test]
async fn test_successful_send_renders_user_then_bot() {
    let harness = Harness::with_store(MemoryStore::with_entries([("conversation_id", "c1")]));
    harness
        .transport
        .reply("/chatbot", 200, json!({"reply": "Hi, how can I help?"}));

    let state = harness.widget.send_chat_message("Hello").await;

    assert_eq!(state, SendState::Rendered);
    let messages = harness.log.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].text, "Hello");
    assert_eq!(messages[1].role, MessageRole::Bot);
    assert_eq!(messages[1].text, "Hi, how can I help?");
    assert!(harness.log.pending_loading().is_empty());
    assert_eq!(harness.log.dismissals(), 1);
    // The placeholder is gone before the reply shows up
    assert_eq!(
        harness.log.events(),
        vec![
            SinkEvent::Append(Message::user("Hello")),
            SinkEvent::ShowLoading(LoadingId(0)),
            SinkEvent::DismissLoading(LoadingId(0)),
            SinkEvent::Append(Message::bot("Hi, how can I help?")),
        ]
    );

    let requests = harness.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].bearer_token.as_deref(), Some("token-123"));
    assert_eq!(
        requests[0].body,
        RequestBody::Json(json!({"prompt": "Hello", "conversation_id": "c1"}))
    );
}

#[tokio::test]
async fn test_plain_text_reply_is_accepted() {
    let harness = Harness::with_store(MemoryStore::with_entries([("conversation_id", "c1")]));
    harness
        .transport
        .reply_text("/chatbot", 200, "Plain answer from the model");

    assert_eq!(harness.widget.send_chat_message("Hi").await, SendState::Rendered);
    assert_eq!(harness.log.texts()[1], "Plain answer from the model");
}

#[tokio::test]
async fn test_non_success_renders_one_error_bubble() {
    let harness = Harness::with_store(MemoryStore::with_entries([("conversation_id", "c1")]));
    harness
        .transport
        .reply("/chatbot", 500, json!({"error": "Inference error: overloaded"}));

    let state = harness.widget.send_chat_message("Hello").await;

    assert_eq!(state, SendState::Failed);
    let messages = harness.log.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, MessageRole::Error);
    assert!(messages[1].text.contains("Inference error: overloaded"));
    assert!(harness.log.pending_loading().is_empty());
    assert_eq!(harness.log.dismissals(), 1);
    assert_eq!(
        harness.log.events(),
        vec![
            SinkEvent::Append(Message::user("Hello")),
            SinkEvent::ShowLoading(LoadingId(0)),
            SinkEvent::DismissLoading(LoadingId(0)),
            SinkEvent::Append(messages[1].clone()),
        ]
    );
}

#[tokio::test]
async fn test_network_failure_renders_one_error_bubble() {
    let harness = Harness::with_store(MemoryStore::with_entries([("conversation_id", "c1")]));
    harness.transport.fail("/chatbot");

    assert_eq!(harness.widget.send_chat_message("Hello").await, SendState::Failed);

    let errors: Vec<_> = harness
        .log
        .messages()
        .into_iter()
        .filter(|m| m.role == MessageRole::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].text.starts_with("Network/server error"));
    assert!(harness.log.pending_loading().is_empty());
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let harness = Harness::signed_in();
    assert_eq!(harness.widget.send_chat_message("   \n").await, SendState::Idle);
    assert!(harness.log.is_empty());
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_first_send_creates_and_persists_conversation() {
    let harness = Harness::signed_in();
    harness
        .transport
        .reply("/conversations/new", 200, json!({"conversation_id": "conv-9"}))
        .reply("/chatbot", 200, json!({"reply": "one"}))
        .reply("/chatbot", 200, json!({"reply": "two"}));

    harness.widget.send_chat_message("first").await;
    harness.widget.send_chat_message("second").await;

    assert_eq!(harness.transport.count("/conversations/new"), 1);
    assert_eq!(harness.store.get("conversation_id").as_deref(), Some("conv-9"));
    assert_eq!(harness.widget.session().conversation_id.as_deref(), Some("conv-9"));
    for request in harness.transport.requests().iter().filter(|r| r.path == "/chatbot") {
        let RequestBody::Json(body) = &request.body else {
            panic!("chat request must carry JSON");
        };
        assert_eq!(body["conversation_id"], "conv-9");
    }
}

#[tokio::test]
async fn test_conversation_create_failure_is_rendered() {
    let harness = Harness::signed_in();
    harness
        .transport
        .reply("/conversations/new", 503, json!({"error": "db offline"}));

    assert_eq!(harness.widget.send_chat_message("Hello").await, SendState::Failed);

    let last = harness.log.messages().pop().unwrap();
    assert_eq!(last.role, MessageRole::Error);
    assert!(last.text.contains("Could not start a conversation"));
    assert!(last.text.contains("db offline"));
    assert_eq!(harness.transport.count("/chatbot"), 0);
    assert_eq!(harness.widget.session().conversation_id, None);
}

#[tokio::test]
async fn test_conversation_create_without_id_fails() {
    let harness = Harness::signed_in();
    harness.transport.reply("/conversations/new", 200, json!({"ok": true}));

    assert_eq!(harness.widget.send_chat_message("Hello").await, SendState::Failed);
    assert!(harness.log.texts().last().unwrap().contains("conversation_id"));
    assert_eq!(harness.store.get("conversation_id"), None);
}

#[tokio::test]
async fn test_unauthenticated_send_never_reaches_transport() {
    let harness = Harness::build(StaticAuth::signed_out(), MemoryStore::new());

    assert_eq!(harness.widget.send_chat_message("Hello").await, SendState::Failed);

    assert!(harness.transport.requests().is_empty());
    let last = harness.log.messages().pop().unwrap();
    assert_eq!(last.text, WidgetError::Unauthenticated.to_string());
}

#[tokio::test]
async fn test_new_chat_resets_everything_even_if_reset_fails() {
    let harness = Harness::with_store(MemoryStore::with_entries([("conversation_id", "c1")]));
    harness
        .transport
        .reply("/chatbot", 200, json!({"reply": "hi"}))
        .fail("/reset");
    harness.widget.send_chat_message("Hello").await;

    harness.widget.new_chat().await;

    assert!(harness.log.is_empty());
    assert_eq!(harness.widget.session().conversation_id, None);
    assert_eq!(harness.store.get("conversation_id"), None);
    assert_eq!(harness.transport.count("/reset"), 1);
    let reset = harness
        .transport
        .requests()
        .into_iter()
        .find(|r| r.path == "/reset")
        .unwrap();
    assert_eq!(reset.bearer_token, None);
}
