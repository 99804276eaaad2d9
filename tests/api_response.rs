use prompt_bridge::api::response::first_message;
use prompt_bridge::models::Role;
use serde_json::json;

#[test]
fn test_first_message_with_content() {
    let response = json!({
        "choices": [{
            "message": {
                "content": "Hello, world!",
                "role": "assistant"
            }
        }]
    });

    let message = first_message(response).unwrap();
    assert_eq!(message.role, Role::Assistant);
    assert_eq!(message.content.as_deref(), Some("Hello, world!"));
    assert!(message.requested_tool_calls().is_empty());
}

#[test]
fn test_first_message_without_content() {
    let response = json!({
        "choices": [{
            "message": {
                "role": "assistant"
            }
        }]
    });

    let message = first_message(response).unwrap();
    assert_eq!(message.content, None);
}

#[test]
fn test_first_message_empty_choices() {
    let response = json!({
        "choices": []
    });

    assert!(first_message(response).is_err());
}

#[test]
fn test_first_message_missing_choices() {
    let response = json!({
        "error": {"message": "bad request"}
    });

    let err = first_message(response).unwrap_err();
    assert!(err.to_string().contains("No choices"));
}

#[test]
fn test_first_message_with_tool_calls() {
    let response = json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    {
                        "id": "call_123",
                        "type": "function",
                        "function": {
                            "name": "calc_add",
                            "arguments": "{\"a\": 2, \"b\": 2}"
                        }
                    }
                ]
            }
        }]
    });

    let message = first_message(response).unwrap();
    let calls = message.requested_tool_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_123");
    assert_eq!(calls[0].function.name, "calc_add");
    assert_eq!(calls[0].function.arguments, "{\"a\": 2, \"b\": 2}");
}

#[test]
fn test_first_message_uses_first_choice_only() {
    let response = json!({
        "choices": [
            {"message": {"role": "assistant", "content": "first"}},
            {"message": {"role": "assistant", "content": "second"}}
        ]
    });

    let message = first_message(response).unwrap();
    assert_eq!(message.content.as_deref(), Some("first"));
}
