use gemchat::api::response::{api_error, block_reason, extract_text};
use gemchat::error::GenerationError;
use serde_json::json;

#[test]
fn test_extract_text_from_first_candidate() {
    let response = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": "Hello, "}, {"text": "world!"}]
            },
            "finishReason": "STOP"
        }, {
            "content": {"role": "model", "parts": [{"text": "ignored"}]}
        }]
    });

    assert_eq!(extract_text(&response).unwrap(), "Hello, world!");
}

#[test]
fn test_extract_text_without_candidates() {
    let response = json!({"candidates": []});

    let result = extract_text(&response);
    assert!(matches!(result, Err(GenerationError::MalformedResponse(_))));
}

#[test]
fn test_extract_text_reports_block_reason() {
    let response = json!({
        "promptFeedback": {"blockReason": "SAFETY"}
    });

    assert_eq!(block_reason(&response), Some("SAFETY".to_string()));
    let err = extract_text(&response).unwrap_err();
    assert!(err.to_string().contains("SAFETY"));
}

#[test]
fn test_extract_text_candidate_without_content() {
    let response = json!({
        "candidates": [{"finishReason": "MAX_TOKENS"}]
    });

    let err = extract_text(&response).unwrap_err();
    assert!(err.to_string().contains("MAX_TOKENS"));
}

#[test]
fn test_api_error_uses_error_message() {
    let body = json!({
        "error": {
            "code": 429,
            "message": "Resource has been exhausted (e.g. check quota).",
            "status": "RESOURCE_EXHAUSTED"
        }
    })
    .to_string();

    match api_error(429, &body) {
        GenerationError::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Resource has been exhausted (e.g. check quota).");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_api_error_with_plain_body() {
    let err = api_error(502, "Bad Gateway");
    assert_eq!(err.to_string(), "API error (status 502): Bad Gateway");

    let err = api_error(500, "");
    assert_eq!(err.to_string(), "API error (status 500): Unknown error");
}
