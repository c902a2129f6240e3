use crate::error::GenerationError;
use serde_json::Value;

/// Extract the reply text from a `generateContent` response: the text parts
/// of the first candidate, concatenated.
pub fn extract_text(response_json: &Value) -> Result<String, GenerationError> {
    let candidates = response_json
        .get("candidates")
        .and_then(|c| c.as_array())
        .filter(|c| !c.is_empty());

    let Some(candidates) = candidates else {
        return Err(match block_reason(response_json) {
            Some(reason) => {
                GenerationError::MalformedResponse(format!("Prompt was blocked: {}", reason))
            }
            None => GenerationError::MalformedResponse("No candidates in response".to_string()),
        });
    };

    let first_candidate = &candidates[0];
    let parts = first_candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| {
            let reason = first_candidate
                .get("finishReason")
                .and_then(|r| r.as_str())
                .unwrap_or("unknown");
            GenerationError::MalformedResponse(format!(
                "Candidate has no content (finish reason: {})",
                reason
            ))
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "Candidate contains no text".to_string(),
        ));
    }

    Ok(text)
}

/// Reason the prompt was rejected before generation, if the response says so.
pub fn block_reason(response_json: &Value) -> Option<String> {
    response_json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
        .map(|s| s.to_string())
}

/// Turn a non-success HTTP response into an error, preferring the message from
/// a `{"error": {"message": ...}}` body.
pub fn api_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                body.trim().to_string()
            }
        });

    GenerationError::Api { status, message }
}
