//! Wire types for `generateContent` and conversion from [`CompletionRequest`].

use rmf_core::{CompletionRequest, Turn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerationConfig {
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Content,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content { role: role.map(str::to_string), parts: vec![Part { text: text.to_string() }] }
}

pub(crate) fn to_gemini_request(request: &CompletionRequest) -> GenerateContentRequest {
    let system_instruction =
        (!request.system.is_empty()).then(|| text_content(None, &request.system));

    let contents = request
        .turns
        .iter()
        .map(|turn| match turn {
            Turn::User(text) => text_content(Some("user"), text),
            Turn::Assistant(text) => text_content(Some("model"), text),
        })
        .collect();

    GenerateContentRequest {
        system_instruction,
        contents,
        generation_config: request.temperature.map(|temperature| GenerationConfig { temperature }),
    }
}

impl GenerateContentResponse {
    /// Text of the first candidate, or a reason why there is none.
    pub(crate) fn into_text(self) -> Result<String, String> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(reason);
        };

        let text: String = candidate.content.parts.into_iter().map(|p| p.text).collect();
        if text.is_empty() {
            return Err(format!(
                "empty response (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_turns_use_the_model_role() {
        let request = CompletionRequest::new("Be concise.")
            .with_turns([Turn::User("hi".into()), Turn::Assistant("hello".into())])
            .with_user("What is AC-2?")
            .with_temperature(0.2);

        let value = serde_json::to_value(to_gemini_request(&request)).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "Be concise.");
        let roles: Vec<&str> =
            value["contents"].as_array().unwrap().iter().map(|c| c["role"].as_str().unwrap()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(value["contents"][2]["parts"][0]["text"], "What is AC-2?");
        assert!((value["generationConfig"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn temperature_is_omitted_when_unset() {
        let value =
            serde_json::to_value(to_gemini_request(&CompletionRequest::new("").with_user("q")))
                .unwrap();
        assert!(value.get("generationConfig").is_none());
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn candidate_parts_are_joined() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "**AC-2** "}, {"text": "covers accounts."}]}, "finishReason": "STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "**AC-2** covers accounts.");
    }

    #[test]
    fn blocked_prompt_reports_the_reason() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert_eq!(response.into_text().unwrap_err(), "SAFETY");
    }
}
