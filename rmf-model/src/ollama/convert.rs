//! Wire types for `/api/chat`.

use rmf_core::{CompletionRequest, Turn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<Message<'a>>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Message<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Options {
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}

pub(crate) fn to_chat_request<'a>(model: &'a str, request: &'a CompletionRequest) -> ChatRequest<'a> {
    let mut messages = Vec::with_capacity(request.turns.len() + 1);
    if !request.system.is_empty() {
        messages.push(Message { role: "system", content: &request.system });
    }
    messages.extend(request.turns.iter().map(|turn| match turn {
        Turn::User(text) => Message { role: "user", content: text },
        Turn::Assistant(text) => Message { role: "assistant", content: text },
    }));

    ChatRequest {
        model,
        messages,
        stream: false,
        options: request.temperature.map(|temperature| Options { temperature }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_instruction_leads_the_messages() {
        let request = CompletionRequest::new("Return ONLY the category key.")
            .with_turns([Turn::Assistant("earlier".into())])
            .with_user("Map AC-2 to FedRAMP")
            .with_temperature(0.0);

        let value = serde_json::to_value(to_chat_request("llama3", &request)).unwrap();

        assert_eq!(value["model"], "llama3");
        assert_eq!(value["stream"], false);
        let roles: Vec<&str> =
            value["messages"].as_array().unwrap().iter().map(|m| m["role"].as_str().unwrap()).collect();
        assert_eq!(roles, vec!["system", "assistant", "user"]);
        assert_eq!(value["options"]["temperature"], 0.0);
    }

    #[test]
    fn parses_chat_response() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"model": "llama3", "message": {"role": "assistant", "content": "AUDIT_SPECIALIST"}, "done": true}"#,
        )
        .unwrap();
        assert_eq!(response.message.content, "AUDIT_SPECIALIST");
    }
}
