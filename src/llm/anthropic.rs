//! Anthropic LLM provider with native API format.

use async_trait::async_trait;
use reqwest::Client;

use super::error::LLMError;
use super::provider::LLMProvider;
use super::types::{ChatRequest, ChatResponse, Choice, Message, Role, Usage};

/// Anthropic provider with native API format.
pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AnthropicProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";
    const API_VERSION: &'static str = "2023-06-01";

    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError> {
        let url = format!("{}/v1/messages", self.base_url);
        let anthropic_request = to_request(&request);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", Self::API_VERSION)
            .json(&anthropic_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(LLMError::Api { status, message });
        }

        let anthropic_response: Response = response.json().await?;
        Ok(from_response(anthropic_response))
    }
}

// --- Anthropic format types and conversions ---

#[derive(serde::Serialize)]
struct Request {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<RequestMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(serde::Serialize)]
struct RequestMessage {
    role: String,
    content: String,
}

#[derive(serde::Deserialize)]
struct Response {
    id: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<ResponseUsage>,
}

#[derive(serde::Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: String,
}

#[derive(serde::Deserialize)]
struct ResponseUsage {
    input_tokens: u32,
    output_tokens: u32,
}

fn to_request(request: &ChatRequest) -> Request {
    let mut system = None;
    let mut messages = Vec::new();

    for msg in &request.messages {
        match msg.role {
            // Anthropic wants system as a separate field
            Role::System => system = Some(msg.content.clone()),
            Role::User => messages.push(RequestMessage {
                role: "user".to_string(),
                content: msg.content.clone(),
            }),
            Role::Assistant => messages.push(RequestMessage {
                role: "assistant".to_string(),
                content: msg.content.clone(),
            }),
        }
    }

    Request {
        model: request.model.clone(),
        max_tokens: request.max_tokens.unwrap_or(4096),
        system,
        messages,
        temperature: request.temperature,
    }
}

fn from_response(response: Response) -> ChatResponse {
    let content = response
        .content
        .into_iter()
        .filter(|c| c.content_type == "text")
        .map(|c| c.text)
        .collect::<Vec<_>>()
        .join("");

    ChatResponse {
        id: response.id,
        choices: vec![Choice {
            index: 0,
            message: Message {
                role: Role::Assistant,
                content,
            },
            finish_reason: response.stop_reason,
        }],
        usage: response.usage.map(|u| Usage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_message_moves_to_system_field() {
        let request = ChatRequest {
            model: "claude-sonnet-4-5".to_string(),
            messages: vec![
                Message::system("You are a travel planning assistant."),
                Message::user("Plan a weekend in Kyoto."),
                Message::assistant("Sure, here is a draft."),
            ],
            temperature: Some(0.7),
            max_tokens: None,
        };

        let converted = to_request(&request);
        assert_eq!(
            converted.system.as_deref(),
            Some("You are a travel planning assistant.")
        );
        assert_eq!(converted.messages.len(), 2);
        assert_eq!(converted.messages[0].role, "user");
        assert_eq!(converted.messages[1].role, "assistant");
        assert_eq!(converted.max_tokens, 4096);
    }

    #[test]
    fn response_maps_back_to_common_shape() {
        let response = Response {
            id: "msg_01".to_string(),
            content: vec![
                ContentBlock {
                    content_type: "text".to_string(),
                    text: "Day 1: ".to_string(),
                },
                ContentBlock {
                    content_type: "text".to_string(),
                    text: "Fushimi Inari.".to_string(),
                },
            ],
            stop_reason: Some("end_turn".to_string()),
            usage: Some(ResponseUsage {
                input_tokens: 20,
                output_tokens: 7,
            }),
        };

        let converted = from_response(response);
        assert_eq!(converted.reply(), Some("Day 1: Fushimi Inari."));
        assert_eq!(converted.choices[0].message.role, Role::Assistant);
        assert_eq!(converted.usage.unwrap().total_tokens, 27);
    }
}
