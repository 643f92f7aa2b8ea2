//! `/chat/completions` wire types (the subset this crate sends and reads)

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::types::{Completion, Prompt, Usage};

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    /// Plain string, or an array of content parts when images are attached.
    pub content: Value,
}

impl<'a> ChatCompletionRequest<'a> {
    pub fn from_prompt(
        model: &'a str,
        prompt: &Prompt,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = prompt.system.as_deref().filter(|s| !s.is_empty()) {
            messages.push(ChatMessage {
                role: "system",
                content: Value::String(system.to_string()),
            });
        }

        let content = if prompt.images.is_empty() {
            Value::String(prompt.user.clone())
        } else {
            let mut parts = vec![json!({"type": "text", "text": prompt.user})];
            parts.extend(prompt.images.iter().map(|image| {
                json!({"type": "image_url", "image_url": {"url": image.data_url()}})
            }));
            Value::Array(parts)
        };
        messages.push(ChatMessage {
            role: "user",
            content,
        });

        Self {
            model,
            messages,
            temperature,
            max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<UsageBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsageBody {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl From<ChatCompletionResponse> for Completion {
    fn from(response: ChatCompletionResponse) -> Self {
        let (text, finish_reason) = response
            .choices
            .into_iter()
            .next()
            .map(|choice| (choice.message.content.unwrap_or_default(), choice.finish_reason))
            .unwrap_or_default();

        Completion {
            text,
            model: response.model,
            finish_reason,
            usage: response.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImagePart;

    #[test]
    fn test_request_body_text_only() {
        let prompt = Prompt::user("Analyze sample 7").with_system("You are a mycologist.");
        let request = ChatCompletionRequest::from_prompt("gpt-4o-mini", &prompt, Some(0.5), None);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "You are a mycologist."},
                    {"role": "user", "content": "Analyze sample 7"}
                ],
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn test_request_body_with_image() {
        let prompt =
            Prompt::user("Validate this specimen").with_image(ImagePart::from_bytes("image/png", b"ab"));
        let request = ChatCompletionRequest::from_prompt("gpt-4o", &prompt, None, Some(100));
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["max_tokens"], 100);
        let parts = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(parts[0], json!({"type": "text", "text": "Validate this specimen"}));
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,YWI=");
    }

    #[test]
    fn test_response_conversion() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "hi"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
        }))
        .unwrap();
        let completion = Completion::from(response);
        assert_eq!(completion.text, "hi");
        assert_eq!(completion.finish_reason.as_deref(), Some("stop"));
        assert_eq!(completion.usage.unwrap().total_tokens, 4);
    }

    #[test]
    fn test_response_without_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert_eq!(Completion::from(response).text, "");

        let response: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(Completion::from(response), Completion::default());
    }
}
