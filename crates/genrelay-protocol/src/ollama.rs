//! Ollama's native `/api/generate` wire shapes. A single response object and
//! a single stream line share the same layout, so one type covers both.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub stream: bool,
}

/// One native generate response, or one line of a native stream. Token
/// counts only appear on the final object of a stream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_max_tokens() {
        let request = GenerateRequest {
            model: "llama3".to_string(),
            prompt: "hi".to_string(),
            temperature: 0.7,
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("max_tokens").is_none());
        assert!(value.get("messages").is_none());
        assert_eq!(value["prompt"], "hi");
    }

    #[test]
    fn response_fields_are_optional() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(parsed.response.is_none());
        assert_eq!(parsed.done, Some(true));

        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"response":"Hi","prompt_eval_count":3,"eval_count":5}"#)
                .unwrap();
        assert_eq!(parsed.response.as_deref(), Some("Hi"));
        assert_eq!(parsed.prompt_eval_count, Some(3));
        assert_eq!(parsed.eval_count, Some(5));
    }
}
