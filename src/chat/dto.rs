use serde::{Deserialize, Serialize};

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Single-turn prompt. An absent field and an empty string are treated
    /// the same way.
    #[serde(default)]
    pub prompt: String,
}

/// Fully aggregated model output.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_prompt_parses_as_empty() {
        let req: ChatRequest = serde_json::from_str("{}").expect("parse");
        assert!(req.prompt.is_empty());
    }

    #[test]
    fn prompt_round_trips() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"prompt":"why is the sky blue"}"#).expect("parse");
        assert_eq!(req.prompt, "why is the sky blue");
    }

    #[test]
    fn response_shape() {
        let body = ChatResponse {
            response: "scattering".into(),
        };
        let json = serde_json::to_string(&body).expect("serialize");
        assert_eq!(json, r#"{"response":"scattering"}"#);
    }
}
