use anyhow::Context;
use axum::async_trait;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;

/// Upstream text-generation service behind the chat proxy.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Run a single-turn prompt and return the complete generated text.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Client for the Generative Language REST API. It calls the streaming
/// endpoint and folds every fragment into one string before returning, so
/// callers never see partial output.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(cfg: &GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig<'a> {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "text/plain",
            },
        };

        let response = self
            .http
            .post(&url)
            .query(&[("alt", "sse"), ("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("send request to generation service")?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "generation service returned {status}");

        // The endpoint answers with server-sent events. Collect the raw
        // body first, then walk its data lines.
        let mut raw = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("read generation stream")?;
            raw.extend_from_slice(&chunk);
        }

        let raw = std::str::from_utf8(&raw).context("generation stream is not UTF-8")?;
        aggregate_sse(raw)
    }
}

/// Concatenate the text fragments of an SSE event stream in arrival order.
fn aggregate_sse(raw: &str) -> anyhow::Result<String> {
    let mut output = String::new();
    for line in raw.lines() {
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        if data.is_empty() || data == "[DONE]" {
            continue;
        }
        let chunk: StreamChunk =
            serde_json::from_str(data).context("malformed generation stream event")?;
        for candidate in chunk.candidates {
            let Some(content) = candidate.content else {
                continue;
            };
            for part in content.parts {
                if let Some(text) = part.text {
                    output.push_str(&text);
                }
            }
        }
    }
    Ok(output)
}
