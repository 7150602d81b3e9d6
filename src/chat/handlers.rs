use axum::{extract::State, Json};
use tracing::instrument;

use crate::chat::dto::{ChatRequest, ChatResponse};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Relay a prompt to the generation service and answer with the complete
/// aggregated text.
#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if payload.prompt.is_empty() {
        return Err(AppError::MissingPrompt);
    }

    let response = state
        .generator
        .generate(&payload.prompt)
        .await
        .map_err(|e| AppError::Generation(format!("{e:#}")))?;

    Ok(Json(ChatResponse { response }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::client::GenerationClient;
    use crate::state::AppState;
    use axum::async_trait;
    use std::sync::Arc;

    struct CannedGenerator(&'static str);

    #[async_trait]
    impl GenerationClient for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl GenerationClient for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("quota exhausted")
        }
    }

    fn state_with(generator: Arc<dyn GenerationClient>) -> AppState {
        let base = AppState::fake();
        AppState::from_parts(base.db, base.config, generator)
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let state = state_with(Arc::new(CannedGenerator("unused")));
        let err = generate(
            State(state),
            Json(ChatRequest {
                prompt: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::MissingPrompt));
    }

    #[tokio::test]
    async fn aggregated_text_is_returned() {
        let state = state_with(Arc::new(CannedGenerator("the sky scatters blue light")));
        let Json(body) = generate(
            State(state),
            Json(ChatRequest {
                prompt: "why is the sky blue".into(),
            }),
        )
        .await
        .expect("generate");
        assert_eq!(body.response, "the sky scatters blue light");
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_a_generation_error() {
        let state = state_with(Arc::new(FailingGenerator));
        let err = generate(
            State(state),
            Json(ChatRequest {
                prompt: "hello".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }
}
