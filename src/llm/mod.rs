pub mod gemini;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{Error, GenerationContext, Result};
use crate::schema::Schema;

/// One structured-output request to the generative backend.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub response_schema: Schema,
    pub temperature: Option<f32>,
}

/// Raw backend response. `text` is expected to contain JSON matching the
/// request's schema.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    pub text: String,
}

/// Opaque generative backend. Implementations own the transport; they never
/// touch application state.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;
}

/// Run one generation call and parse the response into `T`.
///
/// A single attempt, no retry: a transport failure surfaces as
/// `GenerationFailed`, and a successful call whose text does not parse as the
/// expected JSON surfaces as `MalformedResponse`.
pub async fn generate<T: DeserializeOwned>(
    backend: &dyn GenerativeBackend,
    request: &GenerationRequest,
    context: GenerationContext,
) -> Result<T> {
    let response = backend
        .generate(request)
        .await
        .map_err(|e| Error::GenerationFailed {
            context,
            message: e.to_string(),
        })?;

    let text = response.text.trim();
    let json_str = strip_code_fences(text);
    serde_json::from_str(json_str).map_err(|e| Error::MalformedResponse {
        context,
        message: e.to_string(),
    })
}

/// Strip markdown code fences some models wrap around JSON output.
pub fn strip_code_fences(s: &str) -> &str {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        rest.strip_suffix("```").unwrap_or(rest).trim()
    } else if let Some(rest) = s.strip_prefix("```") {
        rest.strip_suffix("```").unwrap_or(rest).trim()
    } else {
        s
    }
}
