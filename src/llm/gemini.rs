use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::llm::{GenerationRequest, GenerationResponse, GenerativeBackend};
use crate::schema::Schema;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini REST backend for structured-output generation.
pub struct GeminiBackend {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        GeminiBackend {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Build from the GEMINI_API_KEY environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY is not set".into()))?;
        Ok(Self::new(api_key))
    }
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig<'a> {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: &'a Schema,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let url = format!(
            "{API_BASE}/{}:generateContent?key={}",
            request.model, self.api_key
        );
        let body = ApiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
                temperature: request.temperature,
            },
        };

        let response = self.http.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!(
                "Gemini API request failed with {status}: {detail}"
            )));
        }

        let parsed: ApiResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::Backend("Gemini API returned no candidates".into()))?;

        Ok(GenerationResponse { text })
    }
}
