use anyhow::Result;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;

const MODELS_ENDPOINT: &str = "/v1beta/models/";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base: Url,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()?,
            base: Url::parse(&config.gemini_api_url)?,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        })
    }

    /// Sends `prompt` and asks for a JSON reply matching `response_schema`.
    /// Returns the raw text of the first candidate.
    pub async fn generate_json(&self, prompt: &str, response_schema: Value) -> Result<String> {
        let url = self.base.join(&format!(
            "{}{}:generateContent",
            MODELS_ENDPOINT, self.model
        ))?;

        let json_body = build_request_body(prompt, response_schema)?;

        tracing::debug!(model = %self.model, "gemini.generate.request");

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .body(json_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Gemini request failed with status {}: {}",
                status,
                error_message(&body)
            ));
        }

        tracing::debug!(model = %self.model, response_body = %body, "gemini.generate.response");

        extract_text(&body)
    }
}

fn build_request_body(prompt: &str, response_schema: Value) -> Result<String> {
    let request = GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema,
        },
    };

    Ok(serde_json::to_string(&request)?)
}

fn extract_text(body: &str) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| anyhow::anyhow!("Failed to parse Gemini response: {}", e))?;

    if let Some(error) = response.error {
        return Err(anyhow::anyhow!("Gemini API error: {}", error.message));
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(anyhow::anyhow!("Gemini response contained no text"));
    }

    Ok(text)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<GenerateContentResponse>(body)
        .ok()
        .and_then(|response| response.error)
        .map_or_else(|| body.to_string(), |error| error.message)
}
