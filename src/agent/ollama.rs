use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::prompt::build_inline_prompt;
use super::{DecisionClient, DecisionFuture, DecisionRequest, parse_action};
use crate::config::DecisionConfig;
use crate::encounter::action::BotAction;
use crate::error::{ConfigError, DecisionError};

/// Client for an Ollama-style `POST /api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    endpoint: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: &'static str,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(cfg: &DecisionConfig) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(cfg.timeout())
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self {
            http,
            endpoint: cfg.endpoint().to_string(),
            model: cfg.model().to_string(),
            temperature: cfg.temperature,
        })
    }

    async fn generate(&self, request: &DecisionRequest) -> Result<BotAction, DecisionError> {
        let body = OllamaRequest {
            model: self.model.clone(),
            prompt: build_inline_prompt(request),
            stream: false,
            format: "json",
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        let res = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<OllamaResponse>()
            .await?;

        tracing::debug!(request = request.id, raw = %res.response, "ollama reply");
        parse_action(&res.response)
    }
}

impl DecisionClient for OllamaClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn decide<'a>(&'a self, request: &'a DecisionRequest) -> DecisionFuture<'a> {
        Box::pin(self.generate(request))
    }
}
