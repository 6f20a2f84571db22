use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::prompt::{SYSTEM_INSTRUCTION, build_prompt};
use super::{DecisionClient, DecisionFuture, DecisionRequest, parse_action};
use crate::config::DecisionConfig;
use crate::encounter::action::BotAction;
use crate::error::{ConfigError, DecisionError};

/// Client for a Gemini-style `models/{model}:generateContent` endpoint with a
/// JSON response schema.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    url: String,
    api_key: Option<String>,
    api_key_env: String,
    temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl Content {
    fn text(role: Option<&str>, text: String) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text }],
        }
    }
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .map(|part| part.text)
            .find(|text| !text.trim().is_empty())
    }
}

pub fn action_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "action": {
                "type": "STRING",
                "description": "The primary action to take (e.g., ATTACK, EAT, DODGE, SWITCH_GEAR, HIDE, SOLVE_MAZE)."
            },
            "target": {
                "type": "STRING",
                "description": "The target of the action (e.g., \"Sotetseg\", \"Nylocas\", \"Self\")."
            },
            "itemToUse": {
                "type": "STRING",
                "description": "Optional: The item to use for the action (e.g., \"Saradomin Brew\", \"Super Restore\")."
            },
            "gearToSwitch": {
                "type": "STRING",
                "description": "Optional: The gear set to switch to. Use when action is SWITCH_GEAR.",
                "enum": ["MELEE", "RANGE", "MAGE"]
            },
            "reasoning": {
                "type": "STRING",
                "description": "A brief explanation for why this action was chosen."
            }
        },
        "required": ["action", "target", "reasoning"]
    })
}

impl GeminiClient {
    pub fn new(cfg: &DecisionConfig) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(cfg.timeout())
            .build()
            .map_err(ConfigError::HttpClient)?;
        let api_key = cfg.api_key();
        if api_key.is_none() {
            tracing::warn!(
                env = %cfg.api_key_env,
                "no API key set; every decision will fall back to WAIT"
            );
        }
        Ok(Self {
            http,
            url: format!(
                "{}/{}:generateContent",
                cfg.endpoint().trim_end_matches('/'),
                cfg.model()
            ),
            api_key,
            api_key_env: cfg.api_key_env.clone(),
            temperature: cfg.temperature,
        })
    }

    fn request_body(&self, request: &DecisionRequest) -> GenerateRequest {
        GenerateRequest {
            system_instruction: Content::text(None, SYSTEM_INSTRUCTION.to_string()),
            contents: vec![Content::text(Some("user"), build_prompt(request))],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: action_schema(),
                temperature: self.temperature,
            },
        }
    }

    async fn generate(&self, request: &DecisionRequest) -> Result<BotAction, DecisionError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DecisionError::MissingApiKey(self.api_key_env.clone()))?;

        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", key)
            .json(&self.request_body(request))
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        let text = response.first_text().ok_or(DecisionError::EmptyResponse)?;
        tracing::debug!(request = request.id, raw = %text, "gemini reply");
        parse_action(&text)
    }
}

impl DecisionClient for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn decide<'a>(&'a self, request: &'a DecisionRequest) -> DecisionFuture<'a> {
        Box::pin(self.generate(request))
    }
}
