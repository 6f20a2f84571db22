use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::session::LoopTiming;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://127.0.0.1:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Gemini,
    Ollama,
    Scripted,
    Replay,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fixed RNG seed; unset means a fresh seed per launch.
    pub seed: Option<u64>,
    pub decision: DecisionConfig,
    pub timing: TimingConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub backend: Backend,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_ms: u64,
    pub replay_path: Option<PathBuf>,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            model: None,
            endpoint: None,
            api_key_env: "API_KEY".to_string(),
            temperature: 0.7,
            timeout_ms: 20_000,
            replay_path: None,
        }
    }
}

impl DecisionConfig {
    pub fn model(&self) -> &str {
        match (&self.model, self.backend) {
            (Some(model), _) => model.as_str(),
            (None, Backend::Ollama) => DEFAULT_OLLAMA_MODEL,
            (None, _) => DEFAULT_GEMINI_MODEL,
        }
    }

    pub fn endpoint(&self) -> &str {
        match (&self.endpoint, self.backend) {
            (Some(endpoint), _) => endpoint.as_str(),
            (None, Backend::Ollama) => DEFAULT_OLLAMA_ENDPOINT,
            (None, _) => DEFAULT_GEMINI_ENDPOINT,
        }
    }

    /// The configured variable first, then the conventional Gemini name.
    pub fn api_key(&self) -> Option<String> {
        [self.api_key_env.as_str(), "GEMINI_API_KEY"]
            .into_iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub start_delay_ms: u64,
    pub tick_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 1_000,
            tick_delay_ms: 3_000,
        }
    }
}

impl TimingConfig {
    pub fn loop_timing(&self) -> LoopTiming {
        LoopTiming {
            start_delay: Duration::from_millis(self.start_delay_ms),
            tick_delay: Duration::from_millis(self.tick_delay_ms),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let decision = &self.decision;
        if decision.backend == Backend::Replay && decision.replay_path.is_none() {
            return Err(ConfigError::Invalid(
                "the replay backend needs decision.replay_path".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&decision.temperature) {
            return Err(ConfigError::Invalid(format!(
                "decision.temperature {} is outside 0.0..=2.0",
                decision.temperature
            )));
        }
        if decision.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "decision.timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
