use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single decision call. Every one of these is absorbed by the
/// fallback action; none of them stops the run.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("decision request failed")]
    Http(#[from] reqwest::Error),

    #[error("decision service returned no content")]
    EmptyResponse,

    #[error("no JSON object in decision response")]
    MissingJson,

    #[error("decision response is not a valid action")]
    InvalidAction(#[source] serde_json::Error),

    #[error("action script exhausted after {0} actions")]
    ScriptExhausted(usize),

    #[error("decision worker has stopped")]
    WorkerStopped,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load action script {path}")]
    ReadScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}
