//! Decision layer: turns an encounter snapshot into the next [`BotAction`].
//!
//! Every backend implements [`DecisionClient`]. Callers never see backend
//! errors directly; [`decide_or_fallback`] folds them into the static WAIT
//! action so a tick always has something to resolve.

pub mod gemini;
pub mod ollama;
pub mod policy;
pub mod prompt;
pub mod replay;
pub mod worker;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::{Backend, DecisionConfig};
use crate::encounter::EncounterState;
use crate::encounter::action::BotAction;
use crate::encounter::mechanics::SpecialMechanics;
use crate::error::{ConfigError, DecisionError};

pub use worker::DecisionWorker;

/// One tick's question to the decision service.
#[derive(Clone, Debug)]
pub struct DecisionRequest {
    pub id: u64,
    pub state: EncounterState,
    pub mechanics: SpecialMechanics,
}

#[derive(Clone, Debug)]
pub struct DecisionReply {
    pub id: u64,
    pub action: BotAction,
    /// Present when `action` is the fallback standing in for a failed call.
    pub failure: Option<String>,
}

impl DecisionReply {
    pub fn fallback(id: u64, failure: impl Into<String>) -> Self {
        Self {
            id,
            action: BotAction::fallback(),
            failure: Some(failure.into()),
        }
    }
}

pub type DecisionFuture<'a> = Pin<Box<dyn Future<Output = Result<BotAction, DecisionError>> + Send + 'a>>;

pub trait DecisionClient: Send + Sync {
    fn name(&self) -> &'static str;

    fn decide<'a>(&'a self, request: &'a DecisionRequest) -> DecisionFuture<'a>;
}

pub async fn decide_or_fallback(client: &dyn DecisionClient, request: &DecisionRequest) -> DecisionReply {
    match client.decide(request).await {
        Ok(action) => DecisionReply {
            id: request.id,
            action,
            failure: None,
        },
        Err(err) => {
            let err = anyhow::Error::from(err);
            tracing::warn!(
                backend = client.name(),
                request = request.id,
                "decision call failed: {err:#}"
            );
            DecisionReply::fallback(request.id, format!("{err:#}"))
        }
    }
}

/// Pulls the first `{` .. last `}` span out of model output, tolerating code
/// fences and chatter around the object, and decodes it as an action.
pub fn parse_action(raw: &str) -> Result<BotAction, DecisionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DecisionError::EmptyResponse);
    }
    let start = trimmed.find('{').ok_or(DecisionError::MissingJson)?;
    let end = trimmed.rfind('}').ok_or(DecisionError::MissingJson)?;
    if end < start {
        return Err(DecisionError::MissingJson);
    }
    serde_json::from_str(&trimmed[start..=end]).map_err(DecisionError::InvalidAction)
}

pub fn build_client(cfg: &DecisionConfig) -> Result<Arc<dyn DecisionClient>, ConfigError> {
    let client: Arc<dyn DecisionClient> = match cfg.backend {
        Backend::Gemini => Arc::new(gemini::GeminiClient::new(cfg)?),
        Backend::Ollama => Arc::new(ollama::OllamaClient::new(cfg)?),
        Backend::Scripted => Arc::new(policy::ScriptedPolicy::default()),
        Backend::Replay => {
            let path = cfg.replay_path.as_deref().ok_or_else(|| {
                ConfigError::Invalid("the replay backend needs decision.replay_path".to_string())
            })?;
            Arc::new(replay::ReplayClient::from_file(path)?)
        }
    };
    tracing::info!(backend = client.name(), model = cfg.model(), "decision backend ready");
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::action::ActionKind;

    struct Broken;

    impl DecisionClient for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn decide<'a>(&'a self, _request: &'a DecisionRequest) -> DecisionFuture<'a> {
            Box::pin(async { Err(DecisionError::EmptyResponse) })
        }
    }

    fn request() -> DecisionRequest {
        DecisionRequest {
            id: 9,
            state: EncounterState::new_run(),
            mechanics: SpecialMechanics::default(),
        }
    }

    #[test]
    fn parse_tolerates_fences_and_prose() {
        let raw = "Sure!\n```json\n{\"action\":\"DODGE\",\"target\":\"Maiden\",\"reasoning\":\"splat\"}\n```";
        let action = parse_action(raw).unwrap();
        assert_eq!(action.kind(), ActionKind::Dodge);
        assert_eq!(action.target, "Maiden");
    }

    #[test]
    fn parse_rejects_non_objects() {
        assert!(matches!(parse_action("   "), Err(DecisionError::EmptyResponse)));
        assert!(matches!(parse_action("ATTACK"), Err(DecisionError::MissingJson)));
        assert!(matches!(parse_action("} oops {"), Err(DecisionError::MissingJson)));
        assert!(matches!(
            parse_action("{\"target\":\"x\"}"),
            Err(DecisionError::InvalidAction(_))
        ));
    }

    #[tokio::test]
    async fn failures_become_the_wait_fallback() {
        let reply = decide_or_fallback(&Broken, &request()).await;
        assert_eq!(reply.id, 9);
        assert_eq!(reply.action, BotAction::fallback());
        assert!(reply.failure.unwrap().contains("no content"));
    }

    #[tokio::test]
    async fn scripted_backend_builds_without_network() {
        let cfg = DecisionConfig {
            backend: Backend::Scripted,
            ..DecisionConfig::default()
        };
        let client = build_client(&cfg).unwrap();
        let reply = decide_or_fallback(client.as_ref(), &request()).await;
        assert!(reply.failure.is_none());
    }
}
