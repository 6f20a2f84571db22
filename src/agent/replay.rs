use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
    sync::Mutex,
};

use super::{DecisionClient, DecisionFuture, DecisionRequest};
use crate::encounter::GearSet;
use crate::encounter::action::{ActionKind, BotAction};
use crate::error::{ConfigError, DecisionError};

/// A fixed list of actions read from a text file, one per line:
///
/// ```text
/// # comment
/// ATTACK
/// SWITCH_GEAR MAGE
/// EAT Saradomin Brew
/// ```
///
/// The first word is the action; the rest is the gear for `SWITCH_GEAR` and
/// the item for everything else.
pub struct ScriptedActions {
    script_actions: Vec<BotAction>,
    current_action_index: usize,
}

impl ScriptedActions {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut script_actions = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }
            match line_to_action(trimmed_line) {
                Some(action) => script_actions.push(action),
                None => tracing::warn!(line = line_no + 1, "unreadable script line: {trimmed_line}"),
            }
        }

        Ok(Self {
            script_actions,
            current_action_index: 0,
        })
    }

    pub fn next_action(&mut self) -> Option<BotAction> {
        let action = self.script_actions.get(self.current_action_index)?.clone();
        self.current_action_index += 1;
        Some(action)
    }

    pub fn len(&self) -> usize {
        self.script_actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script_actions.is_empty()
    }
}

fn line_to_action(line: &str) -> Option<BotAction> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let verb = parts.next()?.trim();
    let rest = parts.next().map(str::trim).filter(|rest| !rest.is_empty());
    let action = BotAction::new(verb, "Boss", "Replayed from script.");
    match (action.kind(), rest) {
        (ActionKind::SwitchGear, Some(gear)) => Some(action.with_gear(GearSet::parse(gear)?)),
        (ActionKind::SwitchGear, None) => None,
        (_, Some(item)) => Some(action.with_item(item)),
        (_, None) => Some(action),
    }
}

pub struct ReplayClient {
    actions: Mutex<ScriptedActions>,
}

impl ReplayClient {
    pub fn new(actions: ScriptedActions) -> Self {
        Self {
            actions: Mutex::new(actions),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let actions = ScriptedActions::from_file(path).map_err(|source| ConfigError::ReadScript {
            path: path.to_path_buf(),
            source,
        })?;
        if actions.is_empty() {
            tracing::warn!(path = %path.display(), "action script is empty; every decision will fall back to WAIT");
        } else {
            tracing::info!(path = %path.display(), actions = actions.len(), "loaded action script");
        }
        Ok(Self::new(actions))
    }

    fn next(&self) -> Result<BotAction, DecisionError> {
        let mut actions = self
            .actions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let total = actions.len();
        actions.next_action().ok_or(DecisionError::ScriptExhausted(total))
    }
}

impl DecisionClient for ReplayClient {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn decide<'a>(&'a self, _request: &'a DecisionRequest) -> DecisionFuture<'a> {
        let next = self.next();
        Box::pin(async move { next })
    }
}
