use serde::{Deserialize, Serialize};

use super::GearSet;

/// An action as produced by the decision service. Every field is free text;
/// interpretation happens through [`BotAction::kind`] and friends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotAction {
    pub action: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_to_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gear_to_switch: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Attack,
    Eat,
    Pray,
    SwitchGear,
    Dodge,
    Hide,
    SolveMaze,
    Other(String),
}

impl BotAction {
    pub fn new(action: &str, target: &str, reasoning: &str) -> Self {
        Self {
            action: action.to_string(),
            target: target.to_string(),
            reasoning: reasoning.to_string(),
            item_to_use: None,
            gear_to_switch: None,
        }
    }

    pub fn with_item(mut self, item: &str) -> Self {
        self.item_to_use = Some(item.to_string());
        self
    }

    pub fn with_gear(mut self, gear: GearSet) -> Self {
        self.gear_to_switch = Some(gear.as_str().to_string());
        self
    }

    /// Substituted whenever the decision service cannot produce an action.
    pub fn fallback() -> Self {
        Self::new(
            "WAIT",
            "Self",
            "AI decision system failed. Waiting for recovery.",
        )
    }

    pub fn kind(&self) -> ActionKind {
        let upper = self.action.trim().to_ascii_uppercase();
        match upper.as_str() {
            "ATTACK" => ActionKind::Attack,
            "EAT" => ActionKind::Eat,
            "PRAY" => ActionKind::Pray,
            "SWITCH_GEAR" => ActionKind::SwitchGear,
            "DODGE" => ActionKind::Dodge,
            "HIDE" => ActionKind::Hide,
            "SOLVE_MAZE" => ActionKind::SolveMaze,
            _ => ActionKind::Other(upper),
        }
    }

    pub fn requested_gear(&self) -> Option<GearSet> {
        self.gear_to_switch.as_deref().and_then(GearSet::parse)
    }
}
