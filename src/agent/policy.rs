use super::{DecisionClient, DecisionFuture, DecisionRequest};
use crate::encounter::action::BotAction;
use crate::encounter::mechanics::SpecialMechanics;
use crate::encounter::{EncounterState, Room};

/// Offline rule-based player. It reacts to the rolled mechanics the same way
/// the room briefings tell a model to, and keeps its pools topped up.
#[derive(Clone, Debug)]
pub struct ScriptedPolicy {
    pub eat_below: i32,
    pub brew_below: i32,
    pub restore_below: i32,
}

impl Default for ScriptedPolicy {
    fn default() -> Self {
        Self {
            eat_below: 50,
            brew_below: 30,
            restore_below: 25,
        }
    }
}

impl ScriptedPolicy {
    pub fn choose(&self, state: &EncounterState, mechanics: &SpecialMechanics) -> BotAction {
        let player = &state.player;
        let boss = state.boss.name.as_str();

        if mechanics.bloat_up {
            return BotAction::new("HIDE", "Pillar", "Bloat is up; flies incoming.");
        }
        if player.health < self.brew_below {
            return BotAction::new("EAT", "Self", "Health critical.").with_item("Saradomin Brew");
        }
        if let Some(style) = mechanics.nylocas_style {
            if player.current_gear != style {
                return BotAction::new("SWITCH_GEAR", "Self", "Match the Nylocas weakness.")
                    .with_gear(style);
            }
        }
        if player.health < self.eat_below {
            return BotAction::new("EAT", "Self", "Health low.").with_item("Shark");
        }
        if player.prayer < self.restore_below {
            return BotAction::new("PRAY", "Self", "Prayer running dry.").with_item("Super Restore");
        }
        if mechanics.xarpus_staring {
            return BotAction::new("DODGE", boss, "Xarpus is staring; never attack now.");
        }
        match state.current_room {
            Room::Idle | Room::Complete => BotAction::new("WAIT", "Self", "Nothing to fight."),
            _ => BotAction::new("ATTACK", boss, "No threat this tick."),
        }
    }
}

impl DecisionClient for ScriptedPolicy {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn decide<'a>(&'a self, request: &'a DecisionRequest) -> DecisionFuture<'a> {
        let action = self.choose(&request.state, &request.mechanics);
        Box::pin(async move { Ok(action) })
    }
}
