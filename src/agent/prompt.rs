use serde_json::json;

use super::DecisionRequest;
use crate::data::{builtin_briefings, items::starter_supplies};
use crate::encounter::Room;
use crate::encounter::mechanics::SpecialMechanics;

pub const SYSTEM_INSTRUCTION: &str = "You are a world-class Old School RuneScape player controlling a bot to complete the Theatre of Blood. Your response must be a single, optimal action in JSON format based on the game state provided, prioritizing survival and mechanics over damage.";

pub const ACTION_CONTRACT: &str = "Respond with one JSON object and nothing else: {\"action\": \"ATTACK|EAT|PRAY|DODGE|HIDE|SOLVE_MAZE|SWITCH_GEAR|WAIT\", \"target\": string, \"reasoning\": string, \"itemToUse\"?: string, \"gearToSwitch\"?: \"MELEE|RANGE|MAGE\"}.";

/// Short imperative summary of whatever the boss is doing this tick.
pub fn threat_summary(mechanics: &SpecialMechanics) -> String {
    if mechanics.is_quiet() {
        return "None".to_string();
    }
    let mut threats = Vec::new();
    if mechanics.bloat_up {
        threats.push("Bloat is currently active; you must HIDE.".to_string());
    }
    if mechanics.xarpus_staring {
        threats.push("Xarpus is staring; DO NOT ATTACK.".to_string());
    }
    if let Some(style) = mechanics.nylocas_style {
        threats.push(format!(
            "Nylocas are weak to {style}. SWITCH_GEAR if necessary."
        ));
    }
    threats.join(" ")
}

pub fn build_prompt(request: &DecisionRequest) -> String {
    let state = &request.state;
    let player = &state.player;
    let nylo_style = request
        .mechanics
        .nylocas_style
        .map(|gear| gear.as_str())
        .unwrap_or("NONE");

    let guidance = builtin_briefings()
        .into_iter()
        .map(|briefing| {
            if briefing.room == Room::Nylocas {
                format!("- {}: {} ({nylo_style}).", briefing.label, briefing.notes)
            } else {
                format!("- {}: {}", briefing.label, briefing.notes)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let supplies = starter_supplies()
        .iter()
        .map(|item| item.name)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Current Location: Theatre of Blood - {room}.\n\
         Player Status: Health={hp}/{max_hp}, Prayer={pray}/{max_pray}, Current Gear={gear}.\n\
         Boss Status: {boss} at {pct}% health.\n\
         IMMEDIATE THREATS: {threats}\n\
         Supplies: {supplies}.\n\n\
         Analyze the situation and provide the next optimal action. React to immediate threats above all else.\n\
         Your action MUST be appropriate for the current mechanics.\n\
         {guidance}\n",
        room = state.current_room,
        hp = player.health,
        max_hp = player.max_health,
        pray = player.prayer,
        max_pray = player.max_prayer,
        gear = player.current_gear,
        boss = state.boss.name,
        pct = state.boss.percent(),
        threats = threat_summary(&request.mechanics),
    )
}

/// Single-string prompt for backends without a separate system channel.
pub fn build_inline_prompt(request: &DecisionRequest) -> String {
    let state_json = serde_json::to_string_pretty(&json!({
        "state": request.state,
        "special_mechanics": request.mechanics,
    }))
    .unwrap_or_else(|_| "{}".to_string());

    format!(
        "{SYSTEM_INSTRUCTION}\n\n{}\n[STATE_JSON]\n{state_json}\n\n[CONTRACT]\n{ACTION_CONTRACT}\n",
        build_prompt(request)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::{EncounterState, GearSet};

    fn request_in(room: Room, mechanics: SpecialMechanics) -> DecisionRequest {
        let mut state = EncounterState::new_run();
        state.enter_room(room);
        DecisionRequest {
            id: 1,
            state,
            mechanics,
        }
    }

    #[test]
    fn quiet_tick_reports_no_threats() {
        assert_eq!(threat_summary(&SpecialMechanics::default()), "None");
    }

    #[test]
    fn prompt_carries_status_and_threats() {
        let mut request = request_in(
            Room::Nylocas,
            SpecialMechanics {
                nylocas_style: Some(GearSet::Range),
                ..SpecialMechanics::default()
            },
        );
        request.state.boss.health = 455;
        let prompt = build_prompt(&request);
        assert!(prompt.contains("Theatre of Blood - Nylocas Vasilias."));
        assert!(prompt.contains("Health=99/99"));
        assert!(prompt.contains("at 46% health"));
        assert!(prompt.contains("Nylocas are weak to RANGE"));
        assert!(prompt.contains("match their color (RANGE)."));
    }

    #[test]
    fn inline_prompt_embeds_state_json_and_contract() {
        let request = request_in(
            Room::Bloat,
            SpecialMechanics {
                bloat_up: true,
                ..SpecialMechanics::default()
            },
        );
        let prompt = build_inline_prompt(&request);
        assert!(prompt.starts_with(SYSTEM_INSTRUCTION));
        assert!(prompt.contains("\"bloat_up\": true"));
        assert!(prompt.contains("[CONTRACT]"));
    }
}
