pub mod items;

use crate::encounter::Room;

pub const PLAYER_MAX_HEALTH: i32 = 99;
pub const PLAYER_MAX_PRAYER: i32 = 99;

#[derive(Clone, Debug)]
pub struct RoomBriefing {
    pub room: Room,
    pub label: &'static str,
    pub notes: &'static str,
}

pub fn boss_max_health(room: Room) -> i32 {
    match room {
        Room::Idle | Room::Complete => 0,
        Room::Verzik => 1500,
        Room::Maiden | Room::Bloat | Room::Nylocas | Room::Sotetseg | Room::Xarpus => 1000,
    }
}

/// Per-room guidance handed to the decision service with every request.
pub fn builtin_briefings() -> Vec<RoomBriefing> {
    vec![
        RoomBriefing {
            room: Room::Maiden,
            label: "Maiden",
            notes: "Dodge blood splats.",
        },
        RoomBriefing {
            room: Room::Bloat,
            label: "Bloat",
            notes: "HIDE when he is up, ATTACK when he is down.",
        },
        RoomBriefing {
            room: Room::Nylocas,
            label: "Nylocas",
            notes: "Use 'SWITCH_GEAR' to match their color",
        },
        RoomBriefing {
            room: Room::Sotetseg,
            label: "Sotetseg",
            notes: "DODGE the big red ball. SOLVE_MAZE if teleported.",
        },
        RoomBriefing {
            room: Room::Xarpus,
            label: "Xarpus",
            notes: "DODGE poison. DO NOT ATTACK while he is staring.",
        },
        RoomBriefing {
            room: Room::Verzik,
            label: "Verzik",
            notes: "DODGE purple tornados.",
        },
    ]
}
