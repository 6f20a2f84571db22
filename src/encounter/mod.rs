pub mod action;
pub mod dice;
pub mod log;
pub mod mechanics;
pub mod resolver;

use serde::Serialize;

use crate::data::{self, PLAYER_MAX_HEALTH, PLAYER_MAX_PRAYER};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Room {
    #[default]
    Idle,
    Maiden,
    Bloat,
    Nylocas,
    Sotetseg,
    Xarpus,
    Verzik,
    Complete,
}

/// Rooms in the order a run visits them; `Complete` is the terminal marker.
pub const ROOM_SEQUENCE: [Room; 7] = [
    Room::Maiden,
    Room::Bloat,
    Room::Nylocas,
    Room::Sotetseg,
    Room::Xarpus,
    Room::Verzik,
    Room::Complete,
];

impl Room {
    pub fn as_str(&self) -> &'static str {
        match self {
            Room::Idle => "IDLE",
            Room::Maiden => "The Maiden of Sugadinti",
            Room::Bloat => "The Pestilent Bloat",
            Room::Nylocas => "Nylocas Vasilias",
            Room::Sotetseg => "Sotetseg",
            Room::Xarpus => "Xarpus",
            Room::Verzik => "Verzik Vitur",
            Room::Complete => "Theatre Complete",
        }
    }

    /// The room after this one. Rooms outside the sequence have no successor.
    pub fn next(self) -> Option<Room> {
        let idx = ROOM_SEQUENCE.iter().position(|room| *room == self)?;
        ROOM_SEQUENCE.get(idx + 1).copied()
    }

    pub fn is_fight(self) -> bool {
        !matches!(self, Room::Idle | Room::Complete)
    }
}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GearSet {
    #[default]
    Melee,
    Range,
    Mage,
}

pub const GEAR_SETS: [GearSet; 3] = [GearSet::Melee, GearSet::Range, GearSet::Mage];

impl GearSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            GearSet::Melee => "MELEE",
            GearSet::Range => "RANGE",
            GearSet::Mage => "MAGE",
        }
    }

    /// Exact, case-insensitive match against the three style names.
    pub fn parse(raw: &str) -> Option<GearSet> {
        GEAR_SETS
            .iter()
            .copied()
            .find(|gear| gear.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl std::fmt::Display for GearSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    pub health: i32,
    pub max_health: i32,
    pub prayer: i32,
    pub max_prayer: i32,
    pub current_gear: GearSet,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            prayer: PLAYER_MAX_PRAYER,
            max_prayer: PLAYER_MAX_PRAYER,
            current_gear: GearSet::default(),
        }
    }
}

impl PlayerStats {
    pub fn clamp(&mut self) {
        self.health = self.health.clamp(0, self.max_health);
        self.prayer = self.prayer.clamp(0, self.max_prayer);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BossStats {
    pub name: Room,
    pub health: i32,
    pub max_health: i32,
}

impl BossStats {
    pub fn for_room(room: Room) -> Self {
        let max_health = data::boss_max_health(room);
        Self {
            name: room,
            health: max_health,
            max_health,
        }
    }

    /// Remaining health as a rounded percentage; zero when the boss has no pool.
    pub fn percent(&self) -> i32 {
        if self.max_health <= 0 {
            return 0;
        }
        ((self.health as f64 / self.max_health as f64) * 100.0).round() as i32
    }

    /// True when health sits strictly below `percent` of the pool.
    pub fn below(&self, percent: i32) -> bool {
        self.health * 100 < self.max_health * percent
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EncounterState {
    pub current_room: Room,
    pub player: PlayerStats,
    pub boss: BossStats,
}

impl Default for EncounterState {
    fn default() -> Self {
        Self::idle()
    }
}

impl EncounterState {
    pub fn idle() -> Self {
        Self {
            current_room: Room::Idle,
            player: PlayerStats::default(),
            boss: BossStats::for_room(Room::Idle),
        }
    }

    /// Fresh player and the first boss of the sequence.
    pub fn new_run() -> Self {
        let first = ROOM_SEQUENCE[0];
        Self {
            current_room: first,
            player: PlayerStats::default(),
            boss: BossStats::for_room(first),
        }
    }

    pub fn enter_room(&mut self, room: Room) {
        self.current_room = room;
        self.boss = BossStats::for_room(room);
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Simulation,
    PluginBridge,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Simulation => "Simulation Mode",
            RunMode::PluginBridge => "Plugin Bridge Mode",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            RunMode::Simulation => RunMode::PluginBridge,
            RunMode::PluginBridge => RunMode::Simulation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_walks_to_complete() {
        let mut room = Room::Maiden;
        let mut visited = vec![room];
        while let Some(next) = room.next() {
            visited.push(next);
            room = next;
        }
        assert_eq!(visited, ROOM_SEQUENCE.to_vec());
        assert_eq!(Room::Complete.next(), None);
        assert_eq!(Room::Idle.next(), None);
    }

    #[test]
    fn defaults_are_idle_melee_simulation() {
        assert_eq!(Room::default(), Room::Idle);
        assert_eq!(GearSet::default(), GearSet::Melee);
        assert_eq!(RunMode::default(), RunMode::Simulation);
        assert_eq!(EncounterState::default(), EncounterState::idle());
    }

    #[test]
    fn gear_parse_is_case_insensitive_and_strict() {
        assert_eq!(GearSet::parse("mage"), Some(GearSet::Mage));
        assert_eq!(GearSet::parse(" RANGE "), Some(GearSet::Range));
        assert_eq!(GearSet::parse("ranged"), None);
    }

    #[test]
    fn new_run_starts_at_maiden_with_full_pools() {
        let state = EncounterState::new_run();
        assert_eq!(state.current_room, Room::Maiden);
        assert_eq!(state.boss.health, 1000);
        assert_eq!(state.player.health, state.player.max_health);
        assert_eq!(state.player.current_gear, GearSet::Melee);
    }

    #[test]
    fn boss_threshold_and_percent() {
        let mut boss = BossStats::for_room(Room::Verzik);
        assert_eq!(boss.max_health, 1500);
        boss.health = 1049;
        assert!(boss.below(70));
        boss.health = 1050;
        assert!(!boss.below(70));
        assert_eq!(boss.percent(), 70);
        assert_eq!(BossStats::for_room(Room::Idle).percent(), 0);
    }

    #[test]
    fn clamp_bounds_both_pools() {
        let mut stats = PlayerStats {
            health: -12,
            prayer: 140,
            ..PlayerStats::default()
        };
        stats.clamp();
        assert_eq!(stats.health, 0);
        assert_eq!(stats.prayer, stats.max_prayer);
    }
}
