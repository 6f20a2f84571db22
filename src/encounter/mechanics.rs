use serde::Serialize;

use super::dice::Roller;
use super::{GEAR_SETS, GearSet, Room};

const BLOAT_UP_CHANCE: i32 = 60;
const XARPUS_STARE_CHANCE: i32 = 50;

/// Boss behaviour rolled at the start of a tick, before the decision call, so
/// the decision service can react to it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SpecialMechanics {
    pub bloat_up: bool,
    pub xarpus_staring: bool,
    pub nylocas_style: Option<GearSet>,
}

impl SpecialMechanics {
    pub fn roll<R: Roller>(room: Room, rng: &mut R) -> Self {
        match room {
            Room::Bloat => Self {
                bloat_up: rng.chance(BLOAT_UP_CHANCE),
                ..Self::default()
            },
            Room::Xarpus => Self {
                xarpus_staring: rng.chance(XARPUS_STARE_CHANCE),
                ..Self::default()
            },
            Room::Nylocas => {
                let idx = rng.between(0, GEAR_SETS.len() as i32 - 1) as usize;
                Self {
                    nylocas_style: Some(GEAR_SETS[idx]),
                    ..Self::default()
                }
            }
            _ => Self::default(),
        }
    }

    pub fn is_quiet(&self) -> bool {
        !self.bloat_up && !self.xarpus_staring && self.nylocas_style.is_none()
    }
}
