#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Restores {
    Health,
    Prayer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumableTemplate {
    pub name: &'static str,
    pub restores: Restores,
    pub amount: i32,
    /// Lower-case fragment that identifies this item in free-text item names.
    pub keyword: &'static str,
}

pub const DEFAULT_FOOD: &str = "Shark";
pub const DEFAULT_PRAYER_DOSE: &str = "Prayer Potion";

const SHARK: ConsumableTemplate = ConsumableTemplate::new(DEFAULT_FOOD, Restores::Health, 22, "shark");
const SARADOMIN_BREW: ConsumableTemplate =
    ConsumableTemplate::new("Saradomin Brew", Restores::Health, 16, "brew");
const PRAYER_POTION: ConsumableTemplate =
    ConsumableTemplate::new(DEFAULT_PRAYER_DOSE, Restores::Prayer, 10, "prayer");
const SUPER_RESTORE: ConsumableTemplate =
    ConsumableTemplate::new("Super Restore", Restores::Prayer, 25, "restore");

impl ConsumableTemplate {
    pub const fn new(
        name: &'static str,
        restores: Restores,
        amount: i32,
        keyword: &'static str,
    ) -> Self {
        Self {
            name,
            restores,
            amount,
            keyword,
        }
    }

    fn matches(&self, item: Option<&str>) -> bool {
        item.is_some_and(|name| name.to_ascii_lowercase().contains(self.keyword))
    }
}

/// Anything that is not a brew eats like a shark.
pub fn food_for(item: Option<&str>) -> ConsumableTemplate {
    if SARADOMIN_BREW.matches(item) {
        SARADOMIN_BREW
    } else {
        SHARK
    }
}

/// Anything that is not a restore sips like a prayer potion.
pub fn prayer_dose_for(item: Option<&str>) -> ConsumableTemplate {
    if SUPER_RESTORE.matches(item) {
        SUPER_RESTORE
    } else {
        PRAYER_POTION
    }
}

pub fn starter_supplies() -> Vec<ConsumableTemplate> {
    vec![SHARK, SARADOMIN_BREW, PRAYER_POTION, SUPER_RESTORE]
}
