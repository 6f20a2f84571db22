use bracket_random::prelude::RandomNumberGenerator;

/// Source of the per-tick randomness the encounter needs.
pub trait Roller {
    /// True with `percent`-in-100 odds.
    fn chance(&mut self, percent: i32) -> bool;
    /// Uniform value in `min..=max`.
    fn between(&mut self, min: i32, max: i32) -> i32;
}

impl Roller for RandomNumberGenerator {
    fn chance(&mut self, percent: i32) -> bool {
        self.range(0, 100) < percent
    }

    fn between(&mut self, min: i32, max: i32) -> i32 {
        self.range(min, max + 1)
    }
}
