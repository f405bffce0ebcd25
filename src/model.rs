pub(crate) const METER_MAX: i32 = 100;
pub(crate) const NAME_MAX: usize = 18;
pub(crate) const DEFAULT_NAME: &str = "Nameless";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Adopt,
    Main,
    Rename,
    Help,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FoodKind {
    Choco,
    Cookie,
    Cake,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct FoodStats {
    pub(crate) label: &'static str,
    pub(crate) glyph: char,
    pub(crate) health_effect: i32,
    pub(crate) happiness_effect: i32,
    pub(crate) experience_points: u32,
}

impl FoodKind {
    pub(crate) const DEFAULT: FoodKind = FoodKind::Choco;

    /// The regular menu; the cake is unlocked separately.
    pub(crate) const MENU: [FoodKind; 2] = [FoodKind::Choco, FoodKind::Cookie];

    pub(crate) fn stats(self) -> FoodStats {
        match self {
            FoodKind::Choco => FoodStats {
                label: "Choco",
                glyph: 'c',
                health_effect: 5,
                happiness_effect: 0,
                experience_points: 20,
            },
            FoodKind::Cookie => FoodStats {
                label: "Cookie",
                glyph: 'o',
                health_effect: 3,
                happiness_effect: 0,
                experience_points: 10,
            },
            FoodKind::Cake => FoodStats {
                label: "Cake",
                glyph: '@',
                health_effect: 20,
                happiness_effect: 20,
                experience_points: 100,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mood {
    Content,
    Neutral,
    Distressed,
    Expired,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Pet {
    pub(crate) name: String,
    pub(crate) health: i32,
    pub(crate) happiness: i32,
    pub(crate) level: u32,
    pub(crate) experience: u32,
    pub(crate) game_over: bool,
    pub(crate) selected_food: FoodKind,
}

impl Pet {
    pub(crate) fn adopt(name: &str, rules: &Rules) -> Self {
        let trimmed = name.trim();
        Self {
            name: if trimmed.is_empty() {
                DEFAULT_NAME.to_string()
            } else {
                trimmed.to_string()
            },
            health: rules.start_health,
            happiness: rules.start_happiness,
            level: 1,
            experience: 0,
            game_over: false,
            selected_food: FoodKind::DEFAULT,
        }
    }

    pub(crate) fn mood(&self) -> Mood {
        if self.game_over {
            return Mood::Expired;
        }
        if self.health < 30 {
            return Mood::Distressed;
        }
        if self.health > 70 {
            return Mood::Content;
        }
        Mood::Neutral
    }

    /// Lively pets pick new wander targets twice as often.
    pub(crate) fn vitality(&self) -> bool {
        self.health > 50 && self.happiness > 50
    }

    pub(crate) fn sprite_scale(&self) -> f32 {
        1.0 + 0.15 * (self.level.saturating_sub(1) as f32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingFeed {
    pub(crate) food: FoodKind,
    pub(crate) ticks_left: u64,
}

/// One ruleset covering both variants of the game: the differences
/// (starting stats, immediate vs delayed game-over, cake availability)
/// are plain fields rather than separate code paths.
#[derive(Clone, Debug)]
pub(crate) struct Rules {
    pub(crate) tick_step_ms: u64,
    pub(crate) decay_interval_ms: u64,
    /// None means game-over the moment health touches zero.
    pub(crate) grace_delay_ms: Option<u64>,
    pub(crate) feed_delay_ms: u64,
    pub(crate) level_threshold: u32,
    pub(crate) start_health: i32,
    pub(crate) start_happiness: i32,
    pub(crate) pat_happiness: i32,
    pub(crate) pat_experience: u32,
    pub(crate) special_cake: bool,
    pub(crate) cake_unlock_happiness: i32,
    pub(crate) wander_fast_ms: u64,
    pub(crate) wander_slow_ms: u64,
}

impl Rules {
    pub(crate) fn standard() -> Self {
        Self {
            tick_step_ms: 250,
            decay_interval_ms: 5000,
            grace_delay_ms: Some(5000),
            feed_delay_ms: 2000,
            level_threshold: 100,
            start_health: METER_MAX,
            start_happiness: METER_MAX,
            pat_happiness: 5,
            pat_experience: 2,
            special_cake: true,
            cake_unlock_happiness: 80,
            wander_fast_ms: 1000,
            wander_slow_ms: 2000,
        }
    }

    /// The older, harsher rules: low starting stats, no grace window, no cake.
    pub(crate) fn classic() -> Self {
        Self {
            start_health: 10,
            start_happiness: 10,
            grace_delay_ms: None,
            special_cake: false,
            ..Self::standard()
        }
    }

    pub(crate) fn by_name(name: &str) -> Self {
        match name {
            "classic" => Self::classic(),
            _ => Self::standard(),
        }
    }

    pub(crate) fn ticks(&self, ms: u64) -> u64 {
        (ms / self.tick_step_ms).max(1)
    }

    pub(crate) fn decay_every(&self) -> u64 {
        self.ticks(self.decay_interval_ms)
    }

    pub(crate) fn grace_ticks(&self) -> Option<u64> {
        self.grace_delay_ms.map(|ms| self.ticks(ms))
    }

    pub(crate) fn feed_ticks(&self) -> u64 {
        self.ticks(self.feed_delay_ms)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct GameState {
    pub(crate) pet: Pet,
    pub(crate) scene: Scene,
    pub(crate) sim_ticks: u64,
    /// Consecutive ticks spent at zero health; drives the grace window.
    pub(crate) zero_health_ticks: u64,
    pub(crate) pending_feed: Option<PendingFeed>,
    pub(crate) cake_used: bool,
    pub(crate) name_edit: String,
}

impl GameState {
    pub(crate) fn new(rules: &Rules) -> Self {
        Self {
            pet: Pet::adopt(DEFAULT_NAME, rules),
            scene: Scene::Adopt,
            sim_ticks: 0,
            zero_health_ticks: 0,
            pending_feed: None,
            cake_used: false,
            name_edit: String::new(),
        }
    }

    pub(crate) fn cake_available(&self, rules: &Rules) -> bool {
        rules.special_cake
            && !self.cake_used
            && self.pet.happiness > rules.cake_unlock_happiness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_thresholds() {
        let rules = Rules::standard();
        let mut pet = Pet::adopt("Mochi", &rules);
        pet.health = 29;
        assert_eq!(pet.mood(), Mood::Distressed);
        pet.health = 30;
        assert_eq!(pet.mood(), Mood::Neutral);
        pet.health = 70;
        assert_eq!(pet.mood(), Mood::Neutral);
        pet.health = 71;
        assert_eq!(pet.mood(), Mood::Content);
        pet.game_over = true;
        assert_eq!(pet.mood(), Mood::Expired);
    }

    #[test]
    fn vitality_needs_both_meters() {
        let rules = Rules::standard();
        let mut pet = Pet::adopt("Mochi", &rules);
        pet.health = 51;
        pet.happiness = 51;
        assert!(pet.vitality());
        pet.happiness = 50;
        assert!(!pet.vitality());
        pet.happiness = 51;
        pet.health = 50;
        assert!(!pet.vitality());
    }

    #[test]
    fn sprite_scale_grows_with_level() {
        let rules = Rules::standard();
        let mut pet = Pet::adopt("Mochi", &rules);
        assert!((pet.sprite_scale() - 1.0).abs() < f32::EPSILON);
        pet.level = 3;
        assert!((pet.sprite_scale() - 1.3).abs() < 1e-6);
        let lower = pet.sprite_scale();
        pet.level = 4;
        assert!(pet.sprite_scale() > lower);
    }

    #[test]
    fn adopt_falls_back_to_placeholder() {
        let rules = Rules::standard();
        assert_eq!(Pet::adopt("   ", &rules).name, DEFAULT_NAME);
        assert_eq!(Pet::adopt("  Taro ", &rules).name, "Taro");
    }

    #[test]
    fn ruleset_presets_differ_as_documented() {
        let std_rules = Rules::by_name("standard");
        let classic = Rules::by_name("classic");
        assert_eq!(std_rules.start_health, 100);
        assert!(std_rules.grace_delay_ms.is_some());
        assert!(std_rules.special_cake);
        assert_eq!(classic.start_health, 10);
        assert!(classic.grace_delay_ms.is_none());
        assert!(!classic.special_cake);
        // unknown names fall back to standard
        assert_eq!(Rules::by_name("???").start_health, 100);
    }
}
