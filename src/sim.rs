use crate::model::{
    FoodKind, GameState, PendingFeed, Rules, Scene, METER_MAX, NAME_MAX,
};

#[derive(Clone, Debug)]
pub(crate) enum PlayerAction {
    Feed,
    SelectFood(FoodKind),
    Pat,
    AdoptChar(char),
    AdoptBackspace,
    AdoptCommit,
    RenameOpen,
    RenameChar(char),
    RenameBackspace,
    RenameCommit,
    RenameCancel,
    HelpToggle,
    Back,
    Quit,
    NewGame,
}

fn clamp_meter(v: i32) -> i32 {
    v.clamp(0, METER_MAX)
}

impl GameState {
    pub(crate) fn apply(&mut self, action: PlayerAction, rules: &Rules) {
        match action {
            PlayerAction::Feed => {
                // One feed in flight at a time; extra presses are dropped.
                if self.pet.game_over || self.pending_feed.is_some() {
                    return;
                }
                self.pending_feed = Some(PendingFeed {
                    food: self.pet.selected_food,
                    ticks_left: rules.feed_ticks(),
                });
            }
            PlayerAction::SelectFood(kind) => {
                if self.pet.game_over {
                    return;
                }
                if kind == FoodKind::Cake && !self.cake_available(rules) {
                    return;
                }
                self.pet.selected_food = kind;
            }
            PlayerAction::Pat => {
                if self.pet.game_over {
                    return;
                }
                self.pet.happiness = clamp_meter(self.pet.happiness + rules.pat_happiness);
                self.pet.experience += rules.pat_experience;
                self.normalize_level(rules);
            }
            PlayerAction::AdoptChar(ch) => {
                if self.name_edit.len() < NAME_MAX {
                    self.name_edit.push(ch);
                }
            }
            PlayerAction::AdoptBackspace => {
                self.name_edit.pop();
            }
            PlayerAction::AdoptCommit => {
                // Empty input is fine here; the pet just gets the placeholder.
                let name = std::mem::take(&mut self.name_edit);
                self.pet = crate::model::Pet::adopt(&name, rules);
                self.scene = Scene::Main;
            }
            PlayerAction::RenameOpen => {
                self.name_edit = self.pet.name.clone();
                self.scene = Scene::Rename;
            }
            PlayerAction::RenameChar(ch) => {
                if self.name_edit.len() < NAME_MAX {
                    self.name_edit.push(ch);
                }
            }
            PlayerAction::RenameBackspace => {
                self.name_edit.pop();
            }
            PlayerAction::RenameCommit => {
                // Whitespace-only input is rejected silently: stay in edit mode.
                let trimmed = self.name_edit.trim();
                if trimmed.is_empty() {
                    return;
                }
                self.pet.name = trimmed.to_string();
                self.name_edit.clear();
                self.scene = Scene::Main;
            }
            PlayerAction::RenameCancel => {
                self.name_edit.clear();
                self.scene = Scene::Main;
            }
            PlayerAction::HelpToggle => {
                self.scene = match self.scene {
                    Scene::Help => Scene::Main,
                    _ => Scene::Help,
                };
            }
            PlayerAction::Back => {
                if matches!(self.scene, Scene::Help | Scene::Rename) {
                    self.name_edit.clear();
                    self.scene = Scene::Main;
                }
            }
            PlayerAction::Quit => {}
            PlayerAction::NewGame => {
                *self = GameState::new(rules);
            }
        }
    }

    /// Advances the simulation by one fixed tick of `rules.tick_step_ms`.
    ///
    /// Handles the pending-feed countdown, periodic decay, and the
    /// zero-health grace window. Everything else happens in `apply`.
    pub(crate) fn tick_fixed_step(&mut self, rules: &Rules) {
        if self.pet.game_over {
            return;
        }

        self.sim_ticks += 1;

        if let Some(pf) = &mut self.pending_feed {
            pf.ticks_left = pf.ticks_left.saturating_sub(1);
            if pf.ticks_left == 0 {
                let food = pf.food;
                self.pending_feed = None;
                self.land_feed(food, rules);
            }
        }

        if self.sim_ticks % rules.decay_every() == 0 {
            self.pet.health = clamp_meter(self.pet.health - 1);
            self.pet.happiness = clamp_meter(self.pet.happiness - 1);
        }

        if self.pet.health == 0 {
            match rules.grace_ticks() {
                None => self.pet.game_over = true,
                Some(grace) => {
                    self.zero_health_ticks += 1;
                    if self.zero_health_ticks > grace {
                        self.pet.game_over = true;
                    }
                }
            }
        } else {
            self.zero_health_ticks = 0;
        }
    }

    fn land_feed(&mut self, food: FoodKind, rules: &Rules) {
        let stats = food.stats();
        self.pet.health = clamp_meter(self.pet.health + stats.health_effect);
        self.pet.happiness = clamp_meter(self.pet.happiness + stats.happiness_effect);
        self.pet.experience += stats.experience_points;
        self.normalize_level(rules);

        if food == FoodKind::Cake {
            self.cake_used = true;
            self.pet.selected_food = FoodKind::DEFAULT;
        }
    }

    fn normalize_level(&mut self, rules: &Rules) {
        // Loop so a single large grant can yield several level-ups.
        while self.pet.experience >= rules.level_threshold {
            self.pet.experience -= rules.level_threshold;
            self.pet.level += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pet;

    fn adopted(rules: &Rules) -> GameState {
        let mut gs = GameState::new(rules);
        gs.pet = Pet::adopt("Mochi", rules);
        gs.scene = Scene::Main;
        gs
    }

    /// Runs `n` full decay intervals.
    fn run_decay_intervals(gs: &mut GameState, rules: &Rules, n: u64) {
        for _ in 0..n * rules.decay_every() {
            gs.tick_fixed_step(rules);
        }
    }

    /// Feeds and ticks until the pending feed lands.
    fn feed_and_land(gs: &mut GameState, rules: &Rules) {
        gs.apply(PlayerAction::Feed, rules);
        for _ in 0..rules.feed_ticks() {
            gs.tick_fixed_step(rules);
        }
        assert!(gs.pending_feed.is_none());
    }

    #[test]
    fn decay_is_monotonic_with_floor() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        run_decay_intervals(&mut gs, &rules, 30);
        assert_eq!(gs.pet.health, 70);
        assert_eq!(gs.pet.happiness, 70);
        run_decay_intervals(&mut gs, &rules, 200);
        assert_eq!(gs.pet.health, 0);
        assert_eq!(gs.pet.happiness, 0);
    }

    #[test]
    fn meters_stay_in_range_after_feeding() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        gs.pet.health = 98;
        gs.pet.happiness = 99;
        feed_and_land(&mut gs, &rules);
        assert!((0..=METER_MAX).contains(&gs.pet.health));
        assert!((0..=METER_MAX).contains(&gs.pet.happiness));
        assert_eq!(gs.pet.health, 100);
    }

    #[test]
    fn feeding_grants_exact_experience() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        gs.apply(PlayerAction::SelectFood(FoodKind::Cookie), &rules);
        feed_and_land(&mut gs, &rules);
        assert_eq!(gs.pet.experience, 10);
        assert_eq!(gs.pet.level, 1);
    }

    #[test]
    fn experience_overflow_levels_up() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        gs.pet.experience = 95;
        gs.apply(PlayerAction::SelectFood(FoodKind::Cookie), &rules);
        feed_and_land(&mut gs, &rules);
        assert_eq!(gs.pet.level, 2);
        assert_eq!(gs.pet.experience, 5);
    }

    #[test]
    fn large_grant_yields_multiple_level_ups() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        gs.pet.experience = 230;
        feed_and_land(&mut gs, &rules); // choco, +20
        assert_eq!(gs.pet.level, 3);
        assert_eq!(gs.pet.experience, 50);
        assert!(gs.pet.experience < rules.level_threshold);
    }

    #[test]
    fn patting_raises_happiness_and_experience() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        gs.pet.happiness = 40;
        gs.apply(PlayerAction::Pat, &rules);
        assert_eq!(gs.pet.happiness, 45);
        assert_eq!(gs.pet.experience, 2);
        gs.pet.happiness = 98;
        gs.apply(PlayerAction::Pat, &rules);
        assert_eq!(gs.pet.happiness, 100);
    }

    #[test]
    fn full_run_to_game_over_through_grace_window() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        run_decay_intervals(&mut gs, &rules, 100);
        assert_eq!(gs.pet.health, 0);
        assert_eq!(gs.pet.happiness, 0);
        assert!(!gs.pet.game_over);

        let grace = rules.grace_ticks().unwrap();
        for _ in 0..grace {
            gs.tick_fixed_step(&rules);
        }
        assert!(gs.pet.game_over);
    }

    #[test]
    fn feeding_during_grace_window_rescues_the_pet() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        gs.pet.health = 0;
        gs.apply(PlayerAction::Feed, &rules);
        feed_and_land(&mut gs, &rules);
        assert!(gs.pet.health > 0);
        // survive well past the grace window
        let grace = rules.grace_ticks().unwrap();
        for _ in 0..grace * 2 {
            gs.tick_fixed_step(&rules);
        }
        assert!(!gs.pet.game_over);
        assert_eq!(gs.zero_health_ticks, 0);
    }

    #[test]
    fn classic_rules_end_the_game_immediately() {
        let rules = Rules::classic();
        let mut gs = adopted(&rules);
        assert_eq!(gs.pet.health, 10);
        run_decay_intervals(&mut gs, &rules, 10);
        assert_eq!(gs.pet.health, 0);
        assert!(gs.pet.game_over);
    }

    #[test]
    fn game_over_makes_actions_no_ops() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        gs.pet.game_over = true;
        let before = gs.pet.clone();

        gs.apply(PlayerAction::Feed, &rules);
        gs.apply(PlayerAction::Pat, &rules);
        gs.apply(PlayerAction::SelectFood(FoodKind::Cookie), &rules);
        gs.tick_fixed_step(&rules);

        assert_eq!(gs.pet, before);
        assert!(gs.pending_feed.is_none());
    }

    #[test]
    fn new_game_restores_initial_values() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        gs.pet.health = 0;
        gs.pet.level = 7;
        gs.pet.game_over = true;
        gs.cake_used = true;
        gs.zero_health_ticks = 99;
        gs.pending_feed = Some(PendingFeed {
            food: FoodKind::Choco,
            ticks_left: 3,
        });

        gs.apply(PlayerAction::NewGame, &rules);

        assert_eq!(gs.pet.health, rules.start_health);
        assert_eq!(gs.pet.happiness, rules.start_happiness);
        assert_eq!(gs.pet.level, 1);
        assert_eq!(gs.pet.experience, 0);
        assert!(!gs.pet.game_over);
        assert!(!gs.cake_used);
        assert_eq!(gs.zero_health_ticks, 0);
        assert!(gs.pending_feed.is_none());
        assert_eq!(gs.scene, Scene::Adopt);
    }

    #[test]
    fn second_feed_while_one_is_in_flight_is_dropped() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        gs.apply(PlayerAction::Feed, &rules);
        gs.apply(PlayerAction::Feed, &rules);
        for _ in 0..rules.feed_ticks() {
            gs.tick_fixed_step(&rules);
        }
        // exactly one choco's worth of experience
        assert_eq!(gs.pet.experience, 20);
        assert!(gs.pending_feed.is_none());
    }

    #[test]
    fn cake_unlocks_above_threshold_and_is_single_use() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);

        gs.pet.happiness = 80;
        gs.apply(PlayerAction::SelectFood(FoodKind::Cake), &rules);
        assert_eq!(gs.pet.selected_food, FoodKind::Choco);

        gs.pet.happiness = 85;
        assert!(gs.cake_available(&rules));
        gs.apply(PlayerAction::SelectFood(FoodKind::Cake), &rules);
        assert_eq!(gs.pet.selected_food, FoodKind::Cake);

        feed_and_land(&mut gs, &rules);
        assert_eq!(gs.pet.happiness, 100);
        assert!(gs.cake_used);
        assert_eq!(gs.pet.selected_food, FoodKind::Choco);

        // never again this session, even while happiness stays high
        assert!(!gs.cake_available(&rules));
        gs.apply(PlayerAction::SelectFood(FoodKind::Cake), &rules);
        assert_eq!(gs.pet.selected_food, FoodKind::Choco);
    }

    #[test]
    fn cake_is_disabled_under_classic_rules() {
        let rules = Rules::classic();
        let mut gs = adopted(&rules);
        gs.pet.happiness = 100;
        assert!(!gs.cake_available(&rules));
        gs.apply(PlayerAction::SelectFood(FoodKind::Cake), &rules);
        assert_eq!(gs.pet.selected_food, FoodKind::Choco);
    }

    #[test]
    fn rename_rejects_blank_input() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        gs.apply(PlayerAction::RenameOpen, &rules);
        assert_eq!(gs.scene, Scene::Rename);
        gs.name_edit = "   ".to_string();
        gs.apply(PlayerAction::RenameCommit, &rules);
        assert_eq!(gs.scene, Scene::Rename);
        assert_eq!(gs.pet.name, "Mochi");

        gs.name_edit = "  Taro ".to_string();
        gs.apply(PlayerAction::RenameCommit, &rules);
        assert_eq!(gs.scene, Scene::Main);
        assert_eq!(gs.pet.name, "Taro");
    }

    #[test]
    fn rename_buffer_is_length_capped() {
        let rules = Rules::standard();
        let mut gs = adopted(&rules);
        gs.apply(PlayerAction::RenameOpen, &rules);
        gs.name_edit.clear();
        for _ in 0..NAME_MAX + 10 {
            gs.apply(PlayerAction::RenameChar('a'), &rules);
        }
        assert_eq!(gs.name_edit.len(), NAME_MAX);
    }

    #[test]
    fn adopt_commit_uses_placeholder_for_empty_name() {
        let rules = Rules::standard();
        let mut gs = GameState::new(&rules);
        assert_eq!(gs.scene, Scene::Adopt);
        gs.apply(PlayerAction::AdoptCommit, &rules);
        assert_eq!(gs.scene, Scene::Main);
        assert_eq!(gs.pet.name, crate::model::DEFAULT_NAME);

        let mut gs = GameState::new(&rules);
        for ch in "Pochi".chars() {
            gs.apply(PlayerAction::AdoptChar(ch), &rules);
        }
        gs.apply(PlayerAction::AdoptCommit, &rules);
        assert_eq!(gs.pet.name, "Pochi");
    }
}
