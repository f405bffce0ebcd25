use crate::config::{load_settings, project_paths, save_settings_atomic, Settings};
use crate::input::{collect_input_nonblocking, map_event_to_action};
use crate::model::{GameState, Rules, Scene};
use crate::render::{
    cake_notification, draw_food_drop, draw_pet, draw_text, pet_viewport, ui_panel, Cell,
    Terminal, Viewport,
};
use crate::sim::PlayerAction;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cmp::min;
use std::time::{Duration, Instant};

pub(crate) struct App {
    settings: Settings,
    rules: Rules,
    state: GameState,
    paths: crate::config::Paths,
    term: Terminal,
    rng: StdRng,
    should_quit: bool,
    /// Pet position and wander target, normalized to 0..1 of the viewport
    /// so terminal resizes need no fixup.
    pet_pos: (f32, f32),
    wander_target: (f32, f32),
    next_wander_at: Instant,
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let paths = project_paths()?;
        let settings = load_settings(&paths.settings_path);
        let rules = Rules::by_name(&settings.ruleset);
        let state = GameState::new(&rules);
        let rng = StdRng::seed_from_u64(settings.seed);
        let term = Terminal::begin()?;

        Ok(Self {
            settings,
            rules,
            state,
            paths,
            term,
            rng,
            should_quit: false,
            pet_pos: (0.5, 0.5),
            wander_target: (0.5, 0.5),
            next_wander_at: Instant::now(),
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let sim_step = Duration::from_millis(self.rules.tick_step_ms);

        let mut last_frame = Instant::now();
        let mut sim_accum = Duration::ZERO;

        while !self.should_quit {
            let _resized = self.term.resize_if_needed()?;

            // input
            let events = collect_input_nonblocking(frame_dt)?;
            for ev in events {
                if let Some(action) = map_event_to_action(&self.state.scene, ev) {
                    match action {
                        PlayerAction::Quit => {
                            self.should_quit = true;
                            break;
                        }
                        PlayerAction::NewGame => {
                            self.state.apply(PlayerAction::NewGame, &self.rules);
                            self.pet_pos = (0.5, 0.5);
                            self.wander_target = (0.5, 0.5);
                            self.next_wander_at = Instant::now();
                        }
                        _ => self.state.apply(action, &self.rules),
                    }
                }
            }

            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;

            // sim fixed-step; the clock only runs once a pet is adopted
            if self.state.scene != Scene::Adopt {
                sim_accum = sim_accum.saturating_add(real_dt);
                while sim_accum >= sim_step {
                    self.state.tick_fixed_step(&self.rules);
                    sim_accum = sim_accum.saturating_sub(sim_step);
                }
                if self.state.pet.game_over && self.state.scene != Scene::GameOver {
                    self.state.scene = Scene::GameOver;
                }
            } else {
                sim_accum = Duration::ZERO;
            }

            self.update_wander(now, real_dt);
            self.render_frame()?;

            spin_sleep(frame_dt, Instant::now());
        }

        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        Ok(())
    }

    /// Picks a new random target on a cadence read off the pet's vitality
    /// (lively pets move twice as often), then eases toward it every frame.
    fn update_wander(&mut self, now: Instant, real_dt: Duration) {
        if self.state.scene != Scene::Main || self.state.pet.game_over {
            return;
        }

        if now >= self.next_wander_at {
            self.wander_target = (self.rng.gen_range(0.1..0.9), self.rng.gen_range(0.15..0.85));
            let interval_ms = if self.state.pet.vitality() {
                self.rules.wander_fast_ms
            } else {
                self.rules.wander_slow_ms
            };
            self.next_wander_at = now + Duration::from_millis(interval_ms);
        }

        let k = (real_dt.as_secs_f32() * 4.0).min(1.0);
        self.pet_pos.0 += (self.wander_target.0 - self.pet_pos.0) * k;
        self.pet_pos.1 += (self.wander_target.1 - self.pet_pos.1) * k;
    }

    fn pet_cell_pos(&self, vp: Viewport) -> (i32, i32) {
        let cx = vp.x + (self.pet_pos.0 * (vp.w - 1) as f32) as i32;
        let cy = vp.y + (self.pet_pos.1 * (vp.h - 1) as f32) as i32;
        (cx, cy)
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let bg = crossterm::style::Color::Black;
        self.term.cur.clear(bg);

        let vp = pet_viewport(self.term.cols, self.term.rows);
        let (cx, cy) = self.pet_cell_pos(vp);

        if self.state.scene != Scene::Adopt {
            draw_pet(
                &mut self.term.cur,
                &self.state,
                cx,
                cy,
                self.settings.enable_color,
            );

            if let Some(pf) = &self.state.pending_feed {
                let total = self.rules.feed_ticks() as f32;
                let progress = 1.0 - pf.ticks_left as f32 / total;
                draw_food_drop(&mut self.term.cur, pf.food, vp, cx, cy, progress);
            }

            if self.state.cake_available(&self.rules) {
                cake_notification(&mut self.term.cur, &self.state);
            }
        }

        ui_panel(&mut self.term.cur, &self.state, &self.rules);

        let scene = self.state.scene.clone();
        match scene {
            Scene::Adopt => {
                let mut typed = self.state.name_edit.clone();
                typed.push('_');
                let body = format!(
                    "Give your pet a name (blank for \"{}\").\n\nName: {}\n\nEnter adopt | Esc quit",
                    crate::model::DEFAULT_NAME,
                    typed
                );
                self.draw_center_box("A new friend arrives", &body)?;
            }
            Scene::Rename => {
                let mut preview = self.state.name_edit.clone();
                if preview.len() < crate::model::NAME_MAX {
                    preview.push('_');
                }
                let body = format!(
                    "Type a name (max {} chars).\n\nName: {}\n\nEnter save | Esc cancel",
                    crate::model::NAME_MAX,
                    preview
                );
                self.draw_center_box("Rename pet", &body)?;
            }
            Scene::Help => {
                self.draw_center_box(
                    "How to play",
                    "Keep your pet fed and happy; both meters drain over time.\n\
                     An empty health meter for too long ends the game.\n\n\
                     F Feed: serves the selected food after a short munch.\n\
                     P Pat: a quick happiness and experience boost.\n\
                     1/2 pick a food; 3 serves the special cake once your\n\
                     pet is happy enough (it can be served only once).\n\
                     R renames your pet.\n\n\
                     Food grants experience; levels make the pet grow.\n\
                     Lively pets (both meters above 50) roam faster.\n\n\
                     Esc or H to close help.",
                )?;
            }
            Scene::GameOver => {
                let body = format!(
                    "{} made it to level {}.\n\nPress N for a new pet, or Q to quit.",
                    self.state.pet.name, self.state.pet.level
                );
                self.draw_center_box("Game over", &body)?;
            }
            Scene::Main => {}
        }

        self.term.present()?;
        Ok(())
    }

    fn draw_center_box(&mut self, title: &str, body: &str) -> anyhow::Result<()> {
        let fg = crossterm::style::Color::White;
        let bg = crossterm::style::Color::Black;
        let w = self.term.cols;
        let h = self.term.rows;

        let bw = min(60, w.saturating_sub(4));
        let bh = min(18, h.saturating_sub(4));
        let x0 = (w - bw) / 2;
        let y0 = (h - bh) / 2;

        for y in y0..y0 + bh {
            for x in x0..x0 + bw {
                let ch = match (
                    x == x0 || x == x0 + bw - 1,
                    y == y0 || y == y0 + bh - 1,
                ) {
                    (true, true) => match (x == x0, y == y0) {
                        (true, true) => '┌',
                        (false, true) => '┐',
                        (true, false) => '└',
                        (false, false) => '┘',
                    },
                    (true, false) => '│',
                    (false, true) => '─',
                    (false, false) => ' ',
                };
                self.term.cur.set(
                    x,
                    y,
                    Cell {
                        ch,
                        fg,
                        bg,
                        bold: false,
                    },
                );
            }
        }

        draw_text(&mut self.term.cur, x0 + 2, y0 + 1, title, fg, bg);

        let mut yy = y0 + 3;
        for line in body.lines() {
            if yy >= y0 + bh - 1 {
                break;
            }
            draw_text(&mut self.term.cur, x0 + 2, yy, line.trim_start(), fg, bg);
            yy += 1;
        }

        Ok(())
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    app.run()?;
    Ok(())
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
