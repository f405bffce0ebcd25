use crate::model::{FoodKind, GameState, Mood, Rules, Scene};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            c.ch = ' ';
            c.fg = Color::White;
            c.bg = bg;
            c.bold = false;
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        Ok(true)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Text + meter helpers
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(
            xx,
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

fn bar(value01: f32, width: usize) -> String {
    let v = value01.clamp(0.0, 1.0);
    let fill = (v * width as f32 + 0.5) as usize;
    let mut s = String::new();
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

/* -----------------------------
   Pet viewport
------------------------------ */

/// Screen region the pet wanders inside (everything right of the panel).
#[derive(Clone, Copy)]
pub(crate) struct Viewport {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
}

pub(crate) const PANEL_W: u16 = 30;

pub(crate) fn pet_viewport(cols: u16, rows: u16) -> Viewport {
    let x = PANEL_W.min(cols) as i32;
    Viewport {
        x,
        y: 0,
        w: (cols as i32 - x).max(1),
        h: (rows as i32).max(1),
    }
}

/// Sprite tier from the level-driven scale factor: bigger pets at higher
/// levels, with the growth curve living in the model.
fn sprite_lines(mood: Mood, scale: f32) -> Vec<String> {
    let eyes = match mood {
        Mood::Expired => ('x', 'x'),
        Mood::Distressed => (';', ';'),
        _ => ('o', 'o'),
    };
    let mouth = match mood {
        Mood::Content => "\\___/",
        Mood::Distressed | Mood::Expired => "/___\\",
        Mood::Neutral => " ___ ",
    };

    if scale < 1.3 {
        vec![
            "  .----.  ".to_string(),
            format!(" ( {} {} ) ", eyes.0, eyes.1),
            format!(" ({mouth}) "),
            "  '----'  ".to_string(),
        ]
    } else if scale < 1.75 {
        vec![
            "   .------.   ".to_string(),
            "  /        \\  ".to_string(),
            format!(" |  {}    {}  |", eyes.0, eyes.1),
            format!(" |  {mouth}   |"),
            "  \\        /  ".to_string(),
            "   '------'   ".to_string(),
        ]
    } else {
        vec![
            "    .----------.    ".to_string(),
            "   /            \\   ".to_string(),
            "  /              \\  ".to_string(),
            format!(" |   {}      {}   | ", eyes.0, eyes.1),
            format!(" |    {mouth}     | "),
            "  \\              /  ".to_string(),
            "   \\            /   ".to_string(),
            "    '----------'    ".to_string(),
        ]
    }
}

pub(crate) fn draw_pet(buf: &mut CellBuffer, st: &GameState, cx: i32, cy: i32, color: bool) {
    let mood = st.pet.mood();
    let lines = sprite_lines(mood, st.pet.sprite_scale());

    let fg = if color {
        match mood {
            Mood::Content => Color::Green,
            Mood::Neutral => Color::White,
            Mood::Distressed => Color::Blue,
            Mood::Expired => Color::DarkGrey,
        }
    } else {
        Color::White
    };

    let h = lines.len() as i32;
    for (yy, line) in lines.iter().enumerate() {
        let y = cy - h / 2 + yy as i32;
        if y < 0 || y >= buf.h as i32 {
            continue;
        }
        let w = line.chars().count() as i32;
        let mut x = cx - w / 2;
        for ch in line.chars() {
            if ch != ' ' && x >= 0 && x < buf.w as i32 {
                buf.set(
                    x as u16,
                    y as u16,
                    Cell {
                        ch,
                        fg,
                        bg: Color::Black,
                        bold: false,
                    },
                );
            }
            x += 1;
        }
    }
}

/// Falling food morsel while a feed is in flight. `progress` runs 0..1 from
/// the viewport top down to the pet.
pub(crate) fn draw_food_drop(
    buf: &mut CellBuffer,
    food: FoodKind,
    vp: Viewport,
    pet_cx: i32,
    pet_cy: i32,
    progress: f32,
) {
    let t = progress.clamp(0.0, 1.0);
    let y = vp.y as f32 + (pet_cy - 2 - vp.y) as f32 * t;
    let x = pet_cx;
    let (x, y) = (x, y.round() as i32);
    if x >= 0 && x < buf.w as i32 && y >= 0 && y < buf.h as i32 {
        buf.set(
            x as u16,
            y as u16,
            Cell {
                ch: food.stats().glyph,
                fg: Color::Yellow,
                bg: Color::Black,
                bold: true,
            },
        );
    }
}

/* -----------------------------
   Status panel
------------------------------ */

pub(crate) fn ui_panel(buf: &mut CellBuffer, st: &GameState, rules: &Rules) {
    let bg = Color::Black;
    let fg = Color::White;
    let hi = Color::Yellow;

    let title = format!("Petling  |  {}", st.pet.name);
    draw_text(buf, 1, 0, &title, fg, bg);

    draw_text(buf, 1, 2, &format!("Level: {}", st.pet.level), fg, bg);

    let xp = st.pet.experience as f32 / rules.level_threshold as f32;
    let xp_line = format!(
        "XP  {} {:>3}/{}",
        bar(xp, 12),
        st.pet.experience,
        rules.level_threshold
    );
    draw_text(buf, 1, 3, &xp_line, fg, bg);

    let hp_line = format!(
        "HP  {} {:>3}%",
        bar(st.pet.health as f32 / 100.0, 12),
        st.pet.health
    );
    draw_text(buf, 1, 5, &hp_line, fg, bg);

    let joy_line = format!(
        "Joy {} {:>3}%",
        bar(st.pet.happiness as f32 / 100.0, 12),
        st.pet.happiness
    );
    draw_text(buf, 1, 6, &joy_line, fg, bg);

    draw_text(buf, 1, 8, "Food:", fg, bg);
    for (i, kind) in FoodKind::MENU.iter().enumerate() {
        let sel = st.pet.selected_food == *kind;
        let line = format!(
            "{} {} {}",
            if sel { ">" } else { " " },
            i + 1,
            kind.stats().label
        );
        draw_text(buf, 1, 9 + i as u16, &line, if sel { hi } else { fg }, bg);
    }
    if st.cake_available(rules) || st.pet.selected_food == FoodKind::Cake {
        let sel = st.pet.selected_food == FoodKind::Cake;
        let line = format!("{} 3 Cake  *special*", if sel { ">" } else { " " });
        draw_text(buf, 1, 11, &line, if sel { hi } else { Color::Magenta }, bg);
    }

    if st.pending_feed.is_some() {
        draw_text(buf, 1, 13, "nom nom...", Color::Yellow, bg);
    }

    let help = match st.scene {
        Scene::Main => "f feed | p pat | 1-3 food | r rename | h help | q quit",
        Scene::Adopt => "type a name | enter adopt | esc quit",
        Scene::Rename => "type name | enter save | esc cancel",
        Scene::Help => "esc back | h close | q quit",
        Scene::GameOver => "n new game | q quit",
    };
    draw_text(buf, 1, buf.h.saturating_sub(1), help, fg, bg);
}

/// First-time unlock callout for the special cake.
pub(crate) fn cake_notification(buf: &mut CellBuffer, st: &GameState) {
    let msgs = [
        "Special treat unlocked!".to_string(),
        format!("{} looks delighted.", st.pet.name),
        "The cake can be served once.".to_string(),
    ];
    let w = buf.w;
    for (i, msg) in msgs.iter().enumerate() {
        let x = w.saturating_sub(msg.chars().count() as u16 + 2);
        draw_text(buf, x, 1 + i as u16, msg, Color::Magenta, Color::Black);
    }
}
