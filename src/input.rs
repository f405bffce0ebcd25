use crate::model::{FoodKind, Scene};
use crate::sim::PlayerAction;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) => {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    out.push(InputEvent {
                        key: k.code,
                        mods: k.modifiers,
                    });
                    if out.len() >= 32 {
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(out)
}

fn printable(ch: char) -> bool {
    (ch.is_ascii() && !ch.is_ascii_control()) || ch == ' '
}

pub(crate) fn map_event_to_action(scene: &Scene, ev: InputEvent) -> Option<PlayerAction> {
    // Text-entry scenes swallow plain characters.
    match scene {
        Scene::Adopt => {
            return match ev.key {
                KeyCode::Enter => Some(PlayerAction::AdoptCommit),
                KeyCode::Backspace => Some(PlayerAction::AdoptBackspace),
                KeyCode::Esc => Some(PlayerAction::Quit),
                KeyCode::Char(ch) if printable(ch) => {
                    if ev.mods.contains(KeyModifiers::CONTROL) {
                        None
                    } else {
                        Some(PlayerAction::AdoptChar(ch))
                    }
                }
                _ => None,
            };
        }
        Scene::Rename => {
            return match ev.key {
                KeyCode::Enter => Some(PlayerAction::RenameCommit),
                KeyCode::Esc => Some(PlayerAction::RenameCancel),
                KeyCode::Backspace => Some(PlayerAction::RenameBackspace),
                KeyCode::Char(ch) if printable(ch) => Some(PlayerAction::RenameChar(ch)),
                _ => None,
            };
        }
        _ => {}
    }

    // Global
    match ev.key {
        KeyCode::Char('h') | KeyCode::Char('H') => return Some(PlayerAction::HelpToggle),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(PlayerAction::Quit),
        KeyCode::Esc => return Some(PlayerAction::Back),
        _ => {}
    }

    match scene {
        Scene::Main => match ev.key {
            KeyCode::Char('f') | KeyCode::Char('F') => Some(PlayerAction::Feed),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(PlayerAction::Pat),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(PlayerAction::RenameOpen),
            KeyCode::Char('1') => Some(PlayerAction::SelectFood(FoodKind::Choco)),
            KeyCode::Char('2') => Some(PlayerAction::SelectFood(FoodKind::Cookie)),
            KeyCode::Char('3') => Some(PlayerAction::SelectFood(FoodKind::Cake)),
            _ => None,
        },
        Scene::Help => match ev.key {
            KeyCode::Esc => Some(PlayerAction::Back),
            _ => None,
        },
        Scene::GameOver => match ev.key {
            KeyCode::Char('n') | KeyCode::Char('N') => Some(PlayerAction::NewGame),
            _ => None,
        },
        Scene::Adopt | Scene::Rename => None,
    }
}
