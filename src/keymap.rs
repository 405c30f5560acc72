use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::{KeyAction, Mode, ModeChoice, TimerSetting};

/// Ctrl+C leaves from anywhere; it is handled by the shell, not the session
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Maps a raw key to a session action for the given mode.
///
/// The same physical key means different things in the menu and in a round
/// ('q' quits from the menu but is an orb during a round).
pub fn translate(key: &KeyEvent, mode: Mode) -> Option<KeyAction> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }

    match mode {
        Mode::Menu => match key.code {
            KeyCode::Char('1') => Some(KeyAction::SelectMode(ModeChoice::Timed(
                TimerSetting::Short,
            ))),
            KeyCode::Char('2') => Some(KeyAction::SelectMode(ModeChoice::Timed(
                TimerSetting::Long,
            ))),
            KeyCode::Char('3') => Some(KeyAction::SelectMode(ModeChoice::Freeform)),
            KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
            _ => None,
        },
        Mode::Timed(_) | Mode::Freeform => match key.code {
            KeyCode::Esc => Some(KeyAction::Cancel),
            KeyCode::Enter => Some(KeyAction::Confirm),
            KeyCode::Backspace => Some(KeyAction::Delete),
            KeyCode::Char(c) if c.eq_ignore_ascii_case(&'r') => Some(KeyAction::Confirm),
            KeyCode::Char(c) => Some(KeyAction::Symbol(c)),
            _ => None,
        },
    }
}
