//! Keyboard input: maps key presses to shell commands.
//!
//! The shell is keyboard-only. Every command is either an engine action or a
//! change of what the screen shows.

use idle_sourdough::PurchaseKind;

/// Which panel fills the right-hand side of the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Log,
    Leaderboard,
}

impl View {
    pub fn toggled(self) -> View {
        match self {
            View::Log => View::Leaderboard,
            View::Leaderboard => View::Log,
        }
    }
}

/// Everything a key press can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Feed,
    Buy(PurchaseKind),
    Save,
    ToggleLeaderboard,
}

/// Command bound to `key`, if any. Letters are case-insensitive.
pub fn command_for(key: char) -> Option<Command> {
    if let Some(kind) = PurchaseKind::from_key(key) {
        return Some(Command::Buy(kind));
    }
    match key.to_ascii_lowercase() {
        'f' | ' ' => Some(Command::Feed),
        's' => Some(Command::Save),
        'l' => Some(Command::ToggleLeaderboard),
        _ => None,
    }
}

/// Help bar entries as (key label, description).
pub fn help_entries(view: View) -> Vec<(&'static str, &'static str)> {
    let board = match view {
        View::Log => "Leaderboard",
        View::Leaderboard => "Log",
    };
    vec![
        ("F", "Feed"),
        ("1-7", "Buy"),
        ("S", "Save"),
        ("L", board),
    ]
}
