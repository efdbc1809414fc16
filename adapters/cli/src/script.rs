//! Keyboard-letter scripts replayed as player intents.
//!
//! Each character drives one tick: `w`, `a`, `s` and `d` move, `f` attacks,
//! `1` to `4` select an inventory slot and `.` idles. Whitespace is ignored.

use overworld_core::{Direction, Intent};
use thiserror::Error;

/// Errors raised while parsing a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    /// The character does not map to an intent.
    #[error("unknown script command {command:?} at position {position}")]
    UnknownCommand { command: char, position: usize },
}

/// Parsed sequence of per-tick intents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Script {
    steps: Vec<Option<Intent>>,
}

impl Script {
    pub(crate) fn parse(source: &str) -> Result<Self, ScriptError> {
        let steps = source
            .chars()
            .enumerate()
            .filter(|(_, command)| !command.is_whitespace())
            .map(|(position, command)| {
                translate(command).ok_or(ScriptError::UnknownCommand { command, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }

    /// Intent for `tick`; the script repeats once exhausted.
    pub(crate) fn intent_at(&self, tick: u64) -> Option<Intent> {
        if self.steps.is_empty() {
            return None;
        }
        let index = (tick % self.steps.len() as u64) as usize;
        self.steps[index]
    }
}

fn translate(command: char) -> Option<Option<Intent>> {
    let intent = match command.to_ascii_lowercase() {
        'w' => Intent::Move(Direction::Up),
        'a' => Intent::Move(Direction::Left),
        's' => Intent::Move(Direction::Down),
        'd' => Intent::Move(Direction::Right),
        'f' => Intent::Attack,
        '.' => return Some(None),
        digit @ '1'..='4' => Intent::SelectSlot(digit as u8 - b'1'),
        _ => return None,
    };
    Some(Some(intent))
}
