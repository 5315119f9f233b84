//! Discrete input intents emitted by action nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Movement direction relative to where the player is facing.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

/// A single intent for the input collaborator.
///
/// Commands have no identity beyond the tick that produced them and are
/// consumed exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    /// Point the crosshair at a screen position.
    Aim { x: f32, y: f32 },
    /// Start (or keep) walking in a direction.
    Move { direction: Direction },
    /// Release all movement keys.
    StopMoving,
    /// Primary attack / swing the held tool.
    Fire,
    /// Use whatever is under the crosshair (pick up, open, harvest).
    Interact,
    /// Consume a food item from the inventory.
    Eat,
    /// Place a building part.
    Build,
    /// Start crafting the queued recipe.
    Craft,
}

impl Command {
    pub fn aim(x: f32, y: f32) -> Self {
        Command::Aim { x, y }
    }

    pub fn walk(direction: Direction) -> Self {
        Command::Move { direction }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Aim { x, y } => write!(f, "aim({:.0}, {:.0})", x, y),
            Command::Move { direction } => write!(f, "move({})", direction),
            Command::StopMoving => write!(f, "stop_moving"),
            Command::Fire => write!(f, "fire"),
            Command::Interact => write!(f, "interact"),
            Command::Eat => write!(f, "eat"),
            Command::Build => write!(f, "build"),
            Command::Craft => write!(f, "craft"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_compact() {
        assert_eq!(Command::aim(960.4, 540.0).to_string(), "aim(960, 540)");
        assert_eq!(Command::walk(Direction::Left).to_string(), "move(left)");
        assert_eq!(Command::Fire.to_string(), "fire");
    }

    #[test]
    fn json_uses_kind_tag() {
        let json = serde_json::to_string(&Command::walk(Direction::Forward)).unwrap();
        assert_eq!(json, r#"{"kind":"move","direction":"forward"}"#);
    }
}
