//! Discrete motion commands understood by the motor controller.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Command class byte; this crate only ever emits motion commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CommandClass {
    #[default]
    Motion,
}

impl CommandClass {
    pub fn code(self) -> u8 {
        match self {
            Self::Motion => 1,
        }
    }
}

/// Drive direction of a motion command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Stop,
    Forward,
    Backward,
    ForwardLeft,
    ForwardRight,
    BackwardLeft,
    BackwardRight,
    RotateLeft,
    RotateRight,
    Left,
    Right,
}

impl Direction {
    /// Direction code as sent to the motor controller.
    pub fn code(self) -> u8 {
        match self {
            Self::Stop => 0,
            Self::Forward => 1,
            Self::Backward => 2,
            Self::ForwardLeft => 3,
            Self::ForwardRight => 4,
            Self::BackwardLeft => 5,
            Self::BackwardRight => 6,
            Self::RotateLeft => 7,
            Self::RotateRight => 8,
            Self::Left => 9,
            Self::Right => 10,
        }
    }
}

/// Wheel speed: one value for all wheels, or one per wheel
/// (front-left, front-right, rear-left, rear-right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speed {
    Uniform(u8),
    PerWheel([u8; 4]),
}

impl Speed {
    pub fn wheels(&self) -> [u8; 4] {
        match *self {
            Self::Uniform(s) => [s; 4],
            Self::PerWheel(w) => w,
        }
    }
}

/// One motor command: drive `direction` at `speed` for `ticks` controller ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementCommand {
    pub class: CommandClass,
    pub ticks: u16,
    pub direction: Direction,
    pub speed: Speed,
}

impl MovementCommand {
    pub fn new(ticks: u16, direction: Direction, speed: Speed) -> Self {
        Self {
            class: CommandClass::Motion,
            ticks,
            direction,
            speed,
        }
    }

    pub fn stop() -> Self {
        Self::new(0, Direction::Stop, Speed::Uniform(0))
    }
}

impl fmt::Display for MovementCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} x{} ", self.direction, self.ticks)?;
        match self.speed {
            Speed::Uniform(s) => write!(f, "@{s}"),
            Speed::PerWheel([a, b, c, d]) => write!(f, "@[{a},{b},{c},{d}]"),
        }
    }
}

/// Coarse command of the tolerance-based selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DynamicCommand {
    Left,
    Right,
    Forward,
    Back,
    Stop,
}
