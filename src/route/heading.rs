//! Compass headings and turns relative to the robot.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Compass heading on the warehouse map.
///
/// Map coordinates grow to the east in `x` and to the south in `y`, the
/// same way as the map image they were digitized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Heading {
    N,
    E,
    S,
    W,
}

impl Heading {
    const CLOCKWISE: [Heading; 4] = [Heading::N, Heading::E, Heading::S, Heading::W];

    fn index(self) -> usize {
        match self {
            Self::N => 0,
            Self::E => 1,
            Self::S => 2,
            Self::W => 3,
        }
    }

    pub fn opposite(self) -> Self {
        Self::CLOCKWISE[(self.index() + 2) % 4]
    }

    /// Dominant compass direction of `delta`; `None` for a zero vector.
    ///
    /// Exact diagonals resolve to east/west.
    pub fn from_delta(delta: &Vector2<f64>) -> Option<Self> {
        let (dx, dy) = (delta.x, delta.y);
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(if dx.abs() >= dy.abs() {
            if dx > 0.0 { Self::E } else { Self::W }
        } else if dy < 0.0 {
            Self::N
        } else {
            Self::S
        })
    }

    /// Heading reached by applying `turn` to `self`.
    pub fn turned(self, turn: Turn) -> Self {
        Self::CLOCKWISE[(self.index() + turn.offset()) % 4]
    }
}

/// Turn relative to a reference heading.
///
/// Relative to the side the robot entered from, `Back` is straight through
/// and `Forward` returns the way it came; left and right follow the robot's
/// mounting, so the table in [`relative_turn`] must not be changed without
/// re-measuring it on the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Turn {
    Forward,
    Left,
    Right,
    Back,
}

impl Turn {
    /// Numeric code sent with a route.
    pub fn code(self) -> u8 {
        match self {
            Self::Forward => 1,
            Self::Left => 2,
            Self::Right => 3,
            Self::Back => 4,
        }
    }

    /// Clockwise quarter turns from the reference heading.
    fn offset(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Left => 1,
            Self::Back => 2,
            Self::Right => 3,
        }
    }
}

/// Classify `exit` relative to `reference`.
pub fn relative_turn(reference: Heading, exit: Heading) -> Turn {
    match (exit.index() + 4 - reference.index()) % 4 {
        0 => Turn::Forward,
        1 => Turn::Left,
        2 => Turn::Back,
        _ => Turn::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_delta() {
        assert_eq!(Heading::from_delta(&Vector2::new(0.0, -5.0)), Some(Heading::N));
        assert_eq!(Heading::from_delta(&Vector2::new(0.0, 5.0)), Some(Heading::S));
        assert_eq!(Heading::from_delta(&Vector2::new(7.0, 2.0)), Some(Heading::E));
        assert_eq!(Heading::from_delta(&Vector2::new(-7.0, 6.0)), Some(Heading::W));
        assert_eq!(Heading::from_delta(&Vector2::zeros()), None);
    }

    #[test]
    fn test_turn_table_from_north() {
        assert_eq!(relative_turn(Heading::N, Heading::N), Turn::Forward);
        assert_eq!(relative_turn(Heading::N, Heading::S), Turn::Back);
        assert_eq!(relative_turn(Heading::N, Heading::W), Turn::Right);
        assert_eq!(relative_turn(Heading::N, Heading::E), Turn::Left);
    }

    #[test]
    fn test_turned_inverts_relative_turn() {
        for reference in Heading::CLOCKWISE {
            for exit in Heading::CLOCKWISE {
                let turn = relative_turn(reference, exit);
                assert_eq!(reference.turned(turn), exit);
            }
            assert_eq!(reference.opposite().opposite(), reference);
        }
    }
}
