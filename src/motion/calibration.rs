//! Hand-measured distance tables for the motor controller.
//!
//! Forward and backward moves are measured on a grid of tick counts by
//! uniform wheel speeds. Lateral (strafe) moves use per-wheel speeds tuned
//! to keep the robot from rotating, so each tick count has its own speed
//! vector.

use ndarray::{Array2, array};

use crate::error::CalibrationError;

/// One cell of a [`LinearTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearEntry {
    pub ticks: u16,
    pub speed: u8,
    pub distance_cm: f64,
}

/// Distances for `(ticks, speed)` pairs, rows indexed by ticks and columns by speed.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearTable {
    ticks: Vec<u16>,
    speeds: Vec<u8>,
    distances: Array2<f64>,
}

impl LinearTable {
    pub fn new(
        ticks: Vec<u16>,
        speeds: Vec<u8>,
        distances: Array2<f64>,
    ) -> Result<Self, CalibrationError> {
        let expected = (ticks.len(), speeds.len());
        if distances.dim() != expected {
            return Err(CalibrationError::ShapeMismatch {
                expected,
                got: distances.dim(),
            });
        }
        Ok(Self {
            ticks,
            speeds,
            distances,
        })
    }

    /// All cells in row-major order (by ticks, then speed).
    pub fn entries(&self) -> impl Iterator<Item = LinearEntry> + '_ {
        self.distances
            .indexed_iter()
            .map(|((row, col), &distance_cm)| LinearEntry {
                ticks: self.ticks[row],
                speed: self.speeds[col],
                distance_cm,
            })
    }

    /// Largest distance that does not exceed `target_cm`.
    pub fn largest_not_exceeding(&self, target_cm: f64) -> Option<LinearEntry> {
        self.entries()
            .filter(|e| e.distance_cm <= target_cm)
            .fold(None, |best: Option<LinearEntry>, e| match best {
                Some(b) if b.distance_cm >= e.distance_cm => Some(b),
                _ => Some(e),
            })
    }

    /// Smallest distance that reaches at least `target_cm`.
    pub fn smallest_at_least(&self, target_cm: f64) -> Option<LinearEntry> {
        self.entries()
            .filter(|e| e.distance_cm >= target_cm)
            .fold(None, |best: Option<LinearEntry>, e| match best {
                Some(b) if b.distance_cm <= e.distance_cm => Some(b),
                _ => Some(e),
            })
    }

    pub fn largest(&self) -> Option<LinearEntry> {
        self.largest_not_exceeding(f64::INFINITY)
    }
}

/// One measured strafe move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralEntry {
    pub ticks: u16,
    pub speed: [u8; 4],
    pub distance_cm: f64,
}

impl LateralEntry {
    const fn new(ticks: u16, speed: [u8; 4], distance_cm: f64) -> Self {
        Self {
            ticks,
            speed,
            distance_cm,
        }
    }
}

/// Entry whose distance is closest to `target_cm`, over- or undershooting.
///
/// The first entry wins when two are equally close.
pub fn closest_lateral(entries: &[LateralEntry], target_cm: f64) -> Option<LateralEntry> {
    entries.iter().copied().fold(None, |best: Option<LateralEntry>, e| match best {
        Some(b) if (b.distance_cm - target_cm).abs() <= (e.distance_cm - target_cm).abs() => Some(b),
        _ => Some(e),
    })
}

/// The complete set of movement calibration data.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTable {
    pub forward: LinearTable,
    pub backward: LinearTable,
    pub left: Vec<LateralEntry>,
    pub right: Vec<LateralEntry>,
}

const TICKS: [u16; 8] = [1, 2, 3, 4, 5, 6, 7, 8];
const SPEEDS: [u8; 4] = [30, 40, 50, 60];

const LEFT: [LateralEntry; 8] = [
    LateralEntry::new(1, [45, 45, 45, 45], 1.5),
    LateralEntry::new(2, [45, 45, 45, 45], 3.0),
    LateralEntry::new(3, [45, 47, 45, 47], 4.5),
    LateralEntry::new(4, [45, 47, 45, 47], 6.5),
    LateralEntry::new(5, [50, 52, 50, 52], 8.5),
    LateralEntry::new(6, [50, 52, 50, 52], 10.5),
    LateralEntry::new(8, [55, 58, 55, 58], 14.5),
    LateralEntry::new(10, [55, 58, 55, 58], 18.5),
];

const RIGHT: [LateralEntry; 8] = [
    LateralEntry::new(1, [45, 45, 45, 45], 1.5),
    LateralEntry::new(2, [45, 45, 45, 45], 3.0),
    LateralEntry::new(3, [47, 45, 47, 45], 5.0),
    LateralEntry::new(4, [47, 45, 47, 45], 6.5),
    LateralEntry::new(5, [52, 50, 52, 50], 8.0),
    LateralEntry::new(6, [52, 50, 52, 50], 10.0),
    LateralEntry::new(8, [58, 55, 58, 55], 14.0),
    LateralEntry::new(10, [58, 55, 58, 55], 18.0),
];

impl CalibrationTable {
    /// Tables measured on the production robot.
    pub fn standard() -> Self {
        let forward = array![
            [1.5, 2.0, 2.5, 3.0],
            [3.0, 4.0, 5.0, 6.5],
            [4.5, 6.0, 7.5, 9.5],
            [6.0, 8.0, 10.5, 13.0],
            [7.5, 10.0, 13.0, 16.0],
            [9.0, 12.5, 15.5, 19.5],
            [10.5, 14.5, 18.5, 23.0],
            [12.0, 16.5, 21.0, 26.5],
        ];
        let backward = array![
            [1.0, 1.5, 2.0, 2.5],
            [2.5, 3.5, 4.5, 5.5],
            [4.0, 5.5, 7.0, 8.5],
            [5.5, 7.5, 9.5, 12.0],
            [7.0, 9.5, 12.0, 15.0],
            [8.5, 11.5, 14.5, 18.0],
            [10.0, 13.5, 17.0, 21.5],
            [11.5, 15.5, 19.5, 25.0],
        ];

        Self {
            forward: LinearTable {
                ticks: TICKS.to_vec(),
                speeds: SPEEDS.to_vec(),
                distances: forward,
            },
            backward: LinearTable {
                ticks: TICKS.to_vec(),
                speeds: SPEEDS.to_vec(),
                distances: backward,
            },
            left: LEFT.to_vec(),
            right: RIGHT.to_vec(),
        }
    }
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self::standard()
    }
}
