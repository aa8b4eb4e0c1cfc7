//! Turning a centimeter offset into motor commands.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::motion::calibration::{CalibrationTable, closest_lateral};
use crate::motion::command::{Direction, DynamicCommand, MovementCommand, Speed};

/// Tolerances of the command selectors, in centimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Lateral offsets up to this magnitude are not corrected.
    pub lateral_tolerance_cm: f64,
    /// Forward offsets up to this value are not corrected.
    pub forward_tolerance_cm: f64,
    /// Dead band of [`CommandSelector::dynamic_command`] on both axes.
    pub dynamic_tolerance_cm: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            lateral_tolerance_cm: 1.0,
            forward_tolerance_cm: 1.0,
            dynamic_tolerance_cm: 1.5,
        }
    }
}

/// Axis a planned move corrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Backward,
    Lateral,
    Forward,
}

/// A selected command together with the tabulated distance it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedMove {
    pub axis: Axis,
    pub command: MovementCommand,
    pub distance_cm: f64,
}

/// Picks motor commands from the calibration tables.
#[derive(Debug, Clone, Default)]
pub struct CommandSelector {
    table: CalibrationTable,
    config: SelectorConfig,
}

impl CommandSelector {
    pub fn new(table: CalibrationTable, config: SelectorConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &CalibrationTable {
        &self.table
    }

    /// Plan at most one move per axis: backward, then lateral, then forward.
    ///
    /// Forward moves never overshoot the target. Backward and lateral moves
    /// may, since overrunning in those directions cannot push the package
    /// out of the pick-up zone. An axis with no usable table entry is
    /// skipped.
    pub fn plan(&self, x_cm: f64, y_cm: f64) -> Vec<PlannedMove> {
        let mut moves = Vec::with_capacity(3);

        if y_cm < 0.0 {
            let target = y_cm.abs();
            // Fall back to the longest move; the residual is left for the next frame.
            let entry = self
                .table
                .backward
                .smallest_at_least(target)
                .or_else(|| self.table.backward.largest());
            if let Some(e) = entry {
                moves.push(PlannedMove {
                    axis: Axis::Backward,
                    command: MovementCommand::new(e.ticks, Direction::Backward, Speed::Uniform(e.speed)),
                    distance_cm: e.distance_cm,
                });
            }
        }

        if x_cm.abs() > self.config.lateral_tolerance_cm {
            let (entries, direction) = if x_cm < 0.0 {
                (&self.table.right, Direction::Right)
            } else {
                (&self.table.left, Direction::Left)
            };
            if let Some(e) = closest_lateral(entries, x_cm.abs()) {
                moves.push(PlannedMove {
                    axis: Axis::Lateral,
                    command: MovementCommand::new(e.ticks, direction, Speed::PerWheel(e.speed)),
                    distance_cm: e.distance_cm,
                });
            }
        }

        if y_cm > self.config.forward_tolerance_cm {
            match self.table.forward.largest_not_exceeding(y_cm) {
                Some(e) => moves.push(PlannedMove {
                    axis: Axis::Forward,
                    command: MovementCommand::new(e.ticks, Direction::Forward, Speed::Uniform(e.speed)),
                    distance_cm: e.distance_cm,
                }),
                None => debug!("no forward move short enough for {y_cm} cm, skipping"),
            }
        }

        for m in &moves {
            debug!("offset ({x_cm}, {y_cm}) cm: {} covers {} cm", m.command, m.distance_cm);
        }
        moves
    }

    /// Commands for the offset `(x_cm, y_cm)`, see [`CommandSelector::plan`].
    pub fn select_commands(&self, x_cm: f64, y_cm: f64) -> Vec<MovementCommand> {
        self.plan(x_cm, y_cm).into_iter().map(|m| m.command).collect()
    }

    /// Single qualitative command for coarse approach.
    ///
    /// The lateral axis is corrected first; `Stop` once both axes are inside
    /// the dead band.
    pub fn dynamic_command(&self, x_cm: f64, y_cm: f64) -> DynamicCommand {
        let tolerance = self.config.dynamic_tolerance_cm;
        if x_cm.abs() > tolerance {
            if x_cm < 0.0 {
                DynamicCommand::Right
            } else {
                DynamicCommand::Left
            }
        } else if y_cm.abs() > tolerance {
            if y_cm > 0.0 {
                DynamicCommand::Forward
            } else {
                DynamicCommand::Back
            }
        } else {
            DynamicCommand::Stop
        }
    }
}
