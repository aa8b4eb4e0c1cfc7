//! Error types shared across the crate.

use std::time::Duration;

use crate::lifter::LiftStep;
use crate::route::NodeId;

/// Invalid calibration data.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("distance grid has shape {got:?}, expected {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
}

/// Failures while waiting for the actuator layer to confirm a command.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmError {
    #[error("no confirmation after {waited:?}")]
    Timeout { waited: Duration },
    #[error("wait cancelled")]
    Cancelled,
    #[error("controller rejected command (0x{0:02x})")]
    Nack(u8),
    #[error("serial link failure: {0}")]
    Link(String),
}

/// Failures of one pick-up attempt.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LiftError {
    /// Recovery asked to abandon this attempt; the caller may try again.
    #[error("recovery stepped down during {step:?}")]
    StepDown { step: LiftStep },
    /// A step still failed after recovery claimed to have fixed it.
    #[error("{step:?} failed after recovery")]
    StepFailed { step: LiftStep },
    /// The overall attempt budget is used up.
    #[error("gave up after {attempts} lift attempts")]
    BudgetExhausted { attempts: u32 },
}

impl LiftError {
    /// Whether re-invoking the lifter can still succeed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::BudgetExhausted { .. })
    }
}

/// Failures of the route resolver.
#[derive(thiserror::Error, Debug)]
pub enum RouteError {
    #[error("unknown zone '{0}'")]
    UnknownZone(String),
    #[error("alias '{alias}' is already used by zone {zone}")]
    AliasTaken { alias: String, zone: u32 },
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },
    #[error("node {0} is defined more than once")]
    DuplicateNode(NodeId),
    #[error("schema references unknown node {0}")]
    DanglingReference(NodeId),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures while loading configuration or schema files.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
