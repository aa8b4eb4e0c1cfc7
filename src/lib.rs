//! Perception, motion and navigation core of a warehouse pick-up robot.
//!
//! Per camera frame, box and letter detections are merged into package
//! snapshots, one package is tracked across frames, its pixel position is
//! converted to ground centimeters and turned into calibrated motor commands.
//! Once aligned, the [`lifter::BoxLifter`] runs the arm and grip sequence.
//! Between zones, [`route::RouteResolver`] plans paths with turn codes and
//! the tag checkpoints expected along them.

pub mod config;
pub mod error;
pub mod integration;
pub mod lifter;
pub mod motion;
pub mod route;
pub mod tracker;

pub use config::RobotConfig;
pub use error::{CalibrationError, ConfigError, ConfirmError, LiftError, RouteError};
pub use integration::{DetectionSource, FramePipeline, FrameReport, PickupSession};
pub use lifter::BoxLifter;
pub use motion::{CommandSelector, MovementCommand, pixel_to_cm};
pub use route::{Route, RouteResolver};
pub use tracker::{Detection, PackageSnapshot, PackageTracker, TrackEvent};
