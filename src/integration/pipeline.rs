//! Per-frame pipeline from detections to motor commands, and the pick-up loop.

use log::{debug, info, warn};
use serde_json::json;

use crate::config::RobotConfig;
use crate::error::{ConfirmError, LiftError};
use crate::integration::serial::MotionSink;
use crate::integration::store::{MemoryStore, TaskStore};
use crate::integration::DetectionSource;
use crate::lifter::{Actuator, BoxLifter, Recovery, StandardRecovery};
use crate::motion::{CalibrationTable, CommandSelector, MovementCommand, pixel_to_cm};
use crate::tracker::{
    AssignmentConfig, PackageStatus, PackageTracker, TrackEvent, TrackedPackage, build_snapshots,
};

/// Result of processing one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub event: TrackEvent,
    /// Copy of the tracked package after this frame.
    pub target: Option<TrackedPackage>,
    /// Target offset in centimeters, when its position was observed this frame.
    pub offset_cm: Option<(f64, f64)>,
    pub commands: Vec<MovementCommand>,
}

impl FrameReport {
    /// Whether the target's position comes from this frame rather than an earlier one.
    pub fn is_fresh(&self) -> bool {
        self.offset_cm.is_some()
    }
}

/// A combined pipeline that bundles detection with package tracking.
///
/// This struct runs detection, letter assignment, distance classification,
/// tracking, pixel-to-centimeter conversion and command selection, strictly
/// in that order, once per frame.
pub struct FramePipeline<D: DetectionSource> {
    detector: D,
    assignment: AssignmentConfig,
    tracker: PackageTracker,
    selector: CommandSelector,
}

impl<D: DetectionSource> FramePipeline<D> {
    /// Create a new pipeline with the given detector and configuration.
    pub fn new(detector: D, config: &RobotConfig) -> Self {
        Self {
            detector,
            assignment: config.assignment.clone(),
            tracker: PackageTracker::new(config.tracker.clone()),
            selector: CommandSelector::new(CalibrationTable::standard(), config.selector.clone()),
        }
    }

    /// Create a new pipeline with default configuration.
    pub fn with_default_config(detector: D) -> Self {
        Self::new(detector, &RobotConfig::default())
    }

    /// Process a single frame.
    ///
    /// Commands are only produced when the target was seen in this frame; a
    /// held-over position after a miss yields none, so moves are never
    /// repeated for the same observation.
    pub fn process_frame(&mut self) -> Result<FrameReport, D::Error> {
        let boxes = self.detector.detect_boxes()?;
        let letters = self.detector.detect_letters()?;
        let snapshots = build_snapshots(&letters, &boxes, &self.assignment);

        let event = self.tracker.update(&snapshots);
        let fresh = match &event {
            TrackEvent::Started(_) | TrackEvent::Updated => true,
            TrackEvent::Dropped { replacement, .. } => replacement.is_some(),
            TrackEvent::Idle | TrackEvent::Missed { .. } => false,
        };

        let target = self.tracker.snapshot();
        let offset_cm = target.as_ref().filter(|_| fresh).map(|t| {
            let (px, py) = t.snapshot.position;
            pixel_to_cm(px as f64, py as f64)
        });
        let commands = offset_cm
            .map(|(x, y)| self.selector.select_commands(x, y))
            .unwrap_or_default();

        debug!(
            "frame {}: {:?}, offset {:?}, {} command(s)",
            self.tracker.frame_id(),
            event,
            offset_cm,
            commands.len()
        );
        Ok(FrameReport {
            event,
            target,
            offset_cm,
            commands,
        })
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &PackageTracker {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut PackageTracker {
        &mut self.tracker
    }

    pub fn selector(&self) -> &CommandSelector {
        &self.selector
    }
}

/// Outcome of one frame of the pick-up loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PickupProgress {
    /// No package tracked.
    Searching,
    /// Waiting for a fresh observation of the tracked package.
    Holding,
    /// Commands were sent to close in on the package.
    Approaching(Vec<MovementCommand>),
    /// A motion command could not be sent; the rest of the frame's commands
    /// were dropped.
    MotionFailed(ConfirmError),
    /// Aligned, but the lift attempt failed; try again next frame.
    Retrying(LiftError),
    /// The package is on the lifter.
    Lifted,
    /// The lift budget is exhausted.
    Failed(LiftError),
}

/// Drives approach and lift for one package, frame by frame.
pub struct PickupSession<D: DetectionSource, R: Recovery = StandardRecovery, S: TaskStore = MemoryStore> {
    pipeline: FramePipeline<D>,
    lifter: BoxLifter<R>,
    store: S,
}

impl<D: DetectionSource> PickupSession<D> {
    pub fn new(detector: D, config: &RobotConfig) -> Self {
        Self::with_parts(
            FramePipeline::new(detector, config),
            BoxLifter::new(config.lifter.clone()),
            MemoryStore::new(),
        )
    }
}

impl<D: DetectionSource, R: Recovery, S: TaskStore> PickupSession<D, R, S> {
    pub fn with_parts(pipeline: FramePipeline<D>, lifter: BoxLifter<R>, store: S) -> Self {
        Self {
            pipeline,
            lifter,
            store,
        }
    }

    pub fn pipeline(&self) -> &FramePipeline<D> {
        &self.pipeline
    }

    pub fn lifter(&self) -> &BoxLifter<R> {
        &self.lifter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one frame: approach while commands remain, lift once aligned
    /// on a `PASS` package.
    pub fn step<T: Actuator + MotionSink>(&mut self, io: &mut T) -> Result<PickupProgress, D::Error> {
        let report = self.pipeline.process_frame()?;
        let Some(target) = report.target.as_ref() else {
            return Ok(PickupProgress::Searching);
        };
        if !report.is_fresh() {
            return Ok(PickupProgress::Holding);
        }

        if !report.commands.is_empty() {
            for command in &report.commands {
                if let Err(err) = io.send_motion(command) {
                    warn!("failed to send {command}: {err}");
                    return Ok(PickupProgress::MotionFailed(err));
                }
            }
            return Ok(PickupProgress::Approaching(report.commands));
        }

        if target.snapshot.status != PackageStatus::Pass {
            debug!("aligned but status is {:?}", target.snapshot.status);
            return Ok(PickupProgress::Holding);
        }

        let progress = match self.lifter.lift_box(io) {
            Ok(()) => {
                info!("picked up {}", target.key());
                self.store.set_flag("box_lifted", true);
                self.store.put_object(
                    "package",
                    "lifted",
                    json!({
                        "package": target.snapshot,
                        "attempts": self.lifter.attempts(),
                    }),
                );
                self.pipeline.tracker_mut().reset();
                self.lifter.reset();
                PickupProgress::Lifted
            }
            Err(err) if err.is_terminal() => {
                warn!("giving up on {}: {err}", target.key());
                self.store.set_flag("box_lifted", false);
                PickupProgress::Failed(err)
            }
            Err(err) => PickupProgress::Retrying(err),
        };
        Ok(progress)
    }

    /// Run frames until the package is lifted, the lift budget runs out, or
    /// `max_frames` frames have passed.
    ///
    /// Returns `true` only when the package was lifted.
    pub fn run_box_tracking<T: Actuator + MotionSink>(
        &mut self,
        io: &mut T,
        max_frames: usize,
    ) -> Result<bool, D::Error> {
        for _ in 0..max_frames {
            match self.step(io)? {
                PickupProgress::Lifted => return Ok(true),
                PickupProgress::Failed(_) => return Ok(false),
                _ => {}
            }
        }
        Ok(false)
    }
}
