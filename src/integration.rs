//! Integration module for connecting the robot's hardware and services with
//! the package tracker.
//!
//! This module provides traits for detectors, the serial motor link, the tag
//! reader and the task store, plus the per-frame pipeline that ties them
//! together.

mod builder;
mod detector;
mod pipeline;
mod serial;
mod store;
mod tag_reader;

pub use builder::DetectionBuilder;
pub use detector::DetectionSource;
pub use pipeline::{FramePipeline, FrameReport, PickupProgress, PickupSession};
pub use serial::{MotionSink, OutgoingFrame, SerialActuator, SerialLink};
pub use store::{MemoryStore, TaskStore};
pub use tag_reader::{TagRead, TagReader, poll_tag, record_checkpoint};
