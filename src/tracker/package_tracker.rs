//! Single-package tracker driven once per captured frame.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::tracker::package::{PackageKey, PackageSnapshot, TrackedPackage};
use crate::tracker::priority::select_best_excluding;
use crate::tracker::track_state::TrackState;

/// Configuration for the PackageTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Consecutive misses tolerated for a lettered package before it is dropped.
    pub miss_threshold: u32,
    /// Largest accepted frame-to-frame change of the pixel distance.
    pub distance_jump_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            miss_threshold: 5,
            distance_jump_threshold: 150.0,
        }
    }
}

/// Why a tracked package was let go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// A letterless package was not seen this frame.
    Vanished,
    /// A lettered package was missed more than `miss_threshold` frames in a row.
    MissThreshold,
    /// The match moved further than `distance_jump_threshold` in one frame.
    DistanceJump,
}

/// What one call to [`PackageTracker::update`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackEvent {
    /// Nothing tracked and nothing selectable.
    Idle,
    /// A new package was selected from an idle state.
    Started(PackageKey),
    /// The tracked package was matched and refreshed.
    Updated,
    /// The tracked package was not seen; its last position is held.
    Missed { misses: u32 },
    /// The tracked package was dropped, possibly replaced in the same frame.
    Dropped {
        previous: PackageKey,
        reason: DropReason,
        replacement: Option<PackageKey>,
    },
}

/// Keeps at most one package tracked across frames.
///
/// Owned by the frame loop; readers get clones through
/// [`PackageTracker::snapshot`].
#[derive(Debug, Clone)]
pub struct PackageTracker {
    tracked: Option<TrackedPackage>,
    frame_id: u64,
    config: TrackerConfig,
}

impl Default for PackageTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl PackageTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracked: None,
            frame_id: 0,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn state(&self) -> TrackState {
        if self.tracked.is_some() {
            TrackState::Tracking
        } else {
            TrackState::NoneTracked
        }
    }

    pub fn tracked(&self) -> Option<&TrackedPackage> {
        self.tracked.as_ref()
    }

    /// Owned copy of the tracked package for consumers outside the loop.
    pub fn snapshot(&self) -> Option<TrackedPackage> {
        self.tracked.clone()
    }

    /// Number of frames processed so far.
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Forget the tracked package, e.g. after it has been picked up.
    pub fn reset(&mut self) {
        self.tracked = None;
    }

    /// Fold the snapshots of one frame into the tracker state.
    ///
    /// Must be called exactly once per frame: miss counting relies on it.
    pub fn update(&mut self, snapshots: &[PackageSnapshot]) -> TrackEvent {
        self.frame_id += 1;

        let Some(tracked) = self.tracked.as_mut() else {
            return match self.select(snapshots, None) {
                Some(key) => TrackEvent::Started(key),
                None => TrackEvent::Idle,
            };
        };

        let key = tracked.key();
        let Some(found) = snapshots.iter().find(|s| s.matches(&key)) else {
            if !tracked.has_letters() {
                debug!("frame {}: letterless {} vanished", self.frame_id, key);
                self.tracked = None;
                let replacement = self.select(snapshots, None);
                return TrackEvent::Dropped {
                    previous: key,
                    reason: DropReason::Vanished,
                    replacement,
                };
            }

            tracked.miss_detections += 1;
            let misses = tracked.miss_detections;
            if misses > self.config.miss_threshold {
                info!("frame {}: lost {} after {} misses", self.frame_id, key, misses);
                self.tracked = None;
                return TrackEvent::Dropped {
                    previous: key,
                    reason: DropReason::MissThreshold,
                    replacement: None,
                };
            }
            debug!("frame {}: {} missed ({}/{})", self.frame_id, key, misses, self.config.miss_threshold);
            return TrackEvent::Missed { misses };
        };

        if let (Some(old), Some(new)) = (tracked.snapshot.distance, found.distance) {
            if (new - old).abs() > self.config.distance_jump_threshold {
                warn!(
                    "frame {}: {} jumped from {:.1} to {:.1}, reselecting",
                    self.frame_id, key, old, new
                );
                self.tracked = None;
                let replacement = self.select(snapshots, Some(&key));
                return TrackEvent::Dropped {
                    previous: key,
                    reason: DropReason::DistanceJump,
                    replacement,
                };
            }
        }

        tracked.snapshot = found.clone();
        tracked.miss_detections = 0;
        TrackEvent::Updated
    }

    fn select(&mut self, snapshots: &[PackageSnapshot], exclude: Option<&PackageKey>) -> Option<PackageKey> {
        let best = select_best_excluding(snapshots, exclude)?;
        let key = best.key();
        info!(
            "frame {}: tracking {} at {:?} (distance {:?})",
            self.frame_id, key, best.position, best.distance
        );
        self.tracked = Some(TrackedPackage::new(best.clone()));
        Some(key)
    }
}
