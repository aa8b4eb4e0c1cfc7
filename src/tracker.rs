mod assignment;
mod package;
mod package_tracker;
mod priority;
mod rect;
mod track_state;

pub use assignment::{AssignmentConfig, assign_letters_to_boxes, build_snapshots, classify_distance};
pub use package::{
    BoxColor, Detection, Letter, PackageKey, PackageSnapshot, PackageStatus, TrackedPackage,
};
pub use package_tracker::{DropReason, PackageTracker, TrackEvent, TrackerConfig};
pub use priority::{select_best, select_best_excluding};
pub use rect::Rect;
pub use track_state::TrackState;
