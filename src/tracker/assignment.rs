//! Folding raw detections into per-frame package snapshots.

use serde::{Deserialize, Serialize};

use crate::tracker::package::{Detection, Letter, PackageSnapshot, PackageStatus};

/// Parameters for turning detections into classified snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    /// Margin added around a box when checking whether a letter lies on it.
    pub letter_threshold_px: f32,
    /// Pixel center of the pick-up zone the distance is measured against.
    pub reference_center: (f64, f64),
    /// Distances up to this value are `PASS`.
    pub pass_threshold: f64,
    /// Distances above this value are `REJECTED`.
    pub max_threshold: f64,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            letter_threshold_px: 10.0,
            reference_center: (256.0, 412.0),
            pass_threshold: 40.0,
            max_threshold: 300.0,
        }
    }
}

/// Attach each letter to the box it lies on.
///
/// A letter belongs to a box when its bounding box fits inside the box grown
/// by `threshold_px` on every side. When several boxes qualify the letter
/// goes to the one with the nearest center. Letters that fit no box are
/// dropped. Returned snapshots keep the order of `boxes` and have no
/// distance yet.
pub fn assign_letters_to_boxes(
    letters: &[Detection],
    boxes: &[Detection],
    threshold_px: f32,
) -> Vec<PackageSnapshot> {
    let box_rects: Vec<_> = boxes.iter().map(Detection::rect).collect();
    let mut snapshots: Vec<PackageSnapshot> = boxes.iter().map(PackageSnapshot::from_box).collect();

    for letter in letters {
        let letter_rect = letter.rect();
        let owner = box_rects
            .iter()
            .enumerate()
            .filter(|(_, rect)| rect.expand(threshold_px).contains(&letter_rect))
            .min_by(|(_, a), (_, b)| {
                a.center_distance(&letter_rect)
                    .total_cmp(&b.center_distance(&letter_rect))
            })
            .map(|(idx, _)| idx);

        if let Some(idx) = owner {
            snapshots[idx]
                .letters
                .insert(Letter::from_label(&letter.label));
        }
    }

    snapshots
}

/// Measure each snapshot's distance to `reference_center` and classify it.
///
/// `PASS` when the distance is at most `pass_threshold`, `REJECTED` when it
/// exceeds `max_threshold`, `CLOSE` otherwise.
pub fn classify_distance(
    snapshots: &mut [PackageSnapshot],
    reference_center: (f64, f64),
    pass_threshold: f64,
    max_threshold: f64,
) {
    for snapshot in snapshots.iter_mut() {
        let dx = snapshot.position.0 as f64 - reference_center.0;
        let dy = snapshot.position.1 as f64 - reference_center.1;
        let distance = (dx * dx + dy * dy).sqrt();

        snapshot.distance = Some(distance);
        snapshot.status = if distance <= pass_threshold {
            PackageStatus::Pass
        } else if distance > max_threshold {
            PackageStatus::Rejected
        } else {
            PackageStatus::Close
        };
    }
}

/// Run assignment and classification with one configuration.
pub fn build_snapshots(
    letters: &[Detection],
    boxes: &[Detection],
    config: &AssignmentConfig,
) -> Vec<PackageSnapshot> {
    let mut snapshots = assign_letters_to_boxes(letters, boxes, config.letter_threshold_px);
    classify_distance(
        &mut snapshots,
        config.reference_center,
        config.pass_threshold,
        config.max_threshold,
    );
    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::package::BoxColor;

    #[test]
    fn test_letter_assigned_to_enclosing_box() {
        let boxes = vec![
            Detection::new("Green", 100, 100, 60, 60),
            Detection::new("Red", 300, 100, 60, 60),
        ];
        let letters = vec![Detection::new("A", 105, 95, 20, 20)];

        let snaps = assign_letters_to_boxes(&letters, &boxes, 5.0);
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].color, BoxColor::Green);
        assert!(snaps[0].letters.contains(&Letter::A));
        assert!(snaps[1].letters.is_empty());
        assert_eq!(snaps[0].size, Some((60, 60)));
    }

    #[test]
    fn test_letter_on_edge_needs_threshold() {
        let boxes = vec![Detection::new("Blue", 100, 100, 40, 40)];
        // Letter pokes 4 px past the right edge of the box.
        let letters = vec![Detection::new("K", 114, 100, 20, 20)];

        assert!(assign_letters_to_boxes(&letters, &boxes, 2.0)[0].letters.is_empty());
        assert!(assign_letters_to_boxes(&letters, &boxes, 4.0)[0].letters.contains(&Letter::K));
    }

    #[test]
    fn test_overlapping_boxes_prefer_nearest_center() {
        let boxes = vec![
            Detection::new("Blue", 100, 100, 100, 100),
            Detection::new("Red", 120, 100, 100, 100),
        ];
        let letters = vec![Detection::new("O", 125, 100, 10, 10)];

        let snaps = assign_letters_to_boxes(&letters, &boxes, 0.0);
        assert!(snaps[0].letters.is_empty());
        assert!(snaps[1].letters.contains(&Letter::O));
    }

    #[test]
    fn test_classify_distance_thresholds() {
        let mut snaps = vec![
            PackageSnapshot::new(BoxColor::Green, (0, 30)),
            PackageSnapshot::new(BoxColor::Green, (0, 100)),
            PackageSnapshot::new(BoxColor::Green, (0, 301)),
        ];
        classify_distance(&mut snaps, (0.0, 0.0), 30.0, 300.0);

        assert_eq!(snaps[0].status, PackageStatus::Pass);
        assert_eq!(snaps[1].status, PackageStatus::Close);
        assert_eq!(snaps[2].status, PackageStatus::Rejected);
        assert_eq!(snaps[1].distance, Some(100.0));
    }
}
