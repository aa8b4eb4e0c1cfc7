//! Choosing which visible package to go after.

use std::cmp::Ordering;

use crate::tracker::package::{PackageKey, PackageSnapshot};

/// Pick the highest-priority package among those with a known distance.
///
/// Packages are ordered by `(distance, color rank, best letter rank)`, all
/// ascending. Proximity dominates, so a letterless box can win over a
/// lettered one that is further away. Equal keys keep input order.
pub fn select_best(snapshots: &[PackageSnapshot]) -> Option<&PackageSnapshot> {
    select_best_excluding(snapshots, None)
}

/// Like [`select_best`], skipping every snapshot that matches `exclude`.
pub fn select_best_excluding<'a>(
    snapshots: &'a [PackageSnapshot],
    exclude: Option<&PackageKey>,
) -> Option<&'a PackageSnapshot> {
    snapshots
        .iter()
        .filter(|s| s.distance.is_some())
        .filter(|s| exclude.is_none_or(|key| !s.matches(key)))
        .min_by(|a, b| compare_priority(a, b))
}

fn compare_priority(a: &PackageSnapshot, b: &PackageSnapshot) -> Ordering {
    let da = a.distance.unwrap_or(f64::INFINITY);
    let db = b.distance.unwrap_or(f64::INFINITY);
    da.total_cmp(&db)
        .then_with(|| a.color.rank().cmp(&b.color.rank()))
        .then_with(|| a.letter_rank().cmp(&b.letter_rank()))
}
