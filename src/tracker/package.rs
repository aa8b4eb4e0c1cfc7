//! Per-frame package records and the long-lived tracked package.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tracker::rect::Rect;

/// A single labeled object observed in one frame.
///
/// Produced by the box and letter detectors; `x`/`y` is the pixel center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Detection {
    pub fn new(label: impl Into<String>, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_xywh(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

/// Box color reported by the box detector.
///
/// Unrecognized labels are kept verbatim so that identity matching still
/// works for them; they simply rank last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BoxColor {
    Blue,
    Red,
    Sample,
    Green,
    Other(String),
}

impl BoxColor {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Blue" => Self::Blue,
            "Red" => Self::Red,
            "Sample" => Self::Sample,
            "Green" => Self::Green,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Blue => "Blue",
            Self::Red => "Red",
            Self::Sample => "Sample",
            Self::Green => "Green",
            Self::Other(label) => label,
        }
    }

    /// Pick-up priority, lower is picked first.
    pub fn rank(&self) -> u32 {
        match self {
            Self::Blue => 1,
            Self::Red => 2,
            Self::Sample => 3,
            Self::Green => 4,
            Self::Other(_) => 999,
        }
    }
}

impl From<String> for BoxColor {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<BoxColor> for String {
    fn from(color: BoxColor) -> Self {
        color.as_str().to_string()
    }
}

impl fmt::Display for BoxColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter printed on a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Letter {
    A,
    K,
    O,
    Other(String),
}

impl Letter {
    pub fn from_label(label: &str) -> Self {
        match label {
            "A" => Self::A,
            "K" => Self::K,
            "O" => Self::O,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::K => "K",
            Self::O => "O",
            Self::Other(label) => label,
        }
    }

    pub fn rank(&self) -> u32 {
        match self {
            Self::A => 1,
            Self::K => 2,
            Self::O => 3,
            Self::Other(_) => 999,
        }
    }
}

impl From<String> for Letter {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<Letter> for String {
    fn from(letter: Letter) -> Self {
        letter.as_str().to_string()
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance classification of a box relative to the placement zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageStatus {
    Pass,
    Close,
    Rejected,
    #[default]
    Unknown,
}

/// Identity of a package across frames: its color plus the set of letters on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageKey {
    pub color: BoxColor,
    pub letters: BTreeSet<Letter>,
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.color)?;
        for (i, letter) in self.letters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{letter}")?;
        }
        f.write_str("]")
    }
}

/// A detected box merged with the letters found on it, for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSnapshot {
    pub color: BoxColor,
    pub letters: BTreeSet<Letter>,
    /// Pixel center of the box.
    pub position: (i32, i32),
    /// Pixel width and height, if known.
    pub size: Option<(i32, i32)>,
    /// Pixel distance to the reference zone center, once classified.
    pub distance: Option<f64>,
    pub status: PackageStatus,
}

impl PackageSnapshot {
    pub fn new(color: BoxColor, position: (i32, i32)) -> Self {
        Self {
            color,
            letters: BTreeSet::new(),
            position,
            size: None,
            distance: None,
            status: PackageStatus::Unknown,
        }
    }

    /// Build a snapshot from a box detection, with no letters attached yet.
    pub fn from_box(detection: &Detection) -> Self {
        Self {
            size: Some((detection.width, detection.height)),
            ..Self::new(
                BoxColor::from_label(&detection.label),
                (detection.x, detection.y),
            )
        }
    }

    pub fn with_letters<I, S>(mut self, letters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.letters = letters
            .into_iter()
            .map(|l| Letter::from_label(l.as_ref()))
            .collect();
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_status(mut self, status: PackageStatus) -> Self {
        self.status = status;
        self
    }

    pub fn key(&self) -> PackageKey {
        PackageKey {
            color: self.color.clone(),
            letters: self.letters.clone(),
        }
    }

    /// Same color and exactly the same set of letters.
    pub fn matches(&self, key: &PackageKey) -> bool {
        self.color == key.color && self.letters == key.letters
    }

    /// Best (lowest) rank among the letters on this package.
    pub fn letter_rank(&self) -> u32 {
        self.letters.iter().map(Letter::rank).min().unwrap_or(999)
    }
}

/// The package currently followed by the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedPackage {
    pub snapshot: PackageSnapshot,
    /// Consecutive frames in which the package was not seen.
    pub miss_detections: u32,
}

impl TrackedPackage {
    pub fn new(snapshot: PackageSnapshot) -> Self {
        Self {
            snapshot,
            miss_detections: 0,
        }
    }

    pub fn key(&self) -> PackageKey {
        self.snapshot.key()
    }

    pub fn has_letters(&self) -> bool {
        !self.snapshot.letters.is_empty()
    }
}
