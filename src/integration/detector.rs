//! Trait for the box and letter detectors feeding the tracker.

use crate::tracker::Detection;

/// Source of per-frame detections.
///
/// Implement this trait to connect the camera and detection models to the
/// pipeline. Each call pair describes the newest captured frame; the order
/// of the returned detections carries no meaning.
///
/// # Example
///
/// ```ignore
/// use warehouse_bot::integration::DetectionSource;
/// use warehouse_bot::tracker::Detection;
///
/// struct MyDetector {
///     // Your camera and models here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect_boxes(&mut self) -> Result<Vec<Detection>, Self::Error> {
///         Ok(vec![])
///     }
///
///     fn detect_letters(&mut self) -> Result<Vec<Detection>, Self::Error> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Colored boxes in the current frame; labels are color names.
    fn detect_boxes(&mut self) -> Result<Vec<Detection>, Self::Error>;

    /// Printed letters in the current frame; labels are the letters.
    fn detect_letters(&mut self) -> Result<Vec<Detection>, Self::Error>;
}
