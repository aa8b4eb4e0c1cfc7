//! Pixel to ground-plane conversion for the 512x512 downward camera.
//!
//! The formulas were fitted from measurements on the robot. Outputs are
//! quantized to 0.5 cm, the step of the movement calibration tables, so the
//! quantized values must not be changed independently of those tables.
//! Positions outside the measured area extrapolate linearly.

/// Side of the square camera frame in pixels.
pub const IMAGE_SIZE: f64 = 512.0;

const Y_SLOPE: f64 = 0.05587;
const Y_OFFSET: f64 = -4.47;
const CENTER_X_SLOPE: f64 = 0.0203;
const CENTER_X_OFFSET: f64 = 230.38;
const SCALE_X_SLOPE: f64 = 0.0000608;
const SCALE_X_OFFSET: f64 = 0.046936;

/// Image column the robot's center line passes through at row `py_flipped`.
#[inline]
fn center_x(py_flipped: f64) -> f64 {
    CENTER_X_SLOPE * py_flipped + CENTER_X_OFFSET
}

/// Centimeters per pixel horizontally at row `py_flipped`.
#[inline]
fn scale_x(py_flipped: f64) -> f64 {
    SCALE_X_SLOPE * py_flipped + SCALE_X_OFFSET
}

/// Round to the nearest 0.5, ties to even.
#[inline]
pub fn quantize_half_cm(value: f64) -> f64 {
    (value * 2.0).round_ties_even() / 2.0
}

/// Convert an image row (origin top) to a row counted from the bottom edge.
#[inline]
pub fn flip_row(py: f64) -> f64 {
    IMAGE_SIZE - py
}

/// Unquantized conversion of a bottom-origin pixel position to centimeters.
pub fn bottom_origin_to_cm_exact(px: f64, py_flipped: f64) -> (f64, f64) {
    let y_cm = Y_SLOPE * py_flipped + Y_OFFSET;
    let x_cm = (px - center_x(py_flipped)) * scale_x(py_flipped);
    (x_cm, y_cm)
}

/// Convert a bottom-origin pixel position to quantized centimeters.
pub fn bottom_origin_to_cm(px: f64, py_flipped: f64) -> (f64, f64) {
    let (x_cm, y_cm) = bottom_origin_to_cm_exact(px, py_flipped);
    (quantize_half_cm(x_cm), quantize_half_cm(y_cm))
}

/// Unquantized conversion of an image pixel position to centimeters.
pub fn pixel_to_cm_exact(px: f64, py: f64) -> (f64, f64) {
    bottom_origin_to_cm_exact(px, flip_row(py))
}

/// Convert an image pixel position to `(x_cm, y_cm)` relative to the gripper.
///
/// `x_cm` is lateral offset (positive to the image right), `y_cm` is
/// distance ahead of the robot.
pub fn pixel_to_cm(px: f64, py: f64) -> (f64, f64) {
    bottom_origin_to_cm(px, flip_row(py))
}

/// Inverse of [`pixel_to_cm_exact`]: image pixel position for a ground point.
pub fn cm_to_pixel(x_cm: f64, y_cm: f64) -> (f64, f64) {
    let py_flipped = (y_cm - Y_OFFSET) / Y_SLOPE;
    let px = x_cm / scale_x(py_flipped) + center_x(py_flipped);
    (px, flip_row(py_flipped))
}
