//! Pixel-to-centimeter conversion and motor command selection.

mod calibration;
mod command;
mod coords;
mod selector;

pub use calibration::{CalibrationTable, LateralEntry, LinearEntry, LinearTable, closest_lateral};
pub use command::{CommandClass, Direction, DynamicCommand, MovementCommand, Speed};
pub use coords::{
    IMAGE_SIZE, bottom_origin_to_cm, bottom_origin_to_cm_exact, cm_to_pixel, flip_row,
    pixel_to_cm, pixel_to_cm_exact, quantize_half_cm,
};
pub use selector::{Axis, CommandSelector, PlannedMove, SelectorConfig};
