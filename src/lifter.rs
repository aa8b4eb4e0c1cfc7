//! Physical pick-up of the tracked package.

mod actuator;
mod box_lifter;
mod confirmation;

pub use actuator::{
    ARM_SERVO, Actuator, GRIP_SERVO, LiftStep, Recovery, RecoveryOutcome, ServoState,
    StandardRecovery,
};
pub use box_lifter::{BoxLifter, LiftState, LifterConfig, MAX_WAIT_SECS};
pub use confirmation::{ACK, CancelToken, ConfirmationSource, ConfirmationWait, NACK};
