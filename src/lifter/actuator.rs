//! Arm and gripper actuators, and what to do when they fail.

/// Servo that lowers and raises the lifting arm.
pub const ARM_SERVO: u8 = 9;
/// Servo that opens and closes the gripper.
pub const GRIP_SERVO: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoState {
    Down,
    Up,
    Open,
    Close,
}

impl ServoState {
    pub fn code(self) -> u8 {
        match self {
            Self::Down => 0,
            Self::Up => 1,
            Self::Open => 2,
            Self::Close => 3,
        }
    }
}

/// Physical actions the lifter needs; each reports whether it succeeded.
pub trait Actuator {
    fn set_servo(&mut self, id: u8, state: ServoState) -> bool;
    fn adjust_grip(&mut self) -> bool;
}

/// One step of the pick-up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiftStep {
    LowerArm,
    GripAdjust,
    CloseGrip,
    RaiseArm,
}

impl LiftStep {
    pub const SEQUENCE: [LiftStep; 4] = [
        LiftStep::LowerArm,
        LiftStep::GripAdjust,
        LiftStep::CloseGrip,
        LiftStep::RaiseArm,
    ];

    pub fn perform<A: Actuator + ?Sized>(self, actuator: &mut A) -> bool {
        match self {
            Self::LowerArm => actuator.set_servo(ARM_SERVO, ServoState::Down),
            Self::GripAdjust => actuator.adjust_grip(),
            Self::CloseGrip => actuator.set_servo(GRIP_SERVO, ServoState::Close),
            Self::RaiseArm => actuator.set_servo(ARM_SERVO, ServoState::Up),
        }
    }
}

/// Result of a recovery procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// The recovery finished the whole pick-up itself.
    Completed,
    /// The failed step can be tried once more.
    StepFixedRetry,
    /// Abandon this attempt.
    StepDownAbort,
}

/// Step-specific recovery run after a step exhausted its retries.
pub trait Recovery {
    fn recover(&mut self, step: LiftStep, actuator: &mut dyn Actuator) -> RecoveryOutcome;
}

impl<F> Recovery for F
where
    F: FnMut(LiftStep, &mut dyn Actuator) -> RecoveryOutcome,
{
    fn recover(&mut self, step: LiftStep, actuator: &mut dyn Actuator) -> RecoveryOutcome {
        self(step, actuator)
    }
}

/// Recovery procedures used on the robot.
///
/// Each one backs the mechanism out of the failed position so the step can
/// be repeated; a failed raise is finished by re-gripping and raising again.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRecovery;

impl Recovery for StandardRecovery {
    fn recover(&mut self, step: LiftStep, actuator: &mut dyn Actuator) -> RecoveryOutcome {
        let fixed = match step {
            LiftStep::LowerArm => actuator.set_servo(ARM_SERVO, ServoState::Up),
            LiftStep::GripAdjust => actuator.set_servo(GRIP_SERVO, ServoState::Open),
            LiftStep::CloseGrip => {
                actuator.set_servo(GRIP_SERVO, ServoState::Open)
                    && actuator.set_servo(ARM_SERVO, ServoState::Down)
            }
            LiftStep::RaiseArm => {
                return if actuator.adjust_grip() && actuator.set_servo(ARM_SERVO, ServoState::Up) {
                    RecoveryOutcome::Completed
                } else {
                    RecoveryOutcome::StepDownAbort
                };
            }
        };

        if fixed {
            RecoveryOutcome::StepFixedRetry
        } else {
            RecoveryOutcome::StepDownAbort
        }
    }
}
