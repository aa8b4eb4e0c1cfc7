//! Pick-up sequence with per-step retries and an overall attempt budget.

use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::LiftError;
use crate::lifter::actuator::{Actuator, LiftStep, Recovery, RecoveryOutcome, StandardRecovery};
use crate::lifter::confirmation::ConfirmationWait;

/// Configuration for the BoxLifter and the confirmation waits it relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifterConfig {
    /// Calls to [`BoxLifter::lift_box`] allowed before giving up for good.
    pub max_attempts: u32,
    /// Tries of one step before its recovery runs.
    pub step_retries: u32,
    pub confirm_timeout_secs: f64,
    pub poll_interval_secs: f64,
    pub backoff_factor: f64,
    pub max_poll_interval_secs: f64,
}

impl Default for LifterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            step_retries: 2,
            confirm_timeout_secs: 10.0,
            poll_interval_secs: 0.5,
            backoff_factor: 1.0,
            max_poll_interval_secs: 0.5,
        }
    }
}

/// Longest confirmation timeout or poll interval taken from a configuration.
pub const MAX_WAIT_SECS: f64 = 3600.0;

/// Seconds from a configuration file as a [`Duration`], clamped to
/// `0..=MAX_WAIT_SECS`; NaN becomes zero.
fn config_secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.clamp(0.0, MAX_WAIT_SECS)).unwrap_or(Duration::ZERO)
}

impl LifterConfig {
    pub fn confirmation_wait(&self) -> ConfirmationWait {
        ConfirmationWait::new(
            config_secs(self.confirm_timeout_secs),
            config_secs(self.poll_interval_secs),
        )
        .with_backoff(self.backoff_factor, config_secs(self.max_poll_interval_secs))
    }
}

/// Where the lifter is in the pick-up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiftState {
    #[default]
    Idle,
    Running(LiftStep),
    Done,
    Failed,
}

/// Runs lower arm, grip adjust, close grip, raise arm.
#[derive(Debug, Clone)]
pub struct BoxLifter<R: Recovery = StandardRecovery> {
    config: LifterConfig,
    recovery: R,
    attempts: u32,
    state: LiftState,
}

impl BoxLifter<StandardRecovery> {
    pub fn new(config: LifterConfig) -> Self {
        Self::with_recovery(config, StandardRecovery)
    }
}

impl Default for BoxLifter<StandardRecovery> {
    fn default() -> Self {
        Self::new(LifterConfig::default())
    }
}

impl<R: Recovery> BoxLifter<R> {
    pub fn with_recovery(config: LifterConfig, recovery: R) -> Self {
        Self {
            config,
            recovery,
            attempts: 0,
            state: LiftState::Idle,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn state(&self) -> LiftState {
        self.state
    }

    /// Restore the full attempt budget, e.g. for the next package.
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.state = LiftState::Idle;
    }

    /// Run one pick-up attempt.
    ///
    /// Every error except [`LiftError::BudgetExhausted`] leaves budget for
    /// another call.
    pub fn lift_box<A: Actuator>(&mut self, actuator: &mut A) -> Result<(), LiftError> {
        if self.attempts >= self.config.max_attempts {
            self.state = LiftState::Failed;
            return Err(LiftError::BudgetExhausted {
                attempts: self.attempts,
            });
        }
        self.attempts += 1;
        debug!("lift attempt {}/{}", self.attempts, self.config.max_attempts);

        for step in LiftStep::SEQUENCE {
            self.state = LiftState::Running(step);
            if self.try_step(step, actuator) {
                continue;
            }

            warn!("{step:?} failed {} times, running recovery", self.config.step_retries);
            match self.recovery.recover(step, &mut *actuator) {
                RecoveryOutcome::Completed => {
                    info!("recovery of {step:?} completed the lift");
                    self.state = LiftState::Done;
                    return Ok(());
                }
                RecoveryOutcome::StepFixedRetry => {
                    if !step.perform(actuator) {
                        warn!("{step:?} failed again after recovery");
                        self.state = LiftState::Idle;
                        return Err(LiftError::StepFailed { step });
                    }
                }
                RecoveryOutcome::StepDownAbort => {
                    warn!("recovery of {step:?} stepped down");
                    self.state = LiftState::Idle;
                    return Err(LiftError::StepDown { step });
                }
            }
        }

        info!("box lifted on attempt {}", self.attempts);
        self.state = LiftState::Done;
        Ok(())
    }

    fn try_step<A: Actuator>(&self, step: LiftStep, actuator: &mut A) -> bool {
        (0..self.config.step_retries.max(1)).any(|attempt| {
            let ok = step.perform(actuator);
            if !ok {
                debug!("{step:?} try {} failed", attempt + 1);
            }
            ok
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifter::actuator::{ARM_SERVO, GRIP_SERVO, ServoState};

    /// Records calls and fails the first `failures` calls of a chosen action.
    #[derive(Default)]
    struct MockActuator {
        calls: Vec<(u8, Option<ServoState>)>,
        fail_servo: Option<(u8, ServoState)>,
        failures: usize,
    }

    impl MockActuator {
        fn failing(id: u8, state: ServoState, failures: usize) -> Self {
            Self {
                fail_servo: Some((id, state)),
                failures,
                ..Default::default()
            }
        }
    }

    impl Actuator for MockActuator {
        fn set_servo(&mut self, id: u8, state: ServoState) -> bool {
            self.calls.push((id, Some(state)));
            if self.fail_servo == Some((id, state)) && self.failures > 0 {
                self.failures -= 1;
                return false;
            }
            true
        }

        fn adjust_grip(&mut self) -> bool {
            self.calls.push((0, None));
            true
        }
    }

    #[test]
    fn test_happy_path_runs_sequence_in_order() {
        let mut lifter = BoxLifter::default();
        let mut actuator = MockActuator::default();

        assert_eq!(lifter.lift_box(&mut actuator), Ok(()));
        assert_eq!(
            actuator.calls,
            vec![
                (ARM_SERVO, Some(ServoState::Down)),
                (0, None),
                (GRIP_SERVO, Some(ServoState::Close)),
                (ARM_SERVO, Some(ServoState::Up)),
            ]
        );
        assert_eq!(lifter.state(), LiftState::Done);
    }

    #[test]
    fn test_single_failure_is_retried_without_recovery() {
        let mut lifter = BoxLifter::with_recovery(
            LifterConfig::default(),
            |_: LiftStep, _: &mut dyn Actuator| -> RecoveryOutcome { panic!("recovery should not run") },
        );
        let mut actuator = MockActuator::failing(GRIP_SERVO, ServoState::Close, 1);
        assert_eq!(lifter.lift_box(&mut actuator), Ok(()));
    }

    #[test]
    fn test_fixed_step_retried_once() {
        let mut recovered = Vec::new();
        let mut lifter = BoxLifter::with_recovery(
            LifterConfig::default(),
            |step: LiftStep, _: &mut dyn Actuator| {
                recovered.push(step);
                RecoveryOutcome::StepFixedRetry
            },
        );
        let mut actuator = MockActuator::failing(ARM_SERVO, ServoState::Down, 2);
        assert_eq!(lifter.lift_box(&mut actuator), Ok(()));
        drop(lifter);
        assert_eq!(recovered, vec![LiftStep::LowerArm]);
    }

    #[test]
    fn test_fixed_step_failing_again_aborts_attempt() {
        let mut lifter = BoxLifter::with_recovery(
            LifterConfig::default(),
            |_: LiftStep, _: &mut dyn Actuator| RecoveryOutcome::StepFixedRetry,
        );
        let mut actuator = MockActuator::failing(ARM_SERVO, ServoState::Up, 3);
        assert_eq!(
            lifter.lift_box(&mut actuator),
            Err(LiftError::StepFailed {
                step: LiftStep::RaiseArm
            })
        );
    }

    #[test]
    fn test_completed_recovery_skips_remaining_steps() {
        let mut lifter = BoxLifter::with_recovery(
            LifterConfig::default(),
            |_: LiftStep, _: &mut dyn Actuator| RecoveryOutcome::Completed,
        );
        let mut actuator = MockActuator::failing(GRIP_SERVO, ServoState::Close, 2);
        assert_eq!(lifter.lift_box(&mut actuator), Ok(()));
        assert!(!actuator.calls.contains(&(ARM_SERVO, Some(ServoState::Up))));
    }

    #[test]
    fn test_budget_is_terminal() {
        let mut lifter = BoxLifter::with_recovery(
            LifterConfig::default(),
            |_: LiftStep, _: &mut dyn Actuator| RecoveryOutcome::StepDownAbort,
        );
        let mut actuator = MockActuator::failing(ARM_SERVO, ServoState::Down, usize::MAX);

        for _ in 0..5 {
            let err = lifter.lift_box(&mut actuator).unwrap_err();
            assert_eq!(err, LiftError::StepDown { step: LiftStep::LowerArm });
            assert!(!err.is_terminal());
        }
        let err = lifter.lift_box(&mut actuator).unwrap_err();
        assert_eq!(err, LiftError::BudgetExhausted { attempts: 5 });
        assert!(err.is_terminal());
        assert_eq!(lifter.state(), LiftState::Failed);

        lifter.reset();
        assert_eq!(lifter.attempts(), 0);
    }

    #[test]
    fn test_standard_recovery_finishes_failed_raise() {
        let mut lifter = BoxLifter::default();
        // Two failed raises exhaust the step; recovery's own raise succeeds.
        let mut actuator = MockActuator::failing(ARM_SERVO, ServoState::Up, 2);
        assert_eq!(lifter.lift_box(&mut actuator), Ok(()));
        assert_eq!(actuator.calls.last(), Some(&(ARM_SERVO, Some(ServoState::Up))));
    }

    #[test]
    fn test_config_builds_confirmation_wait() {
        let wait = LifterConfig::default().confirmation_wait();
        assert_eq!(wait.timeout, Duration::from_secs(10));
        assert_eq!(wait.interval, Duration::from_millis(500));
    }

    #[test]
    fn test_out_of_range_waits_are_clamped() {
        let config = crate::config::RobotConfig::from_json_str(
            r#"{"lifter": {"confirm_timeout_secs": 1e20, "poll_interval_secs": -3.0,
                "max_poll_interval_secs": 1e300, "backoff_factor": 1e300}}"#,
        )
        .unwrap();
        let wait = config.lifter.confirmation_wait();
        assert_eq!(wait.timeout, Duration::from_secs_f64(MAX_WAIT_SECS));
        assert_eq!(wait.interval, Duration::ZERO);
        assert_eq!(wait.max_interval, Duration::from_secs_f64(MAX_WAIT_SECS));

        let nan = LifterConfig {
            confirm_timeout_secs: f64::NAN,
            ..LifterConfig::default()
        };
        assert_eq!(nan.confirmation_wait().timeout, Duration::ZERO);
    }
}
