//! Adapter from motion and lifter commands to the serial link.

use log::warn;

use crate::error::ConfirmError;
use crate::lifter::{Actuator, ConfirmationSource, ConfirmationWait, ServoState};
use crate::motion::MovementCommand;

/// Frame handed to the serial encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutgoingFrame {
    Motion(MovementCommand),
    Servo { id: u8, state: ServoState },
    AdjustGrip,
}

/// Byte-level link to the motor controller; framing is up to the implementation.
pub trait SerialLink {
    fn send(&mut self, frame: &OutgoingFrame) -> Result<(), ConfirmError>;

    /// Next byte received from the controller, if any.
    fn poll_byte(&mut self) -> Result<Option<u8>, ConfirmError>;
}

/// Destination for motion commands; no confirmation is awaited.
pub trait MotionSink {
    fn send_motion(&mut self, command: &MovementCommand) -> Result<(), ConfirmError>;
}

struct LinkSource<'a, L>(&'a mut L);

impl<L: SerialLink> ConfirmationSource for LinkSource<'_, L> {
    fn poll_byte(&mut self) -> Result<Option<u8>, ConfirmError> {
        self.0.poll_byte()
    }
}

/// [`Actuator`] that sends each action and waits for the controller's answer.
#[derive(Debug)]
pub struct SerialActuator<L> {
    link: L,
    wait: ConfirmationWait,
}

impl<L: SerialLink> SerialActuator<L> {
    pub fn new(link: L, wait: ConfirmationWait) -> Self {
        Self { link, wait }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn into_inner(self) -> L {
        self.link
    }

    fn send_confirmed(&mut self, frame: OutgoingFrame) -> bool {
        let result = self
            .link
            .send(&frame)
            .and_then(|()| self.wait.wait(&mut LinkSource(&mut self.link)));
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!("{frame:?} not confirmed: {err}");
                false
            }
        }
    }
}

impl<L: SerialLink> Actuator for SerialActuator<L> {
    fn set_servo(&mut self, id: u8, state: ServoState) -> bool {
        self.send_confirmed(OutgoingFrame::Servo { id, state })
    }

    fn adjust_grip(&mut self) -> bool {
        self.send_confirmed(OutgoingFrame::AdjustGrip)
    }
}

impl<L: SerialLink> MotionSink for SerialActuator<L> {
    fn send_motion(&mut self, command: &MovementCommand) -> Result<(), ConfirmError> {
        self.link.send(&OutgoingFrame::Motion(*command))
    }
}
