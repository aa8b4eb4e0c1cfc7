//! Deadline-bounded wait for the controller's confirmation byte.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::ConfirmError;

/// Byte sent by the controller when a command completed.
pub const ACK: u8 = 0x01;
/// Byte sent by the controller when a command could not be executed.
pub const NACK: u8 = 0x00;

/// Non-blocking source of bytes from the controller.
pub trait ConfirmationSource {
    /// Return the next received byte, or `None` if nothing arrived yet.
    fn poll_byte(&mut self) -> Result<Option<u8>, ConfirmError>;
}

/// Shared flag to abort a pending wait from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Polls a [`ConfirmationSource`] until a byte arrives or the deadline passes.
///
/// The interval between polls starts at `interval` and is multiplied by
/// `backoff` after every empty poll, up to `max_interval`.
#[derive(Debug, Clone)]
pub struct ConfirmationWait {
    pub timeout: Duration,
    pub interval: Duration,
    pub backoff: f64,
    pub max_interval: Duration,
    cancel: Option<CancelToken>,
}

impl ConfirmationWait {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval,
            backoff: 1.0,
            max_interval: interval,
            cancel: None,
        }
    }

    pub fn with_backoff(mut self, factor: f64, max_interval: Duration) -> Self {
        self.backoff = factor.max(1.0);
        self.max_interval = max_interval.max(self.interval);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Block until the controller answers.
    ///
    /// `ACK` is success; any other byte is reported as [`ConfirmError::Nack`].
    pub fn wait<S: ConfirmationSource + ?Sized>(&self, source: &mut S) -> Result<(), ConfirmError> {
        let started = Instant::now();
        // `None` only when the timeout is beyond what the clock can represent.
        let deadline = started.checked_add(self.timeout);
        let mut interval = self.interval;

        loop {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                debug!("confirmation wait cancelled after {:?}", started.elapsed());
                return Err(ConfirmError::Cancelled);
            }

            match source.poll_byte()? {
                Some(ACK) => return Ok(()),
                Some(byte) => return Err(ConfirmError::Nack(byte)),
                None => {}
            }

            let now = Instant::now();
            let pause = match deadline {
                Some(deadline) if now >= deadline => {
                    let waited = now - started;
                    warn!("no confirmation after {waited:?}");
                    return Err(ConfirmError::Timeout { waited });
                }
                Some(deadline) => interval.min(deadline - now),
                None => interval,
            };

            thread::sleep(pause);
            interval = Duration::try_from_secs_f64(interval.as_secs_f64() * self.backoff)
                .unwrap_or(self.max_interval)
                .min(self.max_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        replies: Vec<Option<u8>>,
        polls: usize,
    }

    impl ConfirmationSource for Scripted {
        fn poll_byte(&mut self) -> Result<Option<u8>, ConfirmError> {
            let reply = self.replies.get(self.polls).copied().flatten();
            self.polls += 1;
            Ok(reply)
        }
    }

    fn quick() -> ConfirmationWait {
        ConfirmationWait::new(Duration::from_millis(200), Duration::from_millis(1))
    }

    #[test]
    fn test_ack_after_empty_polls() {
        let mut source = Scripted {
            replies: vec![None, None, Some(ACK)],
            polls: 0,
        };
        assert_eq!(quick().wait(&mut source), Ok(()));
        assert_eq!(source.polls, 3);
    }

    #[test]
    fn test_nack() {
        let mut source = Scripted {
            replies: vec![Some(NACK)],
            polls: 0,
        };
        assert_eq!(quick().wait(&mut source), Err(ConfirmError::Nack(NACK)));
    }

    #[test]
    fn test_timeout() {
        let mut source = Scripted {
            replies: vec![],
            polls: 0,
        };
        let wait = ConfirmationWait::new(Duration::from_millis(20), Duration::from_millis(5));
        match wait.wait(&mut source) {
            Err(ConfirmError::Timeout { waited }) => assert!(waited >= Duration::from_millis(20)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(source.polls >= 2);
    }

    #[test]
    fn test_unbounded_timeout_still_polls() {
        let mut source = Scripted {
            replies: vec![None, None, Some(ACK)],
            polls: 0,
        };
        let wait = ConfirmationWait::new(Duration::MAX, Duration::from_millis(1))
            .with_backoff(f64::MAX, Duration::from_millis(2));
        assert_eq!(wait.wait(&mut source), Ok(()));
        assert_eq!(source.polls, 3);
    }

    #[test]
    fn test_backoff_caps_interval() {
        let wait = ConfirmationWait::new(Duration::from_millis(10), Duration::from_millis(2))
            .with_backoff(0.5, Duration::from_millis(1));
        assert_eq!(wait.backoff, 1.0);
        assert_eq!(wait.max_interval, Duration::from_millis(2));
    }

    #[test]
    fn test_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let mut source = Scripted {
            replies: vec![Some(ACK)],
            polls: 0,
        };
        let wait = quick().with_cancel(token);
        assert_eq!(wait.wait(&mut source), Err(ConfirmError::Cancelled));
        assert_eq!(source.polls, 0);
    }
}
