//! Deadline token shared by every task of a search
use crate::error::{Result, RfseekError};
use crossbeam_channel::{Receiver, at, never};
use std::time::{Duration, Instant};

/// Read-only cancellation signal derived from an optional timeout.
///
/// The token is `Copy`; every task gets its own copy and polls it at safe
/// points. Nothing can cancel a search early except the deadline itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelToken {
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that never fires.
    pub fn none() -> Self {
        Self { deadline: None }
    }

    /// Starts the clock now. A zero timeout means no deadline, and so does a
    /// timeout too large to be represented as an `Instant`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let deadline = timeout
            .filter(|t| !t.is_zero())
            .and_then(|t| Instant::now().checked_add(t));
        Self { deadline }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(RfseekError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Channel that delivers one message when the deadline passes, for use in
    /// `select!` next to blocking channel operations.
    pub fn fired(&self) -> Receiver<Instant> {
        match self.deadline {
            Some(deadline) => at(deadline),
            None => never(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_token_without_deadline_never_fires() {
        let token = CancelToken::none();
        assert!(!token.is_cancelled());
        assert!(token.check().is_ok());
        assert!(
            token
                .fired()
                .recv_timeout(Duration::from_millis(20))
                .is_err()
        );
    }

    #[test]
    fn test_zero_timeout_means_no_deadline() {
        let token = CancelToken::with_timeout(Some(Duration::ZERO));
        assert!(token.deadline().is_none());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_deadline_expires() {
        let token = CancelToken::with_timeout(Some(Duration::from_millis(10)));
        assert!(token.deadline().is_some());
        thread::sleep(Duration::from_millis(30));
        assert!(token.is_cancelled());
        assert!(token.check().unwrap_err().is_cancelled());
        assert!(token.fired().recv().is_ok());
    }

    #[test]
    fn test_copies_share_the_deadline() {
        let token = CancelToken::with_timeout(Some(Duration::from_secs(60)));
        let copy = token;
        assert_eq!(token.deadline(), copy.deadline());
    }
}
