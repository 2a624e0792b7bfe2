//! # generator run time support
//!
//! error types and failure payloads shared by the producer and consumer sides
//!

use std::any::Any;
use std::fmt;

/// a captured generator body failure
///
/// this is the raw panic payload, passed across the thread boundary
/// untouched so the consumer can re-raise the exact original failure
pub type Payload = Box<dyn Any + Send + 'static>;

/// yield panic error types
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// Cancel panic, unwinds an abandoned generator body
    Cancel,
    /// the controller was used before being initialized
    NotInitialized,
    /// the controller was initialized twice
    AlreadyInitialized,
    /// the worker thread could not be spawned
    SpawnErr,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Error::Cancel => "generator cancelled",
            Error::NotInitialized => "generator controller has not been initialized yet",
            Error::AlreadyInitialized => {
                "attempt to start a new worker on an already initialized generator controller"
            }
            Error::SpawnErr => "failed to spawn generator worker thread",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}

/// raise a usage fault on the calling thread
#[inline]
#[cold]
pub(crate) fn usage_fault(err: Error) -> ! {
    error!("{err}");
    std::panic::panic_any(err)
}

/// check if a failure payload is the cancel signal rather than a real failure
#[inline]
pub(crate) fn is_cancel(cause: &Payload) -> bool {
    matches!(cause.downcast_ref::<Error>(), Some(Error::Cancel))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_cancel() {
        let cancel: Payload = Box::new(Error::Cancel);
        assert!(is_cancel(&cancel));

        let other: Payload = Box::new(Error::SpawnErr);
        assert!(!is_cancel(&other));

        let user: Payload = Box::new(3i32);
        assert!(!is_cancel(&user));
    }

    #[test]
    fn test_usage_fault_payload() {
        let result = std::panic::catch_unwind(|| usage_fault(Error::NotInitialized));
        let cause = result.unwrap_err();
        assert_eq!(cause.downcast_ref::<Error>(), Some(&Error::NotInitialized));
    }

    #[test]
    fn test_display() {
        assert_eq!(Error::Cancel.to_string(), "generator cancelled");
    }
}
