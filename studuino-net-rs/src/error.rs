//! Error types for the network helpers.

use core::fmt;

use heapless::String;

/// A string or URL did not fit its fixed-capacity buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapacityExceeded;

/// Errors that can occur in the network helpers.
///
/// Generic over the platform error `E` of the interface that was called.
#[derive(Debug, PartialEq, Eq)]
pub enum NetError<E> {
    /// The platform networking call failed.
    Transport(E),

    /// Every Wi-Fi connection attempt was refused.
    AttemptsExhausted,

    /// A string, URL or request body exceeded its buffer.
    CapacityExceeded,

    /// The response body is not valid UTF-8.
    InvalidUtf8,
}

impl<E> From<CapacityExceeded> for NetError<E> {
    fn from(_: CapacityExceeded) -> Self {
        NetError::CapacityExceeded
    }
}

impl<E: fmt::Debug> fmt::Display for NetError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetError::Transport(e) => write!(f, "Network error: {:?}", e),
            NetError::AttemptsExhausted => write!(f, "It executed up to number of trials"),
            NetError::CapacityExceeded => write!(f, "Buffer capacity exceeded"),
            NetError::InvalidUtf8 => write!(f, "Response is not valid UTF-8"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for NetError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            NetError::Transport(e) => defmt::write!(f, "Network error: {}", e),
            NetError::AttemptsExhausted => defmt::write!(f, "Connection attempts exhausted"),
            NetError::CapacityExceeded => defmt::write!(f, "Buffer capacity exceeded"),
            NetError::InvalidUtf8 => defmt::write!(f, "Invalid UTF-8 response"),
        }
    }
}

/// Copy `s` into a fixed-capacity string.
pub(crate) fn bounded<const N: usize>(s: &str) -> Result<String<N>, CapacityExceeded> {
    String::try_from(s).map_err(|_| CapacityExceeded)
}
