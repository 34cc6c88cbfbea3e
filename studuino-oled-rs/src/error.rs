//! Error types for the OLED display driver.

use core::fmt;

/// Rejected panel geometry.
///
/// Width must be 1–128 (controller column RAM). Height must be a non-zero
/// multiple of 8 no larger than 64 (eight pages).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GeometryError {
    /// Requested width in pixels.
    pub width: u32,
    /// Requested height in pixels.
    pub height: u32,
}

/// Errors that can occur during OLED display operations.
///
/// Generic over the transport error `E` so that bus failures reach the
/// caller unchanged.
#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// Underlying bus write failed. Not retried by the driver.
    Transport(E),

    /// Construction was attempted with an unsupported width or height.
    InvalidGeometry {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

// Allow ergonomic `?` propagation from raw transport errors.
impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::Transport(error)
    }
}

impl<E> Error<E> {
    pub(crate) fn geometry(e: GeometryError) -> Self {
        Error::InvalidGeometry {
            width: e.width,
            height: e.height,
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invalid geometry {}x{} (width 1-128, height a multiple of 8 up to 64)",
            self.width, self.height
        )
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "Transport error: {:?}", e),
            Error::InvalidGeometry { width, height } => {
                let geometry = GeometryError {
                    width: *width,
                    height: *height,
                };
                geometry.fmt(f)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Transport(e) => defmt::write!(f, "Transport error: {}", e),
            Error::InvalidGeometry { width, height } => {
                defmt::write!(f, "Invalid geometry {}x{}", width, height)
            }
        }
    }
}
