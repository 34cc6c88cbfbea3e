//! Blocking driver for the SSD1307 monochrome OLED controller over I2C.
//!
//! This crate provides [`Ssd1307`], a page-addressed OLED driver that owns
//! a [`Framebuffer`] and pushes it to the panel over a [`BusTransport`].
//! Drawing never touches the bus; only [`Ssd1307::synchronize`] and the
//! power/presentation commands do.
//!
//! # Quick Start
//!
//! ```ignore
//! use studuino_oled_rs::{AxisLine, DisplayConfig, RectStyle, Ssd1307};
//!
//! // Sends the power-up sequence, clears the panel and turns it on.
//! let mut oled = Ssd1307::new_i2c(i2c, DisplayConfig::new(128, 32))?;
//!
//! let fb = oled.surface_mut();
//! fb.draw_rect(0, 0, 128, 32, RectStyle::Outline);
//! fb.draw_line(AxisLine::Horizontal { x: 4, y: 16, length: 120 });
//!
//! oled.synchronize()?;
//! ```
//!
//! The frame buffer is also an `embedded-graphics` [`DrawTarget`], so text
//! and primitives can be drawn with the usual styles.
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`] and `defmt::Format`
//!   on error types.
//! - **`task`** — [`display_task::refresh_task`], a periodic refresh loop
//!   for a display shared through an Embassy mutex.
//!
//! [`DrawTarget`]: embedded_graphics::draw_target::DrawTarget

#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod config;
#[cfg(feature = "task")]
pub mod display_task;
pub mod driver;
pub mod error;
pub mod framebuffer;
mod graphics;
pub mod transport;

// ── Re-exports for convenience ───────────────────────────────────────────

#[cfg(feature = "task")]
pub use display_task::{refresh_task, SharedDisplay};
pub use config::{DisplayConfig, PageWrite, DEFAULT_ADDRESS};
pub use driver::{PowerState, Ssd1307};
pub use error::{Error, GeometryError};
pub use framebuffer::{AxisLine, Framebuffer, RectStyle};
pub use transport::{BusTransport, DisplayInterfaceTransport, I2cTransport};
