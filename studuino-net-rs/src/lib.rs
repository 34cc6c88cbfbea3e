//! Thin helpers over a board's networking stack.
//!
//! The platform provides the actual radio, SMTP session and HTTP client
//! through the [`Wlan`], [`SmtpClient`] and [`HttpClient`] traits. This
//! crate layers the board-level conveniences on top:
//!
//! - [`WifiManager`]: station connect with bounded retries and a status
//!   LED, IP configuration, and a WPA2 access point.
//! - [`send_mail`]: one-shot plain-text mail.
//! - [`get_request`] / [`post_request`]: query-string building, JSON
//!   bodies and text responses.
//!
//! # Crate Features
//!
//! - **`defmt`** — log connection attempts and requests via [`defmt`],
//!   and implement `defmt::Format` on error types.

#![cfg_attr(not(test), no_std)]

pub mod error;
pub mod http;
pub mod mail;
pub mod wifi;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use error::{CapacityExceeded, NetError};
pub use http::{
    build_url, encode_json, get_request, post_request, Body, HttpClient, Payload, Value,
};
pub use mail::{send_mail, SmtpClient, SmtpConfig};
pub use wifi::{AuthMode, IpConfig, WifiCredentials, WifiManager, Wlan};
