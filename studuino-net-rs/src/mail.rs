//! Plain-text mail over SMTP.
//!
//! [`send_mail`] drives an [`SmtpClient`] supplied by the platform through
//! one complete session: open, set recipient, write headers and body,
//! send, quit.

use core::fmt::Write;

use heapless::String;

use crate::error::{bounded, CapacityExceeded, NetError};

/// Maximum host name length in bytes.
pub const HOST_CAPACITY: usize = 64;

/// Maximum username / password length in bytes.
pub const CREDENTIAL_CAPACITY: usize = 64;

/// Maximum length of a single header line in bytes.
pub const HEADER_CAPACITY: usize = 256;

/// SMTP server settings.
///
/// [`SmtpConfig::default()`] points at Gmail's submission port without
/// implicit TLS, with empty credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    /// Server host name. Default: `smtp.gmail.com`.
    pub host: String<HOST_CAPACITY>,
    /// Server port. Default: 587.
    pub port: u16,
    /// Connect with implicit TLS. Default: `false`.
    pub ssl: bool,
    /// Login name, also used as the `From` address.
    pub username: String<CREDENTIAL_CAPACITY>,
    /// Login password.
    pub password: String<CREDENTIAL_CAPACITY>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::try_from("smtp.gmail.com").unwrap_or_default(),
            port: 587,
            ssl: false,
            username: String::new(),
            password: String::new(),
        }
    }
}

impl SmtpConfig {
    /// Replace the host name.
    pub fn with_host(mut self, host: &str) -> Result<Self, CapacityExceeded> {
        self.host = bounded(host)?;
        Ok(self)
    }

    /// Replace the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable implicit TLS.
    pub fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    /// Replace the login name.
    pub fn with_username(mut self, username: &str) -> Result<Self, CapacityExceeded> {
        self.username = bounded(username)?;
        Ok(self)
    }

    /// Replace the login password.
    pub fn with_password(mut self, password: &str) -> Result<Self, CapacityExceeded> {
        self.password = bounded(password)?;
        Ok(self)
    }
}

/// SMTP client session provided by the platform.
pub trait SmtpClient {
    /// Error reported by the platform.
    type Error;

    /// Connect and log in.
    fn open(&mut self, config: &SmtpConfig) -> Result<(), Self::Error>;

    /// Add a recipient.
    fn to(&mut self, recipient: &str) -> Result<(), Self::Error>;

    /// Append text to the message.
    fn write(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Finish and submit the message.
    fn send(&mut self) -> Result<(), Self::Error>;

    /// Close the session.
    fn quit(&mut self) -> Result<(), Self::Error>;
}

/// Send a UTF-8 plain-text mail from `config.username` to `to`.
///
/// The message consists of the lines `Content-Type: text/plain;
/// charset=utf-8`, `From: <username>`, `To: <to>`, `Subject: <subject>`
/// and then `message`, each terminated by `\n`.
///
/// # Errors
/// * [`NetError::CapacityExceeded`] if a header line does not fit
///   [`HEADER_CAPACITY`]; checked before the session is opened.
/// * [`NetError::Transport`] on the first failed client call.
pub fn send_mail<C: SmtpClient>(
    client: &mut C,
    config: &SmtpConfig,
    to: &str,
    subject: &str,
    message: &str,
) -> Result<(), NetError<C::Error>> {
    let from = header("From", &config.username)?;
    let recipient = header("To", to)?;
    let subject = header("Subject", subject)?;

    #[cfg(feature = "defmt")]
    defmt::debug!("SMTP {}:{} -> {}", config.host.as_str(), config.port, to);

    client.open(config).map_err(NetError::Transport)?;
    client.to(to).map_err(NetError::Transport)?;

    for line in [
        "Content-Type: text/plain; charset=utf-8\n",
        from.as_str(),
        recipient.as_str(),
        subject.as_str(),
    ] {
        client.write(line).map_err(NetError::Transport)?;
    }
    client.write(message).map_err(NetError::Transport)?;
    client.write("\n").map_err(NetError::Transport)?;

    client.send().map_err(NetError::Transport)?;
    client.quit().map_err(NetError::Transport)?;
    Ok(())
}

fn header(name: &str, value: &str) -> Result<String<HEADER_CAPACITY>, CapacityExceeded> {
    let mut line = String::new();
    writeln!(line, "{}: {}", name, value).map_err(|_| CapacityExceeded)?;
    Ok(line)
}
