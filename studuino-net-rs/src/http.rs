//! Simple HTTP GET / POST helpers.
//!
//! The platform supplies an [`HttpClient`] that performs one request and
//! copies the response body into a caller-provided buffer. The helpers
//! here build the request (query string, JSON body) and hand the body
//! back as text.

use core::fmt::{self, Display, Write};

use heapless::String;

use crate::error::{CapacityExceeded, NetError};

/// Maximum URL length including the query string.
pub const URL_CAPACITY: usize = 256;

/// Maximum encoded JSON body length.
pub const JSON_CAPACITY: usize = 512;

/// Request body handed to the platform client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body<'a> {
    /// `application/json` body.
    Json(&'a str),
    /// Raw body, sent as is.
    Raw(&'a [u8]),
}

/// HTTP client provided by the platform.
pub trait HttpClient {
    /// Error reported by the platform.
    type Error;

    /// Perform a GET request, copying the response body into `response`.
    /// Returns the number of bytes written.
    fn get(&mut self, url: &str, response: &mut [u8]) -> Result<usize, Self::Error>;

    /// Perform a POST request, copying the response body into `response`.
    /// Returns the number of bytes written.
    fn post(
        &mut self,
        url: &str,
        body: Option<Body<'_>>,
        response: &mut [u8],
    ) -> Result<usize, Self::Error>;
}

/// A JSON scalar for [`Payload::Fields`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Escaped JSON string.
    Str(&'a str),
    /// Integer number.
    Int(i64),
    /// Floating-point number; NaN and infinities encode as `null`.
    Float(f32),
    /// `true` / `false`.
    Bool(bool),
    /// `null`.
    Null,
}

/// POST payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    /// Encoded as a flat JSON object, in the given order.
    Fields(&'a [(&'a str, Value<'a>)]),
    /// Sent unchanged.
    Raw(&'a [u8]),
}

/// Append `?k1=v1&k2=v2` to `url`.
///
/// Values are rendered with [`Display`] and are not percent-encoded.
/// An empty parameter list leaves the URL unchanged.
pub fn build_url(
    url: &str,
    params: &[(&str, &dyn Display)],
) -> Result<String<URL_CAPACITY>, CapacityExceeded> {
    let mut out = String::new();
    out.push_str(url).map_err(|_| CapacityExceeded)?;

    for (i, (key, value)) in params.iter().enumerate() {
        let separator = if i == 0 { '?' } else { '&' };
        write!(out, "{}{}={}", separator, key, value).map_err(|_| CapacityExceeded)?;
    }
    Ok(out)
}

/// Encode `fields` as a flat JSON object.
pub fn encode_json(
    fields: &[(&str, Value<'_>)],
) -> Result<String<JSON_CAPACITY>, CapacityExceeded> {
    let mut out = String::new();
    write_json(&mut out, fields).map_err(|_| CapacityExceeded)?;
    Ok(out)
}

fn write_json<W: Write>(out: &mut W, fields: &[(&str, Value<'_>)]) -> fmt::Result {
    out.write_char('{')?;
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write_json_str(out, key)?;
        out.write_char(':')?;
        match value {
            Value::Str(s) => write_json_str(out, s)?,
            Value::Int(n) => write!(out, "{}", n)?,
            // JSON has no NaN or infinity.
            Value::Float(x) if x.is_finite() => write!(out, "{}", x)?,
            Value::Float(_) | Value::Null => out.write_str("null")?,
            Value::Bool(b) => write!(out, "{}", b)?,
        }
    }
    out.write_char('}')
}

fn write_json_str<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

/// GET `url` with optional query parameters and return the response text.
///
/// # Errors
/// * [`NetError::CapacityExceeded`] if the URL does not fit [`URL_CAPACITY`].
/// * [`NetError::Transport`] if the request fails.
/// * [`NetError::InvalidUtf8`] if the body is not text.
pub fn get_request<'r, C: HttpClient>(
    client: &mut C,
    url: &str,
    params: &[(&str, &dyn Display)],
    response: &'r mut [u8],
) -> Result<&'r str, NetError<C::Error>> {
    let url = build_url(url, params)?;

    #[cfg(feature = "defmt")]
    defmt::debug!("GET {}", url.as_str());

    let len = client.get(&url, response).map_err(NetError::Transport)?;
    as_text(response, len)
}

/// POST to `url` and return the response text.
///
/// [`Payload::Fields`] is sent as [`Body::Json`], [`Payload::Raw`] as
/// [`Body::Raw`], and `None` posts without a body.
///
/// # Errors
/// * [`NetError::CapacityExceeded`] if the JSON body does not fit
///   [`JSON_CAPACITY`].
/// * [`NetError::Transport`] if the request fails.
/// * [`NetError::InvalidUtf8`] if the body is not text.
pub fn post_request<'r, C: HttpClient>(
    client: &mut C,
    url: &str,
    payload: Option<Payload<'_>>,
    response: &'r mut [u8],
) -> Result<&'r str, NetError<C::Error>> {
    #[cfg(feature = "defmt")]
    defmt::debug!("POST {}", url);

    let len = match payload {
        Some(Payload::Fields(fields)) => {
            let json = encode_json(fields)?;
            client.post(url, Some(Body::Json(&json)), response)
        }
        Some(Payload::Raw(bytes)) => client.post(url, Some(Body::Raw(bytes)), response),
        None => client.post(url, None, response),
    }
    .map_err(NetError::Transport)?;
    as_text(response, len)
}

fn as_text<E>(response: &[u8], len: usize) -> Result<&str, NetError<E>> {
    let body = &response[..len.min(response.len())];
    core::str::from_utf8(body).map_err(|_| NetError::InvalidUtf8)
}
