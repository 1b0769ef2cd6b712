//! Type-sequenced point builder
//!
//! `Builder<S>` owns the line buffer; `S` is a zero-sized marker recording
//! which operations are legal next. Every operation consumes the builder
//! and returns it in its next state.

use std::fmt::Write;
use std::marker::PhantomData;

use crate::config::ServerInfo;
use crate::error::Result;
use crate::http::{self, Method};
use crate::udp;

use super::escape::{escape_into, KEY, MEASUREMENT, STRING_VALUE};
use super::value::FieldValue;

/// Fractional digits used by `Builder::new`
pub const DEFAULT_PRECISION: usize = 2;

/// Fractional digits of the high-precision variant
pub const HIGH_PRECISION: usize = 8;

/// Most fractional digits that still carry information for an `f64`
pub const MAX_PRECISION: usize = 17;

/// Builder states
pub mod state {
    /// Nothing written yet; only `measurement` is available
    #[derive(Debug, Clone, Copy)]
    pub struct Start;

    /// After `measurement` or `tag`: more tags or the first field
    #[derive(Debug, Clone, Copy)]
    pub struct Tags;

    /// After a field: more fields, a timestamp, a new point, or send
    #[derive(Debug, Clone, Copy)]
    pub struct Fields;

    /// After the timestamp: a new point or send
    #[derive(Debug, Clone, Copy)]
    pub struct Stamped;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::state::Fields {}
    impl Sealed for super::state::Stamped {}
}

/// States in which the buffer holds at least one complete point
pub trait Complete: sealed::Sealed {}
impl Complete for state::Fields {}
impl Complete for state::Stamped {}

/// Accumulates line-protocol points into one buffer
#[derive(Debug, Clone)]
pub struct Builder<S> {
    lines: String,
    precision: usize,
    _state: PhantomData<S>,
}

impl Default for Builder<state::Start> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<state::Start> {
    /// Create a builder rendering floats with two fractional digits
    pub fn new() -> Self {
        Self::with_precision(DEFAULT_PRECISION)
    }

    /// Create a builder with a default float precision (clamped to
    /// `MAX_PRECISION`)
    pub fn with_precision(precision: usize) -> Self {
        Self {
            lines: String::new(),
            precision: precision.min(MAX_PRECISION),
            _state: PhantomData,
        }
    }

    /// Start the first point, clearing anything left in the buffer
    pub fn measurement(mut self, name: &str) -> Builder<state::Tags> {
        self.lines.clear();
        self.lines.reserve(0x100);
        self.push_measurement(name)
    }
}

impl Builder<state::Tags> {
    /// Append `,key=value`
    pub fn tag(mut self, key: &str, value: &str) -> Builder<state::Tags> {
        self.lines.push(',');
        escape_into(&mut self.lines, key, KEY);
        self.lines.push('=');
        escape_into(&mut self.lines, value, KEY);
        self
    }

    /// Append the first field of the point
    ///
    /// # Panics
    ///
    /// Float values must be finite. Debug builds panic on NaN or infinity;
    /// release builds write them as Rust formats them, which the server
    /// rejects.
    pub fn field<'v, V: Into<FieldValue<'v>>>(self, key: &str, value: V) -> Builder<state::Fields> {
        let precision = self.precision;
        self.push_field(' ', key, value.into(), precision)
    }

    /// Append the first field as a float with an explicit precision
    pub fn field_with_precision(self, key: &str, value: f64, precision: usize) -> Builder<state::Fields> {
        self.push_field(' ', key, FieldValue::Float(value), precision)
    }
}

impl Builder<state::Fields> {
    /// Append another field
    ///
    /// # Panics
    ///
    /// Float values must be finite. Debug builds panic on NaN or infinity;
    /// release builds write them as Rust formats them, which the server
    /// rejects.
    pub fn field<'v, V: Into<FieldValue<'v>>>(self, key: &str, value: V) -> Builder<state::Fields> {
        let precision = self.precision;
        self.push_field(',', key, value.into(), precision)
    }

    /// Append another float field with an explicit precision
    pub fn field_with_precision(self, key: &str, value: f64, precision: usize) -> Builder<state::Fields> {
        self.push_field(',', key, FieldValue::Float(value), precision)
    }

    /// Append ` <ts>` when `ts` is positive. Zero or negative leaves the
    /// point unstamped so the server assigns the time.
    pub fn timestamp(mut self, ts: i64) -> Builder<state::Stamped> {
        if ts > 0 {
            // Writing into a String cannot fail
            let _ = write!(self.lines, " {}", ts);
        }
        self.transition()
    }

    /// Start another point on a new line
    pub fn measurement(self, name: &str) -> Builder<state::Tags> {
        self.next_point(name)
    }
}

impl Builder<state::Stamped> {
    /// Start another point on a new line
    pub fn measurement(self, name: &str) -> Builder<state::Tags> {
        self.next_point(name)
    }
}

impl<S: Complete> Builder<S> {
    /// POST the buffer to `/write`
    pub fn post_http(&self, server: &ServerInfo) -> Result<()> {
        http::request(Method::Post, "write", "", self.lines.as_bytes(), server, None)?;
        Ok(())
    }

    /// POST the buffer to `/write` and return the response body
    pub fn post_http_with_response(&self, server: &ServerInfo) -> Result<String> {
        let mut resp = Vec::new();
        http::request(
            Method::Post,
            "write",
            "",
            self.lines.as_bytes(),
            server,
            Some(&mut resp),
        )?;
        Ok(String::from_utf8_lossy(&resp).into_owned())
    }

    /// Send the buffer as a single UDP datagram
    pub fn send_udp(&self, host: &str, port: u16) -> Result<()> {
        udp::send(host, port, self.lines.as_bytes())
    }

    fn next_point(mut self, name: &str) -> Builder<state::Tags> {
        self.lines.push('\n');
        self.push_measurement(name)
    }
}

impl<S> Builder<S> {
    /// The line protocol written so far
    pub fn lines(&self) -> &str {
        &self.lines
    }

    pub fn into_string(self) -> String {
        self.lines
    }

    /// Default float precision
    pub fn precision(&self) -> usize {
        self.precision
    }

    fn transition<T>(self) -> Builder<T> {
        Builder {
            lines: self.lines,
            precision: self.precision,
            _state: PhantomData,
        }
    }

    fn push_measurement(mut self, name: &str) -> Builder<state::Tags> {
        escape_into(&mut self.lines, name, MEASUREMENT);
        self.transition()
    }

    fn push_field(
        mut self,
        delim: char,
        key: &str,
        value: FieldValue<'_>,
        precision: usize,
    ) -> Builder<state::Fields> {
        self.lines.push(delim);
        escape_into(&mut self.lines, key, KEY);
        self.lines.push('=');

        // Writing into a String cannot fail
        match value {
            FieldValue::Str(s) => {
                self.lines.push('"');
                escape_into(&mut self.lines, &s, STRING_VALUE);
                self.lines.push('"');
            }
            FieldValue::Bool(b) => self.lines.push(if b { 't' } else { 'f' }),
            FieldValue::Int(i) => {
                let _ = write!(self.lines, "{}i", i);
            }
            FieldValue::Float(f) => {
                debug_assert!(f.is_finite(), "non-finite float field value: {}", f);
                let _ = write!(self.lines, "{:.*}", precision.min(MAX_PRECISION), f);
            }
        }

        self.transition()
    }
}
