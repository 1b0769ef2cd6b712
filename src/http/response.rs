//! Response parser
//!
//! An explicit state machine over a refillable receive buffer:
//!
//! ```text
//! StatusLine ─▶ HeaderLine* ─▶ Body(Fixed(n)) ──────────────────────────▶ Done
//!                          └─▶ Body(Chunked: Size ─▶ Data ─▶ DataEnd ─┐)
//!                                          ▲                          │
//!                                          └──────────────────────────┘
//!                                  Size == 0 ─▶ Trailer* ─▶ Done
//! ```
//!
//! Every state pulls bytes through `next_byte`, which
//! refills from the stream when the buffer runs dry.

use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::error::{Error, Result};

/// Size of each read from the socket
pub const READ_BUFFER_SIZE: usize = 4096;

/// Longest status, header, chunk-size or trailer line accepted
pub const MAX_LINE_LENGTH: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StatusLine,
    HeaderLine,
    Body(Framing),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    Fixed(usize),
    Chunked(ChunkPhase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkPhase {
    Size,
    Data(usize),
    DataEnd,
    Trailer,
}

/// Parses one HTTP/1.1 response from a byte stream
pub struct ResponseParser<'a, R> {
    reader: &'a mut R,

    /// Unconsumed bytes from the last read
    buf: BytesMut,

    state: State,
    status: u16,
    content_length: Option<usize>,
    chunked: bool,
}

impl<'a, R: Read> ResponseParser<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(READ_BUFFER_SIZE),
            state: State::StatusLine,
            status: 0,
            content_length: None,
            chunked: false,
        }
    }

    /// Run the parser to completion.
    ///
    /// Body bytes are appended to `body` when given, otherwise consumed and
    /// dropped. Returns the raw status code.
    pub fn parse(mut self, mut body: Option<&mut Vec<u8>>) -> Result<u16> {
        loop {
            self.state = match self.state {
                State::StatusLine => {
                    self.parse_status_line()?;
                    State::HeaderLine
                }
                State::HeaderLine => self.parse_header_line()?,
                State::Body(Framing::Fixed(len)) => {
                    self.copy_body(len, body.as_deref_mut())?;
                    State::Done
                }
                State::Body(Framing::Chunked(phase)) => self.step_chunked(phase, body.as_deref_mut())?,
                State::Done => return Ok(self.status),
            };
        }
    }

    // =========================================================================
    // Byte Source
    // =========================================================================

    /// Make sure at least one byte is buffered. Returns false on EOF.
    fn fill(&mut self) -> Result<bool> {
        if self.buf.has_remaining() {
            return Ok(true);
        }

        self.buf.clear();
        self.buf.resize(READ_BUFFER_SIZE, 0);
        let n = loop {
            match self.reader.read(&mut self.buf[..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buf.clear();
                    return Err(Error::Recv(e));
                }
            }
        };
        self.buf.truncate(n);

        Ok(n > 0)
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        if !self.fill()? {
            return Ok(None);
        }
        Ok(Some(self.buf.get_u8()))
    }

    /// Read up to and including `\n`, returning the line without its
    /// terminator (a preceding `\r` is stripped as well)
    fn read_line(&mut self, on_eof: fn() -> Error) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        loop {
            match self.next_byte()? {
                None => return Err(on_eof()),
                Some(b'\n') => break,
                Some(b) => {
                    if line.len() >= MAX_LINE_LENGTH {
                        return Err(Error::Malformed(format!(
                            "line exceeds {} bytes",
                            MAX_LINE_LENGTH
                        )));
                    }
                    line.push(b);
                }
            }
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok(line)
    }

    // =========================================================================
    // Head
    // =========================================================================

    fn parse_status_line(&mut self) -> Result<()> {
        let line = self.read_line(|| Error::UnexpectedEof("status line"))?;

        let rest = match line.iter().position(|&b| b == b' ') {
            Some(space) => &line[space + 1..],
            None => {
                return Err(Error::Malformed(format!(
                    "status line without status code: {:?}",
                    String::from_utf8_lossy(&line)
                )))
            }
        };

        let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
        let terminated = matches!(rest.get(digits), None | Some(b' '));
        if digits != 3 || !terminated {
            return Err(Error::Malformed(format!(
                "invalid status code in {:?}",
                String::from_utf8_lossy(&line)
            )));
        }

        self.status = rest[..digits]
            .iter()
            .fold(0u16, |n, b| n * 10 + u16::from(b - b'0'));

        tracing::trace!(status = self.status, "Parsed status line");
        Ok(())
    }

    fn parse_header_line(&mut self) -> Result<State> {
        let line = self.read_line(|| Error::UnexpectedEof("headers"))?;

        if line.is_empty() {
            return Ok(State::Body(self.framing()));
        }

        let line = String::from_utf8_lossy(&line);
        let Some((name, value)) = line.split_once(':') else {
            tracing::trace!(line = %line, "Ignoring header line without colon");
            return Ok(State::HeaderLine);
        };
        let (name, value) = (name.trim(), value.trim());

        if name.eq_ignore_ascii_case("content-length") {
            let len = value.parse::<usize>().map_err(|_| {
                Error::Malformed(format!("invalid Content-Length: {:?}", value))
            })?;
            self.content_length = Some(len);
        } else if name.eq_ignore_ascii_case("transfer-encoding")
            && value
                .split(',')
                .any(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
        {
            self.chunked = true;
        }

        tracing::trace!(header = name, value, "Header");
        Ok(State::HeaderLine)
    }

    /// Chunked framing wins over Content-Length; no framing header means
    /// no body.
    fn framing(&self) -> Framing {
        if self.chunked {
            Framing::Chunked(ChunkPhase::Size)
        } else {
            Framing::Fixed(self.content_length.unwrap_or(0))
        }
    }

    // =========================================================================
    // Body
    // =========================================================================

    fn copy_body(&mut self, mut remaining: usize, mut out: Option<&mut Vec<u8>>) -> Result<()> {
        while remaining > 0 {
            if !self.fill()? {
                return Err(Error::TruncatedBody { remaining });
            }
            let take = remaining.min(self.buf.len());
            if let Some(out) = out.as_deref_mut() {
                out.extend_from_slice(&self.buf[..take]);
            }
            self.buf.advance(take);
            remaining -= take;
        }
        Ok(())
    }

    fn step_chunked(&mut self, phase: ChunkPhase, out: Option<&mut Vec<u8>>) -> Result<State> {
        let next = match phase {
            ChunkPhase::Size => match self.parse_chunk_size()? {
                0 => ChunkPhase::Trailer,
                size => ChunkPhase::Data(size),
            },
            ChunkPhase::Data(size) => {
                self.copy_body(size, out)?;
                ChunkPhase::DataEnd
            }
            ChunkPhase::DataEnd => {
                self.expect_crlf()?;
                ChunkPhase::Size
            }
            ChunkPhase::Trailer => {
                let line = self.read_line(|| Error::UnexpectedEof("chunk trailer"))?;
                if line.is_empty() {
                    return Ok(State::Done);
                }
                tracing::trace!(trailer = %String::from_utf8_lossy(&line), "Skipping trailer");
                ChunkPhase::Trailer
            }
        };
        Ok(State::Body(Framing::Chunked(next)))
    }

    fn parse_chunk_size(&mut self) -> Result<usize> {
        let line = self.read_line(|| Error::ChunkSize("unexpected end of stream".to_string()))?;

        let digits = match line.iter().position(|&b| b == b';') {
            Some(ext) => &line[..ext],
            None => &line[..],
        };
        let digits = trim_ascii(digits);
        if digits.is_empty() {
            return Err(Error::ChunkSize("missing chunk size".to_string()));
        }

        let mut size: usize = 0;
        for &b in digits {
            let nibble = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => {
                    return Err(Error::ChunkSize(format!(
                        "invalid hex digit {:?}",
                        b as char
                    )))
                }
            };
            size = size
                .checked_mul(16)
                .and_then(|s| s.checked_add(usize::from(nibble)))
                .ok_or_else(|| Error::ChunkSize("chunk size overflows".to_string()))?;
        }

        tracing::trace!(size, "Chunk");
        Ok(size)
    }

    fn expect_crlf(&mut self) -> Result<()> {
        for expected in [b'\r', b'\n'] {
            if self.next_byte()? != Some(expected) {
                return Err(Error::ChunkTerminator);
            }
        }
        Ok(())
    }
}

fn trim_ascii(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if !first.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    while let [rest @ .., last] = bytes {
        if !last.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    bytes
}

/// Read a complete response from a stream
///
/// Returns the raw status code; body bytes go to `body` when given.
pub fn read_response<R: Read>(reader: &mut R, body: Option<&mut Vec<u8>>) -> Result<u16> {
    ResponseParser::new(reader).parse(body)
}
