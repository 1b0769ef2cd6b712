//! HTTP Module
//!
//! A single-shot HTTP/1.1 client over a fresh TCP connection.
//!
//! ## Exchange
//! 1. Parse the IPv4 host and connect
//! 2. Write request line, `Host`, `Content-Length` and body in one send
//! 3. Parse status line, headers, then a fixed or chunked body
//! 4. Close the socket (on drop, whatever the outcome)
//!
//! ## Status Mapping
//! - 2xx: `Ok(status)`
//! - anything else: `Err(Error::Status { .. })` carrying the response body
//! - transport/protocol failures: the matching negative-coded `Error`

mod connection;
mod request;
mod response;

pub use connection::{parse_addr, Connection};
pub use request::{encode_request, write_request, Method};
pub use response::{read_response, ResponseParser, MAX_LINE_LENGTH, READ_BUFFER_SIZE};

use crate::config::ServerInfo;
use crate::error::{Error, Result};

/// Perform one request/response exchange.
///
/// `query_string` must already be percent-encoded and is appended after
/// the credentials (start it with `&`). When `resp` is given it is cleared
/// and receives the response body.
pub fn request(
    method: Method,
    path: &str,
    query_string: &str,
    body: &[u8],
    server: &ServerInfo,
    resp: Option<&mut Vec<u8>>,
) -> Result<u16> {
    let mut scratch = Vec::new();
    let out = match resp {
        Some(out) => {
            out.clear();
            out
        }
        None => &mut scratch,
    };

    let mut conn = Connection::open(server)?;
    let status = conn.exchange(method, path, query_string, body, server, out)?;
    drop(conn);

    check_status(status, out)
}

/// Map non-2xx status codes to `Error::Status`
fn check_status(status: u16, body: &[u8]) -> Result<u16> {
    if (200..300).contains(&status) {
        return Ok(status);
    }
    Err(Error::Status {
        status,
        body: String::from_utf8_lossy(body).into_owned(),
    })
}
