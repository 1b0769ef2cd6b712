//! Request framing
//!
//! ## Wire Format
//! ```text
//! METHOD /path?db=DB&u=USER&p=PASS<query_string> HTTP/1.1\r\n
//! Host: <host>\r\n
//! Content-Length: <n>\r\n
//! \r\n
//! <body>
//! ```
//!
//! No other headers are sent.

use std::io::Write;

use crate::config::ServerInfo;
use crate::error::{Error, Result};
use crate::urlencode::url_encode;

/// HTTP method for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Encode the request head followed by the body.
///
/// `query_string` is appended verbatim after the credentials, so it must
/// already be percent-encoded and start with `&`.
pub fn encode_request(
    method: Method,
    path: &str,
    query_string: &str,
    body: &[u8],
    server: &ServerInfo,
) -> Vec<u8> {
    let mut target = String::with_capacity(64 + query_string.len());
    target.push('/');
    target.push_str(path);
    target.push_str("?db=");
    url_encode(&mut target, &server.db);
    target.push_str("&u=");
    url_encode(&mut target, &server.user);
    target.push_str("&p=");
    url_encode(&mut target, &server.password);
    target.push_str(query_string);

    let head = format!(
        "{} {} HTTP/1.1\r\nHost: {}\r\nContent-Length: {}\r\n\r\n",
        method.as_str(),
        target,
        server.host,
        body.len()
    );

    let mut message = Vec::with_capacity(head.len() + body.len());
    message.extend_from_slice(head.as_bytes());
    message.extend_from_slice(body);
    message
}

/// Write a framed request to a stream in a single send
pub fn write_request<W: Write>(
    writer: &mut W,
    method: Method,
    path: &str,
    query_string: &str,
    body: &[u8],
    server: &ServerInfo,
) -> Result<()> {
    let bytes = encode_request(method, path, query_string, body, server);
    writer.write_all(&bytes).map_err(Error::ShortWrite)?;
    writer.flush().map_err(Error::ShortWrite)?;

    tracing::debug!(
        method = method.as_str(),
        path,
        bytes = bytes.len(),
        "Request sent"
    );
    Ok(())
}
