//! Connection Handler
//!
//! Owns the TCP stream for a single request/response exchange. The stream
//! is closed when the `Connection` drops, on every exit path.

use std::io::BufWriter;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream};

use crate::config::ServerInfo;
use crate::error::{Error, Result};

use super::request::{write_request, Method};
use super::response::read_response;

/// Parse a dotted IPv4 address and port. No DNS lookup is attempted.
pub fn parse_addr(host: &str, port: u16) -> Result<SocketAddrV4> {
    let ip: Ipv4Addr = host
        .parse()
        .map_err(|_| Error::InvalidAddress(format!("not a dotted IPv4 address: {:?}", host)))?;
    if port == 0 {
        return Err(Error::InvalidAddress("port must be in 1..=65535".to_string()));
    }
    Ok(SocketAddrV4::new(ip, port))
}

/// A single-use client connection
pub struct Connection {
    /// TCP stream reader; the response parser does its own buffering
    reader: TcpStream,

    /// TCP stream writer (buffered so head and body leave in one send)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to the server and apply the configured timeouts
    pub fn open(server: &ServerInfo) -> Result<Self> {
        let addr = SocketAddr::V4(parse_addr(&server.host, server.port)?);

        let stream = match server.connect_timeout() {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        }
        .map_err(Error::Connect)?;

        stream.set_nodelay(true).map_err(Error::Connect)?;
        stream
            .set_read_timeout(server.read_timeout())
            .map_err(Error::Connect)?;
        stream
            .set_write_timeout(server.write_timeout())
            .map_err(Error::Connect)?;

        let read_stream = stream.try_clone().map_err(Error::SocketCreate)?;

        tracing::debug!("Connected to {}", addr);

        Ok(Self {
            reader: read_stream,
            writer: BufWriter::new(stream),
            peer_addr: addr.to_string(),
        })
    }

    /// Send one request and parse its response.
    ///
    /// Returns the raw status code; body bytes are appended to `body`.
    pub fn exchange(
        &mut self,
        method: Method,
        path: &str,
        query_string: &str,
        body: &[u8],
        server: &ServerInfo,
        response_body: &mut Vec<u8>,
    ) -> Result<u16> {
        write_request(&mut self.writer, method, path, query_string, body, server)?;
        let status = read_response(&mut self.reader, Some(response_body))?;

        tracing::debug!(
            peer = %self.peer_addr,
            status,
            body_len = response_body.len(),
            "Response received"
        );
        Ok(status)
    }
}
