//! UDP sink
//!
//! Fire-and-forget delivery of a line-protocol buffer as one datagram.

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use crate::error::{Error, Result};
use crate::http::parse_addr;

/// Send `payload` to `host:port` in a single datagram. No reply is read.
pub fn send(host: &str, port: u16, payload: &[u8]) -> Result<()> {
    let addr = parse_addr(host, port)?;

    let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0))
        .map_err(Error::SocketCreate)?;

    let sent = socket.send_to(payload, addr).map_err(Error::ShortWrite)?;
    if sent < payload.len() {
        return Err(Error::ShortWrite(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("sent {} of {} bytes", sent, payload.len()),
        )));
    }

    tracing::debug!(%addr, bytes = sent, "Datagram sent");
    Ok(())
}
