//! End-to-end HTTP Tests
//!
//! Runs each exchange against a one-shot mock server on a loopback socket.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use influxline::http::{self, Method};
use influxline::{create_db, query, result_code, Builder, Error, ServerInfo};

// =============================================================================
// Mock Server
// =============================================================================

/// Accept one connection, capture the request, answer with `response`
/// and close. The handle yields the raw request bytes.
fn serve_once(response: &'static [u8]) -> (u16, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        stream.write_all(response).unwrap();
        request
    });

    (port, handle)
}

/// Read a request head plus its Content-Length body
fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];

    loop {
        if let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..end]).into_owned();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("Content-Length: "))
                .map(|v| v.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if data.len() >= end + 4 + len {
                return data;
            }
        }

        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            return data;
        }
        data.extend_from_slice(&buf[..n]);
    }
}

fn local(port: u16) -> ServerInfo {
    ServerInfo::new("127.0.0.1", port, "mydb", "user", "pass")
}

/// A loopback port with nothing listening on it
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

// =============================================================================
// Status Mapping Tests
// =============================================================================

#[test]
fn test_ok_with_content_length() {
    let (port, server) = serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nOK");

    let mut body = Vec::new();
    let result = http::request(Method::Get, "ping", "", b"", &local(port), Some(&mut body));

    assert_eq!(result_code(&result), 0);
    assert_eq!(result.unwrap(), 200);
    assert_eq!(body, b"OK");
    server.join().unwrap();
}

#[test]
fn test_ok_with_chunked_body() {
    let (port, server) = serve_once(
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\ndata\r\n0\r\n\r\n",
    );

    let mut body = b"stale".to_vec();
    let result = http::request(Method::Get, "query", "", b"", &local(port), Some(&mut body));

    assert_eq!(result_code(&result), 0);
    assert_eq!(body, b"data");
    server.join().unwrap();
}

#[test]
fn test_not_found_status() {
    let (port, server) = serve_once(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");

    let result = http::request(Method::Get, "nope", "", b"", &local(port), None);

    assert_eq!(result_code(&result), 404);
    match result {
        Err(Error::Status { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.is_empty());
        }
        other => panic!("Expected status error, got {:?}", other),
    }
    server.join().unwrap();
}

#[test]
fn test_error_status_carries_body() {
    let (port, server) = serve_once(
        b"HTTP/1.1 400 Bad Request\r\nContent-Length: 29\r\n\r\n{\"error\":\"unable to parse x\"}",
    );

    let err = http::request(Method::Post, "write", "", b"x", &local(port), None).unwrap_err();

    assert!(err.is_status());
    assert_eq!(err.code(), 400);
    assert!(err.to_string().contains("unable to parse x"));
    server.join().unwrap();
}

#[test]
fn test_no_content_is_success() {
    let (port, server) = serve_once(b"HTTP/1.1 204 No Content\r\n\r\n");
    let result = http::request(Method::Post, "write", "", b"m f=1i", &local(port), None);
    assert_eq!(result.unwrap(), 204);
    server.join().unwrap();
}

// =============================================================================
// Transport Failure Tests
// =============================================================================

#[test]
fn test_connection_refused() {
    let result = http::request(Method::Get, "ping", "", b"", &local(closed_port()), None);

    let code = result_code(&result);
    assert!(code < 0);
    assert!(matches!(result, Err(Error::Connect(_))));
    assert_eq!(code, -3);
}

#[test]
fn test_hostname_rejected_without_dns() {
    let info = ServerInfo::new("localhost", 8086, "db", "", "");
    let err = http::request(Method::Get, "ping", "", b"", &info, None).unwrap_err();
    assert!(matches!(err, Error::InvalidAddress(_)));
    assert_eq!(err.code(), -1);
}

#[test]
fn test_out_of_range_octet_rejected() {
    let info = ServerInfo::new("256.1.1.1", 8086, "db", "", "");
    let err = http::request(Method::Get, "ping", "", b"", &info, None).unwrap_err();
    assert_eq!(err.code(), -1);
}

#[test]
fn test_port_zero_rejected() {
    let info = ServerInfo::new("127.0.0.1", 0, "db", "", "");
    let err = http::request(Method::Get, "ping", "", b"", &info, None).unwrap_err();
    assert_eq!(err.code(), -1);
}

#[test]
fn test_server_closes_mid_headers() {
    let (port, server) = serve_once(b"HTTP/1.1 200 OK\r\nContent-");
    let err = http::request(Method::Get, "ping", "", b"", &local(port), None).unwrap_err();
    assert_eq!(err.code(), -7);
    server.join().unwrap();
}

#[test]
fn test_read_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let _ = read_request(&mut stream);
        thread::sleep(Duration::from_millis(1000));
    });

    let info = ServerInfo::builder()
        .host("127.0.0.1")
        .port(port)
        .read_timeout_ms(100)
        .build();
    let err = http::request(Method::Get, "ping", "", b"", &info, None).unwrap_err();

    assert!(matches!(err, Error::Recv(_)));
    server.join().unwrap();
}

// =============================================================================
// Write / Query / Create Tests
// =============================================================================

#[test]
fn test_post_http_sends_lines() {
    let (port, server) = serve_once(b"HTTP/1.1 204 No Content\r\nContent-Length: 0\r\n\r\n");

    let point = Builder::new()
        .measurement("cpu")
        .tag("host", "a")
        .field("value", 0.64)
        .timestamp(1234);
    point.post_http(&local(port)).unwrap();

    let request = String::from_utf8(server.join().unwrap()).unwrap();
    assert_eq!(
        request,
        "POST /write?db=mydb&u=user&p=pass HTTP/1.1\r\n\
         Host: 127.0.0.1\r\n\
         Content-Length: 26\r\n\
         \r\n\
         cpu,host=a value=0.64 1234"
    );
}

#[test]
fn test_post_http_with_response_returns_body() {
    let (port, server) = serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\ndone");

    let body = Builder::new()
        .measurement("m")
        .field("f", 1)
        .post_http_with_response(&local(port))
        .unwrap();

    assert_eq!(body, "done");
    server.join().unwrap();
}

#[test]
fn test_post_http_unreachable() {
    let err = Builder::new()
        .measurement("m")
        .field("f", 1)
        .post_http(&local(closed_port()))
        .unwrap_err();
    assert!(err.code() < 0);
}

#[test]
fn test_query_encodes_and_returns_body() {
    let (port, server) = serve_once(
        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nTransfer-Encoding: chunked\r\n\r\n\
          c\r\n{\"results\":[\r\n\
          3\r\n{}]\r\n\
          1\r\n}\r\n\
          0\r\n\r\n",
    );

    let body = query("SELECT * FROM cpu", &local(port)).unwrap();
    assert_eq!(body, "{\"results\":[{}]}");

    let request = String::from_utf8(server.join().unwrap()).unwrap();
    assert!(request.starts_with(
        "GET /query?db=mydb&u=user&p=pass&q=SELECT+%2A+FROM+cpu HTTP/1.1\r\n"
    ));
    assert!(request.contains("Content-Length: 0\r\n"));
}

#[test]
fn test_create_db_posts_statement() {
    let (port, server) = serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 14\r\n\r\n{\"results\":[]}");

    let body = create_db("new db", &local(port)).unwrap();
    assert_eq!(body, "{\"results\":[]}");

    let request = String::from_utf8(server.join().unwrap()).unwrap();
    assert!(request.starts_with(
        "POST /query?db=mydb&u=user&p=pass&q=create+database+new+db HTTP/1.1\r\n"
    ));
}
