//! Forwarding HTTP proxy for integration tests, with fault injection.
//!
//! Accepts absolute-form requests (`GET http://host:port/path HTTP/1.1`),
//! fetches the resource from the origin and relays the response, optionally
//! damaging it according to `ProxyMode`.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMode {
    /// Relay bytes unmodified.
    Transparent,
    /// Flip the first body byte.
    Corrupt,
    /// Relay only the first half of the body, with a matching Content-Length.
    Truncate,
    /// Advertise the full Content-Length but close after half the body.
    CloseEarly,
    /// Relay headers with a 0-byte body.
    Empty,
    /// Accept the request and never answer.
    Hang,
    /// Answer 502 without contacting the origin.
    BadGateway,
}

pub struct Proxy {
    /// `host:port` to hand to curl as the proxy.
    pub addr: String,
    requests: Arc<AtomicUsize>,
}

impl Proxy {
    /// Number of client requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Starts a proxy in a background thread. Runs until the process exits.
pub fn start(mode: ProxyMode) -> Proxy {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(AtomicUsize::new(0));
    let requests_srv = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let requests = Arc::clone(&requests_srv);
            thread::spawn(move || handle(stream, mode, &requests));
        }
    });
    Proxy {
        addr: format!("127.0.0.1:{}", port),
        requests,
    }
}

fn handle(mut client: TcpStream, mode: ProxyMode, requests: &AtomicUsize) {
    let _ = client.set_read_timeout(Some(Duration::from_secs(5)));
    let head = super::read_head(&mut client);
    if head.is_empty() {
        return;
    }
    requests.fetch_add(1, Ordering::SeqCst);

    match mode {
        ProxyMode::Hang => {
            // Hold the connection open well past any client deadline.
            thread::sleep(Duration::from_secs(30));
            return;
        }
        ProxyMode::BadGateway => {
            let _ = client.write_all(
                b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
            return;
        }
        _ => {}
    }

    let request = String::from_utf8_lossy(&head);
    let Some((authority, path)) = parse_target(&request) else {
        let _ = client.write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n");
        return;
    };
    let Some((status_line, mut body)) = fetch_origin(&authority, &path) else {
        let _ = client.write_all(
            b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    };

    let mut advertised = None;
    match mode {
        ProxyMode::Corrupt => {
            if let Some(b) = body.first_mut() {
                *b ^= 0xff;
            }
        }
        ProxyMode::Truncate => body.truncate(body.len() / 2),
        ProxyMode::CloseEarly => {
            advertised = Some(body.len());
            body.truncate(body.len() / 2);
        }
        ProxyMode::Empty => body.clear(),
        _ => {}
    }

    let response = format!(
        "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status_line,
        advertised.unwrap_or(body.len())
    );
    let _ = client.write_all(response.as_bytes());
    let _ = client.write_all(&body);
}

/// Splits `GET http://host:port/path HTTP/1.1` into ("host:port", "/path").
fn parse_target(request: &str) -> Option<(String, String)> {
    let line = request.lines().next()?;
    let target = line.split_whitespace().nth(1)?;
    let rest = target.strip_prefix("http://")?;
    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };
    Some((authority.to_string(), path.to_string()))
}

/// GETs `path` from the origin and returns (status line, body).
fn fetch_origin(authority: &str, path: &str) -> Option<(String, Vec<u8>)> {
    let mut upstream = TcpStream::connect(authority).ok()?;
    let _ = upstream.set_read_timeout(Some(Duration::from_secs(5)));
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, authority
    );
    upstream.write_all(request.as_bytes()).ok()?;
    let mut raw = Vec::new();
    upstream.read_to_end(&mut raw).ok()?;

    let split = raw.windows(4).position(|w| w == b"\r\n\r\n")?;
    let head = String::from_utf8_lossy(&raw[..split]).to_string();
    let status_line = head.lines().next()?.to_string();
    Some((status_line, raw[split + 4..].to_vec()))
}
