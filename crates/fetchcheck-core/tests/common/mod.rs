#![allow(dead_code)]

pub mod proxy;
pub mod target_server;

use std::io::Read;
use std::net::TcpStream;

/// Reads from `stream` until the end of the HTTP head (`\r\n\r\n`), the peer
/// closes, or 64 KiB arrive. Returns everything read so far.
pub fn read_head(stream: &mut TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") && data.len() < 64 * 1024 {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    data
}

/// Port that nothing listens on (bound then released).
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
