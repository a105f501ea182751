use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use strata_common::config::Config;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A loopback HTTP/1.1 server that answers every GET with the same response.
///
/// Connections that do not open with `GET ` (a bare TCP probe, a TLS
/// ClientHello) are closed without a reply.
pub async fn http_responder(status_line: &'static str, extra_headers: &'static str) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(respond(stream, status_line, extra_headers));
        }
    });

    port
}

async fn respond(mut stream: TcpStream, status_line: &str, extra_headers: &str) {
    let mut request = Vec::new();
    let mut buf = [0u8; 2048];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
        if !request.starts_with(b"GET ") && request.len() >= 4 {
            return;
        }
        if request.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let body = "strata test responder";
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n{extra_headers}\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Listens on a fixed loopback port and records the first byte each client sends.
///
/// Returns `None` when the port is already taken on this machine.
pub async fn first_byte_recorder(port: u16) -> Option<Arc<Mutex<Vec<u8>>>> {
    let listener = TcpListener::bind(("127.0.0.1", port)).await.ok()?;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = seen.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let record = record.clone();
            tokio::spawn(async move {
                let mut first = [0u8; 1];
                if let Ok(1) = stream.read(&mut first).await {
                    record.lock().unwrap().push(first[0]);
                }
            });
        }
    });

    Some(seen)
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    addr.port()
}

pub fn quick_config() -> Config {
    Config {
        timeout: 3.0,
        workers: 2,
        ..Config::default()
    }
}
