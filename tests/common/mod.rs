//! Local TCP fixtures standing in for remote web servers.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mcp_link_checker::checker::LinkChecker;
use mcp_link_checker::config::ServerConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Checker that ignores proxy variables so probes reach the loopback fixtures.
pub fn test_checker(deadline: Duration) -> LinkChecker {
    let config = ServerConfig {
        probe_timeout: deadline,
        proxy_from_env: false,
        ..ServerConfig::default()
    };
    LinkChecker::new(&config).expect("build checker")
}

/// An HTTP server that answers every request with one fixed status line.
pub struct HttpFixture {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl HttpFixture {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Request lines received so far, e.g. `HEAD / HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub async fn http_fixture(status: u16, headers: &[(&str, &str)]) -> HttpFixture {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fixture");
    let addr = listener.local_addr().expect("local addr");
    let requests = Arc::new(Mutex::new(Vec::new()));

    let mut response = format!(
        "HTTP/1.1 {status} Fixture\r\ncontent-length: 0\r\nconnection: close\r\n"
    );
    for (name, value) in headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str("\r\n");

    let seen = requests.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let seen = seen.clone();
            let response = response.clone();
            tokio::spawn(async move {
                let Some(head) = read_head(&mut socket).await else {
                    return;
                };
                let line = head.lines().next().unwrap_or_default().to_string();
                seen.lock().unwrap().push(line);
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    HttpFixture { addr, requests }
}

/// A server that accepts connections and never answers.
pub async fn silent_fixture() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fixture");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fixture");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = vec![0u8; 8192];
    let mut read = 0;
    loop {
        let n = socket.read(&mut buf[read..]).await.ok()?;
        if n == 0 {
            return None;
        }
        read += n;
        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
            return Some(String::from_utf8_lossy(&buf[..read]).into_owned());
        }
        if read == buf.len() {
            return None;
        }
    }
}
