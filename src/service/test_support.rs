// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Minimal in-process HTTP stubs for exercising the backend client without a
//! real server. One canned response per connection, served in order; each
//! connection counts as one hit.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub(crate) struct StubBackend {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl StubBackend {
    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub(crate) fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serves the given `(status, body)` responses in order; the last one repeats
/// for any further connections. Connections are closed after one response.
pub(crate) async fn serve_responses(responses: Vec<(u16, String)>) -> StubBackend {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener addr");
    let hits = Arc::new(AtomicUsize::new(0));

    let task_hits = hits.clone();
    tokio::spawn(async move {
        let mut served = 0usize;
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            task_hits.fetch_add(1, Ordering::SeqCst);
            let (status, body) = responses
                .get(served)
                .or_else(|| responses.last())
                .cloned()
                .unwrap_or((200, String::new()));
            served += 1;

            if read_request(&mut socket).await.is_err() {
                continue;
            }
            let response = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    StubBackend { addr, hits }
}

/// Accepts connections and never responds. Sockets are parked open so the
/// client sees a timeout rather than a reset.
pub(crate) async fn serve_silent() -> StubBackend {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener addr");
    let hits = Arc::new(AtomicUsize::new(0));

    let task_hits = hits.clone();
    tokio::spawn(async move {
        let mut parked = Vec::new();
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            task_hits.fetch_add(1, Ordering::SeqCst);
            parked.push(socket);
        }
    });

    StubBackend { addr, hits }
}

/// Binds a port and immediately stops listening, yielding an address that
/// refuses connections.
pub(crate) async fn refused_base_url() -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway listener addr");
    drop(listener);
    format!("http://{addr}")
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(header_end) = find_subslice(&buffer, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buffer[..header_end]);
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);

            let mut body_read = buffer.len() - (header_end + 4);
            while body_read < content_length {
                let n = socket.read(&mut chunk).await?;
                if n == 0 {
                    break;
                }
                body_read += n;
            }
            return Ok(());
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
