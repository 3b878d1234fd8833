use futures_util::{SinkExt, StreamExt};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

/// Request head as seen by a test upstream.
#[derive(Debug, Clone, Default)]
pub struct SeenRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Plain HTTP upstream that records every request head and answers
/// with a fixed status and `"<method> <target>"` as body.
pub struct EchoUpstream {
    port: u16,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    hits: Arc<AtomicUsize>,
}

impl EchoUpstream {
    pub fn start() -> Self {
        Self::start_with_status(200)
    }

    pub fn start_with_status(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind upstream");
        let port = listener.local_addr().unwrap().port();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let hits = Arc::new(AtomicUsize::new(0));

        thread::spawn({
            let seen = seen.clone();
            let hits = hits.clone();
            move || {
                for stream in listener.incoming() {
                    let Ok(mut stream) = stream else { continue };
                    let Some(req) = read_request_head(&mut stream) else {
                        continue;
                    };

                    hits.fetch_add(1, Ordering::SeqCst);
                    let body = format!("{} {}", req.method, req.target);
                    seen.lock().unwrap().push(req);

                    let resp = format!(
                        "HTTP/1.1 {status} Test\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(resp.as_bytes());
                }
            }
        });

        Self { port, seen, hits }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }

    pub fn authority(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Most recent request whose target starts with `prefix`.
    pub fn last_request(&self, prefix: &str) -> Option<SeenRequest> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.target.starts_with(prefix))
            .cloned()
    }
}

/// Upstream answering every request with a chunked body, one chunk at a
/// time with a pause between chunks.
pub struct ChunkedUpstream {
    port: u16,
}

impl ChunkedUpstream {
    pub fn start(chunks: &'static [&'static str]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind upstream");
        let port = listener.local_addr().unwrap().port();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                if read_request_head(&mut stream).is_none() {
                    continue;
                }

                let _ = stream.write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
                );
                for chunk in chunks {
                    let frame = format!("{:x}\r\n{chunk}\r\n", chunk.len());
                    let _ = stream.write_all(frame.as_bytes());
                    let _ = stream.flush();
                    thread::sleep(Duration::from_millis(30));
                }
                let _ = stream.write_all(b"0\r\n\r\n");
            }
        });

        Self { port }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }
}

/// WebSocket upstream echoing text and binary frames.
pub struct WsUpstream {
    port: u16,
    seen_hosts: Arc<Mutex<Vec<String>>>,
}

impl WsUpstream {
    /// Echo until the client closes.
    pub fn start() -> Self {
        Self::start_with(false)
    }

    /// Echo the first frame, then close the socket from the upstream side.
    pub fn start_closing_after_echo() -> Self {
        Self::start_with(true)
    }

    fn start_with(close_after_echo: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind upstream");
        listener.set_nonblocking(true).unwrap();
        let port = listener.local_addr().unwrap().port();
        let seen_hosts = Arc::new(Mutex::new(Vec::new()));

        thread::spawn({
            let seen_hosts = seen_hosts.clone();
            move || {
                let rt = tokio::runtime::Runtime::new().unwrap();
                rt.block_on(async move {
                    let listener = tokio::net::TcpListener::from_std(listener).unwrap();

                    loop {
                        let Ok((stream, _)) = listener.accept().await else {
                            continue;
                        };
                        let seen_hosts = seen_hosts.clone();

                        tokio::spawn(async move {
                            let callback = |req: &Request, resp: Response| {
                                let host = req
                                    .headers()
                                    .get("host")
                                    .and_then(|v| v.to_str().ok())
                                    .unwrap_or_default()
                                    .to_string();
                                seen_hosts.lock().unwrap().push(host);
                                Ok::<Response, ErrorResponse>(resp)
                            };

                            let Ok(mut ws) =
                                tokio_tungstenite::accept_hdr_async(stream, callback).await
                            else {
                                return;
                            };

                            while let Some(Ok(msg)) = ws.next().await {
                                if msg.is_text() || msg.is_binary() {
                                    if ws.send(msg).await.is_err() {
                                        break;
                                    }
                                    if close_after_echo {
                                        let _ = ws.close(None).await;
                                        // Wait for the close reply, then drop the TCP stream.
                                        let _ = tokio::time::timeout(Duration::from_secs(2), async {
                                            while let Some(Ok(_)) = ws.next().await {}
                                        })
                                        .await;
                                        break;
                                    }
                                } else if msg.is_close() {
                                    break;
                                }
                            }
                        });
                    }
                });
            }
        });

        Self { port, seen_hosts }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }

    pub fn authority(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    pub fn seen_hosts(&self) -> Vec<String> {
        self.seen_hosts.lock().unwrap().clone()
    }
}

/// Read an HTTP/1.1 request head; bodies are not expected.
fn read_request_head(stream: &mut TcpStream) -> Option<SeenRequest> {
    stream
        .set_read_timeout(Some(Duration::from_secs(2)))
        .ok()?;

    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    while !buf.ends_with(b"\r\n\r\n") {
        match stream.read(&mut byte) {
            Ok(1) => buf.push(byte[0]),
            _ => return None,
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();

    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    Some(SeenRequest {
        method,
        target,
        headers,
    })
}
