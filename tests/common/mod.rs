//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use shortlink_edge::{EdgeConfig, EdgeServer, Shutdown};

/// What the mock answers on `?resolve=`.
#[derive(Clone)]
#[allow(dead_code)]
pub enum ResolveReply {
    Text(&'static str),
    Status(u16),
    /// A trusted URL padded to `n` path characters.
    Large(usize),
    /// Close the connection without answering.
    Hangup,
}

/// Observed traffic on the mock backend.
#[derive(Default)]
#[allow(dead_code)]
pub struct Calls {
    pub resolve: AtomicUsize,
    pub page: AtomicUsize,
    pub qr: AtomicUsize,
    pub admin: AtomicUsize,
    pub last_query: Mutex<HashMap<String, String>>,
    pub last_headers: Mutex<HeaderMap>,
}

#[derive(Clone)]
struct MockState {
    resolve: ResolveReply,
    calls: Arc<Calls>,
}

/// Start a backend that speaks the resolve / page / qr / admin contract on
/// `/exec`. Returns its base URL and the call recorder.
pub async fn start_mock_backend(resolve: ResolveReply) -> (String, Arc<Calls>) {
    let calls = Arc::new(Calls::default());
    if let ResolveReply::Hangup = resolve {
        return (start_hangup_backend(calls.clone()).await, calls);
    }

    let state = MockState {
        resolve,
        calls: calls.clone(),
    };

    let app = Router::new().route("/exec", get(mock_handler)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}/exec", addr), calls)
}

async fn mock_handler(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    *state.calls.last_query.lock().unwrap() = query.clone();
    *state.calls.last_headers.lock().unwrap() = headers;

    if query.contains_key("resolve") {
        state.calls.resolve.fetch_add(1, Ordering::SeqCst);
        return match state.resolve {
            ResolveReply::Text(body) => (StatusCode::OK, body).into_response(),
            ResolveReply::Large(n) => {
                (StatusCode::OK, format!("https://dest.example/{}", "a".repeat(n))).into_response()
            }
            ResolveReply::Hangup => unreachable!("served by the raw TCP backend"),
            ResolveReply::Status(code) => (
                StatusCode::from_u16(code).unwrap(),
                "<html>Script error</html>",
            )
                .into_response(),
        };
    }

    if let Some(slug) = query.get("s") {
        state.calls.page.fetch_add(1, Ordering::SeqCst);
        return (
            StatusCode::OK,
            [
                ("content-type", "text/html; charset=utf-8"),
                ("cache-control", "public, max-age=3600"),
                ("x-backend", "page"),
            ],
            page_body(slug),
        )
            .into_response();
    }

    if let Some(slug) = query.get("qr") {
        state.calls.qr.fetch_add(1, Ordering::SeqCst);
        return (
            StatusCode::OK,
            [("content-type", "image/png")],
            format!("PNG:{}", slug),
        )
            .into_response();
    }

    if query.get("admin").map(String::as_str) == Some("1") {
        state.calls.admin.fetch_add(1, Ordering::SeqCst);
        return match query.get("pass").map(String::as_str) {
            Some("panel-secret") => (
                StatusCode::OK,
                [("content-type", "text/html; charset=utf-8")],
                "<h1>Admin panel</h1>",
            )
                .into_response(),
            _ => (StatusCode::FORBIDDEN, "bad pass").into_response(),
        };
    }

    (StatusCode::BAD_REQUEST, "unknown request").into_response()
}

fn page_body(slug: &str) -> String {
    format!("<meta http-equiv=\"refresh\" content=\"0;url=https://dest.example/{}\">", slug)
}

/// Raw TCP backend: hangs up on `?resolve=` after reading the request, and
/// serves the same page as the mock on `?s=`.
async fn start_hangup_backend(calls: Arc<Calls>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let calls = calls.clone();
            tokio::spawn(async move {
                let Some(target) = read_request_target(&mut socket).await else {
                    return;
                };
                let url = url::Url::parse(&format!("http://backend{}", target)).unwrap();
                let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
                *calls.last_query.lock().unwrap() = query.clone();

                if query.contains_key("resolve") {
                    calls.resolve.fetch_add(1, Ordering::SeqCst);
                    drop(socket);
                    return;
                }

                if let Some(slug) = query.get("s") {
                    calls.page.fetch_add(1, Ordering::SeqCst);
                    let body = page_body(slug);
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nCache-Control: public, max-age=3600\r\nX-Backend: page\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
            });
        }
    });

    format!("http://{}/exec", addr)
}

/// Read a request head and return its target (`/exec?...`).
async fn read_request_target(socket: &mut TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        head.extend_from_slice(&buf[..n]);
    }
    let head = String::from_utf8_lossy(&head);
    head.lines().next()?.split_whitespace().nth(1).map(str::to_string)
}

/// Config pointing at `base_url`, listening on an ephemeral port.
pub fn edge_config(base_url: Option<String>) -> EdgeConfig {
    let mut config = EdgeConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.backend.base_url = base_url;
    config
}

/// Start an edge server. Returns its address and the shutdown handle.
pub async fn start_edge(config: EdgeConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = EdgeServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
