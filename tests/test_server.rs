use std::net::SocketAddr;

use rye::config::ServerConfig;
use rye::http::bind::{Bind, BindError, Fields};
use rye::routing::tree::RouteError;
use rye::{BodyKind, Chain, Context, HandlerResult, HttpError, Server, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn start(server: Server) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve(listener));
    addr
}

/// Sends one raw request and reads until the server closes the connection.
async fn send(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

fn header<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    let (head, _) = raw.split_once("\r\n\r\n")?;
    head.split("\r\n")
        .skip(1)
        .filter_map(|l| l.split_once(": "))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

fn body(raw: &str) -> &str {
    raw.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or_default()
}

fn hello(ctx: &mut Context) -> HandlerResult {
    ctx.string(StatusCode::OK, "Hello, World!")
}

fn echo_user(ctx: &mut Context) -> HandlerResult {
    let id = ctx.path_param("id").unwrap_or_default().to_string();
    ctx.string(StatusCode::OK, id)
}

fn unauthorized(_ctx: &mut Context) -> HandlerResult {
    Err(HttpError::new(StatusCode::UNAUTHORIZED, BodyKind::Json).into())
}

#[derive(Debug, Default)]
struct Search {
    q: String,
    page: i64,
}

impl Bind for Search {
    fn bind(&mut self, fields: &Fields<'_>) -> Result<(), BindError> {
        fields.string("q", &mut self.q)?;
        fields.int("page", &mut self.page)
    }
}

fn search(ctx: &mut Context) -> HandlerResult {
    let s: Search = ctx.bind_query()?;
    ctx.string(StatusCode::OK, format!("{}:{}", s.q, s.page))
}

fn echo_json(ctx: &mut Context) -> HandlerResult {
    let value: serde_json::Value = ctx.bind_body()?;
    ctx.json(StatusCode::CREATED, &value)
}

fn app() -> Server {
    let mut server = Server::new(ServerConfig::default());
    server
        .get("/hello", hello)
        .unwrap()
        .get("/users/{id}", echo_user)
        .unwrap()
        .get("/secret", unauthorized)
        .unwrap()
        .get("/search", search)
        .unwrap()
        .post("/echo", echo_json)
        .unwrap();
    server
}

#[tokio::test]
async fn test_static_route_returns_text() {
    let addr = start(app()).await;

    let raw = send(addr, "GET /hello HTTP/1.1\r\nHost: x\r\n\r\n").await;

    assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body(&raw), "Hello, World!");
    assert_eq!(header(&raw, "Content-Type"), Some("text/plain; charset=utf-8"));
    assert_eq!(header(&raw, "Content-Length"), Some("13"));
    assert_eq!(header(&raw, "Connection"), Some("close"));
    assert!(header(&raw, "Date").is_some());
}

#[tokio::test]
async fn test_path_param_is_bound() {
    let addr = start(app()).await;

    let raw = send(addr, "GET /users/99 HTTP/1.1\r\nHost: x\r\n\r\n").await;

    assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body(&raw), "99");
}

#[tokio::test]
async fn test_http_error_rendered_as_json() {
    let addr = start(app()).await;

    let raw = send(addr, "GET /secret HTTP/1.1\r\nHost: x\r\n\r\n").await;

    assert!(raw.starts_with("HTTP/1.1 401 Unauthorized\r\n"));
    assert_eq!(header(&raw, "Content-Type"), Some("application/json"));
    assert_eq!(body(&raw), r#"{"error": "Unauthorized"}"#);
}

#[tokio::test]
async fn test_unmatched_route_gets_fixed_404() {
    let addr = start(app()).await;

    let raw = send(addr, "GET /nowhere HTTP/1.1\r\nHost: x\r\n\r\n").await;

    assert!(raw.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert_eq!(body(&raw), "Path route not found");
}

#[tokio::test]
async fn test_catch_all_replaces_404() {
    let mut server = app();
    server.catch_all(|ctx: &mut Context| -> HandlerResult {
        let message = format!("Nothing at {}", ctx.url());
        Err(HttpError::with_message(StatusCode::NOT_FOUND, message, BodyKind::Json).into())
    });
    let addr = start(server).await;

    let raw = send(addr, "GET /nowhere HTTP/1.1\r\n\r\n").await;

    assert!(raw.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert_eq!(body(&raw), r#"{"error": "Nothing at /nowhere"}"#);
}

#[tokio::test]
async fn test_query_params_bound_into_struct() {
    let addr = start(app()).await;

    let raw = send(addr, "GET /search?q=hello%20world&page=3 HTTP/1.1\r\n\r\n").await;

    assert_eq!(body(&raw), "hello world:3");
}

#[tokio::test]
async fn test_bind_failure_is_500() {
    let addr = start(app()).await;

    let raw = send(addr, "GET /search?page=two HTTP/1.1\r\n\r\n").await;

    assert!(raw.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert!(body(&raw).contains("page"));
}

#[tokio::test]
async fn test_json_body_echo() {
    let addr = start(app()).await;
    let payload = r#"{"key1":"value1","key2":"value2"}"#;
    let request = format!(
        "POST /echo HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        payload.len(),
        payload
    );

    let raw = send(addr, &request).await;

    assert!(raw.starts_with("HTTP/1.1 201 Created\r\n"));
    assert_eq!(header(&raw, "Content-Type"), Some("application/json"));
    let echoed: serde_json::Value = serde_json::from_str(body(&raw)).unwrap();
    assert_eq!(echoed["key1"], "value1");
    assert_eq!(echoed["key2"], "value2");
}

#[tokio::test]
async fn test_trailing_slash_matches_route() {
    let addr = start(app()).await;

    let raw = send(addr, "GET /hello/ HTTP/1.1\r\n\r\n").await;

    assert_eq!(body(&raw), "Hello, World!");
}

#[tokio::test]
async fn test_malformed_request_gets_400() {
    let addr = start(app()).await;

    let raw = send(addr, "GET /hello\r\n\r\n").await;

    assert!(raw.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert_eq!(body(&raw), "invalid request");
}

#[tokio::test]
async fn test_concurrent_connections() {
    let addr = start(app()).await;

    let clients: Vec<_> = (0..16)
        .map(|i| {
            tokio::spawn(async move {
                let raw = send(addr, &format!("GET /users/{i} HTTP/1.1\r\n\r\n")).await;
                body(&raw).to_string()
            })
        })
        .collect();

    for (i, client) in clients.into_iter().enumerate() {
        assert_eq!(client.await.unwrap(), i.to_string());
    }
}

#[tokio::test]
async fn test_custom_error_handler() {
    let mut server = app();
    server.error_handler(|err, ctx| {
        let status = err
            .as_http()
            .map(HttpError::status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ctx.string(status, "custom")
    });
    let addr = start(server).await;

    let raw = send(addr, "GET /secret HTTP/1.1\r\n\r\n").await;

    assert!(raw.starts_with("HTTP/1.1 401 Unauthorized\r\n"));
    assert_eq!(body(&raw), "custom");
}

#[test]
fn test_registration_rejects_bad_paths() {
    let mut server = Server::new(ServerConfig::default());

    assert!(matches!(
        server.get("hello", hello),
        Err(RouteError::InvalidPath(_))
    ));

    server.get("/items/{id}", echo_user).unwrap();
    assert!(matches!(
        server.put("/items/{name}", Chain::from(hello)),
        Err(RouteError::ConflictingParam { .. })
    ));

    assert_eq!(server.router().tree().len(), 1);
}
