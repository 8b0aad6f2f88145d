use rye::http::bind::{Bind, BindError, Fields, parse_bool};
use rye::http::context::Context;
use rye::http::error::{BodyKind, HandlerError, HttpError, default_error_handler};
use rye::http::handler::{Chain, HandlerResult};
use rye::http::request::{Method, RequestBuilder};
use rye::http::response::{MIME_HTML, MIME_JSON, MIME_TEXT, StatusCode};
use rye::http::store::{Store, Value};
use serde::{Deserialize, Serialize};

fn context() -> Context {
    Context::new(
        RequestBuilder::new()
            .method(Method::GET)
            .path("/test")
            .build()
            .unwrap(),
    )
}

#[derive(Debug, Default, PartialEq)]
struct Paging {
    q: String,
    limit: i64,
    ratio: f64,
    verbose: bool,
}

impl Bind for Paging {
    fn bind(&mut self, fields: &Fields<'_>) -> Result<(), BindError> {
        fields.string("q", &mut self.q)?;
        fields.int("limit", &mut self.limit)?;
        fields.float("ratio", &mut self.ratio)?;
        fields.bool("verbose", &mut self.verbose)
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
struct Greeting {
    key1: String,
    key2: String,
}

// Store

#[test]
fn test_store_typed_getters() {
    let mut store = Store::new();
    store.set("name", "ana");
    store.set("count", 3);
    store.set("ratio", 0.5);
    store.set("admin", true);

    assert_eq!(store.get_string("name"), Some("ana"));
    assert_eq!(store.get_int("count"), Some(3));
    assert_eq!(store.get_float("ratio"), Some(0.5));
    assert_eq!(store.get_bool("admin"), Some(true));
    assert_eq!(store.len(), 4);
}

#[test]
fn test_store_type_mismatch_is_none() {
    let mut store = Store::new();
    store.set("count", 3);

    assert_eq!(store.get_string("count"), None);
    assert_eq!(store.get_bool("count"), None);
    assert_eq!(store.get("count"), Some(&Value::Int(3)));
    assert_eq!(store.get_int("missing"), None);
}

#[test]
fn test_store_overwrite_remove_clear() {
    let mut store = Store::new();
    store.set("k", "one");
    store.set("k", "two");
    assert_eq!(store.get_string("k"), Some("two"));

    assert_eq!(store.remove("k"), Some(Value::Str("two".to_string())));
    assert!(store.is_empty());

    store.set("a", 1);
    store.set("b", 2);
    store.clear();
    assert_eq!(store.iter().count(), 0);
}

// Binding

#[test]
fn test_bind_query_into_struct() {
    let ctx = Context::new(
        RequestBuilder::new()
            .method(Method::GET)
            .path("/search")
            .query_param("q", "rust")
            .query_param("limit", "20")
            .query_param("ratio", "1.5")
            .query_param("verbose", "T")
            .build()
            .unwrap(),
    );

    let paging: Paging = ctx.bind_query().unwrap();
    assert_eq!(
        paging,
        Paging {
            q: "rust".to_string(),
            limit: 20,
            ratio: 1.5,
            verbose: true,
        }
    );
}

#[test]
fn test_bind_missing_keys_keep_defaults() {
    let ctx = context();
    let paging: Paging = ctx.bind_query().unwrap();
    assert_eq!(paging, Paging::default());
}

#[test]
fn test_bind_invalid_value_is_error() {
    let ctx = Context::new(
        RequestBuilder::new()
            .method(Method::GET)
            .path("/search")
            .query_param("limit", "lots")
            .build()
            .unwrap(),
    );

    let err = ctx.bind_query::<Paging>().unwrap_err();
    assert_eq!(
        err,
        BindError::InvalidValue {
            key: "limit".to_string(),
            value: "lots".to_string(),
            expected: "integer",
        }
    );
}

#[test]
fn test_bind_path_and_header() {
    #[derive(Debug, Default)]
    struct Id {
        id: String,
    }

    impl Bind for Id {
        fn bind(&mut self, fields: &Fields<'_>) -> Result<(), BindError> {
            fields.string("id", &mut self.id)
        }
    }

    let ctx = Context::new(
        RequestBuilder::new()
            .method(Method::GET)
            .path("/api/7")
            .path_param("id", "7")
            .header("id", "from-header")
            .build()
            .unwrap(),
    );

    assert_eq!(ctx.bind_path::<Id>().unwrap().id, "7");
    assert_eq!(ctx.bind_header::<Id>().unwrap().id, "from-header");
}

#[test]
fn test_parse_bool_spellings() {
    for s in ["1", "t", "T", "TRUE", "true", "True"] {
        assert_eq!(parse_bool(s), Some(true), "{s}");
    }
    for s in ["0", "f", "F", "FALSE", "false", "False"] {
        assert_eq!(parse_bool(s), Some(false), "{s}");
    }
    assert_eq!(parse_bool("yes"), None);
}

#[test]
fn test_bind_body_json() {
    let ctx = Context::new(
        RequestBuilder::new()
            .method(Method::POST)
            .path("/hello")
            .body(br#"{"key1":"value1","key2":"value2"}"#.to_vec())
            .build()
            .unwrap(),
    );

    let greeting: Greeting = ctx.bind_body().unwrap();
    assert_eq!(greeting.key1, "value1");
    assert_eq!(greeting.key2, "value2");
}

#[test]
fn test_bind_body_invalid_json() {
    let ctx = Context::new(
        RequestBuilder::new()
            .method(Method::POST)
            .path("/hello")
            .body(b"not json".to_vec())
            .build()
            .unwrap(),
    );

    assert!(ctx.bind_body::<Greeting>().is_err());
}

// Response senders

#[test]
fn test_string_sets_status_type_and_body() {
    let mut ctx = context();
    ctx.string(StatusCode::CREATED, "made").unwrap();

    let resp = ctx.response();
    assert_eq!(resp.status, Some(StatusCode::CREATED));
    assert_eq!(resp.header("Content-Type"), Some(MIME_TEXT));
    assert_eq!(resp.body, b"made");
}

#[test]
fn test_json_sender() {
    let mut ctx = context();
    let greeting = Greeting {
        key1: "a".to_string(),
        key2: "b".to_string(),
    };
    ctx.json(StatusCode::OK, &greeting).unwrap();

    let resp = ctx.response();
    assert_eq!(resp.header("Content-Type"), Some(MIME_JSON));
    let echoed: Greeting = serde_json::from_slice(&resp.body).unwrap();
    assert_eq!(echoed, greeting);
}

#[test]
fn test_html_sender() {
    let mut ctx = context();
    ctx.html(StatusCode::OK, "<p>hi</p>").unwrap();

    assert_eq!(ctx.response().header("Content-Type"), Some(MIME_HTML));
}

#[test]
fn test_bytes_with_empty_content_type_keeps_existing() {
    let mut ctx = context();
    ctx.set_header("Content-Type", "image/png");
    ctx.bytes(StatusCode::OK, "", vec![1, 2, 3]).unwrap();

    let resp = ctx.response();
    assert_eq!(resp.header("Content-Type"), Some("image/png"));
    assert_eq!(resp.body, vec![1, 2, 3]);
}

#[test]
fn test_sender_replaces_lowercase_content_type() {
    let mut ctx = context();
    ctx.set_header("content-type", "image/png");
    ctx.json(StatusCode::OK, &[1, 2]).unwrap();

    let resp = ctx.response();
    assert_eq!(resp.header("Content-Type"), Some(MIME_JSON));
    assert_eq!(resp.header("content-type"), None);
    assert_eq!(resp.headers.len(), 1);
}

#[test]
fn test_last_sender_wins() {
    let mut ctx = context();
    ctx.string(StatusCode::OK, "first").unwrap();
    ctx.string(StatusCode::from_u16(202), "second").unwrap();

    assert_eq!(ctx.response().status, Some(StatusCode::from_u16(202)));
    assert_eq!(ctx.response().body, b"second");
}

#[test]
fn test_context_accessors() {
    let ctx = Context::new(
        RequestBuilder::new()
            .method(Method::DELETE)
            .path("/items/3")
            .header("X-Req", "1")
            .query_param("force", "true")
            .path_param("id", "3")
            .build()
            .unwrap(),
    );

    assert_eq!(ctx.method(), Method::DELETE);
    assert_eq!(ctx.url(), "/items/3");
    assert_eq!(ctx.header("X-Req"), Some("1"));
    assert_eq!(ctx.query_param("force"), Some("true"));
    assert_eq!(ctx.path_param("id"), Some("3"));
    assert_eq!(ctx.headers().len(), 1);
    assert_eq!(ctx.query_params().len(), 1);
    assert_eq!(ctx.path_params().len(), 1);
}

#[test]
fn test_context_store_delegates() {
    let mut ctx = context();
    ctx.set("userId", "k2380sd");
    ctx.set("attempts", 2);

    assert_eq!(ctx.get_string("userId"), Some("k2380sd"));
    assert_eq!(ctx.get_int("attempts"), Some(2));
    assert_eq!(ctx.remove("attempts"), Some(Value::Int(2)));
    assert_eq!(ctx.get("attempts"), None);
}

// Chains

fn set_user(ctx: &mut Context) -> HandlerResult {
    ctx.set("userId", "u1");
    Ok(())
}

fn deny(_ctx: &mut Context) -> HandlerResult {
    Err(HttpError::new(StatusCode::UNAUTHORIZED, BodyKind::Json).into())
}

fn echo_user(ctx: &mut Context) -> HandlerResult {
    let user = ctx.get_string("userId").unwrap_or("nobody").to_string();
    ctx.string(StatusCode::OK, user)
}

#[test]
fn test_chain_passes_store_down() {
    let chain = Chain::new().with(set_user).with(echo_user);
    let mut ctx = context();

    chain.run(&mut ctx).unwrap();
    assert_eq!(ctx.response().body, b"u1");
}

#[test]
fn test_chain_short_circuits_on_error() {
    let chain = Chain::new().with(deny).with(echo_user);
    let mut ctx = context();

    let err = chain.run(&mut ctx).unwrap_err();
    assert_eq!(err.as_http().unwrap().status(), StatusCode::UNAUTHORIZED);
    // echo_user never ran
    assert!(ctx.response().body.is_empty());
    assert_eq!(ctx.response().status, None);
}

#[test]
fn test_chain_from_single_handler() {
    let chain = Chain::from(echo_user);
    assert_eq!(chain.len(), 1);
    assert!(Chain::new().is_empty());
}

// Errors

#[test]
fn test_http_error_json_envelope() {
    let err = HttpError::new(StatusCode::UNAUTHORIZED, BodyKind::Json);

    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.message(), "Unauthorized");
    assert_eq!(err.body(), br#"{"error": "Unauthorized"}"#);
}

#[test]
fn test_http_error_json_escapes_message() {
    let err = HttpError::with_message(StatusCode::BAD_REQUEST, "bad \"name\"", BodyKind::Json);

    let parsed: serde_json::Value = serde_json::from_slice(err.body()).unwrap();
    assert_eq!(parsed["error"], "bad \"name\"");
}

#[test]
fn test_http_error_text_body() {
    let err = HttpError::with_message(StatusCode::FORBIDDEN, "go away", BodyKind::Text);

    assert_eq!(err.body(), b"go away");
    assert_eq!(err.kind(), BodyKind::Text);
    assert_eq!(err.to_string(), "HTTP error 403: go away");
}

#[test]
fn test_default_error_handler_renders_http_error() {
    let mut ctx = context();
    let err: HandlerError = HttpError::new(StatusCode::UNAUTHORIZED, BodyKind::Json).into();

    default_error_handler(err, &mut ctx).unwrap();

    let resp = ctx.response();
    assert_eq!(resp.status, Some(StatusCode::UNAUTHORIZED));
    assert_eq!(resp.header("Content-Type"), Some(MIME_JSON));
    assert_eq!(resp.body, br#"{"error": "Unauthorized"}"#);
}

#[test]
fn test_default_error_handler_other_is_500() {
    let mut ctx = context();

    default_error_handler(HandlerError::msg("database unreachable"), &mut ctx).unwrap();

    let resp = ctx.response();
    assert_eq!(resp.status, Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(resp.header("Content-Type"), Some(MIME_TEXT));
    assert_eq!(resp.body, b"database unreachable");
}

#[test]
fn test_bind_error_converts_to_other() {
    let err: HandlerError = BindError::InvalidValue {
        key: "limit".to_string(),
        value: "x".to_string(),
        expected: "integer",
    }
    .into();

    assert!(err.as_http().is_none());
    assert!(err.to_string().contains("limit"));
}
