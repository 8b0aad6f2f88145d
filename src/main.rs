use rye::config::Config;
use rye::http::bind::{Bind, BindError, Fields};
use rye::{BodyKind, Chain, Context, HandlerResult, HttpError, Server, StatusCode};
use serde::{Deserialize, Serialize};

const DEMO_TOKEN: &str = "Abcde";
const DEMO_USER_ID: &str = "k2380sd";

#[derive(Debug, Deserialize, Serialize)]
struct Greeting {
    key1: String,
    key2: String,
}

#[derive(Debug, Default)]
struct ApiPath {
    id: String,
}

impl Bind for ApiPath {
    fn bind(&mut self, fields: &Fields<'_>) -> Result<(), BindError> {
        fields.string("id", &mut self.id)
    }
}

fn hello_get(ctx: &mut Context) -> HandlerResult {
    ctx.set_header("CustomHeader", "CustomValue");
    ctx.string(StatusCode::OK, "Hello, World!")
}

fn hello_post(ctx: &mut Context) -> HandlerResult {
    let body: Greeting = ctx.bind_body()?;
    tracing::debug!(?body, "Received greeting");
    ctx.json(StatusCode::OK, &body)
}

fn api_path(ctx: &mut Context) -> HandlerResult {
    let path: ApiPath = ctx.bind_path()?;
    ctx.string(StatusCode::OK, path.id)
}

fn auth(ctx: &mut Context) -> HandlerResult {
    let unauthorized = || HttpError::new(StatusCode::UNAUTHORIZED, BodyKind::Json);

    let token = ctx
        .header("Authorization")
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(unauthorized)?;

    if token != DEMO_TOKEN {
        return Err(unauthorized().into());
    }

    ctx.set("userId", DEMO_USER_ID);
    Ok(())
}

fn protected(ctx: &mut Context) -> HandlerResult {
    let user_id = ctx
        .get_string("userId")
        .ok_or_else(|| HttpError::new(StatusCode::UNAUTHORIZED, BodyKind::Json))?
        .to_string();

    ctx.json(StatusCode::OK, &serde_json::json!({ "userId": user_id }))
}

fn fallback(ctx: &mut Context) -> HandlerResult {
    let message = format!("Nothing at {} {}", ctx.method(), ctx.url());
    Err(HttpError::with_message(StatusCode::NOT_FOUND, message, BodyKind::Json).into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.logging.max_level())
        .init();

    let mut server = Server::new(cfg.server);
    server
        .get("/hello", hello_get)?
        .post("/hello", hello_post)?
        .get("/api/{id}", api_path)?
        .get("/protected", Chain::new().with(auth).with(protected))?
        .catch_all(fallback);

    tokio::select! {
        res = server.run() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
