//! Minimal waypost example: a grouped API with an auth middleware, a
//! controller, and an endpoint that fails on purpose.
//!
//! Run with:
//!   APP_DEBUG=on cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/api/ping
//!   curl http://localhost:3000/api/users                       # 401
//!   curl -H 'authorization: Bearer x' http://localhost:3000/api/users
//!   curl -H 'authorization: Bearer x' http://localhost:3000/api/users/42
//!   curl http://localhost:3000/api/boom                        # 500, logged

use std::sync::Arc;

use http::StatusCode;
use waypost::{
    Config, Context, Controller, Error, Handler, Middleware, Next, Registry, Request, Response,
    Router, Server, logging,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    logging::init(&config)?;

    let auth = Middleware::from_fn(require_bearer).named("auth");

    let mut routes = Registry::new();
    routes.group("/api", |r| {
        r.middleware([auth], |r| {
            r.get("/users", Handler::action::<Users>("list"));
            r.get("/users/{id}", Handler::action::<Users>("show"));
        });
        r.get("/ping", Handler::sync(|_ctx: Context| "pong"));
        r.get("/boom", Handler::function(boom));
        r.add("banana", "/never", Handler::sync(|_ctx: Context| ()));
    });

    let mut router = Router::new().on_error(|err| {
        Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .text(format!("something went wrong: {err}"))
    });
    let applied = routes.apply(&mut router);
    tracing::info!(mounted = applied.mounted.len(), skipped = applied.skipped.len(), "routes applied");

    Server::from_config(&config).serve(router).await
}

async fn require_bearer(req: Request, next: Next) -> Response {
    match req.header("authorization") {
        Some(value) if value.starts_with("Bearer ") => next.run(req).await,
        _ => Response::status(StatusCode::UNAUTHORIZED),
    }
}

async fn boom(_ctx: Context) -> Result<Response, std::io::Error> {
    Err(std::io::Error::other("disk on fire"))
}

struct Users {
    names: Vec<&'static str>,
}

impl Users {
    async fn list(_ctx: Context) -> Response {
        Response::json(r#"["alice","bob"]"#)
    }

    async fn show(self: Arc<Self>, ctx: Context) -> Response {
        let id = ctx.param("id").unwrap_or_default();
        match id.parse::<usize>().ok().and_then(|i| self.names.get(i)) {
            Some(name) => Response::json(format!(r#"{{"id":"{id}","name":"{name}"}}"#)),
            None => Response::status(StatusCode::NOT_FOUND),
        }
    }
}

impl Controller for Users {
    fn associated(name: &str) -> Option<Handler> {
        match name {
            "list" => Some(Handler::function(Self::list)),
            _ => None,
        }
    }

    fn construct() -> Option<Self> {
        Some(Self { names: vec!["alice", "bob"] })
    }

    fn action(self: Arc<Self>, name: &str) -> Option<Handler> {
        match name {
            "show" => Some(Handler::bound(self, Self::show)),
            _ => None,
        }
    }
}
