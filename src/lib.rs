//! # waypost
//!
//! Route registration and dispatch for hyper services.
//!
//! Routes are declared up front on a [`Registry`]: paths nest under
//! [`group`](Registry::group) prefixes, middleware stacks up through
//! [`middleware`](Registry::middleware) and [`group_with`](Registry::group_with)
//! scopes, and handlers can be plain functions or controller methods. Once
//! startup is done, [`Registry::apply`] mounts everything onto a [`Router`];
//! a route with a bad handler or method is logged and left out, the rest go
//! live.
//!
//! At request time every handler runs inside a wrapper: a returned `Err` or
//! a panic is logged and forwarded to the router's error handler instead of
//! taking the connection down.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use waypost::{Config, Context, Handler, Registry, Router, Server, logging};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), waypost::Error> {
//!     let config = Config::from_env()?;
//!     logging::init(&config)?;
//!
//!     let mut routes = Registry::new();
//!     routes.group("/api", |r| {
//!         r.get("/users/{id}", Handler::function(get_user));
//!         r.get("/ping", Handler::sync(|_ctx: Context| "pong"));
//!     });
//!
//!     let mut router = Router::new();
//!     routes.apply(&mut router);
//!
//!     Server::from_config(&config).serve(router).await
//! }
//!
//! async fn get_user(ctx: Context) -> String {
//!     format!(r#"{{"id":"{}"}}"#, ctx.param("id").unwrap_or("unknown"))
//! }
//! ```

mod context;
mod dispatch;
mod error;
mod handler;
mod method;
mod registry;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod logging;
pub mod middleware;
pub mod path;

pub use config::{Config, LogFormat};
pub use context::Context;
pub use dispatch::{Applied, Skipped};
pub use error::{BoxError, Error, ResolveError};
pub use handler::{Controller, Handler, HandlerKind, IntoOutcome, Outcome};
pub use method::{IntoMethods, Method};
pub use middleware::{Middleware, Next};
pub use registry::{Registry, Route, RouteDefinition};
pub use request::Request;
pub use response::{ContentType, Envelope, IntoResponse, Response, ResponseBuilder};
pub use router::{Endpoint, ErrorHandler, Fallback, Mount, Router};
pub use server::Server;
