//! Radix-tree request router.
//!
//! This is the live routing table that [`Registry::apply`](crate::Registry::apply)
//! mounts onto. One `matchit` tree per method; each leaf holds the route's
//! middleware chain and its endpoint. The router runs the chain, and owns the
//! two places a request can end up when nobody answers it: the error handler
//! (fed by [`Next::fail`]) and the fallback (unmatched paths).

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use http::StatusCode;
use matchit::Router as MatchitRouter;

use crate::context::Context;
use crate::error::Error;
use crate::method::Method;
use crate::middleware::{Middleware, Next};
use crate::path;
use crate::request::Request;
use crate::response::Response;

/// The terminal binding mounted for a route.
pub type Endpoint = Arc<dyn Fn(Context) -> BoxFuture<'static, Response> + Send + Sync>;

/// Turns an error forwarded through [`Next::fail`] into a response.
pub type ErrorHandler = Arc<dyn Fn(Error) -> Response + Send + Sync>;

/// Answers requests no route matched.
pub type Fallback = Arc<dyn Fn(Request) -> Response + Send + Sync>;

/// Anything routes can be mounted on.
///
/// [`Router`] is the implementation used by the server; tests and embedders
/// can supply their own.
pub trait Mount {
    fn mount(
        &mut self,
        method: Method,
        path: &str,
        middlewares: &[Middleware],
        endpoint: Endpoint,
    ) -> Result<(), Error>;
}

pub(crate) struct Hooks {
    pub(crate) on_error: ErrorHandler,
    pub(crate) fallback: Fallback,
}

#[derive(Clone)]
struct Binding {
    middlewares: Arc<[Middleware]>,
    endpoint: Endpoint,
}

/// The application router.
///
/// Build it once at startup, apply the registry to it, pass it to
/// [`Server::serve`](crate::Server::serve).
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Binding>>,
    hooks: Arc<Hooks>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            hooks: Arc::new(Hooks {
                on_error: Arc::new(default_error_handler),
                fallback: Arc::new(default_fallback),
            }),
        }
    }

    /// Replaces the error handler. The default answers `500` with a plain-text body.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(Error) -> Response + Send + Sync + 'static,
    {
        self.hooks = Arc::new(Hooks {
            on_error: Arc::new(f),
            fallback: Arc::clone(&self.hooks.fallback),
        });
        self
    }

    /// Replaces the fallback for unmatched requests. The default answers `404`.
    pub fn fallback<F>(mut self, f: F) -> Self
    where
        F: Fn(Request) -> Response + Send + Sync + 'static,
    {
        self.hooks = Arc::new(Hooks {
            on_error: Arc::clone(&self.hooks.on_error),
            fallback: Arc::new(f),
        });
        self
    }

    /// Whether a request for `method` on the concrete `path` would hit a mounted route.
    pub fn has_route(&self, method: Method, path: &str) -> bool {
        let lookup = path::normalize(path);
        self.routes
            .get(&method)
            .and_then(|tree| tree.at(&lookup).ok())
            .is_some()
    }

    /// Routes one request and produces one response.
    ///
    /// The request path is normalized the same way registered paths are, so
    /// `/ping/` and `//ping` both reach a route registered as `/ping`.
    pub async fn handle(&self, mut req: Request) -> Response {
        let lookup = path::normalize(&req.path);
        let matched = self
            .routes
            .get(&req.method)
            .and_then(|tree| tree.at(&lookup).ok())
            .map(|m| {
                let params: HashMap<String, String> = m
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                (m.value.clone(), params)
            });
        let Some((binding, params)) = matched else {
            return (self.hooks.fallback)(req);
        };
        req.params = params;
        Next::new(binding.middlewares, binding.endpoint, Arc::clone(&self.hooks))
            .run(req)
            .await
    }
}

impl Mount for Router {
    fn mount(
        &mut self,
        method: Method,
        path: &str,
        middlewares: &[Middleware],
        endpoint: Endpoint,
    ) -> Result<(), Error> {
        let binding = Binding { middlewares: Arc::from(middlewares), endpoint };
        self.routes
            .entry(method)
            .or_default()
            .insert(path, binding)
            .map_err(|source| Error::Mount { method, path: path.to_owned(), source })
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

fn default_error_handler(_err: Error) -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .text("Internal Server Error")
}

fn default_fallback(_req: Request) -> Response {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .text("Not Found")
}
