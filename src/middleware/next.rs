//! The `next` continuation handed to middlewares and handlers.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error};

use crate::context::Context;
use crate::error::Error;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use crate::router::{Endpoint, Hooks};

/// Continuation for one request.
///
/// Inside a middleware, [`run`](Next::run) passes the request to the next
/// middleware, or to the endpoint once the chain is exhausted. Inside a
/// handler the chain is already spent, so `run` falls through to the router's
/// fallback (usually `404`).
///
/// [`fail`](Next::fail) is the error channel: it hands the error to the
/// router's error handler and returns whatever response that produces.
#[derive(Clone)]
pub struct Next {
    chain: Arc<[Middleware]>,
    index: usize,
    endpoint: Option<Endpoint>,
    hooks: Arc<Hooks>,
}

impl Next {
    pub(crate) fn new(chain: Arc<[Middleware]>, endpoint: Endpoint, hooks: Arc<Hooks>) -> Self {
        Self { chain, index: 0, endpoint: Some(endpoint), hooks }
    }

    /// A continuation with nothing left to run.
    pub(crate) fn spent(hooks: Arc<Hooks>) -> Self {
        Self { chain: Arc::from(Vec::new()), index: 0, endpoint: None, hooks }
    }

    /// Runs the rest of the chain. A middleware that panics is answered by the
    /// router's error handler.
    pub async fn run(self, req: Request) -> Response {
        if let Some(mw) = self.chain.get(self.index).cloned() {
            debug!(middleware = mw.name(), path = req.path(), "middleware");
            let hooks = Arc::clone(&self.hooks);
            let path = req.path().to_owned();
            let rest = Self { index: self.index + 1, ..self };
            let called = panic::catch_unwind(AssertUnwindSafe(|| mw.call(req, rest)));
            let result = match called {
                Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                Err(payload) => Err(payload),
            };
            return match result {
                Ok(res) => res,
                Err(payload) => {
                    let err = Error::from_panic(payload);
                    error!(middleware = mw.name(), path = %path, "middleware panicked: {err}");
                    (hooks.on_error)(err)
                }
            };
        }
        match self.endpoint {
            Some(endpoint) => {
                let ctx = Context::new(req, Self::spent(Arc::clone(&self.hooks)));
                endpoint(ctx).await
            }
            None => (self.hooks.fallback)(req),
        }
    }

    /// Forwards `err` to the router's error handler.
    pub fn fail(self, err: impl Into<Error>) -> Response {
        (self.hooks.on_error)(err.into())
    }
}
