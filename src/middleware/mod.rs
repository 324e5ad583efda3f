//! Middleware layer.
//!
//! A middleware is an async function of `(Request, Next)`. It either answers
//! the request itself or hands it on with [`Next::run`]. Cross-cutting
//! concerns live here: authentication, request ids, access logs.
//!
//! ```rust
//! use waypost::{Middleware, Next, Request, Response};
//! use http::StatusCode;
//!
//! let auth = Middleware::from_fn(|req: Request, next: Next| async move {
//!     match req.header("authorization") {
//!         Some(_) => next.run(req).await,
//!         None => Response::status(StatusCode::UNAUTHORIZED),
//!     }
//! })
//! .named("auth");
//! ```
//!
//! The registry only records which middlewares belong to a route; running the
//! chain is the router's job.

mod next;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

pub use next::Next;

type MiddlewareFn = dyn Fn(Request, Next) -> BoxFuture<'static, Response> + Send + Sync;

/// A named, cheaply clonable middleware function.
#[derive(Clone)]
pub struct Middleware {
    name: Arc<str>,
    inner: Arc<MiddlewareFn>,
}

impl Middleware {
    /// Wraps an async function. The default name is the function's type name;
    /// use [`named`](Self::named) for something readable in logs.
    pub fn from_fn<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        let inner: Arc<MiddlewareFn> = Arc::new(move |req: Request, next: Next| -> BoxFuture<'static, Response> {
            let fut = f(req, next);
            Box::pin(async move { fut.await.into_response() })
        });
        Self { name: Arc::from(std::any::type_name::<F>()), inner }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Arc::from(name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when both values wrap the same function instance.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    pub(crate) fn call(&self, req: Request, next: Next) -> BoxFuture<'static, Response> {
        (self.inner)(req, next)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Middleware").field(&self.name).finish()
    }
}
