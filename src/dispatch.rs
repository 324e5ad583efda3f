//! Applying a registry to a router.
//!
//! `apply` walks the definitions that have not been mounted yet, resolves each
//! handler, validates each method token, and mounts one endpoint per
//! (route, method). Anything that fails is logged, recorded in [`Applied`],
//! and skipped; the rest still mounts.
//!
//! Each endpoint wraps the handler so that a returned `Err`, a panic while
//! calling it, and a panic while awaiting it all end the same way: logged, then
//! handed to the router's error handler through [`Next::fail`].

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, error};

use crate::context::Context;
use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::registry::Registry;
use crate::response::Response;
use crate::router::{Endpoint, Mount};

/// What one [`Registry::apply`] call did.
#[derive(Debug, Default)]
pub struct Applied {
    /// `(method, path)` pairs now live on the router.
    pub mounted: Vec<(Method, String)>,
    /// Definitions or methods that were left out, and why.
    pub skipped: Vec<Skipped>,
}

/// A route, or one method of it, that [`Registry::apply`] did not mount.
#[derive(Debug)]
pub struct Skipped {
    pub path: String,
    /// The offending token; `None` when the whole route was skipped.
    pub method: Option<String>,
    pub reason: Error,
}

impl Applied {
    /// `true` when nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl Registry {
    /// Mounts every definition added since the previous call.
    ///
    /// Calling it again after registering more routes mounts only the new
    /// ones, so nothing is mounted twice.
    pub fn apply(&mut self, router: &mut impl Mount) -> Applied {
        let mut applied = Applied::default();

        let start = self.mounted;
        for (index, route) in self.routes[start..].iter().enumerate() {
            // Per route: whatever reached the router stays counted if a later route unwinds.
            self.mounted = start + index + 1;

            // Factories and constructors are user code and may panic.
            let resolved = match panic::catch_unwind(AssertUnwindSafe(|| route.handler.resolve())) {
                Ok(result) => result.map_err(Error::from),
                Err(payload) => Err(Error::from_panic(payload)),
            };
            let handler = match resolved {
                Ok(handler) => handler,
                Err(e) => {
                    error!(path = %route.path, handler = route.handler.label(), "invalid handler: {e}");
                    applied.skipped.push(Skipped {
                        path: route.path.clone(),
                        method: None,
                        reason: e,
                    });
                    continue;
                }
            };

            for token in &route.methods {
                let methods = match Method::expand(token) {
                    Ok(methods) => methods,
                    Err(e) => {
                        error!(path = %route.path, method = %token, "invalid method");
                        applied.skipped.push(Skipped {
                            path: route.path.clone(),
                            method: Some(token.clone()),
                            reason: e,
                        });
                        continue;
                    }
                };

                for method in methods {
                    let endpoint = bind(method, &route.path, Arc::clone(&handler));
                    match router.mount(method, &route.path, &route.middlewares, endpoint) {
                        Ok(()) => {
                            debug!(%method, path = %route.path, middlewares = route.middlewares.len(), "mounted");
                            applied.mounted.push((method, route.path.clone()));
                        }
                        Err(e) => {
                            error!(%method, path = %route.path, "{e}");
                            applied.skipped.push(Skipped {
                                path: route.path.clone(),
                                method: Some(method.token().to_owned()),
                                reason: e,
                            });
                        }
                    }
                }
            }
        }

        applied
    }
}

/// Wraps a resolved handler into the endpoint the router stores.
fn bind(method: Method, path: &str, handler: BoxedHandler) -> Endpoint {
    let path: Arc<str> = Arc::from(path);
    Arc::new(move |ctx: Context| -> BoxFuture<'static, Response> {
        let next = ctx.next().clone();
        let path = Arc::clone(&path);
        let called = panic::catch_unwind(AssertUnwindSafe(|| handler.call(ctx)));
        Box::pin(async move {
            let outcome = match called {
                Ok(fut) => match AssertUnwindSafe(fut).catch_unwind().await {
                    Ok(outcome) => outcome,
                    Err(payload) => Err(Error::from_panic(payload)),
                },
                Err(payload) => Err(Error::from_panic(payload)),
            };
            match outcome {
                Ok(response) => response,
                Err(e) => {
                    error!(%method, path = %path, "request failed: {e}");
                    next.fail(e)
                }
            }
        })
    })
}
