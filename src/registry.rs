//! Route registry.
//!
//! Collects route definitions while the application starts up. Two pieces of
//! scope decorate every new definition:
//!
//! - the path prefix, set by [`Registry::group`];
//! - middleware, from [`Registry::middleware`] (global) and
//!   [`Registry::group_with`] (group-scoped).
//!
//! Both are captured when the route is added. Changing scope afterwards never
//! touches routes that already exist.
//!
//! ```rust
//! use waypost::{Context, Handler, Middleware, Next, Registry, Request};
//!
//! # fn auth() -> Middleware { Middleware::from_fn(|req: Request, next: Next| next.run(req)) }
//! let mut routes = Registry::new();
//! routes.group("/api", |r| {
//!     r.middleware([auth()], |r| {
//!         r.get("/users", Handler::function(|_ctx: Context| async { "[]" }));
//!     });
//!     r.get("/ping", Handler::sync(|_ctx: Context| "pong"));
//! });
//!
//! let paths: Vec<_> = routes.routes().iter().map(|d| d.path()).collect();
//! assert_eq!(paths, ["/api/users", "/api/ping"]);
//! ```

use std::panic::{self, AssertUnwindSafe};

use crate::handler::Handler;
use crate::method::{IntoMethods, Method};
use crate::middleware::Middleware;
use crate::path;

/// One planned route, fully resolved at registration.
#[derive(Clone, Debug)]
pub struct RouteDefinition {
    pub(crate) methods: Vec<String>,
    pub(crate) path: String,
    pub(crate) handler: Handler,
    pub(crate) middlewares: Vec<Middleware>,
}

impl RouteDefinition {
    /// Declared method tokens, lower-cased, not yet validated.
    pub fn methods(&self) -> &[String] { &self.methods }

    /// Normalized path with every enclosing group prefix applied.
    pub fn path(&self) -> &str { &self.path }

    /// The handler reference, still unresolved.
    pub fn handler(&self) -> &Handler { &self.handler }

    /// The chain that runs before the handler: global, then group, then per-route.
    pub fn middlewares(&self) -> &[Middleware] { &self.middlewares }
}

/// Handle on a just-registered route, for attaching per-route middleware.
pub struct Route<'a> {
    definition: &'a mut RouteDefinition,
}

impl Route<'_> {
    /// Appends one middleware after the scoped ones.
    pub fn middleware(self, mw: Middleware) -> Self {
        self.definition.middlewares.push(mw);
        self
    }

    /// Appends several middlewares, in order, after the scoped ones.
    pub fn middlewares(self, mws: impl IntoIterator<Item = Middleware>) -> Self {
        self.definition.middlewares.extend(mws);
        self
    }

    /// The definition as registered so far.
    pub fn definition(&self) -> &RouteDefinition {
        &*self.definition
    }
}

/// Accumulates route definitions during startup.
///
/// Owned by the composition root; registration is single-threaded.
#[derive(Default)]
pub struct Registry {
    pub(crate) routes: Vec<RouteDefinition>,
    pub(crate) mounted: usize,
    prefix: String,
    group_middlewares: Vec<Middleware>,
    global_middlewares: Vec<Middleware>,
}

impl Registry {
    /// An empty registry with no prefix and no scoped middleware.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for one or more method tokens.
    ///
    /// Tokens are not checked here; an unknown one is reported and skipped
    /// when the registry is applied.
    pub fn add(&mut self, methods: impl IntoMethods, path: &str, handler: Handler) -> Route<'_> {
        let mut middlewares =
            Vec::with_capacity(self.global_middlewares.len() + self.group_middlewares.len());
        middlewares.extend(self.global_middlewares.iter().cloned());
        middlewares.extend(self.group_middlewares.iter().cloned());

        let index = self.routes.len();
        self.routes.push(RouteDefinition {
            methods: methods.into_methods(),
            path: path::join(&self.prefix, path),
            handler,
            middlewares,
        });
        Route { definition: &mut self.routes[index] }
    }

    /// Shorthand for [`add`](Self::add) with a single method; likewise for the
    /// other verbs below.
    pub fn get(&mut self, path: &str, handler: Handler) -> Route<'_> {
        self.add(Method::Get, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: Handler) -> Route<'_> {
        self.add(Method::Post, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: Handler) -> Route<'_> {
        self.add(Method::Put, path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: Handler) -> Route<'_> {
        self.add(Method::Delete, path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: Handler) -> Route<'_> {
        self.add(Method::Patch, path, handler)
    }

    pub fn options(&mut self, path: &str, handler: Handler) -> Route<'_> {
        self.add(Method::Options, path, handler)
    }

    pub fn head(&mut self, path: &str, handler: Handler) -> Route<'_> {
        self.add(Method::Head, path, handler)
    }

    /// Registers everything `f` adds under `prefix`. Groups nest.
    pub fn group<F>(&mut self, prefix: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.group_with(prefix, std::iter::empty(), f);
    }

    /// Like [`group`](Self::group), with middleware for every route inside.
    pub fn group_with<F>(
        &mut self,
        prefix: &str,
        middlewares: impl IntoIterator<Item = Middleware>,
        f: F,
    ) where
        F: FnOnce(&mut Self),
    {
        let prev_prefix = std::mem::take(&mut self.prefix);
        self.prefix = path::join(&prev_prefix, prefix);
        let prev_len = self.group_middlewares.len();
        self.group_middlewares.extend(middlewares);

        let result = panic::catch_unwind(AssertUnwindSafe(|| f(self)));

        self.prefix = prev_prefix;
        self.group_middlewares.truncate(prev_len);
        if let Err(payload) = result {
            panic::resume_unwind(payload);
        }
    }

    /// Applies `middlewares` ahead of group middleware to every route `f` adds.
    pub fn middleware<F>(&mut self, middlewares: impl IntoIterator<Item = Middleware>, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let prev_len = self.global_middlewares.len();
        self.global_middlewares.extend(middlewares);

        let result = panic::catch_unwind(AssertUnwindSafe(|| f(self)));

        self.global_middlewares.truncate(prev_len);
        if let Err(payload) = result {
            panic::resume_unwind(payload);
        }
    }

    /// Every definition registered so far, in registration order.
    pub fn routes(&self) -> &[RouteDefinition] { &self.routes }

    /// Definitions not yet mounted by [`apply`](Self::apply).
    pub fn pending(&self) -> &[RouteDefinition] { &self.routes[self.mounted..] }

    /// Current prefix; empty at top level.
    pub fn prefix(&self) -> &str { &self.prefix }

    /// Middleware from the enclosing [`group_with`](Self::group_with) scopes.
    pub fn group_middlewares(&self) -> &[Middleware] { &self.group_middlewares }

    /// Middleware from the enclosing [`middleware`](Self::middleware) scopes.
    pub fn global_middlewares(&self) -> &[Middleware] { &self.global_middlewares }
}
