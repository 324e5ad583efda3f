//! Handler references and their resolution.
//!
//! # Shapes
//!
//! A route's terminal handler is a [`Handler`], one of:
//!
//! ```text
//! Handler::function(list_users)              ← async fn(Context) -> R
//! Handler::sync(ping)                        ← fn(Context) -> R
//! Handler::bound(Arc::clone(&ctrl), Users::show)    ← method on an existing object
//! Handler::instance::<Users, _, _, _>(Users::show)  ← object built at apply-time
//! Handler::action::<Users>("show")           ← looked up by name at apply-time
//! ```
//!
//! "Static" methods need no special case: an associated function is a plain
//! function, so `Handler::function(Users::list)` covers it.
//!
//! # Resolution
//!
//! [`Handler::resolve`] runs when the registry is applied, never at
//! registration. Function and bound handlers resolve to themselves.
//! Instance handlers call their factory. Named actions try
//! [`Controller::associated`] first, then [`Controller::construct`] followed
//! by [`Controller::action`] on the new instance; if neither answers the
//! route is skipped with a [`ResolveError`].
//!
//! # Return values
//!
//! Anything implementing [`IntoOutcome`]: a response-like value, or a
//! `Result` whose `Err` is forwarded to the router's error handler.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use http::StatusCode;

use crate::context::Context;
use crate::error::{BoxError, Error, ResolveError};
use crate::response::{IntoResponse, Response};

/// What a handler invocation produces once awaited.
pub type Outcome = Result<Response, Error>;

// ── Erased handlers ───────────────────────────────────────────────────────────

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` because it appears in the return type of
/// [`Handler::resolve`].
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, ctx: Context) -> BoxFuture<'static, Outcome>;
}

/// A resolved, type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

type Resolver = dyn Fn() -> Result<BoxedHandler, ResolveError> + Send + Sync;

// ── Handler ───────────────────────────────────────────────────────────────────

/// Which constructor produced a [`Handler`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HandlerKind {
    /// A plain function, sync or async, or a method bound to an existing object.
    Function,
    /// An instance method on an object created at apply-time.
    Method,
    /// A controller action looked up by name at apply-time.
    Action,
}

/// A route's terminal handler, possibly not yet resolved.
#[derive(Clone)]
pub struct Handler {
    kind: HandlerKind,
    label: Arc<str>,
    repr: Repr,
}

#[derive(Clone)]
enum Repr {
    Ready(BoxedHandler),
    Deferred(Arc<Resolver>),
}

impl Handler {
    /// An async function of the request context.
    pub fn function<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome + 'static,
    {
        Self::ready(std::any::type_name::<F>(), Arc::new(FnHandler(f)))
    }

    /// A synchronous function of the request context.
    pub fn sync<F, R>(f: F) -> Self
    where
        F: Fn(Context) -> R + Send + Sync + 'static,
        R: IntoOutcome + 'static,
    {
        Self::ready(std::any::type_name::<F>(), Arc::new(SyncHandler(f)))
    }

    /// A method bound to an object that already exists.
    pub fn bound<C, F, Fut, R>(instance: Arc<C>, selector: F) -> Self
    where
        C: Send + Sync + 'static,
        F: Fn(Arc<C>, Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome + 'static,
    {
        let handler = BoundHandler { instance, selector: Arc::new(selector) };
        Self::ready(std::any::type_name::<F>(), Arc::new(handler))
    }

    /// An instance method; `factory` builds the object when the route is applied.
    pub fn method<C, Fac, F, Fut, R>(factory: Fac, selector: F) -> Self
    where
        C: Send + Sync + 'static,
        Fac: Fn() -> C + Send + Sync + 'static,
        F: Fn(Arc<C>, Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome + 'static,
    {
        let selector = Arc::new(selector);
        let resolver: Arc<Resolver> = Arc::new(move || {
            let handler = BoundHandler {
                instance: Arc::new(factory()),
                selector: Arc::clone(&selector),
            };
            Ok(Arc::new(handler) as BoxedHandler)
        });
        Self {
            kind: HandlerKind::Method,
            label: Arc::from(std::any::type_name::<F>()),
            repr: Repr::Deferred(resolver),
        }
    }

    /// [`method`](Self::method) with `C::default` as the factory.
    pub fn instance<C, F, Fut, R>(selector: F) -> Self
    where
        C: Default + Send + Sync + 'static,
        F: Fn(Arc<C>, Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome + 'static,
    {
        Self::method(C::default, selector)
    }

    /// A controller action looked up by name when the route is applied.
    pub fn action<C: Controller>(name: impl Into<String>) -> Self {
        let controller = std::any::type_name::<C>();
        let name: String = name.into();
        let label = format!("{controller}::{name}");
        let resolver: Arc<Resolver> = Arc::new(move || resolve_action::<C>(controller, &name));
        Self {
            kind: HandlerKind::Action,
            label: Arc::from(label),
            repr: Repr::Deferred(resolver),
        }
    }

    fn ready(label: &str, handler: BoxedHandler) -> Self {
        Self {
            kind: HandlerKind::Function,
            label: Arc::from(label),
            repr: Repr::Ready(handler),
        }
    }

    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    /// Human-readable name used in logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Turns the reference into something callable.
    pub fn resolve(&self) -> Result<BoxedHandler, ResolveError> {
        match &self.repr {
            Repr::Ready(handler) => Ok(Arc::clone(handler)),
            Repr::Deferred(resolver) => resolver(),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .finish()
    }
}

fn resolve_action<C: Controller>(
    controller: &'static str,
    name: &str,
) -> Result<BoxedHandler, ResolveError> {
    if let Some(handler) = C::associated(name) {
        return handler.resolve();
    }
    let Some(instance) = C::construct() else {
        return Err(ResolveError::NotConstructible {
            controller,
            action: name.to_owned(),
        });
    };
    match Arc::new(instance).action(name) {
        Some(handler) => handler.resolve(),
        None => Err(ResolveError::MissingAction {
            controller,
            action: name.to_owned(),
        }),
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

/// A type whose actions can be referenced by name with [`Handler::action`].
///
/// ```rust
/// use std::sync::Arc;
/// use waypost::{Context, Controller, Handler};
///
/// #[derive(Default)]
/// struct Users;
///
/// impl Users {
///     async fn list(_ctx: Context) -> &'static str { "[]" }
///     async fn show(self: Arc<Self>, ctx: Context) -> String {
///         format!("user {}", ctx.param("id").unwrap_or("?"))
///     }
/// }
///
/// impl Controller for Users {
///     fn associated(name: &str) -> Option<Handler> {
///         match name {
///             "list" => Some(Handler::function(Self::list)),
///             _ => None,
///         }
///     }
///
///     fn construct() -> Option<Self> { Some(Self) }
///
///     fn action(self: Arc<Self>, name: &str) -> Option<Handler> {
///         match name {
///             "show" => Some(Handler::bound(self, Self::show)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Controller: Sized + Send + Sync + 'static {
    /// Actions that need no instance. Checked first.
    fn associated(name: &str) -> Option<Handler> {
        let _ = name;
        None
    }

    /// Zero-argument constructor. `None` means the type cannot be built this way.
    fn construct() -> Option<Self> {
        None
    }

    /// Actions on a freshly constructed instance.
    fn action(self: Arc<Self>, name: &str) -> Option<Handler> {
        let _ = name;
        None
    }
}

// ── Return values ─────────────────────────────────────────────────────────────

/// Conversion of a handler's return value into an [`Outcome`].
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

macro_rules! outcome_from_response {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoOutcome for $ty {
                fn into_outcome(self) -> Outcome { Ok(self.into_response()) }
            }
        )*
    };
}

outcome_from_response!(Response, &'static str, String, StatusCode, ());

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoResponse,
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Outcome {
        self.map(IntoResponse::into_response).map_err(Error::handler)
    }
}

// ── Concrete wrappers ─────────────────────────────────────────────────────────

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture<'static, Outcome> {
        let fut = (self.0)(ctx);
        Box::pin(async move { fut.await.into_outcome() })
    }
}

struct SyncHandler<F>(F);

impl<F, R> ErasedHandler for SyncHandler<F>
where
    F: Fn(Context) -> R + Send + Sync,
    R: IntoOutcome + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture<'static, Outcome> {
        let outcome = (self.0)(ctx).into_outcome();
        Box::pin(futures::future::ready(outcome))
    }
}

struct BoundHandler<C, F> {
    instance: Arc<C>,
    selector: Arc<F>,
}

impl<C, F, Fut, R> ErasedHandler for BoundHandler<C, F>
where
    C: Send + Sync + 'static,
    F: Fn(Arc<C>, Context) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture<'static, Outcome> {
        let fut = (self.selector)(Arc::clone(&self.instance), ctx);
        Box::pin(async move { fut.await.into_outcome() })
    }
}
