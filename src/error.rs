//! Unified error type.

use thiserror::Error;

use crate::method::Method;

/// Boxed error type accepted from handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by waypost's fallible operations.
///
/// Apply-time problems (bad method token, unresolvable handler, route the
/// router refuses) are logged and skipped by [`Registry::apply`](crate::Registry::apply);
/// they surface here so the skip list can say why. Request-time failures reach
/// the router's error handler as one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A handler returned an error.
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),

    /// User code panicked: a handler or middleware at request time, or a
    /// handler factory or constructor while the registry was applied.
    #[error("panicked: {0}")]
    Panic(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("unsupported method `{0}`")]
    InvalidMethod(String),

    /// The router refused the route (conflict or malformed pattern).
    #[error("cannot mount {method} {path}: {source}")]
    Mount {
        method: Method,
        path: String,
        #[source]
        source: matchit::InsertError,
    },

    #[error("invalid configuration for `{key}`: {message}")]
    Config { key: &'static str, message: String },

    #[error("logging: {0}")]
    Logging(String),
}

impl Error {
    /// Wraps an arbitrary handler error.
    pub fn handler(err: impl Into<BoxError>) -> Self {
        Self::Handler(err.into())
    }

    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        Self::Panic(message)
    }
}

/// A handler reference that could not be turned into something callable.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Neither an associated nor an instance action answers to the name.
    #[error("`{controller}` has no action `{action}`")]
    MissingAction {
        controller: &'static str,
        action: String,
    },

    /// The controller has no associated action by that name and cannot be
    /// constructed without arguments.
    #[error("`{controller}` has no associated action `{action}` and cannot be constructed")]
    NotConstructible {
        controller: &'static str,
        action: String,
    },
}
