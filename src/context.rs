//! Per-request handler context.

use crate::error::Error;
use crate::middleware::Next;
use crate::request::Request;
use crate::response::Response;

/// What a handler receives: the inbound request plus the `next` continuation.
///
/// The outbound side is the handler's return value.
pub struct Context {
    request: Request,
    next: Next,
}

impl Context {
    pub(crate) fn new(request: Request, next: Next) -> Self {
        Self { request, next }
    }

    /// The matched request, path parameters filled in.
    pub fn request(&self) -> &Request { &self.request }

    pub fn request_mut(&mut self) -> &mut Request { &mut self.request }

    /// Shortcut for `ctx.request().param(key)`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.request.param(key)
    }

    /// The continuation. The chain is spent here, so running it reaches the fallback.
    pub fn next(&self) -> &Next { &self.next }

    /// Splits the context, e.g. to call [`Next::run`] with the request.
    pub fn into_parts(self) -> (Request, Next) {
        (self.request, self.next)
    }

    /// Hands the error to the router's error handler. Same as returning `Err`.
    pub fn fail(self, err: impl Into<Error>) -> Response {
        self.next.fail(err)
    }
}
