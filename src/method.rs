//! HTTP method vocabulary.
//!
//! Routes are declared with method *tokens* (`"get"`, `"POST"`, `Method::Put`).
//! Tokens are stored as given and only checked against the vocabulary when the
//! registry is applied, so a typo never fails registration, it shows up in the
//! logs instead.
//!
//! The special token `all` expands to every method in [`Method::ALL`].

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A method the dispatcher can mount.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl Method {
    /// The full mountable vocabulary, in declaration order.
    pub const ALL: [Method; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Options,
        Self::Head,
    ];

    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delete  => "DELETE",
            Self::Get     => "GET",
            Self::Head    => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch   => "PATCH",
            Self::Post    => "POST",
            Self::Put     => "PUT",
        }
    }

    /// Lowercase token form, as stored in route definitions.
    pub fn token(self) -> &'static str {
        match self {
            Self::Delete  => "delete",
            Self::Get     => "get",
            Self::Head    => "head",
            Self::Options => "options",
            Self::Patch   => "patch",
            Self::Post    => "post",
            Self::Put     => "put",
        }
    }

    /// Maps an `http` method onto the vocabulary. Anything else is unroutable.
    pub fn from_http(method: &http::Method) -> Option<Self> {
        Some(match *method {
            http::Method::GET     => Self::Get,
            http::Method::POST    => Self::Post,
            http::Method::PUT     => Self::Put,
            http::Method::DELETE  => Self::Delete,
            http::Method::PATCH   => Self::Patch,
            http::Method::OPTIONS => Self::Options,
            http::Method::HEAD    => Self::Head,
            _ => return None,
        })
    }

    /// Resolves a declared token into the methods it mounts on.
    ///
    /// `all` yields the whole vocabulary; anything unknown is an
    /// [`Error::InvalidMethod`].
    pub fn expand(token: &str) -> Result<Vec<Method>, Error> {
        if token.eq_ignore_ascii_case("all") {
            return Ok(Self::ALL.to_vec());
        }
        token.parse().map(|m| vec![m])
    }
}

/// Parses a method token, ignoring ASCII case (`"get"` and `"GET"` both work).
impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "delete"  => Ok(Self::Delete),
            "get"     => Ok(Self::Get),
            "head"    => Ok(Self::Head),
            "options" => Ok(Self::Options),
            "patch"   => Ok(Self::Patch),
            "post"    => Ok(Self::Post),
            "put"     => Ok(Self::Put),
            _         => Err(Error::InvalidMethod(s.to_owned())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Token conversion ─────────────────────────────────────────────────────────

/// Anything accepted as the `methods` argument of
/// [`Registry::add`](crate::Registry::add): one token or a list of them.
pub trait IntoMethods {
    fn into_methods(self) -> Vec<String>;
}

impl IntoMethods for Method {
    fn into_methods(self) -> Vec<String> {
        vec![self.token().to_owned()]
    }
}

impl IntoMethods for &str {
    fn into_methods(self) -> Vec<String> {
        vec![self.to_ascii_lowercase()]
    }
}

impl IntoMethods for String {
    fn into_methods(self) -> Vec<String> {
        self.as_str().into_methods()
    }
}

impl<T: IntoMethods + Clone> IntoMethods for &[T] {
    fn into_methods(self) -> Vec<String> {
        self.iter().cloned().flat_map(IntoMethods::into_methods).collect()
    }
}

impl<T: IntoMethods, const N: usize> IntoMethods for [T; N] {
    fn into_methods(self) -> Vec<String> {
        self.into_iter().flat_map(IntoMethods::into_methods).collect()
    }
}

impl<T: IntoMethods> IntoMethods for Vec<T> {
    fn into_methods(self) -> Vec<String> {
        self.into_iter().flat_map(IntoMethods::into_methods).collect()
    }
}
