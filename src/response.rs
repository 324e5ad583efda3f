//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue, LOCATION};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`ResponseBuilder::bytes`].
pub enum ContentType {
    Html,         // text/html; charset=utf-8
    Json,         // application/json
    OctetStream,  // application/octet-stream
    Text,         // text/plain; charset=utf-8
    Xml,          // application/xml
}

impl ContentType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Xml         => "application/xml",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use waypost::Response;
/// use http::StatusCode;
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::text("hello");
/// Response::status(StatusCode::NO_CONTENT);
/// Response::redirect("/login");
/// Response::redirect_with("/new-home", StatusCode::MOVED_PERMANENTLY);
///
/// Response::builder()
///     .status(StatusCode::CREATED)
///     .header("location", "/users/42")
///     .json(br#"{"id":42}"#.to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Bytes,
    pub(crate) headers: HeaderMap,
    pub(crate) status: StatusCode,
}

impl Response {
    /// `200 OK` with `application/json`.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::typed(ContentType::Json, body.into())
    }

    /// `200 OK` with `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::typed(ContentType::Text, Bytes::from(body.into()))
    }

    /// `200 OK` with `text/html; charset=utf-8`.
    pub fn html(body: impl Into<String>) -> Self {
        Self::typed(ContentType::Html, Bytes::from(body.into()))
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self { body: Bytes::new(), headers: HeaderMap::new(), status: code }
    }

    /// `302 Found` pointing at `url`.
    pub fn redirect(url: &str) -> Self {
        Self::redirect_with(url, StatusCode::FOUND)
    }

    /// Redirect to `url` with an explicit status, e.g. `301` or `307`.
    pub fn redirect_with(url: &str, code: StatusCode) -> Self {
        Self::builder()
            .status(code)
            .header(LOCATION.as_str(), url)
            .no_body()
    }

    /// The standard JSON envelope; the HTTP status is the envelope's `code`.
    pub fn envelope(envelope: Envelope) -> Self {
        envelope.into_response()
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: HeaderMap::new(), status: StatusCode::OK }
    }

    fn typed(content_type: ContentType, body: Bytes) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()));
        Self { body, headers, status: StatusCode::OK }
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Converts into the hyper-facing representation.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
/// Terminated by a typed body method.
pub struct ResponseBuilder {
    headers: HeaderMap,
    status: StatusCode,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    /// Appends a header. Invalid names or values are dropped.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn json(self, body: impl Into<Bytes>) -> Response {
        self.bytes(ContentType::Json, body)
    }

    pub fn text(self, body: impl Into<String>) -> Response {
        self.bytes(ContentType::Text, Bytes::from(body.into()))
    }

    /// Terminate with a typed body.
    pub fn bytes(mut self, content_type: ContentType, body: impl Into<Bytes>) -> Response {
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()));
        Response { body: body.into(), headers: self.headers, status: self.status }
    }

    pub fn no_body(self) -> Response {
        Response { body: Bytes::new(), headers: self.headers, status: self.status }
    }
}

// ── Envelope ──────────────────────────────────────────────────────────────────

/// The `{status, code, message, result, ...custom}` body most endpoints answer with.
///
/// ```rust
/// use http::StatusCode;
/// use serde_json::json;
/// use waypost::{Envelope, Response};
///
/// let res = Response::envelope(
///     Envelope::new(false, StatusCode::NOT_FOUND, "no such user")
///         .result(json!(null))
///         .custom("trace", json!("abc")),
/// );
/// assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    status: bool,
    code: u16,
    message: String,
    result: Value,
    #[serde(flatten)]
    custom: Map<String, Value>,
}

impl Envelope {
    const RESERVED: [&'static str; 4] = ["status", "code", "message", "result"];

    /// `result` starts out as an empty object.
    pub fn new(status: bool, code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.as_u16(),
            message: message.into(),
            result: Value::Object(Map::new()),
            custom: Map::new(),
        }
    }

    /// `true`, `200 OK`, and `result` as the payload.
    pub fn ok(result: Value) -> Self {
        Self::new(true, StatusCode::OK, "").result(result)
    }

    pub fn result(mut self, result: Value) -> Self {
        self.result = result;
        self
    }

    /// Adds a top-level field next to the fixed ones. The fixed names
    /// (`status`, `code`, `message`, `result`) cannot be overridden and are ignored.
    pub fn custom(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !Self::RESERVED.contains(&key.as_str()) {
            self.custom.insert(key, value);
        }
        self
    }

    /// The HTTP status the envelope is sent with.
    pub fn code(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let code = self.code();
        match serde_json::to_vec(&self) {
            Ok(body) => Response::builder().status(code).json(body),
            Err(e) => {
                error!("envelope serialization failed: {e}");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}

/// `()` means "nothing to say": `204 No Content`.
impl IntoResponse for () {
    fn into_response(self) -> Response { Response::status(StatusCode::NO_CONTENT) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_set_content_type() {
        let res = Response::text("pong");
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(res.body(), b"pong");
    }

    #[test]
    fn redirect_defaults_to_found() {
        let res = Response::redirect("/login");
        assert_eq!(res.status_code(), StatusCode::FOUND);
        assert_eq!(res.header("location"), Some("/login"));
        assert!(res.body().is_empty());
    }

    #[test]
    fn redirect_with_keeps_the_given_status() {
        let res = Response::redirect_with("/moved", StatusCode::MOVED_PERMANENTLY);
        assert_eq!(res.status_code(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(res.header("location"), Some("/moved"));
        assert!(res.body().is_empty());
    }

    #[test]
    fn envelope_status_follows_code() {
        let res = Response::envelope(
            Envelope::new(false, StatusCode::UNPROCESSABLE_ENTITY, "invalid email")
                .result(Value::Null)
                .custom("field", Value::from("email"))
                .custom("code", Value::from(200)),
        );
        assert_eq!(res.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(res.header("content-type"), Some("application/json"));

        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "status": false,
                "code": 422,
                "message": "invalid email",
                "result": null,
                "field": "email",
            })
        );
    }

    #[test]
    fn ok_envelope_defaults() {
        let res = Envelope::ok(serde_json::json!([1, 2])).into_response();
        assert_eq!(res.status_code(), StatusCode::OK);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], true);
        assert_eq!(body["message"], "");
        assert_eq!(body["result"], serde_json::json!([1, 2]));

        let fresh: Value =
            serde_json::from_slice(Envelope::new(true, StatusCode::CREATED, "made").into_response().body())
                .unwrap();
        assert_eq!(fresh["result"], serde_json::json!({}));
    }

    #[test]
    fn builder_keeps_custom_headers() {
        let res = Response::builder()
            .status(StatusCode::CREATED)
            .header("x-request-id", "abc")
            .header("bad header", "dropped")
            .json(&b"{}"[..]);
        assert_eq!(res.status_code(), StatusCode::CREATED);
        assert_eq!(res.header("x-request-id"), Some("abc"));
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(res.headers().len(), 2);
    }

    #[test]
    fn unit_is_no_content() {
        assert_eq!(().into_response().status_code(), StatusCode::NO_CONTENT);
    }
}
