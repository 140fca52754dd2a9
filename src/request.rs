//! Incoming HTTP request type.

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Method, Uri};

/// An incoming HTTP request with its body already read into memory.
pub struct Request {
    pub(crate) parts: Parts,
    pub(crate) body: Bytes,
}

impl Request {
    pub(crate) fn from_parts(parts: Parts, body: Bytes) -> Self {
        Self { parts, body }
    }

    pub fn method(&self) -> &Method { &self.parts.method }
    pub fn uri(&self) -> &Uri { &self.parts.uri }
    pub fn path(&self) -> &str { self.parts.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.parts.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    ///
    /// Returns `None` when the header is absent or its value is not visible
    /// ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name)?.to_str().ok()
    }
}

/// Builds a request outside the server, e.g. to drive a handler in tests.
impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::from_parts(parts, body)
    }
}
