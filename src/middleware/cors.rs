//! Origin allow-list and the CORS middleware that enforces it.
//!
//! [`CorsInfo`] is the allow-list: a set of origin strings built once at
//! startup, where `*` admits everyone. [`Cors`] wraps the next handler and,
//! for every request:
//!
//! | Registry | `Origin` header | `Access-Control-Allow-Origin` |
//! |---|---|---|
//! | contains `*` | anything or absent | `*` |
//! | listed exactly | `http://a.com` | `http://a.com` |
//! | not listed | `http://b.com` | *(no CORS headers)* |
//!
//! Whenever the origin header is set, `Access-Control-Allow-Methods` is set
//! alongside it. `OPTIONS` requests are answered with `200 OK` right here and
//! never reach the wrapped handler.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use http::header::{
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue, ORIGIN,
};
use http::{HeaderMap, Method, StatusCode};
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, OriginError};
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler, private};
use crate::request::Request;
use crate::response::Response;

const WILDCARD: &str = "*";
const ALLOWED_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";

// ── CorsInfo ──────────────────────────────────────────────────────────────────

/// The set of origins allowed to read responses cross-origin.
///
/// Matching is exact and case-sensitive: `http://a.com` does not admit
/// `http://a.com/` or `HTTP://A.COM`. The member `*` admits every origin.
/// An empty registry admits nothing.
///
/// ```rust
/// use corsgate::middleware::CorsInfo;
///
/// let info = CorsInfo::new(["http://a.com", "https://b.com:8443"]).unwrap();
/// assert!(info.origin_allowed("http://a.com"));
/// assert!(!info.origin_allowed("http://c.com"));
///
/// // Flag-style: comma-separated.
/// let info: CorsInfo = "*".parse().unwrap();
/// assert!(info.origin_allowed("http://anything.example"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorsInfo {
    origins: HashSet<String>,
}

impl CorsInfo {
    /// Builds the registry, rejecting any entry other than `*` that is not an
    /// absolute URL.
    ///
    /// Duplicates collapse. The stored value is the entry exactly as given;
    /// parsing only validates it.
    pub fn new<I, S>(origins: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for origin in origins {
            let origin = origin.as_ref();
            if origin != WILDCARD {
                validate(origin).map_err(|source| Error::InvalidOrigin {
                    origin: origin.to_owned(),
                    source,
                })?;
            }
            set.insert(origin.to_owned());
        }

        let info = Self { origins: set };
        debug!(origins = info.len(), any = info.allows_any(), "cors registry built");
        Ok(info)
    }

    /// Whether a request from `origin` may read the response.
    pub fn origin_allowed(&self, origin: &str) -> bool {
        self.allows_any() || self.origins.contains(origin)
    }

    /// Whether the wildcard `*` is configured.
    pub fn allows_any(&self) -> bool {
        self.origins.contains(WILDCARD)
    }

    pub fn len(&self) -> usize { self.origins.len() }
    pub fn is_empty(&self) -> bool { self.origins.is_empty() }
}

/// Control characters are rejected outright: URL parsing strips or ignores
/// them, which would leave an entry that never matches.
fn validate(origin: &str) -> Result<(), OriginError> {
    if let Some(c) = origin.chars().find(|c| c.is_control()) {
        return Err(OriginError::ControlCharacter(c));
    }
    Url::parse(origin)?;
    Ok(())
}

/// Parses a comma-separated flag value such as
/// `"http://a.com, http://b.com"`. Blank entries are ignored, so `""` is the
/// empty registry.
impl FromStr for CorsInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(',').map(str::trim).filter(|o| !o.is_empty()))
    }
}

/// Sorted and comma-joined, so it parses back into the same registry.
impl fmt::Display for CorsInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut origins: Vec<&str> = self.origins.iter().map(String::as_str).collect();
        origins.sort_unstable();
        f.write_str(&origins.join(","))
    }
}

// ── Cors ──────────────────────────────────────────────────────────────────────

/// Middleware that adds CORS headers for allowed origins and answers
/// preflight requests.
///
/// Wrap the real handler once at startup and hand the result to the server:
///
/// ```rust,no_run
/// use corsgate::middleware::{Cors, CorsInfo};
/// use corsgate::{Request, Response, Server};
///
/// async fn hello(_req: Request) -> Response {
///     Response::text("hello")
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), corsgate::Error> {
///     let info = CorsInfo::new(["https://app.example.com"])?;
///     let app = Cors::new(info, hello);
///     Server::bind(([0, 0, 0, 0], 3000).into()).serve(app).await
/// }
/// ```
pub struct Cors {
    info: Arc<CorsInfo>,
    next: BoxedHandler,
}

impl Cors {
    pub fn new(info: impl Into<Arc<CorsInfo>>, next: impl Handler) -> Self {
        Self { info: info.into(), next: next.into_boxed_handler() }
    }

    pub fn info(&self) -> &CorsInfo { &self.info }

    /// Runs the middleware for one request.
    pub async fn handle(&self, req: Request) -> Response {
        self.call(req).await
    }

    /// The value to send in `Access-Control-Allow-Origin`, if any.
    fn allow_origin(&self, req: &Request) -> Option<HeaderValue> {
        if self.info.allows_any() {
            return Some(HeaderValue::from_static(WILDCARD));
        }

        // Compared as UTF-8, not `to_str()`, which only admits visible ASCII.
        let origin = req.headers().get(ORIGIN)?;
        match std::str::from_utf8(origin.as_bytes()) {
            Ok(value) if self.info.origin_allowed(value) => Some(origin.clone()),
            _ => {
                trace!(?origin, "origin not allowed");
                None
            }
        }
    }
}

fn add_headers(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.append(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    headers.append(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
}

impl private::Sealed for Cors {}

impl Handler for Cors {
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}

impl ErasedHandler for Cors {
    fn call(&self, req: Request) -> BoxFuture {
        let origin = self.allow_origin(&req);

        if *req.method() == Method::OPTIONS {
            trace!(path = req.path(), "answering preflight");
            let mut res = Response::status(StatusCode::OK);
            if let Some(origin) = origin {
                add_headers(&mut res.headers, origin);
            }
            return Box::pin(async move { res });
        }

        let fut = self.next.call(req);
        Box::pin(async move {
            let mut res = fut.await;
            if let Some(origin) = origin {
                add_headers(&mut res.headers, origin);
            }
            res
        })
    }
}
