//! Unified error type.

/// The error type returned by corsgate's fallible operations.
///
/// Requests never fail: the middleware answers every request with a
/// [`Response`](crate::Response). This type surfaces configuration mistakes,
/// caught when the origin registry is built, and infrastructure failures such
/// as binding to a port.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured origin other than `*` is not a well-formed URL.
    #[error("invalid CORS origin {origin:?}: {source}")]
    InvalidOrigin {
        origin: String,
        #[source]
        source: OriginError,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a configured origin was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OriginError {
    /// URL parsing would silently drop or keep this character, so the entry
    /// could never match a real `Origin` header.
    #[error("invalid control character {0:?}")]
    ControlCharacter(char),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}
