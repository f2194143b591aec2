//! Transport contract consumed by the dispatcher.
//!
//! The actual network stack (connection handling, TLS, socket I/O) lives
//! behind [`Transport`]; the dispatcher depends only on the `perform`
//! contract and treats everything behind it as opaque.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::error::BoxError;
use crate::http::body::WireBody;

/// Upload progress callback: `(bytes_transferred, total_bytes)`.
/// Invoked by the transport during multipart uploads; purely advisory.
pub type ProgressListener = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// A fully resolved call handed to the transport: the URL template has been
/// substituted, headers merged and the body variant chosen.
pub struct PreparedCall {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<WireBody>,
    /// Opaque cache directive passed through untouched.
    pub cache_directive: Option<String>,
    pub progress: Option<ProgressListener>,
}

impl fmt::Debug for PreparedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedCall")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("cache_directive", &self.cache_directive)
            .field("progress", &self.progress.as_ref().map(|_| "<listener>"))
            .finish()
    }
}

/// Raw response produced by a transport. The body has been read to
/// completion and is consumed once by the interpreter.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Transport-level failure: connection, timeout, TLS. Carries the error
/// response when the server produced one before the failure.
#[derive(Debug)]
pub struct TransportFailure {
    pub response: Option<RawResponse>,
    pub cause: BoxError,
}

impl TransportFailure {
    /// Wraps a transport-level cause with no response attached.
    pub fn new<E: Into<BoxError>>(cause: E) -> Self {
        Self {
            response: None,
            cause: cause.into(),
        }
    }

    /// Attaches the error response the server produced before failing.
    #[must_use]
    pub fn with_response(mut self, response: RawResponse) -> Self {
        self.response = Some(response);
        self
    }
}

/// Performs the actual network call for one prepared request.
///
/// A worker thread blocks inside `perform`; everything before and after it
/// is non-blocking dispatcher work.
pub trait Transport: Send + Sync + 'static {
    fn perform(&self, call: &PreparedCall) -> Result<RawResponse, TransportFailure>;
}
