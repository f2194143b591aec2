use super::types::{BoxError, Error, Kind, REQUEST_CANCELLED};

/// Creates an `Error` for a URL that failed to parse after template
/// substitution.
pub fn malformed_url<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::MalformedUrl, "malformed url").with(e)
}

/// Creates a `Parse` error wrapping the underlying decode failure.
pub fn parse<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Parse, "response not parsable as the requested kind").with(e)
}

/// Creates a `Parse` error with an explicit detail message.
pub fn parse_detail(detail: impl Into<String>) -> Error {
    Error::new(Kind::Parse, detail)
}

/// Creates a `Transport` error with no response attached.
pub fn transport<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Transport, "connection error").with(e)
}

/// Creates a `Transport` error for a request submitted before the
/// process-wide dispatcher was initialized.
pub fn not_initialized() -> Error {
    Error::new(Kind::Transport, "request queue not initialized")
}

/// Creates the cancellation sentinel: code `0`, fixed detail.
pub fn cancelled() -> Error {
    Error::new(Kind::Cancelled, REQUEST_CANCELLED)
}
