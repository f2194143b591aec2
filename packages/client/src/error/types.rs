use std::error::Error as StdError;
use std::fmt;

/// A `Result` alias where the `Err` case is `fetchq_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// The fixed detail message carried by a cancellation error.
pub const REQUEST_CANCELLED: &str = "request cancelled";

/// Error delivered through a request callback.
///
/// Callers only ever see this type: transport and parser failures are
/// converted before they reach the delivery path.
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    code: i32,
    detail: String,
    body: Option<String>,
    source: Option<BoxError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// URL template produced an unparsable URL after substitution.
    MalformedUrl,
    /// Response body present but not parsable as the requested kind.
    Parse,
    /// Network or transport level failure.
    Transport,
    /// The request was cancelled before delivery.
    Cancelled,
}

impl Error {
    pub(crate) fn new(kind: Kind, detail: impl Into<String>) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                code: 0,
                detail: detail.into(),
                body: None,
                source: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub(crate) fn with<E: Into<BoxError>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub(crate) fn with_code(mut self, code: i32) -> Error {
        self.inner.code = code;
        self
    }

    #[must_use]
    pub(crate) fn with_body(mut self, body: String) -> Error {
        self.inner.body = Some(body);
        self
    }

    /// Rewrites this error into the cancellation sentinel (code `0`, fixed
    /// detail), keeping any captured response body and source.
    #[must_use]
    pub(crate) fn into_cancelled(mut self) -> Error {
        self.inner.kind = Kind::Cancelled;
        self.inner.code = 0;
        self.inner.detail = REQUEST_CANCELLED.to_string();
        self
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// HTTP status of the error response when one was observed, else `0`.
    #[must_use]
    pub fn code(&self) -> i32 {
        self.inner.code
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.inner.detail
    }

    /// Text drained from an error response body, when one was present.
    #[must_use]
    pub fn error_body(&self) -> Option<&str> {
        self.inner.body.as_deref()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.kind == Kind::Cancelled
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("fetchq::Error");

        builder
            .field("kind", &self.inner.kind)
            .field("code", &self.inner.code)
            .field("detail", &self.inner.detail);

        if let Some(ref body) = self.inner.body {
            builder.field("body", body);
        }

        if let Some(ref source) = self.inner.source {
            builder.field("source", source);
        }

        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.detail)?;
        if self.inner.code > 0 {
            write!(f, " (status {})", self.inner.code)?;
        }
        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_rewrite_keeps_body() {
        let error = Error::new(Kind::Transport, "connection error")
            .with_code(500)
            .with_body("boom".to_string())
            .into_cancelled();

        assert_eq!(error.kind(), Kind::Cancelled);
        assert_eq!(error.code(), 0);
        assert_eq!(error.detail(), REQUEST_CANCELLED);
        assert_eq!(error.error_body(), Some("boom"));
        assert!(error.is_cancelled());
    }

    #[test]
    fn display_includes_status_and_source() {
        let error = Error::new(Kind::Transport, "connection error")
            .with_code(502)
            .with(std::io::Error::other("refused"));

        assert_eq!(error.to_string(), "connection error (status 502): refused");
    }
}
