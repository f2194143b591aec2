use super::types::{Error, Kind};
use crate::transport::TransportFailure;

impl Error {
    /// Converts a transport failure, draining any error response body to
    /// text so callers can inspect what the server said.
    pub(crate) fn from_transport(failure: TransportFailure) -> Error {
        let TransportFailure { response, cause } = failure;
        let mut error = Error::new(Kind::Transport, "connection error").with(cause);
        if let Some(response) = response {
            error = error.with_code(i32::from(response.status.as_u16()));
            let text = String::from_utf8_lossy(&response.body);
            if !text.is_empty() {
                error = error.with_body(text.into_owned());
            }
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{HeaderMap, StatusCode};

    use super::*;
    use crate::transport::RawResponse;

    #[test]
    fn captures_status_and_error_body() {
        let failure = TransportFailure::new(std::io::Error::other("refused")).with_response(
            RawResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                headers: HeaderMap::new(),
                body: Bytes::from_static(b"server said no"),
            },
        );

        let error = Error::from_transport(failure);
        assert_eq!(error.kind(), Kind::Transport);
        assert_eq!(error.code(), 500);
        assert_eq!(error.error_body(), Some("server said no"));
    }

    #[test]
    fn no_response_means_code_zero() {
        let failure = TransportFailure::new(std::io::Error::other("timed out"));
        let error = Error::from_transport(failure);
        assert_eq!(error.code(), 0);
        assert_eq!(error.error_body(), None);
    }
}
