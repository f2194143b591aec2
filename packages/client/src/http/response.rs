//! Response interpretation into typed payloads.

use crate::error::{self, Error};
use crate::http::request::{Payload, ResponseKind};
use crate::transport::RawResponse;

/// Interprets a raw transport response according to the requested kind.
///
/// `Ok(None)` means the kind carries nothing deliverable through the
/// standard callback (`Raw`, `Prefetch`, `Parsed`); the caller that asked
/// for one of those kinds owns any further processing.
pub fn interpret(response: &RawResponse, kind: ResponseKind) -> Result<Option<Payload>, Error> {
    match kind {
        ResponseKind::Object => {
            let text = body_text(response)?;
            match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(value) if value.is_object() => Ok(Some(Payload::Object(value))),
                Ok(_) => Err(error::parse_detail("expected a JSON object").with_body(text)),
                Err(e) => Err(error::parse(e).with_body(text)),
            }
        }
        ResponseKind::Array => {
            let text = body_text(response)?;
            match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(value) if value.is_array() => Ok(Some(Payload::Array(value))),
                Ok(_) => Err(error::parse_detail("expected a JSON array").with_body(text)),
                Err(e) => Err(error::parse(e).with_body(text)),
            }
        }
        ResponseKind::Text => Ok(Some(Payload::Text(body_text(response)?))),
        ResponseKind::Raw | ResponseKind::Prefetch | ResponseKind::Parsed => Ok(None),
    }
}

fn body_text(response: &RawResponse) -> Result<String, Error> {
    String::from_utf8(response.body.to_vec()).map_err(error::parse)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{HeaderMap, StatusCode};

    use super::*;
    use crate::error::Kind;

    fn response(body: &'static [u8]) -> RawResponse {
        RawResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn parses_json_object() {
        let payload = interpret(&response(br#"{"id": 7}"#), ResponseKind::Object)
            .unwrap()
            .unwrap();
        assert_eq!(payload, Payload::Object(serde_json::json!({"id": 7})));
    }

    #[test]
    fn parses_json_array() {
        let payload = interpret(&response(b"[1, 2, 3]"), ResponseKind::Array)
            .unwrap()
            .unwrap();
        assert_eq!(payload, Payload::Array(serde_json::json!([1, 2, 3])));
    }

    #[test]
    fn object_kind_rejects_arrays() {
        let error = interpret(&response(b"[1]"), ResponseKind::Object).unwrap_err();
        assert_eq!(error.kind(), Kind::Parse);
        assert_eq!(error.error_body(), Some("[1]"));
    }

    #[test]
    fn unparsable_body_keeps_the_raw_text() {
        let error = interpret(&response(b"<html>nope</html>"), ResponseKind::Object).unwrap_err();
        assert_eq!(error.kind(), Kind::Parse);
        assert_eq!(error.error_body(), Some("<html>nope</html>"));
    }

    #[test]
    fn text_kind_returns_body_verbatim() {
        let payload = interpret(&response(b"hello"), ResponseKind::Text)
            .unwrap()
            .unwrap();
        assert_eq!(payload, Payload::Text("hello".to_string()));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let error = interpret(&response(&[0xff, 0xfe]), ResponseKind::Text).unwrap_err();
        assert_eq!(error.kind(), Kind::Parse);
    }

    #[test]
    fn pass_through_kinds_deliver_nothing() {
        for kind in [ResponseKind::Raw, ResponseKind::Prefetch, ResponseKind::Parsed] {
            assert!(interpret(&response(b"ignored"), kind).unwrap().is_none());
        }
    }
}
