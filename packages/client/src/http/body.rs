//! Wire body resolution from the descriptor's content fields.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::http::request::Request;

const JSON_MEDIA_TYPE: &str = "application/json; charset=utf-8";
const MARKDOWN_MEDIA_TYPE: &str = "text/x-markdown; charset=utf-8";
const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";
const MULTIPART_MEDIA_TYPE: &str = "multipart/form-data";

/// Resolved request body: the chosen media type plus the payload the
/// transport puts on the wire.
#[derive(Debug, Clone)]
pub struct WireBody {
    pub media_type: Option<String>,
    pub payload: BodyPayload,
}

/// The wire payload variants a transport must support.
#[derive(Debug, Clone)]
pub enum BodyPayload {
    /// UTF-8 text written verbatim.
    Text(String),
    /// Raw bytes written verbatim.
    Bytes(Bytes),
    /// File streamed from disk by the transport.
    File(PathBuf),
    /// URL-encoded form, already assembled.
    Form(String),
    /// Multipart parts streamed in order.
    Multipart(Vec<Part>),
}

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub file: PathBuf,
    /// `filename` attribute of the content disposition; absent on bare
    /// parts.
    pub file_name: Option<String>,
    pub media_type: Option<String>,
}

impl Part {
    /// `Content-Disposition` header value for this part.
    #[must_use]
    pub fn content_disposition(&self) -> String {
        match &self.file_name {
            Some(file_name) => format!(
                "form-data; name=\"{}\"; filename=\"{}\"",
                self.name, file_name
            ),
            None => format!("form-data; name=\"{}\"", self.name),
        }
    }
}

/// Picks the wire body for a simple request. The first populated content
/// field wins: JSON string, raw string, file, raw bytes, then form
/// parameters (an empty form when nothing is set).
pub(crate) fn resolve_body(request: &Request) -> WireBody {
    if let Some(json) = &request.json {
        WireBody {
            media_type: Some(media_type(request, JSON_MEDIA_TYPE)),
            payload: BodyPayload::Text(json.clone()),
        }
    } else if let Some(text) = &request.text {
        WireBody {
            media_type: Some(media_type(request, MARKDOWN_MEDIA_TYPE)),
            payload: BodyPayload::Text(text.clone()),
        }
    } else if let Some(file) = &request.file {
        WireBody {
            media_type: Some(media_type(request, MARKDOWN_MEDIA_TYPE)),
            payload: BodyPayload::File(file.clone()),
        }
    } else if let Some(bytes) = &request.bytes {
        WireBody {
            media_type: Some(media_type(request, MARKDOWN_MEDIA_TYPE)),
            payload: BodyPayload::Bytes(bytes.clone()),
        }
    } else {
        WireBody {
            media_type: Some(FORM_MEDIA_TYPE.to_string()),
            payload: BodyPayload::Form(encode_form(
                &request.form_params,
                &request.encoded_form_params,
            )),
        }
    }
}

/// Builds the multipart body. Each file is emitted twice: first a bare part
/// with no filename and no media type, then a named part carrying the
/// filename and a MIME type guessed from it.
pub(crate) fn resolve_multipart(request: &Request) -> WireBody {
    let mut parts = Vec::with_capacity(request.multipart_files.len() * 2);
    for (name, file) in &request.multipart_files {
        parts.push(Part {
            name: name.clone(),
            file: file.clone(),
            file_name: None,
            media_type: None,
        });
    }
    for (name, file) in &request.multipart_files {
        parts.push(Part {
            name: name.clone(),
            file: file.clone(),
            file_name: Some(display_name(file)),
            media_type: Some(
                mime_guess::from_path(file)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string(),
            ),
        });
    }
    WireBody {
        media_type: Some(media_type(request, MULTIPART_MEDIA_TYPE)),
        payload: BodyPayload::Multipart(parts),
    }
}

fn media_type(request: &Request, default: &str) -> String {
    request
        .custom_content_type
        .clone()
        .unwrap_or_else(|| default.to_string())
}

/// Regular parameters are percent-encoded; pre-encoded parameters are
/// appended verbatim so they are not encoded twice.
fn encode_form(
    params: &BTreeMap<String, String>,
    encoded: &BTreeMap<String, String>,
) -> String {
    let mut out = String::new();
    for (key, value) in params {
        push_pair(&mut out, &urlencoding::encode(key), &urlencoding::encode(value));
    }
    for (key, value) in encoded {
        push_pair(&mut out, key, value);
    }
    out
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    if !out.is_empty() {
        out.push('&');
    }
    out.push_str(key);
    out.push('=');
    out.push_str(value);
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BodyRequestBuilder, MultipartRequestBuilder};

    #[test]
    fn json_takes_precedence_over_file() {
        let request = BodyRequestBuilder::post("https://api.example.com/items")
            .json_string(r#"{"a":1}"#)
            .file_body("/tmp/ignored.bin")
            .build();

        let body = resolve_body(&request);
        assert_eq!(body.media_type.as_deref(), Some(JSON_MEDIA_TYPE));
        assert!(matches!(body.payload, BodyPayload::Text(ref t) if t == r#"{"a":1}"#));
    }

    #[test]
    fn raw_string_defaults_to_markdown() {
        let request = BodyRequestBuilder::post("https://api.example.com/items")
            .text_body("# hello")
            .build();

        let body = resolve_body(&request);
        assert_eq!(body.media_type.as_deref(), Some(MARKDOWN_MEDIA_TYPE));
    }

    #[test]
    fn custom_content_type_overrides_default() {
        let request = BodyRequestBuilder::post("https://api.example.com/items")
            .text_body("plain")
            .content_type("text/plain; charset=utf-8")
            .build();

        let body = resolve_body(&request);
        assert_eq!(body.media_type.as_deref(), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn form_params_encode_without_double_encoding() {
        let request = BodyRequestBuilder::post("https://api.example.com/items")
            .body_param("name", "a b")
            .encoded_body_param("raw", "x%20y")
            .build();

        let body = resolve_body(&request);
        assert_eq!(body.media_type.as_deref(), Some(FORM_MEDIA_TYPE));
        match body.payload {
            BodyPayload::Form(encoded) => assert_eq!(encoded, "name=a%20b&raw=x%20y"),
            other => panic!("expected form payload, got {other:?}"),
        }
    }

    #[test]
    fn empty_content_yields_empty_form() {
        let request = BodyRequestBuilder::post("https://api.example.com/items").build();
        let body = resolve_body(&request);
        match body.payload {
            BodyPayload::Form(encoded) => assert!(encoded.is_empty()),
            other => panic!("expected form payload, got {other:?}"),
        }
    }

    #[test]
    fn multipart_emits_bare_then_named_parts() {
        let request = MultipartRequestBuilder::new("https://api.example.com/upload")
            .file("avatar", "/tmp/a.png")
            .file("doc", "/tmp/d.pdf")
            .build();

        let body = resolve_multipart(&request);
        assert_eq!(body.media_type.as_deref(), Some(MULTIPART_MEDIA_TYPE));
        let BodyPayload::Multipart(parts) = body.payload else {
            panic!("expected multipart payload");
        };
        assert_eq!(parts.len(), 4);

        assert_eq!(parts[0].content_disposition(), "form-data; name=\"avatar\"");
        assert_eq!(parts[0].media_type, None);
        assert_eq!(parts[1].content_disposition(), "form-data; name=\"doc\"");

        assert_eq!(
            parts[2].content_disposition(),
            "form-data; name=\"avatar\"; filename=\"a.png\""
        );
        assert_eq!(parts[2].media_type.as_deref(), Some("image/png"));
        assert_eq!(
            parts[3].content_disposition(),
            "form-data; name=\"doc\"; filename=\"d.pdf\""
        );
        assert_eq!(parts[3].media_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn multipart_custom_boundary_type() {
        let request = MultipartRequestBuilder::new("https://api.example.com/upload")
            .file("avatar", "/tmp/a.png")
            .content_type("multipart/mixed")
            .build();

        let body = resolve_multipart(&request);
        assert_eq!(body.media_type.as_deref(), Some("multipart/mixed"));
    }
}
