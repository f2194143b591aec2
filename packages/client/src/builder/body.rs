//! Builder for requests carrying a body.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use serde::Serialize;

use crate::executor::Executor;
use crate::http::request::{Priority, Request};
use crate::transport::Transport;

/// Builder for body-carrying requests (POST, PUT, DELETE, PATCH).
///
/// The content setters populate the variant-exclusive body fields; when
/// more than one is set, resolution picks the first in precedence order
/// (JSON string, raw string, file, raw bytes, form parameters).
pub struct BodyRequestBuilder {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) priority: Priority,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) query_params: BTreeMap<String, String>,
    pub(crate) path_params: BTreeMap<String, String>,
    pub(crate) json: Option<String>,
    pub(crate) text: Option<String>,
    pub(crate) file: Option<PathBuf>,
    pub(crate) bytes: Option<Bytes>,
    pub(crate) form_params: BTreeMap<String, String>,
    pub(crate) encoded_form_params: BTreeMap<String, String>,
    pub(crate) custom_content_type: Option<String>,
    pub(crate) cache_directive: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) executor: Option<Arc<dyn Executor>>,
    pub(crate) transport: Option<Arc<dyn Transport>>,
}

impl BodyRequestBuilder {
    /// Starts a POST request for `url`.
    pub fn post(url: impl Into<String>) -> Self {
        Self::with_method(Method::POST, url)
    }

    /// Starts a PUT request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::with_method(Method::PUT, url)
    }

    /// Starts a DELETE request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::with_method(Method::DELETE, url)
    }

    /// Starts a PATCH request.
    pub fn patch(url: impl Into<String>) -> Self {
        Self::with_method(Method::PATCH, url)
    }

    fn with_method(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            priority: Priority::default(),
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            path_params: BTreeMap::new(),
            json: None,
            text: None,
            file: None,
            bytes: None,
            form_params: BTreeMap::new(),
            encoded_form_params: BTreeMap::new(),
            custom_content_type: None,
            cache_directive: None,
            user_agent: None,
            executor: None,
            transport: None,
        }
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    /// Value substituted for the `{name}` token in the URL template.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Adds a regular form parameter; the value is percent-encoded when the
    /// form body is assembled.
    #[must_use]
    pub fn body_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form_params.insert(name.into(), value.into());
        self
    }

    /// Adds a pre-encoded form parameter, inserted verbatim.
    #[must_use]
    pub fn encoded_body_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.encoded_form_params.insert(name.into(), value.into());
        self
    }

    /// Sets a raw JSON string body.
    #[must_use]
    pub fn json_string(mut self, json: impl Into<String>) -> Self {
        self.json = Some(json.into());
        self
    }

    /// Sets a JSON body from an in-memory value.
    #[must_use]
    pub fn json_value(mut self, value: serde_json::Value) -> Self {
        self.json = Some(value.to_string());
        self
    }

    /// Serializes `body` to a JSON body. Serialization failures are logged
    /// and leave the body unset.
    #[must_use]
    pub fn json_body<T: Serialize>(mut self, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(json) => self.json = Some(json),
            Err(e) => tracing::warn!("failed to serialize json body: {e}"),
        }
        self
    }

    /// Sets a raw string body.
    #[must_use]
    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets a file body, streamed from disk by the transport.
    #[must_use]
    pub fn file_body(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets a raw byte body.
    #[must_use]
    pub fn byte_body(mut self, bytes: impl Into<Bytes>) -> Self {
        self.bytes = Some(bytes.into());
        self
    }

    /// Overrides the media type the body resolution would pick.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.custom_content_type = Some(content_type.into());
        self
    }

    /// Opaque directive passed through to the transport untouched.
    #[must_use]
    pub fn cache_directive(mut self, directive: impl Into<String>) -> Self {
        self.cache_directive = Some(directive.into());
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Delivery executor override for this request.
    #[must_use]
    pub fn executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Transport override for this request.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Finalizes into an inert request descriptor.
    #[must_use]
    pub fn build(self) -> Request {
        Request::from_body(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct NewUser {
        name: &'static str,
    }

    #[test]
    fn json_body_serializes() {
        let request = BodyRequestBuilder::post("https://api.example.com/users")
            .json_body(&NewUser { name: "ada" })
            .build();
        assert_eq!(request.json.as_deref(), Some(r#"{"name":"ada"}"#));
    }

    #[test]
    fn json_value_renders_compact() {
        let request = BodyRequestBuilder::put("https://api.example.com/users/1")
            .json_value(serde_json::json!({"active": false}))
            .build();
        assert_eq!(request.json.as_deref(), Some(r#"{"active":false}"#));
        assert_eq!(request.method(), &Method::PUT);
    }
}
