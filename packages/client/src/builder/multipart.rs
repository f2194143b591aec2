//! Builder for multipart file uploads.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use http::Method;

use crate::executor::Executor;
use crate::http::request::{Priority, Request};
use crate::transport::{ProgressListener, Transport};

/// Builder for multipart form uploads: a mapping of field name to file.
pub struct MultipartRequestBuilder {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) priority: Priority,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) query_params: BTreeMap<String, String>,
    pub(crate) path_params: BTreeMap<String, String>,
    pub(crate) multipart_files: BTreeMap<String, PathBuf>,
    pub(crate) custom_content_type: Option<String>,
    pub(crate) cache_directive: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) executor: Option<Arc<dyn Executor>>,
    pub(crate) transport: Option<Arc<dyn Transport>>,
    pub(crate) progress: Option<ProgressListener>,
}

impl MultipartRequestBuilder {
    /// Starts a multipart POST upload to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            priority: Priority::default(),
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            path_params: BTreeMap::new(),
            multipart_files: BTreeMap::new(),
            custom_content_type: None,
            cache_directive: None,
            user_agent: None,
            executor: None,
            transport: None,
            progress: None,
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

    /// Maps a form field name to the file uploaded under it.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        self.multipart_files.insert(name.into(), file.into());
        self
    }

    /// Overrides the multipart boundary content type
    /// (default `multipart/form-data`).
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.custom_content_type = Some(content_type.into());
        self
    }

    /// Registers an advisory upload progress listener, invoked by the
    /// transport with `(bytes_transferred, total_bytes)`.
    #[must_use]
    pub fn upload_progress<F>(mut self, listener: F) -> Self
    where
        F: Fn(u64, u64) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(listener));
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
        Request::from_multipart(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::RequestKind;

    #[test]
    fn build_produces_a_multipart_descriptor() {
        let request = MultipartRequestBuilder::new("https://api.example.com/upload")
            .file("avatar", "/tmp/a.png")
            .build();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.kind, RequestKind::Multipart);
        assert_eq!(request.multipart_files.len(), 1);
    }
}
