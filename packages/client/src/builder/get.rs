//! Builder for requests without a body.

use std::collections::BTreeMap;
use std::sync::Arc;

use http::Method;

use crate::executor::Executor;
use crate::http::request::{Priority, Request};
use crate::transport::Transport;

/// Builder for bodyless requests (GET, HEAD, OPTIONS).
pub struct GetRequestBuilder {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) priority: Priority,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) query_params: BTreeMap<String, String>,
    pub(crate) path_params: BTreeMap<String, String>,
    pub(crate) cache_directive: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) executor: Option<Arc<dyn Executor>>,
    pub(crate) transport: Option<Arc<dyn Transport>>,
}

impl GetRequestBuilder {
    /// Starts a GET request for `url`. The URL may contain `{name}`
    /// placeholders filled by [`path_param`](Self::path_param).
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_method(Method::GET, url)
    }

    /// Starts a HEAD request.
    pub fn head(url: impl Into<String>) -> Self {
        Self::with_method(Method::HEAD, url)
    }

    /// Starts an OPTIONS request.
    pub fn options(url: impl Into<String>) -> Self {
        Self::with_method(Method::OPTIONS, url)
    }

    fn with_method(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            priority: Priority::default(),
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            path_params: BTreeMap::new(),
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
        Request::from_get(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_copies_scheduling_fields() {
        let request = GetRequestBuilder::new("https://api.example.com/users/{id}")
            .priority(Priority::High)
            .path_param("id", "42")
            .query_param("active", "true")
            .header("accept", "application/json")
            .cache_directive("no-cache")
            .build();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.priority(), Priority::High);
        assert_eq!(request.url_template(), "https://api.example.com/users/{id}");
        assert_eq!(request.cache_directive(), Some("no-cache"));
        assert!(!request.is_cancelled());
        assert!(!request.is_delivered());
    }

    #[test]
    fn head_and_options_set_their_methods() {
        assert_eq!(
            GetRequestBuilder::head("https://api.example.com/").build().method(),
            &Method::HEAD
        );
        assert_eq!(
            GetRequestBuilder::options("https://api.example.com/").build().method(),
            &Method::OPTIONS
        );
    }
}
