//! The request descriptor: one HTTP call plus its runtime delivery state.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};

use bytes::Bytes;
use http::Method;

use crate::builder::{BodyRequestBuilder, GetRequestBuilder, MultipartRequestBuilder};
use crate::dispatch::{self, RequestQueue};
use crate::error::{self, Error};
use crate::executor::Executor;
use crate::transport::{ProgressListener, Transport};

/// Scheduling priority. Higher priorities are pulled first; submissions of
/// equal priority execute in submission order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Immediate,
}

/// How the response body is interpreted before delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Parse the body as a JSON object.
    Object,
    /// Parse the body as a JSON array.
    Array,
    /// Deliver the body as UTF-8 text.
    Text,
    /// The caller owns the untouched transport response; nothing is routed
    /// through the standard callback.
    Raw,
    /// Fetch for warming only; nothing is delivered.
    Prefetch,
    /// Parsing happens elsewhere; nothing is delivered.
    Parsed,
}

/// Whether the body comes from the simple content fields or a multipart
/// file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Simple,
    Multipart,
}

/// Typed delivery result. Exactly one variant matches the requested
/// [`ResponseKind`]; the terminal `as_*` entry points unwrap it for their
/// handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Object(serde_json::Value),
    Array(serde_json::Value),
    Text(String),
}

pub(crate) type Callback = Box<dyn FnOnce(Result<Payload, Error>) + Send>;

/// Complete specification of one HTTP call plus its runtime delivery
/// state.
///
/// A descriptor is inert until one of the terminal `as_object` /
/// `as_array` / `as_text` calls registers a callback, which also submits
/// it to the dispatcher. The terminal call consumes the descriptor, so a
/// request can be submitted at most once and carries exactly one callback.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) url: String,
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
    pub(crate) multipart_files: BTreeMap<String, PathBuf>,

    pub(crate) kind: RequestKind,
    pub(crate) response_kind: ResponseKind,
    pub(crate) priority: Priority,
    pub(crate) cache_directive: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) executor: Option<Arc<dyn Executor>>,
    pub(crate) transport: Option<Arc<dyn Transport>>,
    pub(crate) progress: Option<ProgressListener>,

    pub(crate) sequence: AtomicU64,
    pub(crate) cancelled: AtomicBool,
    pub(crate) delivered: AtomicBool,
    pub(crate) callback: Mutex<Option<Callback>>,
    pub(crate) queue: OnceLock<Weak<RequestQueue>>,
}

impl Request {
    fn base(method: Method, url: String, kind: RequestKind) -> Request {
        Request {
            method,
            url,
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
            multipart_files: BTreeMap::new(),
            kind,
            response_kind: ResponseKind::Object,
            priority: Priority::default(),
            cache_directive: None,
            user_agent: None,
            executor: None,
            transport: None,
            progress: None,
            sequence: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
            delivered: AtomicBool::new(false),
            callback: Mutex::new(None),
            queue: OnceLock::new(),
        }
    }

    /// Builds a descriptor from the bodyless builder. Copies fields only;
    /// never performs I/O and never fails.
    pub(crate) fn from_get(builder: GetRequestBuilder) -> Request {
        let mut request = Request::base(builder.method, builder.url, RequestKind::Simple);
        request.priority = builder.priority;
        request.headers = builder.headers;
        request.query_params = builder.query_params;
        request.path_params = builder.path_params;
        request.cache_directive = builder.cache_directive;
        request.user_agent = builder.user_agent;
        request.executor = builder.executor;
        request.transport = builder.transport;
        request
    }

    /// Builds a descriptor from the body-carrying builder.
    pub(crate) fn from_body(builder: BodyRequestBuilder) -> Request {
        let mut request = Request::base(builder.method, builder.url, RequestKind::Simple);
        request.priority = builder.priority;
        request.headers = builder.headers;
        request.query_params = builder.query_params;
        request.path_params = builder.path_params;
        request.json = builder.json;
        request.text = builder.text;
        request.file = builder.file;
        request.bytes = builder.bytes;
        request.form_params = builder.form_params;
        request.encoded_form_params = builder.encoded_form_params;
        request.custom_content_type = builder.custom_content_type;
        request.cache_directive = builder.cache_directive;
        request.user_agent = builder.user_agent;
        request.executor = builder.executor;
        request.transport = builder.transport;
        request
    }

    /// Builds a descriptor from the multipart builder.
    pub(crate) fn from_multipart(builder: MultipartRequestBuilder) -> Request {
        let mut request = Request::base(builder.method, builder.url, RequestKind::Multipart);
        request.priority = builder.priority;
        request.headers = builder.headers;
        request.query_params = builder.query_params;
        request.path_params = builder.path_params;
        request.multipart_files = builder.multipart_files;
        request.custom_content_type = builder.custom_content_type;
        request.cache_directive = builder.cache_directive;
        request.user_agent = builder.user_agent;
        request.executor = builder.executor;
        request.transport = builder.transport;
        request.progress = builder.progress;
        request
    }

    /// Delivers the response as a JSON object.
    ///
    /// Registers the callback and submits the request; the handler is
    /// invoked exactly once with either the parsed object or an error.
    pub fn as_object<F>(mut self, handler: F) -> RequestHandle
    where
        F: FnOnce(Result<serde_json::Value, Error>) + Send + 'static,
    {
        self.response_kind = ResponseKind::Object;
        self.register(Box::new(move |result| match result {
            Ok(Payload::Object(value)) => handler(Ok(value)),
            Ok(_) => handler(Err(error::parse_detail(
                "payload did not match the requested kind",
            ))),
            Err(e) => handler(Err(e)),
        }));
        submit(self)
    }

    /// Delivers the response as a JSON array.
    pub fn as_array<F>(mut self, handler: F) -> RequestHandle
    where
        F: FnOnce(Result<serde_json::Value, Error>) + Send + 'static,
    {
        self.response_kind = ResponseKind::Array;
        self.register(Box::new(move |result| match result {
            Ok(Payload::Array(value)) => handler(Ok(value)),
            Ok(_) => handler(Err(error::parse_detail(
                "payload did not match the requested kind",
            ))),
            Err(e) => handler(Err(e)),
        }));
        submit(self)
    }

    /// Delivers the response body as UTF-8 text.
    pub fn as_text<F>(mut self, handler: F) -> RequestHandle
    where
        F: FnOnce(Result<String, Error>) + Send + 'static,
    {
        self.response_kind = ResponseKind::Text;
        self.register(Box::new(move |result| match result {
            Ok(Payload::Text(value)) => handler(Ok(value)),
            Ok(_) => handler(Err(error::parse_detail(
                "payload did not match the requested kind",
            ))),
            Err(e) => handler(Err(e)),
        }));
        submit(self)
    }

    pub(crate) fn register(&mut self, callback: Callback) {
        let slot = match self.callback.get_mut() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(callback);
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The URL template as supplied, before path substitution.
    #[must_use]
    pub fn url_template(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[must_use]
    pub fn response_kind(&self) -> ResponseKind {
        self.response_kind
    }

    /// Submission order assigned by the dispatcher; `0` until submitted.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn cache_directive(&self) -> Option<&str> {
        self.cache_directive.as_deref()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.delivered.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("kind", &self.kind)
            .field("response_kind", &self.response_kind)
            .field("priority", &self.priority)
            .field("sequence", &self.sequence())
            .field("cancelled", &self.is_cancelled())
            .field("delivered", &self.is_delivered())
            .finish()
    }
}

fn submit(request: Request) -> RequestHandle {
    match dispatch::global() {
        Some(queue) => RequestHandle {
            request: queue.submit(request),
        },
        None => {
            tracing::error!("request submitted before the dispatcher was initialized");
            let request = Arc::new(request);
            request.deliver_error(error::not_initialized());
            RequestHandle { request }
        }
    }
}

/// Caller-held handle to a submitted request.
///
/// The dispatcher owns execution; the handle observes state and requests
/// cancellation. Dropping it has no effect on the request.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    request: Arc<Request>,
}

impl RequestHandle {
    /// Requests cooperative cancellation; see [`Request::cancel`].
    pub fn cancel(&self) {
        self.request.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.request.is_cancelled()
    }

    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.request.is_delivered()
    }

    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.request.sequence()
    }
}
