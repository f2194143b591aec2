//! Canonical public types.

pub use crate::builder::{BodyRequestBuilder, GetRequestBuilder, MultipartRequestBuilder};
pub use crate::config::QueueConfig;
pub use crate::dispatch::RequestQueue;
pub use crate::error::{Error, Kind, REQUEST_CANCELLED};
pub use crate::executor::{Executor, ImmediateExecutor, ThreadPoolExecutor};
pub use crate::http::body::{BodyPayload, Part, WireBody};
pub use crate::http::request::{
    Payload, Priority, Request, RequestHandle, RequestKind, ResponseKind,
};
pub use crate::http::response::interpret;
pub use crate::telemetry::{QueueStats, QueueStatsSnapshot};
pub use crate::transport::{
    PreparedCall, ProgressListener, RawResponse, Transport, TransportFailure,
};
