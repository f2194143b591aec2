//! Fluent request builders.
//!
//! Builders assemble the validated inputs the
//! [`Request`](crate::http::request::Request) constructors consume. The
//! descriptor they produce is inert until a terminal `as_*` call registers
//! a callback and submits it.

mod body;
mod get;
mod multipart;

pub use body::BodyRequestBuilder;
pub use get::GetRequestBuilder;
pub use multipart::MultipartRequestBuilder;
