//! Error taxonomy for request delivery.
//!
//! Every failure a callback can observe is an [`Error`] with a [`Kind`]:
//! URL resolution, response interpretation, transport and cancellation.
//! Transport- and parser-specific exceptions never leak past this module.

mod constructors;
mod conversions;
mod types;

pub use constructors::{cancelled, malformed_url, not_initialized, parse, parse_detail, transport};
pub use types::{Error, Kind, Result, REQUEST_CANCELLED};

pub(crate) use types::BoxError;
