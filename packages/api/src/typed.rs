//! Typed JSON delivery sugar.

use serde::de::DeserializeOwned;

use fetchq_client::error::{self, Error};
use fetchq_client::{Request, RequestHandle};

/// Deserializing terminal entry point layered over
/// [`Request::as_object`].
pub trait FetchTyped {
    /// Delivers the response as a `T` deserialized from the JSON object
    /// payload. Deserialization failures surface as parse errors.
    fn as_json<T, F>(self, handler: F) -> RequestHandle
    where
        T: DeserializeOwned,
        F: FnOnce(Result<T, Error>) + Send + 'static;
}

impl FetchTyped for Request {
    fn as_json<T, F>(self, handler: F) -> RequestHandle
    where
        T: DeserializeOwned,
        F: FnOnce(Result<T, Error>) + Send + 'static,
    {
        self.as_object(move |result| {
            handler(result.and_then(|value| {
                serde_json::from_value::<T>(value).map_err(error::parse)
            }));
        })
    }
}
