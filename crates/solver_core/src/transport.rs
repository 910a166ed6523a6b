//! The seam between the dispatcher and whatever actually speaks HTTP.

use crate::envelope::ImageRef;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No response arrived at all.
    #[error("{0}")]
    Network(String),
    #[error("Failed to read response body: {0}")]
    Body(String),
    #[error("Failed to read graph image: {0}")]
    Image(String),
}

/// A single-threaded HTTP client. Futures are not required to be `Send` since the browser
/// drives them on its own event loop.
pub trait Transport {
    type Response;

    /// POSTs `body` as `application/json`. `Err` only when no response was received.
    fn post_json(
        &self,
        url: &str,
        body: String,
    ) -> impl Future<Output = Result<Self::Response, TransportError>>;

    fn status(&self, response: &Self::Response) -> u16;

    fn read_text(
        &self,
        response: Self::Response,
    ) -> impl Future<Output = Result<String, TransportError>>;

    fn read_image(
        &self,
        response: Self::Response,
    ) -> impl Future<Output = Result<ImageRef, TransportError>>;
}
