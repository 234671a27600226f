//! General communication primitives: the request-builder seam and the
//! response types handlers operate on.

use std::collections::HashMap;

pub use http::{Method, Response, StatusCode};

/// Type alias for HTTP headers hash map
pub type Headers = HashMap<String, String>;

/// General trait for building http-requests.
///
/// The client is generic over this trait so that tests (or alternative
/// transports) can substitute their own builder; see
/// [`crate::client::Client::prepare_call_request`].
pub trait RequestBuilder {
    /// Constructs a new builder with provided method and URL
    #[must_use]
    fn new<U>(method: Method, url: U) -> Self
    where
        U: AsRef<str>;

    /// Sets request's headers
    #[must_use]
    fn headers(self, headers: Headers) -> Self;

    /// Sets request's body in bytes
    #[must_use]
    fn body(self, data: Vec<u8>) -> Self;
}
