//! HTTP transport abstraction for `cloudmon`.
//!
//! The monitoring client never talks to a concrete HTTP library directly. It
//! builds [`Request`]s and hands them to an [`HttpClient`], which lets callers
//! bring their own transport (or a recording fake in tests).
use async_trait::async_trait;
use std::fmt::Debug;

#[doc(no_inline)]
pub use bytes::Bytes;
#[doc(no_inline)]
pub use http::{Request, Response};

pub type HttpError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A minimal interface necessary for sending requests over HTTP.
///
/// Used for both the OAuth2 token exchange and the monitoring API calls.
///
/// Implementations return the response as received, whatever its status code.
/// Callers inspect the status themselves so that the backend's error body is
/// not lost.
#[async_trait]
pub trait HttpClient: Debug + Send + Sync {
    /// Send the specified HTTP request with `Bytes` payload.
    ///
    /// Returns the HTTP response including the status code and body.
    ///
    /// Returns an error if it can't connect to the server or the request could not be completed,
    /// e.g. because of a timeout, infinite redirects, or a loss of connection.
    async fn send_bytes(&self, request: Request<Bytes>) -> Result<Response<Bytes>, HttpError>;
}

#[cfg(feature = "reqwest")]
mod reqwest {
    use super::{async_trait, Bytes, HttpClient, HttpError, Request, Response};

    #[cfg(not(target_arch = "wasm32"))]
    #[async_trait]
    impl HttpClient for reqwest::blocking::Client {
        async fn send_bytes(&self, request: Request<Bytes>) -> Result<Response<Bytes>, HttpError> {
            #[cfg(feature = "internal-logs")]
            tracing::debug!(
                name: "ReqwestBlockingClient.Send",
                target: env!("CARGO_PKG_NAME"),
                name = "ReqwestBlockingClient.Send",
                method = %request.method(),
                uri = %request.uri(),
            );
            let request = request.try_into()?;
            let mut response = self.execute(request)?;
            let headers = std::mem::take(response.headers_mut());
            let mut http_response = Response::builder()
                .status(response.status())
                .body(response.bytes()?)?;
            *http_response.headers_mut() = headers;

            Ok(http_response)
        }
    }
}
