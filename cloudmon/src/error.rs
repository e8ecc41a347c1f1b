use cloudmon_http::HttpError;
use http::StatusCode;
use thiserror::Error;

/// Errors returned by [`Client`](crate::Client) and [`Gauge`](crate::Gauge) operations.
///
/// Nothing is retried. Every failure from the token exchange or the monitoring
/// API is handed back as-is, with the original cause reachable through
/// [`std::error::Error::source`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The endpoint or token URL cannot form a request URI, detected once an
    /// operation is under way and never by the builder. Also returned by
    /// [`ServiceAccountKey::from_json`](crate::ServiceAccountKey::from_json)
    /// for an unreadable key file.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No Http client specified.
    #[error("no http client specified")]
    NoHttpClient,

    /// Exchanging the service account credentials for a token failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The monitoring API call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Failures of the signed-JWT grant.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AuthError {
    /// Email or private key is empty.
    #[error("service account email and private key must both be set")]
    MissingCredentials,

    /// The private key is not a PEM encoded RSA key.
    #[error("invalid service account private key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    /// Signing the JWT assertion failed.
    #[error("failed to sign the token assertion: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The token endpoint could not be reached.
    #[error("token request failed: {0}")]
    Transport(#[source] HttpError),

    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned {status}: {body}")]
    Rejected {
        /// Status code of the token response.
        status: StatusCode,
        /// Response body, lossily decoded as UTF-8.
        body: String,
    },

    /// The token response could not be understood.
    #[error("invalid token response: {0}")]
    InvalidResponse(String),
}

/// Failures of a metric descriptor or time series call.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BackendError {
    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The HTTP request could not be built.
    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    /// The monitoring API could not be reached.
    #[error("request failed: {0}")]
    Transport(#[source] HttpError),

    /// The monitoring API answered with a non-success status.
    #[error("monitoring API returned {status}: {body}")]
    Status {
        /// Status code of the API response.
        status: StatusCode,
        /// Response body, lossily decoded as UTF-8.
        body: String,
    },
}

impl BackendError {
    /// Status code returned by the monitoring API, if the call got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
