//! A small client for Google Cloud Monitoring int64 gauges.
//!
//! `cloudmon` does two things: register a custom gauge metric descriptor, and
//! write a value to it. Each operation exchanges service account credentials
//! for a bearer token using the OAuth2 signed-JWT grant, then issues a single
//! REST call. There is no batching, buffering, retrying or token caching.
//!
//! ```no_run
//! # fn main() -> Result<(), cloudmon::Error> {
//! let key = std::fs::read_to_string("service-account.json").unwrap();
//! let client = cloudmon::Client::builder()
//!     .with_service_account_key(cloudmon::ServiceAccountKey::from_json(&key)?)
//!     .build();
//!
//! let requests = client.new_gauge("requests")?;
//! requests.set(42)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API generations
//!
//! [`ApiVersion::V3`] (the default) talks to `monitoring.googleapis.com/v3`
//! and prefixes metric names with `custom.googleapis.com/`.
//! [`ApiVersion::V2Beta2`] speaks the legacy `cloudmonitoring/v2beta2` API,
//! whose prefix is `custom.cloudmonitoring.googleapis.com/`.
//!
//! ## Transport
//!
//! Requests go through a [`HttpClient`]. With the default
//! `reqwest-blocking-client` feature a `reqwest::blocking::Client` is used
//! unless another client is assigned with
//! [`ClientBuilder::with_http_client`].
//!
//! ## Feature flags
//!
//! * `reqwest-blocking-client`: use `reqwest::blocking::Client` as the default transport (enabled by default).
//! * `reqwest-rustls`: TLS through rustls with native roots (enabled by default).
//! * `reqwest-rustls-webpki-roots`: TLS through rustls with webpki roots.
//! * `internal-logs`: emit debug events through `tracing` (enabled by default).
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod internal_logging;

mod api;
mod auth;
mod client;
mod error;

#[cfg(test)]
mod testing;

pub use crate::api::ApiVersion;
pub use crate::auth::{Credentials, ServiceAccountKey, DEFAULT_TOKEN_URL, MONITORING_SCOPE};
pub use crate::client::{Client, ClientBuilder, Gauge};
pub use crate::error::{AuthError, BackendError, Error};
pub use cloudmon_http::HttpClient;
