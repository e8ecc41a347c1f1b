//! Wire shapes of the Cloud Monitoring API generations.
//!
//! Each generation registers descriptors and ingests points with its own
//! paths, JSON bodies and custom metric prefix. [`ApiVersion`] selects one and
//! turns a gauge name and value into an [`ApiCall`]: a path relative to the
//! version's endpoint plus an encoded body.
use chrono::{DateTime, SecondsFormat, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt::{Display, Formatter};

pub(crate) mod v2beta2;
pub(crate) mod v3;

/// Monitoring API generation a [`Client`](crate::Client) speaks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ApiVersion {
    /// Legacy Cloud Monitoring API (`cloudmonitoring/v2beta2`).
    V2Beta2,
    /// Current Cloud Monitoring API (`monitoring.googleapis.com/v3`).
    #[default]
    V3,
}

impl ApiVersion {
    /// Namespace separating user defined metrics from built-in ones.
    pub fn metric_prefix(self) -> &'static str {
        match self {
            ApiVersion::V2Beta2 => "custom.cloudmonitoring.googleapis.com/",
            ApiVersion::V3 => "custom.googleapis.com/",
        }
    }

    /// Fully qualified metric type for `name`.
    ///
    /// The name is appended to [`metric_prefix`](Self::metric_prefix) as is.
    /// It is neither escaped nor truncated; the backend decides whether it is
    /// acceptable.
    pub fn metric_type(self, name: &str) -> String {
        format!("{}{name}", self.metric_prefix())
    }

    pub(crate) fn default_endpoint(self) -> &'static str {
        match self {
            ApiVersion::V2Beta2 => "https://www.googleapis.com/cloudmonitoring/v2beta2",
            ApiVersion::V3 => "https://monitoring.googleapis.com/v3",
        }
    }

    pub(crate) fn create_descriptor(
        self,
        project_id: &str,
        metric_type: &str,
    ) -> Result<ApiCall, serde_json::Error> {
        match self {
            ApiVersion::V2Beta2 => v2beta2::create_descriptor(project_id, metric_type),
            ApiVersion::V3 => v3::create_descriptor(project_id, metric_type),
        }
    }

    pub(crate) fn write_point(
        self,
        project_id: &str,
        metric_type: &str,
        value: i64,
        at: DateTime<Utc>,
    ) -> Result<ApiCall, serde_json::Error> {
        match self {
            ApiVersion::V2Beta2 => v2beta2::write_point(project_id, metric_type, value, at),
            ApiVersion::V3 => v3::write_point(project_id, metric_type, value, at),
        }
    }
}

impl Display for ApiVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiVersion::V2Beta2 => write!(f, "v2beta2"),
            ApiVersion::V3 => write!(f, "v3"),
        }
    }
}

/// A single monitoring API request, ready to be addressed and sent.
#[derive(Debug)]
pub(crate) struct ApiCall {
    /// Operation name used in internal logs.
    pub(crate) operation: &'static str,
    /// Path relative to the API endpoint, without a leading slash.
    pub(crate) path: String,
    pub(crate) body: Vec<u8>,
}

/// Characters escaped in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// `projects/{project_id}/{collection}` with the project id escaped as one
/// path segment. An empty id is kept empty.
fn project_path(project_id: &str, collection: &str) -> String {
    format!(
        "projects/{}/{collection}",
        utf8_percent_encode(project_id, PATH_SEGMENT)
    )
}

// int64 travels as a JSON string (proto3 JSON mapping), so the full range
// survives parsers that read numbers as doubles.
fn serialize_int64<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

fn serialize_timestamp<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Nanos, true))
}
