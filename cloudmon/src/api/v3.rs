//! `monitoring.googleapis.com/v3` request bodies.
use super::ApiCall;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Monitored resource points are attached to. `global` only needs the project.
const GLOBAL_RESOURCE: &str = "global";

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
enum MetricKind {
    Gauge,
}

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
enum ValueType {
    Int64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MetricDescriptor<'a> {
    #[serde(rename = "type")]
    metric_type: &'a str,
    metric_kind: MetricKind,
    value_type: ValueType,
}

#[derive(Serialize, Debug)]
struct TypedResource<'a> {
    #[serde(rename = "type")]
    resource_type: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<&'static str, &'a str>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TimeInterval {
    #[serde(serialize_with = "super::serialize_timestamp")]
    start_time: DateTime<Utc>,
    #[serde(serialize_with = "super::serialize_timestamp")]
    end_time: DateTime<Utc>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TypedValue {
    #[serde(serialize_with = "super::serialize_int64")]
    int64_value: i64,
}

#[derive(Serialize, Debug)]
struct Point {
    interval: TimeInterval,
    value: TypedValue,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TimeSeries<'a> {
    metric: TypedResource<'a>,
    resource: TypedResource<'a>,
    metric_kind: MetricKind,
    value_type: ValueType,
    points: [Point; 1],
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CreateTimeSeriesRequest<'a> {
    time_series: [TimeSeries<'a>; 1],
}

pub(super) fn create_descriptor(
    project_id: &str,
    metric_type: &str,
) -> Result<ApiCall, serde_json::Error> {
    let descriptor = MetricDescriptor {
        metric_type,
        metric_kind: MetricKind::Gauge,
        value_type: ValueType::Int64,
    };

    Ok(ApiCall {
        operation: "CreateMetricDescriptor",
        path: super::project_path(project_id, "metricDescriptors"),
        body: serde_json::to_vec(&descriptor)?,
    })
}

pub(super) fn write_point(
    project_id: &str,
    metric_type: &str,
    value: i64,
    at: DateTime<Utc>,
) -> Result<ApiCall, serde_json::Error> {
    let request = CreateTimeSeriesRequest {
        time_series: [TimeSeries {
            metric: TypedResource {
                resource_type: metric_type,
                labels: BTreeMap::new(),
            },
            resource: TypedResource {
                resource_type: GLOBAL_RESOURCE,
                labels: BTreeMap::from([("project_id", project_id)]),
            },
            metric_kind: MetricKind::Gauge,
            value_type: ValueType::Int64,
            points: [Point {
                interval: TimeInterval {
                    start_time: at,
                    end_time: at,
                },
                value: TypedValue { int64_value: value },
            }],
        }],
    };

    Ok(ApiCall {
        operation: "CreateTimeSeries",
        path: super::project_path(project_id, "timeSeries"),
        body: serde_json::to_vec(&request)?,
    })
}
