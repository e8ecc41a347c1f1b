//! Legacy `cloudmonitoring/v2beta2` request bodies.
use super::ApiCall;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum MetricType {
    Gauge,
}

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum ValueType {
    Int64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TypeDescriptor {
    metric_type: MetricType,
    value_type: ValueType,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MetricDescriptor<'a> {
    name: &'a str,
    project: &'a str,
    type_descriptor: TypeDescriptor,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Point {
    #[serde(serialize_with = "super::serialize_int64")]
    int64_value: i64,
    #[serde(serialize_with = "super::serialize_timestamp")]
    start: DateTime<Utc>,
    #[serde(serialize_with = "super::serialize_timestamp")]
    end: DateTime<Utc>,
}

#[derive(Serialize, Debug)]
struct TimeseriesDescriptor<'a> {
    metric: &'a str,
    project: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TimeseriesPoint<'a> {
    point: Point,
    timeseries_desc: TimeseriesDescriptor<'a>,
}

#[derive(Serialize, Debug)]
struct WriteTimeseriesRequest<'a> {
    timeseries: [TimeseriesPoint<'a>; 1],
}

pub(super) fn create_descriptor(
    project_id: &str,
    metric_type: &str,
) -> Result<ApiCall, serde_json::Error> {
    let descriptor = MetricDescriptor {
        name: metric_type,
        project: project_id,
        type_descriptor: TypeDescriptor {
            metric_type: MetricType::Gauge,
            value_type: ValueType::Int64,
        },
    };

    Ok(ApiCall {
        operation: "MetricDescriptors.Create",
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
    let request = WriteTimeseriesRequest {
        timeseries: [TimeseriesPoint {
            point: Point {
                int64_value: value,
                start: at,
                end: at,
            },
            timeseries_desc: TimeseriesDescriptor {
                metric: metric_type,
                project: project_id,
            },
        }],
    };

    Ok(ApiCall {
        operation: "Timeseries.Write",
        path: super::project_path(project_id, "timeseries:write"),
        body: serde_json::to_vec(&request)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn body(call: &ApiCall) -> Value {
        serde_json::from_slice(&call.body).unwrap()
    }

    #[test]
    fn descriptor_uses_legacy_type_descriptor() {
        let call =
            create_descriptor("proj1", "custom.cloudmonitoring.googleapis.com/requests").unwrap();

        assert_eq!(call.path, "projects/proj1/metricDescriptors");
        assert_eq!(
            body(&call),
            json!({
                "name": "custom.cloudmonitoring.googleapis.com/requests",
                "project": "proj1",
                "typeDescriptor": { "metricType": "gauge", "valueType": "int64" },
            })
        );
    }

    #[test]
    fn point_carries_equal_start_and_end() {
        let at = Utc.with_ymd_and_hms(2015, 6, 30, 23, 59, 59).unwrap();

        let call = write_point(
            "proj1",
            "custom.cloudmonitoring.googleapis.com/requests",
            i64::MIN,
            at,
        )
        .unwrap();

        assert_eq!(call.path, "projects/proj1/timeseries:write");
        assert_eq!(
            body(&call),
            json!({
                "timeseries": [{
                    "point": {
                        "int64Value": "-9223372036854775808",
                        "start": "2015-06-30T23:59:59.000000000Z",
                        "end": "2015-06-30T23:59:59.000000000Z",
                    },
                    "timeseriesDesc": {
                        "metric": "custom.cloudmonitoring.googleapis.com/requests",
                        "project": "proj1",
                    },
                }],
            })
        );
    }
}
