//! In-memory transport for unit tests.
use async_trait::async_trait;
use cloudmon_http::{Bytes, HttpClient, HttpError, Request, Response};
use http::{HeaderMap, Method, StatusCode};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub(crate) const TEST_PRIVATE_KEY: &str = include_str!("../tests/data/service_account_key.pem");
pub(crate) const TEST_PUBLIC_KEY: &str = include_str!("../tests/data/service_account_key.pub.pem");

const TOKEN_BODY: &str = r#"{"access_token":"test-token","expires_in":3599,"token_type":"Bearer"}"#;

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: Method,
    pub(crate) uri: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl RecordedRequest {
    pub(crate) fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }

    pub(crate) fn form(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(&self.body)
            .into_owned()
            .collect()
    }

    pub(crate) fn is_token_request(&self) -> bool {
        self.uri.ends_with("/token")
    }
}

/// What the fake answers with.
#[derive(Debug, Clone, Copy)]
enum Reply {
    Status(StatusCode, &'static str),
    /// The request never completes; `send_bytes` returns this message as the error.
    Unreachable(&'static str),
}

#[derive(Debug)]
struct Inner {
    requests: Mutex<Vec<RecordedRequest>>,
    token_reply: Reply,
    api_reply: Reply,
}

/// Answers token requests (any uri ending in `/token`) with a fixed bearer
/// token and every other request with `{}`, recording everything it sees.
#[derive(Debug, Clone)]
pub(crate) struct RecordingHttpClient {
    inner: Arc<Inner>,
}

impl RecordingHttpClient {
    pub(crate) fn new() -> Self {
        Self::with_replies(
            Reply::Status(StatusCode::OK, TOKEN_BODY),
            Reply::Status(StatusCode::OK, "{}"),
        )
    }

    fn with_replies(token_reply: Reply, api_reply: Reply) -> Self {
        RecordingHttpClient {
            inner: Arc::new(Inner {
                requests: Mutex::new(Vec::new()),
                token_reply,
                api_reply,
            }),
        }
    }

    pub(crate) fn with_token_response(self, status: StatusCode, body: &'static str) -> Self {
        Self::with_replies(Reply::Status(status, body), self.inner.api_reply)
    }

    pub(crate) fn with_api_response(self, status: StatusCode, body: &'static str) -> Self {
        Self::with_replies(self.inner.token_reply, Reply::Status(status, body))
    }

    pub(crate) fn with_token_transport_error(self, message: &'static str) -> Self {
        Self::with_replies(Reply::Unreachable(message), self.inner.api_reply)
    }

    pub(crate) fn with_api_transport_error(self, message: &'static str) -> Self {
        Self::with_replies(self.inner.token_reply, Reply::Unreachable(message))
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub(crate) fn api_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| !r.is_token_request())
            .collect()
    }
}

#[async_trait]
impl HttpClient for RecordingHttpClient {
    async fn send_bytes(&self, request: Request<Bytes>) -> Result<Response<Bytes>, HttpError> {
        let (parts, body) = request.into_parts();
        let recorded = RecordedRequest {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
        };
        let reply = if recorded.is_token_request() {
            self.inner.token_reply
        } else {
            self.inner.api_reply
        };
        self.inner.requests.lock().unwrap().push(recorded);

        match reply {
            Reply::Status(status, body) => Ok(Response::builder()
                .status(status)
                .body(Bytes::from_static(body.as_bytes()))?),
            Reply::Unreachable(message) => Err(message.into()),
        }
    }
}
