use crate::api::{ApiCall, ApiVersion};
use crate::auth::{self, Credentials, ServiceAccountKey, DEFAULT_TOKEN_URL};
use crate::error::{BackendError, Error};
use crate::internal_logging::cloudmon_debug;
use chrono::{DateTime, Utc};
use cloudmon_http::{Bytes, HttpClient, Request};
use http::header::CONTENT_TYPE;
use http::Uri;
use std::sync::Arc;

/// Builder for [`Client`].
///
/// Options are applied in the order they are called; a later call overrides
/// an earlier one. Nothing is validated here. A client missing its
/// credentials fails when an operation tries to authenticate; one missing
/// its project id fails when the backend rejects the request.
///
/// ## Examples
///
/// ```no_run
/// # fn main() -> Result<(), cloudmon::Error> {
/// let client = cloudmon::Client::builder()
///     .with_credentials("svc@my-project.iam.gserviceaccount.com", std::fs::read("key.pem").unwrap())
///     .with_project_id("my-project")
///     .build();
///
/// let queue_depth = client.new_gauge("queue_depth")?;
/// queue_depth.set(17)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    credentials: Credentials,
    project_id: Option<String>,
    api_version: ApiVersion,
    endpoint: Option<String>,
    token_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl ClientBuilder {
    /// Set the service account email and its PEM encoded RSA private key.
    pub fn with_credentials(
        mut self,
        email: impl Into<String>,
        private_key: impl Into<Vec<u8>>,
    ) -> Self {
        self.credentials = Credentials::new(email, private_key);
        self
    }

    /// Set the project metrics are registered and written under.
    ///
    /// Left unset, requests go to `projects//...` and the backend reports the
    /// problem.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Take credentials from a service account key file.
    ///
    /// The project id and token endpoint are taken from the key as well when it
    /// carries them.
    pub fn with_service_account_key(mut self, key: ServiceAccountKey) -> Self {
        self.credentials = Credentials::new(key.client_email, key.private_key);
        if let Some(project_id) = key.project_id {
            self.project_id = Some(project_id);
        }
        if let Some(token_uri) = key.token_uri {
            self.token_url = Some(token_uri);
        }
        self
    }

    /// Select the monitoring API generation. Defaults to [`ApiVersion::V3`].
    pub fn with_api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    /// Override the API base url, e.g. `https://monitoring.googleapis.com/v3`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Override the OAuth2 token endpoint. Defaults to [`DEFAULT_TOKEN_URL`].
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    /// Assign client implementation
    pub fn with_http_client<T: HttpClient + 'static>(mut self, client: T) -> Self {
        self.http_client = Some(Arc::new(client));
        self
    }

    /// Build the client.
    ///
    /// With the `reqwest-blocking-client` feature, a default
    /// `reqwest::blocking::Client` is created when no http client was
    /// assigned. That client must not be created or dropped inside an async
    /// runtime.
    pub fn build(self) -> Client {
        #[cfg(feature = "reqwest-blocking-client")]
        let http_client = self
            .http_client
            .or_else(|| Some(Arc::new(reqwest::blocking::Client::new()) as Arc<dyn HttpClient>));
        #[cfg(not(feature = "reqwest-blocking-client"))]
        let http_client = self.http_client;

        Client {
            credentials: self.credentials,
            project_id: self.project_id,
            api_version: self.api_version,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| self.api_version.default_endpoint().to_string()),
            token_url: self.token_url.unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            http_client,
        }
    }
}

/// A Cloud Monitoring client for int64 gauges.
///
/// The client only holds configuration. Every operation authenticates from
/// scratch and issues exactly one API request, blocking until it completes.
/// It is `Send + Sync`; concurrent operations are independent of each other.
#[derive(Debug)]
pub struct Client {
    credentials: Credentials,
    project_id: Option<String>,
    api_version: ApiVersion,
    endpoint: String,
    token_url: String,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl Client {
    /// Start configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The configured project, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// The monitoring API generation this client speaks.
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Register an int64 gauge metric descriptor named `name` and return a
    /// handle for writing to it.
    ///
    /// Registering a name that already exists is left to the backend to
    /// resolve; no local error is raised for it.
    pub fn new_gauge(&self, name: impl Into<String>) -> Result<Gauge<'_>, Error> {
        let gauge = self.gauge(name);
        futures_executor::block_on(self.create_metric_descriptor(&gauge.name))?;
        Ok(gauge)
    }

    /// Bind a handle to a gauge without registering its descriptor.
    ///
    /// Whether writes to an unregistered metric succeed is up to the backend.
    pub fn gauge(&self, name: impl Into<String>) -> Gauge<'_> {
        Gauge {
            name: name.into(),
            client: self,
        }
    }

    async fn create_metric_descriptor(&self, name: &str) -> Result<(), Error> {
        let metric_type = self.api_version.metric_type(name);
        let call = self
            .api_version
            .create_descriptor(self.project_id_or_empty(), &metric_type)
            .map_err(BackendError::from)?;
        self.execute(call).await
    }

    async fn write_point(&self, name: &str, value: i64, at: DateTime<Utc>) -> Result<(), Error> {
        let metric_type = self.api_version.metric_type(name);
        let call = self
            .api_version
            .write_point(self.project_id_or_empty(), &metric_type, value, at)
            .map_err(BackendError::from)?;
        self.execute(call).await
    }

    fn project_id_or_empty(&self) -> &str {
        self.project_id.as_deref().unwrap_or_default()
    }

    fn resolve_uri(&self, path: &str) -> Result<Uri, Error> {
        let uri = format!("{}/{}", self.endpoint.trim_end_matches('/'), path);
        uri.parse()
            .map_err(|e| Error::Config(format!("invalid request uri {uri}: {e}")))
    }

    async fn execute(&self, call: ApiCall) -> Result<(), Error> {
        let http_client = self.http_client.as_deref().ok_or(Error::NoHttpClient)?;
        let transport = auth::authorize(http_client, &self.credentials, &self.token_url).await?;
        let uri = self.resolve_uri(&call.path)?;

        let request = Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Bytes::from(call.body))
            .map_err(BackendError::from)?;

        cloudmon_debug!(
            name: "Client.RequestStarted",
            operation = call.operation,
            path = call.path.as_str(),
        );
        let response = match transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                let error = format!("{e:?}");
                cloudmon_debug!(
                    name: "Client.RequestFailed",
                    operation = call.operation,
                    error = error.as_str(),
                );
                return Err(BackendError::Transport(e).into());
            }
        };

        if response.status().is_success() {
            cloudmon_debug!(name: "Client.RequestSucceeded", operation = call.operation);
            Ok(())
        } else {
            let status = response.status();
            cloudmon_debug!(
                name: "Client.RequestFailed",
                operation = call.operation,
                status = status.as_u16(),
            );
            Err(BackendError::Status {
                status,
                body: String::from_utf8_lossy(response.body()).into_owned(),
            }
            .into())
        }
    }
}

/// Handle to an int64 gauge metric, bound to its name.
///
/// Borrows the [`Client`] it came from and cannot outlive it.
#[derive(Debug, Clone)]
pub struct Gauge<'a> {
    name: String,
    client: &'a Client,
}

impl Gauge<'_> {
    /// The metric name, without prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fully qualified metric type the gauge writes to.
    pub fn metric_type(&self) -> String {
        self.client.api_version.metric_type(&self.name)
    }

    /// Write `value` as a single point stamped with the current time.
    ///
    /// The point's interval starts and ends at the same instant.
    pub fn set(&self, value: i64) -> Result<(), Error> {
        futures_executor::block_on(self.client.write_point(&self.name, value, Utc::now()))
    }
}
