//! Service account authentication via the OAuth2 signed-JWT grant.
//!
//! A fresh token is requested for every monitoring call. Nothing is cached, so
//! there is no expiry bookkeeping.
use crate::error::{AuthError, Error};
use crate::internal_logging::cloudmon_debug;
use chrono::{DateTime, Utc};
use cloudmon_http::{Bytes, HttpClient, HttpError, Request, Response};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Uri};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token endpoint used unless the builder or the service account key names another.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth2 scope granting read/write access to Cloud Monitoring.
pub const MONITORING_SCOPE: &str = "https://www.googleapis.com/auth/monitoring";

const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of the signed assertion. Google rejects anything above one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Service account identity used to mint bearer tokens.
#[derive(Clone, Default)]
pub struct Credentials {
    email: String,
    private_key: Vec<u8>,
}

impl Credentials {
    /// Create credentials from a service account email and a PEM encoded RSA private key.
    ///
    /// The key is not parsed here. An unusable key is reported by the first
    /// operation that needs a token.
    pub fn new(email: impl Into<String>, private_key: impl Into<Vec<u8>>) -> Self {
        Credentials {
            email: email.into(),
            private_key: private_key.into(),
        }
    }

    /// The service account email.
    pub fn email(&self) -> &str {
        &self.email
    }

    fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.private_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// The JSON key file Google issues for a service account.
///
/// Only the fields this crate uses are read; everything else in the file is
/// ignored.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account email, used as the assertion issuer.
    pub client_email: String,
    /// PEM encoded RSA private key.
    pub private_key: String,
    /// Project the service account belongs to.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Token endpoint the key was issued for.
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Parse the contents of a service account key file.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid service account key: {e}")))
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Serialize, Debug)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// An [`HttpClient`] paired with a freshly minted `Authorization` header.
#[derive(Debug)]
pub(crate) struct AuthorizedTransport<'a> {
    client: &'a dyn HttpClient,
    authorization: HeaderValue,
}

impl AuthorizedTransport<'_> {
    pub(crate) async fn send(
        &self,
        mut request: Request<Bytes>,
    ) -> Result<Response<Bytes>, HttpError> {
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.authorization.clone());
        self.client.send_bytes(request).await
    }
}

/// Exchange `credentials` for a bearer token at `token_url`.
///
/// The private key is parsed and the assertion signed before any request is
/// made, so a malformed key never reaches the network.
pub(crate) async fn authorize<'a>(
    client: &'a dyn HttpClient,
    credentials: &Credentials,
    token_url: &str,
) -> Result<AuthorizedTransport<'a>, Error> {
    if !credentials.is_complete() {
        return Err(AuthError::MissingCredentials.into());
    }
    let key = EncodingKey::from_rsa_pem(&credentials.private_key).map_err(AuthError::InvalidKey)?;
    let assertion = sign_assertion(&credentials.email, token_url, &key, Utc::now())?;
    let token_uri: Uri = token_url
        .parse()
        .map_err(|e| Error::Config(format!("invalid token url {token_url}: {e}")))?;

    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", JWT_BEARER_GRANT_TYPE)
        .append_pair("assertion", &assertion)
        .finish();
    let request = Request::post(token_uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Bytes::from(body))
        .map_err(|e| AuthError::Transport(e.into()))?;

    cloudmon_debug!(
        name: "Auth.TokenRequested",
        email = credentials.email.as_str(),
        token_url = token_url,
    );
    let response = client
        .send_bytes(request)
        .await
        .map_err(AuthError::Transport)?;

    if !response.status().is_success() {
        let status = response.status();
        cloudmon_debug!(name: "Auth.TokenRejected", status = status.as_u16());
        return Err(AuthError::Rejected {
            status,
            body: String::from_utf8_lossy(response.body()).into_owned(),
        }
        .into());
    }

    let token: TokenResponse = serde_json::from_slice(response.body())
        .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
    let mut authorization =
        HeaderValue::try_from(format!("{} {}", token.token_type, token.access_token))
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
    authorization.set_sensitive(true);
    cloudmon_debug!(name: "Auth.TokenReceived");

    Ok(AuthorizedTransport {
        client,
        authorization,
    })
}

fn sign_assertion(
    email: &str,
    audience: &str,
    key: &EncodingKey,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let iat = now.timestamp();
    let claims = Claims {
        iss: email,
        scope: MONITORING_SCOPE,
        aud: audience,
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, key).map_err(AuthError::Signing)
}
