use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::zephyr::error::ZephyrError;

// ============================================================================
// Request / response model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

/// How a request authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// Username and password, encoded by the transport
    Basic { username: String, password: String },

    /// Credentials already base64-encoded, sent as `Basic <token>`
    EncodedBasic(String),

    Bearer(String),
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Basic { username, .. } => write!(f, "Basic({})", username),
            Auth::EncodedBasic(_) => write!(f, "EncodedBasic(<redacted>)"),
            Auth::Bearer(_) => write!(f, "Bearer(<redacted>)"),
        }
    }
}

/// A single REST call against one of the remote services.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub base_url: String,

    /// Path plus query string, starting with `/`
    pub path: String,
    pub auth: Auth,
    pub headers: Vec<(String, String)>,

    /// Serialized JSON body
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, base_url: &str, path: impl Into<String>, auth: Auth) -> Self {
        Self {
            method,
            base_url: base_url.to_string(),
            path: path.into(),
            auth,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Attach a JSON body and the matching content type.
    pub fn json<B: Serialize + ?Sized>(
        mut self,
        body: &B,
        context: &str,
    ) -> Result<Self, ZephyrError> {
        let json = serde_json::to_string(body).map_err(|source| ZephyrError::JsonSerialize {
            context: context.to_string(),
            source,
        })?;
        self.body = Some(json);
        Ok(self.header("content-type", "application/json;charset=UTF-8"))
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Fail with `UnexpectedStatus` unless the service answered `expected`.
    pub fn expect_status(
        self,
        operation: &'static str,
        expected: u16,
    ) -> Result<Self, ZephyrError> {
        if self.status == expected {
            return Ok(self);
        }
        Err(ZephyrError::UnexpectedStatus {
            operation,
            expected,
            actual: self.status,
            body: self.body,
        })
    }

    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T, ZephyrError> {
        serde_json::from_str(&self.body).map_err(|source| ZephyrError::JsonParse {
            context: context.to_string(),
            source,
        })
    }
}

// ============================================================================
// Transport seam
// ============================================================================

/// Issues requests against the remote services.
///
/// Blocking and sequential; retries and TLS belong to the implementation.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ZephyrError>;
}

/// `reqwest` backed transport.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ZephyrError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ZephyrError::Transport {
            context: "building HTTP client".to_string(),
            source: Box::new(e),
        })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ZephyrError> {
        let url = request.url();
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self.client.request(method, &url);
        builder = match &request.auth {
            Auth::Basic { username, password } => builder.basic_auth(username, Some(password)),
            Auth::EncodedBasic(token) => {
                builder.header("Authorization", format!("Basic {}", token))
            }
            Auth::Bearer(token) => builder.bearer_auth(token),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(|e| ZephyrError::Transport {
            context: format!("{:?} {}", request.method, url),
            source: Box::new(e),
        })?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| ZephyrError::Transport {
            context: format!("reading body of {:?} {}", request.method, url),
            source: Box::new(e),
        })?;

        Ok(ApiResponse { status, body })
    }
}
