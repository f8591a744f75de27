use futures::StreamExt;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Largest response body accepted from the backend.
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors returned by backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body could not be decoded as the expected JSON shape
    #[error("Decode error: {0}")]
    Decode(String),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Base URL or endpoint path could not be joined into a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Limit redirects to 3 hops and refuse loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// JSON-over-HTTP client bound to one backend base URL.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `http://localhost:4000`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .user_agent(concat!("homefeed/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(http, base_url)
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path such as `homefeed/getfeeds` against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.send(self.http.post(self.endpoint(path)?), body).await?;
        decode(&bytes)
    }

    /// PUT a JSON body, ignoring any response payload.
    pub async fn put_json<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.http.put(self.endpoint(path)?), body).await?;
        Ok(())
    }

    /// POST a JSON body, ignoring any response payload.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.http.post(self.endpoint(path)?), body).await?;
        Ok(())
    }

    /// DELETE a resource.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.http.delete(self.endpoint(path)?).send().await?;
        check_status(&response)?;
        Ok(())
    }

    /// POST a JSON body and hand back the raw status and body text without
    /// treating non-2xx as an error.
    pub async fn post_raw<B>(&self, path: &str, body: &B) -> Result<(u16, String), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = self
            .http
            .post(self.endpoint(path)?)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;
        let status = response.status().as_u16();
        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        Ok((status, String::from_utf8_lossy(&bytes).into_owned()))
    }

    async fn send<B>(&self, request: reqwest::RequestBuilder, body: &B) -> Result<Vec<u8>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        // reqwest's `json` feature is off; serialize by hand
        let payload = serde_json::to_vec(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = request
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;
        check_status(&response)?;
        read_limited_bytes(response, MAX_RESPONSE_SIZE).await
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if !status.is_success() {
        tracing::debug!(url = %response.url(), status = %status, "Backend returned error status");
        return Err(ApiError::HttpStatus(status.as_u16()));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ApiError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
