//! HTTP transport for the club REST API

use super::error::{server_message, ApiError, ApiResult};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log
const MAX_LOG_BODY_LENGTH: usize = 200;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Truncate a response body for logging and strip control characters
fn sanitize_for_log(body: &str) -> String {
    let total = body.chars().count();
    let truncated = if total > MAX_LOG_BODY_LENGTH {
        format!(
            "{}... [truncated, {} bytes total]",
            body.chars().take(MAX_LOG_BODY_LENGTH).collect::<String>(),
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Shared HTTP client bound to one API base URL
///
/// Cloning is cheap: `reqwest::Client` is reference counted.
#[derive(Clone, Debug)]
pub struct ApiHttpClient {
    client: Client,
    base_url: Url,
}

impl ApiHttpClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(format!("tclub/{}", crate::VERSION))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an endpoint path such as `/teams/5`
    pub fn url(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub async fn get(&self, path: &str, query: &[(String, String)]) -> ApiResult<Value> {
        let url = self.url(path)?;
        tracing::debug!("GET {} {:?}", url, query);
        self.execute(path, self.client.request(Method::GET, url).query(query))
            .await
    }

    pub async fn post(&self, path: &str, body: &Value) -> ApiResult<Value> {
        let url = self.url(path)?;
        tracing::debug!("POST {}", url);
        self.execute(path, self.client.post(url).json(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> ApiResult<Value> {
        let url = self.url(path)?;
        tracing::debug!("PATCH {}", url);
        self.execute(path, self.client.patch(url).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        let url = self.url(path)?;
        tracing::debug!("DELETE {}", url);
        self.execute(path, self.client.delete(url)).await
    }

    async fn execute(&self, path: &str, request: RequestBuilder) -> ApiResult<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::warn!("{} returned 404", path);
            return Err(ApiError::NotFound {
                path: path.to_string(),
            });
        }

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiError::Status {
                status,
                message: server_message(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Validate the base URL and make sure relative joins keep its path
fn parse_base_url(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
