use reqwest::header::ACCEPT;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::cache::ResponseCache;
use crate::config::{ApiCredentials, Config, GatewaySettings};
use crate::document::ContactResult;
use crate::error::{ApiError, Result};
use crate::query::Query;

/// `status` values that mark an application-level failure inside a 2xx body.
const ERROR_STATUSES: &[&str] = &["error", "failed"];

/// Client for the hosted contact-extraction API.
pub struct GatewayClient {
    http: reqwest::Client,
    credentials: Option<ApiCredentials>,
    settings: GatewaySettings,
    cache: Option<ResponseCache>,
}

impl GatewayClient {
    pub fn new(credentials: Option<ApiCredentials>, settings: GatewaySettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ApiError::configuration(format!("failed to build HTTP client: {e}")))?;

        let cache = settings.cache_enabled.then(ResponseCache::new);

        Ok(Self {
            http,
            credentials,
            settings,
            cache,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.credentials.clone(), config.gateway.clone())
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// Look up contacts for `query`.
    ///
    /// Fails with a configuration error before touching the network (or the
    /// cache) when no credentials are configured. Only successes are cached.
    pub async fn fetch_contacts(&self, query: &Query) -> Result<Arc<ContactResult>> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            ApiError::configuration(
                "RAPIDAPI_KEY not set. Add it to the environment or a .env file.",
            )
        })?;

        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(query.as_str())) {
            tracing::debug!(query = %query, "contact cache hit");
            return Ok(hit);
        }

        let start = Instant::now();
        let body = self.request(credentials, query).await?;
        let result = Arc::new(interpret_body(body)?);

        tracing::info!(
            query = %query,
            elapsed_ms = start.elapsed().as_millis() as u64,
            fields = result.fields().len(),
            "contact lookup succeeded"
        );

        if let Some(cache) = &self.cache {
            cache.insert(query.as_str(), result.clone());
        }
        Ok(result)
    }

    fn endpoint(&self, credentials: &ApiCredentials) -> String {
        format!(
            "{}://{}{}",
            self.settings.scheme, credentials.host, self.settings.path
        )
    }

    async fn request(&self, credentials: &ApiCredentials, query: &Query) -> Result<Value> {
        let url = self.endpoint(credentials);
        tracing::info!(%url, query = %query, "querying contact API");

        let response = self
            .http
            .get(&url)
            .header(self.settings.key_header.as_str(), credentials.api_key.as_str())
            .header(self.settings.host_header.as_str(), credentials.host.as_str())
            .header(ACCEPT, "application/json")
            .query(&[(self.settings.query_param.as_str(), query.as_str())])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(status = status.as_u16(), "failed to read error body: {e}");
                    String::new()
                }
            };
            tracing::warn!(status = status.as_u16(), "contact API returned an error status");
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice::<Value>(&bytes).map_err(|e| ApiError::decode(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                timeout: self.settings.timeout,
            }
        } else if err.is_builder() {
            ApiError::configuration(format!("invalid request settings: {err}"))
        } else {
            ApiError::Connection { source: err }
        }
    }
}

/// Turn a decoded 2xx body into a [`ContactResult`], surfacing error payloads
/// and unwrapping a single `data` envelope.
pub fn interpret_body(body: Value) -> Result<ContactResult> {
    let mut fields = match body {
        Value::Object(fields) => fields,
        other => {
            return Err(ApiError::decode(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )));
        }
    };

    if let Some(message) = remote_error_message(&fields) {
        return Err(ApiError::RemoteApi { message });
    }

    if matches!(fields.get("data"), Some(Value::Object(_))) {
        let raw = Value::Object(fields.clone());
        if let Some(Value::Object(inner)) = fields.remove("data") {
            return Ok(ContactResult::unwrapped(inner, fields, raw));
        }
    }

    Ok(ContactResult::new(fields))
}

fn remote_error_message(fields: &Map<String, Value>) -> Option<String> {
    let error = fields
        .get("error")
        .filter(|v| !matches!(v, Value::Null | Value::Bool(false)));

    let status_failed = fields
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| ERROR_STATUSES.iter().any(|e| s.eq_ignore_ascii_case(e)));

    if error.is_none() && !status_failed {
        return None;
    }

    let message = match error {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(obj)) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
    .or_else(|| {
        fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    })
    .unwrap_or_else(|| match error {
        Some(v) => v.to_string(),
        None => Value::Object(fields.clone()).to_string(),
    });

    Some(message)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
