use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::time::sleep;

use super::auth::{AuthError, BoulevardAuth};
use super::pagination::{collect_all, parse_page, Page, PageLimits};
use super::queries;
use super::types::{GraphqlResponse, Location, Order, OrdersRequest, ProductRecord, ServiceRecord};
use crate::config::BlvdConfig;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Configuration(#[from] AuthError),

    #[error("rate limited by upstream: {message}")]
    RateLimited { message: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Retry schedule for transient upstream failures.
///
/// Rate-limit responses and network errors share the same exponential delay
/// state; other errors are never retried.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Double the current delay, capped at `max`.
pub(crate) fn next_delay(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}

/// Extract a server-suggested wait duration from a rate-limit message,
/// e.g. `"Please wait 1500ms before retrying"`. Floored at 100ms.
pub(crate) fn parse_wait_hint(message: &str) -> Option<Duration> {
    let lower = message.to_ascii_lowercase();
    let bytes = lower.as_bytes();

    for (idx, _) in lower.match_indices("ms") {
        let mut end = idx;
        while end > 0 && bytes[end - 1] == b' ' {
            end -= 1;
        }
        let mut start = end;
        while start > 0 && bytes[start - 1].is_ascii_digit() {
            start -= 1;
        }
        if start == end {
            continue;
        }
        if let Ok(millis) = lower[start..end].parse::<u64>() {
            return Some(Duration::from_millis(millis.max(100)));
        }
    }
    None
}

#[derive(Debug, Clone)]
pub struct BoulevardClient {
    http: Client,
    auth: BoulevardAuth,
    base_url: String,
    request_timeout: Duration,
    retry: RetryConfig,
}

impl BoulevardClient {
    pub fn new(http: Client, auth: BoulevardAuth, base_url: impl Into<String>) -> Self {
        Self {
            http,
            auth,
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }

    pub fn from_config(config: &BlvdConfig) -> Self {
        let auth = BoulevardAuth::new(
            config.api_key.clone(),
            config.api_secret.clone(),
            config.business_id.clone(),
        );
        Self {
            http: Client::new(),
            auth,
            base_url: config.api_url.clone(),
            request_timeout: config.request_timeout,
            retry: RetryConfig {
                max_attempts: config.retry_max_attempts,
                initial_delay: config.retry_initial_delay,
                ..RetryConfig::default()
            },
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Issue a single authenticated GraphQL request.
    ///
    /// A 2xx response whose body carries a GraphQL `errors` array is returned
    /// as-is (protocol-level errors are the caller's to interpret); transport
    /// failures are classified for the retry layer.
    pub async fn execute(
        &self,
        query: &str,
        variables: Option<&Value>,
    ) -> Result<GraphqlResponse, ClientError> {
        let credential = self.auth.basic_credential()?;

        let mut body = json!({ "query": query });
        if let Some(vars) = variables {
            body["variables"] = vars.clone();
        }

        let resp = self
            .http
            .post(&self.base_url)
            .timeout(self.request_timeout)
            .header(header::AUTHORIZATION, format!("Basic {credential}"))
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::RateLimited { message });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GraphqlResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Protocol(format!("invalid response body: {e}")))?;

        if let Some(errors) = &parsed.errors {
            tracing::warn!(
                count = errors.len(),
                first = errors.first().map(|e| e.message.as_str()).unwrap_or(""),
                "GraphQL errors in response body"
            );
        }

        Ok(parsed)
    }

    /// `execute` wrapped in the retry schedule.
    ///
    /// Rate-limit responses sleep the server's wait hint when one is present,
    /// the current backoff delay otherwise; network errors always use the
    /// backoff delay. The delay doubles after every retried attempt, capped
    /// at `max_delay`. Everything else propagates immediately.
    pub async fn execute_with_retry(
        &self,
        query: &str,
        variables: Option<&Value>,
    ) -> Result<GraphqlResponse, ClientError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut delay = self.retry.initial_delay;
        let mut last_err: Option<ClientError> = None;

        for attempt in 1..=max_attempts {
            match self.execute(query, variables).await {
                Ok(resp) => return Ok(resp),
                Err(ClientError::RateLimited { message }) => {
                    if attempt < max_attempts {
                        let wait = parse_wait_hint(&message).unwrap_or(delay);
                        tracing::warn!(
                            attempt,
                            wait_ms = wait.as_millis() as u64,
                            "Rate limited — backing off"
                        );
                        sleep(wait).await;
                        delay = next_delay(delay, self.retry.max_delay);
                    }
                    last_err = Some(ClientError::RateLimited { message });
                }
                Err(ClientError::Network(e)) => {
                    if attempt < max_attempts {
                        tracing::warn!(
                            attempt,
                            error = %e,
                            delay_ms = delay.as_millis() as u64,
                            "Network error — retrying"
                        );
                        sleep(delay).await;
                        delay = next_delay(delay, self.retry.max_delay);
                    }
                    last_err = Some(ClientError::Network(e));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err
            .unwrap_or_else(|| ClientError::Protocol("retry budget exhausted".into())))
    }

    /// Fetch one page of a connection and decode its nodes.
    async fn fetch_page<T: DeserializeOwned>(
        &self,
        query: &str,
        field: &str,
        variables: Value,
    ) -> Result<Page<T>, ClientError> {
        let resp = self.execute_with_retry(query, Some(&variables)).await?;

        if let Some(errors) = resp.errors.as_ref().filter(|e| !e.is_empty()) {
            let joined = errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ClientError::Protocol(format!("GraphQL errors: {joined}")));
        }

        let data = resp
            .data
            .ok_or_else(|| ClientError::Protocol("response missing data".into()))?;

        parse_page(&data, field)
    }

    /// Fetch every order in the request's scope, walking the cursor until
    /// exhaustion or a safety ceiling.
    pub async fn fetch_orders(
        &self,
        request: &OrdersRequest,
        page_size: u32,
        limits: &PageLimits,
    ) -> Result<Vec<Order>, ClientError> {
        collect_all(
            |cursor| {
                self.fetch_page(
                    queries::ORDERS_QUERY,
                    queries::ORDERS_FIELD,
                    request.variables(page_size, cursor.as_deref()),
                )
            },
            limits,
        )
        .await
    }

    pub async fn fetch_locations(
        &self,
        page_size: u32,
        limits: &PageLimits,
    ) -> Result<Vec<Location>, ClientError> {
        collect_all(
            |cursor| {
                self.fetch_page(
                    queries::LOCATIONS_QUERY,
                    queries::LOCATIONS_FIELD,
                    json!({ "first": page_size, "after": cursor }),
                )
            },
            limits,
        )
        .await
    }

    pub async fn fetch_services(
        &self,
        page_size: u32,
        limits: &PageLimits,
    ) -> Result<Vec<ServiceRecord>, ClientError> {
        collect_all(
            |cursor| {
                self.fetch_page(
                    queries::SERVICES_QUERY,
                    queries::SERVICES_FIELD,
                    json!({ "first": page_size, "after": cursor }),
                )
            },
            limits,
        )
        .await
    }

    pub async fn fetch_products(
        &self,
        page_size: u32,
        limits: &PageLimits,
    ) -> Result<Vec<ProductRecord>, ClientError> {
        collect_all(
            |cursor| {
                self.fetch_page(
                    queries::PRODUCTS_QUERY,
                    queries::PRODUCTS_FIELD,
                    json!({ "first": page_size, "after": cursor }),
                )
            },
            limits,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_hint_parses_plain_millis() {
        assert_eq!(
            parse_wait_hint("Please wait 1500ms before retrying"),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn wait_hint_allows_space_before_unit() {
        assert_eq!(
            parse_wait_hint("retry after 250 ms"),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn wait_hint_is_floored_at_100ms() {
        assert_eq!(
            parse_wait_hint("wait 20ms"),
            Some(Duration::from_millis(100))
        );
    }

    #[test]
    fn wait_hint_ignores_ms_inside_words() {
        // "params" contains "ms" with no digits in front of it
        assert_eq!(
            parse_wait_hint("bad params, wait 900ms"),
            Some(Duration::from_millis(900))
        );
        assert_eq!(parse_wait_hint("bad params"), None);
    }

    #[test]
    fn wait_hint_absent_when_no_number() {
        assert_eq!(parse_wait_hint("Too many requests"), None);
    }

    #[test]
    fn delay_doubles_until_the_cap() {
        let max = Duration::from_secs(30);
        let mut delay = Duration::from_secs(1);
        let mut observed = Vec::new();
        for _ in 0..7 {
            observed.push(delay.as_secs());
            delay = next_delay(delay, max);
        }
        assert_eq!(observed, vec![1, 2, 4, 8, 16, 30, 30]);
    }
}
