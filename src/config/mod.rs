use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://sandbox.joinblvd.com/api/2020-01/admin";

#[derive(Debug, Clone)]
pub struct BlvdConfig {
    pub api_key: String,
    pub api_secret: String,
    pub business_id: String,
    pub api_url: String,

    // Pagination
    pub page_size: u32,
    pub max_pages: usize,
    pub max_nodes: usize,

    // Transport
    pub request_timeout: Duration,
    pub retry_max_attempts: u32,
    pub retry_initial_delay: Duration,

    // Memoization
    pub cache_enabled: bool,
    pub cache_ttl: Duration,
}

impl BlvdConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_key: env::var("BLVD_API_KEY")
                .map_err(|_| anyhow::anyhow!("BLVD_API_KEY must be set"))?,
            api_secret: env::var("BLVD_API_SECRET")
                .map_err(|_| anyhow::anyhow!("BLVD_API_SECRET must be set"))?,
            business_id: env::var("BLVD_BUSINESS_ID")
                .map_err(|_| anyhow::anyhow!("BLVD_BUSINESS_ID must be set"))?,
            api_url: env::var("BLVD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),

            page_size: env::var("BLVD_PAGE_SIZE")
                .unwrap_or_else(|_| "100".into())
                .parse()
                .unwrap_or(100),
            max_pages: env::var("BLVD_MAX_PAGES")
                .unwrap_or_else(|_| "50".into())
                .parse()
                .unwrap_or(50),
            max_nodes: env::var("BLVD_MAX_NODES")
                .unwrap_or_else(|_| "5000".into())
                .parse()
                .unwrap_or(5000),

            request_timeout: Duration::from_secs(
                env::var("BLVD_HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".into())
                    .parse()
                    .unwrap_or(30),
            ),
            retry_max_attempts: env::var("BLVD_RETRY_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "5".into())
                .parse()
                .unwrap_or(5),
            retry_initial_delay: Duration::from_millis(
                env::var("BLVD_RETRY_INITIAL_DELAY_MS")
                    .unwrap_or_else(|_| "1000".into())
                    .parse()
                    .unwrap_or(1000),
            ),

            cache_enabled: env::var("BLVD_CACHE_ENABLED")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
            cache_ttl: Duration::from_secs(
                env::var("BLVD_CACHE_TTL_SECS")
                    .unwrap_or_else(|_| "300".into())
                    .parse()
                    .unwrap_or(300),
            ),
        })
    }

    /// Returns true if all three credential fields are non-empty.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty() && !self.business_id.is_empty()
    }
}
