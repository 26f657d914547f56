//! Client configuration

use std::time::Duration;

/// Configuration for connecting to the pharmacy platform API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Timeout for read (GET) requests
    pub read_timeout: Duration,

    /// Timeout for mutating (POST/PUT/DELETE) requests
    pub mutate_timeout: Duration,

    /// Retry idempotent reads once on network failure (never on 4xx/5xx)
    pub retry_reads: bool,
}

impl ClientConfig {
    /// Create a new configuration with default timeouts
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            read_timeout: Duration::from_secs(10),
            mutate_timeout: Duration::from_secs(30),
            retry_reads: true,
        }
    }

    /// Set the read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the mutate timeout
    pub fn with_mutate_timeout(mut self, timeout: Duration) -> Self {
        self.mutate_timeout = timeout;
        self
    }

    /// Enable or disable the single read retry
    pub fn with_retry_reads(mut self, retry: bool) -> Self {
        self.retry_reads = retry;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
