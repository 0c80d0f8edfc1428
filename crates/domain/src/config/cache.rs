use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// TTL stamped on every answer, regardless of what the upstream reported.
    #[serde(default = "default_answer_ttl")]
    pub answer_ttl: u32,

    /// How long a failed upstream lookup is remembered before it may be
    /// retried. Zero retries on the very next query.
    #[serde(default = "default_failure_grace_ms")]
    pub failure_grace_ms: u64,

    #[serde(default = "default_true")]
    pub crawl_enabled: bool,

    #[serde(default = "default_max_concurrent_crawls")]
    pub max_concurrent_crawls: usize,
}

impl CacheConfig {
    pub fn failure_grace(&self) -> Duration {
        Duration::from_millis(self.failure_grace_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            answer_ttl: default_answer_ttl(),
            failure_grace_ms: default_failure_grace_ms(),
            crawl_enabled: true,
            max_concurrent_crawls: default_max_concurrent_crawls(),
        }
    }
}

fn default_answer_ttl() -> u32 {
    60
}

fn default_failure_grace_ms() -> u64 {
    2000
}

fn default_max_concurrent_crawls() -> usize {
    64
}

fn default_true() -> bool {
    true
}
