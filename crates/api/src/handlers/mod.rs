pub mod cache;
pub mod health;
pub mod metrics;

pub use cache::get_cache_stats;
pub use health::health_check;
pub use metrics::get_metrics;
