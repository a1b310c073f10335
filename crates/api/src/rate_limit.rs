//! Per-IP rate limiting for the alert API
//!
//! GCRA via tower_governor, keyed on the peer address. The server must be
//! served with `into_make_service_with_connect_info::<SocketAddr>()` for the
//! key extractor to find the IP.
//!
//! Rejected requests get the governor's own 429 response (plain-text body
//! plus `x-ratelimit-after`), not the JSON error envelope.

use governor::middleware::StateInformationMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config with X-RateLimit-* headers enabled
pub type AlertGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Apply the limiter at all
    pub enabled: bool,
    /// Seconds to replenish one request slot
    pub per_second: u64,
    /// Max requests that can be made immediately
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 2,
            burst_size: 5,
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid rate limit settings: per_second={per_second}, burst_size={burst_size}")]
pub struct RateLimitError {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Build the governor config; zero rates are rejected
pub fn create_governor_config(
    config: &RateLimitConfig,
) -> Result<Arc<AlertGovernorConfig>, RateLimitError> {
    GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
        .ok_or(RateLimitError {
            per_second: config.per_second,
            burst_size: config.burst_size,
        })
}
