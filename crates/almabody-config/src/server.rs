use std::{net::SocketAddr, time::Duration};

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig};

/// Default wall-clock budget for one `/say` request, covering script
/// generation, talk submission and polling
pub const DEFAULT_REQUEST_DEADLINE: Duration = Duration::from_secs(150);

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    /// Overall deadline for a single inbound request
    #[serde(default = "default_request_deadline", deserialize_with = "crate::duration::deserialize")]
    pub request_deadline: Duration,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default = "default_cors")]
    pub cors: Option<CorsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            request_deadline: DEFAULT_REQUEST_DEADLINE,
            health: HealthConfig::default(),
            cors: default_cors(),
        }
    }
}

const fn default_request_deadline() -> Duration {
    DEFAULT_REQUEST_DEADLINE
}

/// Browser clients embed the avatar directly, so CORS is open unless configured
#[allow(clippy::unnecessary_wraps)]
fn default_cors() -> Option<CorsConfig> {
    Some(CorsConfig::default())
}
