//! Programmatic configuration builder for integration tests

use std::{net::SocketAddr, time::Duration};

use almabody_config::{Config, CorsConfig, HealthConfig, PollConfig, ScriptConfig, ServerConfig, TalkConfig};
use secrecy::SecretString;

/// Avatar image used by every test talk
pub const TEST_IMAGE_URL: &str = "https://cdn.example.com/alma.png";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    ///
    /// Polling is fast so timeout paths finish quickly.
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                talk: TalkConfig {
                    poll: PollConfig {
                        attempts: 3,
                        interval: Duration::from_millis(20),
                    },
                    request_timeout: Duration::from_secs(5),
                    ..TalkConfig::default()
                },
                script: ScriptConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Point the talk provider at a mock D-ID backend with a bare test key
    pub fn with_did(mut self, base_url: &str) -> Self {
        self.config.talk.base_url = base_url.parse().expect("valid URL");
        self.config.talk.api_key = Some(SecretString::from("test-key"));
        self.config.talk.image_url = TEST_IMAGE_URL.to_owned();
        self
    }

    /// Replace the provider credential
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.config.talk.api_key = Some(SecretString::from(api_key.to_owned()));
        self
    }

    /// Remove the provider credential
    pub fn without_api_key(mut self) -> Self {
        self.config.talk.api_key = None;
        self
    }

    /// Remove the default avatar image
    pub fn without_image_url(mut self) -> Self {
        self.config.talk.image_url = String::new();
        self
    }

    /// Do not ask the provider to hold the response until rendering completes
    pub fn without_wait(mut self) -> Self {
        self.config.talk.wait_for_completion = false;
        self
    }

    /// Set the polling budget
    pub fn with_poll(mut self, attempts: u32, interval: Duration) -> Self {
        self.config.talk.poll = PollConfig { attempts, interval };
        self
    }

    /// Point the script generator at a mock LLM backend
    pub fn with_script(mut self, base_url: &str) -> Self {
        self.config.script.base_url = base_url.parse().expect("valid URL");
        self.config.script.api_key = Some(SecretString::from("test-llm-key"));
        self
    }

    /// Set the overall request deadline
    pub fn with_request_deadline(mut self, deadline: Duration) -> Self {
        self.config.server.request_deadline = deadline;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
