use std::path::Path;

use url::Url;

use crate::{AnyOrArray, Config};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// Missing credentials and defaults are not errors: the server still
    /// starts and reports them through the readiness endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if timing, URL or CORS settings are unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_talk_config()?;
        self.validate_script_config()?;
        self.validate_server_config()?;
        Ok(())
    }

    fn validate_talk_config(&self) -> anyhow::Result<()> {
        let talk = &self.talk;

        ensure_http_url("talk.base_url", &talk.base_url)?;

        let image_url = talk.image_url.trim();
        if !image_url.is_empty() {
            let parsed = Url::parse(image_url).map_err(|e| anyhow::anyhow!("talk.image_url is not a valid URL: {e}"))?;
            ensure_http_url("talk.image_url", &parsed)?;
        }

        if talk.request_timeout.is_zero() {
            anyhow::bail!("talk.request_timeout must be greater than 0");
        }

        if talk.poll.attempts == 0 {
            anyhow::bail!("talk.poll.attempts must be greater than 0");
        }

        if talk.poll.interval.is_zero() {
            anyhow::bail!("talk.poll.interval must be greater than 0");
        }

        Ok(())
    }

    fn validate_script_config(&self) -> anyhow::Result<()> {
        ensure_http_url("script.base_url", &self.script.base_url)?;

        if self.script.model.trim().is_empty() {
            anyhow::bail!("script.model must not be empty");
        }

        if self.script.request_timeout.is_zero() {
            anyhow::bail!("script.request_timeout must be greater than 0");
        }

        Ok(())
    }

    fn validate_server_config(&self) -> anyhow::Result<()> {
        if self.server.request_deadline.is_zero() {
            anyhow::bail!("server.request_deadline must be greater than 0");
        }

        // Browsers reject credentialed responses with a wildcard origin
        if let Some(ref cors) = self.server.cors
            && cors.credentials
            && cors.origins == AnyOrArray::Any
        {
            anyhow::bail!("server.cors.credentials requires an explicit list of origins");
        }

        Ok(())
    }
}

fn ensure_http_url(key: &str, url: &Url) -> anyhow::Result<()> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("{key} must use http or https, got '{other}'"),
    }
}
