#![allow(clippy::must_use_candidate)]

pub mod cors;
mod duration;
mod env;
pub mod health;
mod loader;
pub mod script;
pub mod server;
pub mod talk;
pub mod telemetry;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use script::*;
pub use server::*;
pub use talk::*;
pub use telemetry::TelemetryConfig;

/// Top-level Almabody configuration
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Video synthesis (D-ID talks) configuration
    #[serde(default)]
    pub talk: TalkConfig,
    /// Script generation (chat completion) configuration
    #[serde(default)]
    pub script: ScriptConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
