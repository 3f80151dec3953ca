//! Script generation for talking-avatar requests
//!
//! Calls a chat completion endpoint with a fixed system instruction and the
//! caller's intent, returning the text the avatar should speak.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod generator;
mod http_client;
mod protocol;

use async_trait::async_trait;

pub use error::{Result, ScriptError};
pub use generator::ScriptGenerator;

/// Produces final spoken text from a caller intent
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate the script for `intent`
    async fn generate_text(&self, intent: &str) -> Result<String>;
}
