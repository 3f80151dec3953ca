//! Authorization scheme negotiation for the provider credential
//!
//! A stored key may already carry its scheme (`Basic abc`, `Bearer abc`), in
//! which case it is sent verbatim. A bare key is tried as `Basic` first and
//! may be retried once as `Bearer` when the provider rejects it.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::error::{Result, TalkError};

/// Scheme token placed before the key in the `Authorization` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthScheme {
    Basic,
    Bearer,
}

impl AuthScheme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Bearer => "Bearer",
        }
    }

    /// The other known scheme
    pub const fn alternate(self) -> Self {
        match self {
            Self::Basic => Self::Bearer,
            Self::Bearer => Self::Basic,
        }
    }

    /// Scheme carried by a `"<scheme> "` prefix, compared case-insensitively
    fn from_prefix(raw: &str) -> Option<Self> {
        [Self::Basic, Self::Bearer].into_iter().find(|scheme| {
            let token = scheme.as_str();
            raw.get(..token.len()).is_some_and(|p| p.eq_ignore_ascii_case(token))
                && raw[token.len()..].starts_with(' ')
        })
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheme recorded on a stored credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialScheme {
    Basic,
    Bearer,
    /// Bare key, scheme decided at request time
    Unset,
}

/// Scheme to present first, and the one to fall back to on rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferredScheme {
    pub scheme: AuthScheme,
    pub fallback: Option<AuthScheme>,
}

impl PreferredScheme {
    /// True when the stored key named its own scheme
    pub const fn is_explicit(&self) -> bool {
        self.fallback.is_none()
    }
}

/// Decide which scheme to present for `raw`
///
/// # Errors
///
/// Returns [`TalkError::MissingCredential`] when `raw` is blank.
pub fn resolve_scheme(raw: &str) -> Result<PreferredScheme> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(TalkError::MissingCredential);
    }

    Ok(match AuthScheme::from_prefix(raw) {
        Some(scheme) => PreferredScheme { scheme, fallback: None },
        None => PreferredScheme {
            scheme: AuthScheme::Basic,
            fallback: Some(AuthScheme::Bearer),
        },
    })
}

/// Header value for `raw` under `scheme`; prefixed keys are returned unchanged
pub fn build_auth_header(raw: &str, scheme: AuthScheme) -> String {
    if AuthScheme::from_prefix(raw).is_some() {
        raw.to_owned()
    } else {
        format!("{scheme} {raw}")
    }
}

/// Provider credential loaded once at startup
#[derive(Clone)]
pub struct Credential {
    raw: SecretString,
    scheme: CredentialScheme,
}

impl Credential {
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();

        let scheme = match AuthScheme::from_prefix(raw) {
            Some(AuthScheme::Basic) => CredentialScheme::Basic,
            Some(AuthScheme::Bearer) => CredentialScheme::Bearer,
            None => CredentialScheme::Unset,
        };

        Self {
            raw: SecretString::from(raw.to_owned()),
            scheme,
        }
    }

    /// Credential from the optional configured key; absent keys become blank
    pub fn from_config(api_key: Option<&SecretString>) -> Self {
        Self::new(api_key.map_or("", |key| key.expose_secret()))
    }

    pub const fn scheme(&self) -> CredentialScheme {
        self.scheme
    }

    pub fn is_present(&self) -> bool {
        !self.raw.expose_secret().is_empty()
    }

    /// Preferred and fallback schemes for this credential
    ///
    /// # Errors
    ///
    /// Returns [`TalkError::MissingCredential`] when no key is configured.
    pub fn resolve(&self) -> Result<PreferredScheme> {
        resolve_scheme(self.raw.expose_secret())
    }

    /// `Authorization` header value for `scheme`
    pub fn authorization(&self, scheme: AuthScheme) -> SecretString {
        SecretString::from(build_auth_header(self.raw.expose_secret(), scheme))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("scheme", &self.scheme)
            .field("present", &self.is_present())
            .finish_non_exhaustive()
    }
}
