use std::fmt::{Debug, Formatter};

use crate::constants::*;
use thurl_core::utils::Redact;
use thurl_core::{Context, Error, Result};

/// Config for building thumbor urls.
#[derive(Clone, Default)]
pub struct Config {
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`THUMBOR_ENDPOINT`]
    pub endpoint: Option<String>,
    /// `security_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`THUMBOR_SECURITY_KEY`]
    ///
    /// An empty key is the same as no key: urls are built in unsafe mode.
    pub security_key: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("security_key", &Redact::from(&self.security_key))
            .finish()
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(THUMBOR_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(THUMBOR_SECURITY_KEY).filter(|v| !v.is_empty()) {
            self.security_key.get_or_insert(v);
        }

        self
    }

    /// Check that the endpoint can prefix a thumbor url.
    ///
    /// The endpoint must be an absolute url with scheme and host, and must
    /// not end with `/` (the token is joined with a `/` already).
    pub fn validate(&self) -> Result<()> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(());
        };

        let uri = endpoint.parse::<http::Uri>().map_err(|e| {
            Error::config_invalid(format!("endpoint {endpoint:?} is not a valid url"))
                .with_source(e)
        })?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::config_invalid(format!(
                "endpoint {endpoint:?} must contain scheme and host"
            )));
        }
        if endpoint.ends_with('/') {
            return Err(Error::config_invalid(format!(
                "endpoint {endpoint:?} must not end with '/'"
            )));
        }

        Ok(())
    }
}
