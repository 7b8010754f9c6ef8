use log::debug;
use thurl_core::Result;

use crate::adjustments::{encode_adjustments, Adjustments};
use crate::config::Config;
use crate::constants::UNSAFE_TOKEN;
use crate::filter::{encode_filters, Filters};
use crate::key::SecurityKey;

/// Builder for thumbor urls.
///
/// A builder is configured once and never mutated by its build calls, so it
/// can be shared freely between threads.
///
/// - Without a security key every url carries the `unsafe` token.
/// - With a security key every url carries the HMAC-SHA1 signature of the
///   adjustments segment plus the image path.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    endpoint: Option<String>,
    key: Option<SecurityKey>,
}

impl Builder {
    /// Create a new builder.
    ///
    /// An absent or empty `security_key` selects unsafe mode.
    pub fn new(endpoint: Option<&str>, security_key: Option<&str>) -> Self {
        Self {
            endpoint: endpoint.map(|v| v.to_string()),
            key: security_key
                .filter(|v| !v.is_empty())
                .map(SecurityKey::new),
        }
    }

    /// Create a new builder from config.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.endpoint.as_deref(), cfg.security_key.as_deref())
    }

    /// Create a new builder from config after [`Config::validate`].
    pub fn try_from_config(cfg: &Config) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::from_config(cfg))
    }

    /// Set the base endpoint, for example `http://thumbor.com`.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    /// Set the security key. An empty key selects unsafe mode.
    pub fn with_security_key(mut self, security_key: &str) -> Self {
        self.key = Some(security_key)
            .filter(|v| !v.is_empty())
            .map(SecurityKey::new);
        self
    }

    /// Check if urls built by this builder are signed.
    pub fn is_safe(&self) -> bool {
        self.key.is_some()
    }

    /// Encode adjustments into the canonical path segment.
    pub fn encode_adjustments(&self, adjustments: Option<&Adjustments>) -> String {
        encode_adjustments(adjustments)
    }

    /// Encode filters into the `/filters:` path segment.
    pub fn encode_filters(&self, filters: &Filters) -> String {
        encode_filters(filters)
    }

    /// Compute the token for the payload.
    ///
    /// Returns `unsafe` if no security key is configured.
    pub fn sign(&self, payload: &str) -> String {
        match &self.key {
            Some(key) => key.sign(payload),
            None => UNSAFE_TOKEN.to_string(),
        }
    }

    /// Build the url of `image_path` with the given adjustments.
    ///
    /// The result is `{endpoint}/{token}/{segment}{image_path}`. Neither the
    /// endpoint nor the image path is validated or escaped.
    ///
    /// A builder without endpoint writes it as the empty string, so the url
    /// starts with `/{token}/`. Other thumbor url libraries print a literal
    /// `null` there; this one never does.
    pub fn build(&self, image_path: &str, adjustments: Option<&Adjustments>) -> String {
        let segment = encode_adjustments(adjustments);
        let payload = format!("{segment}{image_path}");
        debug!("calculated string to sign: {payload}");

        let token = self.sign(&payload);
        debug!("calculated token: {token}");

        format!(
            "{}/{}/{}",
            self.endpoint.as_deref().unwrap_or_default(),
            token,
            payload
        )
    }

    /// Build the url like [`Builder::build`] after validating the adjustments.
    ///
    /// Returns an error instead of a url thumbor would refuse to process.
    pub fn try_build(
        &self,
        image_path: &str,
        adjustments: Option<&Adjustments>,
    ) -> Result<String> {
        if let Some(adj) = adjustments {
            adj.validate()?;
        }

        Ok(self.build(image_path, adjustments))
    }

    /// Build the url and parse it into an [`http::Uri`].
    ///
    /// Useful when the url is handed to an http client directly.
    pub fn build_uri(
        &self,
        image_path: &str,
        adjustments: Option<&Adjustments>,
    ) -> Result<http::Uri> {
        let url = self.build(image_path, adjustments);
        Ok(url.parse::<http::Uri>()?)
    }
}

impl From<Config> for Builder {
    fn from(cfg: Config) -> Self {
        Self::from_config(&cfg)
    }
}
