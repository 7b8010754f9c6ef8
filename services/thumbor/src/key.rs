use std::fmt::{Debug, Formatter};

use thurl_core::hash::base64_url_hmac_sha1;
use thurl_core::utils::Redact;

/// Security key shared with the thumbor server.
///
/// The server recomputes the signature of every safe url with the same key
/// and rejects the request on mismatch.
#[derive(Clone, PartialEq, Eq)]
pub struct SecurityKey(String);

impl SecurityKey {
    /// Create a new security key.
    pub fn new(key: &str) -> Self {
        Self(key.to_string())
    }

    /// Sign the payload with HMAC-SHA1, encoded as url safe base64 with padding.
    pub fn sign(&self, payload: &str) -> String {
        base64_url_hmac_sha1(self.0.as_bytes(), payload.as_bytes())
    }
}

impl Debug for SecurityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecurityKey")
            .field(&Redact::from(&self.0))
            .finish()
    }
}
