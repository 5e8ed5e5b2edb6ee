//! Stateless signing of user identity tokens.
//!
//! Token wire form: `base64url(user_id) + "." + base64url(HMAC-SHA256(secret, user_id))`,
//! both parts unpadded. Tokens carry no expiry and nothing is stored server-side.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies signed user tokens with a single process-wide secret.
#[derive(Clone)]
pub struct IdentitySigner {
    secret: Vec<u8>,
}

impl IdentitySigner {
    /// Creates a signer keyed by `secret`.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length")
    }

    /// Signs `user_id`. Deterministic for a given secret.
    pub fn sign(&self, user_id: &str) -> String {
        let mut mac = self.mac();
        mac.update(user_id.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        let payload = URL_SAFE_NO_PAD.encode(user_id.as_bytes());

        format!("{payload}.{signature}")
    }

    /// Verifies `token` and returns the user id it carries.
    ///
    /// The signature is compared in constant time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] if the token is not two `.`-separated
    /// base64url parts or the payload is not UTF-8.
    ///
    /// Returns [`AppError::Unauthorized`] if the signature does not match.
    pub fn verify(&self, token: &str) -> Result<String, AppError> {
        let mut parts = token.split('.');
        let (Some(payload), Some(signature), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(AppError::invalid_argument(
                "invalid token format",
                json!({}),
            ));
        };

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AppError::invalid_argument("invalid base64 payload", json!({})))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AppError::invalid_argument("invalid base64 signature", json!({})))?;

        let mut mac = self.mac();
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| AppError::unauthorized("invalid signature", json!({})))?;

        String::from_utf8(payload)
            .map_err(|_| AppError::invalid_argument("invalid token payload", json!({})))
    }
}

impl std::fmt::Debug for IdentitySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentitySigner")
            .field("secret", &"***")
            .finish()
    }
}
