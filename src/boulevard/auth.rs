use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Scheme prefix mandated by the Boulevard admin auth scheme.
const TOKEN_PREFIX: &str = "blvd-admin-v1";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("invalid base64 secret: {0}")]
    InvalidSecret(#[from] base64::DecodeError),

    #[error("HMAC computation failed: {0}")]
    HmacError(String),
}

#[derive(Debug, Clone)]
pub struct BoulevardAuth {
    pub api_key: String,
    pub api_secret: String,
    pub business_id: String,
}

impl BoulevardAuth {
    pub fn new(api_key: String, api_secret: String, business_id: String) -> Self {
        Self {
            api_key,
            api_secret,
            business_id,
        }
    }

    /// Build the signed admin token for a given unix timestamp.
    ///
    /// payload = `blvd-admin-v1{business_id}{timestamp}`
    /// token   = `base64(hmac_sha256(payload))` + payload
    ///
    /// The secret is base64-decoded before use.
    pub fn signed_token_at(&self, timestamp: i64) -> Result<String, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::MissingCredential("api_key"));
        }
        if self.api_secret.is_empty() {
            return Err(AuthError::MissingCredential("api_secret"));
        }
        if self.business_id.is_empty() {
            return Err(AuthError::MissingCredential("business_id"));
        }

        let secret_bytes = BASE64.decode(&self.api_secret)?;
        let payload = format!("{TOKEN_PREFIX}{}{timestamp}", self.business_id);

        let mut mac = HmacSha256::new_from_slice(&secret_bytes)
            .map_err(|e| AuthError::HmacError(e.to_string()))?;
        mac.update(payload.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        Ok(format!("{signature}{payload}"))
    }

    /// Build the HTTP Basic credential for one request.
    ///
    /// The embedded timestamp is regenerated per call, so two credentials
    /// produced at different seconds never compare equal.
    pub fn basic_credential(&self) -> Result<String, AuthError> {
        let token = self.signed_token_at(chrono::Utc::now().timestamp())?;
        Ok(BASE64.encode(format!("{}:{token}", self.api_key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth() -> BoulevardAuth {
        // Use a known base64-encoded secret
        let secret = BASE64.encode(b"test-secret-key-1234");
        BoulevardAuth::new(
            "key-id".into(),
            secret,
            "urn:blvd:Business:00000000-0000-0000-0000-000000000000".into(),
        )
    }

    #[test]
    fn token_embeds_signature_and_payload() {
        let auth = test_auth();
        let token = auth.signed_token_at(1_700_000_000).unwrap();

        // 32-byte HMAC digest base64-encodes to 44 chars, followed by the payload
        assert!(token.len() > 44);
        assert!(token[44..].starts_with(TOKEN_PREFIX));
        assert!(token.ends_with("1700000000"));
        assert!(BASE64.decode(&token[..44]).is_ok());
    }

    #[test]
    fn tokens_differ_across_timestamps() {
        let auth = test_auth();
        let a = auth.signed_token_at(1_700_000_000).unwrap();
        let b = auth.signed_token_at(1_700_000_001).unwrap();
        assert_ne!(a, b, "tokens must not be reusable across timestamps");
    }

    #[test]
    fn basic_credential_is_valid_base64() {
        let auth = test_auth();
        let cred = auth.basic_credential().unwrap();
        let decoded = BASE64.decode(&cred).unwrap();
        let decoded = String::from_utf8(decoded).unwrap();
        assert!(decoded.starts_with("key-id:"));
    }

    #[test]
    fn missing_field_is_a_configuration_error() {
        let auth = BoulevardAuth::new("key".into(), String::new(), "biz".into());
        assert!(matches!(
            auth.signed_token_at(0),
            Err(AuthError::MissingCredential("api_secret"))
        ));
    }

    #[test]
    fn undecodable_secret_is_rejected() {
        let auth = BoulevardAuth::new("key".into(), "not!!base64??".into(), "biz".into());
        assert!(matches!(
            auth.signed_token_at(0),
            Err(AuthError::InvalidSecret(_))
        ));
    }
}
