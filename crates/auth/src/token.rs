//! Signed token codec (HS256).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{AuthClaims, validate_claims};
use crate::error::AuthError;

/// Mint/decode boundary so the session manager and middleware stay
/// independent of the concrete signing scheme.
pub trait TokenCodec: Send + Sync {
    fn mint(&self, claims: &AuthClaims) -> Result<String, AuthError>;

    /// Decode + verify signature, then check the claims' time window
    /// against `now`. Every failure collapses into [`AuthError::Invalid`].
    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<AuthClaims, AuthError>;
}

/// HMAC-SHA256 implementation over a shared secret.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl TokenCodec for Hs256TokenCodec {
    fn mint(&self, claims: &AuthClaims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|_| AuthError::Invalid)
    }

    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<AuthClaims, AuthError> {
        // Expiry lives in our claims as RFC3339 timestamps; the time window
        // is checked by `validate_claims`, not by the library's numeric-exp
        // handling.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<AuthClaims>(token, &self.decoding, &validation)
            .map_err(|_| AuthError::Invalid)?;
        validate_claims(&data.claims, now).map_err(|_| AuthError::Invalid)?;
        Ok(data.claims)
    }
}
