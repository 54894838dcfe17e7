//! Token codec — signs and parses bearer tokens.
//!
//! Pure and stateless: every operation is a function of the token string,
//! the configured signing secret, and the current time. Signature failures
//! and expiry are checked separately so callers can distinguish them.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use litera_core::error::AppError;
use litera_core::result::AppResult;
use litera_core::config::AuthConfig;
use litera_entity::account::Role;

use super::claims::Claims;

/// Minimum acceptable signing secret length in bytes.
const MIN_SECRET_BYTES: usize = 32;

/// Clock-skew leeway applied to expiry checks, in seconds.
const EXPIRY_LEEWAY_SECONDS: u64 = 5;

/// A freshly issued token together with its expiry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SignedToken {
    /// The compact signed token string.
    pub token: String,
    /// When the token stops being valid.
    pub expires_at: DateTime<Utc>,
}

/// Signs and parses bearer tokens (HMAC-SHA256).
#[derive(Clone)]
pub struct TokenCodec {
    /// Signing key.
    encoding_key: EncodingKey,
    /// Verification key.
    decoding_key: DecodingKey,
    /// Full validation: signature, structure, and expiry.
    expiry_validation: Validation,
    /// Structural validation: signature and structure only.
    structural_validation: Validation,
    /// Token lifetime in hours.
    ttl_hours: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

impl TokenCodec {
    /// Creates a codec from auth configuration.
    ///
    /// Fails when the signing secret is unusable; this is a configuration
    /// error and fatal at startup.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        if config.token_secret.len() < MIN_SECRET_BYTES {
            return Err(AppError::configuration(format!(
                "Signing secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }

        let mut expiry_validation = Validation::new(Algorithm::HS256);
        expiry_validation.validate_exp = true;
        expiry_validation.leeway = EXPIRY_LEEWAY_SECONDS;

        let mut structural_validation = Validation::new(Algorithm::HS256);
        structural_validation.validate_exp = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            expiry_validation,
            structural_validation,
            ttl_hours: config.token_ttl_hours as i64,
        })
    }

    /// Constructs and signs a token for the given subject.
    ///
    /// Issued-at is now; expiry is now plus the configured lifetime.
    pub fn issue(&self, subject: &str, role: Role) -> AppResult<SignedToken> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.ttl_hours);

        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::configuration(format!("Failed to sign token: {e}")))?;

        Ok(SignedToken { token, expires_at })
    }

    /// Extracts the subject after verifying signature and structure.
    ///
    /// Expiry is deliberately not checked here so callers can distinguish a
    /// stale token from a forged one.
    pub fn parse_subject(&self, token: &str) -> AppResult<String> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.structural_validation)
            .map_err(|e| AppError::unauthorized(format!("Invalid token: {e}")))?;
        Ok(data.claims.sub)
    }

    /// Full verification: valid signature, exact subject match, not expired.
    ///
    /// Every parsing failure is absorbed into `false`, never propagated.
    pub fn verify(&self, token: &str, expected_subject: &str) -> bool {
        match decode::<Claims>(token, &self.decoding_key, &self.expiry_validation) {
            Ok(data) => data.claims.sub == expected_subject,
            Err(_) => false,
        }
    }

    /// Subject-agnostic liveness check: parses and is not expired.
    pub fn is_well_formed(&self, token: &str) -> bool {
        decode::<Claims>(token, &self.decoding_key, &self.expiry_validation).is_ok()
    }
}
