use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::AccessClaims;
use super::errors::JwtError;
use crate::keys::KeyMaterial;

/// Signs and verifies access tokens.
///
/// RS256 only: the private key signs, the public key verifies, so the
/// verification path can be deployed without the signing secret. The
/// algorithm allow-list is fixed at construction; tokens that name any
/// other algorithm in their header (including `none`) fail validation.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Default access token lifetime, in minutes.
    pub const DEFAULT_TTL_MINUTES: i64 = 15;

    /// Create a codec from a PEM keypair with an explicit token lifetime.
    ///
    /// # Errors
    /// * `InvalidKey` - Either PEM does not parse as an RSA key
    pub fn new(keys: &KeyMaterial, ttl: Duration) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(keys.private_key_pem().as_bytes())
            .map_err(|e| JwtError::InvalidKey(e.to_string()))?;
        let decoding_key = DecodingKey::from_rsa_pem(keys.public_key_pem().as_bytes())
            .map_err(|e| JwtError::InvalidKey(e.to_string()))?;

        // Zero leeway keeps the expiry boundary exact; skew tolerance is
        // the issuer's concern, not the verifier's.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            ttl,
        })
    }

    /// Create a codec with the default 15 minute token lifetime.
    pub fn with_default_ttl(keys: &KeyMaterial) -> Result<Self, JwtError> {
        Self::new(keys, Duration::minutes(Self::DEFAULT_TTL_MINUTES))
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for a user, expiring after the configured lifetime.
    pub fn issue(
        &self,
        user_id: i64,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        self.encode(&AccessClaims::issue(user_id, username, now, self.ttl))
    }

    /// Sign a claims set into a token string.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing operation failed
    pub fn encode(&self, claims: &AccessClaims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::RS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Signature fine, `exp` has passed
    /// * `InvalidToken` - Bad signature or wrong algorithm
    /// * `MalformedToken` - Not parseable as a three-part token
    pub fn decode(&self, token: &str) -> Result<AccessClaims, JwtError> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::ImmatureSignature => JwtError::InvalidToken,
                _ => JwtError::MalformedToken,
            })
    }
}
