use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::errors::JwtError;

/// Issues and verifies session tokens.
///
/// HS256 over a process-wide secret loaded at startup. The secret should be at
/// least 32 bytes; it is never logged.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode session claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - serialization or signing failed
    pub fn encode(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a session token.
    ///
    /// # Errors
    /// * `TokenExpired` - `exp` is in the past
    /// * `InvalidToken` - bad signature, malformed structure, or missing claims
    pub fn decode(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // No clock leeway: a token is expired the second its `exp` passes.
        validation.leeway = 0;

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    _ => JwtError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> JwtHandler {
        JwtHandler::new(b"my_secret_key_at_least_32_bytes_long!")
    }

    #[test]
    fn test_encode_and_decode() {
        let claims = SessionClaims::new("user123", "customer", "ana", 24);

        let token = handler().encode(&claims).expect("Failed to encode token");
        assert!(!token.is_empty());

        let decoded = handler().decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_garbage_is_invalid_not_expired() {
        let result = handler().decode("invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let other = JwtHandler::new(b"another_secret_at_least_32_bytes!!");

        let claims = SessionClaims::new("user123", "customer", "ana", 24);
        let token = handler().encode(&claims).expect("Failed to encode token");

        let result = other.decode(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        let claims = SessionClaims::with_ttl_seconds("user123", "customer", "ana", -2);
        let token = handler().encode(&claims).expect("Failed to encode token");

        let result = handler().decode(&token);
        assert_eq!(result, Err(JwtError::TokenExpired));
    }
}
