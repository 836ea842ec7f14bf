use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session assertion payload.
///
/// The stateless identity the server hands to a client after any successful
/// login flow. Holds the subject id, the role used for authorization
/// decisions, and the username as a human-readable handle. Every field is
/// required; a token missing one of them fails validation at decode time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (user id)
    pub sub: String,

    /// Role name, e.g. "customer" or "admin"
    pub role: String,

    /// Username at issuance time
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims expiring `ttl_hours` from now.
    pub fn new(
        user_id: impl ToString,
        role: impl Into<String>,
        username: impl Into<String>,
        ttl_hours: i64,
    ) -> Self {
        Self::with_ttl_seconds(user_id, role, username, ttl_hours * 3600)
    }

    /// Build claims with a second-granularity lifetime. Used by tests that
    /// exercise expiry without waiting out a full hour.
    pub fn with_ttl_seconds(
        user_id: impl ToString,
        role: impl Into<String>,
        username: impl Into<String>,
        ttl_seconds: i64,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::seconds(ttl_seconds);

        Self {
            sub: user_id.to_string(),
            role: role.into(),
            username: username.into(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_lifetime() {
        let claims = SessionClaims::new("user123", "customer", "ana", 24);

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.role, "customer");
        assert_eq!(claims.username, "ana");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_with_ttl_seconds() {
        let claims = SessionClaims::with_ttl_seconds("user123", "admin", "root", 90);
        assert_eq!(claims.exp - claims.iat, 90);
    }
}
