use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// Identity record behind every login flow. `password_hash` is `None` only
/// for accounts that have never set a password; federated sign-up stores a
/// hashed random placeholder instead, so a `None` here never authenticates.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub mother_lastname: Option<String>,
    pub phone: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub google_id: Option<String>,
    pub profile_picture: Option<String>,
    pub role: Role,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - string is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// 3-32 characters, alphanumeric plus underscore, hyphen, and dot (dot
/// because federated sign-up derives usernames from email local parts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` / `TooLong` - length outside 3-32
    /// * `InvalidCharacters` - disallowed character present
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.len();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates format using an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local part before the `@`, used to derive a username at federated
    /// sign-up.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role reference. New accounts default to `Customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Employee,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Customer => "customer",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            "customer" => Ok(Role::Customer),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional per-field update for the customer CRUD surface. Only provided
/// fields change.
#[derive(Debug, Default)]
pub struct UpdateUserCommand {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mother_lastname: Option<String>,
    pub email: Option<EmailAddress>,
    pub phone: Option<String>,
    pub role: Option<Role>,
}

/// Search filter for customer listing.
#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    /// Substring match against first name, last name, or email
    pub search: Option<String>,
    pub role: Option<Role>,
}

/// Aggregated registration counters for the stats endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub total: i64,
    pub new_today: i64,
    pub new_this_week: i64,
    pub new_this_month: i64,
    pub by_role: Vec<(String, i64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert!(Username::new("ana".to_string()).is_ok());
        assert!(Username::new("ana.lopez".to_string()).is_ok());
        assert!(Username::new("an".to_string()).is_err());
        assert!(Username::new("a".repeat(33)).is_err());
        assert!(Username::new("ana lopez".to_string()).is_err());
    }

    #[test]
    fn test_email_local_part() {
        let email = EmailAddress::new("ana.lopez@example.com".to_string()).unwrap();
        assert_eq!(email.local_part(), "ana.lopez");
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("customer".parse::<Role>().unwrap(), Role::Customer);
        assert_eq!(Role::Admin.as_str(), "admin");
        assert!("superuser".parse::<Role>().is_err());
    }
}
