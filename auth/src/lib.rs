//! Authentication utilities for the back-office service.
//!
//! Infrastructure pieces every login flow composes:
//! - Password hashing (Argon2id) and the password strength policy
//! - Session token generation and validation (JWT, HS256)
//! - An `Authenticator` coordinating both for the password flow
//!
//! The service defines its own ports and adapts these implementations, so the
//! crate stays free of storage and transport concerns.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Abcdef1!").unwrap();
//! assert!(hasher.verify("Abcdef1!", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{JwtHandler, SessionClaims};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = SessionClaims::new("user123", "customer", "ana", 24);
//! let token = handler.encode(&claims).unwrap();
//! let decoded = handler.decode(&token).unwrap();
//! assert_eq!(decoded.username, "ana");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use password::check_strength;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordPolicyError;
