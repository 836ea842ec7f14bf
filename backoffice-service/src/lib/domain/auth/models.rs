use chrono::NaiveDate;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;

/// Result of any successful login flow: the signed session assertion plus the
/// user it identifies.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Delivery channel for one-time codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeChannel {
    Email,
    Sms,
}

/// Identity payload extracted from a verified Google id token.
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    pub google_id: String,
    pub email: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

/// Validated registration request.
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub mother_lastname: Option<String>,
    pub phone: Option<String>,
    pub birthdate: Option<NaiveDate>,
}
