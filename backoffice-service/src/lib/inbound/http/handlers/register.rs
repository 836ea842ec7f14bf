use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::RegisterUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::UsernameError;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    first_name: String,
    last_name: Option<String>,
    mother_lastname: Option<String>,
    phone: Option<String>,
    birthdate: Option<NaiveDate>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("{0} is required")]
    MissingField(&'static str),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, ParseRegisterRequestError> {
        if self.first_name.trim().is_empty() {
            return Err(ParseRegisterRequestError::MissingField("first_name"));
        }
        // Nullable in storage for federated accounts, but required here.
        let last_name = match self.last_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(ParseRegisterRequestError::MissingField("last_name")),
        };

        Ok(RegisterUserCommand {
            username: Username::new(self.username)?,
            email: EmailAddress::new(self.email)?,
            password: self.password,
            first_name: self.first_name,
            last_name: Some(last_name),
            mother_lastname: self.mother_lastname,
            phone: self.phone,
            birthdate: self.birthdate,
        })
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        match err {
            ParseRegisterRequestError::MissingField(_) => ApiError::BadRequest(err.to_string()),
            _ => ApiError::UnprocessableEntity(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub message: String,
    pub user_id: String,
}

impl From<&User> for RegisterResponseData {
    fn from(user: &User) -> Self {
        Self {
            message: "User registered successfully".to_string(),
            user_id: user.id.to_string(),
        }
    }
}
