use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::one_time_code::MessageResponseData;
use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserStats;
use crate::inbound::http::router::AppState;

pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListCustomersQuery>,
) -> Result<ApiSuccess<Vec<UserResponseData>>, ApiError> {
    let filter = query.try_into_filter()?;

    state
        .customer_service
        .list(&filter)
        .await
        .map_err(ApiError::from)
        .map(|users| {
            ApiSuccess::new(
                StatusCode::OK,
                users.iter().map(UserResponseData::from).collect(),
            )
        })
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let id = parse_id(&customer_id)?;

    state
        .customer_service
        .get(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(body): Json<UpdateCustomerRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let id = parse_id(&customer_id)?;
    let command = body.try_into_command()?;

    state
        .customer_service
        .update(&id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let id = parse_id(&customer_id)?;

    state
        .customer_service
        .delete(&id)
        .await
        .map_err(ApiError::from)
        .map(|()| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageResponseData {
                    message: "Customer deleted".to_string(),
                },
            )
        })
}

pub async fn customer_stats(
    State(state): State<AppState>,
) -> Result<ApiSuccess<CustomerStatsResponseData>, ApiError> {
    state
        .customer_service
        .stats()
        .await
        .map_err(ApiError::from)
        .map(|stats| ApiSuccess::new(StatusCode::OK, stats.into()))
}

fn parse_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::from_string(raw).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListCustomersQuery {
    search: Option<String>,
    role: Option<String>,
}

impl ListCustomersQuery {
    fn try_into_filter(self) -> Result<UserFilter, ApiError> {
        let role = self
            .role
            .map(|raw| raw.parse::<Role>())
            .transpose()
            .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

        Ok(UserFilter {
            search: self.search,
            role,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateCustomerRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    mother_lastname: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    role: Option<String>,
}

impl UpdateCustomerRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ApiError> {
        let email = self
            .email
            .map(EmailAddress::new)
            .transpose()
            .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

        let role = self
            .role
            .map(|raw| raw.parse::<Role>())
            .transpose()
            .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

        Ok(UpdateUserCommand {
            first_name: self.first_name,
            last_name: self.last_name,
            mother_lastname: self.mother_lastname,
            email,
            phone: self.phone,
            role,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerStatsResponseData {
    pub total: i64,
    pub new_today: i64,
    pub new_this_week: i64,
    pub new_this_month: i64,
    pub by_role: Vec<RoleCountData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleCountData {
    pub role: String,
    pub count: i64,
}

impl From<UserStats> for CustomerStatsResponseData {
    fn from(stats: UserStats) -> Self {
        Self {
            total: stats.total,
            new_today: stats.new_today,
            new_this_week: stats.new_this_week,
            new_this_month: stats.new_this_month,
            by_role: stats
                .by_role
                .into_iter()
                .map(|(role, count)| RoleCountData { role, count })
                .collect(),
        }
    }
}
