use async_trait::async_trait;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserStats;

/// Persistence operations for the user aggregate.
///
/// Serves both the authentication flows (lookup by identifier, email, or
/// federated id) and the customer CRUD surface (list, update, delete, stats).
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - unique constraint hit;
    ///   nothing is inserted
    /// * `DatabaseError` - operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user matching `identifier` against username OR email,
    /// case-sensitive. Login flow A's lookup.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by federated (Google) id.
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, UserError>;

    /// Backfill the federated id and, when absent, the profile picture on an
    /// existing account. First-write-wins; existing values are not replaced.
    async fn link_google_account(
        &self,
        id: &UserId,
        google_id: &str,
        profile_picture: Option<String>,
    ) -> Result<(), UserError>;

    /// List users matching the filter, newest first.
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, UserError>;

    /// Apply a partial update.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    /// * `EmailAlreadyExists` - new email belongs to another user
    async fn update(&self, id: &UserId, command: UpdateUserCommand) -> Result<User, UserError>;

    /// Remove a user.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;

    /// Registration counters for the customer stats endpoint.
    async fn stats(&self) -> Result<UserStats, UserError>;
}
