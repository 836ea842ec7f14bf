use std::sync::Arc;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserStats;
use crate::domain::user::ports::UserRepository;

/// Back-office customer management over the user store.
///
/// Customers are user rows; this service exposes the administrative view of
/// them: listing with search, partial updates, hard deletes, and the
/// sign-up statistics panel.
pub struct CustomerService<UR: UserRepository> {
    users: Arc<UR>,
}

impl<UR: UserRepository> CustomerService<UR> {
    pub fn new(users: Arc<UR>) -> Self {
        Self { users }
    }

    /// List users matching `filter`. Search matches name and email
    /// substrings; the role filter narrows to one role.
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, UserError> {
        self.users.list(filter).await
    }

    pub async fn get(&self, id: &UserId) -> Result<User, UserError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    /// Partial update. Only fields present in the command are written;
    /// changing the email to one another user owns is a conflict.
    pub async fn update(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let updated = self.users.update(id, command).await?;
        tracing::info!(username = %updated.username, "Customer updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users.delete(id).await?;
        tracing::info!(user_id = %id, "Customer deleted");
        Ok(())
    }

    /// Sign-up statistics for the dashboard summary panel.
    pub async fn stats(&self) -> Result<UserStats, UserError> {
        self.users.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::service::tests::sample_user;
    use crate::domain::auth::service::tests::MockUsers;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Role;

    #[tokio::test]
    async fn test_get_missing_customer_is_not_found() {
        let mut users = MockUsers::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let service = CustomerService::new(Arc::new(users));
        let result = service.get(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_forwards_filter() {
        let mut users = MockUsers::new();
        users
            .expect_list()
            .withf(|filter| {
                filter.search.as_deref() == Some("ana") && filter.role == Some(Role::Customer)
            })
            .times(1)
            .returning(|_| Ok(vec![sample_user()]));

        let service = CustomerService::new(Arc::new(users));
        let filter = UserFilter {
            search: Some("ana".to_string()),
            role: Some(Role::Customer),
        };
        let listed = service.list(&filter).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_update_email_conflict_propagates() {
        let mut users = MockUsers::new();
        users
            .expect_update()
            .returning(|_, _| Err(UserError::EmailAlreadyExists("taken@example.com".to_string())));

        let service = CustomerService::new(Arc::new(users));
        let command = UpdateUserCommand {
            first_name: None,
            last_name: None,
            mother_lastname: None,
            email: Some(EmailAddress::new("taken@example.com".to_string()).unwrap()),
            phone: None,
            role: None,
        };

        let result = service.update(&UserId::new(), command).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_delete_passes_through() {
        let mut users = MockUsers::new();
        users.expect_delete().times(1).returning(|_| Ok(()));

        let service = CustomerService::new(Arc::new(users));
        service.delete(&UserId::new()).await.unwrap();
    }
}
