// OpenAPI IAM endpoints (users and roles)

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::openapi::fiql_eq;
use crate::openapi::models::{RoleRecord, UserRecord};

const USERS: &str = "/cloudapi/1.0.0/users";
const USER: &str = "/cloudapi/1.0.0/users/{userId}";
const ROLES: &str = "/cloudapi/1.0.0/roles";

impl ApiClient {
    /// `GET /cloudapi/1.0.0/users` (all pages)
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, Error> {
        self.get_all_pages(USERS, None).await
    }

    /// `GET /cloudapi/1.0.0/users/{userId}`
    pub async fn get_user(&self, user_id: &str) -> Result<UserRecord, Error> {
        self.get(&interpolate(USER, &[("userId", user_id)])).await
    }

    pub async fn get_user_by_name(&self, username: &str) -> Result<UserRecord, Error> {
        self.get_all_pages::<UserRecord>(USERS, Some(&fiql_eq("username", username)))
            .await?
            .into_iter()
            .find(|user| user.username == username)
            .ok_or_else(|| Error::NotFound {
                path: USERS.to_owned(),
                message: format!("user {username} not found"),
            })
    }

    /// `POST /cloudapi/1.0.0/users`
    pub async fn create_user(&self, user: &UserRecord) -> Result<UserRecord, Error> {
        debug!(username = %user.username, provider = %user.provider_type, "creating user");
        self.post(USERS, user).await
    }

    /// `PUT /cloudapi/1.0.0/users/{userId}`
    pub async fn update_user(&self, user_id: &str, user: &UserRecord) -> Result<UserRecord, Error> {
        debug!(user_id, "updating user");
        self.put(&interpolate(USER, &[("userId", user_id)]), user)
            .await
    }

    /// `DELETE /cloudapi/1.0.0/users/{userId}?takeOwnership=<bool>`
    pub async fn delete_user(&self, user_id: &str, take_ownership: bool) -> Result<(), Error> {
        debug!(user_id, take_ownership, "deleting user");
        let path = interpolate(USER, &[("userId", user_id)]);
        self.delete_task(&path, &[("takeOwnership", take_ownership.to_string())])
            .await
            .map(|_| ())
    }

    /// Resolve a role by exact name.
    ///
    /// `GET /cloudapi/1.0.0/roles?filter=name==<name>`
    pub async fn get_role_by_name(&self, name: &str) -> Result<RoleRecord, Error> {
        self.get_all_pages::<RoleRecord>(ROLES, Some(&fiql_eq("name", name)))
            .await?
            .into_iter()
            .find(|role| role.name == name)
            .ok_or_else(|| Error::NotFound {
                path: ROLES.to_owned(),
                message: format!("role {name} not found"),
            })
    }
}
