// ── IAM users ──
//
// Local (INTEGRATED) and SAML users of the organization. Every change is a
// read-modify-write of the server record so that attributes the SDK does not
// model survive.

use std::sync::LazyLock;

use cloudavenue_api::openapi::models::{EntityRef, UserRecord};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::Client;
use crate::error::{ApiResultExt, CoreError};
use crate::urn::{self, UrnKind};
use crate::validate;

pub const MIN_PASSWORD_LEN: usize = 6;

const PROVIDER_INTEGRATED: &str = "INTEGRATED";
const PROVIDER_SAML: &str = "SAML";

static USER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^A-Z\s]+$").expect("valid user name regex"));

/// Attributes shared by every user variant. A quota of 0 means unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSpec {
    pub name: String,
    pub role_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub deployed_vm_quota: u32,
    #[serde(default)]
    pub stored_vm_quota: u32,
}

fn enabled_default() -> bool {
    true
}

impl UserSpec {
    pub fn new(name: impl Into<String>, role_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role_name: role_name.into(),
            description: String::new(),
            full_name: String::new(),
            email: String::new(),
            telephone: String::new(),
            enabled: true,
            deployed_vm_quota: 0,
            stored_vm_quota: 0,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.is_empty() {
            return Err(CoreError::empty("user name"));
        }
        if !USER_NAME.is_match(&self.name) {
            return Err(CoreError::invalid(
                "user name",
                format!("{} must not contain uppercase letters or whitespace", self.name),
            ));
        }
        if self.role_name.is_empty() {
            return Err(CoreError::empty("role name"));
        }
        if !self.email.is_empty() && !validate::is_email(&self.email) {
            return Err(CoreError::invalid(
                "email",
                format!("{} is not an e-mail address", self.email),
            ));
        }
        Ok(())
    }
}

/// A user to create.
#[derive(Debug, Clone)]
pub enum NewUser {
    Local { user: UserSpec, password: SecretString },
    Saml { user: UserSpec },
}

impl NewUser {
    fn spec(&self) -> &UserSpec {
        match self {
            Self::Local { user, .. } | Self::Saml { user } => user,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.spec().validate()?;
        if let Self::Local { password, .. } = self {
            validate_password(password)?;
        }
        Ok(())
    }
}

fn validate_password(password: &SecretString) -> Result<(), CoreError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::invalid(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

/// A user as stored on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role_name: String,
    pub description: String,
    pub full_name: String,
    pub email: String,
    pub telephone: String,
    pub enabled: bool,
    pub locked: bool,
    pub provider_type: String,
    pub is_external: bool,
    pub deployed_vm_quota: u32,
    pub stored_vm_quota: u32,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            name: record.username,
            role_name: record
                .role_entity_refs
                .into_iter()
                .next()
                .map(|r| r.name)
                .unwrap_or_default(),
            description: record.description,
            full_name: record.full_name,
            email: record.email,
            telephone: record.telephone,
            enabled: record.enabled,
            locked: record.locked,
            provider_type: record.provider_type,
            is_external: record.is_external,
            deployed_vm_quota: record.deployed_vm_quota,
            stored_vm_quota: record.stored_vm_quota,
        }
    }
}

pub struct Users {
    client: Client,
}

impl Client {
    pub fn users(&self) -> Users {
        Users {
            client: self.clone(),
        }
    }
}

impl Users {
    pub async fn list(&self) -> Result<Vec<User>, CoreError> {
        Ok(self
            .client
            .api()
            .list_users()
            .await
            .on("list users")?
            .into_iter()
            .map(User::from)
            .collect())
    }

    pub async fn get(&self, name_or_urn: &str) -> Result<User, CoreError> {
        self.record(name_or_urn).await.map(User::from)
    }

    pub async fn create(&self, new: NewUser) -> Result<User, CoreError> {
        new.validate()?;
        let spec = new.spec();
        let role = self.role(&spec.role_name).await?;

        let mut record = UserRecord::default();
        apply_spec(&mut record, spec, role);
        match &new {
            NewUser::Local { password, .. } => {
                record.provider_type = PROVIDER_INTEGRATED.into();
                record.is_external = false;
                record.password = Some(password.expose_secret().to_owned());
            }
            NewUser::Saml { .. } => {
                record.provider_type = PROVIDER_SAML.into();
                record.is_external = true;
            }
        }

        let created = self
            .client
            .api()
            .create_user(&record)
            .await
            .on("create user")?;
        info!(user = %created.username, provider = %created.provider_type, "user created");
        Ok(User::from(created))
    }

    /// Overwrite the modeled attributes of an existing user.
    pub async fn update(&self, name_or_urn: &str, spec: &UserSpec) -> Result<User, CoreError> {
        spec.validate()?;
        let mut record = self.record(name_or_urn).await?;
        let role = self.role(&spec.role_name).await?;
        apply_spec(&mut record, spec, role);
        self.write(record, "update user").await
    }

    pub async fn enable(&self, name_or_urn: &str) -> Result<User, CoreError> {
        let mut record = self.record(name_or_urn).await?;
        record.enabled = true;
        self.write(record, "enable user").await
    }

    pub async fn disable(&self, name_or_urn: &str) -> Result<User, CoreError> {
        let mut record = self.record(name_or_urn).await?;
        record.enabled = false;
        self.write(record, "disable user").await
    }

    pub async fn unlock(&self, name_or_urn: &str) -> Result<User, CoreError> {
        let mut record = self.record(name_or_urn).await?;
        record.locked = false;
        self.write(record, "unlock user").await
    }

    /// Set a new password on a local user.
    pub async fn change_password(
        &self,
        name_or_urn: &str,
        password: &SecretString,
    ) -> Result<(), CoreError> {
        validate_password(password)?;
        let mut record = self.record(name_or_urn).await?;
        if record.provider_type == PROVIDER_SAML {
            return Err(CoreError::Rejected {
                message: format!("{} is a SAML user without a local password", record.username),
            });
        }
        record.password = Some(password.expose_secret().to_owned());
        self.write(record, "change user password").await?;
        Ok(())
    }

    /// Delete a user; with `take_ownership` the caller inherits its objects.
    pub async fn delete(&self, name_or_urn: &str, take_ownership: bool) -> Result<(), CoreError> {
        let record = self.record(name_or_urn).await?;
        let id = record
            .id
            .ok_or_else(|| CoreError::not_found("user", name_or_urn))?;
        self.client
            .api()
            .delete_user(&id, take_ownership)
            .await
            .on("delete user")?;
        info!(user = %record.username, take_ownership, "user deleted");
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn record(&self, name_or_urn: &str) -> Result<UserRecord, CoreError> {
        if name_or_urn.is_empty() {
            return Err(CoreError::empty("user name or id"));
        }
        let api = self.client.api();
        let result = if urn::is_kind(name_or_urn, UrnKind::User) {
            api.get_user(name_or_urn).await
        } else {
            api.get_user_by_name(name_or_urn).await
        };
        result.map_err(|e| {
            if e.is_not_found() {
                CoreError::not_found("user", name_or_urn)
            } else {
                CoreError::from(e)
            }
        })
    }

    async fn role(&self, name: &str) -> Result<EntityRef, CoreError> {
        let role = self.client.api().get_role_by_name(name).await.map_err(|e| {
            if e.is_not_found() {
                CoreError::not_found("role", name)
            } else {
                CoreError::from(e)
            }
        })?;
        Ok(EntityRef {
            id: role.id,
            name: role.name,
        })
    }

    /// PUT a modified record. `id`, `href`, `providerType` and `isExternal`
    /// are whatever the server returned.
    async fn write(&self, record: UserRecord, operation: &str) -> Result<User, CoreError> {
        let id = record
            .id
            .clone()
            .ok_or_else(|| CoreError::empty("user id"))?;
        let updated = self
            .client
            .api()
            .update_user(&id, &record)
            .await
            .on(operation)?;
        info!(user = %updated.username, operation, "user updated");
        Ok(User::from(updated))
    }
}

fn apply_spec(record: &mut UserRecord, spec: &UserSpec, role: EntityRef) {
    record.username.clone_from(&spec.name);
    record.role_entity_refs = vec![role];
    record.description.clone_from(&spec.description);
    record.full_name.clone_from(&spec.full_name);
    record.email.clone_from(&spec.email);
    record.telephone.clone_from(&spec.telephone);
    record.enabled = spec.enabled;
    record.deployed_vm_quota = spec.deployed_vm_quota;
    record.stored_vm_quota = spec.stored_vm_quota;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_names_reject_uppercase_and_whitespace() {
        assert!(UserSpec::new("jane.doe", "Organization Administrator").validate().is_ok());
        assert!(UserSpec::new("Jane", "r").validate().is_err());
        assert!(UserSpec::new("jane doe", "r").validate().is_err());
        assert!(matches!(
            UserSpec::new("", "r").validate(),
            Err(CoreError::Empty { .. })
        ));
    }

    #[test]
    fn role_and_email_are_checked() {
        assert!(UserSpec::new("jane", "").validate().is_err());
        let mut spec = UserSpec::new("jane", "r");
        spec.email = "nope".into();
        assert!(spec.validate().is_err());
        spec.email = "jane@example.com".into();
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn local_users_need_a_long_enough_password() {
        let short = NewUser::Local {
            user: UserSpec::new("jane", "r"),
            password: SecretString::from("12345".to_owned()),
        };
        assert!(short.validate().is_err());
        let ok = NewUser::Local {
            user: UserSpec::new("jane", "r"),
            password: SecretString::from("123456".to_owned()),
        };
        assert!(ok.validate().is_ok());
        let saml = NewUser::Saml {
            user: UserSpec::new("jane", "r"),
        };
        assert!(saml.validate().is_ok());
    }
}
