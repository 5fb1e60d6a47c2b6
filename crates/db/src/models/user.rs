//! User entity model and DTOs.

use nexus_core::error::CoreError;
use nexus_core::roles::Role;
use nexus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role_id: DbId,
    pub supervisor_id: Option<DbId>,
    pub theme: String,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub sms_notifications: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Resolve `role_id` to a [`Role`].
    pub fn role(&self) -> Result<Role, CoreError> {
        Role::from_id(self.role_id)
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub supervisor_id: Option<DbId>,
    pub theme: String,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub sms_notifications: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl TryFrom<User> for UserResponse {
    type Error = CoreError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            role: user.role()?,
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            supervisor_id: user.supervisor_id,
            theme: user.theme,
            email_notifications: user.email_notifications,
            push_notifications: user.push_notifications,
            sms_notifications: user.sms_notifications,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        })
    }
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role_id: DbId,
    pub supervisor_id: Option<DbId>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role_id: Option<DbId>,
    pub supervisor_id: Option<DbId>,
    pub theme: Option<String>,
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
}
