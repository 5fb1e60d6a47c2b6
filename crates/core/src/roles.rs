//! Roles and the static role → permission table.
//!
//! Role IDs must match the seed data in `20260301000001_create_roles_and_users.sql`.
//! Access checks are plain lookups: there is no role hierarchy or inheritance,
//! every role's capabilities are spelled out in [`has_permission`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// One of the four account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Supervisor,
    Operator,
    Client,
}

impl Role {
    /// All roles in seed order.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Supervisor, Role::Operator, Role::Client];

    /// The wire/database name (`"ADMIN"`, `"SUPERVISOR"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Supervisor => "SUPERVISOR",
            Role::Operator => "OPERATOR",
            Role::Client => "CLIENT",
        }
    }

    /// The `roles.id` this role was seeded with.
    pub fn id(self) -> DbId {
        match self {
            Role::Admin => 1,
            Role::Supervisor => 2,
            Role::Operator => 3,
            Role::Client => 4,
        }
    }

    /// Resolve a `roles.id` back to a role.
    pub fn from_id(id: DbId) -> Result<Self, CoreError> {
        Role::ALL
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| CoreError::Internal(format!("Unknown role id {id}")))
    }

    /// Parse a wire name such as `"OPERATOR"`.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == name)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid role '{name}'. Must be one of: ADMIN, SUPERVISOR, OPERATOR, CLIENT"
                ))
            })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_name(s)
    }
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

/// A single capability that can be granted to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    AccessDashboard,
    AccessLeads,
    AccessClients,
    AccessProperties,
    AccessClaims,
    AccessAnalytics,
    AccessSettings,
    ManageUsers,
    DeleteUsers,
    EditAllClaims,
    /// See every lead rather than only the ones assigned to you.
    ViewAllLeads,
    DeleteLeads,
    /// Create and delete client profiles.
    ManageClients,
    /// Create and edit products, and assign them to clients.
    ManageProducts,
    DeleteProducts,
    DeleteClaims,
}

/// Look up whether `role` holds `permission`.
pub fn has_permission(role: Role, permission: Permission) -> bool {
    use Permission::*;

    match role {
        Role::Admin => true,
        Role::Supervisor => !matches!(
            permission,
            DeleteUsers | ManageClients | DeleteProducts
        ),
        Role::Operator => matches!(
            permission,
            AccessDashboard
                | AccessLeads
                | AccessClients
                | AccessProperties
                | AccessClaims
                | AccessSettings
                | ManageUsers
        ),
        Role::Client => matches!(permission, AccessClaims | AccessSettings),
    }
}

/// Require a permission, producing a 403-style error otherwise.
pub fn require_permission(role: Role, permission: Permission) -> Result<(), CoreError> {
    if has_permission(role, permission) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role {role} is not allowed to perform this action"
        )))
    }
}

/// The full permission row for a role, as exposed to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionSet {
    pub can_access_dashboard: bool,
    pub can_access_leads: bool,
    pub can_access_clients: bool,
    pub can_access_properties: bool,
    pub can_access_claims: bool,
    pub can_access_analytics: bool,
    pub can_access_settings: bool,
    pub can_manage_users: bool,
    pub can_delete_users: bool,
    pub can_edit_all_claims: bool,
}

/// Build the [`PermissionSet`] for a role.
pub fn permission_set(role: Role) -> PermissionSet {
    use Permission::*;

    PermissionSet {
        can_access_dashboard: has_permission(role, AccessDashboard),
        can_access_leads: has_permission(role, AccessLeads),
        can_access_clients: has_permission(role, AccessClients),
        can_access_properties: has_permission(role, AccessProperties),
        can_access_claims: has_permission(role, AccessClaims),
        can_access_analytics: has_permission(role, AccessAnalytics),
        can_access_settings: has_permission(role, AccessSettings),
        can_manage_users: has_permission(role, ManageUsers),
        can_delete_users: has_permission(role, DeleteUsers),
        can_edit_all_claims: has_permission(role, EditAllClaims),
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// Map a UI page route to the permission guarding it.
fn route_permission(route: &str) -> Option<Permission> {
    let permission = match route {
        "/dashboard" => Permission::AccessDashboard,
        "/leads" => Permission::AccessLeads,
        "/clients" => Permission::AccessClients,
        "/products" => Permission::AccessProperties,
        "/claims" => Permission::AccessClaims,
        "/analytics" => Permission::AccessAnalytics,
        "/settings" => Permission::AccessSettings,
        "/users" => Permission::ManageUsers,
        _ => return None,
    };
    Some(permission)
}

/// Whether `role` may open the page at `route`. Unknown routes are denied.
pub fn can_access_route(role: Role, route: &str) -> bool {
    route_permission(route).is_some_and(|p| has_permission(role, p))
}

/// Landing page after login.
pub fn default_route(role: Role) -> &'static str {
    match role {
        Role::Client => "/claims",
        _ => "/dashboard",
    }
}

/// Whether `actor` may create a user holding `target`.
///
/// Nobody can create another ADMIN through the API.
pub fn can_create_role(actor: Role, target: Role) -> bool {
    match actor {
        Role::Admin => matches!(target, Role::Supervisor | Role::Operator | Role::Client),
        Role::Supervisor => matches!(target, Role::Operator | Role::Client),
        Role::Operator => target == Role::Client,
        Role::Client => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn role_ids_match_seed_data() {
        assert_eq!(Role::Admin.id(), 1);
        assert_eq!(Role::Supervisor.id(), 2);
        assert_eq!(Role::Operator.id(), 3);
        assert_eq!(Role::Client.id(), 4);
        for role in Role::ALL {
            assert_eq!(Role::from_id(role.id()).unwrap(), role);
        }
        assert!(Role::from_id(99).is_err());
    }

    #[test]
    fn role_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_matches!("admin".parse::<Role>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn role_serializes_as_screaming_case() {
        let json = serde_json::to_string(&Role::Supervisor).unwrap();
        assert_eq!(json, "\"SUPERVISOR\"");
    }

    #[test]
    fn admin_has_every_permission() {
        let set = permission_set(Role::Admin);
        assert!(set.can_delete_users);
        assert!(set.can_edit_all_claims);
        assert!(has_permission(Role::Admin, Permission::ManageClients));
    }

    #[test]
    fn supervisor_cannot_delete_users() {
        assert!(has_permission(Role::Supervisor, Permission::ManageUsers));
        assert!(!has_permission(Role::Supervisor, Permission::DeleteUsers));
        assert!(has_permission(Role::Supervisor, Permission::AccessAnalytics));
        assert!(has_permission(Role::Supervisor, Permission::DeleteLeads));
        assert!(!has_permission(Role::Supervisor, Permission::DeleteProducts));
    }

    #[test]
    fn operator_is_scoped() {
        assert!(has_permission(Role::Operator, Permission::AccessLeads));
        assert!(!has_permission(Role::Operator, Permission::AccessAnalytics));
        assert!(!has_permission(Role::Operator, Permission::ViewAllLeads));
        assert!(!has_permission(Role::Operator, Permission::EditAllClaims));
        assert!(!has_permission(Role::Operator, Permission::DeleteLeads));
    }

    #[test]
    fn client_only_sees_claims_and_settings() {
        let set = permission_set(Role::Client);
        assert!(set.can_access_claims);
        assert!(set.can_access_settings);
        assert!(!set.can_access_dashboard);
        assert!(!set.can_access_leads);
        assert!(!set.can_manage_users);
    }

    #[test]
    fn require_permission_is_forbidden_error() {
        assert!(require_permission(Role::Admin, Permission::DeleteUsers).is_ok());
        assert_matches!(
            require_permission(Role::Client, Permission::ManageUsers),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn route_access_follows_permissions() {
        assert!(can_access_route(Role::Admin, "/users"));
        assert!(can_access_route(Role::Operator, "/leads"));
        assert!(!can_access_route(Role::Operator, "/analytics"));
        assert!(can_access_route(Role::Client, "/claims"));
        assert!(!can_access_route(Role::Client, "/dashboard"));
    }

    #[test]
    fn unknown_route_is_denied() {
        assert!(!can_access_route(Role::Admin, "/nowhere"));
        assert!(!can_access_route(Role::Admin, ""));
    }

    #[test]
    fn default_route_per_role() {
        assert_eq!(default_route(Role::Client), "/claims");
        assert_eq!(default_route(Role::Admin), "/dashboard");
        assert_eq!(default_route(Role::Operator), "/dashboard");
    }

    #[test]
    fn role_creation_hierarchy() {
        assert!(can_create_role(Role::Admin, Role::Supervisor));
        assert!(!can_create_role(Role::Admin, Role::Admin));
        assert!(can_create_role(Role::Supervisor, Role::Operator));
        assert!(!can_create_role(Role::Supervisor, Role::Supervisor));
        assert!(can_create_role(Role::Operator, Role::Client));
        assert!(!can_create_role(Role::Operator, Role::Operator));
        for target in Role::ALL {
            assert!(!can_create_role(Role::Client, target));
        }
    }
}
