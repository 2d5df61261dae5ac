//! Users and role-based access

use almacen_errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Application role, mapped to a fixed permission set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Operator,
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Operator => "operator",
            Self::Viewer => "viewer",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "operator" => Ok(Self::Operator),
            "viewer" => Ok(Self::Viewer),
            other => Err(AppError::internal(format!("unknown role: {}", other))),
        }
    }

    /// Permissions granted to this role
    ///
    /// Roles are strictly nested: every role carries everything the role
    /// below it carries.
    pub fn permissions(&self) -> Vec<String> {
        let mut perms = vec![
            "inventory:read".to_string(),
            "catalog:read".to_string(),
        ];
        if matches!(self, Self::Operator | Self::Manager | Self::Admin) {
            perms.push("inventory:write".to_string());
        }
        if matches!(self, Self::Manager | Self::Admin) {
            perms.push("catalog:write".to_string());
            perms.push("audit:read".to_string());
        }
        if matches!(self, Self::Admin) {
            perms.push("users:manage".to_string());
        }
        perms
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: UserRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            UserRole::Admin,
            UserRole::Manager,
            UserRole::Operator,
            UserRole::Viewer,
        ] {
            assert_eq!(UserRole::parse(role.as_str()).unwrap(), role);
        }
        assert!(UserRole::parse("root").is_err());
    }

    #[test]
    fn test_roles_are_nested() {
        let viewer = UserRole::Viewer.permissions();
        let operator = UserRole::Operator.permissions();
        let manager = UserRole::Manager.permissions();
        let admin = UserRole::Admin.permissions();

        assert!(viewer.iter().all(|p| operator.contains(p)));
        assert!(operator.iter().all(|p| manager.contains(p)));
        assert!(manager.iter().all(|p| admin.contains(p)));

        assert!(!viewer.contains(&"inventory:write".to_string()));
        assert!(operator.contains(&"inventory:write".to_string()));
        assert!(!operator.contains(&"audit:read".to_string()));
        assert!(manager.contains(&"catalog:write".to_string()));
        assert!(admin.contains(&"users:manage".to_string()));
    }
}
