//! Role-based access rules for owned results.

use serde::{Deserialize, Serialize};

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "ROLE_USER" => Some(Role::User),
            "ROLE_ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Authenticated identity behind a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: i32,
    pub email: String,
    pub roles: Vec<Role>,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Fails with `Forbidden` unless this caller may touch a result owned by `owner_id`.
    pub fn ensure_can_access(&self, owner_id: i32) -> Result<(), DomainError> {
        match authorize(self.id, &self.roles, owner_id) {
            AccessDecision::Granted => Ok(()),
            AccessDecision::Denied => Err(DomainError::Forbidden),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied,
}

/// Admins may access any result; everybody else only their own.
pub fn authorize(caller_id: i32, roles: &[Role], owner_id: i32) -> AccessDecision {
    if roles.contains(&Role::Admin) || caller_id == owner_id {
        AccessDecision::Granted
    } else {
        AccessDecision::Denied
    }
}

/// Which rows a caller sees in collection reads and aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Owner(i32),
}

pub fn visible_scope(caller: &Caller) -> Scope {
    if caller.is_admin() {
        Scope::All
    } else {
        Scope::Owner(caller.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(id: i32, roles: &[Role]) -> Caller {
        Caller {
            id,
            email: format!("user{id}@example.com"),
            roles: roles.to_vec(),
        }
    }

    #[test]
    fn owner_is_granted() {
        assert_eq!(authorize(7, &[Role::User], 7), AccessDecision::Granted);
    }

    #[test]
    fn other_user_is_denied() {
        assert_eq!(authorize(7, &[Role::User], 8), AccessDecision::Denied);
        assert_eq!(authorize(7, &[], 8), AccessDecision::Denied);
    }

    #[test]
    fn admin_is_granted_on_foreign_results() {
        assert_eq!(
            authorize(1, &[Role::User, Role::Admin], 8),
            AccessDecision::Granted
        );
    }

    #[test]
    fn ensure_can_access_maps_denial_to_forbidden() {
        let user = caller(2, &[Role::User]);
        assert!(user.ensure_can_access(2).is_ok());
        assert!(matches!(
            user.ensure_can_access(3),
            Err(DomainError::Forbidden)
        ));
    }

    #[test]
    fn scope_depends_on_admin_role() {
        assert_eq!(visible_scope(&caller(1, &[Role::Admin])), Scope::All);
        assert_eq!(visible_scope(&caller(4, &[Role::User])), Scope::Owner(4));
    }

    #[test]
    fn roles_parse_symfony_names() {
        assert_eq!(Role::parse("ROLE_ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse(" ROLE_USER "), Some(Role::User));
        assert_eq!(Role::parse("ROLE_ROOT"), None);
        assert_eq!(
            serde_json::to_string(&vec![Role::User, Role::Admin]).unwrap(),
            r#"["ROLE_USER","ROLE_ADMIN"]"#
        );
    }
}
