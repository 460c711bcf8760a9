use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{Role, UserRecord};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub roles: String, // JSON array, e.g. '["ROLE_ADMIN"]'
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::result::Entity")]
    Results,
}

impl Related<super::result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Results.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Decodes the stored role list. Every user holds `ROLE_USER`; unknown
/// role names are dropped.
pub fn decode_roles(raw: &str) -> Vec<Role> {
    let names: Vec<String> = serde_json::from_str(raw).unwrap_or_default();
    let mut roles: Vec<Role> = names.iter().filter_map(|n| Role::parse(n)).collect();
    if !roles.contains(&Role::User) {
        roles.insert(0, Role::User);
    }
    roles
}

pub fn encode_roles(roles: &[Role]) -> String {
    let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
    serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
}

impl From<Model> for UserRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            roles: decode_roles(&model.roles),
            email: model.email,
            password_hash: model.password_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_always_include_user() {
        assert_eq!(decode_roles(r#"["ROLE_ADMIN"]"#), vec![Role::User, Role::Admin]);
        assert_eq!(decode_roles("[]"), vec![Role::User]);
        assert_eq!(decode_roles("not json"), vec![Role::User]);
    }

    #[test]
    fn roles_encode_as_json_names() {
        assert_eq!(
            encode_roles(&[Role::User, Role::Admin]),
            r#"["ROLE_USER","ROLE_ADMIN"]"#
        );
    }
}
