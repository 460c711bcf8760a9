//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::{DomainError, Role, UserRecord, UserRepository};
use crate::models::user::{self, encode_roles, ActiveModel, Entity as UserEntity};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<UserRecord>, DomainError> {
        let user = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(user.map(UserRecord::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError> {
        let user = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(user.map(UserRecord::from))
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        roles: Vec<Role>,
    ) -> Result<UserRecord, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = ActiveModel {
            email: Set(email),
            password_hash: Set(password_hash),
            roles: Set(encode_roles(&roles)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model.insert(&self.db).await?;
        Ok(inserted.into())
    }
}
