//! In-memory repositories
//!
//! Fake stores with the same contract as the SeaORM ones, so handler logic
//! can run without a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    DomainError, ResultRecord, ResultRepository, ResultStats, Role, Scope, UserRecord,
    UserRepository,
};

struct Table<T> {
    next_id: i32,
    rows: BTreeMap<i32, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Default)]
pub struct InMemoryResultRepository {
    table: RwLock<Table<ResultRecord>>,
}

impl InMemoryResultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn visible(&self, scope: Scope) -> Vec<ResultRecord> {
        let table = self.table.read().await;
        table
            .rows
            .values()
            .filter(|r| match scope {
                Scope::All => true,
                Scope::Owner(user_id) => r.user_id == user_id,
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ResultRepository for InMemoryResultRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<ResultRecord>, DomainError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<ResultRecord>, DomainError> {
        Ok(self.visible(Scope::All).await)
    }

    async fn find_by_owner(&self, user_id: i32) -> Result<Vec<ResultRecord>, DomainError> {
        Ok(self.visible(Scope::Owner(user_id)).await)
    }

    async fn create(&self, user_id: i32, value: i32) -> Result<ResultRecord, DomainError> {
        let mut table = self.table.write().await;
        let record = ResultRecord {
            id: table.allocate_id(),
            value,
            user_id,
        };
        table.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_value(&self, id: i32, value: i32) -> Result<ResultRecord, DomainError> {
        let mut table = self.table.write().await;
        let record = table.rows.get_mut(&id).ok_or(DomainError::NotFound)?;
        record.value = value;
        Ok(record.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }

    async fn stats(&self, scope: Scope) -> Result<ResultStats, DomainError> {
        Ok(ResultStats::from_results(&self.visible(scope).await))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<UserRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<UserRecord>, DomainError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        roles: Vec<Role>,
    ) -> Result<UserRecord, DomainError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.email == email) {
            return Err(DomainError::Validation(format!(
                "email {email} is already registered"
            )));
        }

        let user = UserRecord {
            id: table.allocate_id(),
            email,
            password_hash,
            roles,
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }
}
