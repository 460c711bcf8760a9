//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::{DomainError, Role, Scope};

/// A stored Result: one integer value owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub id: i32,
    pub value: i32,
    pub user_id: i32,
}

/// Aggregates over a set of results. `min`, `max` and `avg` are `None`
/// whenever `count` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResultStats {
    pub count: u64,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub avg: Option<f64>,
}

impl ResultStats {
    /// Folds a slice of results into their aggregates.
    pub fn from_results(results: &[ResultRecord]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let values = results.iter().map(|r| r.value);
        let sum: i64 = values.clone().map(i64::from).sum();
        Self {
            count: results.len() as u64,
            min: values.clone().min(),
            max: values.max(),
            avg: Some(sum as f64 / results.len() as f64),
        }
    }
}

/// Identity record of an API user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

/// Repository trait for Result entity
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Find a single result by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<ResultRecord>, DomainError>;

    /// Find every stored result, ordered by ID
    async fn find_all(&self) -> Result<Vec<ResultRecord>, DomainError>;

    /// Find the results owned by one user, ordered by ID
    async fn find_by_owner(&self, user_id: i32) -> Result<Vec<ResultRecord>, DomainError>;

    /// Create a new result owned by `user_id`
    async fn create(&self, user_id: i32, value: i32) -> Result<ResultRecord, DomainError>;

    /// Replace the value of an existing result
    async fn update_value(&self, id: i32, value: i32) -> Result<ResultRecord, DomainError>;

    /// Delete a result by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Aggregate count/min/max/avg over the results in `scope`
    async fn stats(&self, scope: Scope) -> Result<ResultStats, DomainError>;
}

/// Repository trait for User entity
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<UserRecord>, DomainError>;

    /// Find a user by login email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError>;

    /// Create a new user from an already hashed password
    async fn create(
        &self,
        email: String,
        password_hash: String,
        roles: Vec<Role>,
    ) -> Result<UserRecord, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i32, value: i32) -> ResultRecord {
        ResultRecord { id, value, user_id: 1 }
    }

    #[test]
    fn stats_of_empty_set_has_only_count() {
        let stats = ResultStats::from_results(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.min.is_none());
        assert!(stats.max.is_none());
        assert!(stats.avg.is_none());
    }

    #[test]
    fn stats_aggregate_values() {
        let stats = ResultStats::from_results(&[record(1, 4), record(2, -2), record(3, 10)]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, Some(-2));
        assert_eq!(stats.max, Some(10));
        assert_eq!(stats.avg, Some(4.0));
    }

    #[test]
    fn stats_average_does_not_overflow() {
        let stats = ResultStats::from_results(&[record(1, i32::MAX), record(2, i32::MAX)]);
        assert_eq!(stats.avg, Some(i32::MAX as f64));
    }
}
