//! SeaORM implementation of ResultRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::{DomainError, ResultRecord, ResultRepository, ResultStats, Scope};
use crate::models::result::{self, ActiveModel, Entity as ResultEntity};

/// SeaORM-based implementation of ResultRepository
pub struct SeaOrmResultRepository {
    db: DatabaseConnection,
}

impl SeaOrmResultRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct StatsRow {
    count: i64,
    min: Option<i32>,
    max: Option<i32>,
    avg: Option<f64>,
}

impl From<StatsRow> for ResultStats {
    fn from(row: StatsRow) -> Self {
        let count = u64::try_from(row.count).unwrap_or_default();
        if count == 0 {
            return ResultStats::default();
        }
        ResultStats {
            count,
            min: row.min,
            max: row.max,
            avg: row.avg,
        }
    }
}

#[async_trait]
impl ResultRepository for SeaOrmResultRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<ResultRecord>, DomainError> {
        let result = ResultEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(ResultRecord::from))
    }

    async fn find_all(&self) -> Result<Vec<ResultRecord>, DomainError> {
        let results = ResultEntity::find()
            .order_by_asc(result::Column::Id)
            .all(&self.db)
            .await?;

        Ok(results.into_iter().map(ResultRecord::from).collect())
    }

    async fn find_by_owner(&self, user_id: i32) -> Result<Vec<ResultRecord>, DomainError> {
        let results = ResultEntity::find()
            .filter(result::Column::UserId.eq(user_id))
            .order_by_asc(result::Column::Id)
            .all(&self.db)
            .await?;

        Ok(results.into_iter().map(ResultRecord::from).collect())
    }

    async fn create(&self, user_id: i32, value: i32) -> Result<ResultRecord, DomainError> {
        let model = ActiveModel {
            value: Set(value),
            user_id: Set(user_id),
            ..Default::default()
        };

        let inserted = model.insert(&self.db).await?;
        Ok(inserted.into())
    }

    async fn update_value(&self, id: i32, value: i32) -> Result<ResultRecord, DomainError> {
        let existing = ResultEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut model = existing.into_active_model();
        model.value = Set(value);

        let updated = model.update(&self.db).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = ResultEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn stats(&self, scope: Scope) -> Result<ResultStats, DomainError> {
        let mut query = ResultEntity::find()
            .select_only()
            .column_as(result::Column::Id.count(), "count")
            .column_as(result::Column::Value.min(), "min")
            .column_as(result::Column::Value.max(), "max")
            .column_as(
                SimpleExpr::from(Func::avg(Expr::col(result::Column::Value))),
                "avg",
            );

        if let Scope::Owner(user_id) = scope {
            query = query.filter(result::Column::UserId.eq(user_id));
        }

        let row = query.into_model::<StatsRow>().one(&self.db).await?;
        Ok(row.map(ResultStats::from).unwrap_or_default())
    }
}
