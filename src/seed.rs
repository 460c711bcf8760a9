use crate::auth::hash_password;
use crate::domain::Role;
use crate::models::user::encode_roles;
use crate::models::{result, user};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

pub const DEMO_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEMO_USER_EMAIL: &str = "user@example.com";

const DEMO_VALUES: [i32; 3] = [42, 7, -3];

fn demo_user(email: &str, password: &str, roles: &[Role]) -> Result<user::ActiveModel, DbErr> {
    let password_hash = hash_password(password).map_err(DbErr::Custom)?;
    let now = chrono::Utc::now().to_rfc3339();

    Ok(user::ActiveModel {
        email: Set(email.to_owned()),
        password_hash: Set(password_hash),
        roles: Set(encode_roles(roles)),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    })
}

/// Seeds an admin (password `admin`) and a regular user (password `user`)
/// owning a few results. Safe to run repeatedly.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let users = [
        demo_user(DEMO_ADMIN_EMAIL, "admin", &[Role::User, Role::Admin])?,
        demo_user(DEMO_USER_EMAIL, "user", &[Role::User])?,
    ];

    for model in users {
        user::Entity::insert(model)
            .on_conflict(OnConflict::column(user::Column::Email).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
    }

    let owner = user::Entity::find()
        .filter(user::Column::Email.eq(DEMO_USER_EMAIL))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(DEMO_USER_EMAIL.to_owned()))?;

    let existing = result::Entity::find()
        .filter(result::Column::UserId.eq(owner.id))
        .count(db)
        .await?;

    if existing == 0 {
        let results = DEMO_VALUES.iter().map(|value| result::ActiveModel {
            value: Set(*value),
            user_id: Set(owner.id),
            ..Default::default()
        });
        result::Entity::insert_many(results).exec(db).await?;
        tracing::debug!("Seeded {} results for {}", DEMO_VALUES.len(), DEMO_USER_EMAIL);
    }

    Ok(())
}
