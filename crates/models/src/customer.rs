use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, Set, SqlErr};
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: i32,
    pub gender: String,
    pub profile_image_id: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if !email.contains('@') {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    Ok(())
}

/// Insert a new customer row; the database assigns the id.
pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password_hash: &str,
    age: i32,
    gender: &str,
) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    validate_name(name)?;
    if password_hash.trim().is_empty() {
        return Err(errors::ModelError::Validation("password hash required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        age: Set(age),
        gender: Set(gender.to_string()),
        profile_image_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        // The unique index on email is the serialization point for
        // concurrent duplicate registrations; surface it distinctly.
        Some(SqlErr::UniqueConstraintViolation(msg)) => errors::ModelError::Conflict(msg),
        _ => errors::ModelError::Db(e.to_string()),
    })
}

/// Point the customer row at the latest uploaded image.
pub async fn update_profile_image_id(
    db: &DatabaseConnection,
    id: i32,
    profile_image_id: &str,
) -> Result<(), errors::ModelError> {
    let found: Model = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("customer not found".into()))?;
    let mut am: ActiveModel = found.into();
    am.profile_image_id = Set(Some(profile_image_id.to_string()));
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
