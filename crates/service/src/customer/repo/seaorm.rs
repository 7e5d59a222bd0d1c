use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::customer::domain::{Customer, NewCustomer};
use crate::customer::errors::CustomerError;
use crate::customer::merge::{ChangeSet, Field};
use crate::customer::repository::CustomerRepository;

pub struct SeaOrmCustomerRepository {
    pub db: DatabaseConnection,
}

fn to_domain(m: models::customer::Model) -> Result<Customer, CustomerError> {
    let gender = m
        .gender
        .parse()
        .map_err(|e| CustomerError::Repository(format!("corrupt gender column: {e}")))?;
    Ok(Customer {
        id: m.id,
        name: m.name,
        email: m.email,
        password_hash: m.password_hash,
        age: m.age,
        gender,
        profile_image_id: m.profile_image_id,
    })
}

#[async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, CustomerError> {
        let rows = models::customer::Entity::find()
            .order_by_asc(models::customer::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CustomerError::Repository(e.to_string()))?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Customer>, CustomerError> {
        let row = models::customer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CustomerError::Repository(e.to_string()))?;
        row.map(to_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
        let row = models::customer::Entity::find()
            .filter(models::customer::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| CustomerError::Repository(e.to_string()))?;
        row.map(to_domain).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, CustomerError> {
        let count = models::customer::Entity::find()
            .filter(models::customer::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(|e| CustomerError::Repository(e.to_string()))?;
        Ok(count > 0)
    }

    async fn exists_by_id(&self, id: i32) -> Result<bool, CustomerError> {
        let count = models::customer::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(|e| CustomerError::Repository(e.to_string()))?;
        Ok(count > 0)
    }

    async fn insert(&self, customer: NewCustomer) -> Result<Customer, CustomerError> {
        let created = models::customer::create(
            &self.db,
            &customer.name,
            &customer.email,
            &customer.password_hash,
            customer.age,
            customer.gender.as_str(),
        )
        .await
        .map_err(|e| match e {
            models::errors::ModelError::Conflict(_) => {
                CustomerError::DuplicateEmail(customer.email.clone())
            }
            models::errors::ModelError::Validation(msg) => CustomerError::Validation(msg),
            other => CustomerError::Repository(other.to_string()),
        })?;
        to_domain(created)
    }

    async fn update_fields(
        &self,
        id: i32,
        merged: &Customer,
        changes: &ChangeSet,
    ) -> Result<(), CustomerError> {
        let mut am = models::customer::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        for field in changes.iter() {
            match field {
                Field::Name => am.name = Set(merged.name.clone()),
                Field::Email => am.email = Set(merged.email.clone()),
                Field::Age => am.age = Set(merged.age),
                Field::Gender => am.gender = Set(merged.gender.as_str().to_string()),
                Field::PasswordHash => am.password_hash = Set(merged.password_hash.clone()),
            }
        }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| match e.sql_err() {
            // A concurrent writer may have claimed the email between the
            // uniqueness pre-check and this write; the index is authoritative.
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                CustomerError::DuplicateEmail(merged.email.clone())
            }
            _ => CustomerError::Repository(e.to_string()),
        })?;
        Ok(())
    }

    async fn update_profile_image_id(
        &self,
        id: i32,
        profile_image_id: &str,
    ) -> Result<(), CustomerError> {
        models::customer::update_profile_image_id(&self.db, id, profile_image_id)
            .await
            .map_err(|e| CustomerError::Repository(e.to_string()))
    }

    async fn delete(&self, id: i32) -> Result<(), CustomerError> {
        models::customer::delete(&self.db, id)
            .await
            .map_err(|e| CustomerError::Repository(e.to_string()))
    }
}
