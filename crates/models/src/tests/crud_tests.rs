use crate::{customer, db::connect};
use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::test]
async fn test_customer_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip: database not configured");
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("crud_{}@example.com", Uuid::new_v4());
    let created = customer::create(&db, "Luna", &email, "$argon2$stub", 23, "MALE").await?;
    assert!(created.id > 0);
    assert_eq!(created.email, email);
    assert_eq!(created.profile_image_id, None);

    // Read back by email
    let found = customer::Entity::find()
        .filter(customer::Column::Email.eq(email.clone()))
        .one(&db)
        .await?;
    assert_eq!(found.as_ref().map(|c| c.id), Some(created.id));

    // Point at an uploaded image
    customer::update_profile_image_id(&db, created.id, "img-123").await?;
    let found = customer::Entity::find_by_id(created.id).one(&db).await?.unwrap();
    assert_eq!(found.profile_image_id.as_deref(), Some("img-123"));

    // Delete
    customer::delete(&db, created.id).await?;
    let gone = customer::Entity::find_by_id(created.id).one(&db).await?;
    assert!(gone.is_none());
    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_rejected_by_unique_index() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip: database not configured");
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("dup_{}@example.com", Uuid::new_v4());
    let first = customer::create(&db, "Luna", &email, "$argon2$stub", 23, "MALE").await?;
    let second = customer::create(&db, "Sola", &email, "$argon2$stub", 24, "FEMALE").await;
    assert!(second.is_err());

    customer::delete(&db, first.id).await?;
    Ok(())
}

#[tokio::test]
async fn test_create_validates_input() -> Result<()> {
    assert!(customer::validate_email("no-at-sign").is_err());
    assert!(customer::validate_name("  ").is_err());
    assert!(customer::validate_email("luna@dev.com").is_ok());
    assert!(customer::validate_name("Luna").is_ok());
    Ok(())
}
