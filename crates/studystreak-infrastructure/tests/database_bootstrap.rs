use std::sync::Arc;

use studystreak_domain::streak::{StreakRecord, StreakRepository};
use studystreak_infrastructure::persistence::repositories::SqliteStreakRepository;
use studystreak_infrastructure::persistence::users::register_user;
use studystreak_infrastructure::persistence::Database;
use studystreak_domain::shared::{DomainError, UserId};

#[tokio::test]
async fn database_creates_file_and_runs_migrations() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("nested").join("streaks.db");

    let database = Database::new(&db_path).await.expect("open database");
    database.run_migrations().await.expect("migrate");
    // migrations are idempotent
    database.run_migrations().await.expect("migrate again");

    assert!(db_path.exists());

    let pool = Arc::new(database.pool().clone());
    let user_id = UserId::from_string("disk-user");
    register_user(&pool, &user_id, "disk@example.com", "Disk User")
        .await
        .expect("register");

    let repo = SqliteStreakRepository::new(pool);
    repo.save(&StreakRecord::new(user_id.clone()))
        .await
        .expect("save default record");

    let stored = repo.load(&user_id).await.expect("load").expect("stored");
    assert_eq!(stored.version(), 1);
    assert_eq!(stored.current_streak(), 0);
}

#[tokio::test]
async fn register_user_rejects_blank_email() {
    let dir = tempfile::tempdir().expect("temp dir");
    let database = Database::new(&dir.path().join("streaks.db"))
        .await
        .expect("open database");
    database.run_migrations().await.expect("migrate");

    let result = register_user(database.pool(), &UserId::from_string("u"), "  ", "U").await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
}
