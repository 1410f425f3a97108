use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use studystreak_domain::shared::UserId;
use studystreak_infrastructure::persistence::users::register_user;

/// In-memory database with migrations applied. A single connection keeps
/// every query on the same in-memory database.
pub async fn setup_in_memory_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    pool
}

#[allow(dead_code)]
pub async fn insert_user(pool: &SqlitePool, id: &str, name: &str) -> UserId {
    let user_id = UserId::from_string(id);
    register_user(pool, &user_id, &format!("{}@example.com", id), name)
        .await
        .expect("insert user");
    user_id
}
