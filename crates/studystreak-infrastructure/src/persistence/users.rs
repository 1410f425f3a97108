use sqlx::SqlitePool;
use studystreak_domain::shared::{DomainError, UserId};

use super::ResultExt;

/// Insert or refresh a row in the platform's `users` table.
///
/// User management lives outside the streak engine; this exists so that
/// local databases and tests can be seeded.
pub async fn register_user(
    pool: &SqlitePool,
    user_id: &UserId,
    email: &str,
    full_name: &str,
) -> Result<(), DomainError> {
    if email.trim().is_empty() {
        return Err(DomainError::Validation("Email cannot be empty".to_string()));
    }

    sqlx::query(
        r#"
        INSERT INTO users (id, email, full_name)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(id) DO UPDATE SET email = excluded.email, full_name = excluded.full_name
        "#,
    )
    .bind(user_id.as_str())
    .bind(email)
    .bind(full_name)
    .execute(pool)
    .await
    .to_repo_err()?;

    Ok(())
}
