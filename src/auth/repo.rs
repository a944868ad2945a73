use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// Combined uniqueness lookup used by registration; email and username
    /// are matched exactly as stored.
    pub async fn find_by_email_or_username(
        db: &PgPool,
        email: &str,
        username: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, username, password_hash, created_at
            FROM users
            WHERE email = $1 OR username = $2
            "#,
        )
        .bind(email)
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, username, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with an already-hashed password.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, username, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, username, password_hash, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
