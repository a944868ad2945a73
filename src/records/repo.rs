use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A user-owned dashboard record. `owner_id` is set once at creation and
/// never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i32,
    pub father: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Record {
    /// All records owned by `owner_id`, newest first.
    pub async fn list_by_owner(db: &PgPool, owner_id: Uuid) -> anyhow::Result<Vec<Record>> {
        let rows = sqlx::query_as::<_, Record>(
            r#"
            SELECT id, owner_id, name, email, phone, age, father, created_at, updated_at
            FROM records
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Lookup without an owner predicate; callers check ownership after
    /// existence so the two failures stay distinguishable.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Record>> {
        let rec = sqlx::query_as::<_, Record>(
            r#"
            SELECT id, owner_id, name, email, phone, age, father, created_at, updated_at
            FROM records
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(rec)
    }

    pub async fn create(
        db: &PgPool,
        owner_id: Uuid,
        name: &str,
        email: &str,
        phone: &str,
        age: i32,
        father: &str,
    ) -> anyhow::Result<Record> {
        let rec = sqlx::query_as::<_, Record>(
            r#"
            INSERT INTO records (owner_id, name, email, phone, age, father)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, name, email, phone, age, father, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(age)
        .bind(father)
        .fetch_one(db)
        .await?;
        Ok(rec)
    }

    /// Replaces every editable field in one statement; id and owner are left
    /// untouched.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        email: &str,
        phone: &str,
        age: i32,
        father: &str,
    ) -> anyhow::Result<Record> {
        let rec = sqlx::query_as::<_, Record>(
            r#"
            UPDATE records
            SET name = $2, email = $3, phone = $4, age = $5, father = $6, updated_at = now()
            WHERE id = $1
            RETURNING id, owner_id, name, email, phone, age, father, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(age)
        .bind(father)
        .fetch_one(db)
        .await?;
        Ok(rec)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM records WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Bulk delete scoped to the owner. Ids that do not exist or belong to
    /// another user fall outside the predicate and are skipped silently; the
    /// returned count is what was actually removed.
    pub async fn delete_many(db: &PgPool, owner_id: Uuid, ids: &[Uuid]) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM records WHERE id = ANY($1) AND owner_id = $2")
            .bind(ids)
            .bind(owner_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
