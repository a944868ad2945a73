use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, FieldError},
    records::{
        dto::{AckResponse, DeleteManyRequest, DeleteManyResponse, RecordPayload},
        repo::Record,
    },
    state::AppState,
    validate,
};

pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/records", get(list_records).post(create_record))
        .route("/records/delete-multiple", post(delete_multiple))
        .route(
            "/records/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
}

#[instrument(skip(state))]
pub async fn list_records(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = Record::list_by_owner(&state.db, user_id).await?;
    Ok(Json(records))
}

#[instrument(skip(state, payload))]
pub async fn create_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RecordPayload>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    validate::validate_record(&payload)?;
    let rec = Record::create(
        &state.db,
        user_id,
        payload.name.trim(),
        payload.email.trim(),
        payload.phone.trim(),
        payload.age as i32,
        payload.father.trim(),
    )
    .await?;
    info!(record_id = %rec.id, owner_id = %user_id, "record created");
    Ok((StatusCode::CREATED, Json(rec)))
}

#[instrument(skip(state))]
pub async fn get_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Record>, ApiError> {
    let rec = find_owned(&state.db, id, user_id).await?;
    Ok(Json(rec))
}

#[instrument(skip(state, payload))]
pub async fn update_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPayload>,
) -> Result<Json<Record>, ApiError> {
    validate::validate_record(&payload)?;
    find_owned(&state.db, id, user_id).await?;
    let rec = Record::update(
        &state.db,
        id,
        payload.name.trim(),
        payload.email.trim(),
        payload.phone.trim(),
        payload.age as i32,
        payload.father.trim(),
    )
    .await?;
    info!(record_id = %rec.id, owner_id = %user_id, "record updated");
    Ok(Json(rec))
}

#[instrument(skip(state))]
pub async fn delete_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AckResponse>, ApiError> {
    find_owned(&state.db, id, user_id).await?;
    Record::delete(&state.db, id).await?;
    info!(record_id = %id, owner_id = %user_id, "record deleted");
    Ok(Json(AckResponse {
        message: "Record removed",
    }))
}

#[instrument(skip(state, payload))]
pub async fn delete_multiple(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<DeleteManyRequest>,
) -> Result<Json<DeleteManyResponse>, ApiError> {
    if payload.ids.is_empty() {
        return Err(ApiError::Validation(vec![FieldError {
            field: "ids",
            message: "ids array required",
        }]));
    }
    let deleted_count = Record::delete_many(&state.db, user_id, &payload.ids).await?;
    info!(
        owner_id = %user_id,
        requested = payload.ids.len(),
        deleted = deleted_count,
        "records bulk deleted"
    );
    Ok(Json(DeleteManyResponse { deleted_count }))
}

/// Existence is checked before ownership, so a missing record is 404 and an
/// existing record owned by someone else is 403.
async fn find_owned(db: &PgPool, id: Uuid, caller: Uuid) -> Result<Record, ApiError> {
    let rec = Record::find_by_id(db, id).await?.ok_or(ApiError::NotFound)?;
    check_owner(&rec, caller)?;
    Ok(rec)
}

fn check_owner(rec: &Record, caller: Uuid) -> Result<(), ApiError> {
    if rec.owner_id != caller {
        warn!(record_id = %rec.id, %caller, "caller is not the record owner");
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn record_owned_by(owner_id: Uuid) -> Record {
        Record {
            id: Uuid::new_v4(),
            owner_id,
            name: "A".into(),
            email: "a@x.com".into(),
            phone: "1234567890".into(),
            age: 30,
            father: "B".into(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn owner_passes_the_ownership_check() {
        let owner = Uuid::new_v4();
        let rec = record_owned_by(owner);
        assert!(check_owner(&rec, owner).is_ok());
    }

    #[test]
    fn other_callers_get_forbidden() {
        let rec = record_owned_by(Uuid::new_v4());
        let err = check_owner(&rec, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[tokio::test]
    async fn bulk_delete_rejects_empty_ids_before_touching_the_store() {
        // Empty ids must fail validation; unowned ids, by contrast, are
        // silently skipped by the owner predicate in the delete statement
        // rather than reported as errors.
        let state = AppState::fake();
        let err = delete_multiple(
            State(state),
            AuthUser(Uuid::new_v4()),
            Json(DeleteManyRequest { ids: vec![] }),
        )
        .await
        .unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors[0].field, "ids");
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[tokio::test]
    async fn create_rejects_negative_age_before_touching_the_store() {
        let state = AppState::fake();
        let payload = RecordPayload {
            name: "A".into(),
            email: "a@x.com".into(),
            phone: "1234567890".into(),
            age: -1,
            father: "B".into(),
        };
        let err = create_record(State(state), AuthUser(Uuid::new_v4()), Json(payload))
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "age"));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}
