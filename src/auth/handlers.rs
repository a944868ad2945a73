use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, GoogleLoginRequest, LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        password,
        repo::User,
    },
    error::ApiError,
    state::AppState,
    validate,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/google-login", post(google_login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate::validate_register(&payload)?;

    let name = payload.name.trim();
    let email = payload.email.trim();
    let username = payload.username.trim();

    if User::find_by_email_or_username(&state.db, email, username)
        .await?
        .is_some()
    {
        warn!(%email, %username, "registration with identity already in use");
        return Err(ApiError::DuplicateIdentity);
    }

    let hash = password::hash_password(&payload.password)?;
    let user = User::create(&state.db, name, email, username, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_access(user.id)?;

    info!(user_id = %user.id, %username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    validate::validate_login(&payload)?;

    let username = payload.username.trim();
    // Unknown username and wrong password produce the same answer.
    let user = match User::find_by_username(&state.db, username).await? {
        Some(u) => u,
        None => {
            warn!(%username, "login with unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !password::verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_access(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn google_login(
    State(state): State<AppState>,
    Json(payload): Json<GoogleLoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let claims = match state.google.verify_id_token(&payload.token).await {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "google id token rejected");
            return Err(ApiError::FederatedVerificationFailed);
        }
    };

    // Find-or-create keyed on the asserted email.
    let user = match User::find_by_email(&state.db, &claims.email).await? {
        Some(u) => u,
        None => {
            let username = derive_username(&claims.email);
            let name = claims.name.as_deref().unwrap_or(&claims.email);
            let user = User::create(
                &state.db,
                name,
                &claims.email,
                username,
                password::GOOGLE_PLACEHOLDER_HASH,
            )
            .await?;
            info!(user_id = %user.id, "user created from google sign-in");
            user
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_google(user.id)?;

    info!(user_id = %user.id, google_sub = %claims.sub, "google login");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Local part of the email address.
fn derive_username(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_derives_from_email_local_part() {
        assert_eq!(derive_username("jo@x.com"), "jo");
        assert_eq!(derive_username("first.last@example.org"), "first.last");
        assert_eq!(derive_username("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn auth_response_excludes_the_hash() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            name: "Jo".into(),
            email: "jo@x.com".into(),
            username: "jo1".into(),
            password_hash: "hash".into(),
            created_at: time::OffsetDateTime::now_utc(),
        };
        let resp = AuthResponse {
            token: "t".into(),
            user: user.into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["user"]["username"], "jo1");
        assert!(json["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn register_rejects_invalid_payload_before_touching_the_store() {
        // The fake state's pool never connects; reaching the store would fail.
        let state = AppState::fake();
        let payload = RegisterRequest {
            name: "".into(),
            email: "bad".into(),
            username: "a".into(),
            password: "short".into(),
        };
        let err = register(State(state), Json(payload)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn login_rejects_empty_fields_before_touching_the_store() {
        let state = AppState::fake();
        let payload = LoginRequest {
            username: " ".into(),
            password: "".into(),
        };
        let err = login(State(state), Json(payload)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
