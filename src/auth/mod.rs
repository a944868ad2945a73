use crate::state::AppState;
use axum::Router;

pub(crate) mod dto;
pub(crate) mod extractors;
pub mod google;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
