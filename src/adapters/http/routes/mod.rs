pub mod consent;
pub mod envelopes;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(envelopes::router())
        .nest("/consent", consent::router())
}
