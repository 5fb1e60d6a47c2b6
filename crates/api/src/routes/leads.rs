use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// Routes mounted at `/leads`.
///
/// ```text
/// GET    /                -> list_leads
/// POST   /                -> create_lead
/// GET    /board           -> board
/// GET    /{id}            -> get_lead
/// PATCH  /{id}            -> update_lead
/// DELETE /{id}            -> delete_lead
/// PATCH  /{id}/status     -> update_lead_status
/// POST   /{id}/convert    -> convert_lead
/// POST   /{id}/comments   -> add_lead_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(leads::list_leads).post(leads::create_lead))
        .route("/board", get(leads::board))
        .route(
            "/{id}",
            get(leads::get_lead)
                .patch(leads::update_lead)
                .delete(leads::delete_lead),
        )
        .route("/{id}/status", patch(leads::update_lead_status))
        .route("/{id}/convert", post(leads::convert_lead))
        .route("/{id}/comments", post(leads::add_lead_comment))
}
