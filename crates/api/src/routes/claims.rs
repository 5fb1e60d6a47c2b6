use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::claims;
use crate::state::AppState;

/// Routes mounted at `/claims`.
///
/// ```text
/// GET    /                  -> list_claims
/// POST   /                  -> create_claim
/// GET    /{id}              -> get_claim
/// PATCH  /{id}              -> update_claim
/// DELETE /{id}              -> delete_claim
/// PATCH  /{id}/status       -> update_claim_status
/// POST   /{id}/comments     -> add_claim_comment
/// POST   /{id}/attachments  -> add_attachment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(claims::list_claims).post(claims::create_claim))
        .route(
            "/{id}",
            get(claims::get_claim)
                .patch(claims::update_claim)
                .delete(claims::delete_claim),
        )
        .route("/{id}/status", patch(claims::update_claim_status))
        .route("/{id}/comments", post(claims::add_claim_comment))
        .route("/{id}/attachments", post(claims::add_attachment))
}
