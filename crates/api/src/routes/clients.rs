use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::clients;
use crate::state::AppState;

/// Routes mounted at `/clients`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::list_clients).post(clients::create_client))
        .route("/{id}", get(clients::get_client).delete(clients::delete_client))
        .route("/{id}/products", post(clients::assign_product))
        .route(
            "/{id}/products/{product_id}",
            delete(clients::unassign_product),
        )
}
