pub mod analytics;
pub mod auth;
pub mod claims;
pub mod clients;
pub mod health;
pub mod leads;
pub mod products;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/login                          login (public)
/// /auth/logout                         logout (public)
/// /auth/me                             current session
///
/// /users                               list, create
/// /users/{id}                          get, update, delete
/// /users/{id}/password                 change own password
///
/// /leads                               list, create
/// /leads/board                         kanban columns
/// /leads/{id}                          get, update, delete
/// /leads/{id}/status                   kanban move (PATCH)
/// /leads/{id}/convert                  convert WON lead to client (POST)
/// /leads/{id}/comments                 add comment (POST)
///
/// /clients                             list, create
/// /clients/{id}                        get, delete
/// /clients/{id}/products               assign product (POST)
/// /clients/{id}/products/{product_id}  unassign product (DELETE)
///
/// /products                            list, create
/// /products/{id}                       get, update, delete
///
/// /claims                              list, create
/// /claims/{id}                         get, update, delete
/// /claims/{id}/status                  status change (PATCH)
/// /claims/{id}/comments                add comment (POST)
/// /claims/{id}/attachments             register attachment (POST)
///
/// /analytics/income-breakdown          per-client income
/// /analytics/summary                   dashboard numbers
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/leads", leads::router())
        .nest("/clients", clients::router())
        .nest("/products", products::router())
        .nest("/claims", claims::router())
        .nest("/analytics", analytics::router())
}
