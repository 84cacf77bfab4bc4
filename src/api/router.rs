use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_item, create_loan, create_member, get_consistency, get_item, get_loan,
    get_member, get_summary, list_items, list_loans, list_members, return_loan,
};

/// Creates the API router with all lending endpoints
///
/// Command endpoints (Write operations):
/// - POST /members - Register a member
/// - POST /items - Add an item to the catalog
/// - POST /loans - Request a loan
/// - POST /loans/:id/return - Register a return
///
/// Query endpoints (Read operations):
/// - GET /members, GET /members/:id
/// - GET /items, GET /items/:id
/// - GET /loans, GET /loans/:id
/// - GET /summary, GET /consistency
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Members
        .route("/members", post(create_member).get(list_members))
        .route("/members/:id", get(get_member))
        // Catalog
        .route("/items", post(create_item).get(list_items))
        .route("/items/:id", get(get_item))
        // Loans
        .route("/loans", post(create_loan).get(list_loans))
        .route("/loans/:id", get(get_loan))
        .route("/loans/:id/return", post(return_loan))
        // Reports
        .route("/summary", get(get_summary))
        .route("/consistency", get(get_consistency))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
