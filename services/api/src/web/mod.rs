pub mod companies;
pub mod middleware;
pub mod protocol;
pub mod reference;
pub mod rest;
pub mod state;

pub use middleware::require_viewer;
pub use rest::ApiDoc;

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};
use state::AppState;
use std::sync::Arc;

/// Builds the API router with every route behind the viewer middleware.
///
/// CORS and the Swagger UI are layered on by the binary.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/me", get(rest::me_handler))
        .route(
            "/companies",
            get(companies::list_companies_handler).post(companies::create_company_handler),
        )
        .route(
            "/companies/{company_id}",
            put(companies::update_company_handler)
                .delete(companies::delete_company_handler),
        )
        .route(
            "/companies/{company_id}/users",
            get(companies::list_company_users_handler),
        )
        .route(
            "/companies/{company_id}/customers",
            get(rest::list_customers_handler).post(rest::create_customer_handler),
        )
        .route(
            "/companies/{company_id}/customers/stats",
            get(rest::customer_stats_handler),
        )
        .route(
            "/customers/{customer_id}",
            get(rest::get_customer_handler)
                .put(rest::update_customer_handler)
                .delete(rest::delete_customer_handler),
        )
        .route(
            "/companies/{company_id}/{kind}",
            get(reference::list_reference_items_handler)
                .post(reference::create_reference_item_handler),
        )
        .route(
            "/companies/{company_id}/{kind}/{item_id}",
            put(reference::update_reference_item_handler)
                .delete(reference::delete_reference_item_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_viewer,
        ))
        .with_state(app_state)
}
