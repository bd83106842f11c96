//! Route definitions for the bar inventory platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    handlers,
    middleware::{auth_middleware, require_admin},
    AppState,
};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public login/register, protected logout/me)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes - admin panel
        .nest("/admin", admin_routes(state.clone()))
        // Protected routes - product catalog
        .nest("/products", product_routes(state.clone()))
        // Protected routes - transaction log
        .nest("/transactions", transaction_routes(state.clone()))
        // Protected routes - derived stock
        .nest("/inventory", inventory_routes(state.clone()))
        // Protected routes - reports
        .nest("/reports", reporting_routes(state))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(protected)
}

/// Admin user management routes (admin only)
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/users/:user_id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/active-users", get(handlers::list_active_users))
        .route("/stats", get(handlers::get_user_stats))
        // Layers run outermost-last: authenticate first, then check role
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Product catalog routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Inventory transaction routes (protected)
fn transaction_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_transactions).post(handlers::record_transaction),
        )
        .route(
            "/:transaction_id",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Stock level routes (protected)
fn inventory_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stock", get(handlers::get_stock_levels))
        .route("/stock/:product_id", get(handlers::get_product_stock))
        .route("/low-stock", get(handlers::get_low_stock))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Reporting routes (protected)
fn reporting_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/summary", get(handlers::get_product_summary))
        .route("/daily", get(handlers::get_daily_report))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
