//! Route definitions for Stockbook

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes; protected routers verify the bearer token against the
/// configured secret carried in the state
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Roles (public - needed by the registration form)
        .route("/roles", get(handlers::list_roles))
        // Protected routes - person types
        .route(
            "/person-types",
            get(handlers::list_person_types).route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // Protected routes - address book
        .nest("/addresses", address_routes(state.clone()))
        // Protected routes - product catalog
        .nest("/products", product_routes(state.clone()))
        // Protected routes - goods receipts
        .nest("/grns", grn_routes(state.clone()))
        // Protected routes - invoices
        .nest("/invoices", invoice_routes(state.clone()))
        // Protected routes - dashboard reports
        .nest("/dashboard", dashboard_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
}

/// Address book routes (protected)
fn address_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_addresses).post(handlers::create_address),
        )
        .route("/vendors", get(handlers::list_vendor_addresses))
        .route("/customers", get(handlers::list_customer_addresses))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Product catalog routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Goods receipt routes (protected)
fn grn_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_grns).post(handlers::create_grn))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Invoice routes (protected)
fn invoice_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_invoices).post(handlers::create_invoice),
        )
        .route("/vendor-products", get(handlers::vendor_catalog))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Dashboard reporting routes (protected, read-only)
fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::get_overall_summary))
        .route("/vendor-products", get(handlers::get_vendor_breakdown))
        .route("/sales-summary", get(handlers::get_sales_summary))
        .route("/monthly-sales", get(handlers::get_monthly_sales))
        .route("/inventory", get(handlers::get_inventory))
        .route("/inventory/export", get(handlers::export_inventory_csv))
        .route("/low-stock", get(handlers::get_low_stock))
        .route("/profit-by-product", get(handlers::get_profit_by_product))
        .route("/business-summary", get(handlers::get_business_summary))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
