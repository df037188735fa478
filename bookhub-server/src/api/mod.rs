//! API routes for bookhub-server

pub mod books;
pub mod health;
pub mod payments;
pub mod users;

use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::auth::user_auth::user_auth_middleware;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, crate::error::ServiceError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Catalog (public)
    let catalog = Router::new()
        .route("/books", get(books::list_books))
        .route("/books/search", get(books::search_books))
        .route("/books/best-sellers", get(books::best_sellers))
        .route("/books/{id}", get(books::get_book));

    // Credential endpoints (public, rate limited per IP)
    let register = Router::new()
        .route("/users/register", post(users::register))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));
    let login = Router::new()
        .route("/users/login", post(users::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    // Account routes (JWT authenticated)
    let account = Router::new()
        .route("/users/profile", get(users::profile))
        .route("/users/orders", get(users::my_orders))
        .route("/users/change-password", put(users::change_password))
        .route("/users/orders/{id}", delete(users::delete_order))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            user_auth_middleware,
        ));

    // Checkout and gateway callbacks. No JWT here: checkout identifies the
    // buyer from the request body, the webhook is signature-verified, and the
    // session lookups are keyed by the gateway's opaque session id.
    let payments = Router::new()
        .route(
            "/payments/create-checkout-session",
            post(payments::create_checkout_session),
        )
        .route("/payments/webhook", post(payments::webhook))
        .route("/payments/verify-session", get(payments::verify_session))
        .route("/payments/check-session", get(payments::check_session));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(catalog)
        .merge(register)
        .merge(login)
        .merge(account)
        .merge(payments)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
