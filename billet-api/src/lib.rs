use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod cancel;
pub mod config;
pub mod error;
pub mod orders;
pub mod settings;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/v1/orders", post(orders::create_order))
        .route("/v1/orders/{id}", get(orders::get_order))
        .route(
            "/v1/orders/{id}/partial-cancel",
            get(cancel::get_cancel_page).post(cancel::post_cancel),
        )
        .route(
            "/v1/orders/{id}/partial-cancel/allowed",
            get(cancel::get_cancel_allowed),
        )
        .route(
            "/v1/events/{event}/settings/partial-cancellation",
            get(settings::get_settings).put(settings::put_settings),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
