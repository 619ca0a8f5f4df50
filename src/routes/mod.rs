use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{admin, events, gallery, health_check, registrations};
use crate::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/events/", get(events::list).post(events::create))
        .route(
            "/events/:id/",
            get(events::retrieve)
                .put(events::update)
                .patch(events::update)
                .delete(events::destroy),
        )
        .route(
            "/events/:id/registrations/",
            get(registrations::list_for_event),
        )
        .route(
            "/register/",
            get(registrations::list).post(registrations::create),
        )
        .route(
            "/register/:id/",
            get(registrations::retrieve)
                .put(registrations::update)
                .patch(registrations::update)
                .delete(registrations::destroy),
        )
        .route("/gallery/", get(gallery::list).post(gallery::create))
        .route("/gallery/featured/", get(gallery::featured))
        .route(
            "/gallery/:id/",
            get(gallery::retrieve)
                .put(gallery::update)
                .patch(gallery::update)
                .delete(gallery::destroy),
        )
        .route("/admin/login/", post(admin::login))
        .route("/admin/logout/", post(admin::logout))
        .route("/admin/dashboard/", get(admin::dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
