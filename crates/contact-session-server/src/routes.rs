use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.settings.web.static_dir.clone();
    let body_limit = state.settings.limits.body_limit_bytes;

    // Pages (static assets)
    let create_page = ServeFile::new(static_dir.join("create.html"));
    let session_page = ServeFile::new(static_dir.join("session.html"));

    let page_routes: Router<AppState> = Router::new()
        .route_service("/", create_page.clone())
        .route_service("/create", create_page)
        .route_service("/session/{id}", session_page);

    let health_routes: Router<AppState> = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    let api_routes: Router<AppState> = Router::new()
        .route("/api/create", post(handlers::session::create_session_handler))
        .route("/api/session/{id}", get(handlers::session::get_session_handler))
        .route(
            "/api/session/{id}/contact",
            post(handlers::session::add_contact_handler),
        )
        .route(
            "/api/session/{id}/contacts.vcf",
            get(handlers::session::export_contacts_handler),
        );

    Router::new()
        .merge(page_routes)
        .merge(health_routes)
        .merge(api_routes)
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::default().include_headers(true)),
                )
                .layer(CatchPanicLayer::new())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
