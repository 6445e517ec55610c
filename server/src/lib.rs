//! # Lacteos signage backend
//!
//! Business-management backend for a dairy retailer: an authenticated admin
//! API for categories, products, a promotional image gallery, and
//! promotional videos, plus public TV-board endpoints that the signage
//! screens poll.
//!
//! All persistence lives in the hosted backend service (relational tables,
//! object storage, auth sessions); this process validates, orchestrates
//! single-row writes, keeps display orderings contiguous, and fronts the
//! public boards with a long-TTL redis cache that admin mutations
//! invalidate.
//!
//! ## Route map
//!
//! Public:
//! - `GET /tv/productos` — featured-products board
//! - `GET /tv/menu` — full menu board by category
//! - `GET /tv/galeria` — gallery board
//! - `GET /tv/videos` — video board
//! - `POST /admin/login`
//!
//! Admin (bearer token):
//! - `GET|POST /admin/categorias`, `PUT|DELETE /admin/categorias/{id}`,
//!   `POST /admin/categorias/reorder`
//! - `GET|POST /admin/productos`, `PUT|DELETE /admin/productos/{id}`,
//!   `POST /admin/productos/{id}/destacado`, `POST /admin/productos/reorder`
//! - `GET|POST /admin/videos`, `POST /admin/videos/record`,
//!   `PUT|DELETE /admin/videos/{id}`, `PUT /admin/videos/{id}/archivo`,
//!   `POST /admin/videos/reorder`
//! - `GET|POST /admin/galeria`, `POST /admin/galeria/record`,
//!   `PUT|DELETE /admin/galeria/{id}`, `PUT /admin/galeria/{id}/imagen`,
//!   `POST /admin/galeria/reorder`
//! - `GET /admin/notifications`, `POST /admin/signout`

use std::{sync::Arc, time::Duration};

use axum::{
    extract::DefaultBodyLimit,
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Method},
    middleware,
    routing::{get, post, put},
    Router,
};

use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod actions;
pub mod auth;
pub mod boards;
pub mod cache;
pub mod categories;
pub mod config;
pub mod error;
pub mod gallery;
pub mod notify;
pub mod products;
pub mod reorder;
pub mod state;
pub mod validate;
pub mod videos;

use state::AppState;
use validate::MAX_VIDEO_BYTES;

pub fn app(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route("/admin/notifications", get(notify::notifications_handler))
        .route("/admin/signout", post(auth::signout_handler))
        .route(
            "/admin/categorias",
            get(categories::list_handler).post(categories::create_handler),
        )
        .route("/admin/categorias/reorder", post(categories::reorder_handler))
        .route(
            "/admin/categorias/{id}",
            put(categories::update_handler).delete(categories::delete_handler),
        )
        .route(
            "/admin/productos",
            get(products::list_handler).post(products::create_handler),
        )
        .route("/admin/productos/reorder", post(products::reorder_handler))
        .route(
            "/admin/productos/{id}",
            put(products::update_handler).delete(products::delete_handler),
        )
        .route("/admin/productos/{id}/destacado", post(products::featured_handler))
        .route(
            "/admin/videos",
            get(videos::list_handler).post(videos::create_handler),
        )
        .route("/admin/videos/record", post(videos::record_handler))
        .route("/admin/videos/reorder", post(videos::reorder_handler))
        .route(
            "/admin/videos/{id}",
            put(videos::update_handler).delete(videos::delete_handler),
        )
        .route("/admin/videos/{id}/archivo", put(videos::replace_handler))
        .route(
            "/admin/galeria",
            get(gallery::list_handler).post(gallery::create_handler),
        )
        .route("/admin/galeria/record", post(gallery::record_handler))
        .route("/admin/galeria/reorder", post(gallery::reorder_handler))
        .route(
            "/admin/galeria/{id}",
            put(gallery::update_handler).delete(gallery::delete_handler),
        )
        .route("/admin/galeria/{id}/imagen", put(gallery::replace_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/tv/productos", get(boards::featured_handler))
        .route("/tv/menu", get(boards::menu_handler))
        .route("/tv/galeria", get(boards::gallery_handler))
        .route("/tv/videos", get(boards::videos_handler))
        .route("/admin/login", post(auth::login_handler))
        .merge(admin)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_VIDEO_BYTES + 1024 * 1024))
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let router = app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
