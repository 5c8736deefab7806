use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod cities;
mod error;
mod pictures;
mod rooms;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;
pub use validation::FieldError;

use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn room_service(&self) -> &Arc<dyn crate::services::RoomService> {
        &self.shared.room_service
    }

    #[must_use]
    pub fn picture_service(&self) -> &Arc<dyn crate::services::PictureService> {
        &self.shared.picture_service
    }

    #[must_use]
    pub fn city_service(&self) -> &Arc<crate::services::CityService> {
        &self.shared.city_service
    }

    #[must_use]
    pub fn image_service(&self) -> &Arc<crate::services::ImageService> {
        &self.shared.image_service
    }
}

pub async fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared).await)
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (images_path, cors_origins, session_idle_minutes, body_limit) = {
        let config = state.config().read().await;
        // Leave headroom for a full batch of maximum-size files; the
        // per-file limit is enforced again when storing.
        let body_limit = (config.uploads.max_file_size_mb as usize
            * config.uploads.max_files_per_upload
            + 1)
            * 1024
            * 1024;
        (
            config.uploads.images_path.clone(),
            config.server.cors_allowed_origins.clone(),
            config.server.session_idle_minutes,
            body_limit,
        )
    };

    let protected_routes = create_protected_router();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_idle_minutes,
        )));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/users", post(users::register))
        .route("/rooms", get(rooms::search_rooms))
        .route("/rooms/{id}", get(rooms::get_room))
        .route("/rooms/{id}/pictures", get(pictures::list_room_pictures))
        .route("/cities", get(cities::search_cities))
        .route("/cities/provinces", get(cities::list_provinces))
        .route(
            "/cities/province/{id}",
            get(cities::list_cities_by_province),
        )
        .layer(session_layer)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .nest_service("/images", tower_http::services::ServeDir::new(images_path))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/users/property-owner", put(users::become_owner))
        .route("/rooms", post(rooms::create_room))
        .route("/rooms/mine", get(rooms::list_own_rooms))
        .route("/rooms/{id}", put(rooms::update_room))
        .route("/rooms/{id}", delete(rooms::delete_room))
        .route(
            "/rooms/{id}/availability",
            post(rooms::toggle_availability),
        )
        .route("/rooms/{id}/favorite", post(rooms::add_favorite))
        .route("/rooms/{id}/favorite", delete(rooms::remove_favorite))
        .route("/favorites", get(rooms::list_favorites))
        .route("/favorites/ids", get(rooms::list_favorite_ids))
        .route("/pictures", post(pictures::upload_pictures))
        .route("/pictures/order", put(pictures::swap_order))
        .route("/pictures/{id}", delete(pictures::delete_picture))
        .route_layer(middleware::from_fn(auth::auth_middleware))
}
