// Route definitions

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post, put},
};
use tokio::sync::RwLock;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Settings,
    listings,
    results::{Favorites, ResultEngine},
    saved_searches::SavedSearchStore,
    script_loader::ScriptLoader,
};

mod api;

/// Shared state handed to every handler.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub engine: Arc<ResultEngine>,
    pub favorites: Arc<RwLock<Favorites>>,
    pub saved_searches: Arc<SavedSearchStore>,
    pub script_loader: Arc<ScriptLoader>,
}

impl AppState {
    /// State backed by the built-in listing fixture.
    pub fn new(settings: Settings, script_loader: Arc<ScriptLoader>) -> Self {
        Self {
            settings: Arc::new(settings),
            engine: Arc::new(ResultEngine::new(listings::mock_listings())),
            favorites: Arc::new(RwLock::new(Favorites::new())),
            saved_searches: Arc::new(SavedSearchStore::new()),
            script_loader,
        }
    }
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    if settings.cors_allow_any_origin {
        // The widget is embedded into arbitrary dealer pages
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    }
}

pub fn create_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.settings);

    let api_router = Router::new()
        .route("/filters", get(api::get_filters))
        .route("/filters/options", get(api::get_filter_options))
        .route("/filters/:definition_id/clear", post(api::clear_definition))
        .route("/applied-filters/remove", post(api::remove_applied_filter))
        .route("/listings", get(api::get_listings))
        .route("/shop-query", get(api::get_shop_query))
        .route("/favorites", get(api::get_favorites))
        .route("/favorites/:id", post(api::toggle_favorite))
        .route(
            "/saved-searches",
            get(api::list_saved_searches).post(api::create_saved_search),
        )
        .route(
            "/saved-searches/:id",
            put(api::update_saved_search).delete(api::delete_saved_search),
        )
        .route("/widget-config", get(api::get_widget_config));

    Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
