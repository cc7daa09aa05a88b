// Handlers for the widget's backend API
//
// Filter state travels in the request's own query string, in the same format
// the widget keeps in the page URL. Each request mounts a short-lived session
// on that URL, so hydration and canonicalisation behave exactly as in the page.

use axum::{
    extract::{Json as JsonExtract, OriginalUri, Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

use crate::{
    definitions::{GroupedDefinitions, grouped_definitions},
    error::{AppError, AppResult},
    models::{
        AppliedFilter, FilterDefinitionId, FilterOption, FilterState, RangeId, SortKey, SortOption,
        sort_options,
    },
    results::ResultPage,
    saved_searches::{SavedSearchCreate, SavedSearchQuery, SavedSearchUpdate, build_saved_search_name},
    session::FilterSession,
    shop_query::{build_shop_query, merge_query_params},
    url_sync::{MemoryHistory, parse_state_from_url},
    widget_config::WidgetConfig,
};

use super::AppState;

// Origin used to turn a request path into a full URL for the session
const SESSION_ORIGIN: &str = "http://widget.local";

// --- Response Wrappers ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersResponse {
    definitions: GroupedDefinitions,
    sort_options: Vec<SortOption>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentOptionsResponse {
    year_to: Vec<&'static FilterOption>,
    kilometer_to: Vec<&'static FilterOption>,
    power_to: Vec<&'static FilterOption>,
    displacement_to: Vec<&'static FilterOption>,
    kilometer_to_disabled: bool,
    extras: Vec<&'static FilterOption>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStateResponse {
    filters: FilterState,
    applied_filters: Vec<AppliedFilter>,
    query: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsResponse {
    filters: FilterState,
    applied_filters: Vec<AppliedFilter>,
    query: String,
    #[serde(flatten)]
    results: ResultPage,
    favorite_ids: Vec<String>,
    favorites_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopQueryResponse {
    shop_query: String,
    query: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    ids: Vec<String>,
    count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggleResponse {
    id: String,
    is_favorite: bool,
    count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStatus {
    requested: Vec<String>,
    loaded: bool,
    error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfigResponse {
    config: WidgetConfig,
    scripts: ScriptStatus,
}

// --- Request Structs ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OptionsParams {
    extras_search: Option<String>,
}

// Kept as strings so malformed values fall back instead of rejecting the request
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    sort: Option<String>,
    page: Option<String>,
    page_size: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreateSavedSearchRequest {
    name: Option<String>,
    query: SavedSearchQuery,
}

// --- Helpers ---

fn mount_session(app_state: &AppState, uri: &Uri) -> AppResult<FilterSession<MemoryHistory>> {
    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let href = format!("{}{}", SESSION_ORIGIN, path);
    let host = MemoryHistory::parse(&href)
        .map_err(|e| AppError::BadRequest(format!("Invalid request URL '{}': {}", path, e)))?;

    // The preset only fills in for a request that names no filters itself
    let carries_filters = parse_state_from_url(host.url(), &FilterState::default()).is_some();
    let initial = if app_state.settings.demo_preset && !carries_filters {
        FilterState::demo_preset()
    } else {
        FilterState::default()
    };
    Ok(FilterSession::mount(app_state.engine.clone(), initial, host))
}

fn filter_state_response(session: &FilterSession<MemoryHistory>) -> FilterStateResponse {
    FilterStateResponse {
        filters: session.state().clone(),
        applied_filters: session.applied_filters().to_vec(),
        query: session.query().to_string(),
    }
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
}

// --- API Handlers ---

pub async fn get_filters() -> impl IntoResponse {
    tracing::info!("[HANDLER] /api/filters - Request received.");
    Json(FiltersResponse {
        definitions: grouped_definitions(),
        sort_options: sort_options(),
    })
}

pub async fn get_filter_options(
    State(app_state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<OptionsParams>,
) -> AppResult<Json<DependentOptionsResponse>> {
    tracing::info!("[HANDLER] /api/filters/options - Request received.");
    let mut session = mount_session(&app_state, &uri)?;
    session.set_extras_search(params.extras_search.unwrap_or_default());

    let store = session.store();
    Ok(Json(DependentOptionsResponse {
        year_to: store.range_to_options(RangeId::Year),
        kilometer_to: store.range_to_options(RangeId::Kilometer),
        power_to: store.range_to_options(RangeId::Power),
        displacement_to: store.range_to_options(RangeId::Displacement),
        kilometer_to_disabled: store.is_kilometer_to_disabled(),
        extras: session.filtered_extra_options(),
    }))
}

pub async fn clear_definition(
    State(app_state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(definition_id): Path<String>,
) -> AppResult<Json<FilterStateResponse>> {
    tracing::info!("[HANDLER] /api/filters/:id/clear - Clearing '{}'", definition_id);
    let id: FilterDefinitionId = definition_id.parse()?;

    let mut session = mount_session(&app_state, &uri)?;
    session.update(|store| store.clear_definition(id));
    Ok(Json(filter_state_response(&session)))
}

pub async fn remove_applied_filter(
    State(app_state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    JsonExtract(filter): JsonExtract<AppliedFilter>,
) -> AppResult<Json<FilterStateResponse>> {
    tracing::info!("[HANDLER] /api/applied-filters/remove - Removing chip '{}'", filter.id);
    let mut session = mount_session(&app_state, &uri)?;
    session.update(|store| store.remove_applied_filter(&filter));
    Ok(Json(filter_state_response(&session)))
}

pub async fn get_listings(
    State(app_state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<ListingParams>,
) -> AppResult<Json<ListingsResponse>> {
    tracing::info!("[HANDLER] /api/listings - Request received with {:?}", params);
    let favorites = app_state.favorites.read().await.clone();

    let mut session = mount_session(&app_state, &uri)?;
    session.set_favorites(favorites);
    session.set_sort(params.sort.as_deref().map_or(SortKey::Relevance, SortKey::parse_lenient));
    session.set_page_size(parse_positive(params.page_size.as_deref()).unwrap_or(app_state.settings.page_size));
    session.set_page(parse_positive(params.page.as_deref()).unwrap_or(1));

    let results = session.results().clone();
    let favorite_ids = results
        .items
        .iter()
        .filter(|listing| session.is_favorite(&listing.id))
        .map(|listing| listing.id.clone())
        .collect();

    tracing::info!(
        "[HANDLER] /api/listings - {} matches, returning page {}/{}",
        results.pagination.total_count,
        results.pagination.current_page,
        results.pagination.total_pages
    );

    Ok(Json(ListingsResponse {
        filters: session.state().clone(),
        applied_filters: session.applied_filters().to_vec(),
        query: session.query().to_string(),
        results,
        favorite_ids,
        favorites_count: session.favorites().count(),
    }))
}

pub async fn get_shop_query(
    State(app_state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> AppResult<Json<ShopQueryResponse>> {
    let session = mount_session(&app_state, &uri)?;
    let shop_query = build_shop_query(session.state());
    let query = merge_query_params(Some(&app_state.settings.shop_base_query), &shop_query);

    tracing::info!("[HANDLER] /api/shop-query - Built '{}'", query);
    Ok(Json(ShopQueryResponse { shop_query, query }))
}

pub async fn get_favorites(State(app_state): State<AppState>) -> impl IntoResponse {
    let favorites = app_state.favorites.read().await;
    Json(FavoritesResponse {
        ids: favorites.ids(),
        count: favorites.count(),
    })
}

pub async fn toggle_favorite(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut favorites = app_state.favorites.write().await;
    *favorites = favorites.toggle(&id);

    let is_favorite = favorites.is_favorite(&id);
    tracing::info!("[HANDLER] /api/favorites/:id - '{}' favorite: {}", id, is_favorite);
    Json(FavoriteToggleResponse {
        count: favorites.count(),
        is_favorite,
        id,
    })
}

pub async fn list_saved_searches(State(app_state): State<AppState>) -> impl IntoResponse {
    let saved = app_state.saved_searches.list().await;
    tracing::info!("[HANDLER] /api/saved-searches - Returning {} entries.", saved.len());
    Json(saved)
}

pub async fn create_saved_search(
    State(app_state): State<AppState>,
    JsonExtract(request): JsonExtract<CreateSavedSearchRequest>,
) -> impl IntoResponse {
    let name = request
        .name
        .unwrap_or_else(|| build_saved_search_name(&request.query.filters));
    let saved = app_state
        .saved_searches
        .create(SavedSearchCreate {
            name,
            query: request.query,
        })
        .await;
    (StatusCode::CREATED, Json(saved))
}

pub async fn update_saved_search(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    JsonExtract(update): JsonExtract<SavedSearchUpdate>,
) -> AppResult<impl IntoResponse> {
    let saved = app_state.saved_searches.update(&id, update).await?;
    Ok(Json(saved))
}

pub async fn delete_saved_search(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    app_state.saved_searches.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_widget_config(
    State(app_state): State<AppState>,
    Query(attributes): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let config = WidgetConfig::from_attributes(attributes);
    let requested = config.script_url_list();

    // Only scripts configured on the server are ever fetched; those were preloaded at startup
    let configured = app_state.settings.script_url_list();
    let (allowed, rejected): (Vec<String>, Vec<String>) = requested
        .iter()
        .cloned()
        .partition(|url| configured.contains(url));

    let error = if !rejected.is_empty() {
        tracing::warn!(
            "[HANDLER] /api/widget-config - Ignoring unconfigured scripts: {}",
            rejected.join(", ")
        );
        Some(format!("Scripts not configured on the server: {}", rejected.join(", ")))
    } else if allowed.is_empty() {
        None
    } else {
        match app_state.script_loader.load_once(&allowed).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("[HANDLER] /api/widget-config - {}", e);
                Some(e.to_string())
            }
        }
    };

    Json(WidgetConfigResponse {
        config,
        scripts: ScriptStatus {
            loaded: error.is_none(),
            requested,
            error,
        },
    })
}
