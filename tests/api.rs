use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use futures::FutureExt;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use vehicle_filter::{
    AppState,
    config::Settings,
    create_router,
    script_loader::{ScriptFetcher, ScriptLoad, ScriptLoadError, ScriptLoader},
};

/// Records every URL it is asked for; URLs containing "missing" fail.
#[derive(Default)]
struct RecordingFetcher {
    fetched: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl ScriptFetcher for RecordingFetcher {
    fn fetch(&self, url: &str) -> ScriptLoad {
        self.fetched.lock().unwrap().push(url.to_string());
        let url = url.to_string();
        async move {
            if url.contains("missing") {
                Err(ScriptLoadError::Failed {
                    url,
                    reason: "404 Not Found".into(),
                })
            } else {
                Ok(())
            }
        }
        .boxed()
    }
}

fn app_with(settings: Settings, fetcher: Arc<RecordingFetcher>) -> Router {
    let loader = Arc::new(ScriptLoader::new(fetcher));
    create_router(AppState::new(settings, loader))
}

fn app() -> Router {
    app_with(Settings::default(), Arc::new(RecordingFetcher::default()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn with_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

fn ids(values: &Value) -> Vec<String> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn filters_endpoint_returns_grouped_definitions() {
    let (status, body) = get(&app(), "/api/filters").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["definitions"]["budget"]["type"], "price");
    assert_eq!(
        ids(&body["definitions"]["vehicleSingle"]),
        vec!["category", "location", "radius", "transmission", "condition"]
    );
    assert_eq!(
        ids(&body["definitions"]["vehicleRange"]),
        vec!["year", "kilometer", "power", "displacement"]
    );
    assert_eq!(body["sortOptions"][0], json!({"key": "relevance", "label": "Relevanz"}));
}

#[tokio::test]
async fn listings_filter_sort_and_canonicalise_the_query() {
    let (status, body) = get(
        &app(),
        "/api/listings?marke=BMW&minPrice=20000&maxPrice=40000&sort=priceAsc&pageSize=50",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let items = body["items"].as_array().unwrap();
    assert!(!items.is_empty());
    assert!(items.iter().all(|item| item["make"] == "BMW"));
    let prices: Vec<u64> = items.iter().map(|item| item["price"].as_u64().unwrap()).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    assert!(prices.iter().all(|p| (20000..=40000).contains(p)));

    assert_eq!(body["query"], "marke=BMW&minPrice=20000&maxPrice=40000");
    assert_eq!(body["totalCount"].as_u64().unwrap() as usize, items.len());
    assert_eq!(body["sort"], "priceAsc");
    assert_eq!(body["appliedFilters"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn listings_clamp_the_page_and_tolerate_bad_params() {
    let (_, body) = get(&app(), "/api/listings?page=99&pageSize=10").await;
    assert_eq!(body["totalPages"], 6);
    assert_eq!(body["currentPage"], 6);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);

    let (status, body) = get(&app(), "/api/listings?page=abc&sort=cheapest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["pageSize"], 12);
    assert_eq!(body["sort"], "relevance");
}

#[tokio::test]
async fn empty_results_report_zero_pages() {
    let (_, body) = get(&app(), "/api/listings?marke=Porsche").await;
    assert_eq!(body["isEmpty"], true);
    assert_eq!(body["totalPages"], 0);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn dependent_options_follow_the_from_values() {
    let (_, body) = get(&app(), "/api/filters/options?yearFrom=2020&kilometerFrom=250000&extrasSearch=assist").await;

    let years: Vec<u64> = body["yearTo"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["value"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(!years.is_empty());
    assert!(years.iter().all(|y| *y >= 2020));

    assert_eq!(body["kilometerTo"], json!([]));
    assert_eq!(body["kilometerToDisabled"], true);
    assert!(body["extras"]
        .as_array()
        .unwrap()
        .iter()
        .all(|o| o["label"].as_str().unwrap().to_lowercase().contains("assist")));
}

#[tokio::test]
async fn clearing_a_definition_rewrites_the_query() {
    let app = app();
    let (status, body) = get_clear(&app, "/api/filters/marke/clear?marke=BMW&marke=Audi&fuel=Diesel").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "fuel=Diesel");
    assert_eq!(body["filters"]["marke"], json!([]));

    let (status, body) = get_clear(&app, "/api/filters/colour/clear?fuel=Diesel").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
}

async fn get_clear(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn removing_every_chip_clears_all_filters() {
    let app = app();
    let mut uri = "/api/applied-filters/remove?marke=BMW&yearFrom=2019&minPrice=1000&extras=Xenon".to_string();

    let (_, listing) = get(&app, &uri.replacen("/api/applied-filters/remove", "/api/listings", 1)).await;
    let chips = listing["appliedFilters"].as_array().unwrap().clone();
    assert_eq!(chips.len(), 4);

    for chip in chips {
        let (status, body) = with_json(&app, "POST", &uri, chip).await;
        assert_eq!(status, StatusCode::OK);
        let query = body["query"].as_str().unwrap();
        uri = if query.is_empty() {
            "/api/applied-filters/remove".to_string()
        } else {
            format!("/api/applied-filters/remove?{}", query)
        };
    }
    assert_eq!(uri, "/api/applied-filters/remove");
}

#[tokio::test]
async fn shop_query_translates_vocabulary() {
    let (_, body) = get(&app(), "/api/shop-query?marke=Volkswagen&fuel=Hybrid&doors=6%2B").await;
    assert_eq!(body["shopQuery"], "manufacturer=VW&fuelTypes=HYBRID_BENZIN&minDoors=6");
    assert_eq!(body["query"], body["shopQuery"]);
}

#[tokio::test]
async fn favorites_toggle_on_the_server() {
    let app = app();
    let (_, first) = with_json(&app, "POST", "/api/favorites/car-7", Value::Null).await;
    assert_eq!(first, json!({"id": "car-7", "isFavorite": true, "count": 1}));

    let (_, listing) = get(&app, "/api/listings?pageSize=60").await;
    assert_eq!(listing["favoriteIds"], json!(["car-7"]));

    let (_, second) = with_json(&app, "POST", "/api/favorites/car-7", Value::Null).await;
    assert_eq!(second["isFavorite"], false);
    let (_, all) = get(&app, "/api/favorites").await;
    assert_eq!(all, json!({"ids": [], "count": 0}));
}

#[tokio::test]
async fn saved_search_crud() {
    let app = app();
    let query = json!({"filters": {"marke": ["BMW"], "maxPrice": "40000"}, "sortKey": "priceAsc"});

    let (status, created) = with_json(&app, "POST", "/api/saved-searches", json!({"query": query})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "BMW · Alle Modelle · Alle Baujahre · 0-40000EUR");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = with_json(
        &app,
        "PUT",
        &format!("/api/saved-searches/{}", id),
        json!({"name": "  "}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Neue Suche");
    assert_eq!(updated["query"]["sortKey"], "priceAsc");

    let (_, list) = get(&app, "/api/saved-searches").await;
    assert_eq!(ids(&list), vec![id.clone()]);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/saved-searches/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let again = Request::builder()
        .method("DELETE")
        .uri(format!("/api/saved-searches/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, again).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn widget_config_maps_attributes() {
    let (_, body) = get(
        &app(),
        "/api/widget-config?is-car-carousel-autoplay=false&padding-x=12px",
    )
    .await;
    assert_eq!(body["config"]["isCarCarouselAutoplay"], false);
    assert_eq!(body["config"]["paddingX"], "12px");
    assert_eq!(body["config"]["widgetType"], "1");
    assert_eq!(body["scripts"], json!({"requested": [], "loaded": true, "error": null}));
}

#[tokio::test]
async fn widget_config_never_fetches_request_supplied_scripts() {
    let fetcher = Arc::new(RecordingFetcher::default());
    let app = app_with(Settings::default(), fetcher.clone());

    let (status, body) = get(
        &app,
        "/api/widget-config?script-urls=http%3A%2F%2F169.254.169.254%2Flatest%2Fmeta-data%2F",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scripts"]["requested"], json!(["http://169.254.169.254/latest/meta-data/"]));
    assert_eq!(body["scripts"]["loaded"], false);
    assert!(body["scripts"]["error"].as_str().unwrap().contains("not configured"));

    for i in 0..20 {
        get(&app, &format!("/api/widget-config?script-urls=https%3A%2F%2Fother.example%2F{}.js", i)).await;
    }
    assert!(fetcher.fetched().is_empty());
}

#[tokio::test]
async fn widget_config_reports_configured_scripts() {
    let fetcher = Arc::new(RecordingFetcher::default());
    let settings = Settings {
        script_urls: "https://cdn.example/a.js, https://cdn.example/missing.js".to_string(),
        ..Settings::default()
    };
    let app = app_with(settings, fetcher.clone());

    let (_, ok) = get(&app, "/api/widget-config?script-urls=https%3A%2F%2Fcdn.example%2Fa.js").await;
    assert_eq!(ok["scripts"]["loaded"], true);

    let (_, failed) = get(&app, "/api/widget-config?script-urls=https%3A%2F%2Fcdn.example%2Fmissing.js").await;
    assert_eq!(failed["scripts"]["loaded"], false);
    assert!(failed["scripts"]["error"].as_str().unwrap().contains("missing.js"));

    get(&app, "/api/widget-config?script-urls=https%3A%2F%2Fcdn.example%2Fa.js").await;
    assert_eq!(
        fetcher.fetched(),
        vec!["https://cdn.example/a.js".to_string(), "https://cdn.example/missing.js".to_string()]
    );
}

#[tokio::test]
async fn demo_preset_only_applies_without_request_filters() {
    let settings = Settings {
        demo_preset: true,
        ..Settings::default()
    };
    let app = app_with(settings, Arc::new(RecordingFetcher::default()));

    let (_, requested) = get(&app, "/api/listings?marke=Skoda&category=PKW").await;
    assert_eq!(requested["filters"]["marke"], json!(["Skoda"]));
    assert_eq!(requested["query"], "category=PKW&marke=Skoda");

    let (_, preset) = get(&app, "/api/listings?sort=priceAsc").await;
    assert_eq!(preset["filters"]["marke"], json!(["Audi", "BMW"]));
    assert_eq!(
        preset["query"],
        "category=PKW&marke=Audi&marke=BMW&model=3+Series&model=A1&bodyType=SUV&fuel=Benzin"
    );
}
