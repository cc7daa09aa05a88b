//! Filter-state engine for the vehicle search widget: option catalog,
//! definition registry, state store, applied-filter chips, URL query sync,
//! and the local result engine, plus the HTTP surface serving them.

pub mod applied_filters;
pub mod config;
pub mod definitions;
pub mod error;
pub mod filter_state;
pub mod input;
pub mod listings;
pub mod models;
pub mod options;
pub mod results;
pub mod routes;
pub mod saved_searches;
pub mod script_loader;
pub mod session;
pub mod shop_query;
pub mod url_sync;
pub mod widget_config;

pub use routes::{AppState, create_router};
