// Runtime settings, layered: defaults, optional config.toml, then APP_* env vars

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::{results::DEFAULT_PAGE_SIZE, script_loader::parse_script_urls};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server_address: String,
    /// Default results page size when a request does not pass `pageSize`.
    pub page_size: usize,
    /// Start sessions from the demo filter preset instead of an empty state.
    pub demo_preset: bool,
    /// Comma-separated external scripts preloaded once at startup.
    pub script_urls: String,
    /// Static query params prepended to every generated shop query.
    pub shop_base_query: String,
    pub cors_allow_any_origin: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:3000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            demo_preset: false,
            script_urls: String::new(),
            shop_base_query: String::new(),
            cors_allow_any_origin: true,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let defaults = Settings::default();
        let builder = Config::builder()
            .set_default("server_address", defaults.server_address)?
            .set_default("page_size", defaults.page_size as u64)?
            .set_default("demo_preset", defaults.demo_preset)?
            .set_default("script_urls", defaults.script_urls)?
            .set_default("shop_base_query", defaults.shop_base_query)?
            .set_default("cors_allow_any_origin", defaults.cors_allow_any_origin)?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Load from environment variables (e.g., APP_SERVER_ADDRESS, APP_PAGE_SIZE)
            .add_source(Environment::with_prefix("APP").try_parsing(true));

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    pub fn script_url_list(&self) -> Vec<String> {
        parse_script_urls(Some(&self.script_urls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.server_address, "127.0.0.1:3000");
        assert_eq!(settings.page_size, 12);
        assert!(!settings.demo_preset);
        assert!(settings.cors_allow_any_origin);
        assert!(settings.script_url_list().is_empty());
    }
}
