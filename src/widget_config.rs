// Host element attributes -> widget configuration

use serde::Serialize;

use crate::script_loader::parse_script_urls;

pub const DEFAULT_CLIENT_BASE_URL: &str = "https://minrath.de/fahrzeugshop#";
pub const DEFAULT_API_BASE_URL: &str = "https://production.meinfahrzeug.shop/api";
pub const DEFAULT_CDN_URL: &str = "https://s3-eu-central-1.ionoscloud.com/static-webshop/881d1f9e-ce12-43ce-9a64-e9fe1caf1ff7/widgets/production/";
pub const DEFAULT_TENANT_ADMIN_ID: &str = "881d1f9e-ce12-43ce-9a64-e9fe1caf1ff7";

/// Attribute names the widget reacts to, in kebab-case as set on the host.
pub const OBSERVED_ATTRIBUTES: [&str; 14] = [
    "client-base-url",
    "api-base-url",
    "cdn-url",
    "query-params",
    "widget-type",
    "tenant-admin-id",
    "is-car-carousel-autoplay",
    "padding-x",
    "padding-top",
    "padding-bottom",
    "pages-search-filter-enforced-manufacturer",
    "search-filter-enforced-vehicle-types",
    "enforced-vehicle-request-parameters",
    "script-urls",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub client_base_url: String,
    pub api_base_url: String,
    pub cdn_url: String,
    pub query_params: String,
    pub widget_type: String,
    pub tenant_admin_id: String,
    pub is_car_carousel_autoplay: bool,
    pub padding_x: String,
    pub padding_top: String,
    pub padding_bottom: String,
    pub pages_search_filter_enforced_manufacturer: String,
    pub search_filter_enforced_vehicle_types: String,
    pub enforced_vehicle_request_parameters: String,
    pub script_urls: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            client_base_url: DEFAULT_CLIENT_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            query_params: String::new(),
            widget_type: "1".to_string(),
            tenant_admin_id: DEFAULT_TENANT_ADMIN_ID.to_string(),
            is_car_carousel_autoplay: false,
            padding_x: "32px".to_string(),
            padding_top: "0px".to_string(),
            padding_bottom: "32px".to_string(),
            pages_search_filter_enforced_manufacturer: String::new(),
            search_filter_enforced_vehicle_types: String::new(),
            enforced_vehicle_request_parameters: String::new(),
            script_urls: None,
        }
    }
}

impl WidgetConfig {
    /// Builds the configuration from host attributes.
    ///
    /// Absent attributes keep their defaults and unknown ones are ignored. The
    /// autoplay flag is true for any present value except the literal `"false"`.
    pub fn from_attributes<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (name, value) in attributes {
            config.apply_attribute(name.as_ref(), value.as_ref());
        }
        config
    }

    /// Returns false for attributes the widget does not observe.
    pub fn apply_attribute(&mut self, name: &str, value: &str) -> bool {
        let value = value.to_string();
        match name {
            "client-base-url" => self.client_base_url = value,
            "api-base-url" => self.api_base_url = value,
            "cdn-url" => self.cdn_url = value,
            "query-params" => self.query_params = value,
            "widget-type" => self.widget_type = value,
            "tenant-admin-id" => self.tenant_admin_id = value,
            "is-car-carousel-autoplay" => self.is_car_carousel_autoplay = value != "false",
            "padding-x" => self.padding_x = value,
            "padding-top" => self.padding_top = value,
            "padding-bottom" => self.padding_bottom = value,
            "pages-search-filter-enforced-manufacturer" => {
                self.pages_search_filter_enforced_manufacturer = value
            }
            "search-filter-enforced-vehicle-types" => self.search_filter_enforced_vehicle_types = value,
            "enforced-vehicle-request-parameters" => self.enforced_vehicle_request_parameters = value,
            "script-urls" => self.script_urls = Some(value),
            other => {
                tracing::debug!("Ignoring unobserved widget attribute '{}'", other);
                return false;
            }
        }
        true
    }

    pub fn script_url_list(&self) -> Vec<String> {
        parse_script_urls(self.script_urls.as_deref())
    }
}
