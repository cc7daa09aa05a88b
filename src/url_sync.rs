//! Two-way binding between filter state and a page URL's query string.
//!
//! The synchronizer never navigates: it only replaces the current history
//! entry through a [`UrlHost`], and skips the write when nothing changed.

use url::{Url, form_urlencoded};

use crate::{
    filter_state::FilterStore,
    input::sanitize_numeric_input,
    models::{FilterState, MultiKey, PriceBound, RangeBound, RangeId, ScalarKey, SingleKey},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    Single(ScalarKey),
    Multi(MultiKey),
}

#[derive(Debug, Clone, Copy)]
pub struct QueryMapping {
    pub query_key: &'static str,
    pub field: QueryField,
}

const fn single(query_key: &'static str, key: ScalarKey) -> QueryMapping {
    QueryMapping {
        query_key,
        field: QueryField::Single(key),
    }
}

const fn multi(query_key: &'static str, key: MultiKey) -> QueryMapping {
    QueryMapping {
        query_key,
        field: QueryField::Multi(key),
    }
}

/// Serialisation order of the query string.
pub const FILTER_QUERY_MAP: [QueryMapping; 23] = [
    single("category", ScalarKey::Single(SingleKey::Category)),
    single("location", ScalarKey::Single(SingleKey::Location)),
    single("radius", ScalarKey::Single(SingleKey::Radius)),
    multi("marke", MultiKey::Marke),
    multi("model", MultiKey::Model),
    multi("bodyType", MultiKey::BodyType),
    multi("fuel", MultiKey::Fuel),
    multi("financing", MultiKey::Financing),
    single("transmission", ScalarKey::Single(SingleKey::Transmission)),
    single("condition", ScalarKey::Single(SingleKey::Condition)),
    single("yearFrom", ScalarKey::Range(RangeId::Year, RangeBound::From)),
    single("yearTo", ScalarKey::Range(RangeId::Year, RangeBound::To)),
    single("kilometerFrom", ScalarKey::Range(RangeId::Kilometer, RangeBound::From)),
    single("kilometerTo", ScalarKey::Range(RangeId::Kilometer, RangeBound::To)),
    single("powerFrom", ScalarKey::Range(RangeId::Power, RangeBound::From)),
    single("powerTo", ScalarKey::Range(RangeId::Power, RangeBound::To)),
    single("displacementFrom", ScalarKey::Range(RangeId::Displacement, RangeBound::From)),
    single("displacementTo", ScalarKey::Range(RangeId::Displacement, RangeBound::To)),
    single("minPrice", ScalarKey::Price(PriceBound::Min)),
    single("maxPrice", ScalarKey::Price(PriceBound::Max)),
    single("doors", ScalarKey::Single(SingleKey::Doors)),
    single("seats", ScalarKey::Single(SingleKey::Seats)),
    multi("extras", MultiKey::Extras),
];

/// Deprecated keys stripped on every write: the UI-only extras search input
/// and an old duplicated query payload.
pub const LEGACY_QUERY_KEYS: [&str; 2] = ["extrasSearch", "carQueryParams"];

fn is_mapped_key(key: &str) -> bool {
    FILTER_QUERY_MAP.iter().any(|entry| entry.query_key == key)
}

fn is_managed_key(key: &str) -> bool {
    is_mapped_key(key) || LEGACY_QUERY_KEYS.contains(&key)
}

/// True when any mapped field holds a non-blank value.
pub fn has_any_mapped_filter_value(state: &FilterState) -> bool {
    FILTER_QUERY_MAP.iter().any(|entry| match entry.field {
        QueryField::Single(key) => state.scalar(key).is_some_and(|value| !value.trim().is_empty()),
        QueryField::Multi(key) => !state.multi(key).is_empty(),
    })
}

/// Canonical `application/x-www-form-urlencoded` query for the state.
///
/// Multi fields repeat their key once per value; they are never comma-joined.
pub fn build_query_from_state(state: &FilterState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for entry in &FILTER_QUERY_MAP {
        match entry.field {
            QueryField::Single(key) => {
                if let Some(value) = state.scalar(key).map(str::trim).filter(|v| !v.is_empty()) {
                    serializer.append_pair(entry.query_key, value);
                }
            }
            QueryField::Multi(key) => {
                for item in state.multi(key) {
                    let item = item.trim();
                    if !item.is_empty() {
                        serializer.append_pair(entry.query_key, item);
                    }
                }
            }
        }
    }

    serializer.finish()
}

fn parse_single_param(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

// Repeated keys are preferred; a single comma-joined value is the legacy format.
// A value legitimately containing a comma is split too (known lossy case).
fn parse_multi_param(pairs: &[(String, String)], key: &str) -> Vec<String> {
    let values: Vec<&str> = pairs
        .iter()
        .filter(|(name, _)| name == key)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .collect();

    match values.as_slice() {
        [only] if only.contains(',') => only
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect(),
        _ => values.into_iter().map(str::to_string).collect(),
    }
}

/// Reads filter state out of decoded query pairs, starting from `base`.
///
/// Returns `None` unless a mapped key is present and the result holds at least
/// one non-empty mapped field, so unrelated query params never hydrate.
pub fn parse_state_from_pairs(pairs: &[(String, String)], base: &FilterState) -> Option<FilterState> {
    if !pairs.iter().any(|(name, _)| is_mapped_key(name)) {
        return None;
    }

    let mut next = base.clone();
    for entry in &FILTER_QUERY_MAP {
        match entry.field {
            QueryField::Single(key) => {
                let value = parse_single_param(pairs, entry.query_key).and_then(|value| match key {
                    ScalarKey::Price(_) => Some(sanitize_numeric_input(value)).filter(|v| !v.is_empty()),
                    _ => Some(value),
                });
                if value.is_some() {
                    next.set_scalar(key, value);
                }
            }
            QueryField::Multi(key) => {
                *next.multi_mut(key) = parse_multi_param(pairs, entry.query_key);
            }
        }
    }

    has_any_mapped_filter_value(&next).then_some(next)
}

pub fn parse_state_from_query(query: &str, base: &FilterState) -> Option<FilterState> {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes()).into_owned().collect();
    parse_state_from_pairs(&pairs, base)
}

pub fn parse_state_from_url(url: &Url, base: &FilterState) -> Option<FilterState> {
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    parse_state_from_pairs(&pairs, base)
}

/// Path, query and fragment as a page would display them (`?`/`#` omitted when empty).
pub fn path_with_query(url: &Url) -> String {
    let search = url.query().filter(|q| !q.is_empty()).map(|q| format!("?{}", q));
    let hash = url.fragment().filter(|f| !f.is_empty()).map(|f| format!("#{}", f));
    format!(
        "{}{}{}",
        url.path(),
        search.unwrap_or_default(),
        hash.unwrap_or_default()
    )
}

/// The page location the synchronizer reads and rewrites.
pub trait UrlHost {
    fn current_url(&self) -> Url;

    /// Replaces the current history entry with a same-origin path+query+hash.
    /// Must not navigate or reload.
    fn replace_url(&mut self, path_with_query: &str);
}

/// In-memory location + history, used server-side and in tests.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    current: Url,
    replace_count: usize,
}

impl MemoryHistory {
    pub fn new(url: Url) -> Self {
        Self {
            current: url,
            replace_count: 0,
        }
    }

    pub fn parse(href: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(href)?))
    }

    pub fn url(&self) -> &Url {
        &self.current
    }

    /// Number of history replacements performed so far.
    pub fn replace_count(&self) -> usize {
        self.replace_count
    }

    pub fn path_with_query(&self) -> String {
        path_with_query(&self.current)
    }
}

impl UrlHost for MemoryHistory {
    fn current_url(&self) -> Url {
        self.current.clone()
    }

    fn replace_url(&mut self, path_with_query: &str) {
        match self.current.join(path_with_query) {
            Ok(next) => {
                self.current = next;
                self.replace_count += 1;
            }
            Err(e) => tracing::warn!("Ignoring unparsable URL replacement '{}': {}", path_with_query, e),
        }
    }
}

/// Rewrites the host URL so its filter params equal `query`.
///
/// Mapped and legacy keys are dropped, unrelated params and the fragment are
/// kept, then the filter params are appended. Returns whether the URL was written.
pub fn sync_filter_params_to_url<H: UrlHost + ?Sized>(host: &mut H, query: &str) -> bool {
    let current = host.current_url();
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for (key, value) in current.query_pairs() {
        if !is_managed_key(&key) {
            serializer.append_pair(&key, &value);
        }
    }
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        serializer.append_pair(&key, &value);
    }

    let next_query = serializer.finish();
    let mut next = current.clone();
    next.set_query(Some(next_query.as_str()).filter(|q| !q.is_empty()));

    let current_path = path_with_query(&current);
    let next_path = path_with_query(&next);
    if current_path == next_path {
        return false;
    }

    tracing::debug!("Replacing URL {} -> {}", current_path, next_path);
    host.replace_url(&next_path);
    true
}

/// Keeps a host URL in step with a [`FilterStore`].
#[derive(Debug)]
pub struct FilterUrlSync<H> {
    host: H,
    last_query: String,
}

impl<H: UrlHost> FilterUrlSync<H> {
    /// Hydrates the store from the URL (only when the store starts empty) and
    /// writes the current state back immediately.
    pub fn attach(store: &mut FilterStore, mut host: H) -> Self {
        let initial = store.create_snapshot();
        if !has_any_mapped_filter_value(&initial) {
            if let Some(from_url) = parse_state_from_url(&host.current_url(), &initial) {
                tracing::info!("Hydrated filter state from URL query");
                store.apply_snapshot(&from_url);
            }
        }

        let last_query = build_query_from_state(store.state());
        sync_filter_params_to_url(&mut host, &last_query);
        Self { host, last_query }
    }

    /// Pushes `state` to the URL if its serialised query changed since the last sync.
    pub fn sync(&mut self, state: &FilterState) -> bool {
        let query = build_query_from_state(state);
        if query == self.last_query {
            return false;
        }

        self.last_query = query;
        sync_filter_params_to_url(&mut self.host, &self.last_query)
    }

    pub fn query(&self) -> &str {
        &self.last_query
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn history(href: &str) -> MemoryHistory {
        MemoryHistory::parse(href).unwrap()
    }

    fn sample_state() -> FilterState {
        FilterState {
            category: Some("PKW".into()),
            marke: vec!["BMW".into(), "Mercedes-Benz".into()],
            model: vec!["3 Series".into()],
            extras: vec!["Apple CarPlay".into(), "360 Kamera".into()],
            year_from: Some("2018".into()),
            kilometer_to: Some("50000".into()),
            min_price: "20000".into(),
            doors: Some("4/5".into()),
            ..FilterState::default()
        }
    }

    #[test]
    fn query_repeats_multi_keys_in_table_order() {
        let query = build_query_from_state(&sample_state());
        assert_eq!(
            query,
            "category=PKW&marke=BMW&marke=Mercedes-Benz&model=3+Series&yearFrom=2018\
             &kilometerTo=50000&minPrice=20000&doors=4%2F5&extras=Apple+CarPlay&extras=360+Kamera"
        );
    }

    #[test]
    fn blank_entries_are_not_serialised() {
        let state = FilterState {
            marke: vec!["  ".into(), " Audi ".into()],
            max_price: "".into(),
            ..FilterState::default()
        };
        assert_eq!(build_query_from_state(&state), "marke=Audi");
    }

    #[test]
    fn serialise_then_parse_round_trips() {
        let state = sample_state();
        let query = build_query_from_state(&state);
        let parsed = parse_state_from_query(&query, &FilterState::default()).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn comma_joined_value_is_split_as_legacy_format() {
        let parsed = parse_state_from_query("marke=Audi,%20BMW,&fuel=Diesel", &FilterState::default()).unwrap();
        assert_eq!(parsed.marke, vec!["Audi".to_string(), "BMW".to_string()]);
        assert_eq!(parsed.fuel, vec!["Diesel".to_string()]);

        // Repeated keys are taken verbatim, commas included.
        let repeated = parse_state_from_query("marke=A,B&marke=C", &FilterState::default()).unwrap();
        assert_eq!(repeated.marke, vec!["A,B".to_string(), "C".to_string()]);
    }

    #[test]
    fn single_params_are_trimmed_and_blank_is_absent() {
        let parsed = parse_state_from_query("category=%20PKW%20&transmission=%20&seats=5", &FilterState::default()).unwrap();
        assert_eq!(parsed.category.as_deref(), Some("PKW"));
        assert_eq!(parsed.transmission, None);
        assert_eq!(parsed.seats.as_deref(), Some("5"));
    }

    #[test]
    fn unrelated_or_empty_params_do_not_hydrate() {
        assert_eq!(parse_state_from_query("utm_source=mail&page=2", &FilterState::default()), None);
        assert_eq!(parse_state_from_query("marke=&category=%20", &FilterState::default()), None);
    }

    #[test]
    fn prices_from_the_url_are_sanitised() {
        let parsed = parse_state_from_query("minPrice=20.000&maxPrice=abc", &FilterState::default()).unwrap();
        assert_eq!(parsed.min_price, "20000");
        assert_eq!(parsed.max_price, "");
    }

    #[test]
    fn sync_keeps_unrelated_params_and_hash_and_strips_legacy_keys() {
        let mut host = history("https://dealer.example/shop?utm=x&marke=Old&extrasSearch=nav&carQueryParams=a%3Db#results");
        let written = sync_filter_params_to_url(&mut host, "marke=BMW&marke=Audi");
        assert!(written);
        assert_eq!(host.path_with_query(), "/shop?utm=x&marke=BMW&marke=Audi#results");
        assert_eq!(host.replace_count(), 1);
    }

    #[test]
    fn sync_skips_identical_urls() {
        let mut host = history("https://dealer.example/shop?utm=x&marke=BMW");
        assert!(!sync_filter_params_to_url(&mut host, "marke=BMW"));
        assert_eq!(host.replace_count(), 0);
    }

    #[test]
    fn sync_drops_question_mark_when_nothing_remains() {
        let mut host = history("https://dealer.example/shop?marke=BMW");
        assert!(sync_filter_params_to_url(&mut host, ""));
        assert_eq!(host.path_with_query(), "/shop");
    }

    #[test]
    fn attach_hydrates_an_empty_store_and_writes_back() {
        let mut store = FilterStore::new();
        let host = history("https://dealer.example/?marke=Audi,BMW&minPrice=1000&ref=nav");
        let sync = FilterUrlSync::attach(&mut store, host);

        assert_eq!(store.state().marke, vec!["Audi".to_string(), "BMW".to_string()]);
        assert_eq!(store.state().min_price, "1000");
        // The legacy comma form is rewritten as repeated keys.
        assert_eq!(sync.host().path_with_query(), "/?ref=nav&marke=Audi&marke=BMW&minPrice=1000");
    }

    #[test]
    fn attach_never_overwrites_a_non_empty_store() {
        let mut store = FilterStore::with_state(FilterState {
            fuel: vec!["Diesel".into()],
            ..FilterState::default()
        });
        let sync = FilterUrlSync::attach(&mut store, history("https://dealer.example/?marke=Audi"));

        assert!(store.state().marke.is_empty());
        assert_eq!(store.state().fuel, vec!["Diesel".to_string()]);
        assert_eq!(sync.host().path_with_query(), "/?fuel=Diesel");
    }

    #[test]
    fn sync_writes_only_when_the_query_changes() {
        let mut store = FilterStore::new();
        let mut sync = FilterUrlSync::attach(&mut store, history("https://dealer.example/list"));
        assert_eq!(sync.host().replace_count(), 0);

        store.toggle_extra("Xenon");
        assert!(sync.sync(store.state()));
        assert!(!sync.sync(store.state()));
        assert_eq!(sync.host().path_with_query(), "/list?extras=Xenon");
        assert_eq!(sync.into_host().replace_count(), 1);
    }
}
