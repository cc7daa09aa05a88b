//! Result engine: filters, sorts and paginates a fixed listing source against
//! a [`FilterState`], and keeps the favorites set.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::DateTime;
use serde::Serialize;

use crate::{
    filter_state::parse_number,
    models::{CarListing, FilterState, PriceBound, RangeBound, RangeId, SortKey},
};

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Sort key plus the requested page. `page` is clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultQuery {
    pub sort: SortKey,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ResultQuery {
    fn default() -> Self {
        Self {
            sort: SortKey::Relevance,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
}

impl Pagination {
    /// Index range of the current page within the sorted items.
    pub fn slice_bounds(&self) -> (usize, usize) {
        if self.total_count == 0 {
            return (0, 0);
        }
        let start = (self.current_page - 1) * self.page_size;
        (start, (start + self.page_size).min(self.total_count))
    }
}

pub fn paginate(total_count: usize, page: usize, page_size: usize) -> Pagination {
    let page_size = page_size.max(1);
    let total_pages = if total_count == 0 {
        0
    } else {
        total_count.div_ceil(page_size)
    };
    let current_page = if total_pages == 0 {
        1
    } else {
        page.clamp(1, total_pages)
    };

    Pagination {
        total_count,
        total_pages,
        current_page,
        page_size,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub items: Vec<CarListing>,
    #[serde(flatten)]
    pub pagination: Pagination,
    pub is_empty: bool,
    pub sort: SortKey,
}

// Numeric bounds parsed once per query rather than once per listing
struct Criteria<'s> {
    state: &'s FilterState,
    ranges: [(RangeId, Option<f64>, Option<f64>); 4],
    min_price: Option<f64>,
    max_price: Option<f64>,
    seats: Option<f64>,
}

impl<'s> Criteria<'s> {
    fn new(state: &'s FilterState) -> Self {
        let bounds = |range: RangeId| {
            (
                range,
                parse_number(state.range(range, RangeBound::From)),
                parse_number(state.range(range, RangeBound::To)),
            )
        };

        Self {
            state,
            ranges: RangeId::ALL.map(bounds),
            min_price: parse_number(Some(state.price(PriceBound::Min))),
            max_price: parse_number(Some(state.price(PriceBound::Max))),
            seats: parse_number(state.seats.as_deref()),
        }
    }

    fn matches(&self, listing: &CarListing) -> bool {
        let state = self.state;

        let in_set = |selected: &[String], value: &str| {
            selected.is_empty() || selected.iter().any(|s| s == value)
        };
        let equals = |selected: &Option<String>, value: &str| {
            selected.as_deref().is_none_or(|s| s == value)
        };
        let within = |from: Option<f64>, to: Option<f64>, value: f64| {
            from.is_none_or(|from| value >= from) && to.is_none_or(|to| value <= to)
        };

        if !equals(&state.category, &listing.category) {
            return false;
        }
        // Listings without a location stay visible under a location filter
        if let (Some(wanted), Some(actual)) = (state.location.as_deref(), listing.location.as_deref()) {
            if wanted != actual {
                return false;
            }
        }

        if !in_set(&state.marke, &listing.make)
            || !in_set(&state.model, &listing.model)
            || !in_set(&state.body_type, &listing.body_type)
            || !in_set(&state.fuel, &listing.fuel)
        {
            return false;
        }

        if !state.financing.is_empty()
            && !state
                .financing
                .iter()
                .any(|option| listing.financing_options.contains(option))
        {
            return false;
        }

        if !equals(&state.transmission, &listing.transmission)
            || !equals(&state.condition, &listing.condition)
            || !equals(&state.doors, listing.doors.as_str())
        {
            return false;
        }

        for (range, from, to) in self.ranges {
            let value = match range {
                RangeId::Year => listing.year,
                RangeId::Kilometer => listing.kilometers,
                RangeId::Power => listing.power_ps,
                RangeId::Displacement => listing.displacement_ccm,
            };
            if !within(from, to, f64::from(value)) {
                return false;
            }
        }

        if !within(self.min_price, self.max_price, f64::from(listing.price)) {
            return false;
        }

        if self.seats.is_some_and(|seats| f64::from(listing.seats) != seats) {
            return false;
        }

        state
            .extras
            .iter()
            .all(|extra| listing.extras.contains(extra))
    }
}

/// Unparsable timestamps sort as the epoch.
fn to_timestamp(raw: &str) -> i64 {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.timestamp_millis())
        .unwrap_or(0)
}

#[derive(Debug, Clone)]
pub struct ResultEngine {
    source: Arc<[CarListing]>,
    created_at: HashMap<String, i64>,
}

impl ResultEngine {
    pub fn new(source: Arc<[CarListing]>) -> Self {
        let created_at = source
            .iter()
            .map(|listing| (listing.id.clone(), to_timestamp(&listing.created_at)))
            .collect();
        Self { source, created_at }
    }

    pub fn source(&self) -> &[CarListing] {
        &self.source
    }

    /// Listings satisfying every active constraint, in source order.
    pub fn filter(&self, state: &FilterState) -> Vec<&CarListing> {
        let criteria = Criteria::new(state);
        self.source
            .iter()
            .filter(|listing| criteria.matches(listing))
            .collect()
    }

    fn created_at(&self, listing: &CarListing) -> i64 {
        self.created_at.get(&listing.id).copied().unwrap_or(0)
    }

    /// Stable sort; equal keys keep their filtered order.
    pub fn sort(&self, items: &mut [&CarListing], key: SortKey) {
        items.sort_by(|left, right| match key {
            SortKey::PriceAsc => left.price.cmp(&right.price),
            SortKey::PriceDesc => right.price.cmp(&left.price),
            SortKey::Newest => right.year.cmp(&left.year),
            SortKey::MileageAsc => left.kilometers.cmp(&right.kilometers),
            SortKey::Relevance => right
                .relevance_score
                .cmp(&left.relevance_score)
                .then_with(|| self.created_at(right).cmp(&self.created_at(left))),
        });
    }

    pub fn filtered_sorted(&self, state: &FilterState, key: SortKey) -> Vec<&CarListing> {
        let mut items = self.filter(state);
        self.sort(&mut items, key);
        items
    }

    pub fn query(&self, state: &FilterState, query: &ResultQuery) -> ResultPage {
        let sorted = self.filtered_sorted(state, query.sort);
        let pagination = paginate(sorted.len(), query.page, query.page_size);
        let (start, end) = pagination.slice_bounds();

        tracing::debug!(
            "Result query matched {} listings, page {}/{}",
            pagination.total_count,
            pagination.current_page,
            pagination.total_pages
        );

        ResultPage {
            items: sorted[start..end].iter().map(|&listing| listing.clone()).collect(),
            is_empty: pagination.total_count == 0,
            pagination,
            sort: query.sort,
        }
    }
}

/// Immutable favorites set. Toggling yields a new set behind a new pointer,
/// so callers can detect changes by identity.
#[derive(Debug, Clone, Default)]
pub struct Favorites(Arc<HashSet<String>>);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn count(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn toggle(&self, id: &str) -> Favorites {
        let mut next = HashSet::clone(&self.0);
        if !next.remove(id) {
            next.insert(id.to_string());
        }
        Favorites(Arc::new(next))
    }

    pub fn ptr_eq(&self, other: &Favorites) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Sorted ids, for stable output.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.0.iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl PartialEq for Favorites {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Favorites {}
