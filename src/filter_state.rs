//! Filter state store: owns one [`FilterState`] and exposes typed mutations
//! plus the option lists derived from it.

use std::fmt::Display;

use crate::{
    applied_filters::build_applied_filters_from_state,
    definitions::{self, DefinitionShape},
    input,
    models::{
        AppliedFilter, FilterDefinitionId, FilterOption, FilterState, MultiKey, PriceBound,
        RangeBound, RangeId, SingleKey,
    },
    options,
};

/// Parses a numeric filter bound. Blank or non-finite input means "no constraint".
pub fn parse_number(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

// Optional scalars are stored trimmed, blank collapses to None
fn normalize_scalar(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Options for the "to" end of a range given the selected "from".
///
/// No "from" (or an unparsable one) yields the full catalog; the maximum
/// kilometer step yields an empty list, which disables the "to" input.
pub fn range_to_options(range: RangeId, from: Option<&str>) -> Vec<&'static FilterOption> {
    let catalog = options::range_options(range);
    let Some(from) = from.filter(|from| !from.is_empty()) else {
        return catalog.iter().collect();
    };

    if range == RangeId::Kilometer && from == options::max_kilometer_value() {
        return Vec::new();
    }

    let Some(from_number) = parse_number(Some(from)) else {
        return catalog.iter().collect();
    };

    catalog
        .iter()
        .filter(|option| {
            parse_number(Some(&option.value)).is_none_or(|value| value >= from_number)
        })
        .collect()
}

/// Extra options whose label contains `search`, case-insensitively.
pub fn filtered_extra_options(search: &str) -> Vec<&'static FilterOption> {
    let needle = search.trim().to_lowercase();
    options::EXTRA_OPTIONS
        .iter()
        .filter(|option| needle.is_empty() || option.label.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    state: FilterState,
    revision: u64,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the given state, enforcing the dependent-range rules once.
    pub fn with_state(state: FilterState) -> Self {
        let mut store = Self { state, revision: 0 };
        for range in RangeId::ALL {
            store.enforce_range_dependency(range);
        }
        store
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Bumped on every mutation; derived views use it to detect staleness.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // --- Multi fields ---

    pub fn get_multi_value(&self, key: MultiKey) -> &[String] {
        self.state.multi(key)
    }

    pub fn set_multi_value<I, S>(&mut self, key: MultiKey, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.state.multi_mut(key) = values.into_iter().map(Into::into).collect();
        self.touch();
    }

    /// Removes the first occurrence of `value`; absent values are a no-op.
    pub fn remove_multi_value(&mut self, key: MultiKey, value: &str) {
        let list = self.state.multi_mut(key);
        if let Some(position) = list.iter().position(|item| item == value) {
            list.remove(position);
            self.touch();
        }
    }

    pub fn clear_multi_value(&mut self, key: MultiKey) {
        self.state.multi_mut(key).clear();
        self.touch();
    }

    pub fn toggle_extra(&mut self, value: &str) {
        if self.state.extras.iter().any(|extra| extra == value) {
            self.remove_multi_value(MultiKey::Extras, value);
            return;
        }

        self.state.extras.push(value.to_string());
        self.touch();
    }

    // --- Single fields ---

    pub fn get_single_value(&self, key: SingleKey) -> Option<&str> {
        self.state.single(key)
    }

    pub fn set_single_value(&mut self, key: SingleKey, value: Option<&str>) {
        *self.state.single_mut(key) = normalize_scalar(value);
        self.touch();
    }

    // --- Range fields ---

    pub fn get_range_value(&self, range: RangeId, bound: RangeBound) -> Option<&str> {
        self.state.range(range, bound)
    }

    /// Sets one end of a range; changing "from" may clear an incompatible "to".
    pub fn set_range_value(&mut self, range: RangeId, bound: RangeBound, value: Option<&str>) {
        *self.state.range_mut(range, bound) = normalize_scalar(value);
        self.touch();
        if bound == RangeBound::From {
            self.enforce_range_dependency(range);
        }
    }

    fn enforce_range_dependency(&mut self, range: RangeId) {
        let Some(from) = self.state.range(range, RangeBound::From) else {
            return;
        };

        let clear_to = if range == RangeId::Kilometer && from == options::max_kilometer_value() {
            true
        } else {
            match (
                parse_number(Some(from)),
                parse_number(self.state.range(range, RangeBound::To)),
            ) {
                (Some(from), Some(to)) => to < from,
                _ => false,
            }
        };

        if clear_to && self.state.range(range, RangeBound::To).is_some() {
            tracing::debug!(?range, "Clearing range upper bound below the new lower bound");
            *self.state.range_mut(range, RangeBound::To) = None;
            self.touch();
        }
    }

    pub fn range_to_options(&self, range: RangeId) -> Vec<&'static FilterOption> {
        range_to_options(range, self.state.range(range, RangeBound::From))
    }

    pub fn is_kilometer_to_disabled(&self) -> bool {
        self.range_to_options(RangeId::Kilometer).is_empty()
    }

    // --- Price ---

    pub fn set_min_price(&mut self, raw: impl Display) {
        self.state.min_price = input::sanitize_numeric_input(raw);
        self.touch();
    }

    pub fn set_max_price(&mut self, raw: impl Display) {
        self.state.max_price = input::sanitize_numeric_input(raw);
        self.touch();
    }

    // --- Definition-level operations ---

    /// Resets every field backing the definition to its empty shape.
    pub fn clear_definition(&mut self, id: FilterDefinitionId) {
        let Ok(definition) = definitions::definition(id) else {
            return;
        };

        match &definition.shape {
            DefinitionShape::Multi(shape) => self.state.multi_mut(shape.state_key).clear(),
            DefinitionShape::Single(shape) => *self.state.single_mut(shape.state_key) = None,
            DefinitionShape::Range(shape) => {
                *self.state.range_mut(shape.range, RangeBound::From) = None;
                *self.state.range_mut(shape.range, RangeBound::To) = None;
            }
            DefinitionShape::Price(_) => {
                self.state.min_price.clear();
                self.state.max_price.clear();
            }
        }
        self.touch();
    }

    pub fn clear_all_filters(&mut self) {
        for definition in definitions::all() {
            self.clear_definition(definition.id);
        }
    }

    /// Removes exactly the value a chip represents.
    ///
    /// Single definitions are cleared whatever value the chip carries, since a
    /// single field yields at most one chip.
    pub fn remove_applied_filter(&mut self, filter: &AppliedFilter) {
        let Ok(definition) = definitions::definition(filter.definition_id) else {
            return;
        };

        match &definition.shape {
            DefinitionShape::Multi(shape) => {
                self.remove_multi_value(shape.state_key, &filter.value);
            }
            DefinitionShape::Single(shape) => {
                *self.state.single_mut(shape.state_key) = None;
                self.touch();
            }
            DefinitionShape::Range(shape) => {
                let bound = if filter.kind == shape.from_kind {
                    RangeBound::From
                } else if filter.kind == shape.to_kind {
                    RangeBound::To
                } else {
                    return;
                };
                *self.state.range_mut(shape.range, bound) = None;
                self.touch();
            }
            DefinitionShape::Price(shape) => {
                let bound = if filter.kind == shape.min_kind {
                    PriceBound::Min
                } else if filter.kind == shape.max_kind {
                    PriceBound::Max
                } else {
                    return;
                };
                self.state.price_mut(bound).clear();
                self.touch();
            }
        }
    }

    pub fn applied_filters(&self) -> Vec<AppliedFilter> {
        build_applied_filters_from_state(&self.state)
    }

    // --- Snapshots ---

    /// An independent deep copy of the current state.
    pub fn create_snapshot(&self) -> FilterState {
        self.state.clone()
    }

    /// Replaces the state with a copy of `snapshot`; any range whose "from"
    /// changed is re-checked against its "to".
    pub fn apply_snapshot(&mut self, snapshot: &FilterState) {
        let previous = std::mem::replace(&mut self.state, snapshot.clone());
        self.touch();
        for range in RangeId::ALL {
            if previous.range(range, RangeBound::From) != self.state.range(range, RangeBound::From) {
                self.enforce_range_dependency(range);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(options: &[&FilterOption]) -> Vec<String> {
        options.iter().map(|option| option.value.clone()).collect()
    }

    #[test]
    fn multi_values_are_copied_and_removed_by_equality() {
        let mut store = FilterStore::new();
        let selected = vec!["Audi".to_string(), "BMW".to_string()];
        store.set_multi_value(MultiKey::Marke, selected.iter().cloned());
        assert_eq!(store.get_multi_value(MultiKey::Marke), selected.as_slice());

        store.remove_multi_value(MultiKey::Marke, "Skoda");
        assert_eq!(store.get_multi_value(MultiKey::Marke).len(), 2);

        store.remove_multi_value(MultiKey::Marke, "Audi");
        assert_eq!(store.get_multi_value(MultiKey::Marke), ["BMW".to_string()]);

        store.clear_multi_value(MultiKey::Marke);
        assert!(store.get_multi_value(MultiKey::Marke).is_empty());
    }

    #[test]
    fn toggle_extra_flips_membership() {
        let mut store = FilterStore::new();
        store.toggle_extra("Xenon");
        store.toggle_extra("Sitzheizung");
        assert_eq!(store.state().extras, vec!["Xenon".to_string(), "Sitzheizung".to_string()]);
        store.toggle_extra("Xenon");
        assert_eq!(store.state().extras, vec!["Sitzheizung".to_string()]);
    }

    #[test]
    fn single_values_are_trimmed_and_blank_is_unset() {
        let mut store = FilterStore::new();
        store.set_single_value(SingleKey::Transmission, Some("  Automatik "));
        assert_eq!(store.get_single_value(SingleKey::Transmission), Some("Automatik"));
        store.set_single_value(SingleKey::Transmission, Some("   "));
        assert_eq!(store.get_single_value(SingleKey::Transmission), None);
    }

    #[test]
    fn prices_are_stored_digits_only() {
        let mut store = FilterStore::new();
        store.set_min_price("12a3€");
        store.set_max_price(4500);
        assert_eq!(store.state().min_price, "123");
        assert_eq!(store.state().max_price, "4500");
    }

    #[test]
    fn max_kilometer_from_clears_kilometer_to() {
        let mut store = FilterStore::new();
        store.set_range_value(RangeId::Kilometer, RangeBound::To, Some("250000"));
        store.set_range_value(RangeId::Kilometer, RangeBound::From, Some("250000"));
        assert_eq!(store.get_range_value(RangeId::Kilometer, RangeBound::To), None);
        assert!(store.is_kilometer_to_disabled());
    }

    #[test]
    fn raising_year_from_above_year_to_clears_year_to() {
        let mut store = FilterStore::new();
        store.set_range_value(RangeId::Year, RangeBound::From, Some("2015"));
        store.set_range_value(RangeId::Year, RangeBound::To, Some("2018"));
        store.set_range_value(RangeId::Year, RangeBound::From, Some("2017"));
        assert_eq!(store.get_range_value(RangeId::Year, RangeBound::To), Some("2018"));

        store.set_range_value(RangeId::Year, RangeBound::From, Some("2020"));
        assert_eq!(store.get_range_value(RangeId::Year, RangeBound::To), None);
    }

    #[test]
    fn lowering_to_below_from_is_left_alone() {
        let mut store = FilterStore::new();
        store.set_range_value(RangeId::Power, RangeBound::From, Some("200"));
        store.set_range_value(RangeId::Power, RangeBound::To, Some("100"));
        assert_eq!(store.get_range_value(RangeId::Power, RangeBound::To), Some("100"));
    }

    #[test]
    fn unparsable_from_does_not_constrain() {
        let mut store = FilterStore::new();
        store.set_range_value(RangeId::Displacement, RangeBound::To, Some("1000"));
        store.set_range_value(RangeId::Displacement, RangeBound::From, Some("viel"));
        assert_eq!(store.get_range_value(RangeId::Displacement, RangeBound::To), Some("1000"));
        assert_eq!(
            store.range_to_options(RangeId::Displacement).len(),
            options::DISPLACEMENT_OPTIONS.len()
        );
    }

    #[test]
    fn to_options_start_at_from() {
        let mut store = FilterStore::new();
        assert_eq!(store.range_to_options(RangeId::Kilometer).len(), options::KILOMETER_OPTIONS.len());

        store.set_range_value(RangeId::Kilometer, RangeBound::From, Some("150000"));
        assert_eq!(
            values(&store.range_to_options(RangeId::Kilometer)),
            vec!["150000", "200000", "250000"]
        );
        assert!(!store.is_kilometer_to_disabled());

        store.set_range_value(RangeId::Year, RangeBound::From, Some("1982"));
        assert_eq!(values(&store.range_to_options(RangeId::Year)).last().map(String::as_str), Some("1982"));
    }

    #[test]
    fn extras_search_matches_labels_case_insensitively() {
        assert_eq!(filtered_extra_options("  ").len(), options::EXTRA_OPTIONS.len());
        assert_eq!(
            values(&filtered_extra_options("TEMPOMAT")),
            vec!["Tempomat", "Adaptiver Tempomat"]
        );
    }

    #[test]
    fn clear_definition_resets_each_shape() {
        let mut store = FilterStore::with_state(FilterState::demo_preset());
        store.set_range_value(RangeId::Year, RangeBound::From, Some("2019"));
        store.set_min_price("1000");

        store.clear_definition(FilterDefinitionId::Marke);
        store.clear_definition(FilterDefinitionId::Category);
        store.clear_definition(FilterDefinitionId::Year);
        store.clear_definition(FilterDefinitionId::Budget);

        let state = store.state();
        assert!(state.marke.is_empty());
        assert_eq!(state.category, None);
        assert_eq!(state.year_from, None);
        assert_eq!(state.min_price, "");
        assert_eq!(state.model.len(), 2);

        store.clear_all_filters();
        assert_eq!(store.state(), &FilterState::default());
    }

    #[test]
    fn removing_every_chip_clears_all_filters() {
        let mut store = FilterStore::with_state(FilterState::demo_preset());
        store.set_range_value(RangeId::Kilometer, RangeBound::From, Some("10000"));
        store.set_range_value(RangeId::Kilometer, RangeBound::To, Some("50000"));
        store.set_max_price("30000");
        store.toggle_extra("Xenon");
        store.set_single_value(SingleKey::Seats, Some("5"));

        for chip in store.applied_filters() {
            store.remove_applied_filter(&chip);
        }

        assert!(store.applied_filters().is_empty());
        assert_eq!(store.state(), &FilterState::default());
    }

    #[test]
    fn snapshots_share_nothing_with_the_store() {
        let mut store = FilterStore::with_state(FilterState::demo_preset());
        let mut snapshot = store.create_snapshot();
        snapshot.marke.push("Skoda".into());
        assert_eq!(store.state().marke.len(), 2);

        store.apply_snapshot(&snapshot);
        snapshot.marke.clear();
        assert_eq!(store.state().marke.len(), 3);
    }

    #[test]
    fn applying_a_snapshot_enforces_range_rules() {
        let mut store = FilterStore::new();
        let snapshot = FilterState {
            year_from: Some("2022".into()),
            year_to: Some("2019".into()),
            ..FilterState::default()
        };
        store.apply_snapshot(&snapshot);
        assert_eq!(store.state().year_from.as_deref(), Some("2022"));
        assert_eq!(store.state().year_to, None);
    }

    #[test]
    fn revision_advances_on_mutation() {
        let mut store = FilterStore::new();
        let before = store.revision();
        store.toggle_extra("Xenon");
        assert!(store.revision() > before);
    }
}
