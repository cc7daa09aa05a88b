// Shared data structures: filter state, applied filters, listings, sort keys

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::FilterError;

// One selectable catalog entry (make, fuel type, year, ...)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub id: String,
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
        }
    }
}

// --- State keys ---

/// List-valued filter fields.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MultiKey {
    Marke,
    Model,
    BodyType,
    Fuel,
    Financing,
    Extras,
}

/// Optional single-valued filter fields (range endpoints are addressed via [`RangeId`]).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SingleKey {
    Category,
    Location,
    Radius,
    Transmission,
    Condition,
    Doors,
    Seats,
}

/// The four numeric from/to pairs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum RangeId {
    Year,
    Kilometer,
    Power,
    Displacement,
}

impl RangeId {
    pub const ALL: [RangeId; 4] = [
        RangeId::Year,
        RangeId::Kilometer,
        RangeId::Power,
        RangeId::Displacement,
    ];
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum RangeBound {
    From,
    To,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PriceBound {
    Min,
    Max,
}

/// Every scalar (string-valued) field of [`FilterState`], used by the URL mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Single(SingleKey),
    Range(RangeId, RangeBound),
    Price(PriceBound),
}

impl FromStr for MultiKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "marke" => Ok(MultiKey::Marke),
            "model" => Ok(MultiKey::Model),
            "bodyType" => Ok(MultiKey::BodyType),
            "fuel" => Ok(MultiKey::Fuel),
            "financing" => Ok(MultiKey::Financing),
            "extras" => Ok(MultiKey::Extras),
            other => Err(FilterError::UnknownStateKey(other.to_string())),
        }
    }
}

impl FromStr for SingleKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(SingleKey::Category),
            "location" => Ok(SingleKey::Location),
            "radius" => Ok(SingleKey::Radius),
            "transmission" => Ok(SingleKey::Transmission),
            "condition" => Ok(SingleKey::Condition),
            "doors" => Ok(SingleKey::Doors),
            "seats" => Ok(SingleKey::Seats),
            other => Err(FilterError::UnknownStateKey(other.to_string())),
        }
    }
}

// --- Filter state ---

/// The mutable filter record owned by a `FilterStore`.
///
/// List fields are always present (possibly empty); optional scalars are `None`
/// or a non-empty trimmed string; prices are digit-only strings defaulting to `""`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub category: Option<String>,
    pub location: Option<String>,
    pub radius: Option<String>,
    pub marke: Vec<String>,
    pub model: Vec<String>,
    pub body_type: Vec<String>,
    pub fuel: Vec<String>,
    pub financing: Vec<String>,
    pub transmission: Option<String>,
    pub condition: Option<String>,
    pub year_from: Option<String>,
    pub year_to: Option<String>,
    pub kilometer_from: Option<String>,
    pub kilometer_to: Option<String>,
    pub power_from: Option<String>,
    pub power_to: Option<String>,
    pub displacement_from: Option<String>,
    pub displacement_to: Option<String>,
    pub min_price: String,
    pub max_price: String,
    pub doors: Option<String>,
    pub seats: Option<String>,
    pub extras: Vec<String>,
}

impl FilterState {
    /// Demo preset some widget variants start with.
    pub fn demo_preset() -> Self {
        Self {
            category: Some("PKW".to_string()),
            marke: vec!["Audi".to_string(), "BMW".to_string()],
            model: vec!["3 Series".to_string(), "A1".to_string()],
            body_type: vec!["SUV".to_string()],
            fuel: vec!["Benzin".to_string()],
            ..Self::default()
        }
    }

    pub fn multi(&self, key: MultiKey) -> &Vec<String> {
        match key {
            MultiKey::Marke => &self.marke,
            MultiKey::Model => &self.model,
            MultiKey::BodyType => &self.body_type,
            MultiKey::Fuel => &self.fuel,
            MultiKey::Financing => &self.financing,
            MultiKey::Extras => &self.extras,
        }
    }

    pub(crate) fn multi_mut(&mut self, key: MultiKey) -> &mut Vec<String> {
        match key {
            MultiKey::Marke => &mut self.marke,
            MultiKey::Model => &mut self.model,
            MultiKey::BodyType => &mut self.body_type,
            MultiKey::Fuel => &mut self.fuel,
            MultiKey::Financing => &mut self.financing,
            MultiKey::Extras => &mut self.extras,
        }
    }

    pub fn single(&self, key: SingleKey) -> Option<&str> {
        match key {
            SingleKey::Category => self.category.as_deref(),
            SingleKey::Location => self.location.as_deref(),
            SingleKey::Radius => self.radius.as_deref(),
            SingleKey::Transmission => self.transmission.as_deref(),
            SingleKey::Condition => self.condition.as_deref(),
            SingleKey::Doors => self.doors.as_deref(),
            SingleKey::Seats => self.seats.as_deref(),
        }
    }

    pub(crate) fn single_mut(&mut self, key: SingleKey) -> &mut Option<String> {
        match key {
            SingleKey::Category => &mut self.category,
            SingleKey::Location => &mut self.location,
            SingleKey::Radius => &mut self.radius,
            SingleKey::Transmission => &mut self.transmission,
            SingleKey::Condition => &mut self.condition,
            SingleKey::Doors => &mut self.doors,
            SingleKey::Seats => &mut self.seats,
        }
    }

    pub fn range(&self, range: RangeId, bound: RangeBound) -> Option<&str> {
        let value = match (range, bound) {
            (RangeId::Year, RangeBound::From) => &self.year_from,
            (RangeId::Year, RangeBound::To) => &self.year_to,
            (RangeId::Kilometer, RangeBound::From) => &self.kilometer_from,
            (RangeId::Kilometer, RangeBound::To) => &self.kilometer_to,
            (RangeId::Power, RangeBound::From) => &self.power_from,
            (RangeId::Power, RangeBound::To) => &self.power_to,
            (RangeId::Displacement, RangeBound::From) => &self.displacement_from,
            (RangeId::Displacement, RangeBound::To) => &self.displacement_to,
        };
        value.as_deref()
    }

    pub(crate) fn range_mut(&mut self, range: RangeId, bound: RangeBound) -> &mut Option<String> {
        match (range, bound) {
            (RangeId::Year, RangeBound::From) => &mut self.year_from,
            (RangeId::Year, RangeBound::To) => &mut self.year_to,
            (RangeId::Kilometer, RangeBound::From) => &mut self.kilometer_from,
            (RangeId::Kilometer, RangeBound::To) => &mut self.kilometer_to,
            (RangeId::Power, RangeBound::From) => &mut self.power_from,
            (RangeId::Power, RangeBound::To) => &mut self.power_to,
            (RangeId::Displacement, RangeBound::From) => &mut self.displacement_from,
            (RangeId::Displacement, RangeBound::To) => &mut self.displacement_to,
        }
    }

    pub fn price(&self, bound: PriceBound) -> &str {
        match bound {
            PriceBound::Min => &self.min_price,
            PriceBound::Max => &self.max_price,
        }
    }

    pub(crate) fn price_mut(&mut self, bound: PriceBound) -> &mut String {
        match bound {
            PriceBound::Min => &mut self.min_price,
            PriceBound::Max => &mut self.max_price,
        }
    }

    /// Reads any scalar field; a blank price reads as `None`.
    pub fn scalar(&self, key: ScalarKey) -> Option<&str> {
        match key {
            ScalarKey::Single(single) => self.single(single),
            ScalarKey::Range(range, bound) => self.range(range, bound),
            ScalarKey::Price(bound) => Some(self.price(bound)).filter(|value| !value.is_empty()),
        }
    }

    /// Writes any scalar field; `None` on a price field resets it to `""`.
    pub(crate) fn set_scalar(&mut self, key: ScalarKey, value: Option<String>) {
        match key {
            ScalarKey::Single(single) => *self.single_mut(single) = value,
            ScalarKey::Range(range, bound) => *self.range_mut(range, bound) = value,
            ScalarKey::Price(bound) => *self.price_mut(bound) = value.unwrap_or_default(),
        }
    }
}

// --- Applied filters ---

/// Which sub-field of a definition produced a chip.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AppliedFilterKind {
    Category,
    Marke,
    Model,
    BodyType,
    Fuel,
    Transmission,
    Condition,
    Location,
    Radius,
    Financing,
    Doors,
    Seats,
    Extra,
    YearFrom,
    YearTo,
    KilometerFrom,
    KilometerTo,
    PowerFrom,
    PowerTo,
    DisplacementFrom,
    DisplacementTo,
    PriceMin,
    PriceMax,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FilterDefinitionId {
    Category,
    Marke,
    Model,
    BodyType,
    Fuel,
    Financing,
    Transmission,
    Condition,
    Location,
    Radius,
    Year,
    Kilometer,
    Power,
    Displacement,
    Budget,
    Doors,
    Seats,
    Extras,
}

impl FilterDefinitionId {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterDefinitionId::Category => "category",
            FilterDefinitionId::Marke => "marke",
            FilterDefinitionId::Model => "model",
            FilterDefinitionId::BodyType => "bodyType",
            FilterDefinitionId::Fuel => "fuel",
            FilterDefinitionId::Financing => "financing",
            FilterDefinitionId::Transmission => "transmission",
            FilterDefinitionId::Condition => "condition",
            FilterDefinitionId::Location => "location",
            FilterDefinitionId::Radius => "radius",
            FilterDefinitionId::Year => "year",
            FilterDefinitionId::Kilometer => "kilometer",
            FilterDefinitionId::Power => "power",
            FilterDefinitionId::Displacement => "displacement",
            FilterDefinitionId::Budget => "budget",
            FilterDefinitionId::Doors => "doors",
            FilterDefinitionId::Seats => "seats",
            FilterDefinitionId::Extras => "extras",
        }
    }
}

impl fmt::Display for FilterDefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterDefinitionId {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [FilterDefinitionId; 18] = [
            FilterDefinitionId::Category,
            FilterDefinitionId::Marke,
            FilterDefinitionId::Model,
            FilterDefinitionId::BodyType,
            FilterDefinitionId::Fuel,
            FilterDefinitionId::Financing,
            FilterDefinitionId::Transmission,
            FilterDefinitionId::Condition,
            FilterDefinitionId::Location,
            FilterDefinitionId::Radius,
            FilterDefinitionId::Year,
            FilterDefinitionId::Kilometer,
            FilterDefinitionId::Power,
            FilterDefinitionId::Displacement,
            FilterDefinitionId::Budget,
            FilterDefinitionId::Doors,
            FilterDefinitionId::Seats,
            FilterDefinitionId::Extras,
        ];
        ALL.into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| FilterError::UnknownDefinition(s.to_string()))
    }
}

/// A human-readable chip for one currently-set filter value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilter {
    pub id: String,
    pub label: String,
    pub kind: AppliedFilterKind,
    pub value: String,
    pub definition_id: FilterDefinitionId,
}

// --- Listings ---

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorGroup {
    #[serde(rename = "2/3")]
    TwoThree,
    #[serde(rename = "4/5")]
    FourFive,
    #[serde(rename = "6+")]
    SixPlus,
}

impl DoorGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            DoorGroup::TwoThree => "2/3",
            DoorGroup::FourFive => "4/5",
            DoorGroup::SixPlus => "6+",
        }
    }
}

// One vehicle in the result set
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarListing {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub detail_url: String,
    pub image_url: String,
    pub category: String,
    pub make: String,
    pub model: String,
    pub body_type: String,
    pub fuel: String,
    pub transmission: String,
    pub condition: String,
    pub year: u32,
    pub kilometers: u32,
    pub power_ps: u32,
    pub displacement_ccm: u32,
    pub price: u32,
    pub monthly_rate: Option<u32>,
    #[serde(rename = "has360")]
    pub has_360: bool,
    pub doors: DoorGroup,
    pub seats: u32,
    pub extras: Vec<String>,
    pub financing_options: Vec<String>,
    pub location: Option<String>,
    pub consumption_text: Option<String>,
    pub emissions_text: Option<String>,
    pub relevance_score: i32,
    pub created_at: String, // ISO-8601, parsed once by the result engine
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Newest,
    MileageAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Relevance,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::Newest,
        SortKey::MileageAsc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::PriceAsc => "priceAsc",
            SortKey::PriceDesc => "priceDesc",
            SortKey::Newest => "newest",
            SortKey::MileageAsc => "mileageAsc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Relevance => "Relevanz",
            SortKey::PriceAsc => "Preis aufsteigend",
            SortKey::PriceDesc => "Preis absteigend",
            SortKey::Newest => "Neueste zuerst",
            SortKey::MileageAsc => "Kilometer aufsteigend",
        }
    }

    /// Unrecognised keys fall back to relevance.
    pub fn parse_lenient(raw: &str) -> SortKey {
        match SortKey::ALL.into_iter().find(|key| key.as_str() == raw.trim()) {
            Some(key) => key,
            None => {
                tracing::warn!("Unknown sort key '{}', falling back to relevance", raw);
                SortKey::Relevance
            }
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy)]
pub struct SortOption {
    pub key: SortKey,
    pub label: &'static str,
}

pub fn sort_options() -> Vec<SortOption> {
    SortKey::ALL
        .into_iter()
        .map(|key| SortOption {
            key,
            label: key.label(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_through_json_with_defaults() {
        let state: FilterState = serde_json::from_str(r#"{"marke":["BMW"],"yearFrom":"2019"}"#).unwrap();
        assert_eq!(state.marke, vec!["BMW".to_string()]);
        assert_eq!(state.year_from.as_deref(), Some("2019"));
        assert!(state.extras.is_empty());
        assert_eq!(state.min_price, "");
    }

    #[test]
    fn definition_ids_parse_from_their_wire_names() {
        assert_eq!("bodyType".parse::<FilterDefinitionId>().unwrap(), FilterDefinitionId::BodyType);
        assert_eq!(FilterDefinitionId::Budget.to_string(), "budget");
        assert!(matches!(
            "wheels".parse::<FilterDefinitionId>(),
            Err(FilterError::UnknownDefinition(id)) if id == "wheels"
        ));
    }

    #[test]
    fn unknown_sort_key_falls_back_to_relevance() {
        assert_eq!(SortKey::parse_lenient("priceDesc"), SortKey::PriceDesc);
        assert_eq!(SortKey::parse_lenient("cheapest"), SortKey::Relevance);
    }

    #[test]
    fn scalar_access_treats_blank_price_as_unset() {
        let mut state = FilterState::default();
        assert_eq!(state.scalar(ScalarKey::Price(PriceBound::Min)), None);
        state.set_scalar(ScalarKey::Price(PriceBound::Min), Some("500".into()));
        assert_eq!(state.scalar(ScalarKey::Price(PriceBound::Min)), Some("500"));
        state.set_scalar(ScalarKey::Price(PriceBound::Min), None);
        assert_eq!(state.min_price, "");
    }
}
