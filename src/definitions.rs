// Filter definition registry: declarative metadata for every filter field

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::{
    error::FilterError,
    models::{AppliedFilterKind, FilterDefinitionId, FilterOption, MultiKey, RangeId, SingleKey},
    options,
};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UiGroup {
    Budget,
    Vehicle,
    Extras,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DefinitionType {
    Multi,
    Single,
    Range,
    Price,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiShape {
    pub state_key: MultiKey,
    pub applied_kind: AppliedFilterKind,
    pub applied_label: &'static str,
    pub placeholder: &'static str,
    pub empty_text: &'static str,
    pub show_chips: bool,
    pub options: &'static [FilterOption],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleShape {
    pub state_key: SingleKey,
    pub applied_kind: AppliedFilterKind,
    pub applied_label: &'static str,
    pub placeholder: &'static str,
    pub options: &'static [FilterOption],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeShape {
    pub range: RangeId,
    pub from_kind: AppliedFilterKind,
    pub to_kind: AppliedFilterKind,
    pub from_label: &'static str,
    pub to_label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceShape {
    pub min_kind: AppliedFilterKind,
    pub max_kind: AppliedFilterKind,
    pub min_label: &'static str,
    pub max_label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DefinitionShape {
    Multi(MultiShape),
    Single(SingleShape),
    Range(RangeShape),
    Price(PriceShape),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDefinition {
    pub id: FilterDefinitionId,
    pub label: &'static str,
    pub ui_group: UiGroup,
    pub order: u32,
    #[serde(flatten)]
    pub shape: DefinitionShape,
}

impl FilterDefinition {
    pub fn definition_type(&self) -> DefinitionType {
        match self.shape {
            DefinitionShape::Multi(_) => DefinitionType::Multi,
            DefinitionShape::Single(_) => DefinitionType::Single,
            DefinitionShape::Range(_) => DefinitionType::Range,
            DefinitionShape::Price(_) => DefinitionType::Price,
        }
    }
}

fn multi(
    id: FilterDefinitionId,
    label: &'static str,
    ui_group: UiGroup,
    order: u32,
    shape: MultiShape,
) -> FilterDefinition {
    FilterDefinition {
        id,
        label,
        ui_group,
        order,
        shape: DefinitionShape::Multi(shape),
    }
}

fn single(
    id: FilterDefinitionId,
    label: &'static str,
    ui_group: UiGroup,
    order: u32,
    shape: SingleShape,
) -> FilterDefinition {
    FilterDefinition {
        id,
        label,
        ui_group,
        order,
        shape: DefinitionShape::Single(shape),
    }
}

fn range(
    id: FilterDefinitionId,
    label: &'static str,
    order: u32,
    shape: RangeShape,
) -> FilterDefinition {
    FilterDefinition {
        id,
        label,
        ui_group: UiGroup::Vehicle,
        order,
        shape: DefinitionShape::Range(shape),
    }
}

// Registry order is the applied-filter order; `order` only sorts within a UI group.
pub static FILTER_DEFINITIONS: Lazy<Vec<FilterDefinition>> = Lazy::new(|| {
    use AppliedFilterKind as Kind;
    use FilterDefinitionId as Id;

    vec![
        FilterDefinition {
            id: Id::Budget,
            label: "Budget",
            ui_group: UiGroup::Budget,
            order: 10,
            shape: DefinitionShape::Price(PriceShape {
                min_kind: Kind::PriceMin,
                max_kind: Kind::PriceMax,
                min_label: "Min",
                max_label: "Max",
            }),
        },
        multi(Id::Financing, "Finanzierungsart", UiGroup::Budget, 20, MultiShape {
            state_key: MultiKey::Financing,
            applied_kind: Kind::Financing,
            applied_label: "Finanzierung",
            placeholder: "Finanzierung suchen",
            empty_text: "Keine passende Finanzierungsart.",
            show_chips: false,
            options: &options::FINANCING_OPTIONS,
        }),
        single(Id::Category, "Kategorie", UiGroup::Vehicle, 10, SingleShape {
            state_key: SingleKey::Category,
            applied_kind: Kind::Category,
            applied_label: "Kategorie",
            placeholder: "Kategorie wählen",
            options: &options::CATEGORY_OPTIONS,
        }),
        single(Id::Location, "Standort", UiGroup::Vehicle, 12, SingleShape {
            state_key: SingleKey::Location,
            applied_kind: Kind::Location,
            applied_label: "Standort",
            placeholder: "Standort wählen",
            options: &options::LOCATION_OPTIONS,
        }),
        single(Id::Radius, "Umkreis", UiGroup::Vehicle, 14, SingleShape {
            state_key: SingleKey::Radius,
            applied_kind: Kind::Radius,
            applied_label: "Radius",
            placeholder: "Umkreis wählen",
            options: &options::RADIUS_OPTIONS,
        }),
        multi(Id::Marke, "Marke", UiGroup::Vehicle, 20, MultiShape {
            state_key: MultiKey::Marke,
            applied_kind: Kind::Marke,
            applied_label: "Marke",
            placeholder: "Marke suchen",
            empty_text: "Keine passende Marke.",
            show_chips: false,
            options: &options::MARKE_OPTIONS,
        }),
        multi(Id::Model, "Model", UiGroup::Vehicle, 30, MultiShape {
            state_key: MultiKey::Model,
            applied_kind: Kind::Model,
            applied_label: "Model",
            placeholder: "Model suchen",
            empty_text: "Kein passendes Model.",
            show_chips: false,
            options: &options::MODEL_OPTIONS,
        }),
        multi(Id::BodyType, "Karosserietyp", UiGroup::Vehicle, 40, MultiShape {
            state_key: MultiKey::BodyType,
            applied_kind: Kind::BodyType,
            applied_label: "Karosserietyp",
            placeholder: "Karosserietyp suchen",
            empty_text: "Kein passender Karosserietyp.",
            show_chips: false,
            options: &options::BODY_TYPE_OPTIONS,
        }),
        multi(Id::Fuel, "Kraftstoff", UiGroup::Vehicle, 50, MultiShape {
            state_key: MultiKey::Fuel,
            applied_kind: Kind::Fuel,
            applied_label: "Kraftstoff",
            placeholder: "Kraftstoff suchen",
            empty_text: "Kein passender Kraftstoff.",
            show_chips: false,
            options: &options::FUEL_OPTIONS,
        }),
        single(Id::Transmission, "Schaltung", UiGroup::Vehicle, 60, SingleShape {
            state_key: SingleKey::Transmission,
            applied_kind: Kind::Transmission,
            applied_label: "Schaltung",
            placeholder: "Schaltung wählen",
            options: &options::TRANSMISSION_OPTIONS,
        }),
        range(Id::Year, "Erstzulassung", 70, RangeShape {
            range: RangeId::Year,
            from_kind: Kind::YearFrom,
            to_kind: Kind::YearTo,
            from_label: "Baujahr von",
            to_label: "Baujahr bis",
        }),
        range(Id::Kilometer, "Kilometer", 80, RangeShape {
            range: RangeId::Kilometer,
            from_kind: Kind::KilometerFrom,
            to_kind: Kind::KilometerTo,
            from_label: "Kilometer von",
            to_label: "Kilometer bis",
        }),
        range(Id::Power, "Leistung", 82, RangeShape {
            range: RangeId::Power,
            from_kind: Kind::PowerFrom,
            to_kind: Kind::PowerTo,
            from_label: "Leistung von",
            to_label: "Leistung bis",
        }),
        range(Id::Displacement, "Hubraum", 84, RangeShape {
            range: RangeId::Displacement,
            from_kind: Kind::DisplacementFrom,
            to_kind: Kind::DisplacementTo,
            from_label: "Hubraum von",
            to_label: "Hubraum bis",
        }),
        single(Id::Condition, "Fahrzeugzustand", UiGroup::Vehicle, 90, SingleShape {
            state_key: SingleKey::Condition,
            applied_kind: Kind::Condition,
            applied_label: "Fahrzeugzustand",
            placeholder: "Zustand wählen",
            options: &options::CONDITION_OPTIONS,
        }),
        single(Id::Doors, "Anzahl Tueren", UiGroup::Extras, 10, SingleShape {
            state_key: SingleKey::Doors,
            applied_kind: Kind::Doors,
            applied_label: "Tueren",
            placeholder: "Anzahl Tueren waehlen",
            options: &options::DOOR_OPTIONS,
        }),
        single(Id::Seats, "Anzahl Sitze", UiGroup::Extras, 20, SingleShape {
            state_key: SingleKey::Seats,
            applied_kind: Kind::Seats,
            applied_label: "Sitze",
            placeholder: "Anzahl Sitze waehlen",
            options: &options::SEAT_OPTIONS,
        }),
        multi(Id::Extras, "Extras", UiGroup::Extras, 30, MultiShape {
            state_key: MultiKey::Extras,
            applied_kind: Kind::Extra,
            applied_label: "Extra",
            placeholder: "Extras suchen",
            empty_text: "Keine passenden Extras.",
            show_chips: true,
            options: &options::EXTRA_OPTIONS,
        }),
    ]
});

/// Every definition, in registry order.
pub fn all() -> &'static [FilterDefinition] {
    &FILTER_DEFINITIONS
}

/// Looks up a definition by id.
///
/// Every [`FilterDefinitionId`] is registered, so an error here means the
/// registry itself is misconfigured.
pub fn definition(id: FilterDefinitionId) -> Result<&'static FilterDefinition, FilterError> {
    FILTER_DEFINITIONS
        .iter()
        .find(|definition| definition.id == id)
        .ok_or_else(|| FilterError::UnknownDefinition(id.to_string()))
}

/// Definitions of one type within one UI group, ascending by `order`.
///
/// `sort_by_key` is stable, so equal orders keep registry order.
pub fn grouped(kind: DefinitionType, group: UiGroup) -> Vec<&'static FilterDefinition> {
    let mut definitions: Vec<&'static FilterDefinition> = FILTER_DEFINITIONS
        .iter()
        .filter(|definition| definition.definition_type() == kind && definition.ui_group == group)
        .collect();
    definitions.sort_by_key(|definition| definition.order);
    definitions
}

pub fn budget_definition() -> Option<&'static FilterDefinition> {
    FILTER_DEFINITIONS
        .iter()
        .find(|definition| definition.id == FilterDefinitionId::Budget)
}

pub fn extras_definition() -> Option<&'static FilterDefinition> {
    FILTER_DEFINITIONS
        .iter()
        .find(|definition| definition.id == FilterDefinitionId::Extras)
}

/// The grouped views a filter panel renders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedDefinitions {
    pub budget: Option<&'static FilterDefinition>,
    pub budget_multi: Vec<&'static FilterDefinition>,
    pub vehicle_single: Vec<&'static FilterDefinition>,
    pub vehicle_multi: Vec<&'static FilterDefinition>,
    pub vehicle_range: Vec<&'static FilterDefinition>,
    pub extras_single: Vec<&'static FilterDefinition>,
    pub extras: Option<&'static FilterDefinition>,
}

pub fn grouped_definitions() -> GroupedDefinitions {
    GroupedDefinitions {
        budget: budget_definition(),
        budget_multi: grouped(DefinitionType::Multi, UiGroup::Budget),
        vehicle_single: grouped(DefinitionType::Single, UiGroup::Vehicle),
        vehicle_multi: grouped(DefinitionType::Multi, UiGroup::Vehicle),
        vehicle_range: grouped(DefinitionType::Range, UiGroup::Vehicle),
        extras_single: grouped(DefinitionType::Single, UiGroup::Extras),
        extras: extras_definition(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_definition_id_is_registered_once() {
        for entry in all() {
            let found = definition(entry.id).unwrap();
            assert!(std::ptr::eq(found, entry));
            assert_eq!(entry.id.as_str().parse::<FilterDefinitionId>().unwrap(), entry.id);
        }
        assert_eq!(all().len(), 18);
    }

    #[test]
    fn vehicle_singles_are_sorted_by_order() {
        let ids: Vec<_> = grouped(DefinitionType::Single, UiGroup::Vehicle)
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                FilterDefinitionId::Category,
                FilterDefinitionId::Location,
                FilterDefinitionId::Radius,
                FilterDefinitionId::Transmission,
                FilterDefinitionId::Condition,
            ]
        );
    }

    #[test]
    fn extras_group_holds_doors_seats_and_extras() {
        let groups = grouped_definitions();
        let singles: Vec<_> = groups.extras_single.iter().map(|d| d.id).collect();
        assert_eq!(singles, vec![FilterDefinitionId::Doors, FilterDefinitionId::Seats]);
        assert_eq!(groups.extras.map(|d| d.id), Some(FilterDefinitionId::Extras));
        assert_eq!(groups.budget.map(|d| d.id), Some(FilterDefinitionId::Budget));
        assert_eq!(groups.vehicle_range.len(), 4);
    }

    #[test]
    fn definitions_serialize_with_type_tag() {
        let json = serde_json::to_value(definition(FilterDefinitionId::Year).unwrap()).unwrap();
        assert_eq!(json["type"], "range");
        assert_eq!(json["uiGroup"], "vehicle");
        assert_eq!(json["fromKind"], "yearFrom");
    }
}
