// Applied filter projection: filter state -> ordered list of removable chips

use crate::{
    definitions::{self, DefinitionShape},
    models::{AppliedFilter, AppliedFilterKind, FilterDefinitionId, FilterState, PriceBound, RangeBound},
};

const CURRENCY_SUFFIX: &str = "€";

fn chip(
    id: String,
    label: String,
    kind: AppliedFilterKind,
    value: &str,
    definition_id: FilterDefinitionId,
) -> AppliedFilter {
    AppliedFilter {
        id,
        label,
        kind,
        value: value.to_string(),
        definition_id,
    }
}

/// Builds one chip per set value, following registry order.
///
/// Pure: equal states always produce equal chip lists.
pub fn build_applied_filters_from_state(state: &FilterState) -> Vec<AppliedFilter> {
    let mut filters = Vec::new();

    for definition in definitions::all() {
        let id = definition.id;
        match &definition.shape {
            DefinitionShape::Multi(shape) => {
                for value in state.multi(shape.state_key) {
                    filters.push(chip(
                        format!("{}-{}", id, value),
                        format!("{}: {}", shape.applied_label, value),
                        shape.applied_kind,
                        value,
                        id,
                    ));
                }
            }
            DefinitionShape::Single(shape) => {
                if let Some(value) = state.single(shape.state_key) {
                    filters.push(chip(
                        format!("{}-{}", id, value),
                        format!("{}: {}", shape.applied_label, value),
                        shape.applied_kind,
                        value,
                        id,
                    ));
                }
            }
            DefinitionShape::Range(shape) => {
                let bounds = [
                    (RangeBound::From, "from", shape.from_label, shape.from_kind),
                    (RangeBound::To, "to", shape.to_label, shape.to_kind),
                ];
                for (bound, suffix, label, kind) in bounds {
                    if let Some(value) = state.range(shape.range, bound) {
                        filters.push(chip(
                            format!("{}-{}-{}", id, suffix, value),
                            format!("{}: {}", label, value),
                            kind,
                            value,
                            id,
                        ));
                    }
                }
            }
            DefinitionShape::Price(shape) => {
                let bounds = [
                    (PriceBound::Min, "min", shape.min_label, shape.min_kind),
                    (PriceBound::Max, "max", shape.max_label, shape.max_kind),
                ];
                for (bound, suffix, label, kind) in bounds {
                    let value = state.price(bound).trim();
                    if value.is_empty() {
                        continue;
                    }
                    filters.push(chip(
                        format!("{}-{}-{}", id, suffix, value),
                        format!("{}: {} {}", label, value, CURRENCY_SUFFIX),
                        kind,
                        value,
                        id,
                    ));
                }
            }
        }
    }

    filters
}
