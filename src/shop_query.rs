// Translates filter state into the external shop backend's query vocabulary

use url::form_urlencoded;

use crate::models::FilterState;

const CATEGORY_TO_CAR_TYPE: [(&str, &str); 5] = [
    ("PKW", "pkw"),
    ("Motorrad", "zweirad"),
    ("Transporter", "nutzfahrzeug"),
    ("Wohnmobil", "wohnmobil"),
    ("LKW", "nutzfahrzeug"),
];

const MARKE_TO_MANUFACTURER: [(&str, &str); 5] = [
    ("Audi", "AUDI"),
    ("BMW", "BMW"),
    ("Mercedes-Benz", "MERCEDES-BENZ"),
    ("Skoda", "SKODA"),
    ("Volkswagen", "VW"),
];

const BODY_TYPE_TO_VEHICLE_SUBTYPE: [(&str, &str); 9] = [
    ("Kleinwagen", "kleinwagen"),
    ("SUV", "suv"),
    ("Limousine", "limousine"),
    ("Kombi", "kombi"),
    ("Van", "van"),
    ("Sportwagen", "sportwagen"),
    ("Coupe", "sportwagen"),
    ("Cabrio", "cabrio"),
    ("Gelaendewagen/Pickup", "geländewagen/pickup"),
];

const FUEL_TO_FUEL_TYPE: [(&str, &str); 5] = [
    ("Benzin", "BENZIN"),
    ("Diesel", "DIESEL"),
    ("Elektro", "ELEKTRO"),
    ("Hybrid", "HYBRID_BENZIN"),
    ("LPG", "LPG"),
];

const TRANSMISSION_TO_GEARBOX_TYPE: [(&str, &str); 2] =
    [("Automatik", "AUTOMATIK"), ("Schaltgetriebe", "MANUELL")];

const CONDITION_TO_USED_CONDITION_TYPE: [(&str, &str); 4] = [
    ("Neu", "NEUWAGEN"),
    ("Gebraucht", "GEBRAUCHTWAGEN"),
    ("Vorfuehrfahrzeug", "VORFÜHRWAGEN"),
    ("Jahreswagen", "JAHRESWAGEN"),
];

#[derive(Debug, Clone, Copy)]
enum Fallback {
    Upper,
    Lower,
}

fn lookup(table: &[(&str, &str)], value: &str, fallback: Fallback) -> String {
    match table.iter().find(|(key, _)| *key == value) {
        Some((_, mapped)) => mapped.to_string(),
        None => match fallback {
            Fallback::Upper => value.to_uppercase(),
            Fallback::Lower => value.to_lowercase(),
        },
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Door group to the backend's (minDoors, maxDoors) pair.
fn doors_to_range(value: Option<&str>) -> (Option<&'static str>, Option<&'static str>) {
    match value {
        Some("2/3") => (None, Some("3")),
        Some("4/5") => (Some("4"), Some("5")),
        Some("6+") => (Some("6"), None),
        _ => (None, None),
    }
}

struct ShopParams {
    serializer: form_urlencoded::Serializer<'static, String>,
}

impl ShopParams {
    fn new() -> Self {
        Self {
            serializer: form_urlencoded::Serializer::new(String::new()),
        }
    }

    // The backend expects multi values comma-joined in a single parameter
    fn multi(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            self.serializer.append_pair(key, &values.join(","));
        }
    }

    fn single(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = non_blank(value) {
            self.serializer.append_pair(key, value);
        }
    }

    fn finish(mut self) -> String {
        self.serializer.finish()
    }
}

/// Builds the shop backend query for a filter snapshot.
///
/// Only the first selected make is forwarded; the backend accepts one manufacturer.
pub fn build_shop_query(state: &FilterState) -> String {
    let car_types: Vec<String> = non_blank(state.category.as_deref())
        .map(|c| lookup(&CATEGORY_TO_CAR_TYPE, c, Fallback::Lower))
        .into_iter()
        .collect();
    let manufacturer = state
        .marke
        .first()
        .map(|m| lookup(&MARKE_TO_MANUFACTURER, m, Fallback::Upper));
    let sub_types: Vec<String> = state
        .body_type
        .iter()
        .map(|b| lookup(&BODY_TYPE_TO_VEHICLE_SUBTYPE, b, Fallback::Lower))
        .collect();
    let fuel_types: Vec<String> = state
        .fuel
        .iter()
        .map(|f| lookup(&FUEL_TO_FUEL_TYPE, f, Fallback::Upper))
        .collect();
    let gearbox: Vec<String> = non_blank(state.transmission.as_deref())
        .map(|t| lookup(&TRANSMISSION_TO_GEARBOX_TYPE, t, Fallback::Upper))
        .into_iter()
        .collect();
    let used_condition: Vec<String> = non_blank(state.condition.as_deref())
        .map(|c| lookup(&CONDITION_TO_USED_CONDITION_TYPE, c, Fallback::Upper))
        .into_iter()
        .collect();
    let locations: Vec<String> = non_blank(state.location.as_deref())
        .map(str::to_string)
        .into_iter()
        .collect();
    let (min_doors, max_doors) = doors_to_range(state.doors.as_deref());

    let first_registration_from = non_blank(state.year_from.as_deref()).map(|y| format!("{}-01-01", y));
    let first_registration_to = non_blank(state.year_to.as_deref()).map(|y| format!("{}-12-31", y));

    let mut params = ShopParams::new();
    params.multi("carTypes", &car_types);
    params.single("manufacturer", manufacturer.as_deref());
    params.multi("models", &state.model);
    params.multi("vehicleSubTypes", &sub_types);
    params.multi("fuelTypes", &fuel_types);
    params.multi("gearBoxTypes", &gearbox);
    params.multi("usedConditionTypes", &used_condition);
    params.multi("locationNames", &locations);
    params.single("minInitialRegistration", first_registration_from.as_deref());
    params.single("maxInitialRegistration", first_registration_to.as_deref());
    params.single("maxMileAge", state.kilometer_to.as_deref());
    params.single("minEnginePower", state.power_from.as_deref());
    params.single("maxEnginePower", state.power_to.as_deref());
    params.single("engineCapacityMin", state.displacement_from.as_deref());
    params.single("engineCapacityMax", state.displacement_to.as_deref());
    params.single("minPrice", Some(state.min_price.as_str()));
    params.single("maxPrice", Some(state.max_price.as_str()));
    params.single("minDoors", min_doors);
    params.single("maxDoors", max_doors);
    params.single("seatsMin", state.seats.as_deref());
    params.single("seatsMax", state.seats.as_deref());
    params.finish()
}

/// Joins a static base query with the generated one, skipping blank sides.
pub fn merge_query_params(base: Option<&str>, dynamic: &str) -> String {
    let base = base.unwrap_or("").trim();
    let dynamic = dynamic.trim();

    match (base.is_empty(), dynamic.is_empty()) {
        (true, _) => dynamic.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}&{}", base, dynamic),
    }
}
