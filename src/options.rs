// Filter option catalog: static selectable values, built once on first access

use chrono::Datelike;
use once_cell::sync::Lazy;

use crate::models::{FilterOption, RangeId};

fn labelled(entries: &[(&str, &str, &str)]) -> Vec<FilterOption> {
    entries
        .iter()
        .map(|(id, label, value)| FilterOption::new(*id, *label, *value))
        .collect()
}

// Same id/label/value scheme for a list of numeric steps
fn numeric_steps(prefix: &str, unit: Option<&str>, values: &[&str]) -> Vec<FilterOption> {
    values
        .iter()
        .map(|value| {
            let label = match unit {
                Some(unit) => format!("{} {}", value, unit),
                None => value.to_string(),
            };
            FilterOption::new(format!("{}-{}", prefix, value), label, *value)
        })
        .collect()
}

pub static MARKE_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    labelled(&[
        ("marke-audi", "Audi", "Audi"),
        ("marke-bmw", "BMW", "BMW"),
        ("marke-mercedes", "Mercedes-Benz", "Mercedes-Benz"),
        ("marke-skoda", "Skoda", "Skoda"),
        ("marke-volkswagen", "Volkswagen", "Volkswagen"),
    ])
});

pub static MODEL_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    labelled(&[
        ("model-3-series", "3 Series", "3 Series"),
        ("model-a1", "A1", "A1"),
        ("model-enyaq", "Enyaq", "Enyaq"),
        ("model-glc", "GLC", "GLC"),
        ("model-tiguan", "Tiguan", "Tiguan"),
    ])
});

pub static CATEGORY_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    labelled(&[
        ("category-car", "PKW", "PKW"),
        ("category-motorcycle", "Motorrad", "Motorrad"),
        ("category-van", "Transporter", "Transporter"),
        ("category-camper", "Wohnmobil", "Wohnmobil"),
        ("category-truck", "LKW", "LKW"),
    ])
});

pub static BODY_TYPE_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    labelled(&[
        ("body-kleinwagen", "Kleinwagen", "Kleinwagen"),
        ("body-suv", "SUV", "suv"),
        ("body-limousine", "Limousine", "Limousine"),
        ("body-kombi", "Kombi", "Kombi"),
        ("body-van", "Van", "Van"),
        ("body-sportwagen", "Sportwagen", "Sportwagen"),
        ("body-coupe", "Coupe", "Coupe"),
        ("body-cabrio", "Cabrio", "Cabrio"),
        ("body-gelaendewagen-pickup", "Gelaendewagen/Pickup", "Gelaendewagen/Pickup"),
    ])
});

pub static FUEL_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    labelled(&[
        ("fuel-benzin", "Benzin", "Benzin"),
        ("fuel-diesel", "Diesel", "Diesel"),
        ("fuel-hybrid", "Hybrid", "Hybrid"),
        ("fuel-elektro", "Elektro", "Elektro"),
        ("fuel-lpg", "LPG", "LPG"),
    ])
});

pub static TRANSMISSION_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    labelled(&[
        ("transmission-automatic", "Automatik", "Automatik"),
        ("transmission-manual", "Schaltgetriebe", "Schaltgetriebe"),
    ])
});

pub static CONDITION_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    labelled(&[
        ("condition-new", "Neu", "Neu"),
        ("condition-used", "Gebraucht", "Gebraucht"),
        ("condition-demo", "Vorfuehrfahrzeug", "Vorfuehrfahrzeug"),
        ("condition-yearly", "Jahreswagen", "Jahreswagen"),
    ])
});

pub static FINANCING_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    labelled(&[
        ("financing-leasing", "Leasing", "Leasing"),
        ("financing-abo", "Abo", "Abo"),
        ("financing-kredit", "Kredit", "Kredit"),
        ("financing-ratenkauf", "Ratenkauf", "Ratenkauf"),
        ("financing-ballon", "Ballonfinanzierung", "Ballonfinanzierung"),
    ])
});

pub static LOCATION_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    labelled(&[
        ("location-berlin", "Berlin", "Berlin"),
        ("location-hamburg", "Hamburg", "Hamburg"),
        ("location-muenchen", "Muenchen", "Muenchen"),
        ("location-koeln", "Koeln", "Koeln"),
        ("location-frankfurt", "Frankfurt am Main", "Frankfurt am Main"),
        ("location-stuttgart", "Stuttgart", "Stuttgart"),
    ])
});

pub static RADIUS_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    numeric_steps("radius", Some("km"), &["10", "25", "50", "100", "200", "300"])
});

// Current year down to 1980, newest first
pub static YEAR_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    let current_year = chrono::Local::now().year();
    (1980..=current_year)
        .rev()
        .map(|year| {
            let year = year.to_string();
            FilterOption::new(format!("year-{}", year), year.clone(), year)
        })
        .collect()
});

pub static KILOMETER_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    numeric_steps(
        "kilometer",
        None,
        &[
            "0", "5000", "10000", "20000", "30000", "40000", "50000", "75000", "100000", "125000",
            "150000", "200000", "250000",
        ],
    )
});

pub static POWER_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    numeric_steps(
        "power",
        Some("PS"),
        &["50", "75", "90", "100", "120", "150", "180", "200", "250", "300", "350", "400", "500", "600"],
    )
});

pub static DISPLACEMENT_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    numeric_steps(
        "displacement",
        Some("ccm"),
        &[
            "500", "750", "1000", "1200", "1400", "1600", "1800", "2000", "2500", "3000", "3500",
            "4000", "5000", "6000",
        ],
    )
});

pub static SEAT_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    ["2", "4", "5", "6", "7", "8", "9"]
        .iter()
        .map(|seats| FilterOption::new(format!("seats-{}", seats), format!("{} Sitze", seats), *seats))
        .collect()
});

pub static DOOR_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    labelled(&[
        ("doors-2-3", "2/3", "2/3"),
        ("doors-4-5", "4/5", "4/5"),
        ("doors-6plus", "6+", "6+"),
    ])
});

pub static EXTRA_OPTIONS: Lazy<Vec<FilterOption>> = Lazy::new(|| {
    labelled(&[
        ("extra-klimaanlage", "Klimaanlage", "Klimaanlage"),
        ("extra-klimaautomatik", "Klimaautomatik", "Klimaautomatik"),
        ("extra-sitzheizung", "Sitzheizung", "Sitzheizung"),
        ("extra-sitzbelueftung", "Sitzbelueftung", "Sitzbelueftung"),
        ("extra-lederscheinwerfer", "LED-Scheinwerfer", "LED-Scheinwerfer"),
        ("extra-xenon", "Xenon", "Xenon"),
        ("extra-adaptives-licht", "Adaptives Licht", "Adaptives Licht"),
        ("extra-navi", "Navigationssystem", "Navigationssystem"),
        ("extra-apple-carplay", "Apple CarPlay", "Apple CarPlay"),
        ("extra-android-auto", "Android Auto", "Android Auto"),
        ("extra-bluetooth", "Bluetooth", "Bluetooth"),
        ("extra-dab", "DAB Radio", "DAB Radio"),
        ("extra-tempomat", "Tempomat", "Tempomat"),
        ("extra-adaptiver-tempomat", "Adaptiver Tempomat", "Adaptiver Tempomat"),
        ("extra-spurhalteassistent", "Spurhalteassistent", "Spurhalteassistent"),
        ("extra-totwinkelassistent", "Totwinkelassistent", "Totwinkelassistent"),
        ("extra-notbremsassistent", "Notbremsassistent", "Notbremsassistent"),
        ("extra-einparkhilfe", "Einparkhilfe", "Einparkhilfe"),
        ("extra-rueckfahrkamera", "Rueckfahrkamera", "Rueckfahrkamera"),
        ("extra-360-kamera", "360 Kamera", "360 Kamera"),
        ("extra-panorama", "Panoramadach", "Panoramadach"),
        ("extra-ahk", "Anhaengerkupplung", "Anhaengerkupplung"),
        ("extra-allrad", "Allradantrieb", "Allradantrieb"),
        ("extra-sportsitze", "Sportsitze", "Sportsitze"),
        ("extra-leder", "Lederausstattung", "Lederausstattung"),
        ("extra-keyless", "Keyless Entry", "Keyless Entry"),
    ])
});

/// Largest kilometer step; selecting it as "from" leaves no valid "to".
pub fn max_kilometer_value() -> &'static str {
    KILOMETER_OPTIONS
        .last()
        .map(|option| option.value.as_str())
        .unwrap_or("250000")
}

/// Catalog backing both ends of a range pair.
pub fn range_options(range: RangeId) -> &'static [FilterOption] {
    match range {
        RangeId::Year => &YEAR_OPTIONS,
        RangeId::Kilometer => &KILOMETER_OPTIONS,
        RangeId::Power => &POWER_OPTIONS,
        RangeId::Displacement => &DISPLACEMENT_OPTIONS,
    }
}
