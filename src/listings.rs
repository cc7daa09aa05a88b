// Demo listing fixture: 60 deterministic vehicles derived from ten blueprints

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::models::{CarListing, DoorGroup};

struct Blueprint {
    make: &'static str,
    model: &'static str,
    category: &'static str,
    body_type: &'static str,
    fuel: &'static str,
    transmission: &'static str,
    condition: &'static str,
    doors: DoorGroup,
    seats: u32,
    location: &'static str,
    financing_options: &'static [&'static str],
    base_price: u32,
    base_power_ps: u32,
    base_displacement_ccm: u32,
    monthly_base: Option<u32>,
    extras: &'static [&'static str],
}

const BLUEPRINTS: [Blueprint; 10] = [
    Blueprint {
        make: "Audi",
        model: "A1",
        category: "PKW",
        body_type: "Kleinwagen",
        fuel: "Benzin",
        transmission: "Schaltgetriebe",
        condition: "Gebraucht",
        doors: DoorGroup::FourFive,
        seats: 5,
        location: "Berlin",
        financing_options: &["Leasing", "Kredit"],
        base_price: 16990,
        base_power_ps: 95,
        base_displacement_ccm: 999,
        monthly_base: Some(189),
        extras: &["Klimaanlage", "Bluetooth", "Tempomat"],
    },
    Blueprint {
        make: "BMW",
        model: "3 Series",
        category: "PKW",
        body_type: "Limousine",
        fuel: "Diesel",
        transmission: "Automatik",
        condition: "Gebraucht",
        doors: DoorGroup::FourFive,
        seats: 5,
        location: "Hamburg",
        financing_options: &["Leasing", "Ballonfinanzierung"],
        base_price: 28990,
        base_power_ps: 190,
        base_displacement_ccm: 1995,
        monthly_base: Some(329),
        extras: &["Klimaautomatik", "Navigationssystem", "Rueckfahrkamera"],
    },
    Blueprint {
        make: "Mercedes-Benz",
        model: "GLC",
        category: "PKW",
        body_type: "suv",
        fuel: "Hybrid",
        transmission: "Automatik",
        condition: "Jahreswagen",
        doors: DoorGroup::FourFive,
        seats: 5,
        location: "Muenchen",
        financing_options: &["Leasing", "Kredit", "Abo"],
        base_price: 42990,
        base_power_ps: 245,
        base_displacement_ccm: 1991,
        monthly_base: Some(469),
        extras: &["LED-Scheinwerfer", "Apple CarPlay", "Spurhalteassistent"],
    },
    Blueprint {
        make: "Skoda",
        model: "Enyaq",
        category: "PKW",
        body_type: "suv",
        fuel: "Elektro",
        transmission: "Automatik",
        condition: "Vorfuehrfahrzeug",
        doors: DoorGroup::FourFive,
        seats: 5,
        location: "Koeln",
        financing_options: &["Leasing", "Abo"],
        base_price: 37990,
        base_power_ps: 204,
        base_displacement_ccm: 0,
        monthly_base: Some(399),
        extras: &["360 Kamera", "Panoramadach", "Keyless Entry"],
    },
    Blueprint {
        make: "Volkswagen",
        model: "Tiguan",
        category: "PKW",
        body_type: "suv",
        fuel: "Benzin",
        transmission: "Automatik",
        condition: "Gebraucht",
        doors: DoorGroup::FourFive,
        seats: 5,
        location: "Frankfurt am Main",
        financing_options: &["Kredit", "Ratenkauf"],
        base_price: 31990,
        base_power_ps: 150,
        base_displacement_ccm: 1498,
        monthly_base: Some(339),
        extras: &["Android Auto", "Einparkhilfe", "Anhaengerkupplung"],
    },
    Blueprint {
        make: "Audi",
        model: "A1",
        category: "PKW",
        body_type: "Kleinwagen",
        fuel: "Benzin",
        transmission: "Automatik",
        condition: "Neu",
        doors: DoorGroup::TwoThree,
        seats: 4,
        location: "Stuttgart",
        financing_options: &["Leasing", "Abo"],
        base_price: 23990,
        base_power_ps: 116,
        base_displacement_ccm: 1498,
        monthly_base: Some(259),
        extras: &["Klimaanlage", "DAB Radio", "Apple CarPlay"],
    },
    Blueprint {
        make: "BMW",
        model: "3 Series",
        category: "PKW",
        body_type: "Kombi",
        fuel: "Diesel",
        transmission: "Automatik",
        condition: "Jahreswagen",
        doors: DoorGroup::FourFive,
        seats: 5,
        location: "Berlin",
        financing_options: &["Leasing", "Kredit"],
        base_price: 35990,
        base_power_ps: 200,
        base_displacement_ccm: 1998,
        monthly_base: Some(379),
        extras: &["Adaptiver Tempomat", "Lederausstattung", "Totwinkelassistent"],
    },
    Blueprint {
        make: "Mercedes-Benz",
        model: "GLC",
        category: "PKW",
        body_type: "suv",
        fuel: "Diesel",
        transmission: "Automatik",
        condition: "Gebraucht",
        doors: DoorGroup::FourFive,
        seats: 5,
        location: "Hamburg",
        financing_options: &["Kredit", "Ballonfinanzierung"],
        base_price: 38990,
        base_power_ps: 194,
        base_displacement_ccm: 1950,
        monthly_base: Some(419),
        extras: &["Anhaengerkupplung", "Allradantrieb", "Rueckfahrkamera"],
    },
    Blueprint {
        make: "Skoda",
        model: "Enyaq",
        category: "PKW",
        body_type: "suv",
        fuel: "Elektro",
        transmission: "Automatik",
        condition: "Neu",
        doors: DoorGroup::FourFive,
        seats: 5,
        location: "Muenchen",
        financing_options: &["Leasing", "Abo"],
        base_price: 44990,
        base_power_ps: 265,
        base_displacement_ccm: 0,
        monthly_base: Some(499),
        extras: &["360 Kamera", "Panoramadach", "Adaptives Licht"],
    },
    Blueprint {
        make: "Volkswagen",
        model: "Tiguan",
        category: "PKW",
        body_type: "suv",
        fuel: "Hybrid",
        transmission: "Automatik",
        condition: "Vorfuehrfahrzeug",
        doors: DoorGroup::FourFive,
        seats: 5,
        location: "Koeln",
        financing_options: &["Leasing", "Kredit", "Ratenkauf"],
        base_price: 40990,
        base_power_ps: 245,
        base_displacement_ccm: 1395,
        monthly_base: Some(449),
        extras: &["Spurhalteassistent", "Notbremsassistent", "Navigationssystem"],
    },
];

const EXTRA_ROTATION: [&str; 12] = [
    "Klimaanlage",
    "Klimaanlage",
    "Sitzheizung",
    "LED-Scheinwerfer",
    "Adaptiver Tempomat",
    "Rueckfahrkamera",
    "Navigationssystem",
    "Apple CarPlay",
    "Android Auto",
    "Totwinkelassistent",
    "Spurhalteassistent",
    "Anhaengerkupplung",
];

pub const LISTING_COUNT: usize = 60;

// Base extras plus two rotating ones, deduplicated in first-seen order
fn create_extras(base: &[&str], index: usize) -> Vec<String> {
    let rotating = [
        EXTRA_ROTATION[index % EXTRA_ROTATION.len()],
        EXTRA_ROTATION[(index + 3) % EXTRA_ROTATION.len()],
    ];

    let mut extras: Vec<String> = Vec::with_capacity(base.len() + 2);
    for extra in base.iter().chain(rotating.iter()) {
        if !extras.iter().any(|existing| existing == extra) {
            extras.push(extra.to_string());
        }
    }
    extras
}

fn create_listing(index: usize) -> CarListing {
    let blueprint = &BLUEPRINTS[index % BLUEPRINTS.len()];
    let cycle = (index % 6) as u32;
    let year = 2017 + (index % 9) as u32;
    let kilometers = 5000 + cycle * 11000 + (index % 4) as u32 * 8000;
    let price = blueprint.base_price + cycle * 1450 + (2026 - year) * 420;
    let is_electric = blueprint.fuel == "Elektro";

    let consumption_text = (!is_electric).then(|| format!("{:.1} l/100km", 4.6 + (index % 6) as f64 * 0.4));
    let emissions_text = (!is_electric).then(|| format!("{} g/km", 98 + (index % 8) * 9));
    let created_at = format!(
        "{:04}-{:02}-{:02}T00:00:00.000Z",
        2024 + index % 2,
        index % 12 + 1,
        index % 27 + 1
    );

    CarListing {
        id: format!("car-{}", index + 1),
        title: format!("{} {}", blueprint.make, blueprint.model),
        subtitle: format!(
            "{} | {} | {}",
            blueprint.condition, blueprint.body_type, blueprint.location
        ),
        detail_url: "#".to_string(),
        image_url: format!("https://picsum.photos/seed/d35-car-{}/960/640", index + 1),
        category: blueprint.category.to_string(),
        make: blueprint.make.to_string(),
        model: blueprint.model.to_string(),
        body_type: blueprint.body_type.to_string(),
        fuel: blueprint.fuel.to_string(),
        transmission: blueprint.transmission.to_string(),
        condition: blueprint.condition.to_string(),
        year,
        kilometers,
        power_ps: blueprint.base_power_ps + cycle * 8,
        displacement_ccm: blueprint.base_displacement_ccm,
        price,
        monthly_rate: blueprint.monthly_base.map(|base| base + cycle * 14),
        has_360: index % 3 == 0,
        doors: blueprint.doors,
        seats: blueprint.seats,
        extras: create_extras(blueprint.extras, index),
        financing_options: blueprint.financing_options.iter().map(|s| s.to_string()).collect(),
        location: Some(blueprint.location.to_string()),
        consumption_text,
        emissions_text,
        relevance_score: 100 - (index % 35) as i32,
        created_at,
    }
}

static MOCK_LISTINGS: Lazy<Arc<[CarListing]>> =
    Lazy::new(|| (0..LISTING_COUNT).map(create_listing).collect());

/// Shared handle to the fixture; built once per process.
pub fn mock_listings() -> Arc<[CarListing]> {
    Arc::clone(&MOCK_LISTINGS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fixture_has_sixty_unique_ids() {
        let listings = mock_listings();
        assert_eq!(listings.len(), LISTING_COUNT);

        let mut ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), LISTING_COUNT);
    }

    #[test]
    fn first_listing_is_derived_from_the_first_blueprint() {
        let first = &mock_listings()[0];
        assert_eq!(first.id, "car-1");
        assert_eq!(first.title, "Audi A1");
        assert_eq!(first.year, 2017);
        assert_eq!(first.kilometers, 5000);
        assert_eq!(first.price, 16990 + 9 * 420);
        assert_eq!(first.monthly_rate, Some(189));
        assert!(first.has_360);
        assert_eq!(first.consumption_text.as_deref(), Some("4.6 l/100km"));
        assert_eq!(first.emissions_text.as_deref(), Some("98 g/km"));
        assert_eq!(first.created_at, "2024-01-01T00:00:00.000Z");
        // "Klimaanlage" from the rotation is already a base extra.
        assert_eq!(
            first.extras,
            vec!["Klimaanlage", "Bluetooth", "Tempomat", "LED-Scheinwerfer"]
        );
    }

    #[test]
    fn electric_listings_have_no_consumption_or_emissions() {
        let enyaq = &mock_listings()[3];
        assert_eq!(enyaq.fuel, "Elektro");
        assert_eq!(enyaq.consumption_text, None);
        assert_eq!(enyaq.emissions_text, None);
        assert_eq!(enyaq.displacement_ccm, 0);
    }
}
