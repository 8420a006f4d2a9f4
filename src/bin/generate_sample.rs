use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const OUTPUT_PATH: &str = "calibrate-power-stock/gem_cleaned_2025.csv";
const ROWS: usize = 2_000;

const HEADER: [&str; 10] = [
    "Plant name",
    "Plant Type",
    "Technology",
    "Region",
    "Subregion",
    "Country/area",
    "Status",
    "Start year",
    "Retired year",
    "installed capacity MW",
];

/// (plant type, technologies, typical unit size MW)
const PLANT_TYPES: [(&str, &[&str], f64); 5] = [
    ("coal", &["subcritical", "supercritical", "ultra-supercritical"], 600.0),
    ("gas", &["combined cycle", "gas turbine", "internal combustion"], 350.0),
    ("solar", &["PV", "solar thermal"], 80.0),
    ("wind", &["onshore", "offshore"], 150.0),
    ("hydropower", &["conventional storage", "run-of-river", "pumped storage"], 250.0),
];

/// (region, subregion, countries)
const GEOGRAPHY: [(&str, &str, &[&str]); 5] = [
    ("Asia", "Eastern Asia", &["China", "Japan", "South Korea"]),
    ("Asia", "Southern Asia", &["India", "Bangladesh"]),
    ("Europe", "Western Europe", &["Germany", "France"]),
    ("Africa", "Sub-Saharan Africa", &["Côte d'Ivoire", "Kenya", "South Africa"]),
    ("Americas", "Northern America", &["United States", "Canada"]),
];

const STATUSES: [&str; 6] = [
    "operating",
    "construction",
    "pre-construction",
    "announced",
    "retired",
    "cancelled",
];

fn main() {
    let mut rng = StdRng::seed_from_u64(42);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER).expect("Failed to write header");

    for i in 0..ROWS {
        let (plant_type, techs, unit_mw) = PLANT_TYPES[rng.gen_range(0..PLANT_TYPES.len())];
        let tech = techs.choose(&mut rng).expect("technology list is non-empty");
        let (region, subregion, countries) = GEOGRAPHY[rng.gen_range(0..GEOGRAPHY.len())];
        let country = countries.choose(&mut rng).expect("country list is non-empty");
        let status = STATUSES[rng.gen_range(0..STATUSES.len())];

        let start: i32 = rng.gen_range(1950..=2030);
        // Some rows carry no usable start year or capacity, like the real export.
        let start_year = match rng.gen_range(0..20) {
            0 => String::new(),
            1 => "unknown".to_string(),
            _ => start.to_string(),
        };
        let retired_year = if status == "retired" {
            rng.gen_range(start.min(2024)..=2024).to_string()
        } else {
            String::new()
        };
        let capacity = if rng.gen_range(0..50) == 0 {
            "n/a".to_string()
        } else {
            format!("{:.1}", unit_mw * rng.gen_range(0.2..2.5))
        };

        writer
            .write_record([
                format!("{country} {plant_type} plant {i}"),
                plant_type.to_string(),
                tech.to_string(),
                region.to_string(),
                subregion.to_string(),
                country.to_string(),
                status.to_string(),
                start_year,
                retired_year,
                capacity,
            ])
            .expect("Failed to write row");
    }

    let text = String::from_utf8(writer.into_inner().expect("Failed to flush CSV"))
        .expect("CSV output is UTF-8");
    // The dashboard reads Latin-1 by default; write it that way.
    let bytes: Vec<u8> = text
        .chars()
        .map(|c| u8::try_from(c).unwrap_or(b'?'))
        .collect();

    if let Some(dir) = Path::new(OUTPUT_PATH).parent() {
        std::fs::create_dir_all(dir).expect("Failed to create output directory");
    }
    std::fs::write(OUTPUT_PATH, bytes).expect("Failed to write output file");

    println!("Wrote {ROWS} plants to {OUTPUT_PATH}");
}
