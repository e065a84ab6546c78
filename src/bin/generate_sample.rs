//! Writes a synthetic UNICEF-style HIV dataset so the viewer can run
//! without the public files: `hiv.csv`, `hiv.parquet`, `indicators.json`
//! and `countries.geojson` in the directory given as first argument
//! (default `data`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

// ---------------------------------------------------------------------------
// Catalogue of the synthetic world
// ---------------------------------------------------------------------------

/// (name, ISO3, [west, south, east, north], burden multiplier)
const COUNTRIES: [(&str, &str, [f64; 4], f64); 8] = [
    ("Kenya", "KEN", [34.0, -4.7, 41.9, 5.0], 1.2),
    ("Nigeria", "NGA", [2.7, 4.3, 14.7, 13.9], 1.6),
    ("South Africa", "ZAF", [16.5, -34.8, 32.9, -22.1], 2.4),
    ("Uganda", "UGA", [29.6, -1.5, 35.0, 4.2], 1.0),
    ("Mozambique", "MOZ", [30.2, -26.9, 40.8, -10.5], 1.4),
    ("India", "IND", [68.2, 8.1, 97.4, 35.5], 0.6),
    ("Brazil", "BRA", [-73.9, -33.7, -34.8, 5.3], 0.4),
    ("Thailand", "THA", [97.3, 5.6, 105.6, 20.5], 0.3),
];

const REGION: &str = "Eastern and Southern Africa";

struct Indicator {
    name: &'static str,
    description: &'static str,
    ages: &'static [&'static str],
    by_sex: bool,
    /// Magnitude per country at multiplier 1.
    scale: f64,
    count: bool,
}

const INDICATORS: [Indicator; 5] = [
    Indicator {
        name: "Estimated number of annual AIDS-related deaths",
        description: "Number of children and adolescents who died of AIDS-related causes during the year.",
        ages: &["Age 0-4", "Age 5-9", "Age 10-14", "Age 15-19"],
        by_sex: true,
        scale: 2_500.0,
        count: true,
    },
    Indicator {
        name: "Estimated number of annual new HIV infections",
        description: "Number of children and adolescents newly infected with HIV during the year.",
        ages: &["Age 0-4", "Age 5-9", "Age 10-14", "Age 15-19"],
        by_sex: true,
        scale: 6_000.0,
        count: true,
    },
    Indicator {
        name: "Estimated number of people living with HIV",
        description: "Number of children and adolescents living with HIV at the end of the year.",
        ages: &["Age 0-14", "Age 10-19", "Age 15-19", "Age 0-19"],
        by_sex: true,
        scale: 40_000.0,
        count: true,
    },
    Indicator {
        name: "Estimated incidence rate (new HIV infection per 1,000 uninfected population)",
        description: "New HIV infections per 1,000 uninfected children and adolescents.",
        ages: &["Age 10-19", "Age 15-19", "Age 0-19"],
        by_sex: true,
        scale: 1.5,
        count: false,
    },
    Indicator {
        name: "Estimated mother-to-child transmission rate (%)",
        description: "Share of children born to women living with HIV who acquire the infection.",
        ages: &["Age 0-4"],
        by_sex: false,
        scale: 18.0,
        count: false,
    },
];

const FIRST_YEAR: i64 = 2000;
const LAST_YEAR: i64 = 2021;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

struct Row {
    country: String,
    iso3: String,
    area_type: &'static str,
    indicator: &'static str,
    sex: &'static str,
    age: &'static str,
    year: i64,
    value: String,
    upper: String,
    lower: String,
}

/// Text rendering used by the public dataset: thousands separators for
/// counts, `<` for small counts, two decimals for rates.
fn render(value: f64, count: bool) -> String {
    if !count {
        return format!("{value:.2}");
    }
    let rounded = value.round() as u64;
    if rounded < 100 {
        return "<100".to_string();
    }
    let digits = rounded.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for ind in &INDICATORS {
        let sexes: &[&str] = if ind.by_sex {
            &["Both", "Male", "Female"]
        } else {
            &["Both"]
        };
        for year in FIRST_YEAR..=LAST_YEAR {
            // Burden declines steadily over the period.
            let trend = 1.0 - 0.025 * (year - FIRST_YEAR) as f64;
            for &age in ind.ages {
                let mut world = [0.0f64; 3];
                let mut region = [0.0f64; 3];
                for &(name, iso3, _, burden) in &COUNTRIES {
                    for (s, &sex) in sexes.iter().enumerate() {
                        let share = match sex {
                            "Both" => 1.0,
                            "Female" => 0.55,
                            _ => 0.45,
                        };
                        let v = ind.scale * burden * trend * share * rng.range(0.8, 1.2);
                        world[s] += v;
                        if burden >= 1.0 {
                            region[s] += v;
                        }
                        rows.push(row(name, iso3, "Country", ind, sex, age, year, v));
                    }
                }
                for (s, &sex) in sexes.iter().enumerate() {
                    let n = COUNTRIES.len() as f64;
                    let (w, r) = if ind.count {
                        (world[s], region[s])
                    } else {
                        (world[s] / n, region[s] / n)
                    };
                    rows.push(row("Global", "WLD", "Region", ind, sex, age, year, w));
                    rows.push(row(REGION, "", "Region", ind, sex, age, year, r));
                }
            }
        }
    }
    rows
}

#[allow(clippy::too_many_arguments)]
fn row(
    country: &str,
    iso3: &str,
    area_type: &'static str,
    ind: &Indicator,
    sex: &'static str,
    age: &'static str,
    year: i64,
    value: f64,
) -> Row {
    Row {
        country: country.to_string(),
        iso3: iso3.to_string(),
        area_type,
        indicator: ind.name,
        sex,
        age,
        year,
        value: render(value, ind.count),
        upper: render(value * 1.35, ind.count),
        lower: render(value * 0.7, ind.count),
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    out.write_record([
        "Country/Region", "ISO3", "Type", "Indicator", "Sex", "Age", "Year", "Value", "Upper",
        "Lower",
    ])?;
    for r in rows {
        let year = r.year.to_string();
        out.write_record([
            r.country.as_str(),
            r.iso3.as_str(),
            r.area_type,
            r.indicator,
            r.sex,
            r.age,
            year.as_str(),
            r.value.as_str(),
            r.upper.as_str(),
            r.lower.as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let text = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Country/Region", DataType::Utf8, false),
        Field::new("ISO3", DataType::Utf8, false),
        Field::new("Type", DataType::Utf8, false),
        Field::new("Indicator", DataType::Utf8, false),
        Field::new("Sex", DataType::Utf8, false),
        Field::new("Age", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Value", DataType::Utf8, false),
        Field::new("Upper", DataType::Utf8, false),
        Field::new("Lower", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| &r.country),
            text(|r| &r.iso3),
            text(|r| r.area_type),
            text(|r| r.indicator),
            text(|r| r.sex),
            text(|r| r.age),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
            text(|r| &r.value),
            text(|r| &r.upper),
            text(|r| &r.lower),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn write_descriptions(path: &Path) -> Result<()> {
    let map: serde_json::Map<String, serde_json::Value> = INDICATORS
        .iter()
        .map(|i| (i.name.to_string(), json!(i.description)))
        .collect();
    std::fs::write(path, serde_json::to_string_pretty(&map)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// Every country as a single rectangle polygon.
fn write_boundaries(path: &Path) -> Result<()> {
    let features: Vec<serde_json::Value> = COUNTRIES
        .iter()
        .map(|&(name, iso3, [w, s, e, n], _)| {
            json!({
                "type": "Feature",
                "properties": { "ADMIN": name, "ISO_A3": iso3 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[w, s], [e, s], [e, n], [w, n], [w, s]]]
                }
            })
        })
        .collect();
    let collection = json!({ "type": "FeatureCollection", "features": features });
    std::fs::write(path, serde_json::to_string(&collection)?)
        .with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("data"), PathBuf::from);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows, &dir.join("hiv.csv"))?;
    write_parquet(&rows, &dir.join("hiv.parquet"))?;
    write_descriptions(&dir.join("indicators.json"))?;
    write_boundaries(&dir.join("countries.geojson"))?;

    println!(
        "Wrote {} rows for {} indicators to {}",
        rows.len(),
        INDICATORS.len(),
        dir.display()
    );
    Ok(())
}
