use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Country/Region label of the world aggregate rows.
pub const GLOBAL: &str = "Global";

/// Source column names, in file order.
pub const COLUMNS: [&str; 10] = [
    "Country/Region",
    "ISO3",
    "Type",
    "Indicator",
    "Sex",
    "Age",
    "Year",
    "Value",
    "Upper",
    "Lower",
];

// ---------------------------------------------------------------------------
// Categorical columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    Male,
    Female,
    Both,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Both => "Both",
        }
    }
}

impl FromStr for Sex {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Male" => Ok(Sex::Male),
            "Female" => Ok(Sex::Female),
            "Both" => Ok(Sex::Both),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a row describes a single country or a regional aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaType {
    Country,
    Region,
}

impl AreaType {
    pub fn as_str(self) -> &'static str {
        match self {
            AreaType::Country => "Country",
            AreaType::Region => "Region",
        }
    }
}

impl FromStr for AreaType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Country" => Ok(AreaType::Country),
            "Region" => Ok(AreaType::Region),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CellValue – a raw Value/Upper/Lower cell
// ---------------------------------------------------------------------------

/// Raw value cell as found in the source table: either already numeric
/// (parquet Float64 columns) or text such as `"<1,000"`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric reading of the cell.
    ///
    /// Text has every `,`, `<` and `>` removed before parsing; anything that
    /// still fails to parse becomes NaN. Numbers pass through unchanged.
    pub fn normalize(&self) -> f64 {
        match self {
            CellValue::Number(v) => *v,
            CellValue::Text(s) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| !matches!(c, ',' | '<' | '>'))
                    .collect();
                cleaned.trim().parse::<f64>().unwrap_or(f64::NAN)
            }
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) if v.is_nan() => Ok(()),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub iso3: String,
    pub area_type: AreaType,
    pub indicator: String,
    pub sex: Sex,
    /// Age-group label, e.g. `"Age 15-19"`.
    pub age: String,
    pub year: i32,
    pub value: CellValue,
    pub upper: CellValue,
    pub lower: CellValue,
    /// Normalized `value`.
    pub estimated: f64,
    /// Normalized `upper`.
    pub upper_value: f64,
    /// Normalized `lower`.
    pub lower_value: f64,
}

/// Owned fields of a row before the value columns are normalized.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub country: String,
    pub iso3: String,
    pub area_type: AreaType,
    pub indicator: String,
    pub sex: Sex,
    pub age: String,
    pub year: i32,
    pub value: CellValue,
    pub upper: CellValue,
    pub lower: CellValue,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        let estimated = raw.value.normalize();
        let upper_value = raw.upper.normalize();
        let lower_value = raw.lower.normalize();
        Record {
            country: raw.country,
            iso3: raw.iso3,
            area_type: raw.area_type,
            indicator: raw.indicator,
            sex: raw.sex,
            age: raw.age,
            year: raw.year,
            value: raw.value,
            upper: raw.upper,
            lower: raw.lower,
            estimated,
            upper_value,
            lower_value,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The whole table, read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn for_indicator<'a>(&'a self, indicator: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.indicator == indicator)
    }

    /// Distinct indicators in order of first appearance.
    pub fn indicators(&self) -> Vec<String> {
        unique_in_order(self.records.iter().map(|r| r.indicator.as_str()))
    }

    /// Distinct age-group labels reported for `indicator`, in order of first appearance.
    pub fn age_groups(&self, indicator: &str) -> Vec<String> {
        unique_in_order(self.for_indicator(indicator).map(|r| r.age.as_str()))
    }

    /// Sorted distinct years reported for `indicator`.
    pub fn years(&self, indicator: &str) -> Vec<i32> {
        let years: BTreeSet<i32> = self.for_indicator(indicator).map(|r| r.year).collect();
        years.into_iter().collect()
    }

    /// Countries and regions reported for `indicator`, excluding the
    /// `Global` aggregate.
    pub fn countries(&self, indicator: &str) -> Vec<String> {
        unique_in_order(
            self.for_indicator(indicator)
                .map(|r| r.country.as_str())
                .filter(|c| *c != GLOBAL),
        )
    }

    /// Number of distinct `Country/Region` values over the whole table.
    pub fn area_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.country.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// First and last year in the whole table.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
