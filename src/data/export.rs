use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::Record;

/// Suggested file name of the table download.
pub const EXPORT_FILE_NAME: &str = "selection.csv";

/// Header line of the export, in [`ExportRow`] field order.
const EXPORT_COLUMNS: [&str; 13] = [
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
    "Estimated Value",
    "Upper Value",
    "Lower Value",
];

/// One exported line: the source columns followed by the parsed values.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Country/Region")]
    country: &'a str,
    #[serde(rename = "ISO3")]
    iso3: &'a str,
    #[serde(rename = "Type")]
    area_type: &'a str,
    #[serde(rename = "Indicator")]
    indicator: &'a str,
    #[serde(rename = "Sex")]
    sex: &'a str,
    #[serde(rename = "Age")]
    age: &'a str,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Value")]
    value: String,
    #[serde(rename = "Upper")]
    upper: String,
    #[serde(rename = "Lower")]
    lower: String,
    #[serde(rename = "Estimated Value")]
    estimated: Option<f64>,
    #[serde(rename = "Upper Value")]
    upper_value: Option<f64>,
    #[serde(rename = "Lower Value")]
    lower_value: Option<f64>,
}

impl<'a> From<&'a Record> for ExportRow<'a> {
    fn from(r: &'a Record) -> Self {
        let finite = |v: f64| (!v.is_nan()).then_some(v);
        ExportRow {
            country: &r.country,
            iso3: &r.iso3,
            area_type: r.area_type.as_str(),
            indicator: &r.indicator,
            sex: r.sex.as_str(),
            age: &r.age,
            year: r.year,
            value: r.value.to_string(),
            upper: r.upper.to_string(),
            lower: r.lower.to_string(),
            estimated: finite(r.estimated),
            upper_value: finite(r.upper_value),
            lower_value: finite(r.lower_value),
        }
    }
}

/// Write `rows` as comma-separated UTF-8 with a header line, which is
/// present even when `rows` is empty. Unparsable values are left empty.
pub fn write_csv<W: Write>(rows: &[&Record], writer: W) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(EXPORT_COLUMNS)
        .context("writing export header")?;
    for r in rows {
        out.serialize(ExportRow::from(*r))
            .context("writing export row")?;
    }
    out.flush().context("flushing export")?;
    Ok(())
}

/// Save `rows` to `path`.
pub fn save_csv(rows: &[&Record], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(rows, std::io::BufWriter::new(file))?;
    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}
