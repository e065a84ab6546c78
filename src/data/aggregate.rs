use std::collections::BTreeMap;

use super::catalog::{year_aggregation, YearAggregation};
use super::filter::{AgeMode, Selection};
use super::model::{Record, Sex, GLOBAL};

// ---------------------------------------------------------------------------
// NaN-aware reductions
// ---------------------------------------------------------------------------

/// Mean of the non-NaN values; NaN when there are none.
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Sum of the non-NaN values; zero when there are none.
pub fn nan_sum(values: &[f64]) -> f64 {
    values.iter().filter(|v| !v.is_nan()).sum()
}

// ---------------------------------------------------------------------------
// Map aggregation
// ---------------------------------------------------------------------------

/// Collapse map rows to one value per ISO3 code.
///
/// Rows are first averaged per (ISO3, year), which folds multiple age groups
/// under "any age" into one figure. The per-year figures are then averaged or
/// summed across the year range depending on [`year_aggregation`].
/// Rows without an ISO3 code cannot be placed on the map and are skipped.
pub fn aggregate_for_map(rows: &[&Record], indicator: &str) -> BTreeMap<String, f64> {
    let mut by_year: BTreeMap<(&str, i32), Vec<f64>> = BTreeMap::new();
    for r in rows.iter().filter(|r| !r.iso3.trim().is_empty()) {
        by_year
            .entry((r.iso3.as_str(), r.year))
            .or_default()
            .push(r.estimated);
    }

    let mut by_iso3: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for ((iso3, _year), values) in &by_year {
        by_iso3.entry(*iso3).or_default().push(nan_mean(values));
    }

    let reduce: fn(&[f64]) -> f64 = match year_aggregation(indicator) {
        YearAggregation::Mean => nan_mean,
        YearAggregation::Sum => nan_sum,
    };
    by_iso3
        .into_iter()
        .map(|(iso3, yearly)| (iso3.to_string(), reduce(&yearly)))
        .collect()
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub estimated: f64,
    pub upper: f64,
    pub lower: f64,
}

/// One line family on the chart: a (country, sex) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub country: String,
    pub sex: Sex,
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    /// Legend suffix such as `"(F) (Kenya)"`; empty for Global/Both.
    pub fn label_suffix(&self) -> String {
        let sex = match self.sex {
            Sex::Both => String::new(),
            other => format!("({})", &other.as_str()[..1]),
        };
        let country = if self.country == GLOBAL {
            String::new()
        } else {
            format!("({})", self.country)
        };
        match (sex.is_empty(), country.is_empty()) {
            (false, false) => format!("{sex} {country}"),
            _ => format!("{sex}{country}"),
        }
    }
}

/// Split chart rows into one series per selected (country, sex) pair.
///
/// Under [`AgeMode::Any`] several age groups share a year, so each year is
/// reduced to the mean of its rows. A specific age group already yields one
/// row per year and is passed through in table order.
pub fn chart_series(rows: &[&Record], selection: &Selection) -> Vec<ChartSeries> {
    let mut series = Vec::new();
    for country in selection.effective_countries() {
        for sex in selection.sex.chart_sexes() {
            let matching: Vec<&Record> = rows
                .iter()
                .copied()
                .filter(|r| r.country == country && r.sex == sex)
                .collect();

            let points = match selection.age_mode {
                AgeMode::Any => mean_by_year(&matching),
                AgeMode::Range => matching
                    .iter()
                    .map(|r| SeriesPoint {
                        year: r.year,
                        estimated: r.estimated,
                        upper: r.upper_value,
                        lower: r.lower_value,
                    })
                    .collect(),
            };
            series.push(ChartSeries {
                country: country.clone(),
                sex,
                points,
            });
        }
    }
    series
}

fn mean_by_year(rows: &[&Record]) -> Vec<SeriesPoint> {
    let mut grouped: BTreeMap<i32, [Vec<f64>; 3]> = BTreeMap::new();
    for r in rows {
        let [est, up, low] = grouped.entry(r.year).or_default();
        est.push(r.estimated);
        up.push(r.upper_value);
        low.push(r.lower_value);
    }
    grouped
        .into_iter()
        .map(|(year, [est, up, low])| SeriesPoint {
            year,
            estimated: nan_mean(&est),
            upper: nan_mean(&up),
            lower: nan_mean(&low),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::{ANNUAL_NEW_INFECTIONS, INCIDENCE_RATE};
    use crate::data::filter::{filter, SexChoice};
    use crate::data::model::tests::record;
    use crate::data::model::Dataset;

    fn selection(indicator: &str) -> Selection {
        Selection {
            indicator: indicator.to_string(),
            sex: SexChoice::default(),
            age_mode: AgeMode::Any,
            age_range: (0, 20),
            year_range: (2000, 2030),
            countries: Vec::new(),
        }
    }

    #[test]
    fn nan_values_are_skipped() {
        assert_eq!(nan_mean(&[1.0, f64::NAN, 3.0]), 2.0);
        assert_eq!(nan_sum(&[1.0, f64::NAN, 3.0]), 4.0);
        assert!(nan_mean(&[f64::NAN]).is_nan());
        assert!(nan_mean(&[]).is_nan());
        assert_eq!(nan_sum(&[]), 0.0);
    }

    #[test]
    fn single_row_per_country_year_is_unchanged_by_mean() {
        let rows = [
            record("Chad", INCIDENCE_RATE, Sex::Both, "Age 0-4", 2010, 0.7),
            record("Mali", INCIDENCE_RATE, Sex::Both, "Age 0-4", 2010, 1.3),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let agg = aggregate_for_map(&refs, INCIDENCE_RATE);
        assert_eq!(agg.get("CHA"), Some(&0.7));
        assert_eq!(agg.get("MAL"), Some(&1.3));
    }

    #[test]
    fn rows_without_iso3_stay_off_the_map() {
        let mut blank = record("Somewhere", INCIDENCE_RATE, Sex::Both, "Age 0-4", 2010, 5.0);
        blank.iso3 = String::new();
        let chad = record("Chad", INCIDENCE_RATE, Sex::Both, "Age 0-4", 2010, 0.7);

        assert!(aggregate_for_map(&[&blank], INCIDENCE_RATE).is_empty());
        let agg = aggregate_for_map(&[&blank, &chad], INCIDENCE_RATE);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.get("CHA"), Some(&0.7));
    }

    #[test]
    fn flow_indicator_sums_yearly_means() {
        let rows = [
            record("Chad", ANNUAL_NEW_INFECTIONS, Sex::Both, "Age 0-4", 2010, 10.0),
            record("Chad", ANNUAL_NEW_INFECTIONS, Sex::Both, "Age 5-9", 2010, 20.0),
            record("Chad", ANNUAL_NEW_INFECTIONS, Sex::Both, "Age 0-4", 2011, 30.0),
            record("Chad", ANNUAL_NEW_INFECTIONS, Sex::Both, "Age 0-4", 2012, 40.0),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let agg = aggregate_for_map(&refs, ANNUAL_NEW_INFECTIONS);
        // yearly means 15, 30, 40
        assert_eq!(agg["CHA"], 85.0);
    }

    #[test]
    fn rate_indicator_averages_yearly_means() {
        let rows = [
            record("Chad", INCIDENCE_RATE, Sex::Both, "Age 0-4", 2010, 1.0),
            record("Chad", INCIDENCE_RATE, Sex::Both, "Age 5-9", 2010, 3.0),
            record("Chad", INCIDENCE_RATE, Sex::Both, "Age 0-4", 2011, 4.0),
            record("Chad", INCIDENCE_RATE, Sex::Both, "Age 0-4", 2012, 6.0),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let agg = aggregate_for_map(&refs, INCIDENCE_RATE);
        // yearly means 2, 4, 6
        assert_eq!(agg["CHA"], 4.0);
    }

    #[test]
    fn unparsable_values_do_not_poison_the_map() {
        let mut missing = record("Chad", INCIDENCE_RATE, Sex::Both, "Age 0-4", 2011, 0.0);
        missing.estimated = f64::NAN;
        let rows = [
            record("Chad", INCIDENCE_RATE, Sex::Both, "Age 0-4", 2010, 2.0),
            missing,
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        assert_eq!(aggregate_for_map(&refs, INCIDENCE_RATE)["CHA"], 2.0);
    }

    #[test]
    fn end_to_end_single_global_row() {
        let ds = Dataset::from_records(vec![record(
            "Global", "X", Sex::Both, "Age 0-19", 2020, 100.0,
        )]);
        let mut sel = selection("X");
        sel.year_range = (2020, 2020);

        let rows = filter(&ds, &sel);
        let series = chart_series(&rows.chart, &sel);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].points.len(), 1);
        assert_eq!(series[0].points[0].estimated, 100.0);

        let map = aggregate_for_map(&rows.map, "X");
        assert_eq!(map.get("WLD"), Some(&100.0));
    }

    #[test]
    fn any_age_chart_averages_age_groups_per_year() {
        let ds = Dataset::from_records(vec![
            record("Global", "X", Sex::Both, "Age 0-4", 2010, 10.0),
            record("Global", "X", Sex::Both, "Age 5-9", 2010, 30.0),
            record("Global", "X", Sex::Both, "Age 0-4", 2011, 50.0),
        ]);
        let sel = selection("X");
        let rows = filter(&ds, &sel);
        let series = chart_series(&rows.chart, &sel);

        let years: Vec<i32> = series[0].points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2010, 2011]);
        assert_eq!(series[0].points[0].estimated, 20.0);
        assert!((series[0].points[0].upper - 22.0).abs() < 1e-9);
    }

    #[test]
    fn series_follow_country_then_sex_order() {
        let ds = Dataset::from_records(vec![
            record("Chad", "X", Sex::Female, "Age 0-4", 2010, 1.0),
            record("Kenya", "X", Sex::Male, "Age 0-4", 2010, 2.0),
        ]);
        let mut sel = selection("X");
        sel.countries = vec!["Kenya".to_string(), "Chad".to_string()];
        sel.sex = SexChoice { male: true, female: true };

        let rows = filter(&ds, &sel);
        let series = chart_series(&rows.chart, &sel);
        let keys: Vec<(String, Sex, usize)> = series
            .iter()
            .map(|s| (s.country.clone(), s.sex, s.points.len()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Kenya".to_string(), Sex::Male, 1),
                ("Kenya".to_string(), Sex::Female, 0),
                ("Chad".to_string(), Sex::Male, 0),
                ("Chad".to_string(), Sex::Female, 1),
            ]
        );
        assert_eq!(series[0].label_suffix(), "(M) (Kenya)");
    }

    #[test]
    fn global_both_series_has_no_suffix() {
        let s = ChartSeries {
            country: GLOBAL.to_string(),
            sex: Sex::Both,
            points: Vec::new(),
        };
        assert_eq!(s.label_suffix(), "");
    }
}
