use std::collections::BTreeMap;

use super::aggregate::nan_mean;
use super::model::{AreaType, Dataset, Record, Sex, COLUMNS, GLOBAL};

/// Size and coverage of the loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub rows: usize,
    pub columns: usize,
    pub areas: usize,
    pub years: Option<(i32, i32)>,
}

pub fn overview(dataset: &Dataset) -> Overview {
    Overview {
        rows: dataset.len(),
        columns: COLUMNS.len(),
        areas: dataset.area_count(),
        years: dataset.year_span(),
    }
}

/// Latest-year figures shown above the parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub year: i32,
    /// Mean of the Global / Both rows.
    pub world: f64,
    /// Country with the highest mean value, with that value.
    pub most_affected: Option<(String, f64)>,
    /// Mean Global value per single sex, in `Male`, `Female` order.
    pub by_sex: Vec<(Sex, f64)>,
}

/// Headline figures for `indicator` in the dataset's latest year.
pub fn headline(dataset: &Dataset, indicator: &str) -> Option<Headline> {
    let year = dataset.latest_year()?;
    let latest: Vec<&Record> = dataset
        .records
        .iter()
        .filter(|r| r.indicator == indicator && r.year == year)
        .collect();

    let world: Vec<f64> = latest
        .iter()
        .filter(|r| r.country == GLOBAL && r.sex == Sex::Both)
        .map(|r| r.estimated)
        .collect();

    let mut per_country: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in latest
        .iter()
        .filter(|r| r.area_type != AreaType::Region && r.sex == Sex::Both)
    {
        per_country.entry(r.country.as_str()).or_default().push(r.estimated);
    }
    let most_affected = per_country
        .into_iter()
        .map(|(country, values)| (country, nan_mean(&values)))
        .filter(|(_, v)| !v.is_nan())
        .fold(None::<(&str, f64)>, |best, (country, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((country, v)),
        })
        .map(|(country, v)| (country.to_string(), v));

    let by_sex = [Sex::Male, Sex::Female]
        .into_iter()
        .map(|sex| {
            let values: Vec<f64> = latest
                .iter()
                .filter(|r| r.country == GLOBAL && r.sex == sex)
                .map(|r| r.estimated)
                .collect();
            (sex, nan_mean(&values))
        })
        .filter(|(_, v)| !v.is_nan())
        .collect();

    Some(Headline {
        year,
        world: nan_mean(&world),
        most_affected,
        by_sex,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn overview_counts_rows_areas_and_years() {
        let ds = Dataset::from_records(vec![
            record("Global", "X", Sex::Both, "Age 0-4", 2000, 1.0),
            record("Chad", "X", Sex::Both, "Age 0-4", 2021, 1.0),
        ]);
        let o = overview(&ds);
        assert_eq!(o.rows, 2);
        assert_eq!(o.columns, 10);
        assert_eq!(o.areas, 2);
        assert_eq!(o.years, Some((2000, 2021)));
    }

    #[test]
    fn headline_uses_latest_year() {
        let ds = Dataset::from_records(vec![
            record("Global", "X", Sex::Both, "Age 0-4", 2020, 999.0),
            record("Global", "X", Sex::Both, "Age 0-4", 2021, 10.0),
            record("Global", "X", Sex::Both, "Age 5-9", 2021, 20.0),
            record("Global", "X", Sex::Male, "Age 0-4", 2021, 4.0),
            record("Global", "X", Sex::Female, "Age 0-4", 2021, 6.0),
            record("Chad", "X", Sex::Both, "Age 0-4", 2021, 40.0),
            record("Mali", "X", Sex::Both, "Age 0-4", 2021, 12.0),
            record("Mali", "X", Sex::Both, "Age 0-4", 2020, 500.0),
        ]);
        let h = headline(&ds, "X").unwrap();
        assert_eq!(h.year, 2021);
        assert_eq!(h.world, 15.0);
        assert_eq!(h.most_affected, Some(("Chad".to_string(), 40.0)));
        assert_eq!(h.by_sex, vec![(Sex::Male, 4.0), (Sex::Female, 6.0)]);
    }

    #[test]
    fn headline_of_empty_dataset_is_none() {
        assert!(headline(&Dataset::default(), "X").is_none());
    }
}
