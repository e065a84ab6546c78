use super::model::{AreaType, Dataset, Record, Sex, GLOBAL};
use super::steps::age_label;

// ---------------------------------------------------------------------------
// Selection – the user's current choice, rebuilt on every interaction
// ---------------------------------------------------------------------------

/// State of the two sex checkboxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SexChoice {
    pub male: bool,
    pub female: bool,
}

impl SexChoice {
    /// Both boxes ticked at once.
    pub fn is_split(self) -> bool {
        self.male && self.female
    }

    /// Sexes drawn on the chart and listed in the table.
    ///
    /// * nothing ticked → `[Both]`
    /// * one box ticked → that sex
    /// * both ticked    → `[Male, Female]`
    pub fn chart_sexes(self) -> Vec<Sex> {
        match (self.male, self.female) {
            (true, true) => vec![Sex::Male, Sex::Female],
            (true, false) => vec![Sex::Male],
            (false, true) => vec![Sex::Female],
            (false, false) => vec![Sex::Both],
        }
    }

    /// Sexes drawn on the map: a split selection collapses to `Both` so a
    /// country is never coloured by two rows.
    pub fn map_sexes(self) -> Vec<Sex> {
        if self.is_split() {
            vec![Sex::Both]
        } else {
            self.chart_sexes()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgeMode {
    /// Average over every age group of the indicator.
    #[default]
    Any,
    /// Restrict to the single age group spanned by `age_range`.
    Range,
}

/// Everything the pipeline needs to shape the three views.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub indicator: String,
    pub sex: SexChoice,
    pub age_mode: AgeMode,
    /// Slider boundaries, `[start, end)`.
    pub age_range: (u32, u32),
    /// Inclusive on both ends.
    pub year_range: (i32, i32),
    /// Chosen countries; empty means `Global`.
    pub countries: Vec<String>,
}

impl Selection {
    /// Countries shown on the chart, defaulting to `Global`.
    pub fn effective_countries(&self) -> Vec<String> {
        if self.countries.is_empty() {
            vec![GLOBAL.to_string()]
        } else {
            self.countries.clone()
        }
    }

    /// Age-group label rows must carry, or `None` under [`AgeMode::Any`].
    pub fn age_group(&self) -> Option<String> {
        match self.age_mode {
            AgeMode::Any => None,
            AgeMode::Range => Some(age_label(self.age_range.0, self.age_range.1)),
        }
    }

    /// Predicate shared by every view: indicator, year range and age group.
    fn matches_base(&self, record: &Record, age_group: Option<&str>) -> bool {
        record.indicator == self.indicator
            && record.year >= self.year_range.0
            && record.year <= self.year_range.1
            && age_group.map_or(true, |age| record.age == age)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows feeding each view. The table shows `chart`.
#[derive(Debug, Clone, Default)]
pub struct FilteredRows<'a> {
    pub chart: Vec<&'a Record>,
    pub map: Vec<&'a Record>,
}

/// Split the table into chart rows and map rows for `selection`.
///
/// Chart rows additionally match the chosen countries and sexes. Map rows
/// ignore the country choice, drop regional aggregates and use
/// [`SexChoice::map_sexes`].
pub fn filter<'a>(dataset: &'a Dataset, selection: &Selection) -> FilteredRows<'a> {
    let age_group = selection.age_group();
    let countries = selection.effective_countries();
    let chart_sexes = selection.sex.chart_sexes();
    let map_sexes = selection.sex.map_sexes();

    let mut rows = FilteredRows::default();
    for record in &dataset.records {
        if !selection.matches_base(record, age_group.as_deref()) {
            continue;
        }
        if countries.contains(&record.country) && chart_sexes.contains(&record.sex) {
            rows.chart.push(record);
        }
        if record.area_type != AreaType::Region && map_sexes.contains(&record.sex) {
            rows.map.push(record);
        }
    }

    log::debug!(
        "filter '{}': {} chart rows, {} map rows",
        selection.indicator,
        rows.chart.len(),
        rows.map.len()
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

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
    fn sex_choice_resolution() {
        let none = SexChoice::default();
        assert_eq!(none.chart_sexes(), vec![Sex::Both]);
        assert_eq!(none.map_sexes(), vec![Sex::Both]);

        let male = SexChoice { male: true, female: false };
        assert_eq!(male.chart_sexes(), vec![Sex::Male]);
        assert_eq!(male.map_sexes(), vec![Sex::Male]);

        let female = SexChoice { male: false, female: true };
        assert_eq!(female.chart_sexes(), vec![Sex::Female]);

        let split = SexChoice { male: true, female: true };
        assert_eq!(split.chart_sexes(), vec![Sex::Male, Sex::Female]);
        assert_eq!(split.map_sexes(), vec![Sex::Both]);
    }

    #[test]
    fn empty_country_choice_means_global() {
        let sel = selection("X");
        assert_eq!(sel.effective_countries(), vec!["Global"]);
    }

    #[test]
    fn single_global_row_reaches_both_views() {
        let ds = Dataset::from_records(vec![record(
            "Global", "X", Sex::Both, "Age 0-19", 2020, 100.0,
        )]);
        let mut sel = selection("X");
        sel.year_range = (2020, 2020);

        let rows = filter(&ds, &sel);
        assert_eq!(rows.chart.len(), 1);
        assert_eq!(rows.chart[0].estimated, 100.0);
        assert_eq!(rows.map.len(), 1);
    }

    #[test]
    fn base_predicate_checks_indicator_and_years() {
        let ds = Dataset::from_records(vec![
            record("Global", "X", Sex::Both, "Age 0-4", 1999, 1.0),
            record("Global", "X", Sex::Both, "Age 0-4", 2005, 2.0),
            record("Global", "Y", Sex::Both, "Age 0-4", 2005, 3.0),
        ]);
        let mut sel = selection("X");
        sel.year_range = (2000, 2005);

        let rows = filter(&ds, &sel);
        assert_eq!(rows.chart.len(), 1);
        assert_eq!(rows.chart[0].estimated, 2.0);
    }

    #[test]
    fn range_mode_matches_reconstructed_label() {
        let ds = Dataset::from_records(vec![
            record("Global", "X", Sex::Both, "Age 10-14", 2010, 1.0),
            record("Global", "X", Sex::Both, "Age 15-19", 2010, 2.0),
        ]);
        let mut sel = selection("X");
        sel.age_mode = AgeMode::Range;
        sel.age_range = (15, 20);

        let rows = filter(&ds, &sel);
        assert_eq!(rows.chart.len(), 1);
        assert_eq!(rows.chart[0].age, "Age 15-19");

        sel.age_mode = AgeMode::Any;
        assert_eq!(filter(&ds, &sel).chart.len(), 2);
    }

    #[test]
    fn chart_respects_countries_map_ignores_them() {
        let ds = Dataset::from_records(vec![
            record("Kenya", "X", Sex::Both, "Age 0-4", 2010, 1.0),
            record("Chad", "X", Sex::Both, "Age 0-4", 2010, 2.0),
        ]);
        let mut sel = selection("X");
        sel.countries = vec!["Kenya".to_string()];

        let rows = filter(&ds, &sel);
        assert_eq!(rows.chart.len(), 1);
        assert_eq!(rows.chart[0].country, "Kenya");
        assert_eq!(rows.map.len(), 2);
    }

    #[test]
    fn map_drops_regions() {
        let mut region = record("Africa", "X", Sex::Both, "Age 0-4", 2010, 5.0);
        region.area_type = AreaType::Region;
        let ds = Dataset::from_records(vec![
            region,
            record("Chad", "X", Sex::Both, "Age 0-4", 2010, 2.0),
        ]);
        let mut sel = selection("X");
        sel.countries = vec!["Africa".to_string()];

        let rows = filter(&ds, &sel);
        assert_eq!(rows.chart.len(), 1);
        assert_eq!(rows.map.len(), 1);
        assert_eq!(rows.map[0].country, "Chad");
    }

    #[test]
    fn split_sexes_chart_both_sexes_map_only_both() {
        let ds = Dataset::from_records(vec![
            record("Chad", "X", Sex::Male, "Age 0-4", 2010, 1.0),
            record("Chad", "X", Sex::Female, "Age 0-4", 2010, 2.0),
            record("Chad", "X", Sex::Both, "Age 0-4", 2010, 3.0),
        ]);
        let mut sel = selection("X");
        sel.countries = vec!["Chad".to_string()];
        sel.sex = SexChoice { male: true, female: true };

        let rows = filter(&ds, &sel);
        let chart: Vec<Sex> = rows.chart.iter().map(|r| r.sex).collect();
        assert_eq!(chart, vec![Sex::Male, Sex::Female]);
        assert_eq!(rows.map.len(), 1);
        assert_eq!(rows.map[0].sex, Sex::Both);
    }
}
