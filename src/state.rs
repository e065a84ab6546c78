use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::config::AppConfig;
use crate::data::aggregate::{aggregate_for_map, chart_series, ChartSeries};
use crate::data::catalog::IndicatorCatalog;
use crate::data::export::save_csv;
use crate::data::filter::{filter, AgeMode, Selection, SexChoice};
use crate::data::loader::{load_descriptions, load_file};
use crate::data::model::{Dataset, Record};
use crate::data::steps::derive_steps;
use crate::data::summary::{headline, overview, Headline, Overview};
use crate::data::title::{titles, Titles};
use crate::geo::{load_geojson, Boundaries};

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Introduction,
    Explorer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Chart,
    Map,
    Table,
}

// ---------------------------------------------------------------------------
// Inputs – widget state the Selection is rebuilt from
// ---------------------------------------------------------------------------

/// Raw widget values. Slider positions are indices into the current
/// indicator's domains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    pub indicator: String,
    pub sex: SexChoice,
    pub age_mode: AgeMode,
    pub age_idx: (usize, usize),
    pub year_idx: (usize, usize),
    pub countries: Vec<String>,
}

/// Per-indicator slider and picker domains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domains {
    pub age_groups: Vec<String>,
    pub age_steps: Vec<u32>,
    pub years: Vec<i32>,
    pub countries: Vec<String>,
}

/// Everything the three views render, rebuilt on every input change.
#[derive(Debug, Clone)]
pub struct Views {
    pub selection: Selection,
    pub titles: Titles,
    pub series: Vec<ChartSeries>,
    pub map_values: BTreeMap<String, f64>,
    pub table_rows: Vec<Record>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    pub config: AppConfig,

    /// Loaded table (None until a file loads).
    pub dataset: Option<Dataset>,
    pub catalog: IndicatorCatalog,
    pub boundaries: Boundaries,

    pub overview: Option<Overview>,
    pub headline: Option<Headline>,

    pub inputs: Inputs,
    pub domains: Domains,
    pub views: Option<Views>,

    pub page: Page,
    pub tab: Tab,
    /// Draw upper/lower bound lines on the chart.
    pub show_bounds: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load every configured file. Dataset and catalog failures are
    /// reported in the status line; missing boundaries only disable the map.
    pub fn from_config(config: AppConfig) -> Self {
        let mut state = AppState {
            config,
            show_bounds: true,
            ..Default::default()
        };

        match load_descriptions(&state.config.indicators) {
            Ok(catalog) => {
                if catalog.is_empty() {
                    log::warn!("Indicator catalog is empty");
                }
                log::info!("Loaded {} indicator descriptions", catalog.len());
                state.catalog = catalog;
            }
            Err(e) => state.fail(e.context("loading indicator descriptions")),
        }

        match load_geojson(&state.config.boundaries) {
            Ok(boundaries) => {
                log::info!("Loaded {} country boundaries", boundaries.len());
                state.boundaries = boundaries;
            }
            Err(e) => log::warn!("Map disabled: {e:#}"),
        }

        let dataset_path = state.config.dataset.clone();
        if let Err(e) = state.open_dataset(&dataset_path) {
            state.fail(e);
        }
        state
    }

    /// Log `e` and show it in the status line.
    pub(crate) fn fail(&mut self, e: anyhow::Error) {
        log::error!("{e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
    }

    pub fn open_dataset(&mut self, path: &Path) -> Result<()> {
        let dataset = load_file(path)?;
        if dataset.is_empty() {
            log::warn!("{} contains no rows", path.display());
        }
        log::info!("Loaded {} rows from {}", dataset.len(), path.display());
        self.set_dataset(dataset);
        Ok(())
    }

    /// Ingest a newly loaded dataset and select its first indicator.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let indicators = dataset.indicators();
        for missing in self.catalog.missing(&indicators) {
            log::warn!("No description for indicator '{missing}'");
        }

        self.overview = Some(overview(&dataset));
        self.dataset = Some(dataset);
        self.status_message = None;

        let first = indicators.into_iter().next().unwrap_or_default();
        self.select_indicator(first);
    }

    /// Switch indicator: rebuild the domains and reset every slider to its
    /// full span.
    pub fn select_indicator(&mut self, indicator: String) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let age_groups = ds.age_groups(&indicator);
        let age_steps = derive_steps(&age_groups);
        self.domains = Domains {
            age_steps,
            age_groups,
            years: ds.years(&indicator),
            countries: ds.countries(&indicator),
        };
        self.headline = headline(ds, &indicator);

        self.inputs.age_idx = (0, self.domains.age_steps.len().saturating_sub(1));
        self.inputs.year_idx = (0, self.domains.years.len().saturating_sub(1));
        self.inputs
            .countries
            .retain(|c| self.domains.countries.contains(c));
        self.inputs.indicator = indicator;
        self.recompute();
    }

    /// Translate widget state into a [`Selection`].
    pub fn selection(&self) -> Selection {
        let steps = &self.domains.age_steps;
        let years = &self.domains.years;
        let step = |i: usize| steps.get(i).or(steps.last()).copied().unwrap_or(0);
        let year = |i: usize| years.get(i).or(years.last()).copied().unwrap_or(0);

        Selection {
            indicator: self.inputs.indicator.clone(),
            sex: self.inputs.sex,
            age_mode: self.inputs.age_mode,
            age_range: (step(self.inputs.age_idx.0), step(self.inputs.age_idx.1)),
            year_range: (year(self.inputs.year_idx.0), year(self.inputs.year_idx.1)),
            countries: self.inputs.countries.clone(),
        }
    }

    /// Recompute all three views after an input change.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.views = None;
            return;
        };
        let selection = self.selection();
        let rows = filter(ds, &selection);

        self.views = Some(Views {
            titles: titles(&selection),
            series: chart_series(&rows.chart, &selection),
            map_values: aggregate_for_map(&rows.map, &selection.indicator),
            table_rows: rows.chart.into_iter().cloned().collect(),
            selection,
        });
    }

    pub fn description(&self) -> &str {
        self.catalog
            .description(&self.inputs.indicator)
            .unwrap_or_default()
    }

    /// Write the table rows to `path`.
    pub fn export(&mut self, path: &Path) {
        let Some(views) = &self.views else {
            return;
        };
        let rows: Vec<&Record> = views.table_rows.iter().collect();
        if let Err(e) = save_csv(&rows, path) {
            self.fail(e.context("exporting selection"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::Sex;

    fn state() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_records(vec![
            record("Global", "X", Sex::Both, "Age 0-4", 2010, 1.0),
            record("Global", "X", Sex::Both, "Age 5-9", 2012, 3.0),
            record("Chad", "X", Sex::Both, "Age 0-4", 2011, 5.0),
            record("Global", "Y", Sex::Both, "Age 15-19", 2020, 7.0),
        ]));
        state
    }

    #[test]
    fn first_indicator_is_selected_with_full_ranges() {
        let s = state();
        assert_eq!(s.inputs.indicator, "X");
        assert_eq!(s.domains.age_steps, vec![0, 5, 10]);
        assert_eq!(s.domains.years, vec![2010, 2011, 2012]);
        assert_eq!(s.domains.countries, vec!["Chad"]);

        let sel = s.selection();
        assert_eq!(sel.age_range, (0, 10));
        assert_eq!(sel.year_range, (2010, 2012));
        assert_eq!(s.views.as_ref().unwrap().table_rows.len(), 2);
    }

    #[test]
    fn switching_indicator_resets_domains() {
        let mut s = state();
        s.inputs.countries = vec!["Chad".to_string()];
        s.select_indicator("Y".to_string());

        assert_eq!(s.domains.age_steps, vec![15, 20]);
        assert_eq!(s.selection().year_range, (2020, 2020));
        assert!(s.inputs.countries.is_empty());
    }

    #[test]
    fn country_choice_narrows_the_table_not_the_map() {
        let mut s = state();
        s.inputs.countries = vec!["Chad".to_string()];
        s.recompute();

        let views = s.views.as_ref().unwrap();
        assert_eq!(views.table_rows.len(), 1);
        assert_eq!(views.map_values.len(), 2);
        assert!(views.titles.table.ends_with("in Chad"));
    }

    #[test]
    fn single_age_step_gives_a_fixed_range() {
        let mut s = AppState::default();
        s.set_dataset(Dataset::from_records(vec![
            record("Global", "X", Sex::Both, "Age 15", 2019, 2.0),
            record("Global", "X", Sex::Both, "Age 15", 2020, 4.0),
        ]));
        assert_eq!(s.domains.age_steps, vec![15]);
        assert_eq!(s.inputs.age_idx, (0, 0));

        s.inputs.age_mode = AgeMode::Range;
        s.recompute();
        let sel = s.selection();
        assert_eq!(sel.age_range, (15, 15));

        // An out-of-range index clamps to the only step.
        s.inputs.age_idx = (0, 3);
        assert_eq!(s.selection().age_range, (15, 15));
    }

    #[test]
    fn failures_reach_the_status_line() {
        let mut s = state();
        let err = s.open_dataset(Path::new("no/such/file.csv")).unwrap_err();
        s.fail(err.context("opening dataset"));
        let msg = s.status_message.as_deref().unwrap();
        assert!(msg.starts_with("Error: opening dataset: "));
        // The previous dataset stays loaded.
        assert_eq!(s.inputs.indicator, "X");
    }

    #[test]
    fn export_writes_the_table_rows() {
        let mut s = state();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.csv");
        s.export(&path);

        assert!(s.status_message.is_none());
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
