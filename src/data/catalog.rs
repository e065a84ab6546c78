use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Fixed indicator classifications
// ---------------------------------------------------------------------------

/// How a value of an indicator is rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    /// Head counts, shown as whole numbers.
    Count,
    /// Rates and percentages, shown with two decimals.
    Rate,
}

/// How per-year values are combined when a year range is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearAggregation {
    /// Stock and rate measures: averaged across years.
    Mean,
    /// Flow measures (events per year): summed across years.
    Sum,
}

pub const ANNUAL_DEATHS: &str = "Estimated number of annual AIDS-related deaths";
pub const ANNUAL_NEW_INFECTIONS: &str = "Estimated number of annual new HIV infections";
pub const PEOPLE_LIVING_WITH_HIV: &str = "Estimated number of people living with HIV";
pub const INCIDENCE_RATE: &str =
    "Estimated incidence rate (new HIV infection per 1,000 uninfected population)";
pub const MTCT_RATE: &str = "Estimated mother-to-child transmission rate (%)";

const DISPLAY_KINDS: [(&str, DisplayKind); 3] = [
    (ANNUAL_DEATHS, DisplayKind::Count),
    (ANNUAL_NEW_INFECTIONS, DisplayKind::Count),
    (PEOPLE_LIVING_WITH_HIV, DisplayKind::Count),
];

const YEAR_AGGREGATIONS: [(&str, YearAggregation); 3] = [
    (INCIDENCE_RATE, YearAggregation::Mean),
    (MTCT_RATE, YearAggregation::Mean),
    (PEOPLE_LIVING_WITH_HIV, YearAggregation::Mean),
];

/// Display rounding for `indicator`; anything not listed is a rate.
pub fn display_kind(indicator: &str) -> DisplayKind {
    DISPLAY_KINDS
        .iter()
        .find(|(name, _)| *name == indicator)
        .map_or(DisplayKind::Rate, |(_, kind)| *kind)
}

/// Year-range aggregation for `indicator`; anything not listed is a flow.
pub fn year_aggregation(indicator: &str) -> YearAggregation {
    YEAR_AGGREGATIONS
        .iter()
        .find(|(name, _)| *name == indicator)
        .map_or(YearAggregation::Sum, |(_, agg)| *agg)
}

/// Format a value with the rounding of its indicator.
pub fn format_value(indicator: &str, value: f64) -> String {
    if value.is_nan() {
        return "n/a".to_string();
    }
    match display_kind(indicator) {
        DisplayKind::Count => format!("{:.0}", value.round()),
        DisplayKind::Rate => format!("{:.2}", value),
    }
}

// ---------------------------------------------------------------------------
// IndicatorCatalog – descriptions loaded from indicators.json
// ---------------------------------------------------------------------------

/// Indicator name → description text.
#[derive(Debug, Clone, Default)]
pub struct IndicatorCatalog {
    descriptions: BTreeMap<String, String>,
}

impl IndicatorCatalog {
    pub fn new(descriptions: BTreeMap<String, String>) -> Self {
        IndicatorCatalog { descriptions }
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    pub fn description(&self, indicator: &str) -> Option<&str> {
        self.descriptions.get(indicator).map(String::as_str)
    }

    /// Indicators of `names` with no description entry.
    pub fn missing<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        names
            .iter()
            .map(String::as_str)
            .filter(|n| !self.descriptions.contains_key(*n))
            .collect()
    }
}
