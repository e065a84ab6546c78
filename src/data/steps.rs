//! Age slider domain derived from age-group labels.

use std::collections::BTreeSet;

/// Turn age-group labels (`"Age 0-4"`, `"Age 15-19"`, ...) into the sorted
/// boundary values offered by the age slider.
///
/// Every run of digits in every label is a candidate. Multiples of five are
/// kept; any other number is bumped by one, so `"Age 0-4"` contributes
/// `0` and `5`. Labels without digits contribute nothing.
pub fn derive_steps<S: AsRef<str>>(labels: &[S]) -> Vec<u32> {
    let numbers: BTreeSet<u32> = labels
        .iter()
        .flat_map(|label| digit_runs(label.as_ref()))
        .collect();

    let steps: BTreeSet<u32> = numbers
        .into_iter()
        .map(|n| if n % 5 == 0 { n } else { n + 1 })
        .collect();

    steps.into_iter().collect()
}

/// Every maximal run of ASCII digits in `label`, parsed.
fn digit_runs(label: &str) -> Vec<u32> {
    label
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse().ok())
        .collect()
}

/// Age-group label selected by the half-open slider range `[start, end)`.
pub fn age_label(start: u32, end: u32) -> String {
    format!("Age {}-{}", start, end.saturating_sub(1))
}
