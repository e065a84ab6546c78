use super::filter::{AgeMode, Selection};
use super::model::GLOBAL;

/// Chart titles are wrapped at this many characters.
pub const CHART_TITLE_WIDTH: usize = 90;

/// Headings of the three views for one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Titles {
    pub chart: String,
    pub map: String,
    pub table: String,
}

/// Build the view headings describing `selection`.
///
/// The map heading leaves out the country clause because the map is not
/// filtered by country.
pub fn titles(selection: &Selection) -> Titles {
    let subject = subject(selection);
    let countries = country_clause(selection);
    let with_countries = |prefix: &str| {
        if countries.is_empty() {
            format!("{prefix} {subject}")
        } else {
            format!("{prefix} {subject} {countries}")
        }
    };

    Titles {
        chart: wrap(&with_countries("Evolution of the"), CHART_TITLE_WIDTH),
        map: format!("Map of the {subject}"),
        table: with_countries("Data concerning the"),
    }
}

/// `"<indicator> in the [<sex> ]population between the ages A-B over the years S to E"`.
fn subject(selection: &Selection) -> String {
    let population = match sex_clause(selection) {
        Some(sex) => format!("{sex} population"),
        None => "population".to_string(),
    };
    format!(
        "{} in the {population} {} over the years {} to {}",
        selection.indicator,
        age_clause(selection),
        selection.year_range.0,
        selection.year_range.1
    )
}

/// Single-sex selections only; `Both` and the split choice read as the
/// whole population.
fn sex_clause(selection: &Selection) -> Option<&'static str> {
    match (selection.sex.male, selection.sex.female) {
        (true, false) => Some("Male"),
        (false, true) => Some("Female"),
        _ => None,
    }
}

fn country_clause(selection: &Selection) -> String {
    let countries = selection.effective_countries();
    if countries.len() == 1 && countries[0] == GLOBAL {
        String::new()
    } else {
        format!("in {}", countries.join(", "))
    }
}

fn age_clause(selection: &Selection) -> String {
    match selection.age_mode {
        AgeMode::Any => "between the ages 0-19".to_string(),
        AgeMode::Range => {
            let (start, end) = selection.age_range;
            format!("between the ages {}-{}", start, end.saturating_sub(1))
        }
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own.
pub fn wrap(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}
