use chrono::{Days, NaiveDate, Utc};

use crate::models::{ContributionGraphs, Timeline};

/// Flattens yearly graphs into one timeline as seen from the current UTC date.
pub fn merge(graphs: &ContributionGraphs) -> Timeline {
    merge_as_of(graphs, Utc::now().date_naive())
}

/// Days after `today` are dropped, except a non-empty `today + 1`: contributors
/// in later time zones can already have commits dated tomorrow.
pub fn merge_as_of(graphs: &ContributionGraphs, today: NaiveDate) -> Timeline {
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

    let mut years: Vec<i32> = graphs.keys().copied().collect();
    years.sort_unstable();

    let mut timeline = Timeline::new();
    for year in years {
        let Some(graph) = graphs.get(&year) else {
            continue;
        };
        for day in graph.days() {
            let count = day.contribution_count;
            if day.date <= today || (day.date == tomorrow && count > 0) {
                timeline.insert(day.date, count);
            }
        }
    }

    timeline
}
