use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::{StatsResult, Streak, StreakSummary, Timeline};

/// Three-letter English weekday names, Sunday first.
pub const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const WEEKDAYS_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Parses user-supplied weekday names by their first three letters, ignoring
/// case and unknown entries.
pub fn normalize_days<'a, I>(days: I) -> Vec<Weekday>
where
    I: IntoIterator<Item = &'a str>,
{
    days.into_iter()
        .filter_map(|day| {
            let prefix: String = day.trim().chars().take(3).collect::<String>().to_lowercase();
            WEEKDAY_ABBREVIATIONS
                .iter()
                .position(|abbr| abbr.to_lowercase() == prefix)
                .map(|index| WEEKDAYS_FROM_SUNDAY[index])
        })
        .collect()
}

/// Daily streaks. Excluded weekdays keep an active streak alive but never
/// start one.
pub fn compute_daily(timeline: &Timeline, excluded_days: &[Weekday]) -> Result<StatsResult> {
    let (Some((&first, _)), Some((&today, _))) = (timeline.first_key_value(), timeline.last_key_value()) else {
        return Err(Error::NoContributions);
    };

    let mut total_contributions = 0u64;
    let mut first_contribution = None;
    let mut longest_streak = Streak::empty(first);
    let mut current_streak = Streak::empty(first);

    for (&date, &count) in timeline {
        total_contributions += u64::from(count);

        let excluded = current_streak.is_active() && excluded_days.contains(&date.weekday());
        if count > 0 || excluded {
            current_streak.extend(date);
            first_contribution.get_or_insert(date);
            if current_streak.length > longest_streak.length {
                longest_streak = current_streak;
            }
        } else if date != today {
            current_streak = Streak::empty(today);
        }
    }

    Ok(StatsResult::Daily {
        summary: StreakSummary {
            total_contributions,
            first_contribution: first_contribution.unwrap_or(first),
            longest_streak,
            current_streak,
        },
        excluded_days: excluded_days.to_vec(),
    })
}

/// Weekly streaks over Sunday-anchored buckets.
pub fn compute_weekly(timeline: &Timeline) -> Result<StatsResult> {
    let (Some((&first, _)), Some((&last, _))) = (timeline.first_key_value(), timeline.last_key_value()) else {
        return Err(Error::NoContributions);
    };

    let this_week = previous_sunday(last);
    let first_week = previous_sunday(first);

    let mut first_contribution = None;
    let mut weeks: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for (&date, &count) in timeline {
        let bucket = weeks.entry(previous_sunday(date)).or_insert(0);
        if count > 0 {
            *bucket += u64::from(count);
            first_contribution.get_or_insert(date);
        }
    }

    let mut total_contributions = 0u64;
    let mut longest_streak = Streak::empty(first_week);
    let mut current_streak = Streak::empty(first_week);

    for (&week, &count) in &weeks {
        total_contributions += count;
        if count > 0 {
            current_streak.extend(week);
            if current_streak.length > longest_streak.length {
                longest_streak = current_streak;
            }
        } else if week != this_week {
            current_streak = Streak::empty(this_week);
        }
    }

    Ok(StatsResult::Weekly {
        summary: StreakSummary {
            total_contributions,
            first_contribution: first_contribution.unwrap_or(first),
            longest_streak,
            current_streak,
        },
    })
}

/// The Sunday on or before `date`.
pub fn previous_sunday(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}
