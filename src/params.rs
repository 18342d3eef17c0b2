use chrono::Weekday;
use std::collections::HashMap;

use crate::analysis::streak_engine::normalize_days;
use crate::error::{Error, Result};
use crate::models::StatsMode;

/// Raw request parameters. Keys may repeat; scalar reads take the first value.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    values: HashMap<String, Vec<String>>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.insert(key, value);
        }
        params
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` when the first value equals "true", ignoring case.
    pub fn flag(&self, key: &str) -> bool {
        self.first(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Finite number or `fallback` when missing or unparseable.
    pub fn number(&self, key: &str, fallback: f64) -> f64 {
        self.first(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(fallback)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// What to fetch and how to aggregate it.
#[derive(Debug, Clone, PartialEq)]
pub struct StreakRequest {
    pub user: String,
    pub starting_year: Option<i32>,
    pub mode: StatsMode,
    pub excluded_days: Vec<Weekday>,
}

impl StreakRequest {
    pub fn from_params(params: &RequestParams) -> Result<Self> {
        let user = params
            .first("user")
            .map(sanitize_user)
            .filter(|user| !user.is_empty())
            .ok_or_else(|| Error::MissingParameter("user".to_string()))?;

        let starting_year = params
            .first("starting_year")
            .and_then(|v| v.trim().parse::<i32>().ok());

        let mode = match params.first("mode") {
            Some("weekly") => StatsMode::Weekly,
            _ => StatsMode::Daily,
        };

        let excluded_days = match mode {
            StatsMode::Daily => normalize_days(params.first("exclude_days").unwrap_or("").split(',')),
            StatsMode::Weekly => Vec::new(),
        };

        Ok(Self {
            user,
            starting_year,
            mode,
            excluded_days,
        })
    }
}

/// Keeps only ASCII letters, digits and dashes.
pub fn sanitize_user(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_wins() {
        let params = RequestParams::from_query("theme=dark&theme=radical&user=octocat");
        assert_eq!(params.first("theme"), Some("dark"));
        assert_eq!(params.all("theme").len(), 2);
        assert_eq!(params.first("missing"), None);
    }

    #[test]
    fn test_query_decoding() {
        let params = RequestParams::from_query("?date_format=M%20j%5B%2C%20Y%5D&background=45%2Cf00%2C00f");
        assert_eq!(params.first("date_format"), Some("M j[, Y]"));
        assert_eq!(params.first("background"), Some("45,f00,00f"));
    }

    #[test]
    fn test_number_fallbacks() {
        let params = RequestParams::from_pairs([("card_width", "600"), ("card_height", "tall"), ("border_radius", "")]);
        assert_eq!(params.number("card_width", 495.0), 600.0);
        assert_eq!(params.number("card_height", 195.0), 195.0);
        assert_eq!(params.number("border_radius", 4.5), 4.5);
        assert_eq!(params.number("absent", 1.0), 1.0);
    }

    #[test]
    fn test_flag_is_case_insensitive() {
        let params = RequestParams::from_pairs([("hide_border", "TRUE"), ("short_numbers", "yes")]);
        assert!(params.flag("hide_border"));
        assert!(!params.flag("short_numbers"));
    }

    #[test]
    fn test_streak_request_defaults() {
        let params = RequestParams::from_pairs([("user", "octo<cat>_1")]);
        let request = StreakRequest::from_params(&params).unwrap();
        assert_eq!(request.user, "octocat1");
        assert_eq!(request.starting_year, None);
        assert_eq!(request.mode, StatsMode::Daily);
        assert!(request.excluded_days.is_empty());
    }

    #[test]
    fn test_streak_request_daily_with_excluded_days() {
        let params = RequestParams::from_pairs([
            ("user", "octocat"),
            ("starting_year", "2019"),
            ("exclude_days", "sun,Saturday"),
        ]);
        let request = StreakRequest::from_params(&params).unwrap();
        assert_eq!(request.starting_year, Some(2019));
        assert_eq!(request.excluded_days, vec![Weekday::Sun, Weekday::Sat]);
    }

    #[test]
    fn test_streak_request_weekly_ignores_excluded_days() {
        let params = RequestParams::from_pairs([("user", "octocat"), ("mode", "weekly"), ("exclude_days", "Sun")]);
        let request = StreakRequest::from_params(&params).unwrap();
        assert_eq!(request.mode, StatsMode::Weekly);
        assert!(request.excluded_days.is_empty());
    }

    #[test]
    fn test_missing_user() {
        let params = RequestParams::from_pairs([("theme", "dark")]);
        assert!(matches!(
            StreakRequest::from_params(&params),
            Err(Error::MissingParameter(p)) if p == "user"
        ));
        let blank = RequestParams::from_pairs([("user", "!!!")]);
        assert!(StreakRequest::from_params(&blank).is_err());
    }
}
