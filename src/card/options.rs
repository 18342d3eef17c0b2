use std::collections::HashMap;

use crate::card::locale::DEFAULT_LOCALE;
use crate::card::theme::ThemeRole;
use crate::params::RequestParams;

pub const DEFAULT_CARD_WIDTH: f64 = 495.0;
pub const DEFAULT_CARD_HEIGHT: f64 = 195.0;
pub const MIN_COLUMN_WIDTH: f64 = 100.0;
pub const MIN_CARD_HEIGHT: f64 = 170.0;
pub const DEFAULT_BORDER_RADIUS: f64 = 4.5;
pub const DEFAULT_THEME: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputType {
    #[default]
    Svg,
    Png,
    Json,
}

impl OutputType {
    /// Anything other than `png` or `json` (any case) renders SVG.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("png") => OutputType::Png,
            Some("json") => OutputType::Json,
            _ => OutputType::Svg,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputType::Svg => "image/svg+xml",
            OutputType::Png => "image/png",
            OutputType::Json => "application/json",
        }
    }
}

/// Presentation settings pulled out of the request parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CardOptions {
    pub theme: String,
    pub color_overrides: HashMap<ThemeRole, String>,
    pub hide_border: bool,
    pub border_radius: f64,
    pub locale: String,
    /// Explicit `date_format`; `None` defers to the locale.
    pub date_format: Option<String>,
    pub card_width: f64,
    pub card_height: f64,
    pub hide_total_contributions: bool,
    pub hide_current_streak: bool,
    pub hide_longest_streak: bool,
    pub short_numbers: bool,
    pub disable_animations: bool,
    pub output: OutputType,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            color_overrides: HashMap::new(),
            hide_border: false,
            border_radius: DEFAULT_BORDER_RADIUS,
            locale: DEFAULT_LOCALE.to_string(),
            date_format: None,
            card_width: DEFAULT_CARD_WIDTH,
            card_height: DEFAULT_CARD_HEIGHT,
            hide_total_contributions: false,
            hide_current_streak: false,
            hide_longest_streak: false,
            short_numbers: false,
            disable_animations: false,
            output: OutputType::Svg,
        }
    }
}

impl CardOptions {
    pub fn from_params(params: &RequestParams) -> Self {
        let color_overrides = ThemeRole::ALL
            .iter()
            .filter_map(|role| params.first(role.key()).map(|value| (*role, value.to_string())))
            .collect();

        Self {
            theme: params.first("theme").unwrap_or(DEFAULT_THEME).to_string(),
            color_overrides,
            hide_border: params.flag("hide_border"),
            border_radius: params.number("border_radius", DEFAULT_BORDER_RADIUS),
            locale: params.first("locale").unwrap_or(DEFAULT_LOCALE).to_string(),
            date_format: params
                .first("date_format")
                .filter(|format| !format.is_empty())
                .map(str::to_string),
            card_width: params.number("card_width", DEFAULT_CARD_WIDTH),
            card_height: params.number("card_height", DEFAULT_CARD_HEIGHT),
            hide_total_contributions: params.flag("hide_total_contributions"),
            hide_current_streak: params.flag("hide_current_streak"),
            hide_longest_streak: params.flag("hide_longest_streak"),
            short_numbers: params.flag("short_numbers"),
            disable_animations: params.flag("disable_animations"),
            output: OutputType::from_param(params.first("type")),
        }
    }

    pub fn column_count(&self) -> usize {
        [
            self.hide_total_contributions,
            self.hide_current_streak,
            self.hide_longest_streak,
        ]
        .iter()
        .filter(|hidden| !**hidden)
        .count()
    }

    /// Requested width, never narrower than 100 per column.
    pub fn width_for(&self, columns: usize) -> f64 {
        self.card_width.max(MIN_COLUMN_WIDTH * columns as f64)
    }

    pub fn height(&self) -> f64 {
        self.card_height.max(MIN_CARD_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_params() {
        let options = CardOptions::from_params(&RequestParams::new());
        assert_eq!(options, CardOptions::default());
        assert_eq!(options.column_count(), 3);
        assert_eq!(options.width_for(3), 495.0);
        assert_eq!(options.height(), 195.0);
    }

    #[test]
    fn test_dimension_minimums() {
        let params = RequestParams::from_pairs([("card_width", "120"), ("card_height", "20")]);
        let options = CardOptions::from_params(&params);
        assert_eq!(options.width_for(3), 300.0);
        assert_eq!(options.width_for(1), 120.0);
        assert_eq!(options.height(), 170.0);
    }

    #[test]
    fn test_hidden_columns() {
        let params = RequestParams::from_pairs([
            ("hide_total_contributions", "true"),
            ("hide_longest_streak", "True"),
            ("hide_current_streak", "1"),
        ]);
        let options = CardOptions::from_params(&params);
        assert_eq!(options.column_count(), 1);
        assert!(!options.hide_current_streak);
    }

    #[test]
    fn test_color_overrides_use_camel_case_keys() {
        let params = RequestParams::from_pairs([("currStreakNum", "fff"), ("sideLabels", "red"), ("side_labels", "blue")]);
        let options = CardOptions::from_params(&params);
        assert_eq!(options.color_overrides.get(&ThemeRole::CurrStreakNum).map(String::as_str), Some("fff"));
        assert_eq!(options.color_overrides.get(&ThemeRole::SideLabels).map(String::as_str), Some("red"));
        assert_eq!(options.color_overrides.len(), 2);
    }

    #[test]
    fn test_output_type() {
        assert_eq!(OutputType::from_param(Some("PNG")), OutputType::Png);
        assert_eq!(OutputType::from_param(Some("json")), OutputType::Json);
        assert_eq!(OutputType::from_param(Some("gif")), OutputType::Svg);
        assert_eq!(OutputType::from_param(None), OutputType::Svg);
        assert_eq!(OutputType::Png.content_type(), "image/png");
    }

    #[test]
    fn test_empty_date_format_defers_to_locale() {
        let params = RequestParams::from_pairs([("date_format", ""), ("locale", "de")]);
        let options = CardOptions::from_params(&params);
        assert_eq!(options.date_format, None);
        assert_eq!(options.locale, "de");
    }
}
