use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::card::colors::is_css_color_name;
use crate::card::options::CardOptions;
use crate::error::{Error, Result};

const BUNDLED_THEMES: &str = include_str!("themes.json");
const DEFAULT_THEME: &str = "default";
const TRANSPARENT_BORDER: &str = "#0000";

static BUILTIN: Lazy<ThemeCatalog> =
    Lazy::new(|| ThemeCatalog::from_json(BUNDLED_THEMES).expect("bundled themes.json is valid"));

static GRADIENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+,(?:[a-f0-9]{3,8})(?:,[a-f0-9]{3,8})+$").unwrap());

/// Colorable parts of the card. `key()` doubles as the override parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeRole {
    Background,
    Border,
    Stroke,
    Ring,
    Fire,
    CurrStreakNum,
    SideNums,
    CurrStreakLabel,
    SideLabels,
    Dates,
    ExcludeDaysLabel,
}

impl ThemeRole {
    pub const ALL: [ThemeRole; 11] = [
        ThemeRole::Background,
        ThemeRole::Border,
        ThemeRole::Stroke,
        ThemeRole::Ring,
        ThemeRole::Fire,
        ThemeRole::CurrStreakNum,
        ThemeRole::SideNums,
        ThemeRole::CurrStreakLabel,
        ThemeRole::SideLabels,
        ThemeRole::Dates,
        ThemeRole::ExcludeDaysLabel,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ThemeRole::Background => "background",
            ThemeRole::Border => "border",
            ThemeRole::Stroke => "stroke",
            ThemeRole::Ring => "ring",
            ThemeRole::Fire => "fire",
            ThemeRole::CurrStreakNum => "currStreakNum",
            ThemeRole::SideNums => "sideNums",
            ThemeRole::CurrStreakLabel => "currStreakLabel",
            ThemeRole::SideLabels => "sideLabels",
            ThemeRole::Dates => "dates",
            ThemeRole::ExcludeDaysLabel => "excludeDaysLabel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub background: String,
    pub border: String,
    pub stroke: String,
    pub ring: String,
    pub fire: String,
    pub curr_streak_num: String,
    pub side_nums: String,
    pub curr_streak_label: String,
    pub side_labels: String,
    pub dates: String,
    pub exclude_days_label: String,
}

impl ThemeColors {
    pub fn get(&self, role: ThemeRole) -> &str {
        match role {
            ThemeRole::Background => &self.background,
            ThemeRole::Border => &self.border,
            ThemeRole::Stroke => &self.stroke,
            ThemeRole::Ring => &self.ring,
            ThemeRole::Fire => &self.fire,
            ThemeRole::CurrStreakNum => &self.curr_streak_num,
            ThemeRole::SideNums => &self.side_nums,
            ThemeRole::CurrStreakLabel => &self.curr_streak_label,
            ThemeRole::SideLabels => &self.side_labels,
            ThemeRole::Dates => &self.dates,
            ThemeRole::ExcludeDaysLabel => &self.exclude_days_label,
        }
    }

    fn set(&mut self, role: ThemeRole, value: String) {
        let slot = match role {
            ThemeRole::Background => &mut self.background,
            ThemeRole::Border => &mut self.border,
            ThemeRole::Stroke => &mut self.stroke,
            ThemeRole::Ring => &mut self.ring,
            ThemeRole::Fire => &mut self.fire,
            ThemeRole::CurrStreakNum => &mut self.curr_streak_num,
            ThemeRole::SideNums => &mut self.side_nums,
            ThemeRole::CurrStreakLabel => &mut self.curr_streak_label,
            ThemeRole::SideLabels => &mut self.side_labels,
            ThemeRole::Dates => &mut self.dates,
            ThemeRole::ExcludeDaysLabel => &mut self.exclude_days_label,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ThemeEntry {
    Alias(String),
    Colors(ThemeColors),
}

/// Named themes, some of which are aliases of others.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    entries: HashMap<String, ThemeEntry>,
    fallback: ThemeColors,
}

impl ThemeCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: HashMap<String, ThemeEntry> = serde_json::from_str(json)?;
        let fallback = match entries.get(DEFAULT_THEME) {
            Some(ThemeEntry::Colors(colors)) => colors.clone(),
            _ => {
                return Err(Error::Config(format!(
                    "theme catalog has no \"{}\" theme",
                    DEFAULT_THEME
                )))
            }
        };
        Ok(Self { entries, fallback })
    }

    pub fn builtin() -> &'static ThemeCatalog {
        &BUILTIN
    }

    /// Follows alias chains; unknown names and alias cycles yield the default theme.
    pub fn get(&self, name: &str) -> ThemeColors {
        let mut seen = HashSet::new();
        let mut current = name;
        loop {
            match self.entries.get(current) {
                Some(ThemeEntry::Colors(colors)) => return colors.clone(),
                Some(ThemeEntry::Alias(target)) if seen.insert(target.as_str()) => current = target,
                _ => return self.fallback.clone(),
            }
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, ThemeEntry::Colors(_)))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub angle: String,
    /// Hex digits without the leading `#`.
    pub colors: Vec<String>,
}

impl Gradient {
    /// Parses `angle,color,color[,color...]`.
    fn parse(value: &str) -> Option<Self> {
        let parts: Vec<&str> = value.split(',').collect();
        if parts.len() < 3 {
            return None;
        }
        Some(Self {
            angle: parts[0].to_string(),
            colors: parts[1..].iter().map(|c| c.to_string()).collect(),
        })
    }

    /// Evenly spaced stop offsets in percent.
    pub fn offsets(&self) -> Vec<f64> {
        let count = self.colors.len();
        (0..count)
            .map(|index| {
                if count == 1 {
                    0.0
                } else {
                    (index as f64 * 100.0) / (count - 1) as f64
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub colors: ThemeColors,
    pub gradient: Option<Gradient>,
}

pub const GRADIENT_ID: &str = "gradient";

pub fn normalize_theme_name(name: &str) -> String {
    name.to_lowercase().replace('_', "-")
}

fn is_hex_color(value: &str) -> bool {
    matches!(value.len(), 3 | 4 | 6 | 8) && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Named theme merged with valid per-request overrides.
pub fn resolve_theme(catalog: &ThemeCatalog, options: &CardOptions) -> Theme {
    let mut colors = catalog.get(&normalize_theme_name(&options.theme));

    for role in ThemeRole::ALL {
        let Some(raw) = options.color_overrides.get(&role) else {
            continue;
        };
        let normalized = raw.to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        if is_hex_color(&normalized) {
            colors.set(role, format!("#{}", normalized));
        } else if is_css_color_name(&normalized) {
            colors.set(role, normalized);
        } else if role == ThemeRole::Background && GRADIENT_PATTERN.is_match(&normalized) {
            colors.set(role, normalized);
        }
    }

    if options.hide_border {
        colors.border = TRANSPARENT_BORDER.to_string();
    }

    let gradient = Gradient::parse(&colors.background);
    if gradient.is_some() {
        colors.background = format!("url(#{})", GRADIENT_ID);
    }

    Theme { colors, gradient }
}
