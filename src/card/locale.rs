use chrono::Weekday;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};

const BUNDLED_TRANSLATIONS: &str = include_str!("translations.json");
pub const DEFAULT_LOCALE: &str = "en";

static BUILTIN: Lazy<LocaleCatalog> = Lazy::new(|| {
    LocaleCatalog::from_json(BUNDLED_TRANSLATIONS).expect("bundled translations.json is valid")
});

#[derive(Debug, Clone, Default, Deserialize)]
struct LocaleEntry {
    rtl: Option<bool>,
    date_format: Option<String>,
    comma_separator: Option<String>,
    thousands_separator: Option<String>,
    decimal_separator: Option<String>,
    min_grouping_digits: Option<usize>,
    months_short: Option<Vec<String>>,
    months_long: Option<Vec<String>>,
    weekdays_short: Option<Vec<String>>,
    #[serde(default)]
    labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CatalogEntry {
    Alias(String),
    Locale(LocaleEntry),
}

/// Resolved translations with every field filled in from English where the
/// locale itself is silent.
#[derive(Debug, Clone, PartialEq)]
pub struct Locale {
    pub code: String,
    pub rtl: bool,
    pub date_format: Option<String>,
    pub comma_separator: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
    pub min_grouping_digits: usize,
    months_short: Vec<String>,
    months_long: Vec<String>,
    weekdays_short: Vec<String>,
    labels: HashMap<String, String>,
}

impl Locale {
    /// Translated label, or the key itself when no translation exists.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.labels.get(key).map(String::as_str).unwrap_or(key)
    }

    /// `month` is 1-based.
    pub fn month_short(&self, month: u32) -> &str {
        lookup(&self.months_short, month.saturating_sub(1) as usize)
    }

    pub fn month_long(&self, month: u32) -> &str {
        lookup(&self.months_long, month.saturating_sub(1) as usize)
    }

    pub fn weekday_short(&self, day: Weekday) -> &str {
        lookup(&self.weekdays_short, day.num_days_from_sunday() as usize)
    }
}

fn lookup(values: &[String], index: usize) -> &str {
    values.get(index).map(String::as_str).unwrap_or("")
}

fn pick_list(own: Option<Vec<String>>, fallback: &Option<Vec<String>>, len: usize) -> Vec<String> {
    own.filter(|values| values.len() == len)
        .or_else(|| fallback.clone())
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    entries: HashMap<String, CatalogEntry>,
    english: LocaleEntry,
}

impl LocaleCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: HashMap<String, CatalogEntry> = serde_json::from_str(json)?;
        let english = match entries.get(DEFAULT_LOCALE) {
            Some(CatalogEntry::Locale(entry)) => entry.clone(),
            _ => {
                return Err(Error::Config(format!(
                    "translation catalog has no \"{}\" locale",
                    DEFAULT_LOCALE
                )))
            }
        };
        Ok(Self { entries, english })
    }

    pub fn builtin() -> &'static LocaleCatalog {
        &BUILTIN
    }

    /// Unknown codes, dangling aliases and alias cycles all resolve to English.
    pub fn get(&self, code: &str) -> Locale {
        let mut seen = HashSet::new();
        let mut current = code;
        let entry = loop {
            match self.entries.get(current) {
                Some(CatalogEntry::Locale(entry)) => break Some((current, entry)),
                Some(CatalogEntry::Alias(target)) if seen.insert(target.as_str()) => current = target,
                _ => break None,
            }
        };
        match entry {
            Some((resolved, entry)) => self.merge(resolved, entry.clone()),
            None => self.merge(DEFAULT_LOCALE, self.english.clone()),
        }
    }

    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, CatalogEntry::Locale(_)))
            .map(|(code, _)| code.as_str())
            .collect();
        codes.sort_unstable();
        codes
    }

    fn merge(&self, code: &str, entry: LocaleEntry) -> Locale {
        let english = &self.english;
        let mut labels = english.labels.clone();
        labels.extend(entry.labels);

        Locale {
            code: code.to_string(),
            rtl: entry.rtl.unwrap_or(false),
            date_format: entry.date_format,
            comma_separator: entry
                .comma_separator
                .or_else(|| english.comma_separator.clone())
                .unwrap_or_else(|| ", ".to_string()),
            thousands_separator: entry
                .thousands_separator
                .or_else(|| english.thousands_separator.clone())
                .unwrap_or_else(|| ",".to_string()),
            decimal_separator: entry
                .decimal_separator
                .or_else(|| english.decimal_separator.clone())
                .unwrap_or_else(|| ".".to_string()),
            min_grouping_digits: entry.min_grouping_digits.unwrap_or(1).max(1),
            months_short: pick_list(entry.months_short, &english.months_short, 12),
            months_long: pick_list(entry.months_long, &english.months_long, 12),
            weekdays_short: pick_list(entry.weekdays_short, &english.weekdays_short, 7),
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_defaults() {
        let en = LocaleCatalog::builtin().get("en");
        assert!(!en.rtl);
        assert_eq!(en.date_format, None);
        assert_eq!(en.label("Current Streak"), "Current Streak");
        assert_eq!(en.month_short(1), "Jan");
        assert_eq!(en.month_long(12), "December");
        assert_eq!(en.weekday_short(Weekday::Sat), "Sat");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        let locale = LocaleCatalog::builtin().get("xx-unknown");
        assert_eq!(locale.code, "en");
        assert_eq!(locale.label("Present"), "Present");
    }

    #[test]
    fn test_alias_resolves_to_target() {
        let catalog = LocaleCatalog::builtin();
        let iw = catalog.get("iw");
        assert_eq!(iw.code, "he");
        assert!(iw.rtl);
        assert!(!catalog.codes().contains(&"iw"));
    }

    #[test]
    fn test_missing_fields_come_from_english() {
        let ja = LocaleCatalog::builtin().get("ja");
        assert_eq!(ja.thousands_separator, ",");
        assert_eq!(ja.comma_separator, "、");
        assert_eq!(ja.label("Week Streak"), "週間ストリーク");
        assert_eq!(ja.label("Something Else"), "Something Else");
    }

    #[test]
    fn test_alias_cycle_and_dangling_alias() {
        let json = r#"{
            "en": {"labels": {"Present": "Present"}},
            "a": "b",
            "b": "a",
            "c": "missing"
        }"#;
        let catalog = LocaleCatalog::from_json(json).unwrap();
        assert_eq!(catalog.get("a").code, "en");
        assert_eq!(catalog.get("c").code, "en");
        assert_eq!(catalog.codes(), vec!["en"]);
    }

    #[test]
    fn test_catalog_requires_english() {
        assert!(LocaleCatalog::from_json(r#"{"de": {}}"#).is_err());
    }
}
