use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::card::locale::Locale;

/// Used when neither the request nor the locale supplies a date format.
pub const DEFAULT_DATE_FORMAT: &str = "M j[, Y]";

const SHORT_NUMBER_UNITS: [&str; 5] = ["", "K", "M", "B", "T"];

static OPTIONAL_SECTIONS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"\[[^\]]*\]").unwrap(),
        Regex::new(r"\{[^}]*\}").unwrap(),
    ]
});

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Locale-grouped number, optionally abbreviated with K/M/B/T to one decimal.
pub fn format_number(value: u64, locale: &Locale, short: bool) -> String {
    let mut scaled = value as f64;
    let mut unit = 0;
    if short {
        while scaled >= 1000.0 && unit < SHORT_NUMBER_UNITS.len() - 1 {
            scaled /= 1000.0;
            unit += 1;
        }
        scaled = (scaled * 10.0).round() / 10.0;
    }
    format!("{}{}", localize_number(scaled, locale), SHORT_NUMBER_UNITS[unit])
}

/// At most three fraction digits, trailing zeros dropped.
fn localize_number(value: f64, locale: &Locale) -> String {
    let fixed = format!("{:.3}", value);
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::new();
    let should_group = digits.len() >= 3 + locale.min_grouping_digits;
    for (index, digit) in digits.iter().enumerate() {
        let remaining = digits.len() - index;
        if should_group && index > 0 && remaining % 3 == 0 {
            grouped.push_str(&locale.thousands_separator);
        }
        grouped.push(*digit);
    }

    if fraction.is_empty() {
        grouped
    } else {
        format!("{}{}{}", grouped, locale.decimal_separator, fraction)
    }
}

/// Drops `[...]` and `{...}` sections entirely, or keeps their contents
/// without the brackets when `include` is set.
pub fn strip_optional_sections(format: &str, include: bool) -> String {
    if include {
        return format.replace(&['[', ']', '{', '}'][..], "");
    }
    OPTIONAL_SECTIONS
        .iter()
        .fold(format.to_string(), |acc, pattern| pattern.replace_all(&acc, "").into_owned())
}

/// Expands `Y y m n d j M F` tokens; `\` emits the next character literally.
/// Optional sections are shown only for dates outside `current_year`.
pub fn format_date(date: NaiveDate, format: &str, locale: &Locale, current_year: i32) -> String {
    let pattern = strip_optional_sections(format, date.year() != current_year);

    let mut result = String::new();
    let mut escape_next = false;
    for c in pattern.chars() {
        if escape_next {
            result.push(c);
            escape_next = false;
            continue;
        }
        match c {
            '\\' => escape_next = true,
            'Y' => result.push_str(&date.year().to_string()),
            'y' => {
                let year = date.year().to_string();
                let skip = year.chars().count().saturating_sub(2);
                result.extend(year.chars().skip(skip));
            }
            'm' => result.push_str(&format!("{:02}", date.month())),
            'n' => result.push_str(&date.month().to_string()),
            'd' => result.push_str(&format!("{:02}", date.day())),
            'j' => result.push_str(&date.day().to_string()),
            'M' => result.push_str(locale.month_short(date.month())),
            'F' => result.push_str(locale.month_long(date.month())),
            _ => result.push(c),
        }
    }
    if escape_next {
        result.push('\\');
    }
    result
}

/// Greedy wrap at whitespace to lines of at most `width` characters.
/// With `cut_long_words`, words longer than `width` are split as well.
pub fn word_wrap(text: &str, width: usize, cut_long_words: bool) -> String {
    if width == 0 {
        return text.to_string();
    }
    let chunk = match Regex::new(&format!(r"(?s)(.{{1,{}}})(?:\s|$)", width)) {
        Ok(chunk) => chunk,
        Err(_) => return text.to_string(),
    };
    let mut wrapped = chunk.replace_all(text, "${1}\n").into_owned();

    if cut_long_words {
        let mut cut = String::with_capacity(wrapped.len());
        let mut run = 0;
        let mut chars = wrapped.chars().peekable();
        while let Some(c) = chars.next() {
            cut.push(c);
            if c.is_whitespace() {
                run = 0;
                continue;
            }
            run += 1;
            if run == width && chars.peek().is_some_and(|next| !next.is_whitespace()) {
                cut.push('\n');
                run = 0;
            }
        }
        wrapped = cut;
    }

    match wrapped.strip_suffix('\n') {
        Some(trimmed) => trimmed.to_string(),
        None => wrapped,
    }
}

/// Breaks `text` into at most two display lines when it exceeds `max_chars`.
/// A ` - ` separator is preferred as the break point.
pub fn split_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut processed = text.to_string();
    if max_chars > 0 && text.chars().count() > max_chars && !text.contains('\n') {
        processed = if text.contains(" - ") {
            text.replacen(" - ", "\n- ", 1)
        } else {
            word_wrap(text, max_chars, true)
        };
    }
    match processed.split_once('\n') {
        Some((first, rest)) => vec![first.to_string(), rest.to_string()],
        None => vec![processed],
    }
}
