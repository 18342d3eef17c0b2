use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static STYLE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<style>[\s\S]*?</style>").unwrap());
static FADE_IN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"animation: fadein[^;'"]+"#).unwrap());
static CURRENT_STREAK_ANIMATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"animation: currstreak[^;'"]+"#).unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<a [\s\S]*?>([\s\S]*?)</a>").unwrap());

static TRANSPARENT_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)(fill|stroke)=['"]transparent['"]"#).unwrap());
static HEX_COLOR_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(fill|stroke|stop-color|flood-color|lighting-color)\s*=\s*["']#?([0-9a-fA-F]{3,8})["']"#)
        .unwrap()
});

/// Static rendering of the card: keyframes dropped, every element fully
/// opaque, the current-streak number at its final size and links unwrapped.
pub fn remove_animations(svg: &str) -> String {
    let svg = STYLE_BLOCK.replace_all(svg, "");
    let svg = svg.replace("opacity: 0;", "opacity: 1;");
    let svg = FADE_IN.replace_all(&svg, "opacity: 1;");
    let svg = CURRENT_STREAK_ANIMATION.replace_all(&svg, "font-size: 28px;");
    LINK.replace_all(&svg, "$1").into_owned()
}

/// Rewrites 3/4/8-digit hex color attributes as a 6-digit color plus a
/// separate opacity attribute, for renderers without `#rgba` support.
pub fn convert_hex_colors(svg: &str) -> String {
    let svg = TRANSPARENT_ATTRIBUTE.replace_all(svg, r##"$1="#0000""##);
    HEX_COLOR_ATTRIBUTE
        .replace_all(&svg, |caps: &Captures| {
            let whole = &caps[0];
            let attribute = &caps[1];
            let opacity_attribute = match attribute {
                "stop-color" => "stop-opacity".to_string(),
                other => format!("{}-opacity", other),
            };

            let already_split = caps
                .get(0)
                .map(|m| svg[m.end()..].starts_with(&format!(" {}=", opacity_attribute)))
                .unwrap_or(false);
            if caps[2].len() == 6 && already_split {
                return whole.to_string();
            }

            match split_hex_color(&caps[2]) {
                Some((color, opacity)) => {
                    format!("{}=\"{}\" {}=\"{}\"", attribute, color, opacity_attribute, opacity)
                }
                None => whole.to_string(),
            }
        })
        .into_owned()
}

/// `#rrggbb` and an opacity in `0..=1`; `None` for 5 or 7 digits.
fn split_hex_color(hex: &str) -> Option<(String, f64)> {
    let digits: Vec<char> = hex.chars().collect();
    let channel = |pair: &str| u8::from_str_radix(pair, 16).ok().map(|v| f64::from(v) / 255.0);
    match digits.len() {
        3 | 4 => {
            let rgb: String = digits[..3].iter().flat_map(|c| [*c, *c]).collect();
            let opacity = match digits.get(3) {
                Some(a) => channel(&format!("{}{}", a, a))?,
                None => 1.0,
            };
            Some((format!("#{}", rgb), opacity))
        }
        6 => Some((format!("#{}", hex), 1.0)),
        8 => Some((format!("#{}", &hex[..6]), channel(&hex[6..])?)),
        _ => None,
    }
}
