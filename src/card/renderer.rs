use chrono::{Datelike, NaiveDate, Utc};

use crate::card::format::{format_date, format_number, split_lines, DEFAULT_DATE_FORMAT};
use crate::card::layout::CardLayout;
use crate::card::locale::{Locale, LocaleCatalog};
use crate::card::options::{CardOptions, DEFAULT_CARD_HEIGHT};
use crate::card::svg::{Element, Node};
use crate::card::theme::{resolve_theme, Theme, ThemeCatalog, GRADIENT_ID};
use crate::models::{StatsMode, StatsResult, Streak};

const FONT_FAMILY: &str = "Segoe UI, Ubuntu, sans-serif";
const ERROR_CARD_COLUMNS: usize = 3;
const LABEL_FIRST_LINE_DY: i32 = -9;
const RANGE_FIRST_LINE_DY: i32 = 0;
const SECOND_LINE_DY: i32 = 16;
const FOOTNOTE_ROW: f64 = 187.0;

const KEYFRAMES: &str = "
            @keyframes currstreak {
                0% { font-size: 3px; opacity: 0.2; }
                80% { font-size: 34px; opacity: 1; }
                100% { font-size: 28px; opacity: 1; }
            }
            @keyframes fadein {
                0% { opacity: 0; }
                100% { opacity: 1; }
            }
        ";

const FIRE_OUTLINE: &str = "M -12 -0.5 L 15 -0.5 L 15 23.5 L -12 23.5 L -12 -0.5 Z";
const FIRE_PATH: &str = "M 1.5 0.67 C 1.5 0.67 2.24 3.32 2.24 5.47 C 2.24 7.53 0.89 9.2 -1.17 9.2 C -3.23 9.2 -4.79 7.53 -4.79 5.47 L -4.76 5.11 C -6.78 7.51 -8 10.62 -8 13.99 C -8 18.41 -4.42 22 0 22 C 4.42 22 8 18.41 8 13.99 C 8 8.6 5.41 3.79 1.5 0.67 Z M -0.29 19 C -2.07 19 -3.51 17.6 -3.51 15.86 C -3.51 14.24 -2.46 13.1 -0.7 12.74 C 1.07 12.38 2.9 11.53 3.92 10.16 C 4.31 11.45 4.51 12.81 4.51 14.2 C 4.51 16.85 2.36 19 -0.29 19 Z";
const SAD_FACE_RING: &str = "M0,35.8c-25.2,0-45.7,20.5-45.7,45.7s20.5,45.8,45.7,45.8s45.7-20.5,45.7-45.7S25.2,35.8,0,35.8z M0,122.3c-11.2,0-21.4-4.5-28.8-11.9c-2.9-2.9-5.4-6.3-7.4-10c-3-5.7-4.6-12.1-4.6-18.9c0-22.5,18.3-40.8,40.8-40.8 c10.7,0,20.4,4.1,27.7,10.9c3.8,3.5,6.9,7.7,9.1,12.4c2.6,5.3,4,11.3,4,17.6C40.8,104.1,22.5,122.3,0,122.3z";
const SAD_FACE_MOUTH: &str = "M4.8,93.8c5.4,1.1,10.3,4.2,13.7,8.6l3.9-3c-4.1-5.3-10-9-16.6-10.4c-10.6-2.2-21.7,1.9-28.3,10.4l3.9,3 C-13.1,95.3-3.9,91.9,4.8,93.8z";

/// Font and animation settings of one `<text>` element.
struct TextStyle<'a> {
    y: f64,
    fill: &'a str,
    weight: u32,
    size: &'a str,
    style: String,
}

impl<'a> TextStyle<'a> {
    fn new(fill: &'a str, weight: u32, size: &'a str) -> Self {
        Self {
            y: 32.0,
            fill,
            weight,
            size,
            style: String::new(),
        }
    }

    fn fade_in(mut self, delay: f64) -> Self {
        self.style = fade_in_style(delay);
        self
    }

    fn with_style(mut self, style: &str) -> Self {
        self.style = style.to_string();
        self
    }

    fn at_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }
}

/// Renders statistics (or an error message) as an SVG card.
#[derive(Debug, Clone)]
pub struct CardRenderer {
    themes: &'static ThemeCatalog,
    locales: &'static LocaleCatalog,
    current_year: i32,
}

impl Default for CardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CardRenderer {
    pub fn new() -> Self {
        Self::with_current_year(Utc::now().year())
    }

    /// Pins the year used to decide whether dates show their year.
    pub fn with_current_year(current_year: i32) -> Self {
        Self {
            themes: ThemeCatalog::builtin(),
            locales: LocaleCatalog::builtin(),
            current_year,
        }
    }

    pub fn render(&self, stats: &StatsResult, options: &CardOptions) -> String {
        let theme = resolve_theme(self.themes, options);
        let locale = self.locales.get(&options.locale);
        let direction = if locale.rtl { "rtl" } else { "ltr" };
        let layout = CardLayout::new(options, options.column_count(), locale.rtl);
        let colors = &theme.colors;
        let summary = stats.summary();

        let date_format = options
            .date_format
            .as_deref()
            .or(locale.date_format.as_deref())
            .unwrap_or(DEFAULT_DATE_FORMAT);
        let format_day = |date: NaiveDate| format_date(date, date_format, &locale, self.current_year);
        let format_count = |count: u64| format_number(count, &locale, options.short_numbers);
        let streak_range = |streak: &Streak| {
            let start = format_day(streak.start);
            let end = format_day(streak.end);
            if start == end {
                start
            } else {
                format!("{} - {}", start, end)
            }
        };

        let (current_key, longest_key) = match stats.mode() {
            StatsMode::Weekly => ("Week Streak", "Longest Week Streak"),
            StatsMode::Daily => ("Current Streak", "Longest Streak"),
        };
        let label_chars = layout.label_chars();
        let range_chars = layout.range_chars();
        let label = |key: &str| lines(split_lines(locale.label(key), label_chars), LABEL_FIRST_LINE_DY);
        let range = |text: String| lines(split_lines(&text, range_chars), RANGE_FIRST_LINE_DY);

        let mut offsets = layout.column_offsets.iter().copied();
        let total_x = (!options.hide_total_contributions).then(|| offsets.next()).flatten();
        let current_x = (!options.hide_current_streak).then(|| offsets.next()).flatten();
        let longest_x = (!options.hide_longest_streak).then(|| offsets.next()).flatten();

        let side = layout.side_rows();
        let current = layout.current_rows();

        let mut body = Element::new("g")
            .attr("clip-path", "url(#outer_rectangle)")
            .child(background(&theme, options.border_radius, layout.width, layout.height));

        let (bar_top, bar_bottom) = layout.bar_span();
        body.push(isolated().children(layout.bar_offsets.iter().map(|x| {
            Element::new("line")
                .attr("x1", x)
                .attr("y1", bar_top)
                .attr("x2", x)
                .attr("y2", bar_bottom)
                .attr("vector-effect", "non-scaling-stroke")
                .attr("stroke-width", 1)
                .attr("stroke", &colors.stroke)
                .attr("stroke-linejoin", "miter")
                .attr("stroke-linecap", "square")
                .attr("stroke-miterlimit", 3)
        })));

        if let Some(x) = total_x {
            let first = format_day(summary.first_contribution);
            body.push(
                isolated()
                    .comment("Total Contributions big number")
                    .child(text_at(
                        x,
                        side[0],
                        TextStyle::new(&colors.side_nums, 700, "28px").fade_in(0.6),
                        vec![Node::Text(format_count(summary.total_contributions))],
                    ))
                    .comment("Total Contributions label")
                    .child(text_at(
                        x,
                        side[1],
                        TextStyle::new(&colors.side_labels, 400, "14px").fade_in(0.7),
                        label("Total Contributions"),
                    ))
                    .comment("Total Contributions range")
                    .child(text_at(
                        x,
                        side[2],
                        TextStyle::new(&colors.dates, 400, "12px").fade_in(0.8),
                        range(format!("{} - {}", first, locale.label("Present"))),
                    )),
            );
        }

        if let Some(x) = current_x {
            let streak = &summary.current_streak;
            body.push(
                isolated()
                    .comment("Current Streak big number")
                    .child(text_at(
                        x,
                        current[0],
                        TextStyle::new(&colors.curr_streak_num, 700, "28px")
                            .with_style("animation: currstreak 0.6s linear forwards"),
                        vec![Node::Text(format_count(u64::from(streak.length)))],
                    ))
                    .comment("Current Streak label")
                    .child(text_at(
                        x,
                        current[1],
                        TextStyle::new(&colors.curr_streak_label, 700, "14px").fade_in(0.9),
                        label(current_key),
                    ))
                    .comment("Current Streak range")
                    .child(text_at(
                        x,
                        current[2],
                        TextStyle::new(&colors.dates, 400, "12px").fade_in(0.9).at_y(21.0),
                        range(streak_range(streak)),
                    ))
                    .comment("Ring around number")
                    .child(
                        Element::new("g").attr("mask", "url(#mask_out_ring_behind_fire)").child(
                            Element::new("circle")
                                .attr("cx", x)
                                .attr("cy", current[3])
                                .attr("r", 40)
                                .attr("fill", "none")
                                .attr("stroke", &colors.ring)
                                .attr("stroke-width", 5)
                                .attr("style", fade_in_style(0.4)),
                        ),
                    )
                    .comment("Fire icon")
                    .child(
                        Element::new("g")
                            .attr("transform", translate(x, current[4]))
                            .attr("stroke-opacity", 0)
                            .attr("style", fade_in_style(0.6))
                            .child(Element::new("path").attr("d", FIRE_OUTLINE).attr("fill", "none"))
                            .child(
                                Element::new("path")
                                    .attr("d", FIRE_PATH)
                                    .attr("fill", &colors.fire)
                                    .attr("stroke-opacity", 0),
                            ),
                    ),
            );
        }

        if let Some(x) = longest_x {
            let streak = &summary.longest_streak;
            body.push(
                isolated()
                    .comment("Longest Streak big number")
                    .child(text_at(
                        x,
                        side[0],
                        TextStyle::new(&colors.side_nums, 700, "28px").fade_in(1.2),
                        vec![Node::Text(format_count(u64::from(streak.length)))],
                    ))
                    .comment("Longest Streak label")
                    .child(text_at(
                        x,
                        side[1],
                        TextStyle::new(&colors.side_labels, 400, "14px").fade_in(1.3),
                        label(longest_key),
                    ))
                    .comment("Longest Streak range")
                    .child(text_at(
                        x,
                        side[2],
                        TextStyle::new(&colors.dates, 400, "12px").fade_in(1.4),
                        range(streak_range(streak)),
                    )),
            );
        }

        let excluded_days = stats.excluded_days();
        if !excluded_days.is_empty() {
            let anchor = if locale.rtl { layout.width - 5.0 } else { 5.0 };
            body.push(
                isolated().comment("Excluded Days").child(
                    Element::new("g").attr("transform", format!("translate({},{})", anchor, FOOTNOTE_ROW)).child(
                        Element::new("text")
                            .attr("stroke-width", 0)
                            .attr("text-anchor", "right")
                            .attr("fill", &colors.exclude_days_label)
                            .attr("stroke", "none")
                            .attr("font-family", FONT_FAMILY)
                            .attr("font-weight", 400)
                            .attr("font-size", "10px")
                            .attr("font-style", "normal")
                            .attr("style", fade_in_style(0.9))
                            .text(format!("* {}", excluding_text(excluded_days, &locale))),
                    ),
                ),
            );
        }

        let mut defs = Element::new("defs").child(outer_clip(layout.width, layout.height, options.border_radius));
        if let Some(x) = current_x {
            defs.push(
                Element::new("mask")
                    .attr("id", "mask_out_ring_behind_fire")
                    .child(
                        Element::new("rect")
                            .attr("width", layout.width)
                            .attr("height", layout.height)
                            .attr("fill", "white"),
                    )
                    .child(
                        Element::new("ellipse")
                            .attr("id", "mask-ellipse")
                            .attr("cx", x)
                            .attr("cy", 32)
                            .attr("rx", 13)
                            .attr("ry", 18)
                            .attr("fill", "black"),
                    ),
            );
        }
        if let Some(gradient) = gradient_element(&theme) {
            defs.push(gradient);
        }

        svg_root(layout.width, layout.height)
            .attr("direction", direction)
            .child(Element::new("style").text(KEYFRAMES))
            .child(defs)
            .child(body)
            .render()
    }

    /// Card carrying only `message`, framed by the themed background.
    pub fn render_error(&self, message: &str, options: &CardOptions) -> String {
        let theme = resolve_theme(self.themes, options);
        let colors = &theme.colors;
        let width = options.width_for(ERROR_CARD_COLUMNS);
        let height = options.height();
        let center = width / 2.0;
        let height_offset = (height - DEFAULT_CARD_HEIGHT) / 2.0;

        let mut defs = Element::new("defs").child(outer_clip(width, height, options.border_radius));
        if let Some(gradient) = gradient_element(&theme) {
            defs.push(gradient);
        }

        let face = Element::new("g")
            .attr("transform", translate(center, height_offset))
            .child(Element::new("path").attr("fill", &colors.fire).attr("d", SAD_FACE_RING))
            .child(Element::new("path").attr("fill", &colors.fire).attr("d", SAD_FACE_MOUTH))
            .child(eye(&colors.fire, -15))
            .child(eye(&colors.fire, 15));

        let content = isolated()
            .comment("Error label")
            .child(
                Element::new("g")
                    .attr("transform", translate(center, height / 2.0 + 10.5))
                    .child(
                        Element::new("text")
                            .attr("x", 0)
                            .attr("y", 50)
                            .attr("dy", "0.25em")
                            .attr("stroke-width", 0)
                            .attr("text-anchor", "middle")
                            .attr("fill", &colors.side_labels)
                            .attr("stroke", "none")
                            .attr("font-family", FONT_FAMILY)
                            .attr("font-weight", 400)
                            .attr("font-size", "14px")
                            .attr("font-style", "normal")
                            .text(message),
                    ),
            )
            .comment("Mask for background behind face")
            .child(
                Element::new("defs").child(
                    Element::new("mask")
                        .attr("id", "cut-off-area")
                        .child(
                            Element::new("rect")
                                .attr("x", 0)
                                .attr("y", 0)
                                .attr("width", 500)
                                .attr("height", 500)
                                .attr("fill", "white"),
                        )
                        .child(
                            Element::new("ellipse")
                                .attr("cx", center)
                                .attr("cy", 31)
                                .attr("rx", 13)
                                .attr("ry", 18),
                        ),
                ),
            )
            .comment("Sad face")
            .child(face);

        svg_root(width, height)
            .child(Element::new("style").text(format!(" a {{ fill: {}; }} ", colors.dates)))
            .child(defs)
            .child(
                Element::new("g")
                    .attr("clip-path", "url(#outer_rectangle)")
                    .child(background(&theme, options.border_radius, width, height))
                    .child(content),
            )
            .render()
    }
}

fn svg_root(width: f64, height: f64) -> Element {
    Element::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("xmlns:xlink", "http://www.w3.org/1999/xlink")
        .attr("style", "isolation: isolate")
        .attr("viewBox", format!("0 0 {} {}", width, height))
        .attr("width", format!("{}px", width))
        .attr("height", format!("{}px", height))
}

fn isolated() -> Element {
    Element::new("g").attr("style", "isolation: isolate")
}

fn translate(x: f64, y: f64) -> String {
    format!("translate({}, {})", x, y)
}

fn fade_in_style(delay: f64) -> String {
    format!("opacity: 0; animation: fadein 0.5s linear forwards {}s", delay)
}

fn outer_clip(width: f64, height: f64, radius: f64) -> Element {
    Element::new("clipPath").attr("id", "outer_rectangle").child(
        Element::new("rect")
            .attr("width", width)
            .attr("height", height)
            .attr("rx", radius),
    )
}

fn background(theme: &Theme, radius: f64, width: f64, height: f64) -> Element {
    isolated().child(
        Element::new("rect")
            .attr("stroke", &theme.colors.border)
            .attr("fill", &theme.colors.background)
            .attr("rx", radius)
            .attr("x", 0.5)
            .attr("y", 0.5)
            .attr("width", width - 1.0)
            .attr("height", height - 1.0),
    )
}

fn gradient_element(theme: &Theme) -> Option<Element> {
    let gradient = theme.gradient.as_ref()?;
    let stops = gradient.colors.iter().zip(gradient.offsets()).map(|(color, offset)| {
        Element::new("stop")
            .attr("offset", format!("{}%", offset))
            .attr("stop-color", format!("#{}", color))
    });
    Some(
        Element::new("linearGradient")
            .attr("id", GRADIENT_ID)
            .attr("gradientTransform", format!("rotate({})", gradient.angle))
            .attr("gradientUnits", "userSpaceOnUse")
            .children(stops),
    )
}

fn eye(fill: &str, cx: i32) -> Element {
    Element::new("circle")
        .attr("fill", fill)
        .attr("cx", cx)
        .attr("cy", 71)
        .attr("r", 4.9)
}

fn text_at(x: f64, y: f64, style: TextStyle<'_>, content: Vec<Node>) -> Element {
    let text = Element::new("text")
        .attr("x", 0)
        .attr("y", style.y)
        .attr("stroke-width", 0)
        .attr("text-anchor", "middle")
        .attr("fill", style.fill)
        .attr("stroke", "none")
        .attr("font-family", FONT_FAMILY)
        .attr("font-weight", style.weight)
        .attr("font-size", style.size)
        .attr("font-style", "normal")
        .attr("style", style.style)
        .children(content);
    Element::new("g").attr("transform", translate(x, y)).child(text)
}

/// One line stays plain text; two lines become stacked `<tspan>`s.
fn lines(parts: Vec<String>, first_dy: i32) -> Vec<Node> {
    if parts.len() < 2 {
        return parts.into_iter().map(Node::Text).collect();
    }
    parts
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            let dy = if index == 0 { first_dy } else { SECOND_LINE_DY };
            Node::from(Element::new("tspan").attr("x", 0).attr("dy", dy).text(line))
        })
        .collect()
}

fn excluding_text(days: &[chrono::Weekday], locale: &Locale) -> String {
    let names: Vec<&str> = days.iter().map(|day| locale.weekday_short(*day)).collect();
    locale
        .label("Excluding {days}")
        .replace("{days}", &names.join(&locale.comma_separator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StreakSummary;
    use crate::params::RequestParams;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn summary() -> StreakSummary {
        StreakSummary {
            total_contributions: 2048,
            first_contribution: date("2016-08-10"),
            longest_streak: Streak {
                start: date("2021-12-19"),
                end: date("2022-03-14"),
                length: 86,
            },
            current_streak: Streak {
                start: date("2024-03-01"),
                end: date("2024-03-05"),
                length: 5,
            },
        }
    }

    fn daily(excluded_days: Vec<Weekday>) -> StatsResult {
        StatsResult::Daily {
            summary: summary(),
            excluded_days,
        }
    }

    fn options(pairs: &[(&str, &str)]) -> CardOptions {
        CardOptions::from_params(&RequestParams::from_pairs(pairs.iter().copied()))
    }

    fn renderer() -> CardRenderer {
        CardRenderer::with_current_year(2024)
    }

    #[test]
    fn test_default_card_contents() {
        let svg = renderer().render(&daily(vec![]), &CardOptions::default());

        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"width="495px" height="195px" direction="ltr""#));
        assert!(svg.contains("<style>"));
        assert!(svg.contains(">2,048</text>"));
        assert!(svg.contains(">Total Contributions</text>"));
        assert!(svg.contains(">Aug 10, 2016 - Present</text>"));
        assert!(svg.contains(">Mar 1 - Mar 5</text>"));
        assert!(svg.contains(">Dec 19, 2021 - Mar 14, 2022</text>"));
        assert!(svg.contains(r#"transform="translate(247.5, 48)""#));
        assert!(svg.contains(r##"fill="#FFFEFE""##));
        assert!(!svg.contains("Excluding"));
    }

    #[test]
    fn test_single_day_streak_collapses_range() {
        let mut stats = daily(vec![]);
        if let StatsResult::Daily { summary, .. } = &mut stats {
            summary.current_streak = Streak {
                start: date("2024-03-05"),
                end: date("2024-03-05"),
                length: 1,
            };
        }
        let svg = renderer().render(&stats, &CardOptions::default());
        assert!(svg.contains(">Mar 5</text>"));
        assert!(!svg.contains("Mar 5 - Mar 5"));
    }

    #[test]
    fn test_weekly_labels() {
        let stats = StatsResult::Weekly { summary: summary() };
        let svg = renderer().render(&stats, &CardOptions::default());
        assert!(svg.contains(">Week Streak</text>"));
        assert!(svg.contains(">Longest Week Streak</text>"));
        assert!(!svg.contains(">Current Streak</text>"));
    }

    #[test]
    fn test_excluded_days_footnote() {
        let svg = renderer().render(&daily(vec![Weekday::Sun, Weekday::Sat]), &CardOptions::default());
        assert!(svg.contains(r#"transform="translate(5,187)""#));
        assert!(svg.contains(">* Excluding Sun, Sat</text>"));
    }

    #[test]
    fn test_rtl_locale_mirrors_layout() {
        let svg = renderer().render(&daily(vec![Weekday::Fri]), &options(&[("locale", "he")]));
        assert!(svg.contains(r#"direction="rtl""#));
        assert!(svg.contains(r#"translate(412.5, 48)"#));
        assert!(svg.contains(r#"translate(490,187)"#));
        assert!(svg.contains("רצף נוכחי"));
    }

    #[test]
    fn test_hidden_columns_are_omitted() {
        let svg = renderer().render(
            &daily(vec![]),
            &options(&[("hide_total_contributions", "true"), ("hide_longest_streak", "true"), ("card_width", "100")]),
        );
        assert!(!svg.contains("Total Contributions"));
        assert!(!svg.contains("Longest Streak"));
        assert!(!svg.contains("<line"));
        assert!(svg.contains(r#"width="100px""#));
        assert!(svg.contains("translate(50, 48)"));
    }

    #[test]
    fn test_narrow_columns_wrap_labels() {
        let svg = renderer().render(&daily(vec![]), &options(&[("card_width", "300")]));
        assert!(svg.contains(r#"<tspan x="0" dy="-9">Total</tspan>"#));
        assert!(svg.contains(r#"<tspan x="0" dy="16">Contributions</tspan>"#));
        assert!(svg.contains(r#"<tspan x="0" dy="0">Aug 10, 2016</tspan>"#));
        assert!(svg.contains(r#"<tspan x="0" dy="16">- Present</tspan>"#));
    }

    #[test]
    fn test_custom_date_format_and_short_numbers() {
        let svg = renderer().render(
            &daily(vec![]),
            &options(&[("date_format", "[Y.]n.j"), ("short_numbers", "true")]),
        );
        assert!(svg.contains(">2K</text>"));
        assert!(svg.contains(">2016.8.10 - Present</text>"));
        assert!(svg.contains(">3.1 - 3.5</text>"));
    }

    #[test]
    fn test_user_text_is_escaped_once() {
        let svg = renderer().render(&daily(vec![]), &options(&[("date_format", "<j>")]));
        assert!(svg.contains("&lt;10&gt; - Present"));
        assert!(!svg.contains("&amp;lt;"));
    }

    #[test]
    fn test_gradient_background() {
        let svg = renderer().render(&daily(vec![]), &options(&[("background", "45,f00,00f")]));
        assert!(svg.contains(
            r#"<linearGradient id="gradient" gradientTransform="rotate(45)" gradientUnits="userSpaceOnUse">"#
        ));
        assert!(svg.contains(r##"<stop offset="0%" stop-color="#f00"/>"##));
        assert!(svg.contains(r##"<stop offset="100%" stop-color="#00f"/>"##));
        assert!(svg.contains(r#"fill="url(#gradient)""#));
    }

    #[test]
    fn test_error_card() {
        let svg = renderer().render_error("Could not find a user with that name.", &CardOptions::default());
        assert!(svg.contains(">Could not find a user with that name.</text>"));
        assert!(svg.contains("translate(247.5, 108)"));
        assert!(svg.contains("translate(247.5, 0)"));
        assert!(svg.contains("a { fill: #464646; }"));
        assert!(svg.contains(r##"fill="#FB8C00""##));
        assert!(!svg.contains("direction="));
    }

    #[test]
    fn test_error_card_escapes_message() {
        let svg = renderer().render_error("<script>&", &CardOptions::default());
        assert!(svg.contains("&lt;script&gt;&amp;"));
        assert!(!svg.contains("<script>"));
    }
}
