//! SVG drawing for the bar and line charts.

use chrono::NaiveDate;

use crate::config::{MAX_X_TICK_LABELS, Y_TICK_TARGET};
use crate::models::Series;
use crate::visualization::chart::{ChartSpec, MarkStyle, Theme};


// Plot area margins inside a region
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 64.0;

const BAR_FILL_RATIO: f64 = 0.8;
const POINT_RADIUS: f64 = 3.0;
const MAX_LABEL_CHARS: usize = 12;
const MAX_Y_TICKS: usize = 50;


/// One drawn datum: a bar, or a point marker on the line.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub label: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}


/// A chart drawn into its region.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub spec: ChartSpec,
    pub marks: Vec<Mark>,
    pub svg: String,
}


impl RenderedChart {
    pub fn mark_count(&self) -> usize {
        self.marks.len()
    }

    #[allow(dead_code)]
    pub fn values(&self) -> Vec<f64> {
        self.marks.iter().map(|m| m.value).collect()
    }
}


/// Vertical value axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct YScale {
    min: f64,
    max: f64,
    step: f64,
}


impl YScale {
    /// Axis that always includes zero, rounded out to whole ticks.
    ///
    /// Any pair of finite values gives a finite axis. When rounding out to
    /// whole ticks would overflow, the axis ends exactly at the data.
    fn for_series(series: &Series) -> Self {
        let (lo, hi) = series.value_range().unwrap_or((0.0, 0.0));
        let lo = lo.min(0.0);
        let hi = hi.max(0.0);

        if hi - lo <= 0.0 {
            return YScale { min: 0.0, max: 1.0, step: 0.2 };
        }

        let target = Y_TICK_TARGET as f64;
        let span = hi - lo;
        let raw = if span.is_finite() { span / target } else { hi / target - lo / target };

        let step = nice_step(raw);
        let min = (lo / step).floor() * step;
        let max = (hi / step).ceil() * step;

        if step > 0.0 && step.is_finite() && min.is_finite() && max.is_finite() {
            YScale { min, max, step }
        } else {
            YScale { min: lo, max: hi, step: raw }
        }
    }

    fn ticks(&self) -> Vec<f64> {
        let count = (self.max / self.step - self.min / self.step).round();
        if !count.is_finite() || count < 1.0 {
            return vec![self.min, self.max];
        }

        let count = (count as usize).min(MAX_Y_TICKS);
        (0..=count).map(|i| self.min + i as f64 * self.step).collect()
    }

    /// Position of `value` along the axis, 0.0 at `min` and 1.0 at `max`.
    fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.is_finite() {
            (value - self.min) / span
        } else {
            // Halved terms stay finite for any pair of finite values
            (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        }
    }
}


/// Round a raw step up to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}


/// Geometry of the plot area for one chart.
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    scale: YScale,
}


impl Frame {
    fn new(spec: &ChartSpec, scale: YScale) -> Self {
        Frame {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (spec.width as f64 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (spec.height as f64 - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
            scale,
        }
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn y_for(&self, value: f64) -> f64 {
        self.bottom() - self.scale.fraction(value) * self.height
    }

    fn band(&self, count: usize) -> f64 {
        self.width / count.max(1) as f64
    }

    fn band_center(&self, index: usize, count: usize) -> f64 {
        self.left + self.band(count) * (index as f64 + 0.5)
    }
}


/// Draw a series according to its chart spec.
pub fn render_chart(spec: &ChartSpec, series: &Series, theme: Theme) -> RenderedChart {
    let frame = Frame::new(spec, YScale::for_series(series));

    let mut parts = svg_preamble(spec, theme);
    parts.extend(draw_axes(spec, series, &frame));

    let marks = match spec.mark {
        MarkStyle::Bar => draw_bars(spec, series, &frame, &mut parts),
        MarkStyle::Line { width } => draw_line(spec, series, &frame, width, &mut parts),
    };

    if series.is_empty() {
        parts.push(format!(
            r#"<text x="{:.2}" y="{:.2}" class="empty-note" text-anchor="middle">No data</text>"#,
            frame.left + frame.width / 2.0,
            frame.top + frame.height / 2.0,
        ));
    }

    parts.push("</svg>".to_string());

    RenderedChart {
        spec: spec.clone(),
        marks,
        svg: parts.join("\n"),
    }
}


fn svg_preamble(spec: &ChartSpec, theme: Theme) -> Vec<String> {
    vec![
        format!(
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" data-series="{kind}">"#,
            w = spec.width,
            h = spec.height,
            kind = spec.kind,
        ),
        "<style>".to_string(),
        format!("  .title {{ fill: {}; font: bold 18px sans-serif; }}", theme.text()),
        format!("  .axis-title {{ fill: {}; font: 13px sans-serif; }}", theme.text()),
        format!("  .tick {{ fill: {}; font: 11px sans-serif; }}", theme.text()),
        format!("  .empty-note {{ fill: {}; font: italic 13px sans-serif; }}", theme.text()),
        format!("  .grid {{ stroke: {}; stroke-width: 1; }}", theme.grid()),
        format!("  .axis {{ stroke: {}; stroke-width: 1; }}", theme.text()),
        "</style>".to_string(),
        format!(
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            spec.width, spec.height, theme.background()
        ),
        format!(
            r#"<text x="{:.2}" y="28" class="title" text-anchor="middle">{}</text>"#,
            spec.width as f64 / 2.0,
            escape_xml(spec.title)
        ),
    ]
}


fn draw_axes(spec: &ChartSpec, series: &Series, frame: &Frame) -> Vec<String> {
    let mut parts = Vec::new();
    let right = frame.left + frame.width;

    // Grid and value ticks
    for tick in frame.scale.ticks() {
        let y = frame.y_for(tick);
        parts.push(format!(
            r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" class="grid"/>"#,
            frame.left, right,
        ));
        parts.push(format!(
            r#"<text x="{:.2}" y="{:.2}" class="tick" text-anchor="end">{}</text>"#,
            frame.left - 8.0,
            y + 4.0,
            format_value(tick)
        ));
    }

    // Axis lines: value axis on the left, baseline at zero
    let zero_y = frame.y_for(0.0);
    parts.push(format!(
        r#"<line x1="{l:.2}" y1="{:.2}" x2="{l:.2}" y2="{:.2}" class="axis"/>"#,
        frame.top,
        frame.bottom(),
        l = frame.left,
    ));
    parts.push(format!(
        r#"<line x1="{:.2}" y1="{zero_y:.2}" x2="{:.2}" y2="{zero_y:.2}" class="axis"/>"#,
        frame.left, right,
    ));

    // Category ticks, thinned out for long series
    let count = series.len();
    let every = count.div_ceil(MAX_X_TICK_LABELS).max(1);
    for (index, label) in series.labels().iter().enumerate().step_by(every) {
        parts.push(format!(
            r#"<text x="{:.2}" y="{:.2}" class="tick" text-anchor="middle">{}</text>"#,
            frame.band_center(index, count),
            frame.bottom() + 18.0,
            escape_xml(&short_label(label))
        ));
    }

    // Axis titles
    parts.push(format!(
        r#"<text x="{:.2}" y="{:.2}" class="axis-title" text-anchor="middle">{}</text>"#,
        frame.left + frame.width / 2.0,
        spec.height as f64 - 16.0,
        escape_xml(spec.x_label)
    ));
    let mid_y = frame.top + frame.height / 2.0;
    parts.push(format!(
        r#"<text x="18" y="{mid_y:.2}" class="axis-title" text-anchor="middle" transform="rotate(-90 18 {mid_y:.2})">{}</text>"#,
        escape_xml(spec.y_label)
    ));

    parts
}


fn draw_bars(spec: &ChartSpec, series: &Series, frame: &Frame, parts: &mut Vec<String>) -> Vec<Mark> {
    let count = series.len();
    let band = frame.band(count);
    let bar_width = band * BAR_FILL_RATIO;
    let zero_y = frame.y_for(0.0);

    series
        .points()
        .enumerate()
        .map(|(index, (label, value))| {
            let top = frame.y_for(value);
            let mark = Mark {
                label: label.to_string(),
                value,
                x: frame.left + band * index as f64 + (band - bar_width) / 2.0,
                y: top.min(zero_y),
                width: bar_width,
                height: (zero_y - top).abs(),
            };

            parts.push(format!(
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" class="bar"><title>{}</title></rect>"#,
                mark.x,
                mark.y,
                mark.width,
                mark.height,
                spec.color,
                tooltip(label, value)
            ));
            mark
        })
        .collect()
}


fn draw_line(
    spec: &ChartSpec,
    series: &Series,
    frame: &Frame,
    line_width: f64,
    parts: &mut Vec<String>,
) -> Vec<Mark> {
    let count = series.len();
    let marks: Vec<Mark> = series
        .points()
        .enumerate()
        .map(|(index, (label, value))| Mark {
            label: label.to_string(),
            value,
            x: frame.band_center(index, count),
            y: frame.y_for(value),
            width: POINT_RADIUS * 2.0,
            height: POINT_RADIUS * 2.0,
        })
        .collect();

    if marks.is_empty() {
        return marks;
    }

    let points: Vec<String> = marks.iter().map(|m| format!("{:.2},{:.2}", m.x, m.y)).collect();
    parts.push(format!(
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round" class="line"/>"#,
        points.join(" "),
        spec.color,
        line_width
    ));

    for mark in &marks {
        parts.push(format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}" class="point"><title>{}</title></circle>"#,
            mark.x,
            mark.y,
            POINT_RADIUS,
            spec.color,
            tooltip(&mark.label, mark.value)
        ));
    }

    marks
}


fn tooltip(label: &str, value: f64) -> String {
    escape_xml(&format!("{}: {}", label, format_value(value)))
}


/// Shorten ISO date labels to `Jan 02`; other labels are truncated.
pub fn short_label(label: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
        return date.format("%b %d").to_string();
    }

    if label.chars().count() > MAX_LABEL_CHARS {
        let mut short: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        short.push('…');
        short
    } else {
        label.to_string()
    }
}


/// Format a value for ticks and tooltips.
pub fn format_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e15 {
        format!("{:.2e}", value)
    } else if abs >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.2}", value);
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}


/// Escape text for SVG/HTML content and attributes.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
