//! Inline SVG rendering for chart specs (embedded by the HTML reporter)

use super::{ChartKind, ChartSpec};
use std::f64::consts::PI;

const LINE_WIDTH: f64 = 640.0;
const LINE_HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 56.0;

const RADAR_SIZE: f64 = 360.0;
const RADAR_RADIUS: f64 = 120.0;

const INK: &str = "#001B4D";

/// Escape text for SVG/HTML element content and attribute values
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a chart spec as an inline SVG element
pub fn render(spec: &ChartSpec) -> String {
    match spec.kind {
        ChartKind::Line => render_line(spec),
        ChartKind::Radar => render_radar(spec),
    }
}

fn svg_open(class: &str, w: f64, h: f64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart {class}" viewBox="0 0 {w} {h}" "#
    ) + &format!(r#"width="{w}" height="{h}" role="img">"#)
}

fn title(x: f64, text: &str) -> String {
    format!(
        r#"<text x="{x}" y="20" text-anchor="middle" font-size="14" font-weight="bold" fill="{INK}">{}</text>"#,
        escape_xml(text)
    )
}

/// Line chart: tier bands behind a polyline of area ratios
fn render_line(spec: &ChartSpec) -> String {
    let plot_w = LINE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = LINE_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let span = (spec.y_max - spec.y_min).max(f64::EPSILON);
    let y_of = |v: f64| {
        let scaled = (v.clamp(spec.y_min, spec.y_max) - spec.y_min) / span;
        MARGIN_TOP + plot_h * (1.0 - scaled)
    };
    let n = spec.points.len();
    let x_of = |i: usize| {
        if n <= 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * (i as f64) / ((n - 1) as f64)
        }
    };

    let mut svg = String::with_capacity(4096);
    svg.push_str(&svg_open("chart-line", LINE_WIDTH, LINE_HEIGHT));
    svg.push_str(&title(LINE_WIDTH / 2.0, &spec.title));

    for band in &spec.bands {
        let top = y_of(band.to);
        let height = (y_of(band.from) - top).max(0.0);
        svg.push_str(&format!(
            r#"<rect x="{MARGIN_LEFT}" y="{top:.1}" width="{plot_w:.1}" height="{height:.1}" fill="{}" fill-opacity="0.8"/>"#,
            band.tier.fill_hex()
        ));
    }

    let right = MARGIN_LEFT + plot_w;
    for tick in (0..=100).step_by(10) {
        let y = y_of(tick as f64);
        svg.push_str(&format!(
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#000" stroke-opacity="0.25" stroke-dasharray="4 3"/>"##
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="10">{tick}%</text>"#,
            MARGIN_LEFT - 6.0,
            y + 3.0
        ));
    }

    if n > 0 {
        let coords: Vec<String> = spec
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{:.1},{:.1}", x_of(i), y_of(p.value)))
            .collect();
        svg.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{INK}" stroke-width="2"/>"#,
            coords.join(" ")
        ));
    }

    let label_y = LINE_HEIGHT - MARGIN_BOTTOM + 18.0;
    for (i, p) in spec.points.iter().enumerate() {
        let (x, y) = (x_of(i), y_of(p.value));
        svg.push_str(&format!(
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="{INK}"/>"#
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{:.1}" text-anchor="middle" font-size="10" font-weight="bold" fill="{INK}">{:.2}%</text>"#,
            y - 8.0,
            p.value
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{label_y:.1}" text-anchor="middle" font-size="10">{}</text>"#,
            escape_xml(&p.label)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Radar chart: concentric tier rings under the area polygon
fn render_radar(spec: &ChartSpec) -> String {
    let c = RADAR_SIZE / 2.0;
    let span = (spec.y_max - spec.y_min).max(f64::EPSILON);
    let r_of = |v: f64| RADAR_RADIUS * (v.clamp(spec.y_min, spec.y_max) - spec.y_min) / span;
    let n = spec.points.len().max(1);
    let angle = |i: usize| -PI / 2.0 + 2.0 * PI * (i as f64) / (n as f64);

    let mut svg = String::with_capacity(4096);
    svg.push_str(&svg_open("chart-radar", RADAR_SIZE, RADAR_SIZE));
    svg.push_str(&title(c, &spec.title));

    // Outermost band first so inner rings paint over it
    let mut bands = spec.bands.clone();
    bands.sort_by(|a, b| b.to.total_cmp(&a.to));
    for band in &bands {
        svg.push_str(&format!(
            r#"<circle cx="{c}" cy="{c}" r="{:.1}" fill="{}" fill-opacity="0.7"/>"#,
            r_of(band.to),
            band.tier.fill_hex()
        ));
    }

    for pct in [20.0, 40.0, 60.0, 80.0, 100.0] {
        svg.push_str(&format!(
            r##"<circle cx="{c}" cy="{c}" r="{:.1}" fill="none" stroke="#000" stroke-opacity="0.2"/>"##,
            r_of(pct)
        ));
    }

    let coords: Vec<String> = spec
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let r = r_of(p.value);
            format!("{:.1},{:.1}", c + r * angle(i).cos(), c + r * angle(i).sin())
        })
        .collect();
    svg.push_str(&format!(
        r##"<polygon points="{}" fill="#000" fill-opacity="0.2" stroke="#000" stroke-width="1"/>"##,
        coords.join(" ")
    ));

    let label_r = RADAR_RADIUS + 22.0;
    for (i, p) in spec.points.iter().enumerate() {
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="10" font-weight="bold">{} ({:.2}%)</text>"#,
            c + label_r * angle(i).cos(),
            c + label_r * angle(i).sin() + 3.0,
            escape_xml(&p.label),
            p.value
        ));
    }

    svg.push_str("</svg>");
    svg
}
