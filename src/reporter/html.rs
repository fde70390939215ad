//! HTML reporter: generates a self-contained audit report page
//!
//! Tables are rendered server-side with tier-colored cells, charts are
//! inlined as SVG, and the full report is embedded as JSON for reuse.

use crate::analyzer::scoring::{format_ratio, FinalRow};
use crate::chart::svg::{escape_xml, render};
use crate::{AuditReport, Tier};

/// Prevents a `</script>` sequence inside embedded JSON from closing the block
fn escape_json_for_script(s: &str) -> String {
    s.replace("</script>", "<\\/script>")
}

/// Reporter that generates a self-contained HTML page
pub struct HtmlReporter;

impl HtmlReporter {
    pub fn new() -> Self {
        Self
    }

    /// Generate the full HTML report
    pub fn report(&self, report: &AuditReport) -> String {
        let data_json = serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string());

        let mut html = String::with_capacity(32_768);
        html.push_str(&Self::template_head(&report.title));
        html.push_str("<script>const REPORT=");
        html.push_str(&escape_json_for_script(&data_json));
        html.push_str(";</script>\n");
        html.push_str("<main>\n");
        self.push_header(report, &mut html);
        self.push_charts(report, &mut html);
        self.push_final_table(report, &mut html);
        self.push_narrative(report, &mut html);
        self.push_responses(report, &mut html);
        html.push_str("</main>\n</body>\n</html>");
        html
    }

    fn push_header(&self, report: &AuditReport, html: &mut String) {
        html.push_str("<header><h1>");
        html.push_str(&escape_xml(&report.title));
        html.push_str("</h1><p class=\"meta\">");
        if let Some(date) = report.header.date {
            html.push_str(&format!("Date: {} · ", date.format("%Y-%m-%d")));
        }
        if let Some(ref auditor) = report.header.auditor {
            html.push_str(&format!("Auditor: {} · ", escape_xml(auditor)));
        }
        html.push_str(&format!(
            "Generated {}</p></header>\n",
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));
    }

    fn push_charts(&self, report: &AuditReport, html: &mut String) {
        html.push_str("<section class=\"charts\">\n");
        html.push_str(&render(&report.line_chart));
        html.push('\n');
        match report.radar_chart.spec() {
            Some(spec) => html.push_str(&render(spec)),
            None => {
                if let Some(notice) = report.radar_chart.notice() {
                    html.push_str("<p class=\"notice\">");
                    html.push_str(&escape_xml(&notice));
                    html.push_str("</p>");
                }
            }
        }
        html.push_str("\n</section>\n");
    }

    fn push_final_table(&self, report: &AuditReport, html: &mut String) {
        html.push_str("<section><h2>Final Table</h2>\n<table class=\"final\">\n");
        html.push_str(
            "<thead><tr><th>Area</th><th>Reviewed</th><th>YES</th><th>NO</th><th>NA</th><th>Compliance</th><th>Tier</th></tr></thead>\n<tbody>\n",
        );
        for row in &report.final_table.rows {
            Self::push_row(row, false, html);
        }
        Self::push_row(&report.final_table.total, true, html);
        html.push_str("</tbody>\n</table>\n");
        html.push_str("<ul class=\"legend\">");
        for (from, to, tier) in report.thresholds.bands() {
            html.push_str(&format!(
                "<li><span class=\"swatch\" style=\"background:{}\"></span>{} {}%-{}%: {}</li>",
                tier.fill_hex(),
                tier,
                format_ratio(from),
                format_ratio(to),
                tier.description()
            ));
        }
        html.push_str("</ul>\n</section>\n");
    }

    fn push_row(row: &FinalRow, total: bool, html: &mut String) {
        let class = if total { " class=\"total\"" } else { "" };
        html.push_str(&format!(
            "<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>{}{}</tr>\n",
            class,
            escape_xml(&row.area),
            row.reviewed,
            row.yes,
            row.no,
            row.not_applicable,
            tier_cell(row.tier, &format!("{:.2}%", row.ratio)),
            tier_cell(row.tier, &row.tier.to_string()),
        ));
    }

    fn push_narrative(&self, report: &AuditReport, html: &mut String) {
        let n = &report.narrative;
        html.push_str("<section><h2>Summary</h2>\n<dl class=\"narrative\">");
        html.push_str(&format!(
            "<dt>Total items reviewed</dt><dd>{}</dd>",
            n.total_reviewed
        ));
        html.push_str(&format!(
            "<dt>Average compliance</dt><dd>{}%</dd>",
            format_ratio(n.average_ratio)
        ));
        html.push_str(&format!(
            "<dt>Best area(s)</dt><dd>{}</dd>",
            escape_xml(&n.best_areas_text)
        ));
        html.push_str(&format!(
            "<dt>Critical areas</dt><dd>{}</dd>",
            escape_xml(&n.critical_areas_text)
        ));
        html.push_str("</dl>\n</section>\n");
    }

    fn push_responses(&self, report: &AuditReport, html: &mut String) {
        html.push_str("<section><h2>Responses</h2>\n<table class=\"responses\">\n");
        html.push_str(
            "<thead><tr><th>Area</th><th>Question</th><th>Answer</th><th>Observation</th></tr></thead>\n<tbody>\n",
        );
        for r in &report.responses {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td class=\"answer answer-{}\">{}</td><td>{}</td></tr>\n",
                escape_xml(&r.area),
                escape_xml(&r.prompt),
                r.answer.to_string().to_lowercase(),
                r.answer,
                escape_xml(&r.observation)
            ));
        }
        html.push_str("</tbody>\n</table>\n</section>\n");
    }

    // ─── HTML template pieces ────────────────────────────────────────────

    fn template_head(title: &str) -> String {
        let mut head = String::from(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>"##,
        );
        head.push_str(&escape_xml(title));
        head.push_str(
            r##"</title>
<style>
:root{--bg:#ffffff;--surface:#f4f6fa;--border:#d5dae3;--text:#001b4d;--muted:#5b6478;--radius:8px}
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Oxygen,sans-serif;background:var(--bg);color:var(--text);line-height:1.5}
main{max-width:1100px;margin:0 auto;padding:1.5rem}
header{padding-bottom:1rem;border-bottom:1px solid var(--border);margin-bottom:1.25rem}
header h1{font-size:1.5rem;font-weight:700}
header .meta{font-size:.8125rem;color:var(--muted)}
section{margin-bottom:2rem}
h2{font-size:1.125rem;margin-bottom:.75rem}

/* ── Charts ── */
.charts{display:flex;flex-wrap:wrap;gap:1.5rem;align-items:flex-start}
.chart{background:var(--surface);border:1px solid var(--border);border-radius:var(--radius);max-width:100%;height:auto}
.notice{background:#e8f0fe;border:1px solid #b6cdf7;border-radius:var(--radius);padding:.75rem 1rem;font-size:.875rem}

/* ── Tables ── */
table{border-collapse:collapse;width:100%;font-size:.875rem}
th,td{border:1px solid var(--border);padding:.4rem .6rem;text-align:left}
th{background:var(--text);color:#fff;font-weight:600}
table.final td:not(:first-child){text-align:center;font-variant-numeric:tabular-nums}
tr.total td{font-weight:700;border-top:2px solid var(--text)}
td.tier{font-weight:700}
.answer{font-weight:600;text-align:center}
.answer-no{color:#b42318}
.answer-na{color:var(--muted)}
.legend{list-style:none;display:flex;gap:1.25rem;flex-wrap:wrap;margin-top:.75rem;font-size:.8125rem}
.swatch{display:inline-block;width:12px;height:12px;border-radius:2px;margin-right:.375rem;vertical-align:middle}

/* ── Narrative ── */
.narrative{display:grid;grid-template-columns:max-content 1fr;gap:.375rem 1.25rem}
.narrative dt{font-weight:600}
</style>
</head>
<body>
"##,
        );
        head
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn tier_cell(tier: Tier, text: &str) -> String {
    // Dark text on the light fills, white on red
    let color = match tier {
        Tier::Low => "#ffffff",
        Tier::High | Tier::Medium => "#000000",
    };
    format!(
        "<td class=\"tier tier-{}\" style=\"background:{};color:{}\">{}</td>",
        tier.to_string().to_lowercase(),
        tier.fill_hex(),
        color,
        escape_xml(text)
    )
}
