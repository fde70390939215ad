//! Console reporter with colored output

use crate::analyzer::scoring::{format_ratio, FinalRow};
use crate::{AuditReport, Tier};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to list every raw response
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print the full report
    pub fn report(&self, report: &AuditReport) {
        print!("{}", self.render(report));
    }

    /// Report in quiet mode (just the overall ratio)
    pub fn report_quiet(&self, report: &AuditReport) {
        println!("{}", self.render_quiet(report));
    }

    pub fn render_quiet(&self, report: &AuditReport) -> String {
        let total = &report.final_table.total;
        format!(
            "{}: {}% ({})",
            report.title,
            format_ratio(total.ratio),
            self.colorize_tier(total.tier, &total.tier.to_string())
        )
    }

    /// Render the full report as text
    pub fn render(&self, report: &AuditReport) -> String {
        let mut out = String::new();
        self.render_header(report, &mut out);
        if self.verbose {
            self.render_responses(report, &mut out);
        }
        self.render_chart(report, &mut out);
        self.render_final_table(report, &mut out);
        self.render_narrative(report, &mut out);
        out.push('\n');
        out
    }

    fn render_header(&self, report: &AuditReport, out: &mut String) {
        out.push('\n');
        out.push_str(&format!("{}\n", self.bold(&format!("📋 {}", report.title))));
        let date = report
            .header
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let auditor = report.header.auditor.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "   Date: {} | Auditor: {} | Responses: {}\n",
            date,
            auditor,
            report.responses.len()
        ));
        out.push_str(&format!(
            "   Thresholds: HIGH >= {}% | MEDIUM >= {}%\n\n",
            format_ratio(report.thresholds.high),
            format_ratio(report.thresholds.mid)
        ));
    }

    fn render_responses(&self, report: &AuditReport, out: &mut String) {
        out.push_str(&format!("   {}\n", self.bold("Responses:")));
        let mut current: Option<&str> = None;
        for r in &report.responses {
            if current != Some(r.area.as_str()) {
                out.push_str(&format!("   {}\n", self.bold(&r.area)));
                current = Some(r.area.as_str());
            }
            let answer = format!("{:<3}", r.answer.to_string());
            out.push_str(&format!("     [{}] {}\n", answer, r.prompt));
            if !r.observation.is_empty() {
                let note = format!("→ {}", r.observation);
                out.push_str(&format!("           {}\n", self.dim(&note)));
            }
        }
        out.push('\n');
    }

    fn render_chart(&self, report: &AuditReport, out: &mut String) {
        out.push_str(&format!("   {}\n", self.bold(&report.line_chart.title)));
        let width = label_width(report.line_chart.points.iter().map(|p| p.label.as_str()));
        for point in &report.line_chart.points {
            let tier = report.thresholds.classify(point.value);
            let bar = self.create_bar(point.value, tier);
            out.push_str(&format!(
                "   {:<width$} {} {:>6.2}%\n",
                point.label,
                bar,
                point.value,
                width = width
            ));
        }
        if let Some(notice) = report.radar_chart.notice() {
            let label = if self.use_colors {
                "Info".blue().to_string()
            } else {
                "Info".to_string()
            };
            out.push_str(&format!("   {}: {}\n", label, notice));
        }
        out.push('\n');
    }

    fn render_final_table(&self, report: &AuditReport, out: &mut String) {
        let table = &report.final_table;
        let width = label_width(table.all_rows().map(|r| r.area.as_str()));
        out.push_str(&format!("   {}\n", self.bold("Final Table:")));
        let header = format!(
            "{:<width$} {:>8} {:>5} {:>5} {:>5} {:>8}  {}",
            "Area",
            "Reviewed",
            "YES",
            "NO",
            "NA",
            "%",
            "Tier",
            width = width
        );
        out.push_str(&format!("   {}\n", self.bold(&header)));
        for row in &table.rows {
            out.push_str(&format!("   {}\n", self.format_row(row, width, false)));
        }
        out.push_str(&format!("   {}\n", "─".repeat(header.chars().count())));
        out.push_str(&format!("   {}\n\n", self.format_row(&table.total, width, true)));
    }

    fn format_row(&self, row: &FinalRow, width: usize, total: bool) -> String {
        let cells = format!(
            "{:<width$} {:>8} {:>5} {:>5} {:>5} {:>8}",
            row.area,
            row.reviewed,
            row.yes,
            row.no,
            row.not_applicable,
            format!("{:.2}%", row.ratio),
            width = width
        );
        let cells = if total { self.bold(&cells) } else { cells };
        format!("{}  {}", cells, self.colorize_tier(row.tier, &row.tier.to_string()))
    }

    fn render_narrative(&self, report: &AuditReport, out: &mut String) {
        let n = &report.narrative;
        out.push_str(&format!("   {}\n", self.bold("Summary:")));
        out.push_str(&format!("   Total items reviewed: {}\n", n.total_reviewed));
        let tier = report.final_table.total.tier;
        let average = format!("{}%", format_ratio(n.average_ratio));
        out.push_str(&format!(
            "   Average compliance:   {} ({})\n",
            self.colorize_tier(tier, &average),
            self.dim(tier.description())
        ));
        out.push_str(&format!("   Best area(s):         {}\n", n.best_areas_text));
        let critical = if n.critical_areas.is_empty() {
            n.critical_areas_text.clone()
        } else {
            self.colorize_tier(Tier::Low, &n.critical_areas_text)
        };
        out.push_str(&format!("   Critical areas:       {}\n", critical));
    }

    fn colorize_tier(&self, tier: Tier, s: &str) -> String {
        if !self.use_colors {
            return s.to_string();
        }
        match tier {
            Tier::High => s.green().bold().to_string(),
            Tier::Medium => s.yellow().bold().to_string(),
            Tier::Low => s.red().bold().to_string(),
        }
    }

    fn create_bar(&self, ratio: f64, tier: Tier) -> String {
        let filled = ((ratio.clamp(0.0, 100.0) / 100.0) * 20.0).round() as usize;
        let bar = format!("[{}{}]", "█".repeat(filled), "░".repeat(20 - filled));
        self.colorize_tier(tier, &bar)
    }

    fn bold(&self, s: &str) -> String {
        if self.use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.use_colors {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0).max(4)
}
