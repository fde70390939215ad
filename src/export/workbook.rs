//! Multi-sheet XLSX workbook: raw responses, per-area summary, final
//! colored table, and narrative summary

use crate::config::SheetNamesConfig;
use crate::{AuditReport, Tier};
use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;

/// Resolved worksheet names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetNames {
    pub responses: String,
    pub area_summary: String,
    pub final_table: String,
    pub narrative: String,
}

impl SheetNames {
    /// Configured names, falling back to the defaults per sheet
    pub fn from_config(config: &SheetNamesConfig) -> Self {
        let defaults = Self::default();
        Self {
            responses: config.responses.clone().unwrap_or(defaults.responses),
            area_summary: config.area_summary.clone().unwrap_or(defaults.area_summary),
            final_table: config.final_table.clone().unwrap_or(defaults.final_table),
            narrative: config.narrative.clone().unwrap_or(defaults.narrative),
        }
    }
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            responses: "Responses".to_string(),
            area_summary: "Area_Summary".to_string(),
            final_table: "Final_Summary".to_string(),
            narrative: "General_Summary".to_string(),
        }
    }
}

struct Styles {
    header: Format,
    total: Format,
    total_pct: Format,
    pct: Format,
}

impl Styles {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(0x001B4D))
                .set_border(FormatBorder::Thin),
            total: Format::new().set_bold().set_border_top(FormatBorder::Medium),
            total_pct: Format::new()
                .set_bold()
                .set_num_format("0.00")
                .set_border_top(FormatBorder::Medium),
            pct: Format::new().set_num_format("0.00"),
        }
    }

    fn tier(tier: Tier, bold: bool) -> Format {
        let format = Format::new()
            .set_num_format("0.00")
            .set_align(FormatAlign::Center)
            .set_background_color(Color::RGB(tier.fill_rgb()));
        if bold {
            format.set_bold()
        } else {
            format
        }
    }
}

/// Build the workbook in memory
pub fn build_workbook(report: &AuditReport, names: &SheetNames) -> Result<Workbook> {
    let styles = Styles::new();
    let mut workbook = Workbook::new();

    let sheet = named_sheet(&mut workbook, &names.responses)?;
    write_responses(sheet, report, &styles)?;

    let sheet = named_sheet(&mut workbook, &names.area_summary)?;
    write_area_summary(sheet, report, &styles)?;

    let sheet = named_sheet(&mut workbook, &names.final_table)?;
    write_final_table(sheet, report, &styles)?;

    let sheet = named_sheet(&mut workbook, &names.narrative)?;
    write_narrative(sheet, report, &styles)?;

    Ok(workbook)
}

/// Build and save the workbook to `path`
pub fn save_workbook(report: &AuditReport, names: &SheetNames, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(report, names)?;
    workbook
        .save(path)
        .with_context(|| format!("Failed to write workbook: {}", path.display()))
}

/// Build the workbook and return the XLSX bytes
pub fn workbook_to_buffer(report: &AuditReport, names: &SheetNames) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(report, names)?;
    Ok(workbook.save_to_buffer()?)
}

fn named_sheet<'a>(workbook: &'a mut Workbook, name: &str) -> Result<&'a mut Worksheet> {
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(name)
        .with_context(|| format!("Invalid worksheet name: '{}'", name))?;
    Ok(sheet)
}

fn write_header(sheet: &mut Worksheet, columns: &[&str], styles: &Styles) -> Result<()> {
    for (col, title) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &styles.header)?;
    }
    Ok(())
}

fn write_responses(sheet: &mut Worksheet, report: &AuditReport, styles: &Styles) -> Result<()> {
    write_header(sheet, &["Area", "Question", "Answer", "Observation"], styles)?;
    for (i, r) in report.responses.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &r.area)?;
        sheet.write_string(row, 1, &r.prompt)?;
        sheet.write_string(row, 2, r.answer.to_string())?;
        sheet.write_string(row, 3, &r.observation)?;
    }
    sheet.set_column_width(0, 20)?;
    sheet.set_column_width(1, 70)?;
    sheet.set_column_width(2, 10)?;
    sheet.set_column_width(3, 40)?;
    Ok(())
}

fn write_area_summary(sheet: &mut Worksheet, report: &AuditReport, styles: &Styles) -> Result<()> {
    write_header(sheet, &["Area", "NA", "NO", "YES", "%"], styles)?;
    let table = &report.area_table;
    for (i, r) in table.rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &r.area)?;
        sheet.write_number(row, 1, r.not_applicable as f64)?;
        sheet.write_number(row, 2, r.no as f64)?;
        sheet.write_number(row, 3, r.yes as f64)?;
        sheet.write_number_with_format(row, 4, r.ratio, &styles.pct)?;
    }
    let row = table.rows.len() as u32 + 1;
    let t = &table.total;
    sheet.write_string_with_format(row, 0, &t.area, &styles.total)?;
    sheet.write_number_with_format(row, 1, t.not_applicable as f64, &styles.total)?;
    sheet.write_number_with_format(row, 2, t.no as f64, &styles.total)?;
    sheet.write_number_with_format(row, 3, t.yes as f64, &styles.total)?;
    sheet.write_number_with_format(row, 4, t.ratio, &styles.total_pct)?;
    sheet.set_column_width(0, 24)?;
    Ok(())
}

fn write_final_table(sheet: &mut Worksheet, report: &AuditReport, styles: &Styles) -> Result<()> {
    write_header(
        sheet,
        &["Area", "Items Reviewed", "YES", "NO", "NA", "%", "Tier"],
        styles,
    )?;
    let table = &report.final_table;
    let last = table.rows.len();
    for (i, r) in table.all_rows().enumerate() {
        let row = i as u32 + 1;
        let is_total = i == last;
        let plain = if is_total {
            styles.total.clone()
        } else {
            Format::new()
        };
        let tier = Styles::tier(r.tier, is_total);
        sheet.write_string_with_format(row, 0, &r.area, &plain)?;
        sheet.write_number_with_format(row, 1, r.reviewed as f64, &plain)?;
        sheet.write_number_with_format(row, 2, r.yes as f64, &plain)?;
        sheet.write_number_with_format(row, 3, r.no as f64, &plain)?;
        sheet.write_number_with_format(row, 4, r.not_applicable as f64, &plain)?;
        sheet.write_number_with_format(row, 5, r.ratio, &tier)?;
        sheet.write_string_with_format(row, 6, r.tier.to_string(), &tier)?;
    }
    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 15)?;
    Ok(())
}

fn write_narrative(sheet: &mut Worksheet, report: &AuditReport, styles: &Styles) -> Result<()> {
    write_header(
        sheet,
        &[
            "Total Items Reviewed",
            "Average Compliance (%)",
            "Best Area(s)",
            "Critical Area(s)",
        ],
        styles,
    )?;
    let n = &report.narrative;
    sheet.write_number(1, 0, n.total_reviewed as f64)?;
    sheet.write_number_with_format(1, 1, n.average_ratio, &styles.pct)?;
    sheet.write_string(1, 2, &n.best_areas_text)?;
    sheet.write_string(1, 3, &n.critical_areas_text)?;
    for col in 0..4 {
        sheet.set_column_width(col, 28)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AuditEngine;
    use crate::form::Submission;
    use crate::{Answer, AuditHeader, Response};
    use std::io::{Cursor, Read};
    use tempfile::TempDir;

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    fn sheet_order(workbook_xml: &str, names: &[&str]) -> Vec<usize> {
        names
            .iter()
            .map(|n| {
                workbook_xml
                    .find(&format!(r#"<sheet name="{}""#, n))
                    .unwrap_or_else(|| panic!("sheet {n} missing"))
            })
            .collect()
    }

    fn make_report() -> AuditReport {
        let responses = [("AISLE", Answer::Yes), ("AISLE", Answer::No), ("SEWING", Answer::Yes)]
            .iter()
            .enumerate()
            .map(|(i, (area, answer))| Response {
                area: area.to_string(),
                prompt: format!("q{i}"),
                answer: *answer,
                observation: String::new(),
            })
            .collect();
        AuditEngine::new().run(&Submission::from_responses(AuditHeader::default(), responses))
    }

    #[test]
    fn test_workbook_buffer_is_xlsx() {
        let bytes = workbook_to_buffer(&make_report(), &SheetNames::default()).unwrap();
        // XLSX is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_workbook_has_four_named_sheets_in_order() {
        let bytes = workbook_to_buffer(&make_report(), &SheetNames::default()).unwrap();
        let xml = part(&bytes, "xl/workbook.xml");
        let positions = sheet_order(
            &xml,
            &["Responses", "Area_Summary", "Final_Summary", "General_Summary"],
        );
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(xml.matches("<sheet ").count(), 4);
    }

    #[test]
    fn test_configured_sheet_name_reaches_file() {
        let config = SheetNamesConfig {
            final_table: Some("Resumen Final".to_string()),
            ..SheetNamesConfig::default()
        };
        let names = SheetNames::from_config(&config);
        let bytes = workbook_to_buffer(&make_report(), &names).unwrap();
        let xml = part(&bytes, "xl/workbook.xml");
        assert!(xml.contains(r#"<sheet name="Resumen Final""#));
        assert!(!xml.contains(r#"<sheet name="Final_Summary""#));
    }

    #[test]
    fn test_workbook_has_total_row_and_tier_fills() {
        // AISLE 50% (LOW), SEWING 100% (HIGH), TOTAL 66.67% (MEDIUM)
        let bytes = workbook_to_buffer(&make_report(), &SheetNames::default()).unwrap();
        let strings = part(&bytes, "xl/sharedStrings.xml");
        assert!(strings.contains(">TOTAL<"));
        assert!(strings.contains(">MEDIUM<"));
        let styles = part(&bytes, "xl/styles.xml");
        for fill in ["6EFC47", "FFF200", "EA2828"] {
            assert!(styles.contains(fill), "missing fill {fill}");
        }
    }

    #[test]
    fn test_save_workbook_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.xlsx");
        save_workbook(&make_report(), &SheetNames::default(), &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_invalid_sheet_name_is_rejected() {
        let names = SheetNames {
            responses: "Bad[name]".to_string(),
            ..SheetNames::default()
        };
        let err = workbook_to_buffer(&make_report(), &names).unwrap_err();
        assert!(err.to_string().contains("Invalid worksheet name"));
    }

    #[test]
    fn test_sheet_names_from_config() {
        let config = SheetNamesConfig {
            responses: Some("Respuestas".to_string()),
            ..SheetNamesConfig::default()
        };
        let names = SheetNames::from_config(&config);
        assert_eq!(names.responses, "Respuestas");
        assert_eq!(names.final_table, "Final_Summary");
    }
}
