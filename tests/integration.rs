//! Integration tests: full audit pipeline against test-data/

use checklist_audit::export::{responses_to_csv, workbook_to_buffer, SheetNames};
use checklist_audit::reporter::{HtmlReporter, JsonReporter};
use checklist_audit::{audit_file, Answer, AuditReport, Tier};
use std::fs;
use std::path::Path;

const SHEETS: &str = "test-data/sheets";

fn audit(sheet: &str, config: Option<&Path>) -> AuditReport {
    let path = Path::new(SHEETS).join(sheet);
    audit_file(&path, Path::new(SHEETS), config)
        .unwrap_or_else(|e| panic!("audit_file({}) failed: {:#}", sheet, e))
}

fn config_with(dir: &tempfile::TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("audit.json");
    fs::write(&path, json).unwrap();
    path
}

// --- Aggregation over the built-in catalog ---

#[test]
fn five_s_area_ratios() {
    let r = audit("five_s.csv", None);
    let areas: Vec<&str> = r.areas.keys().map(String::as_str).collect();
    assert_eq!(areas, vec!["AISLE", "SEWING", "WAREHOUSE/QUALITY"]);

    let aisle = &r.areas["AISLE"];
    assert_eq!((aisle.yes, aisle.no, aisle.not_applicable), (7, 2, 2));
    assert_eq!(aisle.reviewed, 9);

    let sewing = &r.areas["SEWING"];
    assert_eq!((sewing.yes, sewing.no, sewing.not_applicable), (2, 3, 1));
    assert_eq!(sewing.ratio, 40.0);

    assert_eq!(r.areas["WAREHOUSE/QUALITY"].ratio, 100.0);
}

#[test]
fn five_s_counts_cover_every_response() {
    let r = audit("five_s.csv", None);
    let counted: usize = r.areas.values().map(|a| a.total()).sum();
    assert_eq!(counted, r.responses.len());
    assert_eq!(counted, 22);
}

#[test]
fn five_s_final_table_and_total() {
    let r = audit("five_s.csv", None);
    let tiers: Vec<Tier> = r.final_table.rows.iter().map(|row| row.tier).collect();
    assert_eq!(tiers, vec![Tier::Medium, Tier::Low, Tier::High]);
    assert_eq!(r.final_table.rows[0].ratio, 77.78);

    let total = &r.final_table.total;
    assert_eq!(total.area, "TOTAL");
    assert_eq!(total.reviewed, 19);
    assert_eq!(total.ratio, 73.68);
    assert_eq!(total.tier, Tier::Medium);
    assert_eq!(r.area_table.total.ratio, 73.68);
}

#[test]
fn five_s_narrative() {
    let r = audit("five_s.csv", None);
    let n = &r.narrative;
    assert_eq!(n.total_reviewed, 19);
    assert_eq!(n.average_ratio, 73.68);
    assert_eq!(n.best_areas_text, "WAREHOUSE/QUALITY (100%)");
    assert_eq!(n.critical_areas, vec!["SEWING"]);
}

#[test]
fn five_s_draws_both_charts() {
    let r = audit("five_s.csv", None);
    assert_eq!(r.line_chart.points.len(), 3);
    let radar = r.radar_chart.spec().expect("three areas draw a radar");
    assert_eq!(radar.points[1].label, "SEWING");
    assert_eq!(radar.points[1].value, 40.0);
}

#[test]
fn csv_and_json_sheets_agree() {
    let from_csv = audit("five_s.csv", None);
    let from_json = audit("five_s.json", None);
    assert_eq!(from_csv.areas, from_json.areas);
    assert_eq!(from_csv.responses, from_json.responses);
    assert_eq!(from_csv.header, from_json.header);
}

#[test]
fn responses_keep_catalog_order_and_observations() {
    let r = audit("five_s.json", None);
    assert_eq!(r.responses[0].area, "WAREHOUSE/QUALITY");
    assert_eq!(r.responses.last().unwrap().area, "SEWING");
    let noted = r
        .responses
        .iter()
        .find(|resp| !resp.observation.is_empty())
        .unwrap();
    assert_eq!(noted.answer, Answer::No);
    assert_eq!(noted.observation, "Cutting table holds leftover rolls");
}

// --- Configuration ---

#[test]
fn alternate_thresholds_reclassify() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = config_with(
        &dir,
        r#"{"thresholds": {"high": 85, "mid": 70}, "totalLabel": "TOTAL EVALUACIÓN", "noneLabel": "Ninguna"}"#,
    );
    let r = audit("five_s.csv", Some(&config));
    assert_eq!(r.final_table.rows[0].tier, Tier::Medium);
    assert_eq!(r.final_table.total.area, "TOTAL EVALUACIÓN");
    assert_eq!(r.final_table.total.tier, Tier::Medium);
    assert_eq!(r.narrative.critical_areas, vec!["SEWING"]);
}

#[test]
fn custom_catalog_from_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let catalog = fs::canonicalize("test-data/catalogs/two_areas.json").unwrap();
    let config = config_with(
        &dir,
        &format!(r#"{{"catalog": {}}}"#, serde_json::to_string(&catalog).unwrap()),
    );
    let r = audit("two_areas.csv", Some(&config));
    assert_eq!(r.title, "Loading Dock Check");
    assert_eq!(r.areas["DOCK"].ratio, 50.0);
    assert_eq!(r.final_table.total.ratio, 66.67);
    assert!(r.radar_chart.is_skipped());
    assert_eq!(r.narrative.critical_areas, vec!["DOCK"]);
}

#[test]
fn sheet_against_wrong_catalog_fails() {
    let path = Path::new(SHEETS).join("two_areas.csv");
    let err = audit_file(&path, Path::new(SHEETS), None).unwrap_err();
    assert!(format!("{:#}", err).contains("question not in catalog"));
}

// --- Rendering and export ---

#[test]
fn renderers_accept_full_report() {
    let r = audit("five_s.csv", None);

    let json = JsonReporter::new().report(&r);
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["title"], "5S Workplace Audit");

    let html = HtmlReporter::new().report(&r);
    assert!(html.contains("WAREHOUSE/QUALITY (100%)"));

    let bytes = workbook_to_buffer(&r, &SheetNames::default()).unwrap();
    assert!(bytes.len() > 1000);

    let csv = responses_to_csv(&r.responses).unwrap();
    assert_eq!(csv.lines().count(), 23);
}
