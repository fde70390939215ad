//! Response sheets: CSV and JSON files filled in by the auditor
//!
//! CSV layout (header required, observation optional):
//!
//! ```text
//! # date: 2026-03-14
//! # auditor: J. Doe
//! area,question,answer,observation
//! AISLE,Is the aisle kept clear...?,YES,
//! ```

use super::{SheetRow, Submission};
use crate::catalog::Catalog;
use crate::{AuditError, AuditHeader};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sheet file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Json,
}

impl SheetFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Result<Self, AuditError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(SheetFormat::Csv),
            "json" => Ok(SheetFormat::Json),
            _ => Err(AuditError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonSheet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auditor: Option<String>,
    responses: Vec<JsonRow>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonRow {
    area: String,
    #[serde(alias = "prompt")]
    question: String,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    observation: String,
}

/// Read a response sheet from disk and validate it against the catalog
pub fn load_sheet(path: &Path, catalog: &Catalog) -> Result<Submission> {
    let format = SheetFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read response sheet: {}", path.display()))?;
    parse_sheet(&content, format, catalog)
        .with_context(|| format!("Invalid response sheet: {}", path.display()))
}

/// Parse sheet content in the given format
pub fn parse_sheet(content: &str, format: SheetFormat, catalog: &Catalog) -> Result<Submission> {
    // Spreadsheet "CSV UTF-8" exports lead with a byte-order mark
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let (header, rows) = match format {
        SheetFormat::Csv => parse_csv(content)?,
        SheetFormat::Json => parse_json(content)?,
    };
    Ok(Submission::from_rows(catalog, header, rows)?)
}

/// Parse an audit date in YYYY-MM-DD form
pub fn parse_date(raw: &str) -> Result<NaiveDate, AuditError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| AuditError::InvalidDate {
        value: raw.trim().to_string(),
    })
}

fn header_from(date: Option<&str>, auditor: Option<&str>) -> Result<AuditHeader, AuditError> {
    let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => Some(parse_date(d)?),
        None => None,
    };
    let auditor = auditor
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);
    Ok(AuditHeader { date, auditor })
}

fn parse_csv(content: &str) -> Result<(AuditHeader, Vec<SheetRow>)> {
    // "# key: value" lines carry the header; the csv reader skips them as comments
    let mut date = None;
    let mut auditor = None;
    for line in content.lines() {
        let Some(meta) = line.trim_start().strip_prefix('#') else {
            continue;
        };
        if let Some((key, value)) = meta.split_once(':') {
            match key.trim().to_lowercase().as_str() {
                "date" => date = Some(value.trim().to_string()),
                "auditor" => auditor = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }
    let header = header_from(date.as_deref(), auditor.as_deref())?;

    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().context("Missing CSV header row")?.clone();
    let column = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };
    let Some(area_idx) = column(&["area"]) else {
        bail!("Response sheet is missing column 'area'");
    };
    let Some(question_idx) = column(&["question", "prompt"]) else {
        bail!("Response sheet is missing column 'question'");
    };
    let Some(answer_idx) = column(&["answer", "response"]) else {
        bail!("Response sheet is missing column 'answer'");
    };
    let observation_idx = column(&["observation", "observations", "notes"]);

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV at row {}", i + 1))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").to_string();
        rows.push(SheetRow {
            row: i + 1,
            area: cell(area_idx),
            question: cell(question_idx),
            answer: cell(answer_idx),
            observation: observation_idx.map(cell).unwrap_or_default(),
        });
    }
    Ok((header, rows))
}

fn parse_json(content: &str) -> Result<(AuditHeader, Vec<SheetRow>)> {
    let sheet: JsonSheet = serde_json::from_str(content).context("Invalid JSON response sheet")?;
    let header = header_from(sheet.date.as_deref(), sheet.auditor.as_deref())?;
    let rows = sheet
        .responses
        .into_iter()
        .enumerate()
        .map(|(i, r)| SheetRow {
            row: i + 1,
            area: r.area,
            question: r.question,
            answer: r.answer,
            observation: r.observation,
        })
        .collect();
    Ok((header, rows))
}

/// Blank CSV sheet, one row per catalog question, answers left empty
pub fn template_csv(catalog: &Catalog) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["area", "question", "answer", "observation"])?;
    for q in catalog.questions() {
        writer.write_record([q.area.as_str(), q.prompt.as_str(), "", ""])?;
    }
    let data = writer.into_inner()?;
    let mut out = String::from("# date: \n# auditor: \n");
    out.push_str(&String::from_utf8_lossy(&data));
    Ok(out)
}

/// Blank JSON sheet, one entry per catalog question
pub fn template_json(catalog: &Catalog) -> Result<String> {
    let sheet = JsonSheet {
        date: Some(String::new()),
        auditor: Some(String::new()),
        responses: catalog
            .questions()
            .iter()
            .map(|q| JsonRow {
                area: q.area.clone(),
                question: q.prompt.clone(),
                answer: String::new(),
                observation: String::new(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&sheet)?)
}
