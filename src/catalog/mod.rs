//! Question catalog: the fixed, ordered list of (area, prompt) pairs
//!
//! The catalog is data. A deployment either uses the built-in 5S catalog or
//! points `catalog` in .auditrc.json at its own JSON file.

use crate::{AuditError, Question};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("builtin.json");

/// On-disk catalog layout: questions grouped under their area
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    name: Option<String>,
    areas: Vec<AreaEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AreaEntry {
    name: String,
    questions: Vec<String>,
}

/// Validated question catalog, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    name: String,
    questions: Vec<Question>,
}

impl Catalog {
    /// The built-in 5S workplace catalog
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_CATALOG).expect("embedded catalog is valid")
    }

    /// Load a catalog JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid catalog: {}", path.display()))
    }

    /// Parse and validate catalog JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content).context("Invalid catalog JSON")?;
        let name = file.name.clone().unwrap_or_else(|| "Checklist Audit".to_string());
        let entries = file
            .areas
            .into_iter()
            .map(|a| (a.name, a.questions))
            .collect::<Vec<_>>();
        Ok(Self::from_areas(name, entries)?)
    }

    /// Build a catalog from (area, questions) groups
    pub fn from_areas(
        name: impl Into<String>,
        areas: Vec<(String, Vec<String>)>,
    ) -> Result<Self, AuditError> {
        if areas.is_empty() {
            return Err(AuditError::EmptyCatalog);
        }

        let mut seen_areas = HashSet::new();
        let mut questions = Vec::new();
        for (index, (area, prompts)) in areas.into_iter().enumerate() {
            let area = area.trim().to_string();
            if area.is_empty() {
                return Err(AuditError::EmptyAreaName { index });
            }
            if !seen_areas.insert(area.clone()) {
                return Err(AuditError::DuplicateArea { area });
            }
            if prompts.iter().all(|p| p.trim().is_empty()) {
                return Err(AuditError::EmptyArea { area });
            }

            let mut seen_prompts = HashSet::new();
            for prompt in prompts {
                let prompt = prompt.trim().to_string();
                if prompt.is_empty() {
                    continue;
                }
                if !seen_prompts.insert(prompt.clone()) {
                    return Err(AuditError::DuplicateQuestion { area, prompt });
                }
                questions.push(Question {
                    area: area.clone(),
                    prompt,
                });
            }
        }

        Ok(Self {
            name: name.into(),
            questions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Distinct area names, in first-appearance order
    pub fn areas(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for q in &self.questions {
            if !out.contains(&q.area.as_str()) {
                out.push(&q.area);
            }
        }
        out
    }

    /// Questions of one area, in catalog order
    pub fn questions_in<'a>(&'a self, area: &'a str) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions.iter().filter(move |q| q.area == area)
    }

    /// Catalog index of a question, matching trimmed area and prompt exactly
    pub fn position(&self, area: &str, prompt: &str) -> Option<usize> {
        let (area, prompt) = (area.trim(), prompt.trim());
        self.questions
            .iter()
            .position(|q| q.area == area && q.prompt == prompt)
    }
}
