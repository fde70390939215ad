//! Response collection: turns filled-in sheet rows into one immutable
//! submission snapshot, validated against the catalog.
//!
//! This is the stand-in for the interactive form. It guarantees what the
//! aggregator assumes: exactly one response per catalog question, every
//! response naming a known area, responses kept in catalog order.

pub mod sheet;

use crate::catalog::Catalog;
use crate::{Answer, AuditError, AuditHeader, Response};
use tracing::debug;

/// One row as read from a response sheet, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    /// 1-indexed data row (header excluded) for error messages
    pub row: usize,
    pub area: String,
    pub question: String,
    pub answer: String,
    pub observation: String,
}

/// A validated submission: header plus one response per catalog question
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub header: AuditHeader,
    responses: Vec<Response>,
}

impl Submission {
    /// Validate sheet rows against the catalog and order them by catalog position
    pub fn from_rows(
        catalog: &Catalog,
        header: AuditHeader,
        rows: Vec<SheetRow>,
    ) -> Result<Self, AuditError> {
        let mut slots: Vec<Option<Response>> = vec![None; catalog.len()];

        for row in rows {
            let Some(index) = catalog.position(&row.area, &row.question) else {
                return Err(AuditError::UnknownQuestion {
                    row: row.row,
                    area: row.area,
                    prompt: row.question,
                });
            };
            let Some(answer) = Answer::parse(&row.answer) else {
                return Err(AuditError::InvalidAnswer {
                    row: row.row,
                    value: row.answer,
                });
            };
            let question = &catalog.questions()[index];
            if slots[index].is_some() {
                return Err(AuditError::DuplicateResponse {
                    row: row.row,
                    area: question.area.clone(),
                    prompt: question.prompt.clone(),
                });
            }
            slots[index] =
                Some(Response::new(question, answer).with_observation(row.observation.trim()));
        }

        let missing: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect();
        if let Some(&first) = missing.first() {
            let question = &catalog.questions()[first];
            return Err(AuditError::MissingResponses {
                count: missing.len(),
                area: question.area.clone(),
                prompt: question.prompt.clone(),
            });
        }

        let responses: Vec<Response> = slots.into_iter().flatten().collect();
        debug!(responses = responses.len(), "submission assembled");
        Ok(Self { header, responses })
    }

    /// Build a submission directly from responses (programmatic use).
    /// No catalog check is done here.
    pub fn from_responses(header: AuditHeader, responses: Vec<Response>) -> Self {
        Self { header, responses }
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_areas(
            "test",
            vec![
                ("A".to_string(), vec!["a1".to_string(), "a2".to_string()]),
                ("B".to_string(), vec!["b1".to_string()]),
            ],
        )
        .unwrap()
    }

    fn row(n: usize, area: &str, question: &str, answer: &str) -> SheetRow {
        SheetRow {
            row: n,
            area: area.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            observation: String::new(),
        }
    }

    #[test]
    fn test_rows_reordered_to_catalog_order() {
        let rows = vec![
            row(1, "B", "b1", "no"),
            row(2, "A", "a2", "na"),
            row(3, "A", "a1", "yes"),
        ];
        let sub = Submission::from_rows(&catalog(), AuditHeader::default(), rows).unwrap();
        let order: Vec<(&str, Answer)> = sub
            .responses()
            .iter()
            .map(|r| (r.prompt.as_str(), r.answer))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a1", Answer::Yes),
                ("a2", Answer::NotApplicable),
                ("b1", Answer::No)
            ]
        );
    }

    #[test]
    fn test_observation_is_trimmed_and_kept() {
        let mut r = row(1, "B", "b1", "NO");
        r.observation = "  cables exposed ".to_string();
        let rows = vec![row(2, "A", "a1", "SI"), row(3, "A", "a2", "NO"), r];
        let sub = Submission::from_rows(&catalog(), AuditHeader::default(), rows).unwrap();
        assert_eq!(sub.responses()[2].observation, "cables exposed");
    }

    #[test]
    fn test_unknown_question_rejected_with_row() {
        let rows = vec![row(4, "C", "c1", "yes")];
        let err = Submission::from_rows(&catalog(), AuditHeader::default(), rows).unwrap_err();
        match err {
            AuditError::UnknownQuestion { row, area, .. } => {
                assert_eq!(row, 4);
                assert_eq!(area, "C");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_response_rejected() {
        let rows = vec![
            row(1, "A", "a1", "yes"),
            row(2, "A", "a1", "no"),
        ];
        let err = Submission::from_rows(&catalog(), AuditHeader::default(), rows).unwrap_err();
        assert!(matches!(err, AuditError::DuplicateResponse { row: 2, .. }));
    }

    #[test]
    fn test_missing_responses_counted() {
        let rows = vec![row(1, "A", "a1", "yes")];
        let err = Submission::from_rows(&catalog(), AuditHeader::default(), rows).unwrap_err();
        match err {
            AuditError::MissingResponses { count, prompt, .. } => {
                assert_eq!(count, 2);
                assert_eq!(prompt, "a2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_answer_rejected() {
        let rows = vec![row(1, "A", "a1", " ")];
        let err = Submission::from_rows(&catalog(), AuditHeader::default(), rows).unwrap_err();
        assert!(matches!(err, AuditError::InvalidAnswer { row: 1, .. }));
    }
}
