//! Submission validation against a form's live question set.
//!
//! A submission is a list of `(question_id, text_answer)` pairs. It is legal
//! when every pair targets a question of the form, no question is answered
//! twice, and every required question has a non-blank answer. Optional
//! questions may be skipped or answered with any text.

use std::collections::{BTreeSet, HashSet};

use crate::error::CoreError;
use crate::types::DbId;

/// The slice of a question the validator cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionRule {
    pub id: DbId,
    pub is_required: bool,
}

/// Validate a submission against the form's current questions.
///
/// Checks run in a fixed order so the error a client sees is stable:
/// duplicate answers, then answers for questions outside the form, then
/// missing required answers. Each message lists every offending question id
/// in ascending order.
pub fn validate_submission(
    questions: &[QuestionRule],
    answers: &[(DbId, &str)],
) -> Result<(), CoreError> {
    let known: HashSet<DbId> = questions.iter().map(|q| q.id).collect();

    let mut seen = HashSet::with_capacity(answers.len());
    let mut duplicates = BTreeSet::new();
    let mut foreign = BTreeSet::new();
    for &(question_id, _) in answers {
        if !seen.insert(question_id) {
            duplicates.insert(question_id);
        }
        if !known.contains(&question_id) {
            foreign.insert(question_id);
        }
    }

    if !duplicates.is_empty() {
        return Err(CoreError::Validation(format!(
            "Each question may be answered only once; duplicate answers for questions: {}",
            join_ids(&duplicates)
        )));
    }

    if !foreign.is_empty() {
        return Err(CoreError::Validation(format!(
            "Answers reference questions that do not belong to this form: {}",
            join_ids(&foreign)
        )));
    }

    let missing = missing_required(questions, answers);
    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Missing required answers for questions: {}",
            join_ids(&missing)
        )));
    }

    Ok(())
}

/// Required question ids without a non-blank answer, ascending.
pub fn missing_required(questions: &[QuestionRule], answers: &[(DbId, &str)]) -> BTreeSet<DbId> {
    let answered: HashSet<DbId> = answers
        .iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(id, _)| *id)
        .collect();

    questions
        .iter()
        .filter(|q| q.is_required && !answered.contains(&q.id))
        .map(|q| q.id)
        .collect()
}

fn join_ids(ids: &BTreeSet<DbId>) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn rules() -> Vec<QuestionRule> {
        vec![
            QuestionRule {
                id: 1,
                is_required: true,
            },
            QuestionRule {
                id: 2,
                is_required: false,
            },
        ]
    }

    #[test]
    fn required_only_submission_is_accepted() {
        assert!(validate_submission(&rules(), &[(1, "yes")]).is_ok());
    }

    #[test]
    fn optional_answers_are_accepted_alongside_required() {
        assert!(validate_submission(&rules(), &[(2, "x"), (1, "yes")]).is_ok());
    }

    #[test]
    fn missing_required_is_rejected() {
        let err = validate_submission(&rules(), &[(2, "x")]).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("Missing required") && msg.ends_with(": 1"));
    }

    #[test]
    fn blank_required_answer_counts_as_missing() {
        let result = validate_submission(&rules(), &[(1, "   ")]);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn all_missing_required_ids_are_named() {
        let questions = vec![
            QuestionRule {
                id: 9,
                is_required: true,
            },
            QuestionRule {
                id: 3,
                is_required: true,
            },
        ];
        let err = validate_submission(&questions, &[]).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.ends_with("3, 9"));
    }

    #[test]
    fn foreign_question_is_rejected() {
        let err = validate_submission(&rules(), &[(1, "yes"), (77, "stray")]).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("do not belong") && msg.ends_with("77"));
    }

    #[test]
    fn foreign_is_reported_before_missing() {
        let err = validate_submission(&rules(), &[(77, "stray")]).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("do not belong"));
    }

    #[test]
    fn duplicate_answers_are_rejected() {
        let err = validate_submission(&rules(), &[(1, "a"), (1, "b")]).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("only once"));
    }

    #[test]
    fn form_without_questions_accepts_empty_submission() {
        assert!(validate_submission(&[], &[]).is_ok());
    }

    #[test]
    fn missing_required_ignores_optional_questions() {
        let missing = missing_required(&rules(), &[]);
        assert_eq!(missing.into_iter().collect::<Vec<_>>(), vec![1]);
    }
}
