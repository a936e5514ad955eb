//! Display-order arithmetic for questions within a form.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Display order given to the first question of a form.
pub const FIRST_DISPLAY_ORDER: i32 = 1;

/// Compute the display order for a newly appended question.
///
/// `last_assigned` is the form's persisted counter and `current_max` the
/// highest order among its existing questions (`None` when it has none).
/// Taking the larger of the two means orders freed by deletions are never
/// handed out again, while orders raised by a reorder are still respected.
///
/// Returns `None` once a reorder has pushed the form to `i32::MAX`.
pub fn next_display_order(last_assigned: i32, current_max: Option<i32>) -> Option<i32> {
    let floor = current_max.unwrap_or(0).max(last_assigned);
    if floor < FIRST_DISPLAY_ORDER {
        Some(FIRST_DISPLAY_ORDER)
    } else {
        floor.checked_add(1)
    }
}

/// Validate a reorder batch before any row is touched.
///
/// Rejects empty batches, non-positive orders, a question listed twice, and
/// two questions sent to the same order.
pub fn validate_reorder(items: &[(DbId, i32)]) -> Result<(), CoreError> {
    if items.is_empty() {
        return Err(CoreError::Validation(
            "Reorder requires at least one question".into(),
        ));
    }

    let mut question_ids = HashSet::with_capacity(items.len());
    let mut orders = HashSet::with_capacity(items.len());
    for &(question_id, display_order) in items {
        if display_order < FIRST_DISPLAY_ORDER {
            return Err(CoreError::Validation(format!(
                "display_order must be a positive integer (question {question_id} got {display_order})"
            )));
        }
        if !question_ids.insert(question_id) {
            return Err(CoreError::Validation(format!(
                "Question {question_id} appears more than once in the reorder batch"
            )));
        }
        if !orders.insert(display_order) {
            return Err(CoreError::Validation(format!(
                "display_order {display_order} is assigned to more than one question"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn first_question_gets_one() {
        assert_eq!(next_display_order(0, None), Some(1));
    }

    #[test]
    fn next_is_max_plus_one() {
        assert_eq!(next_display_order(3, Some(3)), Some(4));
    }

    #[test]
    fn deleted_orders_are_not_reused() {
        // Questions 1..=3 existed, the third was deleted.
        assert_eq!(next_display_order(3, Some(2)), Some(4));
        // Every question was deleted.
        assert_eq!(next_display_order(3, None), Some(4));
    }

    #[test]
    fn reordered_max_above_counter_wins() {
        assert_eq!(next_display_order(2, Some(10)), Some(11));
    }

    #[test]
    fn exhausted_orders_yield_none() {
        assert_eq!(next_display_order(i32::MAX, Some(i32::MAX)), None);
        assert_eq!(next_display_order(5, Some(i32::MAX)), None);
        assert_eq!(next_display_order(i32::MAX - 1, None), Some(i32::MAX));
    }

    #[test]
    fn valid_batch_passes() {
        assert!(validate_reorder(&[(10, 2), (11, 1)]).is_ok());
    }

    #[test]
    fn empty_batch_rejected() {
        assert_matches!(validate_reorder(&[]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn zero_order_rejected() {
        assert_matches!(validate_reorder(&[(10, 0)]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn repeated_question_rejected() {
        let result = validate_reorder(&[(10, 1), (10, 2)]);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("more than once"));
    }

    #[test]
    fn colliding_orders_rejected() {
        let result = validate_reorder(&[(10, 1), (11, 1)]);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("more than one question"));
    }
}
