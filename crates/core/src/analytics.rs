//! Response analytics: per-form submission summaries and per-question answer
//! frequency distributions.
//!
//! Both aggregations have an explicit empty state instead of an error, so a
//! freshly published form reports zeros rather than failing.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Form summary
// ---------------------------------------------------------------------------

/// Number of responses submitted on one UTC calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub count: i64,
}

/// Submission statistics for a single form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseSummary {
    pub total_responses: i64,
    pub response_rate_per_day: Vec<DailyCount>,
    pub first_response_at: Option<Timestamp>,
    pub latest_response_at: Option<Timestamp>,
}

impl ResponseSummary {
    /// The summary of a form nobody has answered yet.
    pub fn empty() -> Self {
        Self {
            total_responses: 0,
            response_rate_per_day: Vec::new(),
            first_response_at: None,
            latest_response_at: None,
        }
    }
}

/// Summarize a form's responses from their `(response_id, submitted_at)` pairs.
///
/// Responses are ordered by submission time with the response id breaking
/// ties, so `first_response_at` and `latest_response_at` are deterministic.
/// Days are UTC calendar dates, ascending, and their counts always sum to
/// `total_responses`.
pub fn summarize_responses(submissions: &[(DbId, Timestamp)]) -> ResponseSummary {
    if submissions.is_empty() {
        return ResponseSummary::empty();
    }

    let mut ordered = submissions.to_vec();
    ordered.sort_by_key(|&(id, submitted_at)| (submitted_at, id));

    let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for (_, submitted_at) in &ordered {
        *per_day.entry(submitted_at.date_naive()).or_default() += 1;
    }

    ResponseSummary {
        total_responses: ordered.len() as i64,
        response_rate_per_day: per_day
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect(),
        first_response_at: ordered.first().map(|&(_, at)| at),
        latest_response_at: ordered.last().map(|&(_, at)| at),
    }
}

// ---------------------------------------------------------------------------
// Question analytics
// ---------------------------------------------------------------------------

/// How many times one exact answer text was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFrequency {
    pub text_answer: String,
    pub count: i64,
}

/// Answer distribution for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionAnalytics {
    pub question_id: DbId,
    pub question_text: String,
    pub total_answers: i64,
    pub common_answers: Vec<AnswerFrequency>,
}

impl QuestionAnalytics {
    /// Build the analytics for a question from its answers in insertion order.
    pub fn from_answers(question_id: DbId, question_text: String, answers: &[String]) -> Self {
        Self {
            question_id,
            question_text,
            total_answers: answers.len() as i64,
            common_answers: answer_frequencies(answers.iter().map(String::as_str)),
        }
    }
}

/// Count identical answer texts, most frequent first.
///
/// Texts are compared exactly (no trimming or case folding). Equal counts keep
/// the order in which each text was first seen in `answers`.
pub fn answer_frequencies<'a, I>(answers: I) -> Vec<AnswerFrequency>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: IndexMap<&str, i64> = IndexMap::new();
    for text in answers {
        *counts.entry(text).or_default() += 1;
    }

    let mut frequencies: Vec<AnswerFrequency> = counts
        .into_iter()
        .map(|(text, count)| AnswerFrequency {
            text_answer: text.to_string(),
            count,
        })
        .collect();
    // Stable sort: ties stay in first-seen order.
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));
    frequencies
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -- summarize_responses --

    #[test]
    fn empty_summary_is_zero_valued() {
        let summary = summarize_responses(&[]);
        assert_eq!(summary, ResponseSummary::empty());
        assert_eq!(summary.total_responses, 0);
        assert!(summary.first_response_at.is_none());
        assert!(summary.latest_response_at.is_none());
    }

    #[test]
    fn groups_by_utc_date_ascending() {
        let submissions = vec![
            (3, at(2024, 1, 2, 9)),
            (1, at(2024, 1, 1, 10)),
            (2, at(2024, 1, 1, 18)),
        ];
        let summary = summarize_responses(&submissions);

        assert_eq!(summary.total_responses, 3);
        assert_eq!(
            summary.response_rate_per_day,
            vec![
                DailyCount {
                    date: date(2024, 1, 1),
                    count: 2
                },
                DailyCount {
                    date: date(2024, 1, 2),
                    count: 1
                },
            ]
        );
        assert_eq!(summary.first_response_at, Some(at(2024, 1, 1, 10)));
        assert_eq!(summary.latest_response_at, Some(at(2024, 1, 2, 9)));
    }

    #[test]
    fn day_counts_sum_to_total() {
        let submissions: Vec<_> = (0..10)
            .map(|i| (i, at(2024, 3, 1 + (i as u32 % 4), 12)))
            .collect();
        let summary = summarize_responses(&submissions);
        let sum: i64 = summary.response_rate_per_day.iter().map(|d| d.count).sum();
        assert_eq!(sum, summary.total_responses);
        assert!(summary.first_response_at <= summary.latest_response_at);
    }

    #[test]
    fn late_evening_utc_stays_on_same_date() {
        let summary = summarize_responses(&[(1, at(2024, 1, 1, 23)), (2, at(2024, 1, 2, 0))]);
        assert_eq!(summary.response_rate_per_day.len(), 2);
    }

    // -- answer_frequencies --

    #[test]
    fn most_common_first() {
        let freqs = answer_frequencies(["no", "yes", "yes", "maybe", "yes", "no"]);
        assert_eq!(freqs[0].text_answer, "yes");
        assert_eq!(freqs[0].count, 3);
        assert_eq!(freqs[1].text_answer, "no");
        assert_eq!(freqs[2].text_answer, "maybe");
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let freqs = answer_frequencies(["b", "a", "a", "b", "c"]);
        let texts: Vec<_> = freqs.iter().map(|f| f.text_answer.as_str()).collect();
        assert_eq!(texts, vec!["b", "a", "c"]);
    }

    #[test]
    fn texts_are_compared_exactly() {
        let freqs = answer_frequencies(["Yes", "yes", "yes "]);
        assert_eq!(freqs.len(), 3);
        assert!(freqs.iter().all(|f| f.count == 1));
    }

    #[test]
    fn question_analytics_without_answers_is_zero_valued() {
        let analytics = QuestionAnalytics::from_answers(7, "Why?".into(), &[]);
        assert_eq!(analytics.total_answers, 0);
        assert!(analytics.common_answers.is_empty());
    }

    #[test]
    fn question_analytics_totals_match_answers() {
        let answers = vec!["yes".to_string(), "no".to_string(), "yes".to_string()];
        let analytics = QuestionAnalytics::from_answers(7, "Why?".into(), &answers);
        assert_eq!(analytics.total_answers, 3);
        let sum: i64 = analytics.common_answers.iter().map(|f| f.count).sum();
        assert_eq!(sum, 3);
    }
}
