//! Relevance scoring of records against a search query.

use super::config::{FieldRule, SearchConfig, TextRule};
use crate::domain::record::display_value;
use crate::domain::Record;
use serde_json::Value;
use std::cmp::Ordering;
use std::ops::AddAssign;

/// Relevance of one record for one query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Score {
    /// Weighted relevance; higher is better.
    pub score: f64,
    /// Number of counted query matches across all scored fields.
    pub occurrences: u32,
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        self.score += rhs.score;
        self.occurrences += rhs.occurrences;
    }
}

/// Scores a record against a query.
///
/// Fields are visited in config order. Text fields count the non-overlapping,
/// case-sensitive matches of `query` in the field's display text; nested
/// objects and arrays recurse and are weighted by their multiplier. Fields
/// missing from the record are skipped.
///
/// An empty query scores every record as `Score { score: 0.0, occurrences: 0 }`.
///
/// # Examples
///
/// ```
/// use classdesk::search::{score, SearchConfig};
/// use serde_json::json;
///
/// let config = SearchConfig::new()
///     .text("name")
///     .subs("group", SearchConfig::new().text("title"), 2.0);
/// let student = json!({ "name": "Anna Petrova", "group": { "title": "Anna's group" } });
///
/// let result = score(&student, &config, "Anna");
/// assert_eq!(result.occurrences, 2);
/// assert_eq!(result.score, 3.0);
/// ```
#[must_use]
pub fn score(record: &Record, config: &SearchConfig, query: &str) -> Score {
    let mut total = Score::default();
    if query.is_empty() {
        return total;
    }

    for (field, rule) in config.fields() {
        let Some(value) = record.get(field) else {
            continue;
        };

        match rule {
            FieldRule::Text(rule) => score_text(&mut total, value, rule, query),
            FieldRule::Subs { config, multiplier } => {
                let sub = score(value, config, query);
                total.score += sub.score * multiplier;
                total.occurrences += sub.occurrences;
            }
            FieldRule::Array { for_all, multiplier } => {
                let Some(items) = value.as_array() else {
                    continue;
                };
                let mut sub = Score::default();
                for item in items {
                    if item.is_object() {
                        sub += score(item, for_all, query);
                    } else {
                        score_text(&mut sub, item, &TextRule::default(), query);
                    }
                }
                total.score += sub.score * multiplier;
                total.occurrences += sub.occurrences;
            }
        }
    }

    total
}

/// Applies a text rule to the running score.
///
/// Matches are capped at `stop_at_cases` first. Below `min_cases` the field
/// still counts its matches but leaves the score untouched; otherwise
/// `per_case_add` is added once per match and the running score is then
/// multiplied by `per_case_multiple` once per match. Objects have no display
/// text and never match.
fn score_text(running: &mut Score, value: &Value, rule: &TextRule, query: &str) {
    if value.is_object() {
        return;
    }
    let haystack = display_value(value);
    let found = u32::try_from(haystack.matches(query).count()).unwrap_or(u32::MAX);
    let counted = rule.stop_at_cases.map_or(found, |stop| found.min(stop));

    running.occurrences += counted;
    if counted == 0 || counted < rule.min_cases {
        return;
    }

    running.score += rule.per_case_add * f64::from(counted);
    running.score *= rule.per_case_multiple.powi(i32::try_from(counted).unwrap_or(i32::MAX));
}

/// Orders records by relevance for a query.
///
/// Keeps records with at least one match, highest score first; ties keep
/// their input order. An empty query returns every record in input order.
///
/// # Examples
///
/// ```
/// use classdesk::search::{rank, SearchConfig};
/// use serde_json::json;
///
/// let records = vec![
///     json!({ "name": "Boris" }),
///     json!({ "name": "Anna Annenkova" }),
///     json!({ "name": "Anna" }),
/// ];
/// let config = SearchConfig::new().text("name");
///
/// let ranked: Vec<_> = rank(&records, &config, "Ann").into_iter().map(|r| &r["name"]).collect();
/// assert_eq!(ranked, ["Anna Annenkova", "Anna"]);
/// ```
#[must_use]
pub fn rank<'a>(records: &'a [Record], config: &SearchConfig, query: &str) -> Vec<&'a Record> {
    let _span = tracing::debug_span!("rank", records = records.len(), query_len = query.len()).entered();

    if query.is_empty() {
        return records.iter().collect();
    }

    let mut scored: Vec<(Score, &Record)> = records
        .iter()
        .map(|record| (score(record, config, query), record))
        .filter(|(s, _)| s.occurrences > 0)
        .collect();

    scored.sort_by(|(a, _), (b, _)| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    tracing::debug!(matched = scored.len(), "records ranked");
    scored.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rule(min: u32, stop: Option<u32>, add: f64, multiple: f64) -> FieldRule {
        FieldRule::Text(TextRule {
            min_cases: min,
            stop_at_cases: stop,
            per_case_add: add,
            per_case_multiple: multiple,
        })
    }

    #[test]
    fn empty_query_is_well_defined() {
        let record = json!({ "name": "Anna" });
        let config = SearchConfig::infer(&record);
        assert_eq!(score(&record, &config, ""), Score::default());
    }

    #[test]
    fn text_rule_ignores_object_values() {
        let record = json!({ "group": { "title": "5A" } });
        let config = SearchConfig::new().text("group");
        assert_eq!(score(&record, &config, "title"), Score::default());
    }

    #[test]
    fn counts_matches_not_split_pieces() {
        let record = json!({ "name": "abcabc" });
        let config = SearchConfig::new().text("name");
        assert_eq!(score(&record, &config, "abc").occurrences, 2);
        assert_eq!(score(&record, &config, "zzz").occurrences, 0);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let record = json!({ "name": "Anna" });
        let config = SearchConfig::new().text("name");
        assert_eq!(score(&record, &config, "anna").occurrences, 0);
    }

    #[test]
    fn below_min_cases_counts_but_does_not_score() {
        let record = json!({ "notes": "late late" });
        let config = SearchConfig::new().field("notes", rule(3, None, 1.0, 1.0));
        assert_eq!(score(&record, &config, "late"), Score { score: 0.0, occurrences: 2 });
    }

    #[test]
    fn stop_at_caps_before_add_and_multiple() {
        let record = json!({ "a": "x x x x x", "b": "x" });
        let config = SearchConfig::new()
            .field("b", rule(0, None, 1.0, 1.0))
            .field("a", rule(0, Some(2), 3.0, 2.0));
        // b: 1.0; a: (1 + 3 * 2) * 2^2 = 28
        assert_eq!(score(&record, &config, "x"), Score { score: 28.0, occurrences: 3 });
    }

    #[test]
    fn arrays_sum_elements_then_multiply() {
        let record = json!({
            "parents": [{ "name": "Olga Ivanova" }, { "name": "Ivan Ivanov" }],
            "tags": ["Ivanov", "debt"],
        });
        let config = SearchConfig::new()
            .array("parents", SearchConfig::new().text("name"), 0.5)
            .array("tags", SearchConfig::new(), 1.0);

        assert_eq!(score(&record, &config, "Ivan"), Score { score: 2.5, occurrences: 4 });
    }

    #[test]
    fn rank_is_stable_for_ties() {
        let records = vec![
            json!({ "id": 1, "name": "Anna" }),
            json!({ "id": 2, "name": "Boris" }),
            json!({ "id": 3, "name": "Anna" }),
        ];
        let config = SearchConfig::new().text("name");
        let ids: Vec<_> = rank(&records, &config, "Anna").iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(3)]);
    }
}
