use std::cmp::Ordering;
use std::collections::HashMap;

use crate::table::ScoreRow;

/// One student's aggregated scores, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    /// Subject to score, in first-appearance order. A repeated subject
    /// keeps its first position but takes the last value.
    pub subject_scores: Vec<(String, f64)>,
    /// Sum over every input row of the group, including rows whose
    /// subject was later overwritten in the mapping.
    pub total_score: f64,
    pub average_score: f64,
}

/// Groups validated rows by `(StudentID, Name)` and computes each group's
/// subject mapping, total, and average.
///
/// Output is ordered by ascending `(StudentID, Name)`; IDs that both parse
/// as integers compare numerically. An empty input yields an empty output.
pub fn student_records(rows: &[ScoreRow]) -> Vec<StudentRecord> {
    let mut keys: Vec<(String, String)> = Vec::new();
    let mut groups: HashMap<(String, String), Vec<&ScoreRow>> = HashMap::new();

    for row in rows {
        let key = (row.student_id.clone(), row.name.clone());
        let group = groups.entry(key.clone()).or_default();
        if group.is_empty() {
            keys.push(key);
        }
        group.push(row);
    }

    keys.sort_by(|a, b| compare_ids(&a.0, &b.0).then_with(|| a.1.cmp(&b.1)));

    keys.into_iter()
        .map(|key| {
            let group = &groups[&key];
            let (student_id, name) = key;

            let mut subject_scores: Vec<(String, f64)> = Vec::new();
            let mut total = 0.0;
            for row in group {
                total += row.score;
                match subject_scores.iter_mut().find(|(s, _)| *s == row.subject) {
                    Some(entry) => entry.1 = row.score,
                    None => subject_scores.push((row.subject.clone(), row.score)),
                }
            }

            StudentRecord {
                student_id,
                name,
                subject_scores,
                total_score: total,
                average_score: total / group.len() as f64,
            }
        })
        .collect()
}

/// Natural order for student IDs: numeric when both sides are integers,
/// lexicographic otherwise, with all-numeric IDs sorting first.
fn compare_ids(a: &str, b: &str) -> Ordering {
    fn key(id: &str) -> (u8, i64, &str) {
        match id.trim().parse::<i64>() {
            Ok(n) => (0, n, id),
            Err(_) => (1, 0, id),
        }
    }
    key(a).cmp(&key(b))
}
