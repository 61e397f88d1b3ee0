//! Grade codec: the single letter/numeric mapping used by every grading path.
//!
//! Per-pair evaluations carry a letter grade (optionally with a +/- modifier).
//! Aggregation converts letters to a 4.0 scale, averages, and converts the
//! mean back to a letter with modifier via fixed breakpoints. A separate fixed
//! table maps the overall letter to a 0–1 performance number for reporting.

use serde::Serialize;

/// Canonical letter → numeric scale. A +/- modifier is stripped before the
/// lookup, so "B+" and "B-" both score 3.0. Unrecognized grades return `None`
/// and are excluded from the mean.
pub fn grade_to_score(grade: &str) -> Option<f64> {
    let base = grade.trim().trim_end_matches(['+', '-']);
    match base {
        "A" => Some(4.0),
        "B" => Some(3.0),
        "C" => Some(2.0),
        "D" => Some(1.0),
        "F" => Some(0.0),
        _ => None,
    }
}

/// Converts a numeric mean back to a letter grade with +/- modifier.
/// Breakpoints are inclusive lower bounds, checked in descending order.
pub fn score_to_grade(mean: f64) -> &'static str {
    if mean >= 3.85 {
        "A"
    } else if mean >= 3.5 {
        "A-"
    } else if mean >= 3.15 {
        "B+"
    } else if mean >= 2.85 {
        "B"
    } else if mean >= 2.5 {
        "B-"
    } else if mean >= 2.15 {
        "C+"
    } else if mean >= 1.85 {
        "C"
    } else if mean >= 1.5 {
        "C-"
    } else if mean >= 1.15 {
        "D+"
    } else if mean >= 0.85 {
        "D"
    } else if mean >= 0.5 {
        "D-"
    } else {
        "F"
    }
}

/// Verbal rating for a letter grade, keyed on the base letter only.
pub fn rating_label(grade: &str) -> &'static str {
    match grade.chars().next() {
        Some('A') => "Excellent",
        Some('B') => "Above Average",
        Some('C') => "Average",
        Some('D') => "Below Average",
        Some('F') => "Poor",
        _ => "Not Rated",
    }
}

/// Fixed 0–1 performance number for an overall letter grade.
/// Within each letter band, + scores highest and - lowest; F and anything
/// unrecognized score 0.0. Monotonic in grade order.
pub fn performance_value(grade: &str) -> f64 {
    let (plain, plus, minus) = match grade.chars().next() {
        Some('A') => (0.87, 0.90, 0.85),
        Some('B') => (0.77, 0.80, 0.75),
        Some('C') => (0.67, 0.70, 0.65),
        Some('D') => (0.57, 0.60, 0.55),
        _ => return 0.0,
    };
    if grade.ends_with('+') {
        plus
    } else if grade.ends_with('-') {
        minus
    } else {
        plain
    }
}

/// Aggregate result of averaging a batch of per-pair letter grades.
#[derive(Debug, Clone, Serialize)]
pub struct OverallGrade {
    pub grade: String,
    pub rating: String,
    /// 0–1 performance number from the fixed per-letter table.
    pub score: f64,
}

impl OverallGrade {
    /// Placeholder used when no pair produced a parseable grade.
    pub fn not_ratable() -> Self {
        Self {
            grade: "N/A".to_string(),
            rating: "Not Rated".to_string(),
            score: 0.0,
        }
    }
}

/// Averages the parseable grades and converts the mean back through the
/// breakpoints. Unparseable grades are skipped; if none remain the result is
/// `None` ("not ratable") rather than an error.
pub fn aggregate_grades<'a, I>(grades: I) -> Option<OverallGrade>
where
    I: IntoIterator<Item = &'a str>,
{
    let scores: Vec<f64> = grades.into_iter().filter_map(grade_to_score).collect();
    if scores.is_empty() {
        return None;
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let grade = score_to_grade(mean);

    Some(OverallGrade {
        grade: grade.to_string(),
        rating: rating_label(grade).to_string(),
        score: performance_value(grade),
    })
}
