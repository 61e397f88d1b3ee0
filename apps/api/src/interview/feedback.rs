//! Per-pair answer scoring, plus the batch feedback processor that applies it
//! to a caller-supplied interview record instead of a live session.
//!
//! One evaluation call scores one (question, answer) pair independently of the
//! rest of the interview, so re-running a pair is always safe. A pair whose
//! structured output cannot be parsed is degraded to an error annotation; an
//! unreachable backend fails the whole batch, since no pair can be scored
//! without it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::grades::{aggregate_grades, OverallGrade};
use crate::interview::prompts::{FEEDBACK_TEMPLATE, HOLISTIC_FEEDBACK_TEMPLATE};
use crate::llm_client::structured::parse_structured;
use crate::llm_client::{ChatBackend, ChatMessage, LlmError, SamplingConfig};

// ────────────────────────────────────────────────────────────────────────────
// Evaluation shape
// ────────────────────────────────────────────────────────────────────────────

/// Structured evaluation of one answered question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub suggestions: Vec<String>,
    /// Letter grade, optionally with a +/- modifier.
    pub grade: String,
}

/// JSON schema sent as the `format` constraint on evaluation calls.
pub fn evaluation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "strengths": { "type": "array", "items": { "type": "string" } },
            "areas_for_improvement": { "type": "array", "items": { "type": "string" } },
            "suggestions": { "type": "array", "items": { "type": "string" } },
            "grade": { "type": "string" }
        },
        "required": ["strengths", "areas_for_improvement", "suggestions", "grade"]
    })
}

/// Scores one (question, answer) pair with a schema-constrained model call.
pub async fn evaluate_answer(
    llm: &dyn ChatBackend,
    sampling: &SamplingConfig,
    question: &str,
    answer: &str,
) -> Result<Evaluation, LlmError> {
    let prompt = FEEDBACK_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer);

    let raw = llm
        .chat(
            &[ChatMessage::system(prompt)],
            sampling,
            Some(&evaluation_schema()),
        )
        .await?;

    parse_structured(&raw)
}

/// One free-text call summarizing the whole transcript into narrative
/// feedback addressed to the candidate.
pub async fn holistic_feedback(
    llm: &dyn ChatBackend,
    sampling: &SamplingConfig,
    transcript: &str,
) -> Result<String, LlmError> {
    let prompt = HOLISTIC_FEEDBACK_TEMPLATE.replace("{transcript}", transcript);
    llm.chat(&[ChatMessage::system(prompt)], sampling, None).await
}

// ────────────────────────────────────────────────────────────────────────────
// Batch record shape
// ────────────────────────────────────────────────────────────────────────────

/// Aggregate numbers reported alongside the narrative feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// 0–1 performance number from the grade codec's fixed table.
    pub average_score: f64,
    pub overall_rating: String,
}

impl From<OverallGrade> for PerformanceMetrics {
    fn from(overall: OverallGrade) -> Self {
        Self {
            average_score: overall.score,
            overall_rating: overall.rating,
        }
    }
}

/// One answer in a caller-supplied record. `question_id` indexes into the
/// record's question list; `question` is an optional inline copy that takes
/// precedence when present. Evaluation and error are written back in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<PerformanceMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_feedback: Option<String>,
}

/// A pre-existing interview transcript submitted for grading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub questions: Vec<String>,
    pub answers: Vec<AnswerRecord>,
    #[serde(default)]
    pub analysis: RecordAnalysis,
}

// ────────────────────────────────────────────────────────────────────────────
// Batch processing
// ────────────────────────────────────────────────────────────────────────────

/// Runs the per-pair scoring and aggregation over every answer in the record,
/// writing evaluations back into the answer entries and the aggregate into
/// the record's analysis block.
///
/// Tolerated without failing the batch: an answer whose `question_id` is out
/// of range (skipped), and an answer whose evaluation comes back unparseable
/// (annotated with an error). An empty answer list returns the record
/// unchanged apart from an empty analysis.
pub async fn process_record(
    llm: &dyn ChatBackend,
    sampling: &SamplingConfig,
    mut record: InterviewRecord,
) -> Result<InterviewRecord, AppError> {
    if record.answers.is_empty() {
        record.analysis = RecordAnalysis::default();
        return Ok(record);
    }

    let mut transcript = String::new();

    for idx in 0..record.answers.len() {
        let question = match resolve_question(&record, idx) {
            Some(q) => q,
            None => {
                warn!(
                    "Answer {idx} references question_id {} out of range ({} questions), skipping",
                    record.answers[idx].question_id,
                    record.questions.len()
                );
                continue;
            }
        };
        let answer_text = record.answers[idx].answer.clone();

        match evaluate_answer(llm, sampling, &question, &answer_text).await {
            Ok(evaluation) => {
                record.answers[idx].evaluation = Some(evaluation);
                record.answers[idx].error = None;
            }
            Err(LlmError::Malformed(msg)) => {
                warn!("Evaluation for answer {idx} was unparseable: {msg}");
                record.answers[idx].evaluation = None;
                record.answers[idx].error = Some(
                    "Failed to generate structured feedback. The model did not return valid JSON."
                        .to_string(),
                );
            }
            Err(other) => return Err(other.into()),
        }

        transcript.push_str(&format!("interviewer: {question}\ncandidate: {answer_text}\n"));
    }

    let overall = aggregate_grades(
        record
            .answers
            .iter()
            .filter_map(|a| a.evaluation.as_ref().map(|e| e.grade.as_str())),
    )
    .unwrap_or_else(OverallGrade::not_ratable);

    let narrative = holistic_feedback(llm, sampling, &transcript)
        .await
        .map_err(AppError::from)?;

    info!(
        "Batch feedback: {} answers, overall {} ({})",
        record.answers.len(),
        overall.grade,
        overall.rating
    );

    record.analysis = RecordAnalysis {
        performance_metrics: Some(overall.into()),
        overall_feedback: Some(narrative),
    };

    Ok(record)
}

/// The answer's own question copy wins; otherwise fall back to the question
/// list. Out of range → `None`.
fn resolve_question(record: &InterviewRecord, idx: usize) -> Option<String> {
    let answer = &record.answers[idx];
    answer
        .question
        .clone()
        .or_else(|| record.questions.get(answer.question_id).cloned())
}
