//! Interview session: the stateful core of the engine.
//!
//! A session owns the persona, the generated question bank, the turn cursor,
//! the alternation flag, and the chronological message history. Turn state is
//! mutated only after a model call succeeds, so a failed call leaves the
//! session exactly as it was (no partial toggle, no dangling history entry).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::interview::feedback::{
    evaluate_answer, holistic_feedback, Evaluation, PerformanceMetrics,
};
use crate::interview::grades::{aggregate_grades, OverallGrade};
use crate::interview::personas;
use crate::interview::prompts::{
    question_template, CLOSER_TEMPLATE, FOLLOW_UP_TEMPLATE, INTRODUCTION_TEMPLATE,
    WRAP_UP_TEMPLATE,
};
use crate::llm_client::structured::parse_structured;
use crate::llm_client::{ChatBackend, ChatMessage, LlmError, SamplingConfig};

// ────────────────────────────────────────────────────────────────────────────
// History
// ────────────────────────────────────────────────────────────────────────────

/// One turn in the session history. The tagged shape (rather than a raw
/// role string) is what lets feedback pairing match on (interviewer,
/// candidate) adjacency instead of arithmetic on indices.
#[derive(Debug, Clone)]
pub enum TurnMessage {
    Interviewer { content: String, at: DateTime<Utc> },
    Candidate { content: String, at: DateTime<Utc> },
}

impl TurnMessage {
    fn interviewer(content: impl Into<String>) -> Self {
        Self::Interviewer {
            content: content.into(),
            at: Utc::now(),
        }
    }

    fn candidate(content: impl Into<String>) -> Self {
        Self::Candidate {
            content: content.into(),
            at: Utc::now(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Interviewer { content, .. } | Self::Candidate { content, .. } => content,
        }
    }

    /// Projection onto the chat wire format: the interviewer speaks as the
    /// assistant, the candidate as the user.
    fn as_chat(&self) -> ChatMessage {
        match self {
            Self::Interviewer { .. } => ChatMessage::assistant(self.content()),
            Self::Candidate { .. } => ChatMessage::user(self.content()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Feedback output shapes
// ────────────────────────────────────────────────────────────────────────────

/// Evaluation of one answered question from the live session.
#[derive(Debug, Clone, Serialize)]
pub struct PairFeedback {
    pub question: String,
    pub answer: String,
    /// Offset of the question turn in the session history.
    pub question_id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Optional job metadata decorating the feedback output. Populated only when
/// the job description submitted at session start was a structured job record.
#[derive(Debug, Clone, Deserialize)]
pub struct JobRecord {
    pub role: Option<String>,
    pub company: Option<String>,
    pub job_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionMetadata {
    pub interviewer: String,
    pub interview_type: String,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub role: &'static str,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub performance_metrics: PerformanceMetrics,
    pub overall_feedback: String,
}

/// End-of-session graded feedback bundle.
#[derive(Debug, Clone, Serialize)]
pub struct SessionFeedback {
    pub answers: Vec<PairFeedback>,
    pub questions: Vec<String>,
    pub metadata: SessionMetadata,
    pub analysis: Analysis,
    pub full_transcript: Vec<TranscriptEntry>,
}

/// Result of advancing the question cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum NextQuestion {
    Question {
        text: String,
        /// 1-based ordinal of the question just asked.
        number: usize,
        total: usize,
    },
    /// The bank is exhausted; request the closer, not another question.
    Finished,
}

#[derive(Debug, Deserialize)]
struct QuestionBank {
    questions: Vec<String>,
}

/// JSON schema sent as the `format` constraint on question-bank generation.
fn questions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "questions": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["questions"]
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct InterviewSession {
    persona_name: String,
    /// Persona biography decorated with the job description and resume; sent
    /// as the leading system message on every model call.
    persona: String,
    mode: String,
    job: Option<JobRecord>,
    questions: Vec<String>,
    question_idx: usize,
    history: Vec<TurnMessage>,
    /// True → the next interviewer reply probes deeper; false → it wraps the
    /// topic up. Toggles on every processed response.
    follow_up: bool,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    sampling: SamplingConfig,
}

impl InterviewSession {
    /// Creates a session and synchronously generates its question bank with
    /// one schema-constrained model call. No session exists without a bank:
    /// an unreachable backend or an unparseable bank fails creation.
    pub async fn create(
        llm: &dyn ChatBackend,
        persona_name: &str,
        mode: &str,
        job_description: &str,
        resume: &str,
        keywords: &[String],
    ) -> Result<Self, AppError> {
        let bio = personas::persona_bio(persona_name)
            .ok_or_else(|| AppError::UnknownPersona(persona_name.to_string()))?;
        let template = question_template(mode).ok_or_else(|| {
            AppError::Validation(format!(
                "Unknown interview mode '{mode}' (expected 'technical' or 'behavioral')"
            ))
        })?;

        let persona = format!(
            "{bio}\n# Job Description\n\n{job_description}\n\n# Candidate Resume\n\n{resume}\n"
        );

        // The job description is sometimes a structured job record; when it
        // parses, its fields decorate the feedback metadata.
        let job = serde_json::from_str::<JobRecord>(job_description).ok();

        let prompt = template.replace("{focus_areas}", &keywords.join(", "));
        let sampling = SamplingConfig::default();

        let raw = llm
            .chat(
                &[
                    ChatMessage::system(persona.clone()),
                    ChatMessage::system(prompt),
                ],
                &sampling,
                Some(&questions_schema()),
            )
            .await?;

        let bank: QuestionBank = parse_structured(&raw)?;
        if bank.questions.is_empty() {
            return Err(AppError::MalformedModelOutput(
                "question bank generation returned no questions".to_string(),
            ));
        }

        info!(
            "Session created: persona={persona_name}, mode={mode}, {} questions",
            bank.questions.len()
        );

        Ok(Self {
            persona_name: persona_name.to_string(),
            persona,
            mode: mode.to_string(),
            job,
            questions: bank.questions,
            question_idx: 0,
            history: Vec::new(),
            follow_up: true,
            started_at: Utc::now(),
            ended_at: None,
            sampling,
        })
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// One interviewer utterance opening the session. Appended to history;
    /// leaves the question cursor and alternation flag untouched.
    pub async fn generate_introduction(&mut self, llm: &dyn ChatBackend) -> Result<String, AppError> {
        let prompt = INTRODUCTION_TEMPLATE.replace("{mode}", &self.mode);
        let reply = llm
            .chat(
                &[
                    ChatMessage::system(self.persona.clone()),
                    ChatMessage::user(prompt),
                ],
                &self.sampling,
                None,
            )
            .await?;

        self.history.push(TurnMessage::interviewer(reply.clone()));
        Ok(reply)
    }

    /// Returns the current bank question and advances the cursor, or reports
    /// exhaustion. The end timestamp is stamped once, on the first terminal
    /// call; repeated terminal calls stay terminal.
    pub fn next_question(&mut self) -> NextQuestion {
        if self.question_idx >= self.questions.len() {
            if self.ended_at.is_none() {
                self.ended_at = Some(Utc::now());
                info!("Session exhausted its question bank");
            }
            return NextQuestion::Finished;
        }

        let text = self.questions[self.question_idx].clone();
        self.history.push(TurnMessage::interviewer(text.clone()));
        self.question_idx += 1;

        NextQuestion::Question {
            text,
            number: self.question_idx,
            total: self.questions.len(),
        }
    }

    /// Processes one candidate answer: picks the follow-up or wrap-up template
    /// by the alternation flag, asks the model for the interviewer's reply,
    /// then appends both turns and toggles the flag. On failure nothing is
    /// mutated; history and flag only change after the call succeeds.
    ///
    /// Returns the reply and whether it was a probing follow-up.
    pub async fn process_response(
        &mut self,
        llm: &dyn ChatBackend,
        transcript: &str,
    ) -> Result<(String, bool), AppError> {
        let was_follow_up = self.follow_up;
        let template = if was_follow_up {
            FOLLOW_UP_TEMPLATE
        } else {
            WRAP_UP_TEMPLATE
        };
        debug!(
            "Processing response (turn {}, follow_up={was_follow_up})",
            self.history.len()
        );

        let candidate = TurnMessage::candidate(transcript);

        let mut messages = vec![
            ChatMessage::system(self.persona.clone()),
            ChatMessage::system(template),
        ];
        messages.extend(self.history.iter().map(TurnMessage::as_chat));
        messages.push(candidate.as_chat());

        let reply = llm.chat(&messages, &self.sampling, None).await?;

        self.history.push(candidate);
        self.history.push(TurnMessage::interviewer(reply.clone()));
        self.follow_up = !self.follow_up;

        Ok((reply, was_follow_up))
    }

    /// One closing utterance over the full history, appended to history.
    /// The alternation flag is not touched.
    pub async fn generate_closer(&mut self, llm: &dyn ChatBackend) -> Result<String, AppError> {
        let mut messages = vec![
            ChatMessage::system(self.persona.clone()),
            ChatMessage::system(CLOSER_TEMPLATE),
        ];
        messages.extend(self.history.iter().map(TurnMessage::as_chat));

        let reply = llm.chat(&messages, &self.sampling, None).await?;
        self.history.push(TurnMessage::interviewer(reply.clone()));
        Ok(reply)
    }

    /// Grades the session: every adjacent (interviewer, candidate) pair is
    /// scored independently, parseable grades are averaged through the grade
    /// codec, and one free-text call produces the holistic narrative.
    ///
    /// An unparseable evaluation degrades that one pair to an error-annotated
    /// entry; an unreachable backend fails the whole call. A history with no
    /// answered questions yields an empty pair list and a not-ratable overall
    /// grade, not an error.
    pub async fn generate_feedback(&self, llm: &dyn ChatBackend) -> Result<SessionFeedback, AppError> {
        let mut answers = Vec::new();
        let mut questions = Vec::new();
        let mut full_transcript = Vec::new();
        let mut transcript_text = String::new();

        let mut i = 0;
        while i + 1 < self.history.len() {
            let (question, q_at, answer, a_at) = match (&self.history[i], &self.history[i + 1]) {
                (
                    TurnMessage::Interviewer { content: q, at: q_at },
                    TurnMessage::Candidate { content: a, at: a_at },
                ) => (q, *q_at, a, *a_at),
                // Introductions and back-to-back interviewer turns are not
                // answered questions; skip forward one turn and re-align.
                _ => {
                    i += 1;
                    continue;
                }
            };
            let question_id = i;
            i += 2;

            full_transcript.push(TranscriptEntry {
                role: "interviewer",
                content: question.clone(),
                timestamp: q_at,
                question_id: Some(question_id),
            });
            full_transcript.push(TranscriptEntry {
                role: "candidate",
                content: answer.clone(),
                timestamp: a_at,
                question_id: None,
            });
            transcript_text.push_str(&format!("interviewer: {question}\ncandidate: {answer}\n"));
            questions.push(question.clone());

            let pair = match evaluate_answer(llm, &self.sampling, question, answer).await {
                Ok(evaluation) => PairFeedback {
                    question: question.clone(),
                    answer: answer.clone(),
                    question_id,
                    evaluation: Some(evaluation),
                    error: None,
                },
                Err(LlmError::Malformed(msg)) => {
                    debug!("Pair at offset {question_id} degraded: {msg}");
                    PairFeedback {
                        question: question.clone(),
                        answer: answer.clone(),
                        question_id,
                        evaluation: None,
                        error: Some(
                            "Failed to generate structured feedback. The model did not return valid JSON."
                                .to_string(),
                        ),
                    }
                }
                Err(other) => return Err(other.into()),
            };
            answers.push(pair);
        }

        let overall = aggregate_grades(
            answers
                .iter()
                .filter_map(|p| p.evaluation.as_ref().map(|e| e.grade.as_str())),
        )
        .unwrap_or_else(OverallGrade::not_ratable);

        let overall_feedback = holistic_feedback(llm, &self.sampling, &transcript_text)
            .await
            .map_err(AppError::from)?;

        info!(
            "Session feedback: {} pairs, overall {} ({})",
            answers.len(),
            overall.grade,
            overall.rating
        );

        Ok(SessionFeedback {
            answers,
            questions,
            metadata: self.metadata(),
            analysis: Analysis {
                performance_metrics: overall.into(),
                overall_feedback,
            },
            full_transcript,
        })
    }

    fn metadata(&self) -> SessionMetadata {
        SessionMetadata {
            interviewer: self.persona_name.clone(),
            interview_type: self.mode.clone(),
            start_time: self.started_at,
            end_time: self.ended_at,
            job_title: self.job.as_ref().and_then(|j| j.role.clone()),
            company: self.job.as_ref().and_then(|j| j.company.clone()),
            job_url: self.job.as_ref().and_then(|j| j.job_url.clone()),
        }
    }

    #[cfg(test)]
    fn with_questions(questions: Vec<&str>) -> Self {
        Self {
            persona_name: "todd".to_string(),
            persona: "test persona".to_string(),
            mode: "technical".to_string(),
            job: None,
            questions: questions.into_iter().map(String::from).collect(),
            question_idx: 0,
            history: Vec::new(),
            follow_up: true,
            started_at: Utc::now(),
            ended_at: None,
            sampling: SamplingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    const BANK_JSON: &str = r#"{"questions": ["Why Rust?", "What is ownership?"]}"#;

    const EVAL_C: &str = r#"{
        "strengths": ["honest"],
        "areas_for_improvement": ["rambling"],
        "suggestions": ["tighten the structure"],
        "grade": "C"
    }"#;

    #[tokio::test]
    async fn test_create_generates_question_bank() {
        let llm = ScriptedModel::replying(&[BANK_JSON]);
        let session = InterviewSession::create(
            &llm,
            "todd",
            "technical",
            "We need a Rust engineer.",
            "Five years of systems programming.",
            &["ownership".to_string()],
        )
        .await
        .unwrap();

        assert_eq!(session.total_questions(), 2);
        assert!(session.history.is_empty());
        assert!(session.follow_up);
    }

    #[tokio::test]
    async fn test_create_with_unknown_persona_fails_fast() {
        // No model call should happen; an empty script proves it.
        let llm = ScriptedModel::replying(&[]);
        let err = InterviewSession::create(&llm, "steve", "technical", "jd", "resume", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownPersona(_)));
    }

    #[tokio::test]
    async fn test_create_with_unknown_mode_fails_fast() {
        let llm = ScriptedModel::replying(&[]);
        let err = InterviewSession::create(&llm, "todd", "astrology", "jd", "resume", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_with_malformed_bank_is_fatal() {
        let llm = ScriptedModel::replying(&["Sure! Here are some questions:"]);
        let err = InterviewSession::create(&llm, "todd", "technical", "jd", "resume", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedModelOutput(_)));
    }

    #[tokio::test]
    async fn test_create_parses_structured_job_record() {
        let llm = ScriptedModel::replying(&[BANK_JSON]);
        let job = r#"{"role": "Platform Engineer", "company": "Acme", "job_url": "https://acme.example/jobs/1"}"#;
        let session = InterviewSession::create(&llm, "jeff", "technical", job, "resume", &[])
            .await
            .unwrap();

        let metadata = session.metadata();
        assert_eq!(metadata.job_title.as_deref(), Some("Platform Engineer"));
        assert_eq!(metadata.company.as_deref(), Some("Acme"));
        assert!(metadata.end_time.is_none());
    }

    #[test]
    fn test_next_question_exhausts_bank_in_order_then_stays_terminal() {
        let mut session = InterviewSession::with_questions(vec!["Q1", "Q2"]);

        match session.next_question() {
            NextQuestion::Question { text, number, total } => {
                assert_eq!(text, "Q1");
                assert_eq!(number, 1);
                assert_eq!(total, 2);
            }
            NextQuestion::Finished => panic!("bank not exhausted yet"),
        }
        match session.next_question() {
            NextQuestion::Question { text, number, .. } => {
                assert_eq!(text, "Q2");
                assert_eq!(number, 2);
            }
            NextQuestion::Finished => panic!("bank not exhausted yet"),
        }

        assert!(session.ended_at.is_none());
        assert_eq!(session.next_question(), NextQuestion::Finished);
        let ended = session.ended_at.unwrap();

        // Terminal calls stay terminal and never restamp the end time.
        assert_eq!(session.next_question(), NextQuestion::Finished);
        assert_eq!(session.ended_at.unwrap(), ended);
        assert_eq!(session.question_idx, 2);
    }

    #[tokio::test]
    async fn test_introduction_appends_without_touching_cursor_or_flag() {
        let mut session = InterviewSession::with_questions(vec!["Q1"]);
        let llm = ScriptedModel::replying(&["Welcome! I'm Todd."]);

        let intro = session.generate_introduction(&llm).await.unwrap();
        assert_eq!(intro, "Welcome! I'm Todd.");
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.question_idx, 0);
        assert!(session.follow_up);
    }

    #[tokio::test]
    async fn test_process_response_toggles_flag_and_appends_both_turns() {
        let mut session = InterviewSession::with_questions(vec!["Q1"]);
        session.next_question();
        let llm = ScriptedModel::replying(&["Interesting, say more?", "Got it, let's move on."]);

        let (reply, was_follow_up) = session.process_response(&llm, "My answer.").await.unwrap();
        assert_eq!(reply, "Interesting, say more?");
        assert!(was_follow_up);
        assert!(!session.follow_up);
        assert_eq!(session.history.len(), 3); // question + answer + reply

        let (_, was_follow_up) = session.process_response(&llm, "More detail.").await.unwrap();
        assert!(!was_follow_up, "second turn wraps up");
        assert!(session.follow_up, "flag strictly alternates");
        assert_eq!(session.history.len(), 5);
    }

    #[tokio::test]
    async fn test_failed_process_response_mutates_nothing() {
        let mut session = InterviewSession::with_questions(vec!["Q1"]);
        session.next_question();
        let llm = ScriptedModel::new(vec![Err(ScriptedModel::transport_error())]);

        let err = session.process_response(&llm, "My answer.").await.unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
        assert_eq!(session.history.len(), 1, "candidate turn rolled back");
        assert!(session.follow_up, "no partial toggle");
    }

    #[tokio::test]
    async fn test_closer_appends_to_history() {
        let mut session = InterviewSession::with_questions(vec![]);
        let llm = ScriptedModel::replying(&["Thanks for your time!"]);

        let closer = session.generate_closer(&llm).await.unwrap();
        assert_eq!(closer, "Thanks for your time!");
        assert_eq!(session.history.last().unwrap().content(), "Thanks for your time!");
        assert!(session.follow_up);
    }

    #[tokio::test]
    async fn test_feedback_scores_each_pair_and_aggregates() {
        let mut session = InterviewSession::with_questions(vec!["Q1", "Q2"]);
        session.next_question();
        let llm = ScriptedModel::replying(&["Follow-up?", "Wrapping up."]);
        session.process_response(&llm, "Answer one.").await.unwrap();
        session.process_response(&llm, "Answer two.").await.unwrap();
        // History: Q1, A1, follow-up, A2, wrap-up → two answered pairs + a
        // trailing unanswered interviewer turn.

        let grader = ScriptedModel::replying(&[EVAL_C, EVAL_C, "Keep practicing structure."]);
        let feedback = session.generate_feedback(&grader).await.unwrap();

        assert_eq!(feedback.answers.len(), 2);
        assert_eq!(feedback.answers[0].question_id, 0);
        assert_eq!(feedback.answers[1].question_id, 2);
        assert_eq!(feedback.questions, vec!["Q1".to_string(), "Follow-up?".to_string()]);
        assert_eq!(feedback.full_transcript.len(), 4);
        // Two C grades → mean 2.0 → C → Average, 0.67.
        assert_eq!(feedback.analysis.performance_metrics.overall_rating, "Average");
        assert_eq!(feedback.analysis.performance_metrics.average_score, 0.67);
        assert_eq!(feedback.analysis.overall_feedback, "Keep practicing structure.");
    }

    #[tokio::test]
    async fn test_feedback_skips_leading_introduction() {
        let mut session = InterviewSession::with_questions(vec!["Q1"]);
        let llm = ScriptedModel::replying(&["Welcome!", "Noted, thanks."]);
        session.generate_introduction(&llm).await.unwrap();
        session.next_question();
        session.process_response(&llm, "My answer.").await.unwrap();
        // History: intro, Q1, A1, reply. Intro followed by Q1 is not a pair.

        let grader = ScriptedModel::replying(&[EVAL_C, "Overall fine."]);
        let feedback = session.generate_feedback(&grader).await.unwrap();

        assert_eq!(feedback.answers.len(), 1);
        assert_eq!(feedback.answers[0].question, "Q1");
        assert_eq!(feedback.answers[0].question_id, 1);
    }

    #[tokio::test]
    async fn test_feedback_with_no_answers_is_not_ratable() {
        let mut session = InterviewSession::with_questions(vec!["Q1"]);
        session.next_question(); // asked but never answered

        let grader = ScriptedModel::replying(&["Nothing to grade."]);
        let feedback = session.generate_feedback(&grader).await.unwrap();

        assert!(feedback.answers.is_empty());
        assert_eq!(feedback.analysis.performance_metrics.overall_rating, "Not Rated");
        assert_eq!(feedback.analysis.performance_metrics.average_score, 0.0);
    }

    #[tokio::test]
    async fn test_feedback_degrades_malformed_pair_and_keeps_the_rest() {
        let mut session = InterviewSession::with_questions(vec!["Q1", "Q2"]);
        let llm = ScriptedModel::replying(&["Follow-up?", "Wrapping up."]);
        session.next_question();
        session.process_response(&llm, "Answer one.").await.unwrap();
        session.process_response(&llm, "Answer two.").await.unwrap();

        let grader = ScriptedModel::replying(&["total nonsense", EVAL_C, "Mixed bag."]);
        let feedback = session.generate_feedback(&grader).await.unwrap();

        assert_eq!(feedback.answers.len(), 2);
        assert!(feedback.answers[0].evaluation.is_none());
        assert!(feedback.answers[0].error.is_some());
        assert!(feedback.answers[1].evaluation.is_some());
        // Only the surviving C counts: mean 2.0 → Average.
        assert_eq!(feedback.analysis.performance_metrics.overall_rating, "Average");
    }

    #[tokio::test]
    async fn test_feedback_propagates_unreachable_backend() {
        let mut session = InterviewSession::with_questions(vec!["Q1"]);
        let llm = ScriptedModel::replying(&["Follow-up?"]);
        session.next_question();
        session.process_response(&llm, "Answer one.").await.unwrap();

        let grader = ScriptedModel::new(vec![Err(ScriptedModel::transport_error())]);
        let err = session.generate_feedback(&grader).await.unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
    }
}
