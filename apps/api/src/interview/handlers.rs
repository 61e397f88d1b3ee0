use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::feedback::{process_record, InterviewRecord};
use crate::interview::session::{InterviewSession, NextQuestion, SessionFeedback};
use crate::llm_client::SamplingConfig;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StartInterviewRequest {
    pub interviewer: String,
    pub interview_type: String,
    /// Resume text, already extracted from the uploaded document upstream.
    pub resume_text: String,
    /// Raw job description, or a structured job record as JSON.
    pub job_description: String,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

#[derive(Serialize)]
pub struct StartInterviewResponse {
    pub session_id: Uuid,
    pub introduction: String,
    pub total_questions: usize,
}

/// POST /api/start_interview
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Json(req): Json<StartInterviewRequest>,
) -> Result<Json<StartInterviewResponse>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text must not be empty".to_string()));
    }

    let mut session = InterviewSession::create(
        state.llm.as_ref(),
        &req.interviewer,
        &req.interview_type,
        &req.job_description,
        &req.resume_text,
        &req.focus_areas,
    )
    .await?;

    let introduction = session.generate_introduction(state.llm.as_ref()).await?;
    let total_questions = session.total_questions();
    let session_id = state.registry.insert(session);

    Ok(Json(StartInterviewResponse {
        session_id,
        introduction,
        total_questions,
    }))
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum NextQuestionResponse {
    Question {
        finished: bool, // always false
        question: String,
        question_number: usize,
        total_questions: usize,
    },
    Finished {
        finished: bool, // always true
        closer: String,
    },
}

/// GET /api/interview/:session_id/next_question
pub async fn handle_next_question(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<NextQuestionResponse>, AppError> {
    let handle = state.registry.get(session_id)?;
    let mut session = handle.lock().await;

    let response = match session.next_question() {
        NextQuestion::Question { text, number, total } => NextQuestionResponse::Question {
            finished: false,
            question: text,
            question_number: number,
            total_questions: total,
        },
        NextQuestion::Finished => {
            let closer = session.generate_closer(state.llm.as_ref()).await?;
            NextQuestionResponse::Finished {
                finished: true,
                closer,
            }
        }
    };

    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct NextResponseRequest {
    /// Transcript of the candidate's spoken answer, transcribed upstream.
    pub transcript: String,
}

#[derive(Serialize)]
pub struct NextResponseResponse {
    pub transcription: String,
    pub interviewer_reply: String,
    pub is_follow_up: bool,
}

/// POST /api/interview/:session_id/next_response
pub async fn handle_next_response(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<NextResponseRequest>,
) -> Result<Json<NextResponseResponse>, AppError> {
    if req.transcript.trim().is_empty() {
        return Err(AppError::Validation("transcript must not be empty".to_string()));
    }

    let handle = state.registry.get(session_id)?;
    let mut session = handle.lock().await;

    let (interviewer_reply, is_follow_up) = session
        .process_response(state.llm.as_ref(), &req.transcript)
        .await?;

    Ok(Json(NextResponseResponse {
        transcription: req.transcript,
        interviewer_reply,
        is_follow_up,
    }))
}

/// GET /api/interview/:session_id/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionFeedback>, AppError> {
    let handle = state.registry.get(session_id)?;
    let session = handle.lock().await;
    let feedback = session.generate_feedback(state.llm.as_ref()).await?;
    Ok(Json(feedback))
}

/// POST /api/feedback, batch grading of a pre-existing transcript.
pub async fn handle_batch_feedback(
    State(state): State<AppState>,
    Json(record): Json<InterviewRecord>,
) -> Result<Json<InterviewRecord>, AppError> {
    let processed = process_record(state.llm.as_ref(), &SamplingConfig::default(), record).await?;
    Ok(Json(processed))
}
