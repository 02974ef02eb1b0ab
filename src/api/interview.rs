//! Interview endpoints: question list, text answers, audio answers

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::questions::{InterviewQuestion, QuestionEntry};
use crate::session::ResponseMode;
use crate::speech::SynthesisResult;

/// Build interview router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/questions", get(questions))
        .route("/interview/text", post(text_response))
        .route("/interview/audio", post(audio_response))
        .with_state(state)
}

/// List the selectable questions
async fn questions(State(state): State<Arc<ApiState>>) -> Json<Vec<QuestionEntry>> {
    Json(
        state
            .session
            .questions()
            .iter()
            .copied()
            .map(QuestionEntry::from)
            .collect(),
    )
}

/// Interview request body
#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    /// Zero-based question index
    pub question: usize,
}

impl InterviewRequest {
    fn question(&self) -> Result<InterviewQuestion, InterviewError> {
        InterviewQuestion::from_index(self.question).ok_or(InterviewError::UnknownQuestion(self.question))
    }
}

/// Text answer
#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub question: QuestionEntry,
    pub text: String,
    /// True when `text` is fallback text rather than a model answer
    pub failed: bool,
}

/// Answer a question with text
async fn text_response(
    State(state): State<Arc<ApiState>>,
    request: Result<Json<InterviewRequest>, JsonRejection>,
) -> Result<Json<TextResponse>, InterviewError> {
    let Json(request) = request?;
    let question = request.question()?;
    let response = state.session.respond(question, ResponseMode::TextOnly).await;

    Ok(Json(TextResponse {
        question: question.into(),
        text: state.session.display_text(&response.text),
        failed: response.text.is_failure(),
    }))
}

/// Answer a question with an MP3 clip
///
/// The clip is sent as an attachment so browsers offer it for download.
async fn audio_response(
    State(state): State<Arc<ApiState>>,
    request: Result<Json<InterviewRequest>, JsonRejection>,
) -> Result<Response, InterviewError> {
    let Json(request) = request?;
    let question = request.question()?;
    let response = state
        .session
        .respond(question, ResponseMode::TextAndAudio)
        .await;

    let text = state.session.display_text(&response.text);
    let failed = response.text.is_failure();

    match response.audio {
        Some(SynthesisResult::Audio(clip)) => Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, clip.mime.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", clip.file_name),
                ),
            ],
            clip.bytes,
        )
            .into_response()),
        Some(SynthesisResult::Unavailable { reason }) => {
            Err(InterviewError::AudioUnavailable {
                reason,
                text,
                failed,
            })
        }
        None => Err(InterviewError::AudioUnavailable {
            reason: "audio was not requested".to_string(),
            text,
            failed,
        }),
    }
}

/// Interview API errors
#[derive(Debug)]
pub enum InterviewError {
    /// Body missing, malformed or of the wrong shape
    InvalidBody(JsonRejection),
    UnknownQuestion(usize),
    /// `failed` is true when `text` is fallback text
    AudioUnavailable {
        reason: String,
        text: String,
        failed: bool,
    },
}

impl From<JsonRejection> for InterviewError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}

impl IntoResponse for InterviewError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            failed: Option<bool>,
        }

        let (status, code, message, answer) = match self {
            Self::InvalidBody(rejection) => (
                rejection.status(),
                "invalid_request",
                rejection.body_text(),
                None,
            ),
            Self::UnknownQuestion(index) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                format!(
                    "unknown question {index} (expected 0..{})",
                    InterviewQuestion::ALL.len()
                ),
                None,
            ),
            Self::AudioUnavailable {
                reason,
                text,
                failed,
            } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "audio_unavailable",
                reason,
                Some((text, failed)),
            ),
        };
        let (text, failed) = answer.unzip();

        (
            status,
            Json(ErrorResponse {
                error: ErrorBody {
                    code,
                    message,
                    text,
                    failed,
                },
            }),
        )
            .into_response()
    }
}
