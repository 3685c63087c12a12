//! Suggestion routes
//!
//! Ranked match candidates for the caller, plus the inert feedback hook.
//! Both require a completed profile.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizlink_engine::{Suggestion, SuggestionFeedback};
use bizlink_store::BusinessRole;

use crate::error::{ApiError, Result};
use crate::extract::CompletedUser;
use crate::state::AppState;

/// Suggestion routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_suggestions))
        .route("/feedback", post(post_feedback))
}

/// Suggestions query
#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    /// Maximum results (default 10)
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Optional role filter overriding the default target-role set
    #[serde(rename = "type", default)]
    pub type_filter: Option<String>,
}

fn default_limit() -> usize {
    10
}

/// Suggestions response
#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
    pub total_count: usize,
    pub user_role: BusinessRole,
}

/// Get ranked connection suggestions
///
/// GET /api/v1/suggestions?limit=&type=
async fn get_suggestions(
    user: CompletedUser,
    State(state): State<AppState>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<SuggestionsResponse>> {
    let role_filter = query
        .type_filter
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| {
            BusinessRole::parse(s)
                .filter(|r| *r != BusinessRole::Pending)
                .ok_or_else(|| ApiError::validation("type", "unknown role filter"))
        })
        .transpose()?;

    let suggestions = state
        .engine
        .suggestions(&user.id, query.limit, role_filter)
        .await?;

    Ok(Json(SuggestionsResponse {
        total_count: suggestions.len(),
        user_role: user.role,
        suggestions,
    }))
}

/// Feedback request
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub suggestion_id: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub action: String,
}

/// Feedback acknowledgement
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub suggestion_id: String,
    pub feedback: String,
    pub action: String,
    pub recorded_at: DateTime<Utc>,
}

/// Record feedback on a suggestion
///
/// POST /api/v1/suggestions/feedback
///
/// Logged but not used to adjust future scoring.
async fn post_feedback(
    user: CompletedUser,
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>> {
    if req.suggestion_id.is_empty() || req.feedback.is_empty() || req.action.is_empty() {
        return Err(ApiError::bad_request(
            "suggestion_id, feedback and action are required",
        ));
    }

    let feedback = SuggestionFeedback {
        suggestion_id: req.suggestion_id,
        feedback: req.feedback,
        action: req.action,
    };
    state.engine.record_feedback(&user.id, &feedback);

    Ok(Json(FeedbackResponse {
        suggestion_id: feedback.suggestion_id,
        feedback: feedback.feedback,
        action: feedback.action,
        recorded_at: Utc::now(),
    }))
}
