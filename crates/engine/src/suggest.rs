//! Suggestion pipeline
//!
//! Filter-then-rank over the user directory: exclusion set, target roles,
//! candidate query with over-fetch, scoring, stable sort, truncate.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bizlink_store::{BusinessRole, Database, User};

use crate::compat::target_roles;
use crate::error::{EngineError, Result};
use crate::score::MatchFactors;

/// Over-fetch multiplier: rank from a wider pool than the requested limit so
/// low scorers can be discarded without starving the result
const OVERFETCH: usize = 3;

/// A ranked connection candidate
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    /// Candidate user ID
    pub id: String,
    /// Candidate's business role
    #[serde(rename = "type")]
    pub role: BusinessRole,
    /// Company name, falling back to the person's name
    pub name: String,
    pub industry: Option<String>,
    /// Concatenated location string
    pub location: String,
    /// Why this candidate was suggested
    pub reason: String,
    pub match_score: u8,
    /// Always populated, placeholder when no picture is set
    pub profile_picture: String,
    pub brief_introduction: String,
    pub website: String,
    /// Role-specific display fields
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Suggestion {
    fn from_candidate(candidate: &User, factors: &MatchFactors) -> Self {
        Self {
            id: candidate.id.clone(),
            role: candidate.role,
            name: candidate.display_name(),
            industry: candidate.industry.clone(),
            location: candidate.location(),
            reason: factors.reason(),
            match_score: factors.score(),
            profile_picture: candidate.avatar(),
            brief_introduction: candidate.brief_introduction.clone().unwrap_or_default(),
            website: candidate.website.clone().unwrap_or_default(),
            details: candidate.profile.display_fields(),
        }
    }
}

/// Feedback on a suggestion
///
/// Recorded for a future personalization loop; does not currently adjust
/// scoring.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionFeedback {
    pub suggestion_id: String,
    pub feedback: String,
    pub action: String,
}

/// The suggestion engine
#[derive(Clone)]
pub struct SuggestionEngine {
    db: Database,
}

impl SuggestionEngine {
    /// Create an engine over the shared database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Compute up to `limit` ranked suggestions for a user
    ///
    /// `role_filter` overrides the default target-role set. Fails with
    /// [`EngineError::UserNotFound`] when the requester is missing or
    /// deactivated.
    pub async fn suggestions(
        &self,
        user_id: &str,
        limit: usize,
        role_filter: Option<BusinessRole>,
    ) -> Result<Vec<Suggestion>> {
        let requester = self
            .db
            .users()
            .get_by_id(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(EngineError::UserNotFound)?;

        // Anyone sharing a request edge in any status is excluded, and so is
        // the requester themself.
        let mut exclude = self.db.ledger().involved_user_ids(user_id).await?;
        exclude.push(user_id.to_string());

        let targets: Vec<BusinessRole> = match role_filter {
            Some(role) => vec![role],
            None => target_roles(requester.role).to_vec(),
        };
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        // Industry is a hard filter for investor requesters; everyone else
        // matches across industries and only scores on it.
        let industry = if requester.role == BusinessRole::Investor {
            requester.industry.as_deref()
        } else {
            None
        };

        let candidates = self
            .db
            .users()
            .find_candidates(&targets, industry, &exclude, (limit * OVERFETCH) as i64)
            .await?;

        debug!(
            user_id,
            candidates = candidates.len(),
            excluded = exclude.len(),
            "Scoring suggestion candidates"
        );

        let mut scored: Vec<Suggestion> = candidates
            .iter()
            .map(|candidate| {
                let factors = MatchFactors::evaluate(&requester, candidate);
                Suggestion::from_candidate(candidate, &factors)
            })
            .collect();

        // Stable sort keeps query order among equal scores
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        scored.truncate(limit);

        Ok(scored)
    }

    /// Record feedback on a suggestion
    ///
    /// Deliberately inert: the feedback is logged as a hook for future
    /// personalization and does not influence scoring.
    pub fn record_feedback(&self, user_id: &str, feedback: &SuggestionFeedback) {
        info!(
            user_id,
            suggestion_id = %feedback.suggestion_id,
            feedback = %feedback.feedback,
            action = %feedback.action,
            "Suggestion feedback recorded"
        );
    }
}
