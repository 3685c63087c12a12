//! Bizlink suggestion engine
//!
//! Produces ranked connection candidates for a user by combining a fixed
//! role-compatibility graph, profile similarity scoring, and exclusion of
//! everyone the user has already contacted.
//!
//! # Pipeline
//!
//! 1. Resolve the requester's profile (role, industry, location).
//! 2. Build the exclusion set: the requester plus every user sharing a
//!    request edge with them, in any status.
//! 3. Look up the requester's target roles in the compatibility table
//!    (an optional role filter overrides it).
//! 4. Query the directory for eligible candidates, over-fetching 3x the
//!    requested limit so ranking can discard low scorers.
//! 5. Score, sort descending (stable), truncate.
//!
//! Scores and human-readable match reasons are derived from one
//! [`MatchFactors`] evaluation per pair, so the two can never disagree.

mod compat;
mod error;
mod score;
mod suggest;

pub use compat::target_roles;
pub use error::{EngineError, Result};
pub use score::{LocationMatch, MatchFactors, MAX_SCORE};
pub use suggest::{Suggestion, SuggestionEngine, SuggestionFeedback};
