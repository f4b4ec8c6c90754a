//! Compatibility scoring and candidate eligibility for matchmaking.
//!
//! Everything here is a pure function of its inputs: two [`MatchProfile`]
//! records and a [`Weights`] table produce a 0-100 score, and an
//! [`EligibilityFilter`] narrows a candidate list for an anchor user.

pub mod filter;
pub mod profile;
pub mod ranking;
pub mod score;
pub mod weights;

pub use filter::{filter_candidates, EligibilityFilter};
pub use profile::{Gender, MatchProfile, NEVER_MARRIED};
pub use ranking::{rank_candidates, RankedCandidate};
pub use score::{score, score_breakdown, ScoreBreakdown};
pub use weights::Weights;
