//! Completeness scoring for assembled AIBOM documents.
//!
//! [`CompletenessScorer`] checks every catalog field for presence, scores
//! each category as `present / total * category_weight`, applies penalty
//! multipliers for missing critical and important fields, and classifies
//! the document against the catalog's completeness profiles.
//!
//! # Presence
//!
//! A field counts as present when, in order:
//!
//! 1. its catalog path resolves to a non-empty value, or
//! 2. a provenance entry exists for it with `high` or `medium` confidence
//!    (an entry with `low`/`none` confidence means absent), or
//! 3. with no provenance entry, [`find_field`] locates it structurally.
//!
//! # Penalties
//!
//! | condition | multiplier |
//! |-----------|------------|
//! | more than 3 critical fields missing | ×0.8 |
//! | 2 or 3 critical fields missing | ×0.9 |
//! | 5 or more important fields missing | ×0.95 |
//!
//! Multipliers compose; the total is bounded to `[0, 100]`.

mod detect;
mod report;
mod scorer;
mod validation;

pub use detect::find_field;
pub use report::{MissingFields, Priority, ProfileOutcome, Recommendation, ScoreReport};
pub use scorer::CompletenessScorer;
pub use validation::{
    RequiredKeysValidator, SchemaValidator, Severity, ValidationIssue, ValidationReport,
    ai_requirement_issues,
};
