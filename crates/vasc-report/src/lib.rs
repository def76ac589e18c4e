//! vasc-report
//!
//! Clinician-facing text from an annotated segment map. The wording here is
//! persisted into reports, so it is fixed character for character.

pub mod conclusion;
pub mod humanize;

pub use crate::conclusion::{generate, NO_FINDINGS};
pub use crate::humanize::humanize_segment;
