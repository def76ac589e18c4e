//! vasc-criteria
//!
//! Site/version-scoped criteria documents. A document is resolved from a
//! fixed location keyed by exam type, parsed, and checked against the
//! caller's requested site and version before any of its thresholds are
//! trusted.
//!
//! Public API:
//! - `load()`: read and validate one document from a criteria root
//! - `CriteriaSource`: seam for anything that can produce criteria
//! - `CriteriaCache`: read-through cache keyed by `(exam_type, site, version)`
//! - `load_template()` / `TemplateDir`: segment templates for new exams,
//!   identity-checked like criteria

pub mod cache;
pub mod error;
pub mod source;
pub mod template;

pub use crate::cache::{CriteriaCache, CriteriaKey};
pub use crate::error::{CriteriaError, IdentityField};
pub use crate::source::{load, parse_document, CriteriaDir, CriteriaSource};
pub use crate::template::{load_template, TemplateDir};
