//! vasc-engine
//!
//! The clinical rules engine. Pure logic, no I/O: turns a stored exam into a
//! segment map, annotates every segment against a criteria ruleset, and
//! describes exams through per-exam-type profiles.
//!
//! Public API:
//! - `extract()`: exam to `SegmentMap` of raw inputs
//! - `calculate_segments()`: ratio, stenosis and vertebral steps over a map
//! - `compute_ratio()` / `classify_stenosis()` / `interpret_vertebral()`: the
//!   individual steps
//! - `ExamProfile`: per-exam-type capabilities, via `all_profiles()` /
//!   `get_profile()`

pub mod calculator;
pub mod extract;
pub mod profiles;
pub mod ratio;
pub mod stenosis;
pub mod vertebral;

pub use crate::calculator::{calculate_segment, calculate_segments};
pub use crate::extract::{extract, record_from_measurement};
pub use crate::profiles::{all_profiles, get_profile, ExamProfile, ExamView, SegmentView};
pub use crate::ratio::{apply_ratio, compute_ratio};
pub use crate::stenosis::{apply_stenosis, classify_stenosis, StenosisFinding};
pub use crate::vertebral::{apply_vertebral, interpret_vertebral, is_vertebral};
