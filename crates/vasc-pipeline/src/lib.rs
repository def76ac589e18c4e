//! vasc-pipeline
//!
//! Runs the rules engine against stored exams.
//!
//! Public API:
//! - `run_calculation()`: load, criteria, extract, calculate, persist,
//!   conclusion, preliminary report
//! - `conclusion_for_exam()`: re-derive the conclusion without writing
//! - `evaluate()`: calculate and conclude over a bare segment map
//! - `create_exam()`: store a new exam built from a segment template

pub mod calculation;
pub mod error;
pub mod intake;

pub use crate::calculation::{
    conclusion_for_exam, evaluate, run_calculation, CalculationOutcome, Evaluation, ReportOutcome,
};
pub use crate::error::PipelineError;
pub use crate::intake::{create_exam, NewExam};
