//! vasc-core
//!
//! Pure domain types for vascular-ultrasound reporting: exams, segments,
//! measurements, the in-memory segment map the calculator works on, and the
//! criteria document shape. No I/O; this is the shared vocabulary of the
//! workspace.

pub mod error;
pub mod models;
pub mod numeric;
pub mod paths;

pub use error::CoreError;
