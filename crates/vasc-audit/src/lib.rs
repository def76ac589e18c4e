//! vasc-audit
//!
//! Application-level audit trail for clinical calculations. Events go out
//! through `tracing` with `audit.*` fields so the log pipeline can index them.

pub mod events;

pub use crate::events::{AuditAction, AuditEvent, ResourceType};
