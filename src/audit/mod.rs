//! Audit logging system for Hearth
//!
//! Records every create, update, and delete with before/after snapshots in
//! an append-only log, attributed to the logged-in user.
//!
//! # Architecture
//!
//! - `AuditEntry`: one log entry with timestamp, actor, operation, entity
//!   information, and optional before/after snapshots.
//! - `AuditLogger`: writes entries to the log file as line-delimited JSON.
//! - `generate_diff`: builds human-readable summaries of what changed.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditActor, AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
