//! Complaint lifecycle and tracking registry for a campus grievance desk.
//!
//! The [`registry`] module owns the complaint collection: identifier
//! generation, intake validation, the status state machine, the append-only
//! audit trail, and the HTTP surface that exposes them. Storage and
//! classification are pluggable seams so the registry logic stays agnostic
//! of where records live and how categories are inferred.

pub mod config;
pub mod error;
pub mod registry;
pub mod telemetry;
