//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce cross-entity rules (course existence, cascade delete,
//!   grading lifecycle) that a single repository cannot see.
//!
//! # Invariants
//! - Services receive repositories by injection and stay storage-agnostic.

pub mod assignment_service;
pub mod course_service;
pub mod import_service;
pub mod report_service;
pub mod student_service;
