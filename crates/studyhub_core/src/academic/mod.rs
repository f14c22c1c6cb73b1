//! Pure academic computations consumed by presentation callers.
//!
//! # Responsibility
//! - Due-date bucketing, weighted grades, GPA conversion, list filtering and
//!   calendar layout.
//!
//! # Invariants
//! - Every function here is synchronous and free of I/O and hidden state.
//! - Inputs are canonical model records; raw record shapes never reach here.

pub mod calendar;
pub mod due;
pub mod filter;
pub mod grade;
