//! Closed-form chemistry quantities and structure classification.
//!
//! # Responsibility
//! - Compute derived scalars from stored energies.
//! - Assign a category tag to a structure name by ordered rules.

pub mod classify;
pub mod metrics;
