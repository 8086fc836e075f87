//! Core use-case services.
//!
//! # Responsibility
//! - Validate user input and apply record invariants.
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from the on-disk layout.

pub mod entry_service;
pub mod result_service;
