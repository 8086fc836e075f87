//! Flutter-facing bindings for the QIDT notebook core.

pub mod api;
