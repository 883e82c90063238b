//! Domain records shared by the stores and the FFI surface.
//!
//! # Invariants
//! - Wire names are camelCase fields and upper-case enum variants, matching
//!   the persisted task blob.

pub mod learning;
pub mod task;
