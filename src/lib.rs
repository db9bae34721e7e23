//! reify: runtime reification of nominal, erasure-based generic types.
//!
//! This crate is the public face of the workspace. The engine lives in
//! [`reify_solver`] and is re-exported here in full; shared limits come from
//! [`reify_common`].
//!
//! A host supplies class metadata through a [`ClassHierarchy`] (or populates
//! the in-memory [`ClassRegistry`]), then asks [`TypeToken`]s about
//! supertypes, subtypes, assignability and type closures.

pub use reify_common::limits;
pub use reify_solver::*;

// Tracing configuration (REIFY_LOG / REIFY_LOG_FORMAT)
pub mod tracing_config;
pub use tracing_config::{LogFormat, init_tracing};
