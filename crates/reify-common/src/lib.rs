//! Common definitions shared by the reify crates.
//!
//! This crate provides:
//! - Centralized recursion and capacity limits (`limits`)

// Centralized limits and thresholds
pub mod limits;
