//! Domain types and pure scheduling logic for the production backend.
//!
//! This crate has zero internal dependencies so the repository layer, the
//! HTTP layer and any future tooling can all share it.

pub mod breakdown;
pub mod call_sheet;
pub mod error;
pub mod scene;
pub mod scheduling;
pub mod types;
