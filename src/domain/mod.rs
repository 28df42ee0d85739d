//! Core domain types and logic.

pub mod holdings;
pub mod columns;
pub mod normalize;
pub mod cleaning;
pub mod allocation;
pub mod stats;
pub mod error;
