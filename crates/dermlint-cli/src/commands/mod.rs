//! Command implementations.

pub mod check;
pub mod columns;
