//! Input/output helpers.

pub mod export;
