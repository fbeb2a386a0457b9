//! Foundation types for the CAPL toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`LineSpan`] - 0-indexed inclusive line ranges
//! - Domain constants (file extension, section aliases, group-init call)
//!
//! This module has NO dependencies on other capl modules.

pub mod constants;
mod span;

pub use span::LineSpan;
