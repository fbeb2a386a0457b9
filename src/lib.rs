//! # capl-base
//!
//! Core library for CAPL script scanning, element extraction, and code insertion.
//!
//! CAPL sources (`.can` files) are scanned line by line — no grammar, no AST —
//! into an ordered list of top-level elements (include blocks, variable blocks,
//! event handlers, functions, test functions, test cases). New source text can
//! then be inserted at semantically-named locations (`section:includes`,
//! `after:on key 'a'`, `before:void processData(int value)`, or a derived
//! test-case group) without disturbing the rest of the file.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! processor → location resolution, group derivation, code insertion
//!   ↓
//! scanner   → line-oriented block scanner, brace-depth tracking
//!   ↓
//! elements  → Element sum type, one variant per CAPL construct
//!   ↓
//! store     → CaplFileStore: cp1252 line buffer, range access, save
//!   ↓
//! base      → Primitives (LineSpan, constants)
//! ```

// ============================================================================
// MODULES (dependency order: base → store → elements → scanner → processor)
// ============================================================================

/// Foundation types: LineSpan, domain constants
pub mod base;

/// Error taxonomy shared across the crate
pub mod error;

/// Line store: owns one file's raw line sequence (cp1252, terminators kept)
pub mod store;

/// Element model: passive records describing recognized constructs
pub mod elements;

/// Scanner: lines in, ordered elements out
pub mod scanner;

/// Processor: location resolution and in-place code insertion
pub mod processor;

// Re-export commonly needed items
pub use base::LineSpan;
pub use elements::Element;
pub use error::CaplError;
pub use processor::{CaplProcessor, Location};
pub use scanner::{CaplScanner, scan_lines};
pub use store::CaplFileStore;
