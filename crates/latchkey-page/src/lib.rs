// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page-side engines for Latchkey: field classification, credential capture,
//! and autofill, all written against the abstract `PageDom` boundary.
//!
//! Capture and autofill share one ordered rule cascade, so the set of pages
//! the vault can capture from and the set it can fill are the same.

pub mod autofill;
pub mod capture;
pub mod rules;

pub use autofill::{AutofillEngine, FillReport};
pub use capture::{CaptureEngine, ScanReport};
pub use rules::{is_submit_like, locate, rules_for, Attr, Pattern, Rule};
