//! View selection: which charts a `SelectionState` produces, and whether the
//! year selector is interactive.
//!
//! Every call is a pure function of `(Dataset, SelectionState)`; nothing is
//! remembered between evaluations.

pub mod gating;
pub mod selector;

pub use gating::*;
pub use selector::*;
