//! Terminal plotting for the text report.

pub mod ascii;

pub use ascii::*;
