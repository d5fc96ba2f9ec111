//! Search expression catalog.
//!
//! Named regular expressions that pull `(date, time, value)` out of the
//! different log line shapes found in a host capture. Matching is per line;
//! a line either matches a whole expression or is skipped.

pub mod catalog;
pub mod expression;
pub mod fragments;

pub use catalog::Catalog;
pub use expression::{Family, LogFormat, LogMatch, SearchExpression, TagSource};
