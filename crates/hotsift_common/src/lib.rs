//! hotsift common - triage core for host log captures
//!
//! Issue and known-bug taxonomy, a catalog of log search expressions,
//! per-time-bucket frequency aggregation and a findings collector.
//! Everything here is per run; nothing is shared between analyses.

pub mod aggregate;
pub mod checks;
pub mod collector;
pub mod config;
pub mod error;
pub mod issues;
pub mod logging;
pub mod parsers;
pub mod search;

pub use aggregate::{aggregate_lines, Aggregate, FrequencyAggregator, Granularity};
pub use checks::{CheckDefinition, CheckSet, LineCheck, Raises};
pub use collector::{FindingEntry, FindingGroup, FindingsCollector, FindingsReport};
pub use config::{LogConfig, TriageConfig};
pub use error::{Result, TriageError};
pub use issues::{Bug, Categorized, Finding, Issue, IssueCategory, Resolvable, TrackerKind};
pub use search::{Catalog, Family, LogFormat, LogMatch, SearchExpression, TagSource};
