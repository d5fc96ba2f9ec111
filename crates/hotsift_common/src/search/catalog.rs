//! The catalog of named search expressions.
//!
//! Built once and only read afterwards. `Catalog::global()` is the shared
//! instance; `Catalog::builtin()` builds a private one.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::expression::{Family, LogFormat, SearchExpression};
use crate::error::{Result, TriageError};

static GLOBAL_CATALOG: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::builtin().expect("built-in search expressions must compile"));

/// Immutable set of compiled search expressions keyed by name
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<String, SearchExpression>,
}

impl Catalog {
    /// Compile every supported (format, family) pair
    pub fn builtin() -> Result<Self> {
        let mut entries = BTreeMap::new();
        for format in LogFormat::all() {
            for family in Family::all() {
                match SearchExpression::new(*format, *family) {
                    Ok(expr) => {
                        entries.insert(expr.name().to_string(), expr);
                    }
                    Err(TriageError::UnsupportedExpression { .. }) => continue,
                    Err(e) => return Err(e),
                }
            }
        }
        tracing::debug!("compiled {} search expressions", entries.len());
        Ok(Self { entries })
    }

    pub fn global() -> &'static Catalog {
        &GLOBAL_CATALOG
    }

    pub fn get(&self, format: LogFormat, family: Family) -> Result<&SearchExpression> {
        self.entries
            .get(&format!("{}.{}", format.as_str(), family.as_str()))
            .ok_or(TriageError::UnsupportedExpression {
                format: format.as_str(),
                family: family.as_str(),
            })
    }

    /// Look up by `"<format>.<family>"`, e.g. `apache_common.request`
    pub fn by_name(&self, name: &str) -> Result<&SearchExpression> {
        self.entries
            .get(name.trim())
            .ok_or_else(|| TriageError::UnknownExpression(name.trim().to_string()))
    }

    /// Resolve a data-source hint and family into an expression
    pub fn for_source(&self, hint: &str, family: Family) -> Result<&SearchExpression> {
        let format: LogFormat = hint.parse()?;
        self.get(format, family)
    }

    /// Entry names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
