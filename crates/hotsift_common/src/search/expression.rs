//! Search expressions: one compiled pattern per (log format, family).
//!
//! Every expression captures the same ordered tuple:
//! 1. date (`YYYY-MM-DD` after normalization)
//! 2. time (`HH:MM:SS` or `HH:MM:SS.mmm`)
//! 3. value (HTTP method, HTTP status or exception name)

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::fragments::{
    compose, APACHE_CLIENT, APACHE_TIME, APACHE_TS_END, APACHE_VHOST, DATE_DMY, EXCEPTION,
    OSLO_CONTEXT, OSLO_PID_LEVEL, REQUEST, STATUS, TIMESTAMP, WSGI_STATUS,
};
use crate::error::{Result, TriageError};

/// Source log format. Picked by the caller, who knows which service wrote
/// the file; nothing here tries to guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Plain web-server access log
    ApacheCommon,
    /// Access log with a `vhost:port` prefix
    ApacheVhost,
    /// Embedded WSGI server of an oslo service, any logger
    OsloWsgi,
    /// WSGI lines from the `neutron.wsgi` logger
    NeutronWsgi,
    /// WSGI lines from the nova compute API server
    NovaWsgi,
    /// oslo agent log
    OsloAgent,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::ApacheCommon => "apache_common",
            LogFormat::ApacheVhost => "apache_vhost",
            LogFormat::OsloWsgi => "oslo_wsgi",
            LogFormat::NeutronWsgi => "neutron_wsgi",
            LogFormat::NovaWsgi => "nova_wsgi",
            LogFormat::OsloAgent => "oslo_agent",
        }
    }

    pub fn all() -> &'static [LogFormat] {
        &[
            LogFormat::ApacheCommon,
            LogFormat::ApacheVhost,
            LogFormat::OsloWsgi,
            LogFormat::NeutronWsgi,
            LogFormat::NovaWsgi,
            LogFormat::OsloAgent,
        ]
    }

    /// Whether dates come as `DD/Mon/YYYY` and need normalizing
    fn uses_dmy_dates(&self) -> bool {
        matches!(self, LogFormat::ApacheCommon | LogFormat::ApacheVhost)
    }

    /// Fragments making up the pattern for `family`, if this format has one
    fn fragments(&self, family: Family) -> Option<Vec<&'static str>> {
        let apache = |prefix: Option<&'static str>, event: &[&'static str]| {
            let mut parts: Vec<&'static str> = prefix.into_iter().collect();
            parts.extend([APACHE_CLIENT, DATE_DMY, APACHE_TIME, APACHE_TS_END]);
            parts.extend_from_slice(event);
            parts
        };
        let wsgi = |logger: &'static str, event: &[&'static str]| {
            let mut parts = vec![TIMESTAMP, OSLO_PID_LEVEL, logger, OSLO_CONTEXT, ".*"];
            parts.extend_from_slice(event);
            parts
        };

        match (self, family) {
            (LogFormat::ApacheCommon, Family::Request) => Some(apache(None, &[REQUEST])),
            (LogFormat::ApacheCommon, Family::Status) => Some(apache(None, &[".*", STATUS])),
            (LogFormat::ApacheVhost, Family::Request) => {
                Some(apache(Some(APACHE_VHOST), &[REQUEST]))
            }
            (LogFormat::ApacheVhost, Family::Status) => {
                Some(apache(Some(APACHE_VHOST), &[".*", STATUS]))
            }
            (LogFormat::OsloWsgi, Family::Request) => Some(wsgi(r"\S+", &[REQUEST])),
            (LogFormat::OsloWsgi, Family::Status) => Some(wsgi(r"\S+", &[WSGI_STATUS])),
            (LogFormat::NeutronWsgi, Family::Request) => Some(wsgi(r"neutron\.wsgi", &[REQUEST])),
            (LogFormat::NeutronWsgi, Family::Status) => {
                Some(wsgi(r"neutron\.wsgi", &[WSGI_STATUS]))
            }
            (LogFormat::NovaWsgi, Family::Request) => {
                Some(wsgi(r"nova\.osapi_compute\.wsgi\.server", &[REQUEST]))
            }
            (LogFormat::NovaWsgi, Family::Status) => {
                Some(wsgi(r"nova\.osapi_compute\.wsgi\.server", &[WSGI_STATUS]))
            }
            (LogFormat::OsloAgent, Family::Exception) => Some(vec![
                TIMESTAMP,
                OSLO_PID_LEVEL,
                r"\S+ ",
                r".*?",
                EXCEPTION,
            ]),
            _ => None,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = TriageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LogFormat::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| TriageError::UnknownExpression(s.trim().to_string()))
    }
}

/// What an expression extracts as its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// HTTP method
    Request,
    /// HTTP status code
    Status,
    /// Exception class name
    Exception,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Request => "request",
            Family::Status => "status",
            Family::Exception => "exception",
        }
    }

    pub fn all() -> &'static [Family] {
        &[Family::Request, Family::Status, Family::Exception]
    }

    /// Default source of the match tag for this family
    pub fn tag_source(&self) -> TagSource {
        match self {
            Family::Request | Family::Status => TagSource::Format,
            Family::Exception => TagSource::Value,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = TriageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Family::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| TriageError::UnknownExpression(s.trim().to_string()))
    }
}

/// Where the tag of a match comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSource {
    /// Name of the log format, e.g. `apache_common`
    Format,
    /// The captured value, e.g. an exception class
    Value,
}

/// Fields pulled out of one line by one expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogMatch {
    pub tag: String,
    pub date: String,
    pub time: Option<String>,
    pub value: String,
}

impl LogMatch {
    /// Replace the tag, e.g. to group several sources under one label
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// A compiled catalog entry
#[derive(Debug, Clone)]
pub struct SearchExpression {
    name: String,
    format: LogFormat,
    family: Family,
    regex: Regex,
    tag_source: TagSource,
}

impl SearchExpression {
    pub fn new(format: LogFormat, family: Family) -> Result<Self> {
        let parts = format
            .fragments(family)
            .ok_or(TriageError::UnsupportedExpression {
                format: format.as_str(),
                family: family.as_str(),
            })?;
        let regex = Regex::new(&compose(&parts))?;

        Ok(Self {
            name: format!("{}.{}", format.as_str(), family.as_str()),
            format,
            family,
            regex,
            tag_source: family.tag_source(),
        })
    }

    /// Override where match tags come from
    pub fn with_tag_source(mut self, tag_source: TagSource) -> Self {
        self.tag_source = tag_source;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Match one line. `None` unless the whole composed pattern matches.
    pub fn match_line(&self, line: &str) -> Option<LogMatch> {
        let caps = self.regex.captures(line)?;
        let date = caps.get(1)?.as_str();
        let time = caps.get(2).map(|m| m.as_str().to_string());
        let value = caps.get(3)?.as_str().to_string();

        let date = if self.format.uses_dmy_dates() {
            normalize_dmy(date)
        } else {
            date.to_string()
        };

        let tag = match self.tag_source {
            TagSource::Format => self.format.as_str().to_string(),
            TagSource::Value => value.clone(),
        };

        Some(LogMatch {
            tag,
            date,
            time,
            value,
        })
    }
}

/// `01/Jan/2023` -> `2023-01-01`. Dates chrono cannot read stay as they are.
fn normalize_dmy(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%d/%B/%Y") {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => {
            tracing::trace!("leaving unparseable date {} as is", date);
            date.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APACHE_LINE: &str = r#"10.0.0.1 - - [01/Jan/2023:10:15:00] "GET /v1 HTTP/1.1" 200"#;
    const WSGI_LINE: &str = r#"2023-01-01 10:15:00.123 2345 INFO neutron.wsgi [req-5b1c - - - - -] 10.0.0.5 "POST /v2.0/ports HTTP/1.1" status: 201  len: 1043 time: 0.4312"#;

    #[test]
    fn test_apache_request() {
        let expr = SearchExpression::new(LogFormat::ApacheCommon, Family::Request).unwrap();
        let m = expr.match_line(APACHE_LINE).unwrap();
        assert_eq!(m.tag, "apache_common");
        assert_eq!(m.date, "2023-01-01");
        assert_eq!(m.time.as_deref(), Some("10:15:00"));
        assert_eq!(m.value, "GET");
    }

    #[test]
    fn test_apache_status_with_timezone() {
        let expr = SearchExpression::new(LogFormat::ApacheCommon, Family::Status).unwrap();
        let line = r#"10.0.0.1 - - [14/Feb/2023:23:59:01 +0000] "DELETE /v3/x HTTP/1.1" 404 233"#;
        let m = expr.match_line(line).unwrap();
        assert_eq!(m.date, "2023-02-14");
        assert_eq!(m.value, "404");
    }

    #[test]
    fn test_apache_vhost_needs_prefix() {
        let expr = SearchExpression::new(LogFormat::ApacheVhost, Family::Request).unwrap();
        assert!(expr.match_line(APACHE_LINE).is_none());
        let line = format!("keystone.local:5000 {}", APACHE_LINE);
        assert_eq!(expr.match_line(&line).unwrap().value, "GET");
    }

    #[test]
    fn test_date_without_event_is_no_match() {
        let expr = SearchExpression::new(LogFormat::ApacheCommon, Family::Request).unwrap();
        let line = r#"10.0.0.1 - - [01/Jan/2023:10:15:00] "HEAD /v1 HTTP/1.1" 200"#;
        assert!(expr.match_line(line).is_none());
    }

    #[test]
    fn test_wsgi_request_and_status() {
        let req = SearchExpression::new(LogFormat::NeutronWsgi, Family::Request).unwrap();
        let status = SearchExpression::new(LogFormat::NeutronWsgi, Family::Status).unwrap();

        let m = req.match_line(WSGI_LINE).unwrap();
        assert_eq!(m.date, "2023-01-01");
        assert_eq!(m.time.as_deref(), Some("10:15:00.123"));
        assert_eq!(m.value, "POST");

        let m = status.match_line(WSGI_LINE).unwrap();
        assert_eq!(m.value, "201");
        assert_eq!(m.tag, "neutron_wsgi");
    }

    #[test]
    fn test_wsgi_logger_prefix_is_fixed() {
        let nova = SearchExpression::new(LogFormat::NovaWsgi, Family::Request).unwrap();
        assert!(nova.match_line(WSGI_LINE).is_none());

        let generic = SearchExpression::new(LogFormat::OsloWsgi, Family::Request).unwrap();
        assert!(generic.match_line(WSGI_LINE).is_some());
    }

    #[test]
    fn test_exception_tag_is_value() {
        let expr = SearchExpression::new(LogFormat::OsloAgent, Family::Exception).unwrap();
        let line = "2023-03-02 07:41:09.021 1021 ERROR neutron.agent.l3.agent [-] Failed to process router: ovsdbapp.exceptions.TimeoutException: Commands timed out";
        let m = expr.match_line(line).unwrap();
        assert_eq!(m.tag, "ovsdbapp.exceptions.TimeoutException");
        assert_eq!(m.value, m.tag);
        assert_eq!(m.time.as_deref(), Some("07:41:09.021"));
    }

    #[test]
    fn test_exception_starts_at_word_boundary() {
        let expr = SearchExpression::new(LogFormat::OsloAgent, Family::Exception).unwrap();
        let glued = "2023-03-02 07:41:09.021 1021 ERROR neutron.agent.dhcp [-] retry 3xKeyError";
        assert!(expr.match_line(glued).is_none());

        let later = "2023-03-02 07:41:09.021 1021 ERROR neutron.agent.dhcp [-] retry 3xKeyError then KeyError";
        assert_eq!(expr.match_line(later).unwrap().tag, "KeyError");
    }

    #[test]
    fn test_unsupported_pair() {
        let err = SearchExpression::new(LogFormat::ApacheCommon, Family::Exception).unwrap_err();
        assert!(matches!(err, TriageError::UnsupportedExpression { .. }));
    }

    #[test]
    fn test_unparseable_month_kept_verbatim() {
        assert_eq!(normalize_dmy("01/Sept/2023"), "01/Sept/2023");
        assert_eq!(normalize_dmy("05/March/2023"), "2023-03-05");
    }

    #[test]
    fn test_with_tag_override() {
        let expr = SearchExpression::new(LogFormat::ApacheCommon, Family::Request)
            .unwrap()
            .with_tag_source(TagSource::Value);
        assert_eq!(expr.match_line(APACHE_LINE).unwrap().tag, "GET");
        let m = expr.match_line(APACHE_LINE).unwrap().with_tag("keystone");
        assert_eq!(m.tag, "keystone");
    }
}
