//! Pattern fragments shared by the catalog entries.
//!
//! Each fragment owns a fixed number of capture groups. Entries are built by
//! concatenating a line prefix, a date fragment and an event fragment, so
//! every entry ends up with the layout `(date, time, value)`.

/// `DD/Mon/YYYY` as written by Apache. Month may be 3 to 5 letters.
pub const DATE_DMY: &str = r"(\d{2}/\w{3,5}/\d{4})";

/// Time that follows `DATE_DMY` in Apache logs, seconds included.
pub const APACHE_TIME: &str = r":(\d{2}:\d{2}:\d{2})";

/// `YYYY-MM-DD HH:MM:SS.mmm` as written by oslo.log.
pub const TIMESTAMP: &str = r"(\d{4}-\d{2}-\d{2}) (\d{2}:\d{2}:\d{2}\.\d{3})";

/// HTTP method of a request line.
pub const REQUEST: &str = r#""(GET|POST|PUT|DELETE)"#;

/// HTTP status code following the protocol of a request line.
pub const STATUS: &str = r#"HTTP/\d.\d" (\d+)"#;

/// HTTP status code as logged by the embedded WSGI server.
pub const WSGI_STATUS: &str = r#"HTTP/\d.\d" status: (\d+)"#;

/// Exception or error class name, starting at a word boundary.
pub const EXCEPTION: &str = r"\b([A-Za-z_][\w.]*(?:Exception|Error))\b";

/// Apache access log prefix up to the opening bracket of the timestamp.
pub const APACHE_CLIENT: &str = r"\S+ \S+ \S+ \[";

/// Apache `vhost_combined` prefix: `host:port ` ahead of the client.
pub const APACHE_VHOST: &str = r"\S+:\d+ ";

/// Remainder of the bracketed Apache timestamp (timezone, if any).
pub const APACHE_TS_END: &str = r"[^\]]*\] ";

/// oslo.log columns between the timestamp and the logger name.
pub const OSLO_PID_LEVEL: &str = r" \d+ [A-Z]+ ";

/// Bracketed request context of an oslo.log line.
pub const OSLO_CONTEXT: &str = r" \[[^\]]*\] ";

/// Build an anchored pattern from fragments.
pub fn compose(parts: &[&str]) -> String {
    let mut pattern = String::from("^");
    for part in parts {
        pattern.push_str(part);
    }
    pattern
}
