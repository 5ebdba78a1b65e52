//! Statement classification.
//!
//! A first-keyword heuristic, not a parser: a statement is a data query when
//! its first word (after leading whitespace) is one of `select`, `with`,
//! `explain` or `pragma`, case-insensitively. Comment-prefixed input is
//! classified by whatever comes first.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const DATA_QUERY_PATTERN: &str = r"(?i)^\s*(select|with|explain|pragma)\b";

/// Whether a statement returns rows or changes the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementClass {
    /// SELECT, WITH, EXPLAIN or PRAGMA.
    DataQuery,
    /// Everything else (DML and DDL).
    Mutation,
}

impl fmt::Display for StatementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataQuery => write!(f, "DataQuery"),
            Self::Mutation => write!(f, "Mutation"),
        }
    }
}

/// Classifier holding the compiled leading-keyword pattern.
#[derive(Debug, Clone)]
pub struct StatementClassifier {
    pattern: Regex,
}

impl Default for StatementClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementClassifier {
    /// Creates a new classifier.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(DATA_QUERY_PATTERN).expect("classifier pattern is valid"),
        }
    }

    /// Classifies a SQL string by its leading keyword.
    pub fn classify(&self, sql: &str) -> StatementClass {
        if self.pattern.is_match(sql) {
            StatementClass::DataQuery
        } else {
            StatementClass::Mutation
        }
    }
}

/// Classifies a SQL string using a shared classifier.
pub fn classify(sql: &str) -> StatementClass {
    static CLASSIFIER: OnceLock<StatementClassifier> = OnceLock::new();
    CLASSIFIER.get_or_init(StatementClassifier::new).classify(sql)
}

/// Returns the first word of a statement, for log output.
pub fn leading_keyword(sql: &str) -> Option<&str> {
    sql.split_whitespace().next()
}
