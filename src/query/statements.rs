//! Statement counting.
//!
//! The gateway runs exactly one statement per request. Text is tokenized with
//! sqlparser's SQLite dialect and split on top-level semicolons; comments and
//! empty segments do not count. Semicolons inside a `CREATE TRIGGER` body
//! belong to the trigger.

use crate::error::{GatewayError, Result};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Diagnostic for text holding only whitespace, comments or semicolons.
pub const NO_STATEMENTS: &str = "The supplied SQL string contains no statements";

/// Diagnostic for text holding more than one statement.
pub const MULTIPLE_STATEMENTS: &str = "The supplied SQL string contains more than one statement";

/// Counts the statements in a SQL string.
///
/// Returns `None` when the text cannot be tokenized (an unterminated string
/// literal, for instance). SQLite then reports the problem when preparing.
pub fn count_statements(sql: &str) -> Option<usize> {
    let tokens = Tokenizer::new(&SQLiteDialect {}, sql).tokenize().ok()?;
    Some(count_tokens(&tokens))
}

/// Rejects text that does not hold exactly one statement.
pub fn ensure_single_statement(sql: &str) -> Result<()> {
    match count_statements(sql) {
        Some(0) => Err(GatewayError::sql(NO_STATEMENTS)),
        Some(n) if n > 1 => Err(GatewayError::sql(MULTIPLE_STATEMENTS)),
        _ => Ok(()),
    }
}

fn count_tokens(tokens: &[Token]) -> usize {
    let mut count = 0;
    let mut leading: Vec<Keyword> = Vec::with_capacity(3);
    let mut in_statement = false;
    // BEGIN/CASE nesting inside a trigger body.
    let mut depth = 0usize;

    for token in tokens {
        match token {
            Token::Whitespace(_) | Token::EOF => continue,
            Token::SemiColon if depth == 0 => {
                in_statement = false;
                leading.clear();
                continue;
            }
            _ => {}
        }

        if !in_statement {
            in_statement = true;
            count += 1;
        }

        if let Token::Word(word) = token {
            if leading.len() < 3 {
                leading.push(word.keyword);
            }
            if is_trigger(&leading) {
                match word.keyword {
                    Keyword::BEGIN | Keyword::CASE => depth += 1,
                    Keyword::END => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
        }
    }

    count
}

/// `CREATE [TEMP | TEMPORARY] TRIGGER`
fn is_trigger(leading: &[Keyword]) -> bool {
    match leading {
        [Keyword::CREATE, Keyword::TRIGGER, ..] => true,
        [Keyword::CREATE, Keyword::TEMP | Keyword::TEMPORARY, Keyword::TRIGGER] => true,
        _ => false,
    }
}
