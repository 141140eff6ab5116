/// Fatal errors raised by the [`Tokenizer`](crate::lexer::Tokenizer) and
/// [`Parser`](crate::parser::Parser).
///
/// These are distinct from [`ValidationError`](crate::validator::ValidationError):
/// a `ParseError` aborts the current parse (in strict mode) or is folded into
/// the error list as a synthetic `syntax` diagnostic (in lenient mode).
/// Validation errors never abort a parse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected {found} at position {position}")]
    Syntax { found: String, position: usize },

    #[error("container depth exceeded limit of {limit} at position {position}")]
    DepthExceeded { limit: usize, position: usize },

    #[error("result() called before the parser reached Complete")]
    Incomplete,

    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

impl ParseError {
    pub fn syntax(found: impl Into<String>, position: usize) -> Self {
        ParseError::Syntax {
            found: found.into(),
            position,
        }
    }

    pub fn syntax_with_context(
        found: impl Into<String>,
        position: usize,
        context: impl Into<String>,
    ) -> Self {
        ParseError::Syntax {
            found: format!("{} ({})", found.into(), context.into()),
            position,
        }
    }

    /// `true` for errors that are always fatal, regardless of lenient mode.
    pub fn is_always_fatal(&self) -> bool {
        matches!(self, ParseError::DepthExceeded { .. })
    }
}

/// A single char's worth of context for error messages, formatted the way a
/// human would describe it (`EOF` instead of an empty string, etc).
pub(crate) fn describe_char(c: Option<char>) -> String {
    match c {
        Some(c) => c.to_string(),
        None => "EOF".to_string(),
    }
}
