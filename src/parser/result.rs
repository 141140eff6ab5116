use crate::validator::ValidationError;
use crate::value::Value;

/// Snapshot returned by every `Parser::feed` call (§6).
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub complete: bool,
    /// `errors.is_empty()` — a convenience mirror, not a separate check.
    pub valid: bool,
    /// The partial or final root. For an open root container this is the
    /// growing container value; for a still-incomplete root scalar, `Null`.
    pub data: Value,
    pub completed_fields: Vec<String>,
    pub pending_fields: Vec<String>,
    pub errors: Vec<ValidationError>,
    pub depth: usize,
    pub bytes_processed: usize,
}
