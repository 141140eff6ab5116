use crate::error::ParseError;
use crate::path::Path;
use crate::validator::ValidationError;
use crate::value::Value;

/// Progress hooks a consumer registers on a [`Parser`](super::Parser)
/// (§4.2 "Events"), in place of a bespoke closure field per event.
///
/// All methods default to no-ops so a consumer only overrides what it needs.
pub trait ParserEvents {
    /// Fired on each container close, with the container's own value and path.
    fn on_partial_object(&self, _value: &Value, _path: &Path) {}

    /// Fired on each scalar or nested assignment to an object key.
    fn on_complete_field(&self, _key: &str, _value: &Value, _parent_path: &Path) {}

    /// Fired for every validation error as it's produced, in addition to it
    /// being collected into `ParseResult.errors`.
    fn on_validation_error(&self, _error: &ValidationError) {}

    /// Fired once, when the parser reaches `Complete`.
    fn on_complete(&self, _root: &Value) {}

    /// Fired on a fatal error (strict-mode syntax error, or DepthExceeded).
    fn on_error(&self, _error: &ParseError) {}
}
