mod events;
mod options;
mod result;

pub use events::ParserEvents;
pub use options::ParserOptions;
pub use result::ParseResult;

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind, Tokenizer, TokenizerOptions};
use crate::limit::DepthTracker;
use crate::path::Path;
use crate::validator::{Schema, SchemaError, ValidationError, ValidationKeyword, Validator, ValidatorOptions};
use crate::value::{Value, ValueKind};
use indexmap::{IndexMap, IndexSet};
use std::rc::Rc;

/// §3 "Parser state": the sole authority on what the next token may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Initial,
    ExpectingKey,
    ExpectingColon,
    ExpectingValue,
    InArray,
    ExpectingCommaOrEnd,
    Complete,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Object,
    Array,
}

/// §3 "Stack frame". One per open container; the growing value lives here
/// until the container closes and is folded into its parent (or becomes
/// the root).
struct Frame {
    kind: ContainerKind,
    /// The path this frame's *own* value will occupy once complete.
    path: Path,
    map: IndexMap<String, Value>,
    list: Vec<Value>,
    pending_key: Option<String>,
    next_index: usize,
    /// Set once a comma has been consumed in `ExpectingCommaOrEnd`; used to
    /// tell a legitimately empty container (`{}`) from a trailing comma
    /// (`{"a":1,}`) when a close token arrives in `ExpectingKey`/`InArray`.
    comma_seen: bool,
    /// Cached at push time (§3): the schema governing this frame's contents.
    schema: Rc<Schema>,
}

impl Frame {
    fn to_value(&self) -> Value {
        match self.kind {
            ContainerKind::Object => Value::Object(self.map.clone()),
            ContainerKind::Array => Value::Array(self.list.clone()),
        }
    }

    /// The frame's value with `child` inserted at the position it will
    /// eventually land — used only to assemble a read-only snapshot of the
    /// growing tree without mutating real state.
    fn to_value_with_child(&self, child: Value) -> Value {
        match self.kind {
            ContainerKind::Object => {
                let mut map = self.map.clone();
                if let Some(key) = &self.pending_key {
                    map.insert(key.clone(), child);
                }
                Value::Object(map)
            }
            ContainerKind::Array => {
                let mut list = self.list.clone();
                list.push(child);
                Value::Array(list)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedOptions {
    llm_mode: bool,
    allow_trailing_commas: bool,
}

/// Consumes tokens, builds the value tree, and dispatches events (§4.2).
pub struct Parser {
    tokenizer: Tokenizer,
    state: ParserState,
    stack: Vec<Frame>,
    root: Option<Value>,
    completed_paths: IndexSet<Path>,
    pending_paths: IndexSet<Path>,
    /// The single pending path contributed by the tokenizer's in-flight
    /// partial token, tracked separately so it can be retracted before the
    /// next snapshot without disturbing paths contributed by open frames.
    partial_path: Option<Path>,
    errors: Vec<ValidationError>,
    depth_tracker: DepthTracker,
    bytes_processed: usize,
    validator: Validator,
    events: Option<Rc<dyn ParserEvents>>,
    resolved: ResolvedOptions,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Parser::with_options(ParserOptions::default()).expect("default parser options always compile")
    }

    pub fn with_options(options: ParserOptions) -> Result<Self, SchemaError> {
        let validator = match options.schema.as_ref() {
            Some(schema) => Validator::new(schema, ValidatorOptions::default())?,
            None => Validator::accept_all(),
        };
        let llm_mode = options.llm_mode;
        let allow_trailing_commas = options.allow_trailing_commas.unwrap_or(llm_mode);
        let allow_unquoted_keys = options.allow_unquoted_keys.unwrap_or(llm_mode);
        let allow_single_quotes = options.allow_single_quotes.unwrap_or(llm_mode);
        let tokenizer = Tokenizer::new(TokenizerOptions {
            allow_single_quotes,
            allow_unquoted_keys,
            lenient: llm_mode,
        });
        Ok(Parser {
            tokenizer,
            state: ParserState::Initial,
            stack: Vec::new(),
            root: None,
            completed_paths: IndexSet::new(),
            pending_paths: IndexSet::new(),
            partial_path: None,
            errors: Vec::new(),
            depth_tracker: DepthTracker::new(options.max_depth),
            bytes_processed: 0,
            validator,
            events: options.events.clone(),
            resolved: ResolvedOptions {
                llm_mode,
                allow_trailing_commas,
            },
        })
    }

    /// Builder-style reconfiguration (ambient, mirroring this lineage's own
    /// `Parser::new(..).recursion_limit(n)` chain). Only meaningful before
    /// the first `feed`.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.depth_tracker = DepthTracker::new(depth);
        self
    }

    pub fn llm_mode(mut self, enabled: bool) -> Self {
        self.resolved.llm_mode = enabled;
        self.resolved.allow_trailing_commas = enabled;
        self.tokenizer = Tokenizer::new(TokenizerOptions {
            allow_single_quotes: enabled,
            allow_unquoted_keys: enabled,
            lenient: enabled,
        });
        self
    }

    pub fn allow_trailing_commas(mut self, enabled: bool) -> Self {
        self.resolved.allow_trailing_commas = enabled;
        self
    }

    pub fn events(mut self, events: Rc<dyn ParserEvents>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn schema(mut self, schema: &Value) -> Result<Self, SchemaError> {
        self.validator = Validator::new(schema, ValidatorOptions::default())?;
        Ok(self)
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == ParserState::Complete
    }

    pub fn depth(&self) -> usize {
        self.depth_tracker.current()
    }

    pub fn result(&self) -> Result<Value, ParseError> {
        if self.is_complete() {
            Ok(self.root.clone().expect("Complete implies root is assigned"))
        } else {
            Err(ParseError::Incomplete)
        }
    }

    pub fn reset(&mut self) {
        self.tokenizer.reset();
        self.state = ParserState::Initial;
        self.stack.clear();
        self.root = None;
        self.completed_paths.clear();
        self.pending_paths.clear();
        self.partial_path = None;
        self.errors.clear();
        self.depth_tracker.reset();
        self.bytes_processed = 0;
    }

    /// Advances the tokenizer with `chunk` and processes every token it
    /// yields, returning a snapshot (§4.2, §6).
    ///
    /// Feeds the tokenizer one character at a time rather than the whole
    /// chunk at once: `setExpectingKey` is a single hint covering the
    /// tokenizer's *entire* scan, so a chunk that happens to contain more
    /// than one key (e.g. a whole small object arriving in one fragment)
    /// needs the hint refreshed between keys, not just once per `feed` call.
    pub fn feed(&mut self, chunk: &str) -> Result<ParseResult, ParseError> {
        self.bytes_processed += chunk.chars().count();
        let mut buf = [0u8; 4];
        for ch in chunk.chars() {
            self.tokenizer.set_expecting_key(self.state == ParserState::ExpectingKey);
            let piece = ch.encode_utf8(&mut buf);
            let tokens = self.tokenizer.feed(piece);
            for token in tokens {
                self.dispatch(token)?;
            }
        }
        self.refresh_partial_pending();
        Ok(self.snapshot())
    }

    fn dispatch(&mut self, token: Token) -> Result<(), ParseError> {
        self.dispatch_inner(token, false)
    }

    fn dispatch_inner(&mut self, token: Token, retried: bool) -> Result<(), ParseError> {
        use TokenKind::*;

        if token.kind == Error {
            let found = crate::error::describe_char(token.raw.chars().next());
            let err = ValidationError::new(
                &self.current_target_path(),
                ValidationKeyword::Syntax,
                format!("unrecognized character {found} at position {}", token.position),
                &Schema::any(),
                None,
            );
            self.push_validation_error(err);
            return Ok(());
        }

        match self.state {
            ParserState::Initial => match token.kind {
                LBrace => self.push_container(ContainerKind::Object, Path::root()),
                LBracket => self.push_container(ContainerKind::Array, Path::root()),
                String | Key | Number | Boolean | Null => {
                    let value = token.value.expect("complete value token carries a value");
                    self.assign_scalar(value);
                    Ok(())
                }
                _ => self.syntax_error_or_resync(token, retried),
            },

            ParserState::ExpectingKey => match token.kind {
                Key | String => {
                    let key = token
                        .value
                        .and_then(|v| v.as_str().map(str::to_string))
                        .expect("key token carries a string value");
                    let target = {
                        let frame = self.stack.last_mut().expect("ExpectingKey implies a stack frame");
                        frame.pending_key = Some(key.clone());
                        frame.path.push_key(key)
                    };
                    self.pending_paths.insert(target);
                    self.state = ParserState::ExpectingColon;
                    Ok(())
                }
                RBrace => {
                    let closeable = {
                        let frame = self.stack.last().expect("ExpectingKey implies a stack frame");
                        frame.map.is_empty() || (frame.comma_seen && self.resolved.allow_trailing_commas)
                    };
                    if closeable {
                        self.close_container();
                        Ok(())
                    } else {
                        self.syntax_error_or_resync(token, retried)
                    }
                }
                _ => self.syntax_error_or_resync(token, retried),
            },

            ParserState::ExpectingColon => match token.kind {
                Colon => {
                    self.state = ParserState::ExpectingValue;
                    Ok(())
                }
                _ if self.resolved.llm_mode && !retried => {
                    self.state = ParserState::ExpectingValue;
                    self.dispatch_inner(token, true)
                }
                _ => self.syntax_error_or_resync(token, retried),
            },

            ParserState::ExpectingValue => match token.kind {
                LBrace => {
                    let target = self.current_container_target();
                    self.push_container(ContainerKind::Object, target)
                }
                LBracket => {
                    let target = self.current_container_target();
                    self.push_container(ContainerKind::Array, target)
                }
                String | Key | Number | Boolean | Null => {
                    let value = token.value.expect("complete value token carries a value");
                    self.assign_scalar(value);
                    Ok(())
                }
                RBrace if self.resolved.llm_mode => {
                    {
                        let frame = self.stack.last_mut().expect("ExpectingValue implies a stack frame");
                        if let Some(key) = frame.pending_key.take() {
                            let abandoned = frame.path.push_key(key);
                            self.pending_paths.shift_remove(&abandoned);
                        }
                    }
                    self.close_container();
                    Ok(())
                }
                _ => self.syntax_error_or_resync(token, retried),
            },

            ParserState::InArray => match token.kind {
                RBracket => {
                    let closeable = {
                        let frame = self.stack.last().expect("InArray implies a stack frame");
                        frame.list.is_empty() || (frame.comma_seen && self.resolved.allow_trailing_commas)
                    };
                    if closeable {
                        self.close_container();
                        Ok(())
                    } else {
                        self.syntax_error_or_resync(token, retried)
                    }
                }
                LBrace => {
                    let target = self.current_container_target();
                    self.push_container(ContainerKind::Object, target)
                }
                LBracket => {
                    let target = self.current_container_target();
                    self.push_container(ContainerKind::Array, target)
                }
                String | Key | Number | Boolean | Null => {
                    let value = token.value.expect("complete value token carries a value");
                    self.assign_scalar(value);
                    Ok(())
                }
                _ => self.syntax_error_or_resync(token, retried),
            },

            ParserState::ExpectingCommaOrEnd => match token.kind {
                Comma => {
                    let frame = self.stack.last_mut().expect("ExpectingCommaOrEnd implies a stack frame");
                    frame.comma_seen = true;
                    self.state = match frame.kind {
                        ContainerKind::Object => ParserState::ExpectingKey,
                        ContainerKind::Array => ParserState::InArray,
                    };
                    Ok(())
                }
                RBrace => {
                    if matches!(self.stack.last().map(|f| f.kind), Some(ContainerKind::Object)) {
                        self.close_container();
                        Ok(())
                    } else {
                        self.syntax_error_or_resync(token, retried)
                    }
                }
                RBracket => {
                    if matches!(self.stack.last().map(|f| f.kind), Some(ContainerKind::Array)) {
                        self.close_container();
                        Ok(())
                    } else {
                        self.syntax_error_or_resync(token, retried)
                    }
                }
                _ if self.resolved.llm_mode && !retried => {
                    let frame = self.stack.last().expect("ExpectingCommaOrEnd implies a stack frame");
                    self.state = match frame.kind {
                        ContainerKind::Object => ParserState::ExpectingKey,
                        ContainerKind::Array => ParserState::InArray,
                    };
                    self.dispatch_inner(token, true)
                }
                _ => self.syntax_error_or_resync(token, retried),
            },

            ParserState::Complete | ParserState::Error => self.syntax_error_or_resync(token, retried),
        }
    }

    fn syntax_error_or_resync(&mut self, token: Token, retried: bool) -> Result<(), ParseError> {
        let found = crate::error::describe_char(token.raw.chars().next());
        let message = format!("unexpected {:?} ({found}) at position {}", token.kind, token.position);
        if self.resolved.llm_mode {
            tracing::debug!(%message, "resyncing after unexpected token");
            let err = ValidationError::new(
                &self.current_target_path(),
                ValidationKeyword::Syntax,
                message,
                &Schema::any(),
                token.value.as_ref(),
            );
            self.push_validation_error(err);
            if !retried {
                self.resync(token);
            }
            Ok(())
        } else {
            self.state = ParserState::Error;
            let err = ParseError::syntax(message, token.position);
            tracing::warn!(%err, "parse failed");
            if let Some(events) = &self.events {
                events.on_error(&err);
            }
            Err(err)
        }
    }

    /// Scans forward for a structural token the current container can make
    /// sense of (§4.2 "attempts to resynchronize"). Anything else is
    /// dropped on the floor — the synthetic `syntax` error already recorded
    /// it.
    fn resync(&mut self, token: Token) {
        use TokenKind::*;
        if matches!(token.kind, LBrace | LBracket | RBrace | RBracket) {
            self.state = self.natural_state();
            let _ = self.dispatch_inner(token, true);
        }
    }

    fn natural_state(&self) -> ParserState {
        match self.stack.last() {
            Some(frame) => match frame.kind {
                ContainerKind::Object => ParserState::ExpectingKey,
                ContainerKind::Array => ParserState::InArray,
            },
            None => ParserState::Initial,
        }
    }

    fn push_container(&mut self, kind: ContainerKind, path: Path) -> Result<(), ParseError> {
        if !self.depth_tracker.push() {
            self.state = ParserState::Error;
            let err = ParseError::DepthExceeded {
                limit: self.depth_tracker.limit,
                position: self.bytes_processed,
            };
            tracing::warn!(limit = self.depth_tracker.limit, "max depth exceeded");
            if let Some(events) = &self.events {
                events.on_error(&err);
            }
            return Err(err);
        }

        let expected_kind = match kind {
            ContainerKind::Object => ValueKind::Object,
            ContainerKind::Array => ValueKind::Array,
        };
        if !self.validator.can_be_type(expected_kind, &path) {
            let err = ValidationError::new(
                &path,
                ValidationKeyword::Type,
                format!("expected schema-compatible type for container, got {expected_kind}"),
                &Schema::any(),
                None,
            );
            self.push_validation_error(err);
        }

        let schema = self
            .validator
            .schema_at(&path)
            .unwrap_or_else(Schema::any);
        self.stack.push(Frame {
            kind,
            path,
            map: IndexMap::new(),
            list: Vec::new(),
            pending_key: None,
            next_index: 0,
            comma_seen: false,
            schema,
        });
        self.state = match kind {
            ContainerKind::Object => ParserState::ExpectingKey,
            ContainerKind::Array => ParserState::InArray,
        };
        Ok(())
    }

    fn assign_scalar(&mut self, value: Value) {
        match self.state {
            ParserState::Initial => {
                self.validate_at(&Path::root(), &value);
                self.mark_complete(Path::root());
                self.root = Some(value.clone());
                self.state = ParserState::Complete;
                if let Some(events) = &self.events {
                    events.on_complete(&value);
                }
            }
            ParserState::ExpectingValue => {
                let (key, container_path) = {
                    let frame = self.stack.last_mut().expect("ExpectingValue implies a stack frame");
                    let key = frame.pending_key.take().expect("ExpectingValue implies pending_key");
                    (key, frame.path.clone())
                };
                let target = container_path.push_key(key.clone());
                self.validate_at(&target, &value);
                {
                    let frame = self.stack.last_mut().expect("frame still present after validation");
                    frame.map.insert(key.clone(), value.clone());
                }
                self.mark_complete(target);
                if let Some(events) = &self.events {
                    events.on_complete_field(&key, &value, &container_path);
                }
                self.state = ParserState::ExpectingCommaOrEnd;
            }
            ParserState::InArray => {
                let (index, container_path) = {
                    let frame = self.stack.last().expect("InArray implies a stack frame");
                    (frame.next_index, frame.path.clone())
                };
                let target = container_path.push_index(index);
                self.validate_at(&target, &value);
                {
                    let frame = self.stack.last_mut().expect("frame still present after validation");
                    frame.list.push(value);
                    frame.next_index += 1;
                }
                self.mark_complete(target);
                self.state = ParserState::ExpectingCommaOrEnd;
            }
            _ => unreachable!("assign_scalar only invoked from Initial/ExpectingValue/InArray"),
        }
    }

    /// Pop protocol (§4.2): validates the closed container against its
    /// cached schema, marks its path complete, folds it into its parent (or
    /// sets it as the root).
    fn close_container(&mut self) {
        let frame = self.stack.pop().expect("close_container requires a non-empty stack");
        self.depth_tracker.pop();
        let path = frame.path.clone();
        let value = frame.to_value();

        let errors = self.validator.validate_against(&value, &frame.schema, &path);
        for err in errors {
            self.push_validation_error(err);
        }
        self.mark_complete(path.clone());
        if let Some(events) = &self.events {
            events.on_partial_object(&value, &path);
        }

        match self.stack.last_mut() {
            Some(parent) => {
                match parent.kind {
                    ContainerKind::Object => {
                        let key = parent
                            .pending_key
                            .take()
                            .expect("object parent must have pending_key for its child container");
                        parent.map.insert(key.clone(), value.clone());
                        let parent_path = parent.path.clone();
                        if let Some(events) = &self.events {
                            events.on_complete_field(&key, &value, &parent_path);
                        }
                    }
                    ContainerKind::Array => {
                        parent.list.push(value);
                        parent.next_index += 1;
                    }
                }
                self.state = ParserState::ExpectingCommaOrEnd;
            }
            None => {
                self.root = Some(value.clone());
                self.state = ParserState::Complete;
                tracing::trace!(bytes = self.bytes_processed, "parse complete");
                if let Some(events) = &self.events {
                    events.on_complete(&value);
                }
            }
        }
    }

    fn validate_at(&mut self, path: &Path, value: &Value) {
        let errors = self.validator.validate(value, path);
        for err in errors {
            self.push_validation_error(err);
        }
    }

    fn push_validation_error(&mut self, err: ValidationError) {
        if let Some(events) = &self.events {
            events.on_validation_error(&err);
        }
        self.errors.push(err);
    }

    fn mark_complete(&mut self, path: Path) {
        self.pending_paths.shift_remove(&path);
        self.completed_paths.insert(path);
    }

    /// The path a new value will occupy: the top frame's own path plus its
    /// pending key (object) or next index (array). See §9 "Pending-key
    /// inclusion" — this is the *target* path, as distinct from a frame's
    /// own (container) path.
    fn current_container_target(&self) -> Path {
        let frame = self
            .stack
            .last()
            .expect("current_container_target requires an open frame");
        match &frame.pending_key {
            Some(key) => frame.path.push_key(key.clone()),
            None => frame.path.push_index(frame.next_index),
        }
    }

    fn current_target_path(&self) -> Path {
        if self.stack.is_empty() {
            Path::root()
        } else {
            self.current_container_target()
        }
    }

    /// Refreshes `pendingFields` with the tokenizer's current non-destructive
    /// partial classification (§4.1 "Lazy tokens and backpressure").
    fn refresh_partial_pending(&mut self) {
        if let Some(prev) = self.partial_path.take() {
            self.pending_paths.shift_remove(&prev);
        }
        let Some(partial) = self.tokenizer.partial_token() else {
            return;
        };
        let path = if self.state == ParserState::ExpectingKey {
            let raw_key = partial.raw.trim_start_matches(['"', '\'']);
            let base = self.stack.last().map(|f| f.path.clone()).unwrap_or_else(Path::root);
            base.push_key(raw_key.to_string())
        } else {
            self.current_target_path()
        };
        self.pending_paths.insert(path.clone());
        self.partial_path = Some(path);
    }

    /// Assembles the currently-growing tree without mutating any state:
    /// walks the stack from innermost to outermost, folding each open
    /// frame's not-yet-assigned child into its parent's clone.
    fn snapshot_value(&self) -> Value {
        if self.stack.is_empty() {
            return self.root.clone().unwrap_or(Value::Null);
        }
        let mut built = self.stack.last().unwrap().to_value();
        for frame in self.stack[..self.stack.len() - 1].iter().rev() {
            built = frame.to_value_with_child(built);
        }
        built
    }

    fn snapshot(&self) -> ParseResult {
        ParseResult {
            complete: self.is_complete(),
            valid: self.errors.is_empty(),
            data: self.snapshot_value(),
            completed_fields: self.completed_paths.iter().map(Path::to_dotted).collect(),
            pending_fields: self.pending_paths.iter().map(Path::to_dotted).collect(),
            errors: self.errors.clone(),
            depth: self.depth_tracker.current(),
            bytes_processed: self.bytes_processed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn value_of(json: &str) -> Value {
        let mut p = Parser::new();
        let result = p.feed(json).unwrap();
        assert!(result.complete, "fixture {json} did not complete: {:?}", result.errors);
        p.result().unwrap()
    }

    #[test]
    fn empty_object() {
        let mut p = Parser::new();
        let result = p.feed("{}").unwrap();
        assert!(result.complete);
        assert_eq!(p.result().unwrap(), Value::Object(IndexMap::new()));
    }

    #[test]
    fn key_split_across_chunks() {
        let mut p = Parser::new();
        let r1 = p.feed(r#"{"na"#).unwrap();
        assert!(!r1.complete);
        assert!(r1.pending_fields.iter().any(|f| f.contains("na")));
        let r2 = p.feed(r#"me": "Jo"#).unwrap();
        assert!(!r2.complete);
        let r3 = p.feed(r#"hn"}"#).unwrap();
        assert!(r3.complete);
        assert_eq!(p.result().unwrap(), value_of(r#"{"name":"John"}"#));
    }

    #[test]
    fn schema_type_mismatch_reported() {
        let schema = value_of(r#"{"type":"object","properties":{"age":{"type":"number"}}}"#);
        let mut p = Parser::with_options(ParserOptions::new().schema(schema)).unwrap();
        let r = p.feed(r#"{"age":"thirty"}"#).unwrap();
        assert!(r.complete);
        assert!(r
            .errors
            .iter()
            .any(|e| e.keyword == ValidationKeyword::Type && e.path == vec!["age"]));
    }

    #[test]
    fn lenient_mode_parses_trailing_comma_and_unquoted_keys() {
        let mut p = Parser::new().llm_mode(true);
        let r = p.feed(r#"{name: "John", age: 30,}"#).unwrap();
        assert!(r.complete, "errors: {:?}", r.errors);
        assert!(r.errors.is_empty());
        assert_eq!(p.result().unwrap(), value_of(r#"{"name":"John","age":30}"#));
    }

    #[test]
    fn required_field_missing_reported() {
        let schema = value_of(r#"{"type":"object","required":["name","age"]}"#);
        let mut p = Parser::with_options(ParserOptions::new().schema(schema)).unwrap();
        let r = p.feed(r#"{"name":"John"}"#).unwrap();
        assert!(r.complete);
        assert!(r
            .errors
            .iter()
            .any(|e| e.keyword == ValidationKeyword::Required && e.message.contains("age")));
    }

    #[test]
    fn tuple_schema_reports_additional_items_at_index() {
        let schema = value_of(
            r#"{"type":"array","items":[{"type":"string"},{"type":"number"}],"additionalItems":false}"#,
        );
        let mut p = Parser::with_options(ParserOptions::new().schema(schema)).unwrap();
        let r = p.feed(r#"["hi", 42, "extra"]"#).unwrap();
        assert!(r
            .errors
            .iter()
            .any(|e| e.keyword == ValidationKeyword::AdditionalItems && e.path == vec!["2"]));
    }

    #[test]
    fn bare_number_completes_on_terminator() {
        let mut p = Parser::new();
        let r1 = p.feed("123").unwrap();
        assert!(!r1.complete);
        let r2 = p.feed(" ").unwrap();
        assert!(r2.complete);
        assert_eq!(p.result().unwrap(), Value::Number(123.0));
    }

    #[test]
    fn depth_exceeded_is_fatal() {
        let mut p = Parser::new().max_depth(2);
        let err = p.feed(r#"{"a":{"b":{"c":1}}}"#).unwrap_err();
        assert!(matches!(err, ParseError::DepthExceeded { limit: 2, .. }));
    }

    #[test]
    fn completed_and_pending_paths_are_disjoint() {
        let mut p = Parser::new();
        let r = p.feed(r#"{"a":1,"b":["#).unwrap();
        let completed: std::collections::HashSet<_> = r.completed_fields.iter().collect();
        let pending: std::collections::HashSet<_> = r.pending_fields.iter().collect();
        assert!(completed.is_disjoint(&pending));
    }
}
