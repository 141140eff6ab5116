use super::ParserEvents;
use crate::limit::DEFAULT_MAX_DEPTH;
use crate::value::Value;
use std::rc::Rc;

/// `{schema?, llmMode?, allowTrailingCommas?, allowUnquotedKeys?,
/// allowSingleQuotes?, maxDepth?=100, events?}` from §6.
///
/// `llm_mode = true` implies each unset lenient flag is `true`; an
/// explicit `Some(false)` on an individual flag still wins.
pub struct ParserOptions {
    pub schema: Option<Value>,
    pub llm_mode: bool,
    pub allow_trailing_commas: Option<bool>,
    pub allow_unquoted_keys: Option<bool>,
    pub allow_single_quotes: Option<bool>,
    pub max_depth: usize,
    pub events: Option<Rc<dyn ParserEvents>>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            schema: None,
            llm_mode: false,
            allow_trailing_commas: None,
            allow_unquoted_keys: None,
            allow_single_quotes: None,
            max_depth: DEFAULT_MAX_DEPTH,
            events: None,
        }
    }
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn llm_mode(mut self, enabled: bool) -> Self {
        self.llm_mode = enabled;
        self
    }

    pub fn allow_trailing_commas(mut self, enabled: bool) -> Self {
        self.allow_trailing_commas = Some(enabled);
        self
    }

    pub fn allow_unquoted_keys(mut self, enabled: bool) -> Self {
        self.allow_unquoted_keys = Some(enabled);
        self
    }

    pub fn allow_single_quotes(mut self, enabled: bool) -> Self {
        self.allow_single_quotes = Some(enabled);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn events(mut self, events: Rc<dyn ParserEvents>) -> Self {
        self.events = Some(events);
        self
    }
}
