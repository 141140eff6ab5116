#![cfg(test)]

use crate::parser::Parser;
use crate::value::Value;

/// Parses a complete, well-formed JSON fixture in one shot. For use by
/// other modules' test fixtures (schema bodies, expected values) — not a
/// general-purpose entry point.
pub(crate) fn parse_json(input: &str) -> Value {
    let mut parser = Parser::new();
    parser.feed(input).expect("test fixture JSON must parse without fatal errors");
    parser.result().expect("test fixture JSON must reach Complete")
}
