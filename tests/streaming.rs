use streamjson::{ParseError, ParserOptions, ValidationKeyword};
use streamjson::{Parser, Value};

fn parsed(json: &str) -> Value {
    let mut parser = Parser::new();
    parser.feed(json).unwrap();
    parser.result().unwrap()
}

#[test]
fn empty_object_completes_immediately() {
    let mut parser = Parser::new();
    let result = parser.feed("{}").unwrap();
    assert!(result.complete);
    assert!(result.valid);
    assert_eq!(parser.result().unwrap(), parsed("{}"));
}

#[test]
fn key_arriving_across_three_chunks_resolves_once_whole() {
    let mut parser = Parser::new();
    let r1 = parser.feed(r#"{"na"#).unwrap();
    assert!(!r1.complete);
    assert!(r1.pending_fields.iter().any(|f| f == "na"));

    let r2 = parser.feed(r#"me":"#).unwrap();
    assert!(!r2.complete);

    let r3 = parser.feed(r#" "Ada"}"#).unwrap();
    assert!(r3.complete);
    assert_eq!(parser.result().unwrap(), parsed(r#"{"name":"Ada"}"#));
}

#[test]
fn schema_mismatch_is_reported_at_the_offending_path() {
    let schema = parsed(r#"{"type":"object","properties":{"age":{"type":"number"}}}"#);
    let mut parser = Parser::with_options(ParserOptions::new().schema(schema)).unwrap();
    let result = parser.feed(r#"{"age":"old"}"#).unwrap();
    assert!(result.complete);
    assert!(!result.valid);
    assert!(result
        .errors
        .iter()
        .any(|e| e.keyword == ValidationKeyword::Type && e.path == vec!["age"]));
}

#[test]
fn llm_mode_tolerates_unquoted_keys_and_trailing_commas() {
    let mut parser = Parser::new().llm_mode(true);
    let result = parser
        .feed(r#"{name: 'Ada', langs: ['rust', 'ocaml',],}"#)
        .unwrap();
    assert!(result.complete, "errors: {:?}", result.errors);
    assert_eq!(
        parser.result().unwrap(),
        parsed(r#"{"name":"Ada","langs":["rust","ocaml"]}"#)
    );
}

#[test]
fn required_property_missing_from_a_streamed_object_is_reported() {
    let schema = parsed(r#"{"type":"object","required":["name","email"]}"#);
    let mut parser = Parser::with_options(ParserOptions::new().schema(schema)).unwrap();
    let result = parser.feed(r#"{"name":"Ada"}"#).unwrap();
    assert!(result.complete);
    assert!(result
        .errors
        .iter()
        .any(|e| e.keyword == ValidationKeyword::Required && e.message.contains("email")));
}

#[test]
fn tuple_schema_flags_extra_elements_at_their_index() {
    let schema = parsed(
        r#"{"type":"array","items":[{"type":"string"},{"type":"number"}],"additionalItems":false}"#,
    );
    let mut parser = Parser::with_options(ParserOptions::new().schema(schema)).unwrap();
    let result = parser.feed(r#"["Ada", 1815, "extra"]"#).unwrap();
    assert!(result
        .errors
        .iter()
        .any(|e| e.keyword == ValidationKeyword::AdditionalItems && e.path == vec!["2"]));
}

#[test]
fn bare_root_number_only_completes_once_a_terminator_arrives() {
    let mut parser = Parser::new();
    let r1 = parser.feed("18").unwrap();
    assert!(!r1.complete);
    let r2 = parser.feed("15").unwrap();
    assert!(!r2.complete);
    let r3 = parser.feed(",").unwrap_err();
    match r3 {
        ParseError::Syntax { .. } => {}
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn depth_exceeded_is_a_fatal_error() {
    let mut parser = Parser::new().max_depth(1);
    let err = parser.feed(r#"{"a":{"b":1}}"#).unwrap_err();
    assert!(matches!(err, ParseError::DepthExceeded { limit: 1, .. }));
}

#[test]
fn completed_and_pending_fields_never_overlap_mid_stream() {
    let mut parser = Parser::new();
    let result = parser.feed(r#"{"a":1,"b":{"c":"#).unwrap();
    for field in &result.completed_fields {
        assert!(!result.pending_fields.contains(field));
    }
}

#[test]
fn reset_clears_state_for_reuse() {
    let mut parser = Parser::new();
    parser.feed(r#"{"a":1}"#).unwrap();
    assert!(parser.is_complete());
    parser.reset();
    assert!(!parser.is_complete());
    let result = parser.feed(r#"{"b":2}"#).unwrap();
    assert!(result.complete);
    assert_eq!(parser.result().unwrap(), parsed(r#"{"b":2}"#));
}
