mod cursor;
mod token;

use crate::value::Value;
use cursor::Cursor;
pub use token::{Token, TokenKind};

/// Lexical relaxations the tokenizer itself is responsible for. Trailing
/// commas (§4.2) are purely a parser-level recovery rule and don't belong
/// here — the tokenizer lexes a comma the same way regardless of what sits
/// next to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizerOptions {
    pub allow_single_quotes: bool,
    pub allow_unquoted_keys: bool,
    /// When `true`, an unrecognized character is silently skipped instead of
    /// producing an `Error` token (§4.1: "in lenient mode it is silently
    /// skipped").
    pub lenient: bool,
}

/// What the currently-buffered, not-yet-terminated lexeme would become once
/// its terminator arrives. Returned by `scan_lexeme` when a chunk boundary
/// lands inside a string, key, or number; never used for structural tokens,
/// which are always one character and so never partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartialKind {
    String,
    Key,
    Number,
}

enum ScanOutcome {
    Token(TokenKind, Option<Value>, String, usize),
    /// `Some` when the buffered tail is an unambiguous partial string/key/
    /// number (§4.1's `partialToken` classes). `None` covers everything
    /// else that simply needs more input: an empty buffer, or a strict
    /// prefix of a keyword (an "implicit partial" per §4.1, not one of the
    /// three classes `partialToken` reports).
    Incomplete(Option<PartialKind>),
    /// An unrecognized character; `usize` is its byte length.
    ErrorChar(usize),
}

/// Converts an append-only character stream into tokens, carrying an
/// unconsumed tail across `feed` calls (§4.1).
///
/// The carry buffer only ever holds the tail of the *current* incomplete
/// lexeme: every `feed` call fully drains everything before it.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    carry: String,
    expecting_key: bool,
    options: TokenizerOptions,
}

impl Tokenizer {
    pub fn new(options: TokenizerOptions) -> Self {
        Tokenizer {
            carry: String::new(),
            expecting_key: false,
            options,
        }
    }

    /// A hint from the parser: when `true`, a completed quoted string lexes
    /// as `Key` rather than `String`, and (in lenient mode) an identifier
    /// character begins an unquoted key.
    pub fn set_expecting_key(&mut self, expecting: bool) {
        self.expecting_key = expecting;
    }

    pub fn reset(&mut self) {
        self.carry.clear();
        self.expecting_key = false;
    }

    pub fn carry_len(&self) -> usize {
        self.carry.len()
    }

    /// Appends `chunk` to the carry buffer and returns every token that can
    /// be unambiguously recognized from the accumulated buffer. Anything
    /// left over (the start of an as-yet-unterminated lexeme) stays
    /// buffered for the next call.
    pub fn feed(&mut self, chunk: &str) -> Vec<Token> {
        self.carry.push_str(chunk);
        let mut tokens = Vec::new();
        let mut consumed = 0usize;

        loop {
            consumed += skip_whitespace(&self.carry[consumed..]);
            if consumed >= self.carry.len() {
                break;
            }
            let rest = &self.carry[consumed..];
            match scan_lexeme(rest, self.expecting_key, &self.options) {
                ScanOutcome::Token(kind, value, raw, len) => {
                    tokens.push(Token::complete(kind, value, raw, consumed));
                    consumed += len;
                }
                ScanOutcome::Incomplete(_) => break,
                ScanOutcome::ErrorChar(len) => {
                    if !self.options.lenient {
                        let raw = rest[..len].to_string();
                        tokens.push(Token::error(raw, consumed));
                    }
                    consumed += len;
                }
            }
        }

        self.carry.drain(..consumed);
        tokens
    }

    /// Read-only projection of the buffered tail as a `PartialString`,
    /// `PartialKey`, or `PartialNumber`, when unambiguous. Never advances
    /// any internal position — see §9 "Lazy tokens and backpressure".
    pub fn partial_token(&self) -> Option<Token> {
        let skip = skip_whitespace(&self.carry);
        let rest = &self.carry[skip..];
        if rest.is_empty() {
            return None;
        }
        match scan_lexeme(rest, self.expecting_key, &self.options) {
            ScanOutcome::Incomplete(Some(kind)) => {
                let token_kind = match kind {
                    PartialKind::String => TokenKind::PartialString,
                    PartialKind::Key => TokenKind::PartialKey,
                    PartialKind::Number => TokenKind::PartialNumber,
                };
                Some(Token::partial(token_kind, rest.to_string(), skip))
            }
            _ => None,
        }
    }
}

fn skip_whitespace(s: &str) -> usize {
    let mut n = 0;
    for c in s.chars() {
        if is_whitespace(c) {
            n += c.len_utf8();
        } else {
            break;
        }
    }
    n
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_number_continuation(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')
}

/// `rest` is never empty and never starts with whitespace; callers skip
/// whitespace before calling this.
fn scan_lexeme(rest: &str, expecting_key: bool, options: &TokenizerOptions) -> ScanOutcome {
    let c0 = rest.chars().next().expect("rest is non-empty");

    match c0 {
        '{' => ScanOutcome::Token(TokenKind::LBrace, None, "{".to_string(), 1),
        '}' => ScanOutcome::Token(TokenKind::RBrace, None, "}".to_string(), 1),
        '[' => ScanOutcome::Token(TokenKind::LBracket, None, "[".to_string(), 1),
        ']' => ScanOutcome::Token(TokenKind::RBracket, None, "]".to_string(), 1),
        ':' => ScanOutcome::Token(TokenKind::Colon, None, ":".to_string(), 1),
        ',' => ScanOutcome::Token(TokenKind::Comma, None, ",".to_string(), 1),
        '"' => scan_string(rest, '"', expecting_key),
        '\'' if options.allow_single_quotes => scan_string(rest, '\'', expecting_key),
        '-' | '0'..='9' => scan_number(rest),
        c if expecting_key && options.allow_unquoted_keys && is_identifier_start(c) => {
            scan_unquoted_key(rest)
        }
        't' => scan_keyword(rest, "true", Value::Bool(true), TokenKind::Boolean),
        'f' => scan_keyword(rest, "false", Value::Bool(false), TokenKind::Boolean),
        'n' => scan_keyword(rest, "null", Value::Null, TokenKind::Null),
        c => ScanOutcome::ErrorChar(c.len_utf8()),
    }
}

fn decode_escape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{8}',
        'f' => '\u{c}',
        // \u decodes as the literal character 'u' — documented limitation, §9.
        other => other,
    }
}

fn scan_string(rest: &str, quote: char, expecting_key: bool) -> ScanOutcome {
    let mut cursor = Cursor::new(rest);
    cursor.bump(); // opening quote
    let mut buf = String::new();

    loop {
        match cursor.first() {
            None => {
                let kind = if expecting_key { PartialKind::Key } else { PartialKind::String };
                return ScanOutcome::Incomplete(Some(kind));
            }
            Some('\\') => {
                cursor.bump();
                match cursor.bump() {
                    None => {
                        let kind = if expecting_key { PartialKind::Key } else { PartialKind::String };
                        return ScanOutcome::Incomplete(Some(kind));
                    }
                    Some(escaped) => buf.push(decode_escape(escaped)),
                }
            }
            Some(c) if c == quote => {
                cursor.bump();
                let kind = if expecting_key { TokenKind::Key } else { TokenKind::String };
                return ScanOutcome::Token(kind, Some(Value::String(buf)), cursor.consumed().to_string(), cursor.pos());
            }
            Some(c) => {
                cursor.bump();
                buf.push(c);
            }
        }
    }
}

fn scan_number(rest: &str) -> ScanOutcome {
    let mut pos = 0usize;
    for c in rest.chars() {
        if is_number_continuation(c) {
            pos += c.len_utf8();
        } else {
            break;
        }
    }

    if pos == rest.len() {
        // Ran off the end of the buffer still matching continuation
        // characters: more digits could be coming in the next chunk.
        return ScanOutcome::Incomplete(Some(PartialKind::Number));
    }

    let raw = &rest[..pos];
    match raw.chars().last() {
        Some('e') | Some('E') | Some('.') | Some('-') | Some('+') => {
            ScanOutcome::Incomplete(Some(PartialKind::Number))
        }
        _ => match raw.parse::<f64>() {
            Ok(n) => ScanOutcome::Token(TokenKind::Number, Some(Value::Number(n)), raw.to_string(), pos),
            Err(_) => ScanOutcome::ErrorChar(pos),
        },
    }
}

fn scan_keyword(rest: &str, literal: &str, value: Value, kind: TokenKind) -> ScanOutcome {
    let llen = literal.len();
    if rest.len() < llen {
        return if literal.as_bytes()[..rest.len()] == *rest.as_bytes() {
            // A strict prefix at buffer end: wait for more input. This is
            // the "implicit partial" §4.1 describes — not a partialToken
            // class, just no token yet.
            ScanOutcome::Incomplete(None)
        } else {
            ScanOutcome::ErrorChar(first_char_len(rest))
        };
    }

    if &rest[..llen] != literal {
        return ScanOutcome::ErrorChar(first_char_len(rest));
    }

    match rest[llen..].chars().next() {
        None => ScanOutcome::Token(kind, Some(value), literal.to_string(), llen),
        Some(c) if is_identifier_char(c) => ScanOutcome::Incomplete(None),
        Some(_) => ScanOutcome::Token(kind, Some(value), literal.to_string(), llen),
    }
}

fn scan_unquoted_key(rest: &str) -> ScanOutcome {
    let mut pos = 0usize;
    for c in rest.chars() {
        if is_identifier_char(c) {
            pos += c.len_utf8();
        } else {
            break;
        }
    }
    if pos == rest.len() {
        return ScanOutcome::Incomplete(Some(PartialKind::Key));
    }
    let raw = rest[..pos].to_string();
    ScanOutcome::Token(TokenKind::Key, Some(Value::String(raw.clone())), raw, pos)
}

fn first_char_len(s: &str) -> usize {
    s.chars().next().map(char::len_utf8).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> Tokenizer {
        Tokenizer::new(TokenizerOptions::default())
    }

    #[test]
    fn structural_tokens() {
        let mut t = strict();
        let toks = t.feed("{}[]:,");
        let kinds: Vec<_> = toks.iter().map(|tk| tk.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Colon,
                TokenKind::Comma,
            ]
        );
    }

    #[test]
    fn string_split_across_feeds() {
        let mut t = strict();
        assert!(t.feed("\"na").is_empty());
        assert_eq!(
            t.partial_token().map(|p| p.kind),
            Some(TokenKind::PartialString)
        );
        let toks = t.feed("me\"");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::String);
        assert_eq!(toks[0].value, Some(Value::String("name".to_string())));
    }

    #[test]
    fn expecting_key_emits_key_kind() {
        let mut t = strict();
        t.set_expecting_key(true);
        let toks = t.feed("\"age\"");
        assert_eq!(toks[0].kind, TokenKind::Key);
    }

    #[test]
    fn number_waits_on_exponent_boundary() {
        let mut t = strict();
        let toks = t.feed("1e");
        assert!(toks.is_empty());
        assert_eq!(
            t.partial_token().map(|p| p.kind),
            Some(TokenKind::PartialNumber)
        );
        let toks = t.feed("5 ");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].value, Some(Value::Number(1e5)));
    }

    #[test]
    fn number_needs_terminator_even_with_trailing_whitespace() {
        let mut t = strict();
        let toks = t.feed("123");
        assert!(toks.is_empty());
        assert_eq!(
            t.partial_token().map(|p| p.kind),
            Some(TokenKind::PartialNumber)
        );
        let toks = t.feed(" ");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].value, Some(Value::Number(123.0)));
    }

    #[test]
    fn keyword_prefix_is_not_a_reported_partial() {
        let mut t = strict();
        let toks = t.feed("tru");
        assert!(toks.is_empty());
        assert_eq!(t.partial_token(), None);
        let toks = t.feed("e,");
        assert_eq!(toks[0].kind, TokenKind::Boolean);
        assert_eq!(toks[0].value, Some(Value::Bool(true)));
    }

    #[test]
    fn keyword_at_buffer_end_is_emitted_anyway() {
        let mut t = strict();
        let toks = t.feed("null");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::Null);
    }

    #[test]
    fn strict_mode_errors_on_unknown_char() {
        let mut t = strict();
        let toks = t.feed("{~}");
        let kinds: Vec<_> = toks.iter().map(|tk| tk.kind).collect();
        assert_eq!(kinds, vec![TokenKind::LBrace, TokenKind::Error, TokenKind::RBrace]);
    }

    #[test]
    fn lenient_mode_skips_unknown_char() {
        let mut t = Tokenizer::new(TokenizerOptions {
            lenient: true,
            ..Default::default()
        });
        let toks = t.feed("{~}");
        let kinds: Vec<_> = toks.iter().map(|tk| tk.kind).collect();
        assert_eq!(kinds, vec![TokenKind::LBrace, TokenKind::RBrace]);
    }

    #[test]
    fn single_quotes_only_in_lenient_mode() {
        let mut lenient = Tokenizer::new(TokenizerOptions {
            allow_single_quotes: true,
            ..Default::default()
        });
        let toks = lenient.feed("'hi'");
        assert_eq!(toks[0].kind, TokenKind::String);
        assert_eq!(toks[0].value, Some(Value::String("hi".to_string())));
    }

    #[test]
    fn unquoted_key_in_lenient_mode() {
        let mut t = Tokenizer::new(TokenizerOptions {
            allow_unquoted_keys: true,
            ..Default::default()
        });
        t.set_expecting_key(true);
        let toks = t.feed("name:");
        assert_eq!(toks[0].kind, TokenKind::Key);
        assert_eq!(toks[0].value, Some(Value::String("name".to_string())));
        assert_eq!(toks[1].kind, TokenKind::Colon);
    }
}
