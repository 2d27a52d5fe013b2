//! SQL Tokenizer implementation.

use std::iter::Peekable;
use std::str::Chars;

use super::{Keyword, LexError, Span, Token, TokenKind};
use crate::dialect::{Dialect, PostgresDialect};

/// Characters that may form an operator.
const OPERATOR_CHARS: &str = "+-*/<>=~!@#%^&|`?";

/// Characters that allow a multi-character operator to end in `+` or `-`.
const OPERATOR_SPECIAL_CHARS: &str = "~!@#^&|`?%";

/// A lexer that tokenizes SQL input.
///
/// The lexer is a single-pass iterator: it yields tokens up to and including
/// [`TokenKind::Eof`], or stops after the first [`LexError`]. Re-create it to
/// scan the input again.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// Set once `Eof` or an error has been yielded by the iterator.
    finished: bool,
    /// Non-fatal notices raised while scanning.
    notices: Vec<String>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            finished: false,
            notices: Vec::new(),
        }
    }

    /// Returns the input being scanned.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Takes the notices collected so far.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            while self.peek().is_some_and(is_whitespace) {
                self.advance();
            }

            // Single-line comment (-- ...)
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // Block comment (/* ... */), which may nest
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                let comment_start = self.pos;
                self.advance();
                self.advance();
                let mut depth = 1;
                while depth > 0 {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            depth -= 1;
                        }
                        Some('/') if self.peek() == Some('*') => {
                            self.advance();
                            depth += 1;
                        }
                        Some(_) => {}
                        None => {
                            return Err(self.error_from(comment_start, "unterminated /* comment"));
                        }
                    }
                }
                continue;
            }

            return Ok(());
        }
    }

    /// Creates a span from start to current position.
    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    /// Builds an error for the token starting at `start`, quoting the rest of the input.
    fn error_from(&self, start: usize, message: &str) -> LexError {
        let near = &self.input[start..];
        LexError::new(
            format!("{message} at or near \"{near}\""),
            Span::new(start, self.input.len()),
        )
    }

    /// Builds an error covering the current token.
    fn error_here(&self, message: &str) -> LexError {
        let near = &self.input[self.start..self.pos];
        LexError::new(
            format!("{message} at or near \"{near}\""),
            self.make_span(),
        )
    }

    /// Shortens over-long identifiers, recording a notice.
    fn truncate_identifier(&mut self, mut name: String) -> String {
        let max = PostgresDialect.max_identifier_length();
        if name.len() > max {
            let mut cut = max;
            while !name.is_char_boundary(cut) {
                cut -= 1;
            }
            let truncated = name[..cut].to_string();
            tracing::debug!(identifier = %name, "truncating identifier");
            self.notices.push(format!(
                "NOTICE:  identifier \"{name}\" will be truncated to \"{truncated}\""
            ));
            name.truncate(cut);
        }
        name
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(is_identifier_char) {
            self.advance();
        }

        let folded = self.input[self.start..self.pos].to_ascii_lowercase();

        if let Some(keyword) = Keyword::lookup(&folded) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            let name = self.truncate_identifier(folded);
            self.make_token(TokenKind::Identifier(name))
        }
    }

    /// Scans a double-quoted identifier.
    fn scan_quoted_identifier(&mut self) -> Result<Token, LexError> {
        let name = self.scan_quoted_identifier_body()?;
        self.finish_quoted_identifier(name)
    }

    fn scan_quoted_identifier_body(&mut self) -> Result<String, LexError> {
        self.advance(); // consume opening quote
        let mut name = String::new();

        loop {
            match self.advance() {
                Some('"') if self.peek() == Some('"') => {
                    self.advance();
                    name.push('"');
                }
                Some('"') => return Ok(name),
                Some(c) => name.push(c),
                None => {
                    return Err(self.error_from(self.start, "unterminated quoted identifier"));
                }
            }
        }
    }

    fn finish_quoted_identifier(&mut self, name: String) -> Result<Token, LexError> {
        if name.is_empty() {
            return Err(self.error_here("zero-length delimited identifier"));
        }
        let name = self.truncate_identifier(name);
        Ok(self.make_token(TokenKind::QuotedIdentifier(name)))
    }

    /// Scans `U&'...'` or `U&"..."` with an optional `UESCAPE 'c'` clause.
    fn scan_unicode_escaped(&mut self) -> Result<Token, LexError> {
        self.advance(); // consume U
        self.advance(); // consume &
        if self.peek() == Some('"') {
            let raw = self.scan_quoted_identifier_body()?;
            let escape = self.scan_uescape()?;
            let name = self.decode_unicode_escapes(&raw, escape)?;
            self.finish_quoted_identifier(name)
        } else {
            let raw = self.scan_string_value(false)?;
            let escape = self.scan_uescape()?;
            let value = self.decode_unicode_escapes(&raw, escape)?;
            Ok(self.make_token(TokenKind::String(value)))
        }
    }

    /// Consumes a trailing `UESCAPE 'c'` and returns the escape character,
    /// which defaults to a backslash.
    fn scan_uescape(&mut self) -> Result<char, LexError> {
        let resume = self.pos;
        self.skip_whitespace_and_comments()?;
        let rest = &self.input[self.pos..];
        let is_uescape = rest
            .get(..7)
            .is_some_and(|word| word.eq_ignore_ascii_case("uescape"))
            && !rest[7..].starts_with(is_identifier_char);
        if !is_uescape {
            self.pos = resume;
            return Ok('\\');
        }
        self.pos += 7;
        self.skip_whitespace_and_comments()?;

        let clause_start = self.pos;
        let mut chars = self.input[self.pos..].chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some('\''), Some(c), Some('\''))
                if !(c.is_ascii_hexdigit() || is_whitespace(c) || matches!(c, '+' | '\'' | '"')) =>
            {
                self.pos += 2 + c.len_utf8();
                Ok(c)
            }
            _ => Err(self.error_from(clause_start, "invalid Unicode escape character")),
        }
    }

    /// Decodes `\XXXX` and `\+XXXXXX` escapes (with `escape` in place of the
    /// backslash); a doubled escape character stands for itself.
    fn decode_unicode_escapes(&self, raw: &str, escape: char) -> Result<String, LexError> {
        let mut value = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            if c != escape {
                value.push(c);
                continue;
            }
            if chars.next_if_eq(&escape).is_some() {
                value.push(escape);
                continue;
            }
            let Some(mut code) = read_escape_code(&mut chars) else {
                return Err(self.error_here("invalid Unicode escape"));
            };
            if (0xD800..0xDC00).contains(&code) {
                let low = chars
                    .next_if_eq(&escape)
                    .and_then(|_| read_escape_code(&mut chars))
                    .filter(|low| (0xDC00..0xE000).contains(low));
                let Some(low) = low else {
                    return Err(self.error_here("invalid Unicode surrogate pair"));
                };
                code = 0x1_0000 + ((code - 0xD800) << 10) + (low - 0xDC00);
            }
            match char::from_u32(code).filter(|c| *c != '\0') {
                Some(c) => value.push(c),
                None => return Err(self.error_here("invalid Unicode escape value")),
            }
        }
        Ok(value)
    }

    /// Consumes a run of ASCII digits.
    fn scan_digits(&mut self) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            count += 1;
        }
        count
    }

    /// Scans a number (integer or numeric).
    fn scan_number(&mut self) -> Result<Token, LexError> {
        let mut is_integer = true;

        self.scan_digits();

        // Decimal point; `1.` and `.5` are both valid
        if self.peek() == Some('.') && self.peek_next() != Some('.') {
            is_integer = false;
            self.advance();
            self.scan_digits();
        }

        // Exponent
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            is_integer = false;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            if self.scan_digits() == 0 {
                return Err(self.error_here("trailing junk after numeric literal"));
            }
        }

        if self.peek().is_some_and(is_identifier_start) {
            self.advance();
            return Err(self.error_here("trailing junk after numeric literal"));
        }

        let text = &self.input[self.start..self.pos];
        let kind = if is_integer {
            text.parse::<i64>()
                .map_or_else(|_| TokenKind::Numeric(text.to_string()), TokenKind::Integer)
        } else {
            TokenKind::Numeric(text.to_string())
        };
        Ok(self.make_token(kind))
    }

    /// Scans the body of a standard string literal, after the opening quote.
    fn scan_quoted_body(&mut self, value: &mut String, escapes: bool) -> Result<(), LexError> {
        loop {
            match self.advance() {
                Some('\'') if self.peek() == Some('\'') => {
                    self.advance();
                    value.push('\'');
                }
                Some('\'') => return Ok(()),
                Some('\\') if escapes => self.scan_escape(value)?,
                Some(c) => value.push(c),
                None => {
                    return Err(self.error_from(self.start, "unterminated quoted string"));
                }
            }
        }
    }

    /// Scans a string literal, including continuation segments.
    ///
    /// `escapes` enables backslash escapes (`E'...'`).
    fn scan_string(&mut self, escapes: bool) -> Result<Token, LexError> {
        let value = self.scan_string_value(escapes)?;
        Ok(self.make_token(TokenKind::String(value)))
    }

    fn scan_string_value(&mut self, escapes: bool) -> Result<String, LexError> {
        self.advance(); // consume opening quote
        let mut value = String::new();
        self.scan_quoted_body(&mut value, escapes)?;

        // 'foo'
        // 'bar' is the single string 'foobar'
        loop {
            let resume = self.pos;
            let mut saw_newline = false;
            while let Some(c) = self.peek().filter(|c| is_whitespace(*c)) {
                saw_newline |= c == '\n' || c == '\r';
                self.advance();
            }
            if saw_newline && self.peek() == Some('\'') {
                self.advance();
                self.scan_quoted_body(&mut value, escapes)?;
            } else {
                self.pos = resume;
                break;
            }
        }

        Ok(value)
    }

    /// Decodes one backslash escape inside an `E'...'` string.
    fn scan_escape(&mut self, value: &mut String) -> Result<(), LexError> {
        let escape_start = self.pos - 1;
        let Some(c) = self.advance() else {
            return Err(self.error_from(self.start, "unterminated quoted string"));
        };
        match c {
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.advance();
                        }
                        None => break,
                    }
                }
                self.push_code_point(value, code, escape_start)?;
            }
            'x' if self.peek().is_some_and(|d| d.is_ascii_hexdigit()) => {
                let code = self.scan_hex_digits(2);
                self.push_code_point(value, code, escape_start)?;
            }
            'u' | 'U' => {
                let width = if c == 'u' { 4 } else { 8 };
                let digits_start = self.pos;
                let code = self.scan_hex_digits(width);
                if self.pos - digits_start != width {
                    return Err(LexError::new(
                        "invalid Unicode escape",
                        Span::new(escape_start, self.pos),
                    ));
                }
                self.push_code_point(value, code, escape_start)?;
            }
            other => value.push(other),
        }
        Ok(())
    }

    /// Reads up to `max` hex digits.
    fn scan_hex_digits(&mut self, max: usize) -> u32 {
        let mut code = 0;
        for _ in 0..max {
            match self.peek().and_then(|d| d.to_digit(16)) {
                Some(d) => {
                    code = code * 16 + d;
                    self.advance();
                }
                None => break,
            }
        }
        code
    }

    fn push_code_point(
        &self,
        value: &mut String,
        code: u32,
        escape_start: usize,
    ) -> Result<(), LexError> {
        match char::from_u32(code).filter(|c| *c != '\0') {
            Some(c) => {
                value.push(c);
                Ok(())
            }
            None => Err(LexError::new(
                "invalid Unicode escape value",
                Span::new(escape_start, self.pos),
            )),
        }
    }

    /// Scans a bit string (`B'0101'`) or hex string (`X'1F'`).
    fn scan_bit_string(&mut self, radix: char) -> Result<Token, LexError> {
        self.advance(); // consume B/X
        self.advance(); // consume opening quote
        let mut digits = String::new();
        digits.push(radix);

        loop {
            match self.advance() {
                Some('\'') => break,
                Some(c) if radix == 'b' && (c == '0' || c == '1') => digits.push(c),
                Some(c) if radix == 'x' && c.is_ascii_hexdigit() => digits.push(c),
                Some(c) => {
                    let kind = if radix == 'b' { "binary" } else { "hexadecimal" };
                    return Err(LexError::new(
                        format!("\"{c}\" is not a valid {kind} digit"),
                        Span::new(self.start, self.pos),
                    ));
                }
                None => {
                    return Err(self.error_from(self.start, "unterminated bit string literal"));
                }
            }
        }

        Ok(self.make_token(TokenKind::BitString(digits)))
    }

    /// Scans a `$`-prefixed token: a positional parameter or a dollar-quoted string.
    fn scan_dollar(&mut self) -> Result<Token, LexError> {
        self.advance(); // consume $

        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let digits_start = self.pos;
            self.scan_digits();
            if self.peek().is_some_and(is_identifier_char) {
                self.advance();
                return Err(self.error_here("trailing junk after parameter"));
            }
            return match self.input[digits_start..self.pos].parse::<u32>() {
                Ok(n) if n > 0 && i32::try_from(n).is_ok() => {
                    Ok(self.make_token(TokenKind::Param(n)))
                }
                _ => Err(self.error_here("invalid parameter number")),
            };
        }

        // Dollar-quote tag: $$ or $tag$
        let tag_start = self.start;
        if self.peek().is_some_and(|c| c != '$' && is_identifier_start(c)) {
            while self.peek().is_some_and(|c| c != '$' && is_identifier_char(c)) {
                self.advance();
            }
        }
        if self.peek() != Some('$') {
            return Err(self.error_here("syntax error"));
        }
        self.advance();
        let tag = &self.input[tag_start..self.pos];
        let body_start = self.pos;

        match self.input[body_start..].find(tag) {
            Some(len) => {
                let value = self.input[body_start..body_start + len].to_string();
                self.pos = body_start + len + tag.len();
                Ok(self.make_token(TokenKind::String(value)))
            }
            None => {
                self.pos = self.input.len();
                Err(self.error_from(self.start, "unterminated dollar-quoted string"))
            }
        }
    }

    /// Scans an operator using maximal munch, with PostgreSQL's restrictions.
    fn scan_operator(&mut self) -> Token {
        while self.peek().is_some_and(|c| OPERATOR_CHARS.contains(c)) {
            // A comment start ends the operator.
            let rest = &self.input[self.pos..];
            if self.pos > self.start && (rest.starts_with("--") || rest.starts_with("/*")) {
                break;
            }
            self.advance();
        }

        let mut op = &self.input[self.start..self.pos];
        if op.len() > 1 && (op.ends_with('+') || op.ends_with('-')) {
            let head = &op[..op.len() - 1];
            if !head.chars().any(|c| OPERATOR_SPECIAL_CHARS.contains(c)) {
                while op.len() > 1 && (op.ends_with('+') || op.ends_with('-')) {
                    op = &op[..op.len() - 1];
                }
            }
        }
        self.pos = self.start + op.len();

        self.make_token(TokenKind::from_operator(op))
    }

    /// Scans the next token.
    ///
    /// After the end of the input this keeps returning `Eof`.
    ///
    /// # Errors
    ///
    /// Returns a `LexError` for malformed tokens and unterminated comments.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(self.make_token(TokenKind::Eof));
        };
        let next = self.peek_next();

        match c {
            '(' | ')' | '[' | ']' | ',' | ';' => {
                self.advance();
                Ok(self.make_token(match c {
                    '(' => TokenKind::LeftParen,
                    ')' => TokenKind::RightParen,
                    '[' => TokenKind::LeftBracket,
                    ']' => TokenKind::RightBracket,
                    ',' => TokenKind::Comma,
                    _ => TokenKind::Semicolon,
                }))
            }
            ':' => {
                self.advance();
                if self.peek() == Some(':') {
                    self.advance();
                    Ok(self.make_token(TokenKind::DoubleColon))
                } else {
                    Ok(self.make_token(TokenKind::Colon))
                }
            }
            '.' if next.is_some_and(|d| d.is_ascii_digit()) => self.scan_number(),
            '.' => {
                self.advance();
                Ok(self.make_token(TokenKind::Dot))
            }

            '\'' => self.scan_string(false),
            '"' => self.scan_quoted_identifier(),
            '$' => self.scan_dollar(),

            // Prefixed string literals
            'e' | 'E' if next == Some('\'') => {
                self.advance();
                self.scan_string(true)
            }
            'n' | 'N' if next == Some('\'') => {
                self.advance();
                self.scan_string(false)
            }
            'u' | 'U'
                if next == Some('&')
                    && matches!(self.input[self.pos..].chars().nth(2), Some('\'' | '"')) =>
            {
                self.scan_unicode_escaped()
            }
            'b' | 'B' if next == Some('\'') => self.scan_bit_string('b'),
            'x' | 'X' if next == Some('\'') => self.scan_bit_string('x'),

            c if c.is_ascii_digit() => self.scan_number(),
            c if is_identifier_start(c) => Ok(self.scan_identifier()),
            c if OPERATOR_CHARS.contains(c) => Ok(self.scan_operator()),

            _ => {
                self.advance();
                Err(self.error_here("syntax error: unexpected character"))
            }
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending with `Eof`.
    ///
    /// # Errors
    ///
    /// Returns the first `LexError` encountered.
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        self.finished = result.as_ref().map_or(true, Token::is_eof);
        Some(result)
    }
}

/// Reads the hex digits of a `\XXXX` or `\+XXXXXX` escape, after the escape
/// character.
fn read_escape_code(chars: &mut Peekable<Chars<'_>>) -> Option<u32> {
    let width = if chars.next_if_eq(&'+').is_some() { 6 } else { 4 };
    let mut code = 0;
    for _ in 0..width {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    Some(code)
}

/// Whitespace as understood by the SQL lexer.
const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{b}' | '\u{c}')
}

/// Returns true if `c` may start an unquoted identifier.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Returns true if `c` may continue an unquoted identifier.
fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit() || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize().unwrap()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn lex_err(input: &str) -> LexError {
        Lexer::new(input)
            .tokenize()
            .expect_err(&format!("Expected lex error for: {input}"))
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(String::from(name))
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, TokenKind::Eof));
    }

    #[test]
    fn test_whitespace_only() {
        let tokens = tokenize("   \n\t  ");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, TokenKind::Eof));
        assert_eq!(tokens[0].span, Span::at(7));
    }

    #[test]
    fn test_single_line_comment() {
        assert_eq!(
            token_kinds("SELECT -- comment\nFROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_multi_line_comment() {
        assert_eq!(
            token_kinds("SELECT /* comment */ FROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_nested_comment() {
        let tokens = tokenize("/* a /* b */ c */ x");
        assert_eq!(tokens[0].kind, ident("x"));
        assert_eq!(tokens[0].span, Span::new(18, 19));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = lex_err("SELECT /* oops");
        assert!(err.message.starts_with("unterminated /* comment"));
        assert_eq!(err.span.start, 7);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers_are_folded() {
        assert_eq!(
            token_kinds("Foo bar_baz _qux a$b café"),
            vec![
                ident("foo"),
                ident("bar_baz"),
                ident("_qux"),
                ident("a$b"),
                ident("café"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(
            token_kinds("\"Column Name\" \"select\" \"a\"\"b\""),
            vec![
                TokenKind::QuotedIdentifier(String::from("Column Name")),
                TokenKind::QuotedIdentifier(String::from("select")),
                TokenKind::QuotedIdentifier(String::from("a\"b")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_empty_quoted_identifier() {
        let err = lex_err("SELECT \"\"");
        assert!(err.message.starts_with("zero-length delimited identifier"));
        assert_eq!(err.span.start, 7);
    }

    #[test]
    fn test_long_identifier_is_truncated() {
        let long = "a".repeat(70);
        let mut lexer = Lexer::new(&long);
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, ident(&"a".repeat(63)));
        assert_eq!(token.span, Span::new(0, 70));
        let notices = lexer.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("will be truncated"));
    }

    #[test]
    fn test_integers() {
        assert_eq!(
            token_kinds("42 0 123456789"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Integer(0),
                TokenKind::Integer(123_456_789),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numerics_keep_their_text() {
        assert_eq!(
            token_kinds("3.14 .5 5. 1e10 2.5E-3 99999999999999999999"),
            vec![
                TokenKind::Numeric(String::from("3.14")),
                TokenKind::Numeric(String::from(".5")),
                TokenKind::Numeric(String::from("5.")),
                TokenKind::Numeric(String::from("1e10")),
                TokenKind::Numeric(String::from("2.5E-3")),
                TokenKind::Numeric(String::from("99999999999999999999")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_trailing_junk_after_number() {
        let err = lex_err("SELECT 123abc");
        assert!(err.message.starts_with("trailing junk after numeric literal"));
        assert_eq!(err.span.start, 7);

        let err = lex_err("SELECT 1e");
        assert!(err.message.starts_with("trailing junk"));
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            token_kinds("'hello' 'it''s' ''"),
            vec![
                TokenKind::String(String::from("hello")),
                TokenKind::String(String::from("it's")),
                TokenKind::String(String::new()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_continuation_requires_newline() {
        assert_eq!(
            token_kinds("'foo'\n  'bar'"),
            vec![TokenKind::String(String::from("foobar")), TokenKind::Eof]
        );
        assert_eq!(
            token_kinds("'foo' 'bar'"),
            vec![
                TokenKind::String(String::from("foo")),
                TokenKind::String(String::from("bar")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_escape_strings() {
        assert_eq!(
            token_kinds(r"E'a\tb\n' e'\x41\101é' E'\'q'"),
            vec![
                TokenKind::String(String::from("a\tb\n")),
                TokenKind::String(String::from("AAé")),
                TokenKind::String(String::from("'q")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unicode_escape_strings() {
        assert_eq!(
            token_kinds(r#"U&'d\0061t\+000061' u&"\00e9t\\" U&'d!0061t' UESCAPE '!'"#),
            vec![
                TokenKind::String(String::from("data")),
                TokenKind::QuotedIdentifier(String::from("\u{e9}t\\")),
                TokenKind::String(String::from("dat")),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            token_kinds(r"U&'\D83D\DE00'"),
            vec![TokenKind::String(String::from("\u{1F600}")), TokenKind::Eof]
        );
        // Without the ampersand directly after U it is an identifier
        assert_eq!(token_kinds("u &")[0], ident("u"));
    }

    #[test]
    fn test_invalid_unicode_escapes() {
        assert!(lex_err(r"U&'\00'").message.starts_with("invalid Unicode escape"));
        assert!(lex_err(r"U&'\D83D'")
            .message
            .starts_with("invalid Unicode surrogate pair"));
        assert!(lex_err(r"U&'x' UESCAPE 'a'")
            .message
            .starts_with("invalid Unicode escape character"));
    }

    #[test]
    fn test_standard_string_keeps_backslash() {
        assert_eq!(
            token_kinds(r"'a\nb'"),
            vec![TokenKind::String(String::from(r"a\nb")), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex_err("SELECT 'abc");
        assert_eq!(err.message, "unterminated quoted string at or near \"'abc\"");
        assert_eq!(err.span.start, 7);
    }

    #[test]
    fn test_dollar_quoted_strings() {
        assert_eq!(
            token_kinds("$$it's$$ $fn$ a $$ b $fn$"),
            vec![
                TokenKind::String(String::from("it's")),
                TokenKind::String(String::from(" a $$ b ")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_dollar_quote() {
        let err = lex_err("SELECT $q$ abc");
        assert!(err.message.starts_with("unterminated dollar-quoted string"));
        assert_eq!(err.span.start, 7);
    }

    #[test]
    fn test_bit_strings() {
        assert_eq!(
            token_kinds("B'0101' x'1F'"),
            vec![
                TokenKind::BitString(String::from("b0101")),
                TokenKind::BitString(String::from("x1F")),
                TokenKind::Eof,
            ]
        );
        let err = lex_err("B'012'");
        assert!(err.message.contains("not a valid binary digit"));
    }

    #[test]
    fn test_parameters() {
        assert_eq!(
            token_kinds("$1 $23"),
            vec![TokenKind::Param(1), TokenKind::Param(23), TokenKind::Eof]
        );
        assert!(lex_err("$0").message.starts_with("invalid parameter number"));
        assert!(lex_err("$1a").message.starts_with("trailing junk"));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("+ - * / % ^ = != <> < <= > >= || & | # ~ ~* !~ !~* << >>"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Caret,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Concat,
                TokenKind::BitAnd,
                TokenKind::BitOr,
                TokenKind::BitXor,
                TokenKind::Tilde,
                TokenKind::TildeStar,
                TokenKind::NotTilde,
                TokenKind::NotTildeStar,
                TokenKind::LeftShift,
                TokenKind::RightShift,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operator_does_not_swallow_trailing_sign() {
        assert_eq!(
            token_kinds("x=-1"),
            vec![
                ident("x"),
                TokenKind::Eq,
                TokenKind::Minus,
                TokenKind::Integer(1),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            token_kinds("a @- b"),
            vec![
                ident("a"),
                TokenKind::Operator(String::from("@-")),
                ident("b"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operator_stops_at_comment() {
        assert_eq!(
            token_kinds("1 +-- comment\n2"),
            vec![
                TokenKind::Integer(1),
                TokenKind::Plus,
                TokenKind::Integer(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_custom_operators() {
        assert_eq!(
            token_kinds("j ->> 'k' @> x"),
            vec![
                ident("j"),
                TokenKind::Operator(String::from("->>")),
                TokenKind::String(String::from("k")),
                TokenKind::Operator(String::from("@>")),
                ident("x"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            token_kinds("( ) [ ] , ; . : ::"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Dot,
                TokenKind::Colon,
                TokenKind::DoubleColon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = lex_err("SELECT 1 \\ 2");
        assert!(err.message.contains("unexpected character"));
        assert_eq!(err.span, Span::new(9, 10));
    }

    #[test]
    fn test_simple_select() {
        let sql = "SELECT id, name FROM users WHERE active = 1";
        assert_eq!(
            token_kinds(sql),
            vec![
                TokenKind::Keyword(Keyword::Select),
                ident("id"),
                TokenKind::Comma,
                ident("name"),
                TokenKind::Keyword(Keyword::From),
                ident("users"),
                TokenKind::Keyword(Keyword::Where),
                ident("active"),
                TokenKind::Eq,
                TokenKind::Integer(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("SELECT id");
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 9));
        assert_eq!(tokens[2].span, Span::at(9));
    }

    #[test]
    fn test_iterator_stops_after_eof_and_errors() {
        let mut lexer = Lexer::new("a");
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Ok(t)) if t.is_eof()));
        assert!(lexer.next().is_none());

        let mut lexer = Lexer::new("'x");
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }
}
