// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for SystemVerilog source text.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is hand-written for maximum control over error recovery and the
//! SystemVerilog-specific literal grammars (sized vector literals with
//! four-state digits, escaped identifiers, time literals, directives).
//!
//! # Design Principles
//!
//! - **Error recovery**: Never panic on malformed input; emit a diagnostic
//!   and a best-effort token so lexing can continue
//! - **Trivia preservation**: Whitespace and comments attach to the next
//!   token, so the token stream reconstructs the input exactly
//! - **Mode-parameterized**: [`LexerMode`] selects the sub-grammar for
//!   directive bodies and include file names
//!
//! # Example
//!
//! ```
//! use silica_core::source_analysis::{lex, TokenKind};
//!
//! let tokens = lex("a + 1");
//! assert_eq!(tokens.len(), 3); // a, +, 1 (EOF excluded)
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::keywords::{DirectiveKind, Keyword};
use super::{FileId, IdentifierKind, SourceText, Span, Token, TokenKind, Trivia};
use crate::diagnostics::{DiagCode, Diagnostics};
use crate::numeric::{LogicBit, NumericBase, SVInt, TimeUnit, VectorDigit};

/// Which sub-grammar the next token is lexed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexerMode {
    /// Ordinary source text. Newlines are whitespace trivia.
    #[default]
    Normal,
    /// Inside a directive: a newline terminates the directive and is
    /// produced as an [`TokenKind::EndOfDirective`] token.
    Directive,
    /// Immediately after `` `include ``: consume `<...>` or `"..."` as one
    /// filename token.
    IncludeFileName,
}

/// Widths above this are rejected as literal sizes.
const MAX_VECTOR_WIDTH: u64 = (1 << 24) - 1;

/// A lexer that tokenizes SystemVerilog source code.
///
/// Constructed with a [`SourceText`] and a shared [`Diagnostics`] sink;
/// [`Lexer::lex`] always returns a token, producing an infinite stream of
/// [`TokenKind::EndOfFile`] past the end of the buffer. It also implements
/// [`Iterator`] for normal-mode consumption (stopping at end of file).
pub struct Lexer<'a> {
    /// The source buffer being lexed.
    source: SourceText<'a>,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'a>>,
    /// Current byte position in source.
    position: usize,
    /// Shared diagnostics sink.
    diagnostics: &'a Diagnostics,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("file", &self.source.file())
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source buffer.
    #[must_use]
    pub fn new(source: SourceText<'a>, diagnostics: &'a Diagnostics) -> Self {
        tracing::debug!(file = source.file().raw(), len = source.len(), "lexing buffer");
        Self {
            source,
            chars: source.text().char_indices().peekable(),
            position: 0,
            diagnostics,
        }
    }

    /// Lexes the next token under the given mode. Never returns nothing: at
    /// the end of the buffer an infinite stream of end-of-file tokens is
    /// produced.
    pub fn lex(&mut self, mode: LexerMode) -> Token {
        match mode {
            LexerMode::Normal => self.lex_token(false),
            LexerMode::Directive => self.lex_token(true),
            LexerMode::IncludeFileName => self.lex_include_file_name(),
        }
    }

    /// Returns the file id of the buffer being lexed.
    #[must_use]
    pub fn file(&self) -> FileId {
        self.source.file()
    }

    // ========================================================================
    // Cursor management
    // ========================================================================

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is the same as
    /// `peek_char`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte position.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// Creates a span from start to current position.
    fn span_from(&self, start: u32) -> Span {
        self.source.span(start, self.current_position())
    }

    /// Creates a span between two recorded positions.
    fn span_between(&self, start: u32, end: u32) -> Span {
        self.source.span(start, end)
    }

    /// Extracts source text for a span.
    fn text_for(&self, span: Span) -> &'a str {
        &self.source.text()[span.as_range()]
    }

    /// Records an error diagnostic.
    fn add_error(&self, code: DiagCode, span: Span) {
        self.diagnostics.add_error(code, span);
    }

    /// Records a warning diagnostic.
    fn add_warning(&self, code: DiagCode, span: Span) {
        self.diagnostics.add_warning(code, span);
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Collects leading trivia into `buffer`. Returns true when directive
    /// mode hit its newline terminator (which is left unconsumed).
    fn collect_trivia(&mut self, buffer: &mut Vec<Trivia>, directive_mode: bool) -> bool {
        loop {
            match self.peek_char() {
                Some(' ' | '\t') => self.scan_whitespace(buffer, directive_mode),
                Some('\r' | '\n') if directive_mode => return true,
                Some('\r' | '\n') => self.scan_whitespace(buffer, directive_mode),
                Some('/') if self.peek_char_n(1) == Some('/') => self.scan_line_comment(buffer),
                Some('/') if self.peek_char_n(1) == Some('*') => self.scan_block_comment(buffer),
                Some('\\') if matches!(self.peek_char_n(1), Some('\r' | '\n')) => {
                    self.scan_line_continuation(buffer);
                }
                _ => return false,
            }
        }
    }

    /// Scans a run of whitespace. Normal mode folds newlines into the run;
    /// directive mode stops before them.
    fn scan_whitespace(&mut self, buffer: &mut Vec<Trivia>, directive_mode: bool) {
        let start = self.current_position();
        self.advance_while(|c| {
            matches!(c, ' ' | '\t') || (!directive_mode && matches!(c, '\r' | '\n'))
        });
        let text = self.text_for(self.span_from(start));
        buffer.push(Trivia::Whitespace(EcoString::from(text)));
    }

    /// Scans a line comment: `// ...` up to (not including) the newline.
    fn scan_line_comment(&mut self, buffer: &mut Vec<Trivia>) {
        let start = self.current_position();
        self.advance(); // /
        self.advance(); // /
        self.advance_while(|c| !matches!(c, '\r' | '\n'));
        let text = self.text_for(self.span_from(start));
        buffer.push(Trivia::LineComment(EcoString::from(text)));
    }

    /// Scans a block comment. An unterminated comment is diagnosed and
    /// consumes the rest of the input.
    fn scan_block_comment(&mut self, buffer: &mut Vec<Trivia>) {
        let start = self.current_position();
        self.advance(); // /
        self.advance(); // *
        loop {
            match self.peek_char() {
                None => {
                    self.add_error(DiagCode::UnterminatedBlockComment, self.span_from(start));
                    break;
                }
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    self.advance(); // *
                    self.advance(); // /
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        let text = self.text_for(self.span_from(start));
        buffer.push(Trivia::BlockComment(EcoString::from(text)));
    }

    /// Scans a backslash-newline line continuation.
    fn scan_line_continuation(&mut self, buffer: &mut Vec<Trivia>) {
        let start = self.current_position();
        self.advance(); // backslash
        if self.peek_char() == Some('\r') {
            self.advance();
        }
        if self.peek_char() == Some('\n') {
            self.advance();
        }
        let text = self.text_for(self.span_from(start));
        buffer.push(Trivia::LineContinuation(EcoString::from(text)));
    }

    // ========================================================================
    // Token dispatch
    // ========================================================================

    /// Lexes the next token in normal or directive mode.
    fn lex_token(&mut self, directive_mode: bool) -> Token {
        let mut trivia = Vec::new();
        if self.collect_trivia(&mut trivia, directive_mode) {
            // Directive scope ends at the newline.
            let start = self.current_position();
            if self.peek_char() == Some('\r') {
                self.advance();
            }
            if self.peek_char() == Some('\n') {
                self.advance();
            }
            return Token::with_trivia(TokenKind::EndOfDirective, self.span_from(start), trivia);
        }

        let start = self.current_position();
        let kind = match self.peek_char() {
            None => TokenKind::EndOfFile,
            Some(c) => self.lex_token_kind(c, start),
        };
        Token::with_trivia(kind, self.span_from(start), trivia)
    }

    /// Lexes a token kind based on the first character.
    fn lex_token_kind(&mut self, c: char, start: u32) -> TokenKind {
        match c {
            '\0' => {
                self.advance();
                self.add_error(DiagCode::EmbeddedNull, self.span_from(start));
                TokenKind::Unknown(EcoString::from("\0"))
            }
            'a'..='z' | 'A'..='Z' | '_' => self.lex_identifier_or_keyword(start),
            '0'..='9' => self.lex_numeric_literal(start),
            '"' => self.lex_string_literal(start),
            '\\' => self.lex_escaped_identifier(start),
            '`' => self.lex_directive(start),
            '$' => self.lex_dollar_sign(start),
            '\'' => self.lex_apostrophe(start),
            _ => self.lex_punctuation(c, start),
        }
    }

    /// Lexes a simple identifier or keyword.
    fn lex_identifier_or_keyword(&mut self, start: u32) -> TokenKind {
        self.advance_while(is_identifier_char);
        let text = self.text_for(self.span_from(start));
        match Keyword::from_text(text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier {
                name: EcoString::from(text),
                kind: IdentifierKind::Simple,
            },
        }
    }

    /// Lexes an escaped identifier: backslash to the next whitespace.
    fn lex_escaped_identifier(&mut self, start: u32) -> TokenKind {
        self.advance(); // backslash
        self.advance_while(|c| !matches!(c, ' ' | '\t' | '\r' | '\n'));
        let text = self.text_for(self.span_from(start));
        if text.len() == 1 {
            // A bare backslash; backslash-newline was already taken as trivia.
            return TokenKind::Unknown(EcoString::from(text));
        }
        TokenKind::Identifier {
            name: EcoString::from(&text[1..]),
            kind: IdentifierKind::Escaped,
        }
    }

    /// Lexes `$identifier` as a system identifier, or a lone `$`.
    fn lex_dollar_sign(&mut self, start: u32) -> TokenKind {
        self.advance(); // $
        if self.peek_char().is_some_and(is_identifier_start) {
            self.advance_while(is_identifier_char);
            let text = self.text_for(self.span_from(start));
            TokenKind::Identifier {
                name: EcoString::from(text),
                kind: IdentifierKind::System,
            }
        } else {
            TokenKind::Dollar
        }
    }

    /// Lexes a `` ` ``-prefixed directive.
    fn lex_directive(&mut self, start: u32) -> TokenKind {
        self.advance(); // backtick
        if !self.peek_char().is_some_and(is_identifier_start) {
            let text = self.text_for(self.span_from(start));
            return TokenKind::Unknown(EcoString::from(text));
        }
        let name_start = self.current_position();
        self.advance_while(is_identifier_char);
        let name = self.text_for(self.span_from(name_start));
        TokenKind::Directive {
            kind: DirectiveKind::from_text(name),
            name: EcoString::from(name),
        }
    }

    // ========================================================================
    // Numeric literals
    // ========================================================================

    /// Lexes a literal starting with an apostrophe: an unbased unsized
    /// literal (`'0 '1 'x 'z`) or a vector literal with the default 32-bit
    /// size (`'hff`).
    fn lex_apostrophe(&mut self, start: u32) -> TokenKind {
        self.advance(); // apostrophe
        match self.peek_char() {
            Some('0') => {
                self.advance();
                TokenKind::UnbasedUnsizedLiteral(LogicBit::Zero)
            }
            Some('1') => {
                self.advance();
                TokenKind::UnbasedUnsizedLiteral(LogicBit::One)
            }
            Some('x' | 'X') => {
                self.advance();
                TokenKind::UnbasedUnsizedLiteral(LogicBit::X)
            }
            Some('z' | 'Z' | '?') => {
                self.advance();
                TokenKind::UnbasedUnsizedLiteral(LogicBit::Z)
            }
            Some('s' | 'S' | 'd' | 'D' | 'b' | 'B' | 'o' | 'O' | 'h' | 'H') => {
                self.lex_vector_literal(start, 32)
            }
            _ => TokenKind::Apostrophe,
        }
    }

    /// Lexes a numeric literal starting with a decimal digit: a sized vector
    /// literal, a real literal, a time literal, or a plain integer.
    fn lex_numeric_literal(&mut self, start: u32) -> TokenKind {
        self.advance_while(|c| c.is_ascii_digit() || c == '_');
        let digits_end = self.current_position();

        // A following apostrophe (possibly after spaces) makes the digit run
        // the size of a vector literal.
        if let Some(skip) = self.vector_base_follows() {
            let size = self.vector_size_from(self.span_from(start));
            for _ in 0..=skip {
                self.advance(); // whitespace run, then the apostrophe
            }
            return self.lex_vector_literal(start, size);
        }

        // Fraction and/or exponent make it a real literal.
        let has_fraction = self.peek_char() == Some('.')
            && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit());
        let has_exponent = matches!(self.peek_char(), Some('e' | 'E'));
        if has_fraction || has_exponent {
            return self.lex_real_literal(start);
        }

        match self.try_lex_time_unit(start) {
            Some(Ok(unit)) => {
                let value = parse_real_text(self.text_for(self.span_between(start, digits_end)));
                return TokenKind::TimeLiteral { value, unit };
            }
            Some(Err(())) | None => {}
        }

        let digits = decimal_digit_values(self.text_for(self.span_between(start, digits_end)));
        TokenKind::IntegerLiteral(SVInt::parse_decimal(&digits))
    }

    /// Scans forward over spaces and tabs looking for an apostrophe that
    /// starts a vector base. Returns the number of whitespace characters to
    /// skip, or `None` if no vector base follows.
    fn vector_base_follows(&mut self) -> Option<usize> {
        let mut n = 0;
        while matches!(self.peek_char_n(n), Some(' ' | '\t')) {
            n += 1;
        }
        if self.peek_char_n(n) != Some('\'') {
            return None;
        }
        matches!(
            self.peek_char_n(n + 1),
            Some('s' | 'S' | 'd' | 'D' | 'b' | 'B' | 'o' | 'O' | 'h' | 'H')
        )
        .then_some(n)
    }

    /// Parses the explicit size of a sized vector literal, diagnosing zero
    /// or out-of-range sizes.
    fn vector_size_from(&mut self, span: Span) -> u32 {
        let digits = decimal_digit_values(self.text_for(span));
        let mut size: u64 = 0;
        for digit in digits {
            size = size.saturating_mul(10).saturating_add(u64::from(digit));
        }
        if size == 0 || size > MAX_VECTOR_WIDTH {
            self.add_error(DiagCode::InvalidVectorSize, span);
            return if size == 0 { 1 } else { 32 };
        }
        u32::try_from(size).unwrap_or(32)
    }

    /// Lexes the `[s]base digits` part of a vector literal. The cursor sits
    /// on the signed marker or base character, just past the apostrophe.
    fn lex_vector_literal(&mut self, start: u32, size: u32) -> TokenKind {
        let mut signed = false;
        if matches!(self.peek_char(), Some('s' | 'S')) {
            self.advance();
            signed = true;
        }

        let base = match self.peek_char() {
            Some('d' | 'D') => NumericBase::Decimal,
            Some('b' | 'B') => NumericBase::Binary,
            Some('o' | 'O') => NumericBase::Octal,
            Some('h' | 'H') => NumericBase::Hex,
            _ => {
                // `'s` with no base character.
                self.add_error(DiagCode::ExpectedVectorDigits, self.span_from(start));
                return TokenKind::IntegerVectorLiteral(
                    SVInt::zero(size).with_signedness(signed),
                );
            }
        };
        self.advance(); // base character

        // Whitespace is allowed between the base and the first digit.
        let mut skip = 0;
        while matches!(self.peek_char_n(skip), Some(' ' | '\t')) {
            skip += 1;
        }
        if self.peek_char_n(skip).is_some_and(is_vector_digit_char) {
            for _ in 0..skip {
                self.advance();
            }
        }

        let digits = self.scan_vector_digits(base);
        if digits.is_empty() {
            self.add_error(DiagCode::ExpectedVectorDigits, self.span_from(start));
            return TokenKind::IntegerVectorLiteral(SVInt::zero(size).with_signedness(signed));
        }

        let parsed = SVInt::from_vector_digits(size, signed, base, &digits);
        if parsed.overflow {
            // The token still carries a usable truncated value, so this is
            // not fatal to the compilation.
            self.add_warning(DiagCode::VectorLiteralOverflow(size), self.span_from(start));
        }
        TokenKind::IntegerVectorLiteral(parsed.value)
    }

    /// Scans the digit run of a vector literal, diagnosing digits that are
    /// not legal in the base and skipping them.
    fn scan_vector_digits(&mut self, base: NumericBase) -> Vec<VectorDigit> {
        let mut digits = Vec::new();
        loop {
            let Some(c) = self.peek_char() else { break };
            if c == '_' {
                self.advance();
                continue;
            }
            if !is_vector_digit_char(c) {
                break;
            }
            let digit_start = self.current_position();
            self.advance();
            let digit = match c {
                'x' | 'X' => Some(VectorDigit::X),
                'z' | 'Z' | '?' => Some(VectorDigit::Z),
                _ => c.to_digit(16).and_then(|d| {
                    #[expect(clippy::cast_possible_truncation, reason = "hex digit fits in u8")]
                    let d = d as u8;
                    base.contains(d).then_some(VectorDigit::Value(d))
                }),
            };
            match digit {
                // Four-state digits are only legal outside base ten; recover
                // with a zero digit.
                Some(VectorDigit::X | VectorDigit::Z) if base == NumericBase::Decimal => {
                    self.add_error(
                        DiagCode::BadBaseDigitInLiteral(c),
                        self.span_from(digit_start),
                    );
                    digits.push(VectorDigit::Value(0));
                }
                Some(digit) => digits.push(digit),
                None => {
                    self.add_error(
                        DiagCode::BadBaseDigitInLiteral(c),
                        self.span_from(digit_start),
                    );
                }
            }
        }
        digits
    }

    /// Lexes the fraction/exponent tail of a real literal. The integer part
    /// has already been consumed.
    fn lex_real_literal(&mut self, start: u32) -> TokenKind {
        if self.peek_char() == Some('.') {
            self.advance(); // decimal point
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
        }

        let mut value_end = self.current_position();
        if matches!(self.peek_char(), Some('e' | 'E')) {
            self.advance(); // exponent marker
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.advance();
            }
            let exp_digits_start = self.current_position();
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
            if self.current_position() == exp_digits_start {
                // No digits: value comes from the part before the marker.
                self.add_error(DiagCode::MissingExponentDigits, self.span_from(start));
            } else {
                value_end = self.current_position();
            }
        }

        let value = parse_real_text(self.text_for(self.span_between(start, value_end)));
        if value.is_infinite() {
            self.add_error(DiagCode::RealLiteralOverflow, self.span_from(start));
        }

        match self.try_lex_time_unit(start) {
            Some(Ok(unit)) => TokenKind::TimeLiteral { value, unit },
            Some(Err(())) | None => TokenKind::RealLiteral(value),
        }
    }

    /// Tries to consume a time-unit suffix directly after a numeric run.
    ///
    /// Returns `Some(Ok(unit))` for a valid unit, `Some(Err(()))` when a
    /// suffix looked like a unit but was not one (diagnosed and consumed),
    /// and `None` when no unit-like suffix follows.
    fn try_lex_time_unit(&mut self, literal_start: u32) -> Option<Result<TimeUnit, ()>> {
        match self.peek_char() {
            Some('s') if !self.peek_char_n(1).is_some_and(is_identifier_char) => {
                self.advance();
                Some(Ok(TimeUnit::Seconds))
            }
            Some(first @ ('m' | 'u' | 'n' | 'p' | 'f')) => {
                if self.peek_char_n(1) == Some('s')
                    && !self.peek_char_n(2).is_some_and(is_identifier_char)
                {
                    self.advance();
                    self.advance();
                    let unit = match first {
                        'm' => TimeUnit::Milliseconds,
                        'u' => TimeUnit::Microseconds,
                        'n' => TimeUnit::Nanoseconds,
                        'p' => TimeUnit::Picoseconds,
                        _ => TimeUnit::Femtoseconds,
                    };
                    Some(Ok(unit))
                } else {
                    // Looked like a unit but is not one: consume the letter
                    // run so the literal stays a single bad token.
                    let suffix_start = self.current_position();
                    self.advance_while(|c| c.is_ascii_lowercase());
                    let suffix = self.text_for(self.span_from(suffix_start));
                    self.add_error(
                        DiagCode::BadTimeUnit(EcoString::from(suffix)),
                        self.span_between(literal_start, self.current_position()),
                    );
                    Some(Err(()))
                }
            }
            _ => None,
        }
    }

    // ========================================================================
    // Strings
    // ========================================================================

    /// Lexes a double-quoted string literal with escape resolution.
    fn lex_string_literal(&mut self, start: u32) -> TokenKind {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek_char() {
                None | Some('\r' | '\n') => {
                    // Unterminated: the newline stays for the trivia scanner.
                    self.add_error(DiagCode::ExpectedClosingQuote, self.span_from(start));
                    break;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.lex_escape_sequence(&mut value);
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
        TokenKind::StringLiteral(EcoString::from(value.as_str()))
    }

    /// Lexes one escape sequence (the backslash is already consumed) and
    /// appends the resolved character to `value`.
    fn lex_escape_sequence(&mut self, value: &mut String) {
        let esc_start = self.current_position().saturating_sub(1);
        match self.peek_char() {
            None | Some('\r' | '\n') => {
                // The string loop will diagnose the missing quote.
            }
            Some('n') => {
                self.advance();
                value.push('\n');
            }
            Some('t') => {
                self.advance();
                value.push('\t');
            }
            Some('\\') => {
                self.advance();
                value.push('\\');
            }
            Some('"') => {
                self.advance();
                value.push('"');
            }
            Some('v') => {
                self.advance();
                value.push('\x0b');
            }
            Some('f') => {
                self.advance();
                value.push('\x0c');
            }
            Some('a') => {
                self.advance();
                value.push('\x07');
            }
            Some(c @ '0'..='7') => {
                // Up to three octal digits.
                self.advance();
                let mut code = c.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match self.peek_char().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            self.advance();
                            code = code * 8 + digit;
                        }
                        None => break,
                    }
                }
                if code > 255 {
                    self.add_error(DiagCode::OctalEscapeCodeTooBig, self.span_from(esc_start));
                    code &= 0xff;
                }
                #[expect(clippy::cast_possible_truncation, reason = "masked to a byte above")]
                value.push(char::from(code as u8));
            }
            Some('x') => {
                self.advance();
                let mut code = 0u32;
                let mut digits = 0;
                while digits < 2 {
                    match self.peek_char().and_then(|c| c.to_digit(16)) {
                        Some(digit) => {
                            self.advance();
                            code = code * 16 + digit;
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if digits == 0 {
                    self.add_error(DiagCode::InvalidHexEscapeCode, self.span_from(esc_start));
                } else {
                    #[expect(clippy::cast_possible_truncation, reason = "at most two hex digits")]
                    value.push(char::from(code as u8));
                }
            }
            Some(c) => {
                self.advance();
                self.add_error(DiagCode::UnknownEscapeCode(c), self.span_from(esc_start));
                value.push(c);
            }
        }
    }

    // ========================================================================
    // Include file names
    // ========================================================================

    /// Lexes a `<...>` or `"..."` include file name as a single token.
    fn lex_include_file_name(&mut self) -> Token {
        let mut trivia = Vec::new();
        if self.collect_trivia(&mut trivia, true) {
            // Line ended before any filename.
            let start = self.current_position();
            self.add_error(DiagCode::ExpectedIncludeFileName, self.span_from(start));
            if self.peek_char() == Some('\r') {
                self.advance();
            }
            if self.peek_char() == Some('\n') {
                self.advance();
            }
            return Token::with_trivia(TokenKind::EndOfDirective, self.span_from(start), trivia);
        }

        let start = self.current_position();
        let close = match self.peek_char() {
            Some('"') => '"',
            Some('<') => '>',
            _ => {
                self.add_error(DiagCode::ExpectedIncludeFileName, self.span_from(start));
                let kind = match self.peek_char() {
                    None => TokenKind::EndOfFile,
                    Some(c) => self.lex_token_kind(c, start),
                };
                return Token::with_trivia(kind, self.span_from(start), trivia);
            }
        };

        self.advance(); // opening delimiter
        let name_start = self.current_position();
        self.advance_while(|c| c != close && !matches!(c, '\r' | '\n'));
        let name = EcoString::from(self.text_for(self.span_from(name_start)));
        if self.peek_char() == Some(close) {
            self.advance();
        } else {
            self.add_error(DiagCode::ExpectedIncludeFileName, self.span_from(start));
        }
        Token::with_trivia(
            TokenKind::IncludeFileName(name),
            self.span_from(start),
            trivia,
        )
    }

    // ========================================================================
    // Punctuation
    // ========================================================================

    /// Lexes punctuation and operators, longest match first.
    fn lex_punctuation(&mut self, c: char, start: u32) -> TokenKind {
        self.advance();
        match c {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            ':' => {
                if self.peek_char() == Some(':') {
                    self.advance();
                    TokenKind::DoubleColon
                } else {
                    TokenKind::Colon
                }
            }
            '+' => {
                if self.consume('=') {
                    TokenKind::PlusEquals
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.consume('=') {
                    TokenKind::MinusEquals
                } else if self.consume('>') {
                    TokenKind::MinusArrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.consume('*') {
                    TokenKind::DoubleStar
                } else if self.consume('=') {
                    TokenKind::StarEquals
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.consume('=') {
                    TokenKind::SlashEquals
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.consume('=') {
                    TokenKind::PercentEquals
                } else {
                    TokenKind::Percent
                }
            }
            '&' => {
                if self.consume('&') {
                    TokenKind::DoubleAmp
                } else if self.consume('=') {
                    TokenKind::AmpEquals
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.consume('|') {
                    TokenKind::DoublePipe
                } else if self.consume('=') {
                    TokenKind::PipeEquals
                } else {
                    TokenKind::Pipe
                }
            }
            '^' => {
                if self.consume('~') {
                    TokenKind::TildeCaret
                } else if self.consume('=') {
                    TokenKind::CaretEquals
                } else {
                    TokenKind::Caret
                }
            }
            '~' => {
                if self.consume('&') {
                    TokenKind::TildeAmp
                } else if self.consume('|') {
                    TokenKind::TildePipe
                } else if self.consume('^') {
                    TokenKind::TildeCaret
                } else {
                    TokenKind::Tilde
                }
            }
            '!' => {
                if self.peek_char() == Some('=') {
                    self.advance();
                    if self.consume('=') {
                        TokenKind::BangDoubleEquals
                    } else if self.consume('?') {
                        TokenKind::BangEqualsQuestion
                    } else {
                        TokenKind::BangEquals
                    }
                } else {
                    TokenKind::Bang
                }
            }
            '=' => {
                if self.peek_char() == Some('=') {
                    self.advance();
                    if self.consume('=') {
                        TokenKind::TripleEquals
                    } else if self.consume('?') {
                        TokenKind::EqualsQuestion
                    } else {
                        TokenKind::DoubleEquals
                    }
                } else {
                    TokenKind::Equals
                }
            }
            '<' => {
                if self.peek_char() == Some('<') {
                    self.advance();
                    if self.peek_char() == Some('<') {
                        self.advance();
                        if self.consume('=') {
                            TokenKind::TripleLeftShiftEquals
                        } else {
                            TokenKind::TripleLeftShift
                        }
                    } else if self.consume('=') {
                        TokenKind::LeftShiftEquals
                    } else {
                        TokenKind::LeftShift
                    }
                } else if self.peek_char() == Some('-') && self.peek_char_n(1) == Some('>') {
                    self.advance();
                    self.advance();
                    TokenKind::LessThanMinusArrow
                } else if self.consume('=') {
                    TokenKind::LessThanEquals
                } else {
                    TokenKind::LessThan
                }
            }
            '>' => {
                if self.peek_char() == Some('>') {
                    self.advance();
                    if self.peek_char() == Some('>') {
                        self.advance();
                        if self.consume('=') {
                            TokenKind::TripleRightShiftEquals
                        } else {
                            TokenKind::TripleRightShift
                        }
                    } else if self.consume('=') {
                        TokenKind::RightShiftEquals
                    } else {
                        TokenKind::RightShift
                    }
                } else if self.consume('=') {
                    TokenKind::GreaterThanEquals
                } else {
                    TokenKind::GreaterThan
                }
            }
            _ => {
                let text = self.text_for(self.span_from(start));
                TokenKind::Unknown(EcoString::from(text))
            }
        }
    }

    /// Consumes the next character if it equals `c`.
    fn consume(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lex(LexerMode::Normal);
        if token.kind().is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

/// Returns true for characters that may start an identifier.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns true for characters that may continue an identifier.
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Returns true for characters that can appear in a vector digit run.
fn is_vector_digit_char(c: char) -> bool {
    c.is_ascii_hexdigit() || matches!(c, 'x' | 'X' | 'z' | 'Z' | '?')
}

/// Digit values of a decimal run, ignoring `_` separators.
fn decimal_digit_values(text: &str) -> Vec<u8> {
    text.bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

/// Parses a real literal's text, ignoring `_` separators.
fn parse_real_text(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    cleaned.parse().unwrap_or_default()
}

/// Convenience function to lex source into a vector of tokens (excluding
/// the end-of-file token), in normal mode with a throwaway sink.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    let diagnostics = Diagnostics::new();
    Lexer::new(SourceText::new(FileId::default(), source), &diagnostics).collect()
}

/// Convenience function to lex source into a vector of tokens including the
/// end-of-file token.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let diagnostics = Diagnostics::new();
    let mut lexer = Lexer::new(SourceText::new(FileId::default(), source), &diagnostics);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex(LexerMode::Normal);
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    /// Helper to lex and extract just the token kinds.
    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(Token::into_kind).collect()
    }

    /// Helper that lexes with a visible sink and returns (tokens, codes).
    fn lex_diagnosed(source: &str) -> (Vec<Token>, Vec<DiagCode>) {
        let diagnostics = Diagnostics::new();
        let tokens: Vec<_> =
            Lexer::new(SourceText::new(FileId::default(), source), &diagnostics).collect();
        let codes = diagnostics.entries().into_iter().map(|d| d.code).collect();
        (tokens, codes)
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier {
            name: name.into(),
            kind: IdentifierKind::Simple,
        }
    }

    #[test]
    fn lex_empty() {
        assert!(lex("").is_empty());
        assert!(lex("   \n\t ").is_empty());
        assert!(lex("// comment").is_empty());
    }

    #[test]
    fn eof_is_produced_indefinitely() {
        let diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new(SourceText::new(FileId::default(), "x"), &diagnostics);
        assert!(!lexer.lex(LexerMode::Normal).kind().is_eof());
        for _ in 0..3 {
            assert!(lexer.lex(LexerMode::Normal).kind().is_eof());
        }
    }

    #[test]
    fn lex_identifiers() {
        assert_eq!(
            lex_kinds("foo _bar x$1"),
            vec![ident("foo"), ident("_bar"), ident("x$1")]
        );
    }

    #[test]
    fn lex_keywords() {
        assert_eq!(
            lex_kinds("module return foo"),
            vec![
                TokenKind::Keyword(Keyword::Module),
                TokenKind::Keyword(Keyword::Return),
                ident("foo"),
            ]
        );
    }

    #[test]
    fn lex_escaped_identifier() {
        let tokens = lex("\\bus+index  x");
        assert_eq!(
            *tokens[0].kind(),
            TokenKind::Identifier {
                name: "bus+index".into(),
                kind: IdentifierKind::Escaped,
            }
        );
        assert_eq!(*tokens[1].kind(), ident("x"));
    }

    #[test]
    fn lex_system_identifier_and_dollar() {
        assert_eq!(
            lex_kinds("$display $"),
            vec![
                TokenKind::Identifier {
                    name: "$display".into(),
                    kind: IdentifierKind::System,
                },
                TokenKind::Dollar,
            ]
        );
    }

    #[test]
    fn lex_plain_integer_min_width() {
        let kinds = lex_kinds("42");
        let TokenKind::IntegerLiteral(value) = &kinds[0] else {
            panic!("expected integer literal, got {kinds:?}");
        };
        assert_eq!(value.width(), 6);
        assert_eq!(value.as_u64(), Some(42));
        assert!(!value.is_signed());
        assert!(!value.has_unknown());
    }

    #[test]
    fn lex_vector_literal_four_state() {
        let kinds = lex_kinds("4'b10xz");
        let TokenKind::IntegerVectorLiteral(value) = &kinds[0] else {
            panic!("expected vector literal, got {kinds:?}");
        };
        assert_eq!(value.width(), 4);
        assert!(value.has_unknown());
        assert_eq!(value.bit(3), LogicBit::One);
        assert_eq!(value.bit(2), LogicBit::Zero);
        assert_eq!(value.bit(1), LogicBit::X);
        assert_eq!(value.bit(0), LogicBit::Z);
    }

    #[test]
    fn lex_vector_literal_signed_hex() {
        let kinds = lex_kinds("32'shDEAD_BEEF");
        let TokenKind::IntegerVectorLiteral(value) = &kinds[0] else {
            panic!("expected vector literal, got {kinds:?}");
        };
        assert_eq!(value.width(), 32);
        assert!(value.is_signed());
        assert!(!value.has_unknown());
        assert_eq!(value.as_u64(), Some(0xdead_beef));
    }

    #[test]
    fn lex_vector_literal_spaced() {
        // Whitespace is allowed around the apostrophe and after the base.
        let kinds = lex_kinds("16 'd 10");
        let TokenKind::IntegerVectorLiteral(value) = &kinds[0] else {
            panic!("expected vector literal, got {kinds:?}");
        };
        assert_eq!(value.width(), 16);
        assert_eq!(value.as_u64(), Some(10));
        assert_eq!(kinds.len(), 1);
    }

    #[test]
    fn lex_vector_literal_default_size() {
        let kinds = lex_kinds("'hff");
        let TokenKind::IntegerVectorLiteral(value) = &kinds[0] else {
            panic!("expected vector literal, got {kinds:?}");
        };
        assert_eq!(value.width(), 32);
        assert_eq!(value.as_u64(), Some(0xff));
    }

    #[test]
    fn lex_unbased_unsized() {
        assert_eq!(
            lex_kinds("'0 '1 'x 'z '?"),
            vec![
                TokenKind::UnbasedUnsizedLiteral(LogicBit::Zero),
                TokenKind::UnbasedUnsizedLiteral(LogicBit::One),
                TokenKind::UnbasedUnsizedLiteral(LogicBit::X),
                TokenKind::UnbasedUnsizedLiteral(LogicBit::Z),
                TokenKind::UnbasedUnsizedLiteral(LogicBit::Z),
            ]
        );
    }

    #[test]
    fn lex_real_literals() {
        assert_eq!(
            lex_kinds("3.14 1.5e2 2e-3 1_0.5"),
            vec![
                TokenKind::RealLiteral(3.14),
                TokenKind::RealLiteral(150.0),
                TokenKind::RealLiteral(0.002),
                TokenKind::RealLiteral(10.5),
            ]
        );
    }

    #[test]
    fn lex_time_literals() {
        assert_eq!(
            lex_kinds("10ns 1.5us 3s"),
            vec![
                TokenKind::TimeLiteral {
                    value: 10.0,
                    unit: TimeUnit::Nanoseconds,
                },
                TokenKind::TimeLiteral {
                    value: 1.5,
                    unit: TimeUnit::Microseconds,
                },
                TokenKind::TimeLiteral {
                    value: 3.0,
                    unit: TimeUnit::Seconds,
                },
            ]
        );
    }

    #[test]
    fn bad_time_unit_is_diagnosed() {
        let (tokens, codes) = lex_diagnosed("10mz");
        assert_eq!(codes, vec![DiagCode::BadTimeUnit("mz".into())]);
        let TokenKind::IntegerLiteral(value) = tokens[0].kind() else {
            panic!("expected best-effort integer literal");
        };
        assert_eq!(value.as_u64(), Some(10));
    }

    #[test]
    fn vector_overflow_warns_without_failing() {
        let diagnostics = Diagnostics::new();
        let tokens: Vec<_> =
            Lexer::new(SourceText::new(FileId::default(), "4'hff"), &diagnostics).collect();
        let entries = diagnostics.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, DiagCode::VectorLiteralOverflow(4));
        // The truncated value is still usable, so the overflow is only a
        // warning and the compilation stays successful.
        assert_eq!(entries[0].severity, Severity::Warning);
        assert!(!diagnostics.has_errors());
        let TokenKind::IntegerVectorLiteral(value) = tokens[0].kind() else {
            panic!("expected vector literal");
        };
        assert_eq!(value.width(), 4);
        assert_eq!(value.as_u64(), Some(0xf));
    }

    #[test]
    fn vector_size_zero_is_diagnosed() {
        let (tokens, codes) = lex_diagnosed("0'd1");
        assert_eq!(codes, vec![DiagCode::InvalidVectorSize]);
        let TokenKind::IntegerVectorLiteral(value) = tokens[0].kind() else {
            panic!("expected vector literal");
        };
        assert_eq!(value.width(), 1);
    }

    #[test]
    fn vector_missing_digits_is_diagnosed() {
        let (tokens, codes) = lex_diagnosed("8'b;");
        assert_eq!(codes, vec![DiagCode::ExpectedVectorDigits]);
        let TokenKind::IntegerVectorLiteral(value) = tokens[0].kind() else {
            panic!("expected vector literal");
        };
        assert_eq!(value.as_u64(), Some(0));
        assert_eq!(*tokens[1].kind(), TokenKind::Semicolon);
    }

    #[test]
    fn bad_base_digit_is_diagnosed_and_skipped() {
        let (tokens, codes) = lex_diagnosed("4'b102");
        assert_eq!(codes, vec![DiagCode::BadBaseDigitInLiteral('2')]);
        let TokenKind::IntegerVectorLiteral(value) = tokens[0].kind() else {
            panic!("expected vector literal");
        };
        assert_eq!(value.as_u64(), Some(0b10));
    }

    #[test]
    fn decimal_unknown_digit_is_diagnosed() {
        let (_, codes) = lex_diagnosed("8'd1x");
        assert_eq!(codes, vec![DiagCode::BadBaseDigitInLiteral('x')]);
    }

    #[test]
    fn missing_exponent_digits_is_diagnosed() {
        let (tokens, codes) = lex_diagnosed("1.5e;");
        assert_eq!(codes, vec![DiagCode::MissingExponentDigits]);
        assert_eq!(*tokens[0].kind(), TokenKind::RealLiteral(1.5));
    }

    #[test]
    fn lex_strings_with_escapes() {
        assert_eq!(
            lex_kinds(r#""hello" "a\tb" "q\"q" "\101" "\x41""#),
            vec![
                TokenKind::StringLiteral("hello".into()),
                TokenKind::StringLiteral("a\tb".into()),
                TokenKind::StringLiteral("q\"q".into()),
                TokenKind::StringLiteral("A".into()),
                TokenKind::StringLiteral("A".into()),
            ]
        );
    }

    #[test]
    fn unknown_escape_is_diagnosed() {
        let (tokens, codes) = lex_diagnosed(r#""a\qb""#);
        assert_eq!(codes, vec![DiagCode::UnknownEscapeCode('q')]);
        assert_eq!(*tokens[0].kind(), TokenKind::StringLiteral("aqb".into()));
    }

    #[test]
    fn unterminated_string_stops_at_newline() {
        let (tokens, codes) = lex_diagnosed("\"abc\nx");
        assert_eq!(codes, vec![DiagCode::ExpectedClosingQuote]);
        assert_eq!(*tokens[0].kind(), TokenKind::StringLiteral("abc".into()));
        assert_eq!(*tokens[1].kind(), ident("x"));
    }

    #[test]
    fn unterminated_block_comment_single_diagnostic_then_eof() {
        let diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new(
            SourceText::new(FileId::default(), "/* never closed"),
            &diagnostics,
        );
        let token = lexer.lex(LexerMode::Normal);
        assert!(token.kind().is_eof());
        assert_eq!(token.leading_trivia().len(), 1);
        let codes: Vec<_> = diagnostics.entries().into_iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![DiagCode::UnterminatedBlockComment]);
    }

    #[test]
    fn embedded_null_is_diagnosed() {
        let (tokens, codes) = lex_diagnosed("a\0b");
        assert_eq!(codes, vec![DiagCode::EmbeddedNull]);
        assert_eq!(*tokens[0].kind(), ident("a"));
        assert!(tokens[1].kind().is_unknown());
        assert_eq!(*tokens[2].kind(), ident("b"));
    }

    #[test]
    fn lex_operators_longest_match() {
        assert_eq!(
            lex_kinds("<<<= <<< <<= << <= <-> < >>>= >>> >>= >> >= >"),
            vec![
                TokenKind::TripleLeftShiftEquals,
                TokenKind::TripleLeftShift,
                TokenKind::LeftShiftEquals,
                TokenKind::LeftShift,
                TokenKind::LessThanEquals,
                TokenKind::LessThanMinusArrow,
                TokenKind::LessThan,
                TokenKind::TripleRightShiftEquals,
                TokenKind::TripleRightShift,
                TokenKind::RightShiftEquals,
                TokenKind::RightShift,
                TokenKind::GreaterThanEquals,
                TokenKind::GreaterThan,
            ]
        );
        assert_eq!(
            lex_kinds("=== ==? == = !== !=? != ! ~& ~| ~^ ^~ ** ->"),
            vec![
                TokenKind::TripleEquals,
                TokenKind::EqualsQuestion,
                TokenKind::DoubleEquals,
                TokenKind::Equals,
                TokenKind::BangDoubleEquals,
                TokenKind::BangEqualsQuestion,
                TokenKind::BangEquals,
                TokenKind::Bang,
                TokenKind::TildeAmp,
                TokenKind::TildePipe,
                TokenKind::TildeCaret,
                TokenKind::TildeCaret,
                TokenKind::DoubleStar,
                TokenKind::MinusArrow,
            ]
        );
    }

    #[test]
    fn lex_scope_and_brackets() {
        assert_eq!(
            lex_kinds("pkg::x[7:0]"),
            vec![
                ident("pkg"),
                TokenKind::DoubleColon,
                ident("x"),
                TokenKind::OpenBracket,
                TokenKind::IntegerLiteral(SVInt::parse_decimal(&[7])),
                TokenKind::Colon,
                TokenKind::IntegerLiteral(SVInt::parse_decimal(&[0])),
                TokenKind::CloseBracket,
            ]
        );
    }

    #[test]
    fn lex_directives() {
        let kinds = lex_kinds("`include `MY_MACRO");
        assert_eq!(
            kinds[0],
            TokenKind::Directive {
                kind: DirectiveKind::Include,
                name: "include".into(),
            }
        );
        assert_eq!(
            kinds[1],
            TokenKind::Directive {
                kind: DirectiveKind::MacroUsage,
                name: "MY_MACRO".into(),
            }
        );
    }

    #[test]
    fn directive_mode_terminates_at_newline() {
        let diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new(
            SourceText::new(FileId::default(), "`define FOO 1\nbar"),
            &diagnostics,
        );
        let directive = lexer.lex(LexerMode::Directive);
        assert!(matches!(
            directive.kind(),
            TokenKind::Directive {
                kind: DirectiveKind::Define,
                ..
            }
        ));
        assert_eq!(
            lexer.lex(LexerMode::Directive).kind(),
            &TokenKind::Identifier {
                name: "FOO".into(),
                kind: IdentifierKind::Simple,
            }
        );
        assert!(matches!(
            lexer.lex(LexerMode::Directive).kind(),
            TokenKind::IntegerLiteral(_)
        ));
        assert_eq!(
            lexer.lex(LexerMode::Directive).kind(),
            &TokenKind::EndOfDirective
        );
        assert_eq!(
            lexer.lex(LexerMode::Normal).kind(),
            &TokenKind::Identifier {
                name: "bar".into(),
                kind: IdentifierKind::Simple,
            }
        );
    }

    #[test]
    fn include_file_name_modes() {
        for (source, expected) in [
            ("\"foo.svh\"", "foo.svh"),
            ("<pkg/bar.svh>", "pkg/bar.svh"),
            ("  \"spaced.svh\"", "spaced.svh"),
        ] {
            let diagnostics = Diagnostics::new();
            let mut lexer = Lexer::new(SourceText::new(FileId::default(), source), &diagnostics);
            let token = lexer.lex(LexerMode::IncludeFileName);
            assert_eq!(
                *token.kind(),
                TokenKind::IncludeFileName(expected.into()),
                "source: {source}"
            );
            assert!(diagnostics.is_empty(), "source: {source}");
        }
    }

    #[test]
    fn unterminated_include_file_name_is_diagnosed() {
        let diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new(
            SourceText::new(FileId::default(), "<foo.svh\n"),
            &diagnostics,
        );
        let token = lexer.lex(LexerMode::IncludeFileName);
        assert_eq!(*token.kind(), TokenKind::IncludeFileName("foo.svh".into()));
        let codes: Vec<_> = diagnostics.entries().into_iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![DiagCode::ExpectedIncludeFileName]);
    }

    #[test]
    fn trivia_attaches_to_following_token() {
        let tokens = lex_with_eof("  // note\n\tfoo /* tail */");
        assert_eq!(tokens.len(), 2);
        let trivia = tokens[0].leading_trivia();
        assert!(matches!(trivia[0], Trivia::Whitespace(_)));
        assert!(matches!(trivia[1], Trivia::LineComment(_)));
        assert!(matches!(trivia[2], Trivia::Whitespace(_)));
        // The block comment after foo belongs to the EOF token.
        assert!(tokens[1].kind().is_eof());
        assert!(tokens[1].leading_trivia().iter().any(Trivia::is_comment));
    }

    #[test]
    fn line_continuation_is_trivia() {
        let tokens = lex_with_eof("a \\\nb");
        assert_eq!(tokens.len(), 3);
        assert!(tokens[1]
            .leading_trivia()
            .iter()
            .any(|t| matches!(t, Trivia::LineContinuation(_))));
    }

    /// Concatenating every token's leading trivia and lexeme reproduces the
    /// input exactly.
    fn assert_round_trip(source: &str) {
        let diagnostics = Diagnostics::new();
        let text = SourceText::new(FileId::default(), source);
        let mut lexer = Lexer::new(text, &diagnostics);
        let mut rebuilt = String::new();
        loop {
            let token = lexer.lex(LexerMode::Normal);
            for trivia in token.leading_trivia() {
                rebuilt.push_str(trivia.text());
            }
            rebuilt.push_str(&source[token.span().as_range()]);
            if token.kind().is_eof() {
                break;
            }
        }
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn round_trip_reconstructs_source() {
        assert_round_trip("");
        assert_round_trip("module m;\n  logic [7:0] q = 8'hff; // tail\nendmodule\n");
        assert_round_trip("a + b * 'x ** 4'b10xz\t// c\n/* d */ 1.5e2 10ns");
        assert_round_trip("x <= y <<< 2; p::q[3 +: 2] \\esc+ident \n\"s\\n\" $bits($foo)");
        assert_round_trip("16 'd 10 8'b  1010 bad @ input");
    }
}
