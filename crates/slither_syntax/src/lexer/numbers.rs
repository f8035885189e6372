//! Numeric literal scanning.
//!
//! Accepted forms: hex (`0x1F`), legacy octal (`017`), and decimal with optional fraction and
//! exponent (`12`, `1.5`, `.5`, `3e-2`).

use super::{Lexer, TokenKind};
use crate::diagnostics::CompileError;

impl<'a> Lexer<'a> {
    pub(super) fn scan_number(&mut self) -> Result<TokenKind, CompileError> {
        let (start, line, col) = (self.pos, self.line, self.col);
        let hex = self.starts_with("0x") || self.starts_with("0X");
        let mut prev: Option<char> = None;
        while let Some(c) = self.peek_char() {
            let exponent_sign = (c == '+' || c == '-') && !hex && matches!(prev, Some('e' | 'E'));
            if !(c.is_ascii_alphanumeric() || c == '.' || exponent_sign) {
                break;
            }
            self.advance();
            prev = Some(c);
        }
        let text = &self.src()[start..self.pos];
        match parse_number(text) {
            Some(value) => Ok(TokenKind::Number(value)),
            None => Err(self.error(format!("Invalid syntax: {text}"), start, line, col)),
        }
    }
}

/// Parse the text of a numeric literal.
///
/// ## Returns
/// - `None` if `text` is not a valid literal (`0x`, `08`, `1e`, `1.2.3`, `3px`, ...).
pub fn parse_number(text: &str) -> Option<f64> {
    if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if digits.is_empty() {
            return None;
        }
        return u64::from_str_radix(digits, 16).ok().map(|v| v as f64);
    }
    if text.len() > 1 && text.starts_with('0') && text.bytes().all(|b| b.is_ascii_digit()) {
        return u64::from_str_radix(&text[1..], 8).ok().map(|v| v as f64);
    }
    let valid_chars = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !valid_chars || !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("0x1F"), Some(31.0));
        assert_eq!(parse_number("017"), Some(15.0));
        assert_eq!(parse_number("1.5e3"), Some(1500.0));
        assert_eq!(parse_number(".25"), Some(0.25));
        assert_eq!(parse_number("2e-2"), Some(0.02));
        assert_eq!(parse_number("0"), Some(0.0));
    }

    #[test]
    fn test_invalid_forms() {
        for bad in ["0x", "08", "1e", "1.2.3", "3px", "0xZZ"] {
            assert_eq!(parse_number(bad), None, "{bad}");
        }
    }

    #[test]
    fn test_invalid_literal_reports_text() {
        let err = lex("x = 12abc\n").unwrap_err();
        assert_eq!(err.message, "Invalid syntax: 12abc");
        assert_eq!((err.line, err.col), (1, 4));
    }
}
