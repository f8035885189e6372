//! String and regular-expression scanning.
//!
//! Single-delimited strings decode escapes (`\n`, `\t`, `\xHH`, `\uHHHH`, octal up to three
//! digits, backslash-newline continuation). Triple-delimited strings are raw and may span lines.

use super::{Lexer, TokenKind};
use crate::diagnostics::CompileError;

impl<'a> Lexer<'a> {
    pub(super) fn scan_string(&mut self, quote: char) -> Result<TokenKind, CompileError> {
        let (start, line, col) = (self.pos, self.line, self.col);
        let triple: String = [quote; 3].iter().collect();

        if self.starts_with(&triple) {
            self.advance_to(self.pos + 3);
            let rest = &self.src()[self.pos..];
            let Some(end) = rest.find(&triple) else {
                self.advance_to(self.source.len());
                return Err(self.error("Unterminated string constant", start, line, col).eof());
            };
            let text = rest[..end].to_string();
            self.advance_to(self.pos + end + 3);
            return Ok(TokenKind::String(text));
        }

        self.advance();
        let mut value = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(self.error("Unterminated string constant", start, line, col).eof());
                }
                Some('\\') => self.read_escape(&mut value, start, line, col)?,
                Some(c) if c == quote => break,
                Some(c) => value.push(c),
            }
        }
        Ok(TokenKind::String(value))
    }

    fn read_escape(&mut self, out: &mut String, start: usize, line: usize, col: usize) -> Result<(), CompileError> {
        let Some(c) = self.advance() else {
            return Err(self.error("Unterminated string constant", start, line, col).eof());
        };
        match c {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'v' => out.push('\u{b}'),
            'f' => out.push('\u{c}'),
            '\n' => {}
            '\r' => {
                if self.peek_char() == Some('\n') {
                    self.advance();
                }
            }
            'x' | 'u' => {
                let width = if c == 'x' { 2 } else { 4 };
                let decoded = self.read_hex(width).and_then(char::from_u32);
                match decoded {
                    Some(ch) => out.push(ch),
                    None => return Err(self.error("Invalid hex-character pattern in string", start, line, col)),
                }
            }
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek_char().and_then(|d| d.to_digit(8)) {
                        Some(d) if code * 8 + d <= 0xFF => {
                            code = code * 8 + d;
                            self.advance();
                        }
                        _ => break,
                    }
                }
                out.push(char::from_u32(code).unwrap_or('\0'));
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn read_hex(&mut self, width: usize) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..width {
            let digit = self.peek_char()?.to_digit(16)?;
            self.advance();
            value = value * 16 + digit;
        }
        Some(value)
    }

    pub(super) fn scan_regexp(&mut self) -> Result<TokenKind, CompileError> {
        let (start, line, col) = (self.pos, self.line, self.col);
        self.advance();
        let mut pattern = String::new();
        let mut in_class = false;
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(self.error("Unterminated regular expression", start, line, col).eof());
                }
                Some('\\') => {
                    pattern.push('\\');
                    match self.advance() {
                        None | Some('\n') => {
                            return Err(self.error("Unterminated regular expression", start, line, col).eof());
                        }
                        Some(c) => pattern.push(c),
                    }
                }
                Some('[') => {
                    in_class = true;
                    pattern.push('[');
                }
                Some(']') if in_class => {
                    in_class = false;
                    pattern.push(']');
                }
                Some('/') if !in_class => break,
                Some(c) => pattern.push(c),
            }
        }
        let mut flags = String::new();
        while let Some(c) = self.peek_char().filter(|c| c.is_ascii_alphabetic()) {
            flags.push(c);
            self.advance();
        }
        Ok(TokenKind::RegExp { pattern, flags })
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};

    fn first(source: &str) -> TokenKind {
        lex(source).unwrap().remove(0).kind
    }

    #[test]
    fn test_escapes() {
        assert_eq!(first(r#""a\tb\n""#), TokenKind::String("a\tb\n".into()));
        assert_eq!(first(r#"'\x41\u00e9'"#), TokenKind::String("Aé".into()));
        assert_eq!(first(r#""\101\0""#), TokenKind::String("A\0".into()));
        assert_eq!(first(r#""it\'s""#), TokenKind::String("it's".into()));
    }

    #[test]
    fn test_triple_quoted_is_raw_and_multiline() {
        assert_eq!(first("'''a\\n\nb'''"), TokenKind::String("a\\n\nb".into()));
    }

    #[test]
    fn test_unterminated_string_is_eof_error() {
        let err = lex("x = 'abc").unwrap_err();
        assert!(err.is_eof);
        assert!(lex("x = \"\"\"abc").unwrap_err().is_eof);
    }

    #[test]
    fn test_regexp_class_may_contain_slash() {
        assert_eq!(
            first("/[/]+/g"),
            TokenKind::RegExp {
                pattern: "[/]+".into(),
                flags: "g".into()
            }
        );
    }
}
