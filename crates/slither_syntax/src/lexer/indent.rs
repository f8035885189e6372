//! INDENT/DEDENT handling.
//!
//! The indentation stack stores whitespace *prefixes*, not widths, so tabs and spaces are
//! compared literally: a deeper level must extend the enclosing prefix, and a shallower line must
//! be a prefix of it.

use super::{Lexer, TokenKind};
use crate::diagnostics::CompileError;
use slither_core::lang::punctuation::PunctuationId;

impl<'a> Lexer<'a> {
    fn indent_top(&self) -> &str {
        self.indent_stack.last().map(String::as_str).unwrap_or("")
    }

    /// Compare the leading whitespace of a new logical line with the indent stack.
    ///
    /// Queues one INDENT when the previous line ended with `:`, or one DEDENT per closed level.
    pub(super) fn handle_indentation(&mut self, prefix: &str, at: usize) -> Result<(), CompileError> {
        let (line, col) = (self.line, 0);
        let opens_block = matches!(self.prev, Some(TokenKind::Punctuation(PunctuationId::Colon)));
        let top = self.indent_top().to_string();

        if opens_block {
            if prefix.len() > top.len() && prefix.starts_with(top.as_str()) {
                self.indent_stack.push(prefix.to_string());
                let indent = self.synthetic(TokenKind::Indent, self.pos);
                self.pending.push_back(indent);
                return Ok(());
            }
            return Err(self.error("Expected an indented block", at, line, col));
        }

        if prefix == top {
            return Ok(());
        }

        if top.starts_with(prefix) {
            while self.indent_stack.len() > 1 && self.indent_top() != prefix && self.indent_top().starts_with(prefix) {
                self.indent_stack.pop();
                let dedent = self.synthetic(TokenKind::Dedent, self.pos);
                self.pending.push_back(dedent);
            }
            if self.indent_top() != prefix {
                return Err(self
                    .error("Unindent does not match any outer indentation level", at, line, col)
                    .with_note(format!("line is indented by {} characters", prefix.len())));
            }
            return Ok(());
        }

        if prefix.starts_with(top.as_str()) {
            Err(self
                .error("Unexpected indent", at, line, col)
                .with_hint("only a line ending in ':' may be followed by a deeper indented block"))
        } else {
            Err(self.error("Inconsistent use of tabs and spaces in indentation", at, line, col))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};

    #[test]
    fn test_tabs_and_spaces_must_agree() {
        let err = lex("if a:\n\tb\n    c\n").unwrap_err();
        assert!(err.message.contains("tabs and spaces"), "{}", err.message);
    }

    #[test]
    fn test_blank_and_comment_lines_ignored() {
        let toks = lex("if a:\n\n    # note\n    b\n\n    c\n").unwrap();
        let indents = toks.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let dedents = toks.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        assert_eq!((indents, dedents), (1, 1));
    }

    #[test]
    fn test_inline_body_does_not_open_block() {
        let toks = lex("if a: b\nc\n").unwrap();
        assert!(toks.iter().all(|t| !t.kind.is_layout()));
    }
}
