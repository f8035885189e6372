//! Output stream with deferred semicolons and position tracking
//!
//! The stream is the only place generated text is written. It tracks the current line and
//! column, inserts the separating space two adjacent tokens need, and in compact mode defers
//! statement-ending semicolons until the next printed character shows one is required.

use super::config::OutputConfig;
use super::numbers::format_number;
use super::position_map::{Mapping, PositionMap};

/// A source position waiting for the next printed token.
#[derive(Debug, Clone, Copy)]
struct PendingMapping {
    source: u32,
    line: u32,
    col: u32,
    name: Option<u32>,
}

/// Stateful writer for generated JavaScript.
#[derive(Debug)]
pub struct OutputStream {
    buf: String,
    config: OutputConfig,
    indent_level: usize,
    /// 0-based line of the next character.
    line: u32,
    /// 0-based column of the next character.
    col: u32,
    might_need_semicolon: bool,
    pending_mapping: Option<PendingMapping>,
    map: Option<PositionMap>,
}

impl OutputStream {
    pub fn new(config: OutputConfig) -> Self {
        let map = config.source_map.then(PositionMap::new);
        Self {
            buf: String::with_capacity(4096),
            config,
            indent_level: 0,
            line: 0,
            col: 0,
            might_need_semicolon: false,
            pending_mapping: None,
            map,
        }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn beautify(&self) -> bool {
        self.config.beautify
    }

    /// Text written so far.
    pub fn get(&self) -> &str {
        &self.buf
    }

    /// Finish the output, returning the text and the position map if one was recorded.
    pub fn finish(self) -> (String, Option<PositionMap>) {
        (self.buf, self.map)
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    fn push(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += c.len_utf16() as u32;
            }
        }
        self.buf.push_str(s);
    }

    fn last_char(&self) -> Option<char> {
        self.buf.chars().next_back()
    }

    /// Print a token, materializing a deferred semicolon and a separating space when needed.
    pub fn print(&mut self, s: &str) {
        let Some(first) = s.chars().next() else {
            return;
        };
        if self.might_need_semicolon {
            self.might_need_semicolon = false;
            if first != ';' && first != '}' {
                self.push(";");
                if self.config.max_line_len > 0 && self.col as usize > self.config.max_line_len {
                    self.push("\n");
                }
            }
        }
        if self.last_char().is_some_and(|last| needs_space(last, first)) {
            self.push(" ");
        }
        self.flush_mapping();
        self.push(s);
    }

    /// End a statement. Compact output defers the `;` until something follows.
    pub fn semicolon(&mut self) {
        if self.config.beautify {
            self.print(";");
        } else {
            self.might_need_semicolon = true;
        }
    }

    /// Print a `;` unconditionally (loop headers, empty statements).
    pub fn force_semicolon(&mut self) {
        self.might_need_semicolon = false;
        self.print(";");
    }

    /// Optional whitespace: printed only when beautifying.
    pub fn space(&mut self) {
        if self.config.beautify {
            self.push(" ");
        }
    }

    pub fn newline(&mut self) {
        if self.config.beautify {
            self.push("\n");
        }
    }

    /// Indentation at the start of a line (beautify only).
    pub fn indent(&mut self) {
        if self.config.beautify {
            let width = self.indent_level * self.config.indent_width;
            self.push(&" ".repeat(width));
        }
    }

    pub fn push_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn pop_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn comma(&mut self) {
        self.print(",");
        self.space();
    }

    pub fn colon(&mut self) {
        self.print(":");
        self.space();
    }

    /// A binary operator surrounded by optional spaces. Word operators always get spaces.
    pub fn operator(&mut self, op: &str) {
        self.space();
        self.print(op);
        self.space();
    }

    pub fn print_name(&mut self, name: &str) {
        if self.config.ascii_only && !name.is_ascii() {
            let escaped = escape_non_ascii(name);
            self.print(&escaped);
        } else {
            self.print(name);
        }
    }

    pub fn print_string(&mut self, value: &str) {
        let quoted = quote_string(value, self.config.ascii_only);
        self.print(&quoted);
    }

    pub fn print_number(&mut self, value: f64) {
        let text = format_number(value, self.config.strict);
        self.print(&text);
    }

    /// A `//` comment on its own line.
    pub fn comment(&mut self, text: &str) {
        self.print(&format!("// {text}"));
        self.push("\n");
        self.indent();
    }

    /// Raw text that is already valid output (baselib helpers, verbatim code, shebang).
    pub fn print_raw(&mut self, text: &str) {
        if self.might_need_semicolon && !text.is_empty() {
            self.might_need_semicolon = false;
            self.push(";");
        }
        self.push(text);
    }

    /// Record that the next printed token came from `(line, col)` in source `source`.
    pub fn add_mapping(&mut self, source: u32, line: u32, col: u32, name: Option<&str>) {
        let Some(map) = self.map.as_mut() else {
            return;
        };
        let name = name.map(|n| map.add_name(n));
        self.pending_mapping = Some(PendingMapping { source, line, col, name });
    }

    /// Register a source file in the position map, returning its index.
    pub fn add_source(&mut self, filename: &str) -> Option<u32> {
        self.map.as_mut().map(|m| m.add_source(filename))
    }

    pub fn has_position_map(&self) -> bool {
        self.map.is_some()
    }

    fn flush_mapping(&mut self) {
        let Some(pending) = self.pending_mapping.take() else {
            return;
        };
        if let Some(map) = self.map.as_mut() {
            map.add_mapping(Mapping {
                generated_line: self.line,
                generated_column: self.col,
                source_index: pending.source,
                original_line: pending.line,
                original_column: pending.col,
                name_index: pending.name,
            });
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '\\'
}

/// Whether two adjacent tokens would fuse without a space between them.
fn needs_space(last: char, first: char) -> bool {
    (is_identifier_char(last) && is_identifier_char(first))
        || (last == '+' && first == '+')
        || (last == '-' && first == '-')
        || (last == '/' && first == '/')
}

fn escape_non_ascii(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

/// Quote `value` with whichever quote character needs fewer escapes (double on a tie).
pub fn quote_string(value: &str, ascii_only: bool) -> String {
    let doubles = value.matches('"').count();
    let singles = value.matches('\'').count();
    let quote = if doubles > singles { '\'' } else { '"' };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if ascii_only && !c.is_ascii() => out.push_str(&escape_non_ascii(&c.to_string())),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact() -> OutputStream {
        OutputStream::new(OutputConfig::default())
    }

    fn pretty() -> OutputStream {
        OutputStream::new(OutputConfig::default().with_beautify(true))
    }

    #[test]
    fn test_identifiers_get_separated() {
        let mut out = compact();
        out.print("return");
        out.print("x");
        out.print("+");
        out.print("+y");
        assert_eq!(out.get(), "return x+ +y");
    }

    #[test]
    fn test_semicolon_is_deferred_in_compact_mode() {
        let mut out = compact();
        out.print("{");
        out.print("a");
        out.semicolon();
        out.print("b");
        out.semicolon();
        out.print("}");
        out.semicolon();
        assert_eq!(out.get(), "{a;b}");
    }

    #[test]
    fn test_beautify_prints_semicolons_and_indentation() {
        let mut out = pretty();
        out.print("{");
        out.newline();
        out.push_indent();
        out.indent();
        out.print("a");
        out.semicolon();
        out.newline();
        out.pop_indent();
        out.indent();
        out.print("}");
        assert_eq!(out.get(), "{\n    a;\n}");
    }

    #[test]
    fn test_long_compact_lines_break_after_semicolons() {
        let mut out = OutputStream::new(OutputConfig::default().with_max_line_len(4));
        out.print("abcde");
        out.semicolon();
        out.print("f");
        assert_eq!(out.get(), "abcde;\nf");
    }

    #[test]
    fn test_quote_choice_minimizes_escapes() {
        assert_eq!(quote_string("plain", false), "\"plain\"");
        assert_eq!(quote_string("say \"hi\"", false), "'say \"hi\"'");
        assert_eq!(quote_string("it's", false), "\"it's\"");
        assert_eq!(quote_string("a\nb\\", false), "\"a\\nb\\\\\"");
        assert_eq!(quote_string("\u{0}", false), "\"\\x00\"");
    }

    #[test]
    fn test_ascii_only_escapes() {
        assert_eq!(quote_string("café", true), "\"caf\\u00e9\"");
        assert_eq!(quote_string("😀", true), "\"\\ud83d\\ude00\"");
        assert_eq!(quote_string("café", false), "\"café\"");
    }

    #[test]
    fn test_mapping_lands_after_inserted_separators() {
        let mut out = OutputStream::new(OutputConfig::default().with_source_map(true));
        let src = out.add_source("a.pyj").unwrap();
        out.print("x");
        out.semicolon();
        out.add_mapping(src, 1, 0, Some("y"));
        out.print("y");
        let (text, map) = out.finish();
        assert_eq!(text, "x;y");
        let map = map.unwrap();
        assert_eq!(map.mappings()[0].generated_column, 2);
        assert_eq!(map.names(), ["y"]);
    }

    #[test]
    fn test_no_map_without_option() {
        let mut out = compact();
        assert_eq!(out.add_source("a.pyj"), None);
        out.add_mapping(0, 0, 0, None);
        out.print("x");
        assert!(out.finish().1.is_none());
    }
}
