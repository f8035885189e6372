//! Output configuration for the JavaScript generator

/// Generator settings derived from `CompileOptions`.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Emit newlines and indentation; otherwise favor compact output.
    pub beautify: bool,
    /// Spaces per indentation level (beautify only)
    pub indent_width: usize,
    /// Escape every non-ASCII character in strings and names.
    pub ascii_only: bool,
    /// Preferred line width for compact output; `0` means unlimited.
    pub max_line_len: usize,
    /// Re-emit leading `#` comments as `//` comments.
    pub comments: bool,
    /// Record a position map while printing.
    pub source_map: bool,
    /// Never choose octal number encodings.
    pub strict: bool,
    /// Skip the runtime helpers even when the program uses them.
    pub omit_baselib: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            beautify: false,
            indent_width: 4,
            ascii_only: false,
            max_line_len: 32000,
            comments: false,
            source_map: false,
            strict: false,
            omit_baselib: false,
        }
    }
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_beautify(mut self, beautify: bool) -> Self {
        self.beautify = beautify;
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_ascii_only(mut self, ascii_only: bool) -> Self {
        self.ascii_only = ascii_only;
        self
    }

    pub fn with_max_line_len(mut self, len: usize) -> Self {
        self.max_line_len = len;
        self
    }

    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_source_map(mut self, source_map: bool) -> Self {
        self.source_map = source_map;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_omit_baselib(mut self, omit: bool) -> Self {
        self.omit_baselib = omit;
        self
    }
}
