use std::fmt::{self, Formatter, Write as _};

/// Configuration for printing compilation units as Java-like source.
#[derive(Debug, Clone)]
pub struct PrettyOptions {
    pub indent_size: usize,
    /// Annotate expression statements and returns with their resolved type.
    pub show_types: bool,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            show_types: false,
        }
    }
}

pub struct PrettyCtx<'a> {
    pub options: &'a PrettyOptions,
    indent: usize,
}

impl PrettyCtx<'_> {
    /// Writes `line` at the current indentation.
    pub fn writeln(&self, f: &mut Formatter<'_>, line: impl AsRef<str>) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", line.as_ref(), indent = self.indent)
    }

    pub fn with_indent<F>(&mut self, mut body: F) -> fmt::Result
    where
        F: FnMut(&mut Self) -> fmt::Result,
    {
        self.indent += self.options.indent_size;
        let result = body(self);
        self.indent -= self.options.indent_size;
        result
    }
}

/// Nodes that print across several lines (units, classes, members, statements).
pub trait PrettyPrintable {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result;
}

pub struct PrettyDisplay<'a, T> {
    value: &'a T,
    options: PrettyOptions,
}

impl<T: PrettyPrintable> fmt::Display for PrettyDisplay<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut ctx = PrettyCtx {
            options: &self.options,
            indent: 0,
        };
        self.value.fmt_pretty(f, &mut ctx)
    }
}

pub fn pretty<T: PrettyPrintable>(value: &T, options: PrettyOptions) -> PrettyDisplay<'_, T> {
    PrettyDisplay { value, options }
}

/// Escapes `input` for a Java literal delimited by `quote`.
pub fn escape_literal(input: &str, quote: char) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch == quote => {
                out.push('\\');
                out.push(ch);
            }
            ch if ch.is_control() => {
                let _ = write!(out, "\\u{:04x}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}
