use crate::error::Span;
use crate::symbol::TerminalID;
use smartstring::alias::String;
use std::fmt;

/// A lexical token handed to the parser: a terminal kind, its source text,
/// and an optional source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<T> {
    /// Token kind.
    pub terminal: T,
    /// Source text; empty for a synthesized END.
    pub lexeme: String,
    pub span: Option<Span>,
}

impl<T: TerminalID> Token<T> {
    /// Creates a token without a span.
    pub fn new(terminal: T, lexeme: impl AsRef<str>) -> Self {
        Self {
            terminal,
            lexeme: String::from(lexeme.as_ref()),
            span: None,
        }
    }

    /// The synthesized end-of-input token.
    pub fn end() -> Self {
        Self {
            terminal: T::END,
            lexeme: String::new(),
            span: None,
        }
    }

    /// Attaches a source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.terminal == T::END
    }

    /// Diagnostic description: kind, lexeme, and span when known.
    pub fn describe(&self) -> std::string::String {
        let mut out = format!("{:?}", self.terminal);
        if !self.lexeme.is_empty() {
            out.push_str(&format!(" `{}`", self.lexeme));
        }
        if let Some(span) = self.span {
            out.push_str(&format!(" at {}", span));
        }
        out
    }
}

impl<T: TerminalID> fmt::Display for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lexeme.is_empty() {
            write!(f, "{:?}", self.terminal)
        } else {
            f.write_str(&self.lexeme)
        }
    }
}
