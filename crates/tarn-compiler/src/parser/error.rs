//! Parse error type and rendering.

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};
use serde::{Serialize, Serializer};

/// Why a pattern was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unmatched closing parenthesis")]
    UnbalancedGroup,
    #[error("unclosed group")]
    UnclosedGroup,
    #[error("repetition minimum exceeds maximum")]
    InvalidQuantifierBounds,
    #[error("repetition count exceeds {}", super::MAX_REPETITION)]
    RepetitionTooLarge,
    #[error("malformed repetition quantifier")]
    MalformedQuantifier,
    #[error("quantifier has nothing to repeat")]
    NothingToRepeat,
    #[error("quantifier follows another quantifier")]
    RepeatedQuantifier,
    #[error("invalid character class")]
    InvalidClass,
    #[error("pattern ends with a lone backslash")]
    TrailingEscape,
    #[error("unknown escape sequence")]
    UnknownEscape,
    #[error("invalid code point")]
    InvalidCodepoint,
    #[error("groups nested deeper than {}", super::MAX_NESTING)]
    NestingTooDeep,
    #[error("unsupported syntax: {0}")]
    Unsupported(&'static str),
}

/// A rejected pattern, positioned at a byte offset.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {position}")]
pub struct ParseError {
    pub position: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(position: usize, kind: ParseErrorKind) -> Self {
        Self { position, kind }
    }

    /// Render against the pattern text as an annotated snippet.
    pub fn render(&self, pattern: &str) -> String {
        self.render_with(pattern, Renderer::plain())
    }

    /// Like [`render`](Self::render) but with ANSI colors.
    pub fn render_styled(&self, pattern: &str) -> String {
        self.render_with(pattern, Renderer::styled())
    }

    fn render_with(&self, pattern: &str, renderer: Renderer) -> String {
        let mut start = self.position.min(pattern.len());
        while !pattern.is_char_boundary(start) {
            start -= 1;
        }
        // Zero-width spans are widened to one char so the caret is visible.
        let end = pattern[start..]
            .chars()
            .next()
            .map_or(start, |c| start + c.len_utf8());
        let message = self.kind.to_string();

        let report = [Level::ERROR.primary_title(&message).element(
            Snippet::source(pattern)
                .line_start(1)
                .annotation(AnnotationKind::Primary.span(start..end).label(&message)),
        )];
        renderer.render(&report).to_string()
    }
}

impl Serialize for ParseError {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = s.serialize_struct("ParseError", 2)?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("reason", &self.kind.to_string())?;
        state.end()
    }
}
