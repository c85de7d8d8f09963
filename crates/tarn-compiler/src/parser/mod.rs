//! Recursive-descent pattern parser.
//!
//! Precedence, lowest first: alternation, concatenation, quantifiers, atoms.
//! Anything outside the supported syntax is an error, never ignored.

mod class;
mod error;

#[cfg(test)]
mod class_tests;
#[cfg(test)]
mod error_tests;

pub use error::{ParseError, ParseErrorKind};

use crate::ast::Node;
use class::{ClassItem, ClassSet};

/// Largest bound accepted in `{m,n}`.
pub const MAX_REPETITION: u32 = 1000;

/// Deepest group nesting accepted.
pub const MAX_NESTING: usize = 250;

type Result<T> = std::result::Result<T, ParseError>;

/// Parse pattern text into a syntax tree.
pub fn parse(text: &str) -> Result<Node> {
    let mut parser = Parser::new(text);
    let node = parser.alternation()?;
    match parser.peek() {
        None => Ok(node),
        // only a `)` stops the top-level alternation early
        Some(_) => Err(parser.error(ParseErrorKind::UnbalancedGroup)),
    }
}

struct Parser<'a> {
    text: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Byte offset of the current char (or end of text).
    fn offset(&self) -> usize {
        self.offset_of(self.pos)
    }

    fn offset_of(&self, index: usize) -> usize {
        self.chars.get(index).map_or(self.text.len(), |&(o, _)| o)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.offset(), kind)
    }

    fn error_at(&self, index: usize, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.offset_of(index), kind)
    }

    fn alternation(&mut self) -> Result<Node> {
        let mut branches = vec![self.concat()?];
        while self.eat('|') {
            branches.push(self.concat()?);
        }
        if branches.len() == 1 {
            return Ok(branches.remove(0));
        }
        Ok(Node::Alternation(branches))
    }

    fn concat(&mut self) -> Result<Node> {
        let mut items = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let atom = self.atom()?;
            items.push(self.quantified(atom)?);
        }
        if items.len() == 1 {
            return Ok(items.remove(0));
        }
        Ok(Node::Concat(items))
    }

    fn quantified(&mut self, atom: Node) -> Result<Node> {
        let start = self.pos;
        let Some((min, max)) = self.quantifier()? else {
            return Ok(atom);
        };
        if self.at_quantifier() {
            return Err(self.error(ParseErrorKind::RepeatedQuantifier));
        }
        if max.is_some_and(|max| min > max) {
            return Err(self.error_at(start, ParseErrorKind::InvalidQuantifierBounds));
        }
        Ok(Node::repeat(atom, min, max))
    }

    fn at_quantifier(&self) -> bool {
        matches!(self.peek(), Some('*' | '+' | '?' | '{'))
    }

    /// Parse a quantifier if one follows.
    fn quantifier(&mut self) -> Result<Option<(u32, Option<u32>)>> {
        let bounds = match self.peek() {
            Some('*') => (0, None),
            Some('+') => (1, None),
            Some('?') => (0, Some(1)),
            Some('{') => return self.counted().map(Some),
            _ => return Ok(None),
        };
        self.pos += 1;
        Ok(Some(bounds))
    }

    /// `{m}`, `{m,}` or `{m,n}`.
    fn counted(&mut self) -> Result<(u32, Option<u32>)> {
        let open = self.pos;
        self.pos += 1;
        let malformed = |p: &Self| p.error_at(open, ParseErrorKind::MalformedQuantifier);

        let min = self.number(open)?.ok_or_else(|| malformed(self))?;
        let max = if self.eat(',') {
            if self.peek() == Some('}') {
                None
            } else {
                Some(self.number(open)?.ok_or_else(|| malformed(self))?)
            }
        } else {
            Some(min)
        };
        if !self.eat('}') {
            return Err(malformed(self));
        }
        Ok((min, max))
    }

    fn number(&mut self, open: usize) -> Result<Option<u32>> {
        let mut value: Option<u32> = None;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            self.pos += 1;
            let next = value.unwrap_or(0).saturating_mul(10).saturating_add(d);
            value = Some(next);
        }
        if value.is_some_and(|v| v > MAX_REPETITION) {
            return Err(self.error_at(open, ParseErrorKind::RepetitionTooLarge));
        }
        Ok(value)
    }

    fn atom(&mut self) -> Result<Node> {
        let index = self.pos;
        let Some(c) = self.bump() else {
            return Err(self.error(ParseErrorKind::NothingToRepeat));
        };
        match c {
            '(' => self.group(index),
            '[' => self.class(index),
            '.' => Ok(ClassSet::any_but_newline().into_node()),
            '\\' => match self.escape(index)? {
                ClassItem::Char(c) => Ok(Node::Literal(c)),
                ClassItem::Set(set) => Ok(set.into_node()),
            },
            '*' | '+' | '?' | '{' => Err(self.error_at(index, ParseErrorKind::NothingToRepeat)),
            '^' => Err(self.error_at(index, ParseErrorKind::Unsupported("start anchor"))),
            '$' => Err(self.error_at(index, ParseErrorKind::Unsupported("end anchor"))),
            c => Ok(Node::Literal(c)),
        }
    }

    fn group(&mut self, open: usize) -> Result<Node> {
        if self.eat('?') {
            match self.bump() {
                Some(':') => {}
                Some('=' | '!') => {
                    return Err(self.error_at(open, ParseErrorKind::Unsupported("lookahead")));
                }
                Some('<') => {
                    return Err(self.error_at(open, ParseErrorKind::Unsupported("lookbehind")));
                }
                _ => return Err(self.error_at(open, ParseErrorKind::Unsupported("group flags"))),
            }
        }

        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error_at(open, ParseErrorKind::NestingTooDeep));
        }
        let inner = self.alternation()?;
        self.depth -= 1;

        if !self.eat(')') {
            return Err(self.error_at(open, ParseErrorKind::UnclosedGroup));
        }
        Ok(Node::group(inner))
    }

    /// Character class after the opening `[`.
    fn class(&mut self, open: usize) -> Result<Node> {
        let invalid = |p: &Self| p.error_at(open, ParseErrorKind::InvalidClass);
        let negated = self.eat('^');
        let mut set = ClassSet::new();

        let mut first = true;
        loop {
            let index = self.pos;
            let lo = match self.bump() {
                None => return Err(invalid(self)),
                Some(']') if !first => break,
                Some('\\') => self.escape(index)?,
                Some(c) => ClassItem::Char(c),
            };
            first = false;

            let is_range = self.peek() == Some('-') && !matches!(self.peek_at(1), None | Some(']'));
            if !is_range {
                set.push_item(lo);
                continue;
            }
            self.pos += 1;

            let hi_index = self.pos;
            let hi = match self.bump() {
                Some('\\') => self.escape(hi_index)?,
                Some(c) => ClassItem::Char(c),
                None => return Err(invalid(self)),
            };
            match (lo, hi) {
                (ClassItem::Char(lo), ClassItem::Char(hi)) if lo <= hi => set.push(lo, hi),
                _ => return Err(self.error_at(index, ParseErrorKind::InvalidClass)),
            }
        }

        if negated {
            set = set.negate();
        }
        Ok(set.into_node())
    }

    /// Escape sequence after the backslash at `index`.
    fn escape(&mut self, index: usize) -> Result<ClassItem> {
        let Some(c) = self.bump() else {
            return Err(self.error_at(index, ParseErrorKind::TrailingEscape));
        };
        let item = match c {
            'n' => ClassItem::Char('\n'),
            'r' => ClassItem::Char('\r'),
            't' => ClassItem::Char('\t'),
            'f' => ClassItem::Char('\u{0C}'),
            'v' => ClassItem::Char('\u{0B}'),
            '0' => ClassItem::Char('\0'),
            'x' => ClassItem::Char(self.hex_byte(index)?),
            'u' => ClassItem::Char(self.unicode(index)?),
            'd' => ClassItem::Set(ClassSet::digit()),
            'D' => ClassItem::Set(ClassSet::digit().negate()),
            'w' => ClassItem::Set(ClassSet::word()),
            'W' => ClassItem::Set(ClassSet::word().negate()),
            's' => ClassItem::Set(ClassSet::space()),
            'S' => ClassItem::Set(ClassSet::space().negate()),
            '1'..='9' => {
                return Err(self.error_at(index, ParseErrorKind::Unsupported("backreference")));
            }
            'b' | 'B' | 'A' | 'z' | 'Z' => {
                return Err(self.error_at(index, ParseErrorKind::Unsupported("anchor")));
            }
            c if c.is_alphanumeric() => {
                return Err(self.error_at(index, ParseErrorKind::UnknownEscape));
            }
            c => ClassItem::Char(c),
        };
        Ok(item)
    }

    /// `\xHH`: exactly two hex digits.
    fn hex_byte(&mut self, index: usize) -> Result<char> {
        let mut value = 0u32;
        for _ in 0..2 {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error_at(index, ParseErrorKind::InvalidCodepoint))?;
            self.pos += 1;
            value = value * 16 + digit;
        }
        char::from_u32(value).ok_or_else(|| self.error_at(index, ParseErrorKind::InvalidCodepoint))
    }

    /// `\u{H...}`: one to six hex digits naming a scalar value.
    fn unicode(&mut self, index: usize) -> Result<char> {
        let invalid = |p: &Self| p.error_at(index, ParseErrorKind::InvalidCodepoint);
        if !self.eat('{') {
            return Err(invalid(self));
        }
        let mut value = 0u32;
        let mut digits = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(16)) {
            self.pos += 1;
            digits += 1;
            if digits > 6 {
                return Err(invalid(self));
            }
            value = value * 16 + d;
        }
        if digits == 0 || !self.eat('}') {
            return Err(invalid(self));
        }
        char::from_u32(value).ok_or_else(|| invalid(self))
    }
}
