//! Pattern text for a syntax tree.
//!
//! The output parses back to a tree with the same language. Groups are
//! inserted only where precedence requires them.

use std::fmt::{self, Display, Formatter, Write as _};

use super::Node;

const META: &[char] = &[
    '\\', '.', '[', ']', '{', '}', '(', ')', '*', '+', '?', '|', '^', '$',
];

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(c) => write_char(f, *c),
            Node::CharRange(lo, hi) if lo == hi => write_char(f, *lo),
            Node::CharRange(lo, hi) => {
                f.write_char('[')?;
                write_class_char(f, *lo)?;
                f.write_char('-')?;
                write_class_char(f, *hi)?;
                f.write_char(']')
            }
            Node::Concat(children) => {
                for child in children {
                    if matches!(child, Node::Alternation(c) if !c.is_empty()) {
                        write!(f, "({child})")?;
                    } else {
                        write!(f, "{child}")?;
                    }
                }
                Ok(())
            }
            // Complement of every scalar value: the empty class.
            Node::Alternation(children) if children.is_empty() => f.write_str("[^\\u{0}-\\u{10ffff}]"),
            Node::Alternation(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_char('|')?;
                    }
                    write!(f, "{child}")?;
                }
                Ok(())
            }
            Node::Repetition { child, min, max } => {
                if needs_group(child) {
                    write!(f, "({child})")?;
                } else {
                    write!(f, "{child}")?;
                }
                match (*min, *max) {
                    (0, None) => f.write_char('*'),
                    (1, None) => f.write_char('+'),
                    (0, Some(1)) => f.write_char('?'),
                    (m, None) => write!(f, "{{{m},}}"),
                    (m, Some(n)) if m == n => write!(f, "{{{m}}}"),
                    (m, Some(n)) => write!(f, "{{{m},{n}}}"),
                }
            }
            Node::Group(child) => write!(f, "({child})"),
        }
    }
}

/// Operand of a quantifier must print as a single atom.
fn needs_group(node: &Node) -> bool {
    match node {
        Node::Literal(_) | Node::CharRange(..) | Node::Group(_) => false,
        Node::Concat(_) => true,
        Node::Alternation(children) => !children.is_empty(),
        Node::Repetition { .. } => true,
    }
}

fn write_char(f: &mut Formatter<'_>, c: char) -> fmt::Result {
    if META.contains(&c) {
        f.write_char('\\')?;
        return f.write_char(c);
    }
    write_plain(f, c)
}

fn write_class_char(f: &mut Formatter<'_>, c: char) -> fmt::Result {
    if matches!(c, '\\' | ']' | '[' | '^' | '-') {
        f.write_char('\\')?;
        return f.write_char(c);
    }
    write_plain(f, c)
}

fn write_plain(f: &mut Formatter<'_>, c: char) -> fmt::Result {
    match c {
        '\n' => f.write_str("\\n"),
        '\r' => f.write_str("\\r"),
        '\t' => f.write_str("\\t"),
        '\u{0B}' => f.write_str("\\v"),
        '\u{0C}' => f.write_str("\\f"),
        c if c.is_control() || (c.is_whitespace() && c != ' ') => write!(f, "\\u{{{:x}}}", c as u32),
        c => f.write_char(c),
    }
}
