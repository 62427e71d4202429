//! Parsed path representation

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::PathError;

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Named attribute (e.g. `city`)
    Attribute(Arc<str>),
    /// Position in a sequence (e.g. `[2]`)
    Index(usize),
    /// Key in a mapping (e.g. `[home]`, `['a.b']`)
    Key(Arc<str>),
    /// Call of a registered function (e.g. `upper()`, `orElse('n/a')`)
    Function { name: Arc<str>, args: Vec<Arc<str>> },
}

impl Segment {
    /// Human-readable kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Segment::Attribute(_) => "attribute",
            Segment::Index(_) => "index",
            Segment::Key(_) => "key",
            Segment::Function { .. } => "function call",
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Segment::Function { .. })
    }

    fn is_bracketed(&self) -> bool {
        matches!(self, Segment::Index(_) | Segment::Key(_))
    }
}

// Bare literals may not contain structural characters and must not look like an index.
fn needs_quotes(text: &str, in_arguments: bool) -> bool {
    text.is_empty()
        || text != text.trim()
        || (!in_arguments && text.bytes().all(|b| b.is_ascii_digit()))
        || text
            .chars()
            .any(|c| matches!(c, '.' | '[' | ']' | '(' | ')' | ',' | '\'' | '"' | '\\'))
}

fn write_literal(f: &mut fmt::Formatter<'_>, text: &str, in_arguments: bool) -> fmt::Result {
    if !needs_quotes(text, in_arguments) {
        return f.write_str(text);
    }
    f.write_str("'")?;
    for c in text.chars() {
        if c == '\'' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("'")
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Attribute(name) => f.write_str(name),
            Segment::Index(index) => write!(f, "[{index}]"),
            Segment::Key(key) => {
                f.write_str("[")?;
                write_literal(f, key, false)?;
                f.write_str("]")
            }
            Segment::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_literal(f, arg, true)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Render segments back to path text
pub fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 && !segment.is_bracketed() {
            out.push('.');
        }
        out.push_str(&segment.to_string());
    }
    out
}

/// An immutable, non-empty sequence of segments.
///
/// Built once per distinct raw path string and shared through the path cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    raw: Arc<str>,
    segments: SmallVec<[Segment; 4]>,
}

impl PathExpression {
    // Only the parser constructs expressions, and it never yields an empty one.
    pub(crate) fn new(raw: &str, segments: SmallVec<[Segment; 4]>) -> Self {
        debug_assert!(!segments.is_empty());
        Self {
            raw: Arc::from(raw),
            segments,
        }
    }

    /// The raw text this expression was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// The segment that decides the terminal read or write target
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Canonical rendering of the first `count` segments
    pub fn prefix(&self, count: usize) -> String {
        render(&self.segments[..count.min(self.segments.len())])
    }

    /// Whether any segment calls a function
    pub fn has_function_calls(&self) -> bool {
        self.segments.iter().any(Segment::is_function)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for PathExpression {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parse_path(s)
    }
}
