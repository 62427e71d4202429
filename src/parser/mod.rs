//! Path expression parser
//!
//! Turns path text such as `customer.addresses[2].city` or
//! `tags.orElse('none')` into a [`PathExpression`]. Grammar:
//!
//! ```text
//! path     := (segment | bracket) (('.' segment) | bracket)*
//! segment  := identifier | identifier '(' [arg (',' arg)*] ')'
//! bracket  := '[' index-or-key ']'
//! ```
//!
//! A bare bracket literal made of ASCII digits is an index; any other literal,
//! and every quoted literal, is a key.

pub mod cache;
pub mod segment;
pub mod tokenizer;

pub use cache::{PathCache, PathCacheStats};
pub use segment::{PathExpression, Segment};
pub use tokenizer::{Literal, Spanned, Token, Tokenizer};

use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{PathError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing consumed yet
    Start,
    /// After a separator, a name must follow
    AfterDot,
    /// After an attribute name, which an argument list may turn into a call
    AfterName,
    /// After a bracket or a call
    AfterSegment,
}

fn bracket_segment(raw: &str, literal: Literal<'_>, start: usize) -> Result<Segment> {
    match literal {
        Literal::Bare(text) if text.bytes().all(|b| b.is_ascii_digit()) => text
            .parse::<usize>()
            .map(Segment::Index)
            .map_err(|_| PathError::malformed(raw, start + 1, "index does not fit in usize")),
        literal => Ok(Segment::Key(Arc::from(literal.as_str()))),
    }
}

/// Parse path text into a [`PathExpression`].
///
/// Parsing is pure. Use [`PathCache`] to pay the cost once per distinct string.
pub fn parse_path(raw: &str) -> Result<PathExpression> {
    let tokens = Tokenizer::new(raw).tokenize_all()?;
    let mut segments: SmallVec<[Segment; 4]> = SmallVec::new();
    let mut state = State::Start;

    for Spanned { value, start, .. } in tokens {
        state = match (value, state) {
            (Token::Dot, State::Start | State::AfterDot) => {
                return Err(PathError::malformed(raw, start, "empty segment"));
            }
            (Token::Dot, _) => State::AfterDot,

            (Token::Identifier(name), State::Start | State::AfterDot) => {
                segments.push(Segment::Attribute(Arc::from(name)));
                State::AfterName
            }
            (Token::Identifier(_), _) => {
                return Err(PathError::malformed(raw, start, "expected `.` before name"));
            }

            (Token::Arguments(args), State::AfterName) => {
                let Some(Segment::Attribute(name)) = segments.pop() else {
                    return Err(PathError::malformed(raw, start, "argument list without name"));
                };
                let args = args.iter().map(|arg| Arc::from(arg.as_str())).collect();
                segments.push(Segment::Function { name, args });
                State::AfterSegment
            }
            (Token::Arguments(_), _) => {
                return Err(PathError::malformed(raw, start, "argument list without name"));
            }

            (Token::Bracket(_), State::AfterDot) => {
                return Err(PathError::malformed(raw, start, "expected name after `.`"));
            }
            (Token::Bracket(literal), _) => {
                segments.push(bracket_segment(raw, literal, start)?);
                State::AfterSegment
            }
        };
    }

    match state {
        State::Start => Err(PathError::malformed(raw, 0, "empty path")),
        State::AfterDot => Err(PathError::malformed(raw, raw.len(), "empty segment")),
        State::AfterName | State::AfterSegment => {
            log::trace!("parsed `{raw}` into {} segments", segments.len());
            Ok(PathExpression::new(raw, segments))
        }
    }
}
