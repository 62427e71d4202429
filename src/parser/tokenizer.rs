//! Tokenizer for path expressions
//!
//! Works on bytes: every structural character of the grammar is ASCII, and
//! identifiers are restricted to `[A-Za-z_][A-Za-z0-9_]*`. Bracket contents and
//! argument lists are read in one step because their literals may contain
//! characters that are structural elsewhere.

use crate::error::{PathError, Result};

/// A token with its byte range in the path text
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub start: usize,
    /// Exclusive
    pub end: usize,
}

/// A key or argument literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal<'input> {
    /// Unquoted text, zero-copy
    Bare(&'input str),
    /// Quoted text with escapes resolved
    Quoted(String),
}

impl Literal<'_> {
    pub fn as_str(&self) -> &str {
        match self {
            Literal::Bare(text) => text,
            Literal::Quoted(text) => text,
        }
    }
}

/// Path token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'input> {
    /// Identifier (e.g. `addresses`, `_id`)
    Identifier(&'input str),
    /// Segment separator (.)
    Dot,
    /// Bracketed index or key (e.g. `[2]`, `[home]`, `['a.b']`)
    Bracket(Literal<'input>),
    /// Parenthesized argument list (e.g. `(1, 'x')`)
    Arguments(Vec<Literal<'input>>),
}

/// Byte-oriented path tokenizer
pub struct Tokenizer<'input> {
    input: &'input str,
    bytes: &'input [u8],
    position: usize,
}

fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_identifier_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_quote(b: u8) -> bool {
    b == b'\'' || b == b'"'
}

impl<'input> Tokenizer<'input> {
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            position: 0,
        }
    }

    fn error(&self, offset: usize, reason: impl Into<String>) -> PathError {
        PathError::malformed(self.input, offset, reason)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.position += 1;
        }
    }

    // Character at `offset` for diagnostics; offsets always sit on a char boundary.
    fn char_at(&self, offset: usize) -> char {
        self.input[offset..].chars().next().unwrap_or('?')
    }

    /// Tokenize the whole input
    pub fn tokenize_all(mut self) -> Result<Vec<Spanned<Token<'input>>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Read the next token, `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<Spanned<Token<'input>>>> {
        let start = self.position;
        let Some(b) = self.peek() else {
            return Ok(None);
        };

        let token = match b {
            b'.' => {
                self.position += 1;
                Token::Dot
            }
            b'[' => Token::Bracket(self.read_bracket()?),
            b'(' => Token::Arguments(self.read_arguments()?),
            b']' => return Err(self.error(start, "unbalanced `]`")),
            b')' => return Err(self.error(start, "unbalanced `)`")),
            b if is_identifier_start(b) => Token::Identifier(self.read_identifier()),
            b if b.is_ascii_digit() => {
                return Err(self.error(start, "identifier cannot start with a digit"));
            }
            _ => {
                return Err(self.error(
                    start,
                    format!("unexpected character `{}`", self.char_at(start)),
                ));
            }
        };

        Ok(Some(Spanned {
            value: token,
            start,
            end: self.position,
        }))
    }

    fn read_identifier(&mut self) -> &'input str {
        let start = self.position;
        while self.peek().is_some_and(is_identifier_continue) {
            self.position += 1;
        }
        &self.input[start..self.position]
    }

    fn read_quoted(&mut self) -> Result<String> {
        let start = self.position;
        let quote = self.bytes[start];
        self.position += 1;

        let mut text = String::new();
        let mut chars = self.input[self.position..].char_indices();
        while let Some((offset, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, escaped)) => text.push(escaped),
                    None => break,
                },
                c if c as u32 == quote as u32 => {
                    self.position += offset + 1;
                    return Ok(text);
                }
                c => text.push(c),
            }
        }
        Err(self.error(start, "unterminated quoted string"))
    }

    fn read_bracket(&mut self) -> Result<Literal<'input>> {
        let open = self.position;
        self.position += 1;

        if self.peek().is_some_and(is_quote) {
            let key = self.read_quoted()?;
            if self.peek() != Some(b']') {
                return Err(self.error(self.position, "expected `]` after quoted key"));
            }
            self.position += 1;
            return Ok(Literal::Quoted(key));
        }

        let content_start = self.position;
        let Some(len) = self.bytes[content_start..].iter().position(|&b| b == b']') else {
            return Err(self.error(open, "unterminated `[`"));
        };
        self.position = content_start + len + 1;
        if len == 0 {
            return Err(self.error(open, "empty brackets"));
        }
        Ok(Literal::Bare(&self.input[content_start..content_start + len]))
    }

    fn read_arguments(&mut self) -> Result<Vec<Literal<'input>>> {
        let open = self.position;
        self.position += 1;

        let mut args = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b')') {
            self.position += 1;
            return Ok(args);
        }

        loop {
            self.skip_whitespace();
            let arg_start = self.position;
            let arg = match self.peek() {
                None => return Err(self.error(open, "unterminated argument list")),
                Some(b) if is_quote(b) => Literal::Quoted(self.read_quoted()?),
                Some(_) => self.read_bare_argument(open)?,
            };
            if matches!(arg, Literal::Bare(text) if text.is_empty()) {
                return Err(self.error(arg_start, "empty argument"));
            }
            args.push(arg);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.position += 1,
                Some(b')') => {
                    self.position += 1;
                    return Ok(args);
                }
                None => return Err(self.error(open, "unterminated argument list")),
                Some(_) => {
                    return Err(self.error(
                        self.position,
                        format!("unexpected character `{}` in argument list", self.char_at(self.position)),
                    ));
                }
            }
        }
    }

    fn read_bare_argument(&mut self, open: usize) -> Result<Literal<'input>> {
        let start = self.position;
        while let Some(b) = self.peek() {
            match b {
                b',' | b')' => break,
                b'(' => return Err(self.error(self.position, "unbalanced `(` in argument list")),
                _ => self.position += 1,
            }
        }
        if self.peek().is_none() {
            return Err(self.error(open, "unterminated argument list"));
        }
        Ok(Literal::Bare(self.input[start..self.position].trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Tokenizer::new(input)
            .tokenize_all()
            .unwrap()
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    #[test]
    fn test_identifiers_and_brackets() {
        assert_eq!(
            tokens("tags[1].city"),
            vec![
                Token::Identifier("tags"),
                Token::Bracket(Literal::Bare("1")),
                Token::Dot,
                Token::Identifier("city"),
            ]
        );
    }

    #[test]
    fn test_quoted_key_keeps_separators() {
        assert_eq!(
            tokens("m['a.b]']"),
            vec![
                Token::Identifier("m"),
                Token::Bracket(Literal::Quoted("a.b]".into())),
            ]
        );
        assert_eq!(
            tokens(r#"m["it\"s"]"#),
            vec![
                Token::Identifier("m"),
                Token::Bracket(Literal::Quoted("it\"s".into())),
            ]
        );
    }

    #[test]
    fn test_argument_lists() {
        assert_eq!(
            tokens("f( 1 , 'a,b',x y )"),
            vec![
                Token::Identifier("f"),
                Token::Arguments(vec![
                    Literal::Bare("1"),
                    Literal::Quoted("a,b".into()),
                    Literal::Bare("x y"),
                ]),
            ]
        );
        assert_eq!(
            tokens("f()"),
            vec![Token::Identifier("f"), Token::Arguments(vec![])]
        );
    }

    #[test]
    fn test_spans() {
        let spanned = Tokenizer::new("ab[3]").tokenize_all().unwrap();
        assert_eq!((spanned[0].start, spanned[0].end), (0, 2));
        assert_eq!((spanned[1].start, spanned[1].end), (2, 5));
    }

    #[test]
    fn test_malformed_inputs() {
        for (input, offset) in [
            ("a[1", 1),
            ("a[]", 1),
            ("f(1", 1),
            ("f(1,", 1),
            ("f(1,)", 4),
            ("f(g(1))", 3),
            ("m['x", 2),
            ("a b", 1),
            ("1a", 0),
            ("a]", 1),
        ] {
            match Tokenizer::new(input).tokenize_all() {
                Err(PathError::MalformedPath { offset: at, .. }) => {
                    assert_eq!(at, offset, "offset for {input:?}")
                }
                other => panic!("expected malformed path for {input:?}, got {other:?}"),
            }
        }
    }
}
