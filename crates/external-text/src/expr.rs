/*
 * expr.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Interpolation-site expressions.
//!
//! The body of a `${...}` site is a property path rooted at a bound name:
//!
//! ```text
//! expr     := ws* ident accessor* ws*
//! accessor := ws* "." ws* ident
//!           | ws* "[" ws* (integer | string) ws* "]"
//! ident    := [A-Za-z_$] [A-Za-z0-9_$]*     (Unicode letters allowed)
//! string   := '"' ... '"' | "'" ... "'"     (backslash escapes)
//! ```
//!
//! Nothing else is evaluated: there are no operators, calls or literals.

use crate::error::EvaluationError;
use crate::value::{Bindings, TextValue};

/// A parsed `${...}` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    /// The bound name the path starts from.
    pub root: String,
    /// Property names read in order after the root.
    pub accessors: Vec<String>,
    /// Source text of the expression, for error messages.
    pub source: String,
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Value(&'a TextValue),
    /// A property that does not exist on an existing value.
    Undefined,
}

impl Resolved<'_> {
    pub fn to_interpolated(self) -> String {
        match self {
            Resolved::Value(value) => value.to_interpolated(),
            Resolved::Undefined => "undefined".to_string(),
        }
    }
}

impl Expression {
    /// Parse the expression starting at byte `start` of `template`, just
    /// after the opening `${`.
    ///
    /// Returns the expression and the byte offset just past the closing `}`.
    pub fn parse(template: &str, start: usize) -> Result<(Expression, usize), EvaluationError> {
        let mut parser = ExprParser {
            src: template,
            pos: start,
        };
        parser.skip_ws();
        let root = parser.ident()?;
        let mut accessors = Vec::new();

        loop {
            parser.skip_ws();
            match parser.peek() {
                Some('.') => {
                    parser.bump();
                    parser.skip_ws();
                    accessors.push(parser.ident()?);
                }
                Some('[') => {
                    parser.bump();
                    parser.skip_ws();
                    let key = match parser.peek() {
                        Some(quote @ ('"' | '\'')) => parser.string(quote)?,
                        Some(c) if c.is_ascii_digit() => parser.integer(),
                        _ => return Err(parser.error("expected index or quoted property name")),
                    };
                    parser.skip_ws();
                    parser.expect(']')?;
                    accessors.push(key);
                }
                Some('}') => {
                    let end = parser.pos;
                    parser.bump();
                    let expression = Expression {
                        root,
                        accessors,
                        source: template[start..end].trim().to_string(),
                    };
                    return Ok((expression, parser.pos));
                }
                Some(c) => return Err(parser.error(format!("unexpected character '{c}'"))),
                None => return Err(parser.error("unterminated interpolation")),
            }
        }
    }

    /// Evaluate against `bindings`.
    ///
    /// An unbound root is an error, as is reading a property of
    /// `undefined` or `null`. A missing final property is `undefined`.
    pub fn evaluate<'a>(
        &self,
        bindings: &'a impl Bindings,
    ) -> Result<Resolved<'a>, EvaluationError> {
        let root = bindings
            .binding(&self.root)
            .ok_or_else(|| EvaluationError::UnboundIdentifier {
                name: self.root.clone(),
            })?;

        self.accessors
            .iter()
            .try_fold(Resolved::Value(root), |current, property| match current {
                Resolved::Undefined => Err(self.property_of_nothing(property, "undefined")),
                Resolved::Value(TextValue::Null) => Err(self.property_of_nothing(property, "null")),
                Resolved::Value(value) => {
                    Ok(value.child(property).map_or(Resolved::Undefined, Resolved::Value))
                }
            })
    }

    fn property_of_nothing(&self, property: &str, base: &'static str) -> EvaluationError {
        EvaluationError::PropertyOfNothing {
            property: property.to_string(),
            base,
            expression: self.source.clone(),
        }
    }
}

struct ExprParser<'a> {
    src: &'a str,
    pos: usize,
}

impl ExprParser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> EvaluationError {
        EvaluationError::Syntax {
            message: message.into(),
            offset: self.pos,
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), EvaluationError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error("unterminated interpolation")),
        }
    }

    fn ident(&mut self) -> Result<String, EvaluationError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if is_ident_start(c) => {
                self.bump();
            }
            Some(c) => return Err(self.error(format!("expected identifier, found '{c}'"))),
            None => return Err(self.error("unterminated interpolation")),
        }
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn integer(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let digits = &self.src[start..self.pos];
        // `a[007]` reads element 7, like any numeric property key.
        digits
            .parse::<usize>()
            .map_or_else(|_| digits.to_string(), |n| n.to_string())
    }

    fn string(&mut self, quote: char) -> Result<String, EvaluationError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
