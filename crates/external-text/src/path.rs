/*
 * path.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Property paths into a text bundle.
//!
//! Paths use the usual property-access notation: `a.b`, `a[0]`,
//! `a["b.c"]`, `a['b']`. Every segment is a property name; numeric
//! segments index lists. Parsing never fails: malformed input yields
//! whatever segments can be read, which then simply fail to resolve.

use crate::value::TextValue;

/// A parsed property path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Split a path string into its segments.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = source.chars().peekable();
        // A segment is open at the start and after every `.`, but not
        // right after a `[...]` accessor.
        let mut open = true;

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if open {
                        segments.push(std::mem::take(&mut current));
                    }
                    open = true;
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                    segments.push(read_bracketed(&mut chars));
                    open = false;
                }
                _ => {
                    current.push(c);
                    open = true;
                }
            }
        }

        if open {
            segments.push(current);
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk the path from `root`. `None` means the path does not resolve.
    pub fn lookup<'a>(&self, root: &'a TextValue) -> Option<&'a TextValue> {
        self.segments
            .iter()
            .try_fold(root, |value, segment| value.child(segment))
    }
}

/// Read the inside of a `[...]` accessor, consuming the closing bracket.
fn read_bracketed(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut segment = String::new();
    match chars.peek().copied() {
        Some(quote @ ('"' | '\'')) => {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            segment.push(escaped);
                        }
                    }
                    c if c == quote => break,
                    c => segment.push(c),
                }
            }
            // Skip to the closing bracket.
            for c in chars.by_ref() {
                if c == ']' {
                    break;
                }
            }
        }
        _ => {
            for c in chars.by_ref() {
                if c == ']' {
                    break;
                }
                segment.push(c);
            }
        }
    }
    segment
}

impl std::str::FromStr for Path {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
