/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Text value and data context types.
//!
//! A text bundle is a [`TextValue`] tree whose leaves are (mostly) strings.
//! Data contexts bind identifier names to values for interpolation.
//!
//! Maps keep insertion order, so key and value iteration always agree.

use crate::path::Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node of a text bundle or a value bound in a data context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    /// A null/missing value.
    #[default]
    Null,

    /// A boolean value.
    Bool(bool),

    /// A numeric value.
    Number(serde_json::Number),

    /// A string value. The only kind of leaf that gets rendered.
    String(String),

    /// A list of values.
    List(Vec<TextValue>),

    /// A map of string keys to values, in insertion order.
    Map(IndexMap<String, TextValue>),
}

static NULL: TextValue = TextValue::Null;

impl TextValue {
    /// Shorthand for building a string leaf.
    pub fn string(s: impl Into<String>) -> Self {
        TextValue::String(s.into())
    }

    /// Build a map from key/value pairs, keeping their order.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<TextValue>,
    {
        TextValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TextValue::Null)
    }

    /// Containers are lists and maps; everything else is a leaf.
    pub fn is_container(&self) -> bool {
        matches!(self, TextValue::List(_) | TextValue::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TextValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Direct child lookup by a single property name.
    ///
    /// Lists accept decimal indices; scalars have no children.
    pub fn child(&self, key: &str) -> Option<&TextValue> {
        match self {
            TextValue::Map(m) => m.get(key),
            TextValue::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Look up a dotted/bracketed path such as `intro.items[2].title`.
    ///
    /// A path that is itself a key of this map wins over its split form,
    /// so `{"a.b": ..}` is reachable as `"a.b"`.
    pub fn get_path(&self, path: &str) -> Option<&TextValue> {
        if let TextValue::Map(m) = self {
            if let Some(value) = m.get(path) {
                return Some(value);
            }
        }
        Path::parse(path).lookup(self)
    }

    /// Stringify the way an interpolation site does.
    ///
    /// - String: as-is
    /// - Number: shortest form, integral floats without a fraction
    /// - Bool: `true` / `false`
    /// - Null: `null`
    /// - List: elements joined by `,`, null elements empty
    /// - Map: `[object Object]`
    pub fn to_interpolated(&self) -> String {
        match self {
            TextValue::Null => "null".to_string(),
            TextValue::Bool(b) => b.to_string(),
            TextValue::Number(n) => format_number(n),
            TextValue::String(s) => s.clone(),
            TextValue::List(items) => items
                .iter()
                .map(|item| match item {
                    TextValue::Null => String::new(),
                    other => other.to_interpolated(),
                })
                .collect::<Vec<_>>()
                .join(","),
            TextValue::Map(_) => "[object Object]".to_string(),
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

impl From<&str> for TextValue {
    fn from(s: &str) -> Self {
        TextValue::String(s.to_string())
    }
}

impl From<String> for TextValue {
    fn from(s: String) -> Self {
        TextValue::String(s)
    }
}

impl From<bool> for TextValue {
    fn from(b: bool) -> Self {
        TextValue::Bool(b)
    }
}

impl From<i64> for TextValue {
    fn from(n: i64) -> Self {
        TextValue::Number(n.into())
    }
}

impl From<f64> for TextValue {
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n).map_or(TextValue::Null, TextValue::Number)
    }
}

impl<T: Into<TextValue>> From<Vec<T>> for TextValue {
    fn from(items: Vec<T>) -> Self {
        TextValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<TextValue>> From<Option<T>> for TextValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(TextValue::Null, Into::into)
    }
}

/// Name lookup used by the template evaluator.
pub trait Bindings {
    /// The value bound to `name`, or `None` if the name is unbound.
    fn binding(&self, name: &str) -> Option<&TextValue>;
}

/// Flat mapping from identifier names to values, supplied per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataContext {
    variables: IndexMap<String, TextValue>,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TextValue>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder form of [`DataContext::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<TextValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&TextValue> {
        self.variables.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TextValue)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Bindings for DataContext {
    fn binding(&self, name: &str) -> Option<&TextValue> {
        self.get(name)
    }
}

impl<K: Into<String>, V: Into<TextValue>> FromIterator<(K, V)> for DataContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Reserved identifier bound to the whole text bundle.
pub const BUNDLE_KEY: &str = "$$";

/// A data context layered over the text bundle.
///
/// Equivalent to `{ $$: texts, ...data }`: the bundle is bound to `$$`
/// and caller data is applied on top, so data may shadow `$$`.
/// Borrows both sides, so building one per call costs nothing.
#[derive(Debug, Clone, Copy)]
pub struct BundleScope<'a> {
    texts: Option<&'a TextValue>,
    data: &'a DataContext,
}

impl<'a> BundleScope<'a> {
    pub fn new(texts: Option<&'a TextValue>, data: &'a DataContext) -> Self {
        Self { texts, data }
    }
}

impl Bindings for BundleScope<'_> {
    fn binding(&self, name: &str) -> Option<&TextValue> {
        match self.data.get(name) {
            Some(value) => Some(value),
            None if name == BUNDLE_KEY => Some(self.texts.unwrap_or(&NULL)),
            None => None,
        }
    }
}
