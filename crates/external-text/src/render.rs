/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Selecting texts from a bundle and rendering their leaves.
//!
//! [`get`] resolves a path in a text bundle and maps a leaf transform over
//! everything below it. The transform depends on the [`RenderMode`]:
//! identity, template evaluation, or evaluation followed by Markdown
//! rendering. Lists and maps keep their shape; only leaves change.

use crate::error::TextResult;
use crate::markdown::{ComrakRenderer, MarkdownRenderer};
use crate::options::EvalOptions;
use crate::template::evaluate_with;
use crate::value::{BundleScope, DataContext, TextValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How each selected leaf is transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Leaves are returned unchanged.
    Raw,
    /// Leaves are evaluated as templates.
    #[default]
    String,
    /// Leaves are evaluated, then rendered as Markdown.
    #[serde(alias = "markup")]
    Markdown,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Raw => "raw",
            RenderMode::String => "string",
            RenderMode::Markdown => "markdown",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(RenderMode::Raw),
            "string" => Ok(RenderMode::String),
            "markdown" | "markup" => Ok(RenderMode::Markdown),
            other => Err(format!(
                "unknown render mode '{other}' (expected raw, string or markdown)"
            )),
        }
    }
}

/// The result of rendering a selected text.
///
/// Mirrors the shape of the selected [`TextValue`], with leaves replaced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rendered {
    /// A non-string leaf. Carries no content.
    Absent,
    /// Raw or evaluated text.
    Text(String),
    /// An HTML fragment produced from Markdown.
    Html(String),
    List(Vec<Rendered>),
    Map(IndexMap<String, Rendered>),
}

impl Rendered {
    /// The text of a `Text` or `Html` leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Rendered::Text(s) | Rendered::Html(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Rendered::Absent)
    }
}

impl From<&str> for Rendered {
    fn from(s: &str) -> Self {
        Rendered::Text(s.to_string())
    }
}

/// Map `f` over every leaf of `value`, keeping list and map structure.
///
/// Containers themselves are never passed to `f`. Empty containers come
/// back empty. The first error aborts the walk.
pub fn map_leaves<E, F>(value: &TextValue, f: &mut F) -> Result<Rendered, E>
where
    F: FnMut(&TextValue) -> Result<Rendered, E>,
{
    match value {
        TextValue::List(items) => items
            .iter()
            .map(|item| map_leaves(item, f))
            .collect::<Result<Vec<_>, E>>()
            .map(Rendered::List),
        TextValue::Map(entries) => entries
            .iter()
            .map(|(key, item)| map_leaves(item, f).map(|rendered| (key.clone(), rendered)))
            .collect::<Result<IndexMap<_, _>, E>>()
            .map(Rendered::Map),
        leaf => f(leaf),
    }
}

/// Select the text at `path` and render it.
///
/// Uses the comrak renderer and default evaluation options; see
/// [`get_with`].
pub fn get(
    texts: Option<&TextValue>,
    path: &str,
    data: &DataContext,
    mode: RenderMode,
) -> TextResult<Rendered> {
    get_with(
        texts,
        path,
        data,
        mode,
        &ComrakRenderer::default(),
        &EvalOptions::default(),
    )
}

/// Select the text at `path` and render it.
///
/// If `texts` is absent or `path` does not resolve (or resolves to null),
/// the placeholder `{{path}}` is rendered instead, so missing texts show up
/// in the output rather than failing.
///
/// Templates are evaluated with `$$` bound to `texts` and `data` layered on
/// top. A failure in any leaf fails the whole call.
pub fn get_with(
    texts: Option<&TextValue>,
    path: &str,
    data: &DataContext,
    mode: RenderMode,
    renderer: &dyn MarkdownRenderer,
    options: &EvalOptions,
) -> TextResult<Rendered> {
    let placeholder;
    let item = match texts.and_then(|t| t.get_path(path)) {
        Some(value) if !value.is_null() => value,
        _ => {
            tracing::debug!(path, "text not found, rendering placeholder");
            placeholder = TextValue::String(format!("{{{{{path}}}}}"));
            &placeholder
        }
    };

    let scope = BundleScope::new(texts, data);
    map_leaves(item, &mut |leaf| {
        let TextValue::String(value) = leaf else {
            return Ok(Rendered::Absent);
        };
        match mode {
            RenderMode::Raw => Ok(Rendered::Text(value.clone())),
            RenderMode::String => evaluate_with(value, &scope, options).map(Rendered::Text),
            RenderMode::Markdown => {
                let source = evaluate_with(value, &scope, options)?;
                Ok(Rendered::Html(renderer.render(&source)))
            }
        }
    })
}
