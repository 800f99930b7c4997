/*
 * provider.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Text bundle provider.
//!
//! [`TextProvider`] owns the current text bundle for an application. It
//! starts from a default snapshot, and the snapshot can be replaced at any
//! time, typically by a loader that fetches texts asynchronously and calls
//! a [`TextSetter`] when they arrive. Snapshots are swapped atomically: a
//! render reads whichever bundle is current when it starts.
//!
//! [`ExternalText`] describes one text to render (path, data and mode) and
//! renders it against a provider.

use crate::error::TextResult;
use crate::markdown::{ComrakRenderer, MarkdownRenderer};
use crate::options::EvalOptions;
use crate::render::{RenderMode, Rendered, get_with};
use crate::value::{DataContext, TextValue};
use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;

/// Shared holder of the current text bundle.
///
/// Cloning is cheap; clones share the same snapshot.
#[derive(Clone)]
pub struct TextProvider {
    texts: Arc<ArcSwapOption<TextValue>>,
    renderer: Arc<dyn MarkdownRenderer>,
    options: EvalOptions,
}

impl fmt::Debug for TextProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextProvider")
            .field("texts", &self.texts.load_full())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for TextProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TextProvider {
    /// Create a provider with a default (possibly absent) bundle.
    pub fn new(texts: Option<TextValue>) -> Self {
        Self {
            texts: Arc::new(ArcSwapOption::from(texts.map(Arc::new))),
            renderer: Arc::new(ComrakRenderer::default()),
            options: EvalOptions::default(),
        }
    }

    /// Use a different Markdown renderer.
    pub fn with_renderer(mut self, renderer: impl MarkdownRenderer + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Use different evaluation options.
    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    /// The current bundle snapshot.
    pub fn snapshot(&self) -> Option<Arc<TextValue>> {
        self.texts.load_full()
    }

    /// Replace the bundle.
    pub fn set_texts(&self, texts: Option<TextValue>) {
        self.setter().set(texts);
    }

    /// A handle that replaces this provider's bundle.
    pub fn setter(&self) -> TextSetter {
        TextSetter {
            texts: Arc::clone(&self.texts),
        }
    }

    /// Hand a setter to `loader`.
    ///
    /// The loader may call the setter right away, or keep it and call it
    /// later from another thread or task once texts have been fetched.
    pub fn load_texts<F>(&self, loader: F)
    where
        F: FnOnce(TextSetter),
    {
        loader(self.setter());
    }

    /// Render the text at `path` from the current snapshot.
    pub fn get(&self, path: &str, data: &DataContext, mode: RenderMode) -> TextResult<Rendered> {
        let snapshot = self.snapshot();
        get_with(
            snapshot.as_deref(),
            path,
            data,
            mode,
            self.renderer.as_ref(),
            &self.options,
        )
    }
}

/// Replaces the bundle of the [`TextProvider`] it came from.
#[derive(Clone)]
pub struct TextSetter {
    texts: Arc<ArcSwapOption<TextValue>>,
}

impl fmt::Debug for TextSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextSetter").finish_non_exhaustive()
    }
}

impl TextSetter {
    pub fn set(&self, texts: Option<TextValue>) {
        tracing::debug!(present = texts.is_some(), "replacing text bundle");
        self.texts.store(texts.map(Arc::new));
    }
}

/// One text to render: a path into the bundle, a data context and a mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalText {
    path: String,
    data: DataContext,
    mode: RenderMode,
}

impl ExternalText {
    /// Select the text at `path`, rendered as Markdown by default.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: DataContext::new(),
            mode: RenderMode::Markdown,
        }
    }

    /// Replace the data context.
    pub fn data(mut self, data: DataContext) -> Self {
        self.data = data;
        self
    }

    /// Bind a single data variable.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<TextValue>) -> Self {
        self.data.insert(key, value);
        self
    }

    pub fn mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn render(&self, provider: &TextProvider) -> TextResult<Rendered> {
        provider.get(&self.path, &self.data, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::PassthroughRenderer;
    use pretty_assertions::assert_eq;
    use std::thread;

    fn texts(greeting: &str) -> TextValue {
        TextValue::map([("greeting", greeting)])
    }

    #[test]
    fn test_default_snapshot() {
        let provider = TextProvider::new(Some(texts("Hello")));
        assert_eq!(provider.snapshot().as_deref(), Some(&texts("Hello")));

        let empty = TextProvider::default();
        assert!(empty.snapshot().is_none());
        assert_eq!(
            empty
                .get("greeting", &DataContext::new(), RenderMode::String)
                .unwrap(),
            Rendered::Text("{{greeting}}".to_string())
        );
    }

    #[test]
    fn test_set_texts_replaces_snapshot() {
        let provider = TextProvider::new(Some(texts("Hello")));
        let before = provider.snapshot();

        provider.set_texts(Some(texts("Bonjour")));

        // Earlier snapshots are unaffected.
        assert_eq!(before.as_deref(), Some(&texts("Hello")));
        assert_eq!(
            provider
                .get("greeting", &DataContext::new(), RenderMode::Raw)
                .unwrap(),
            Rendered::Text("Bonjour".to_string())
        );
    }

    #[test]
    fn test_load_texts_from_another_thread() {
        let provider = TextProvider::new(Some(texts("default")));
        let mut handle = None;
        provider.load_texts(|setter| {
            handle = Some(thread::spawn(move || setter.set(Some(texts("loaded")))));
        });
        handle.expect("loader should spawn").join().unwrap();

        assert_eq!(provider.snapshot().as_deref(), Some(&texts("loaded")));
    }

    #[test]
    fn test_clones_share_snapshot() {
        let provider = TextProvider::default();
        let clone = provider.clone();
        provider.set_texts(Some(texts("shared")));
        assert_eq!(clone.snapshot().as_deref(), Some(&texts("shared")));
    }

    #[test]
    fn test_external_text_defaults_to_markdown() {
        let provider = TextProvider::new(Some(TextValue::map([("title", "# ${name}")])));
        let rendered = ExternalText::new("title")
            .with("name", "Docs")
            .render(&provider)
            .unwrap();
        assert_eq!(rendered, Rendered::Html("<h1>Docs</h1>\n".to_string()));
    }

    #[test]
    fn test_external_text_with_mode_and_renderer() {
        let provider = TextProvider::new(Some(TextValue::map([("title", "# ${name}")])))
            .with_renderer(PassthroughRenderer);

        let text = ExternalText::new("title").with("name", "Docs");
        assert_eq!(text.path(), "title");
        assert_eq!(
            text.render(&provider).unwrap(),
            Rendered::Html("# Docs".to_string())
        );
        assert_eq!(
            text.clone().mode(RenderMode::Raw).render(&provider).unwrap(),
            Rendered::Text("# ${name}".to_string())
        );
    }

    #[test]
    fn test_provider_options() {
        let provider = TextProvider::new(Some(TextValue::map([("loop", "${$$.loop}!")])))
            .with_options(EvalOptions::new().with_max_passes(3));
        assert!(
            provider
                .get("loop", &DataContext::new(), RenderMode::String)
                .is_err()
        );
    }
}
