/*
 * markdown.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Markdown rendering of evaluated texts.
//!
//! The core only hands the evaluated source to a [`MarkdownRenderer`];
//! what comes back is an opaque HTML fragment.

use comrak::{Options, markdown_to_html};

/// Trait for turning Markdown source into an HTML fragment.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, source: &str) -> String;
}

/// CommonMark renderer backed by comrak.
///
/// Raw HTML embedded in texts is passed through by default; texts are
/// trusted content supplied by the application.
#[derive(Debug, Clone)]
pub struct ComrakRenderer {
    allow_raw_html: bool,
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        Self {
            allow_raw_html: true,
        }
    }
}

impl ComrakRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable raw HTML passthrough.
    pub fn with_raw_html(mut self, allow: bool) -> Self {
        self.allow_raw_html = allow;
        self
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, source: &str) -> String {
        let mut options = Options::default();
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.render.r#unsafe = self.allow_raw_html;
        markdown_to_html(source, &options)
    }
}

/// Renderer that returns the source unchanged.
///
/// Useful in tests, and for callers that render Markdown themselves.
#[derive(Debug, Clone, Default)]
pub struct PassthroughRenderer;

impl MarkdownRenderer for PassthroughRenderer {
    fn render(&self, source: &str) -> String {
        source.to_string()
    }
}
