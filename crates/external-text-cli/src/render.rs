/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render command implementation
 */

//! Render command implementation.
//!
//! Loads a text bundle, renders the text at the requested path and prints
//! it. A single text is printed as-is; lists and maps are printed as JSON
//! with the same structure as the bundle.

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use external_text::{
    ComrakRenderer, DataContext, EvalOptions, RenderMode, Rendered, TextValue, get_with,
    load_bundle,
};

/// Arguments for the render command
#[derive(Debug)]
pub struct RenderArgs {
    /// Bundle file
    pub bundle: String,
    /// Path of the text to render
    pub path: String,
    /// Render mode
    pub mode: RenderMode,
    /// `KEY=VALUE` data variables
    pub data: Vec<String>,
    /// File with data variables
    pub data_file: Option<String>,
    /// Evaluation pass limit
    pub max_passes: Option<usize>,
    /// Pass raw HTML through Markdown rendering
    pub raw_html: bool,
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<()> {
    let texts = load_bundle(&args.bundle)
        .with_context(|| format!("Failed to load text bundle {}", args.bundle))?;
    let data = build_data(args.data_file.as_deref(), &args.data)?;
    debug!(variables = data.len(), "built data context");

    let options = match args.max_passes {
        Some(max) => EvalOptions::new().with_max_passes(max),
        None => EvalOptions::default(),
    };
    let renderer = ComrakRenderer::new().with_raw_html(args.raw_html);

    info!(path = %args.path, mode = %args.mode, "rendering text");
    let rendered = get_with(Some(&texts), &args.path, &data, args.mode, &renderer, &options)
        .with_context(|| format!("Failed to render {}", args.path))?;

    println!("{}", format_output(&rendered)?);
    Ok(())
}

/// Merge the data file (if any) with `KEY=VALUE` pairs; pairs win.
fn build_data(data_file: Option<&str>, pairs: &[String]) -> Result<DataContext> {
    let mut data = DataContext::new();

    if let Some(file) = data_file {
        let value =
            load_bundle(file).with_context(|| format!("Failed to load data file {file}"))?;
        let TextValue::Map(entries) = value else {
            bail!("Data file {file} must contain a mapping");
        };
        for (key, value) in entries {
            data.insert(key, value);
        }
    }

    for pair in pairs {
        let (key, value) = parse_pair(pair)?;
        data.insert(key, value);
    }

    Ok(data)
}

fn parse_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Invalid data variable '{pair}' (expected KEY=VALUE)"),
    }
}

fn format_output(rendered: &Rendered) -> Result<String> {
    match rendered {
        Rendered::Text(s) | Rendered::Html(s) => Ok(s.trim_end_matches('\n').to_string()),
        Rendered::Absent => Ok(String::new()),
        structure => Ok(serde_json::to_string_pretty(structure)?),
    }
}
