/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Path-addressed external texts with recursive interpolation.
//!
//! Applications keep their user-facing texts in a nested bundle (usually
//! loaded from JSON or YAML) and select them by path. Each selected string
//! can be:
//!
//! - returned as-is (`raw`),
//! - evaluated as a template (`string`): `${name}` sites are replaced from
//!   a data context, and `${$$.path.to.text}` refers to other texts in the
//!   bundle; evaluation repeats until the text stops changing,
//! - evaluated and rendered as Markdown (`markdown`).
//!
//! Selecting a list or map renders every string below it and keeps the
//! structure. Missing texts render as `{{path}}`.
//!
//! # Example
//!
//! ```ignore
//! use external_text::{DataContext, RenderMode, Rendered, TextValue, get};
//!
//! let texts = TextValue::from_yaml_str(
//!     "product: Widget\ngreeting: Hello ${user}, meet ${$$.product}.\n",
//! )?;
//! let data = DataContext::new().with("user", "Ada");
//!
//! let rendered = get(Some(&texts), "greeting", &data, RenderMode::String)?;
//! assert_eq!(rendered, Rendered::from("Hello Ada, meet Widget."));
//! ```

pub mod bundle;
pub mod error;
pub mod expr;
pub mod markdown;
pub mod options;
pub mod path;
pub mod provider;
pub mod render;
pub mod template;
pub mod value;

// Re-export main types at crate root
pub use bundle::load_bundle;
pub use error::{EvaluationError, TextError, TextResult};
pub use markdown::{ComrakRenderer, MarkdownRenderer, PassthroughRenderer};
pub use options::EvalOptions;
pub use path::Path;
pub use provider::{ExternalText, TextProvider, TextSetter};
pub use render::{RenderMode, Rendered, get, get_with, map_leaves};
pub use template::{escape, evaluate, evaluate_with, unescape};
pub use value::{BUNDLE_KEY, Bindings, BundleScope, DataContext, TextValue};
