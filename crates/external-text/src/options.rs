/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluation settings.

use serde::{Deserialize, Serialize};

/// Settings threaded through template evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EvalOptions {
    /// Give up with [`TextError::NoFixedPoint`](crate::TextError::NoFixedPoint)
    /// after this many passes. `None` evaluates until the text settles,
    /// however long that takes.
    pub max_passes: Option<usize>,
}

impl EvalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of evaluation passes.
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = Some(passes);
        self
    }
}
