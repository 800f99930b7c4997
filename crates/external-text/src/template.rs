/*
 * template.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Fixed-point template evaluation.
//!
//! A text is treated as a template with `${...}` interpolation sites and
//! evaluated repeatedly: interpolated values may themselves contain sites
//! (typically `${$$.other.text}` cross-references), so evaluation continues
//! until a pass leaves the text unchanged.
//!
//! Backticks are escaped before every pass and unescaped at the end. The
//! backtick is the template delimiter of the evaluation scheme and also
//! significant in Markdown, so texts must be able to carry it through.

use crate::error::{EvaluationError, TextError, TextResult};
use crate::expr::Expression;
use crate::options::EvalOptions;
use crate::value::Bindings;

/// Escape every backtick that is not already preceded by a backslash.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev = None;
    for c in s.chars() {
        if c == '`' && prev != Some('\\') {
            out.push('\\');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Inverse of [`escape`].
pub fn unescape(s: &str) -> String {
    s.replace("\\`", "`")
}

/// Evaluate `template` to a fixed point with default options.
pub fn evaluate(template: &str, context: &impl Bindings) -> TextResult<String> {
    evaluate_with(template, context, &EvalOptions::default())
}

/// Evaluate `template` to a fixed point.
///
/// Each pass escapes the current text and evaluates it; evaluation stops
/// when a pass returns exactly its (escaped) input. A text whose expansion
/// never settles loops forever unless `options.max_passes` is set.
pub fn evaluate_with(
    template: &str,
    context: &impl Bindings,
    options: &EvalOptions,
) -> TextResult<String> {
    let mut previous = String::new();
    let mut current = template.to_string();
    let mut passes = 0;

    loop {
        let escaped = escape(&current);
        if escaped == previous {
            tracing::debug!(passes, "template reached a fixed point");
            return Ok(unescape(&escaped));
        }
        if options.max_passes.is_some_and(|max| passes >= max) {
            return Err(TextError::NoFixedPoint { passes });
        }
        current = evaluate_once(&escaped, context)?;
        passes += 1;
        tracing::trace!(pass = passes, output = %current, "evaluated template pass");
        previous = escaped;
    }
}

/// Run a single evaluation pass over an escaped template.
///
/// Literal text is copied through, except that `` \` `` and `\$` produce
/// the bare character. A `\\` pair is copied verbatim, as is any other
/// backslash. Each `${...}` site is replaced by its value.
pub fn evaluate_once(template: &str, context: &impl Bindings) -> Result<String, EvaluationError> {
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;

    while let Some(c) = template[pos..].chars().next() {
        let next = template[pos + c.len_utf8()..].chars().next();
        match (c, next) {
            ('\\', Some(escaped @ ('`' | '$'))) => {
                out.push(escaped);
                pos += 2;
            }
            ('\\', Some('\\')) => {
                out.push_str("\\\\");
                pos += 2;
            }
            ('$', Some('{')) => {
                let (expression, end) = Expression::parse(template, pos + 2)?;
                out.push_str(&expression.evaluate(context)?.to_interpolated());
                pos = end;
            }
            _ => {
                out.push(c);
                pos += c.len_utf8();
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{DataContext, TextValue};
    use pretty_assertions::assert_eq;

    fn ctx() -> DataContext {
        DataContext::new()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a`b"), "a\\`b");
        assert_eq!(escape("``"), "\\`\\`");
        assert_eq!(escape("a\\`b"), "a\\`b");
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("a\\`b"), "a`b");
        assert_eq!(unescape(&escape("`code` and ``more``")), "`code` and ``more``");
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(evaluate("Hello, world!", &ctx()).unwrap(), "Hello, world!");
        assert_eq!(evaluate("", &ctx()).unwrap(), "");
    }

    #[test]
    fn test_single_substitution() {
        let ctx = ctx().with("a", "x");
        assert_eq!(evaluate("${a}", &ctx).unwrap(), "x");
        assert_eq!(evaluate("<${a}>", &ctx).unwrap(), "<x>");
        assert_eq!(evaluate("${ a }${a}", &ctx).unwrap(), "xx");
    }

    #[test]
    fn test_chained_interpolation() {
        let texts = TextValue::map([("b", "${$$.c}"), ("c", "z")]);
        let ctx = ctx().with("$$", texts);
        assert_eq!(evaluate("${$$.b}", &ctx).unwrap(), "z");
    }

    #[test]
    fn test_interpolated_data_is_reevaluated() {
        let ctx = ctx().with("greeting", "Hello, ${name}").with("name", "Ada");
        assert_eq!(evaluate("${greeting}!", &ctx).unwrap(), "Hello, Ada!");
    }

    #[test]
    fn test_backticks_survive() {
        assert_eq!(evaluate("a`b", &ctx()).unwrap(), "a`b");
        assert_eq!(
            evaluate("Use `cargo` to build", &ctx()).unwrap(),
            "Use `cargo` to build"
        );
    }

    #[test]
    fn test_backtick_in_interpolated_value() {
        let ctx = ctx().with("code", "`x`");
        assert_eq!(evaluate("Run ${code}.", &ctx).unwrap(), "Run `x`.");
    }

    #[test]
    fn test_non_string_values() {
        let ctx = ctx()
            .with("n", 42_i64)
            .with("flag", true)
            .with("items", vec!["a", "b"])
            .with("obj", TextValue::map([("k", "v")]))
            .with("nothing", TextValue::Null);
        assert_eq!(
            evaluate("${n} ${flag} ${items} ${obj} ${nothing} ${obj.none}", &ctx).unwrap(),
            "42 true a,b [object Object] null undefined"
        );
    }

    #[test]
    fn test_escaped_dollar_and_backslashes() {
        let ctx = ctx().with("a", "x");
        assert_eq!(evaluate("cost: \\$5", &ctx).unwrap(), "cost: $5");
        assert_eq!(evaluate("a\\\\b", &ctx).unwrap(), "a\\\\b");
        assert_eq!(evaluate("\\\\${a}", &ctx).unwrap(), "\\\\x");
        assert_eq!(evaluate("\\*not emphasis\\*", &ctx).unwrap(), "\\*not emphasis\\*");
    }

    #[test]
    fn test_unbound_identifier() {
        let err = evaluate("Hello ${name}", &ctx()).unwrap_err();
        assert!(matches!(
            err,
            TextError::Evaluation(EvaluationError::UnboundIdentifier { ref name }) if name == "name"
        ));
    }

    #[test]
    fn test_syntax_error() {
        let err = evaluate("broken ${a", &ctx().with("a", "x")).unwrap_err();
        assert!(matches!(
            err,
            TextError::Evaluation(EvaluationError::Syntax { .. })
        ));
    }

    #[test]
    fn test_max_passes() {
        // Each pass appends another layer, so this never settles.
        let ctx = ctx().with("grow", "${grow}+");
        let options = EvalOptions::new().with_max_passes(10);
        let err = evaluate_with("${grow}", &ctx, &options).unwrap_err();
        assert!(matches!(err, TextError::NoFixedPoint { passes: 10 }));
    }

    #[test]
    fn test_max_passes_not_hit_by_converging_text() {
        let ctx = ctx().with("a", "${b}").with("b", "done");
        let options = EvalOptions::new().with_max_passes(5);
        assert_eq!(evaluate_with("${a}", &ctx, &options).unwrap(), "done");
    }
}
