/*
 * properties.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Property tests for escaping and fixed-point evaluation.
 */

use external_text::{DataContext, RenderMode, Rendered, TextValue, escape, evaluate, get, unescape};
use proptest::prelude::*;

proptest! {
    #[test]
    fn escape_round_trips(s in "[^\\\\]*") {
        prop_assert_eq!(unescape(&escape(&s)), s);
    }

    #[test]
    fn escape_leaves_no_bare_backticks(s in "[^\\\\]*") {
        let escaped = escape(&s);
        let bare = escaped
            .char_indices()
            .filter(|&(i, c)| c == '`' && !escaped[..i].ends_with('\\'))
            .count();
        prop_assert_eq!(bare, 0);
    }

    #[test]
    fn text_without_sites_is_a_fixed_point(s in "[^\\\\$]*") {
        let ctx = DataContext::new().with("a", "x");
        prop_assert_eq!(evaluate(&s, &ctx).unwrap(), s);
    }

    #[test]
    fn single_substitution(value in "[a-zA-Z0-9 `*#_.,!?-]*") {
        let ctx = DataContext::new().with("a", value.clone());
        prop_assert_eq!(evaluate("${a}", &ctx).unwrap(), value);
    }

    #[test]
    fn raw_mode_returns_leaves_untouched(leaves in prop::collection::vec("[^\\\\]*", 0..5)) {
        let texts = TextValue::map([("list", TextValue::from(leaves.clone()))]);
        let rendered = get(Some(&texts), "list", &DataContext::new(), RenderMode::Raw).unwrap();
        prop_assert_eq!(
            rendered,
            Rendered::List(leaves.into_iter().map(Rendered::Text).collect())
        );
    }
}
