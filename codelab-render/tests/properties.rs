//! Property-based tests using proptest.
//!
//! These tests check the output invariants both backends promise for any
//! well-formed tree: determinism, environment filtering that removes exactly
//! the gated node, and block spacing.

use codelab_render::{
    CodeNode, Env, Flavor, ItemsListNode, ListNode, Node, TextNode, to_html, to_markdown,
    to_markdown_with, validate,
};
use proptest::prelude::*;

fn text_node() -> impl Strategy<Value = Node> {
    styled_text("[a-z ]{0,12}")
}

/// Text that always writes at least one character.
fn word_node() -> impl Strategy<Value = Node> {
    styled_text("[a-z]{1,8}")
}

fn styled_text(pattern: &'static str) -> impl Strategy<Value = Node> {
    (pattern, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(value, bold, italic, code)| {
            Node::Text(TextNode {
                value,
                bold,
                italic,
                code,
                ..Default::default()
            })
        },
    )
}

fn block_node() -> impl Strategy<Value = Node> {
    prop_oneof![
        (0usize..5, prop::collection::vec(text_node(), 0..3))
            .prop_map(|(level, content)| Node::header(level, content)),
        ("[a-z]{1,8}( [a-z]{1,8}){0,3}", any::<bool>(), prop::option::of("[a-z]{1,6}")).prop_map(
            |(value, term, lang)| Node::Code(CodeNode {
                value,
                lang,
                term,
                ..Default::default()
            })
        ),
        (0usize..4, prop::collection::vec(word_node(), 1..4)).prop_map(|(start, items)| {
            Node::ItemsList(ItemsListNode {
                items: items.into_iter().map(|n| vec![n]).collect(),
                start,
                ..Default::default()
            })
        }),
        prop::collection::vec(word_node(), 1..4).prop_map(|nodes| Node::List(ListNode {
            nodes,
            block: true,
            ..Default::default()
        })),
    ]
}

fn any_node() -> impl Strategy<Value = Node> {
    prop_oneof![text_node(), block_node()]
}

fn labels() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(vec!["web", "android", "ios"]), 0..3)
        .prop_map(|v| v.into_iter().map(String::from).collect())
}

proptest! {
    /// Rendering the same tree twice yields identical bytes.
    #[test]
    fn rendering_is_deterministic(nodes in prop::collection::vec(any_node(), 0..8)) {
        prop_assert_eq!(to_markdown(&nodes, "web").unwrap(), to_markdown(&nodes, "web").unwrap());
        prop_assert_eq!(to_html(&nodes, "web").unwrap(), to_html(&nodes, "web").unwrap());
    }

    /// A node gated to another environment contributes nothing, and its
    /// neighbours render as if it were absent.
    #[test]
    fn excluded_node_is_invisible(
        before in prop::collection::vec(any_node(), 0..4),
        hidden in any_node(),
        after in prop::collection::vec(any_node(), 0..4),
    ) {
        let mut with_hidden = before.clone();
        with_hidden.push(hidden.with_env(["android"]));
        with_hidden.extend(after.iter().cloned());

        let mut without = before;
        without.extend(after);

        prop_assert_eq!(
            to_markdown(&with_hidden, "web").unwrap(),
            to_markdown(&without, "web").unwrap()
        );
        prop_assert_eq!(
            to_html(&with_hidden, "web").unwrap(),
            to_html(&without, "web").unwrap()
        );
    }

    /// Consecutive blocks are separated by exactly one blank line in both
    /// Markdown flavors.
    #[test]
    fn blocks_never_double_blank(nodes in prop::collection::vec(block_node(), 1..8)) {
        for flavor in [Flavor::Classic, Flavor::StyleGuide] {
            let md = to_markdown_with(&nodes, "", &flavor.options()).unwrap();
            prop_assert!(md.starts_with('\n'), "{:?}: {:?}", flavor, md);
            prop_assert!(!md.contains("\n\n\n"), "{:?}: {:?}", flavor, md);
        }
    }

    /// Plain text never leaks markup into HTML output.
    #[test]
    fn html_text_is_escaped(value in "\\PC{0,60}") {
        let html = to_html(&[Node::text(value)], "").unwrap();
        prop_assert!(!html.contains('<') && !html.contains('>'), "{:?}", html);
    }

    /// Labels built through `Env::new` always satisfy the validator.
    #[test]
    fn built_envs_validate(labels in labels(), value in "[a-z]{0,8}") {
        let node = Node::text(value).with_env(labels.clone());
        prop_assert!(validate(&[node]).is_empty());
        let env = Env::new(labels);
        prop_assert!(env.labels().windows(2).all(|w| w[0] < w[1]));
    }
}
