//! Box-drawing tree dumps used by the `dump()` debug printers.
//!
//! The printers recurse once per tree level, so they are meant for
//! inspecting small trees in tests and debugging sessions.

use crate::types::Node;

/// Renders one child given the indentation prefix for its own children.
pub type PrintChild<'a> = dyn Fn(&str) -> String + 'a;

/// Renders `children` below a node, one line per child.
///
/// Trailing `None` children are omitted; inner `None` children are skipped.
pub fn print_tree(tab: &str, children: &[Option<&PrintChild>]) -> String {
    let mut out = String::new();

    let Some(last) = children.iter().rposition(Option::is_some) else {
        return out;
    };

    for (i, child_opt) in children.iter().enumerate().take(last + 1) {
        let Some(child_fn) = *child_opt else {
            continue;
        };

        let is_last = i == last;
        let child_tab = format!("{tab}{}  ", if is_last { " " } else { "│" });
        let child = child_fn(&child_tab);
        let branch = if child.is_empty() {
            "│"
        } else if is_last {
            "└─"
        } else {
            "├─"
        };

        out.push('\n');
        out.push_str(tab);
        out.push_str(branch);
        if !child.is_empty() {
            out.push(' ');
            out.push_str(&child);
        }
    }

    out
}

/// Renders a binary subtree; missing children of inner nodes print as `∅`.
pub fn print_binary<N: Node>(
    arena: &[N],
    node: Option<u32>,
    tab: &str,
    label: &dyn Fn(&N) -> String,
) -> String {
    let Some(i) = node else {
        return "∅".to_string();
    };
    let n = &arena[i as usize];
    if n.l().is_none() && n.r().is_none() {
        return label(n);
    }
    let left: &PrintChild = &|tab: &str| print_binary(arena, n.l(), tab, label);
    let right: &PrintChild = &|tab: &str| print_binary(arena, n.r(), tab, label);
    format!("{}{}", label(n), print_tree(tab, &[Some(left), Some(right)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_nested_children() {
        let leaf: &PrintChild = &|_: &str| "leaf".to_string();
        let inner: &PrintChild =
            &|tab: &str| format!("inner{}", print_tree(tab, &[Some(leaf), Some(leaf)]));
        let out = format!("root{}", print_tree("", &[Some(inner), Some(leaf)]));
        assert_eq!(
            out,
            "root\n├─ inner\n│  ├─ leaf\n│  └─ leaf\n└─ leaf"
        );
    }

    #[test]
    fn skips_trailing_empty_children() {
        let leaf: &PrintChild = &|_: &str| "x".to_string();
        assert_eq!(print_tree("", &[Some(leaf), None]), "\n└─ x");
        assert_eq!(print_tree("", &[None, None]), "");
    }
}
