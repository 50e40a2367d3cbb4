use std::fmt::Debug;

use crate::print::print_binary;
use crate::types::{KeyNode, Node};
use crate::util::{
    attach, get_l, get_p, get_r, last, release, rotate_left, rotate_right, set_l, set_p, set_r,
};

/// Rotation pattern that lifts a node towards the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The parent is the root: one rotation.
    ///
    /// ```text
    ///     p          x
    ///    /            \
    ///   x      →       p
    /// ```
    Zig,
    /// Node and parent are children on the same side: rotate the
    /// grandparent first, then the parent.
    ///
    /// ```text
    ///       g        x
    ///      /          \
    ///     p     →      p
    ///    /              \
    ///   x                g
    /// ```
    ZigZig,
    /// Node and parent are children on opposite sides: rotate the parent,
    /// then the grandparent.
    ///
    /// ```text
    ///     g
    ///    /           x
    ///   p      →    / \
    ///    \         p   g
    ///     x
    /// ```
    ZigZag,
}

impl Step {
    /// Pattern for lifting `x`; `None` once `x` is on top.
    pub fn of<N: Node>(arena: &[N], x: u32) -> Option<Self> {
        let p = get_p(arena, x)?;
        let Some(g) = get_p(arena, p) else {
            return Some(Self::Zig);
        };
        let x_left = get_l(arena, p) == Some(x);
        let p_left = get_l(arena, g) == Some(p);
        Some(if x_left == p_left {
            Self::ZigZig
        } else {
            Self::ZigZag
        })
    }
}

/// Rotates `x` over its parent `p`.
#[inline]
fn lift<N: Node>(arena: &mut [N], x: u32, p: u32) {
    if get_l(arena, p) == Some(x) {
        rotate_right(arena, p);
    } else {
        rotate_left(arena, p);
    }
}

/// Splays `x` to the top of the tree it belongs to and returns it.
///
/// Stops at the first parentless ancestor, so a detached subtree can be
/// splayed on its own.
pub fn splay<N: Node>(arena: &mut [N], x: u32) -> u32 {
    while let Some(step) = Step::of(arena, x) {
        let p = get_p(arena, x).expect("non-top node has a parent");
        match step {
            Step::Zig => lift(arena, x, p),
            Step::ZigZig => {
                let g = get_p(arena, p).expect("zig-zig has a grandparent");
                lift(arena, p, g);
                lift(arena, x, p);
            }
            Step::ZigZag => {
                let g = get_p(arena, p).expect("zig-zag has a grandparent");
                lift(arena, x, p);
                lift(arena, x, g);
            }
        }
    }
    x
}

/// Hangs the detached node `n` under `parent` and splays it to the root.
pub fn insert<N: Node>(arena: &mut [N], n: u32, parent: u32, left: bool) -> u32 {
    attach(arena, n, parent, left);
    splay(arena, n)
}

/// Deletes the key stored at `n`, frees one arena slot and returns the root.
///
/// `n` is splayed to the root and cut away from both subtrees. The maximum
/// of the left subtree is then splayed to the top of that subtree, where it
/// has no right child, and the right subtree is hung there.
pub fn remove<N: Node>(arena: &mut Vec<N>, n: u32) -> Option<u32> {
    splay(arena, n);
    let l = get_l(arena, n);
    let r = get_r(arena, n);
    set_l(arena, n, None);
    set_r(arena, n, None);
    if let Some(l) = l {
        set_p(arena, l, None);
    }
    if let Some(r) = r {
        set_p(arena, r, None);
    }

    let root = match l {
        None => r,
        Some(l) => {
            let max = last(arena, Some(l)).expect("left subtree is non-empty");
            splay(arena, max);
            debug_assert!(get_r(arena, max).is_none());
            set_r(arena, max, r);
            if let Some(r) = r {
                set_p(arena, r, Some(max));
            }
            Some(max)
        }
    };
    release(arena, root, n).0
}

/// Debug printer for splay trees.
pub fn print<K, N>(arena: &[N], root: Option<u32>) -> String
where
    K: Debug,
    N: KeyNode<K>,
{
    print_binary(arena, root, "", &|n: &N| format!("{:?}", n.key()))
}
