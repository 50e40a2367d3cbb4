use std::fmt::Debug;

use tracing::trace;

use crate::print::print_binary;
use crate::types::{Compare, Node};
use crate::util::{
    assert_links_and_order, attach, first, get_l, get_p, get_r, release, replace_child,
    rotate_left, rotate_right, set_l, set_p, set_r, swap_keys,
};

use super::types::{Color, RbNodeLike};

/// Missing children count as black.
#[inline]
fn is_red<K, N>(arena: &[N], i: Option<u32>) -> bool
where
    N: RbNodeLike<K>,
{
    i.is_some_and(|i| !arena[i as usize].is_black())
}

#[inline]
fn color<K, N>(arena: &[N], i: u32) -> Color
where
    N: RbNodeLike<K>,
{
    arena[i as usize].color()
}

#[inline]
fn set_color<K, N>(arena: &mut [N], i: u32, c: Color)
where
    N: RbNodeLike<K>,
{
    arena[i as usize].set_color(c);
}

/// Rotates `n` down towards `left` and refreshes `root` if `n` was on top.
fn rotate<N: Node>(arena: &mut [N], root: &mut u32, n: u32, left: bool) -> u32 {
    let top = if left {
        rotate_left(arena, n)
    } else {
        rotate_right(arena, n)
    };
    if get_p(arena, top).is_none() {
        *root = top;
    }
    top
}

/// Hangs the detached red node `n` under `parent` and restores the color
/// invariants. Returns the root.
pub fn insert<K, N>(arena: &mut [N], root: u32, n: u32, parent: u32, left: bool) -> u32
where
    N: RbNodeLike<K>,
{
    attach(arena, n, parent, left);
    set_color(arena, n, Color::Red);
    insert_fixup(arena, root, n)
}

fn insert_fixup<K, N>(arena: &mut [N], mut root: u32, mut n: u32) -> u32
where
    N: RbNodeLike<K>,
{
    while let Some(p) = get_p(arena, n) {
        if arena[p as usize].is_black() {
            break;
        }
        let Some(g) = get_p(arena, p) else {
            // Red parent is the root.
            set_color(arena, p, Color::Black);
            break;
        };

        let parent_is_left = get_l(arena, g) == Some(p);
        let uncle = if parent_is_left {
            get_r(arena, g)
        } else {
            get_l(arena, g)
        };

        if let Some(u) = uncle.filter(|&u| !arena[u as usize].is_black()) {
            set_color(arena, p, Color::Black);
            set_color(arena, u, Color::Black);
            set_color(arena, g, Color::Red);
            n = g;
            continue;
        }

        // Inner grandchild: rotate the parent away so the shape becomes a
        // straight line, then treat the old parent as the new node.
        let mut p = p;
        if parent_is_left && get_r(arena, p) == Some(n) {
            rotate_left(arena, p);
            n = p;
            p = get_p(arena, n).expect("rotated node has a parent");
        } else if !parent_is_left && get_l(arena, p) == Some(n) {
            rotate_right(arena, p);
            n = p;
            p = get_p(arena, n).expect("rotated node has a parent");
        }

        // Outer grandchild.
        set_color(arena, p, Color::Black);
        set_color(arena, g, Color::Red);
        rotate(arena, &mut root, g, !parent_is_left);
        break;
    }

    set_color(arena, root, Color::Black);
    root
}

/// Deletes the key stored at `n`, frees one arena slot and returns the root.
pub fn remove<K, N>(arena: &mut Vec<N>, root: u32, mut n: u32) -> Option<u32>
where
    N: RbNodeLike<K>,
{
    if let (Some(_), Some(r)) = (get_l(arena, n), get_r(arena, n)) {
        let successor = first(arena, Some(r)).expect("right subtree is non-empty");
        swap_keys(arena, n, successor);
        n = successor;
    }

    let mut root = Some(root);
    let p = get_p(arena, n);
    match get_l(arena, n).or(get_r(arena, n)) {
        // A node with a single child is black and the child is a red leaf.
        Some(c) => {
            set_p(arena, c, p);
            replace_child(arena, p, n, Some(c));
            set_color(arena, c, Color::Black);
            if p.is_none() {
                root = Some(c);
            }
        }
        None if p.is_none() => root = None,
        None => {
            if arena[n as usize].is_black() {
                let top = root.expect("non-empty tree has a root");
                root = Some(delete_fixup(arena, top, n));
            }
            // Fixup rotations never move `n` away from its parent.
            let parent = get_p(arena, n);
            replace_child(arena, parent, n, None);
        }
    }

    set_p(arena, n, None);
    set_l(arena, n, None);
    set_r(arena, n, None);
    release(arena, root, n).0
}

/// Situation around a node carrying an extra unit of black height.
///
/// `x` is the deficient node, `p` its parent, `s` its sibling. The near
/// nephew is the child of `s` on the same side as `x`; the far nephew is the
/// other one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteCase {
    /// `s` is red. Rotating `p` towards `x` gives `x` a black sibling.
    SiblingRed,
    /// `s` is black and the far nephew is red. One rotation at `p` ends the
    /// fixup.
    FarRedNephew,
    /// `s` is black, the near nephew red, the far nephew black. Rotating `s`
    /// away from `x` turns this into [`DeleteCase::FarRedNephew`].
    NearRedNephew,
    /// `s` and both nephews are black, `p` is red. Swapping the colors of `p`
    /// and `s` ends the fixup.
    AllBlackRedParent,
    /// `s`, both nephews and `p` are black. Painting `s` red moves the
    /// deficit up to `p`.
    AllBlackBlackParent,
}

impl DeleteCase {
    /// Case for the deficient child of `p` on the `x_left` side, with sibling `s`.
    pub fn classify<K, N>(arena: &[N], p: u32, s: u32, x_left: bool) -> Self
    where
        N: RbNodeLike<K>,
    {
        if !arena[s as usize].is_black() {
            return Self::SiblingRed;
        }
        let (near, far) = if x_left {
            (get_l(arena, s), get_r(arena, s))
        } else {
            (get_r(arena, s), get_l(arena, s))
        };
        if is_red(arena, far) {
            Self::FarRedNephew
        } else if is_red(arena, near) {
            Self::NearRedNephew
        } else if arena[p as usize].is_black() {
            Self::AllBlackBlackParent
        } else {
            Self::AllBlackRedParent
        }
    }
}

fn delete_fixup<K, N>(arena: &mut [N], mut root: u32, mut x: u32) -> u32
where
    N: RbNodeLike<K>,
{
    while let Some(p) = get_p(arena, x) {
        let x_left = get_l(arena, p) == Some(x);
        let sibling = if x_left {
            get_r(arena, p)
        } else {
            get_l(arena, p)
        };
        debug_assert!(sibling.is_some(), "double-black node must have a sibling");
        let Some(s) = sibling else {
            break;
        };

        let case = DeleteCase::classify(arena, p, s, x_left);
        trace!(?case, "red-black delete fixup");
        match case {
            DeleteCase::SiblingRed => {
                set_color(arena, s, Color::Black);
                set_color(arena, p, Color::Red);
                rotate(arena, &mut root, p, x_left);
            }
            DeleteCase::NearRedNephew => {
                let near = if x_left {
                    get_l(arena, s)
                } else {
                    get_r(arena, s)
                }
                .expect("red near nephew exists");
                set_color(arena, near, Color::Black);
                set_color(arena, s, Color::Red);
                rotate(arena, &mut root, s, !x_left);
            }
            DeleteCase::FarRedNephew => {
                let far = if x_left {
                    get_r(arena, s)
                } else {
                    get_l(arena, s)
                }
                .expect("red far nephew exists");
                let parent_color = color(arena, p);
                set_color(arena, s, parent_color);
                set_color(arena, p, Color::Black);
                set_color(arena, far, Color::Black);
                rotate(arena, &mut root, p, x_left);
                break;
            }
            DeleteCase::AllBlackRedParent => {
                set_color(arena, s, Color::Red);
                set_color(arena, p, Color::Black);
                break;
            }
            DeleteCase::AllBlackBlackParent => {
                set_color(arena, s, Color::Red);
                x = p;
            }
        }
    }
    root
}

pub fn assert_red_black_tree<K, N, C>(
    arena: &[N],
    root: Option<u32>,
    comparator: &C,
) -> Result<(), String>
where
    N: RbNodeLike<K>,
    C: Compare<K>,
{
    assert_links_and_order(arena, root, comparator, arena.len())?;
    let Some(root) = root else {
        return Ok(());
    };
    if !arena[root as usize].is_black() {
        return Err("Root is not black".to_string());
    }

    // Post-order with an explicit stack; `black` holds each subtree's black height.
    let mut black = vec![0usize; arena.len()];
    let mut stack = vec![(root, false)];
    while let Some((node, children_done)) = stack.pop() {
        let l = get_l(arena, node);
        let r = get_r(arena, node);
        let is_black = arena[node as usize].is_black();
        if !children_done {
            if !is_black {
                if is_red(arena, l) {
                    return Err("Red node has red left child".to_string());
                }
                if is_red(arena, r) {
                    return Err("Red node has red right child".to_string());
                }
            }
            stack.push((node, true));
            stack.extend(r.map(|r| (r, false)));
            stack.extend(l.map(|l| (l, false)));
            continue;
        }

        let lh = l.map_or(0, |l| black[l as usize]);
        let rh = r.map_or(0, |r| black[r as usize]);
        if lh != rh {
            return Err(format!("Black height mismatch: {lh} vs {rh}"));
        }
        black[node as usize] = lh + usize::from(is_black);
    }
    Ok(())
}

/// Black nodes on every root-to-leaf path; 0 when empty.
pub fn black_height<K, N>(arena: &[N], root: Option<u32>) -> usize
where
    N: RbNodeLike<K>,
{
    let mut height = 0;
    let mut curr = root;
    while let Some(i) = curr {
        if arena[i as usize].is_black() {
            height += 1;
        }
        curr = get_l(arena, i);
    }
    height
}

/// Debug printer for red-black trees.
pub fn print<K, N>(arena: &[N], root: Option<u32>) -> String
where
    K: Debug,
    N: RbNodeLike<K>,
{
    print_binary(arena, root, "", &|n: &N| {
        let color = if n.is_black() { "black" } else { "red" };
        format!("{:?} [{color}]", n.key())
    })
}
