use std::fmt::Debug;

use crate::print::print_binary;
use crate::types::Compare;
use crate::util::{
    assert_links_and_order, attach, first, get_l, get_p, get_r, release, replace_child,
    rotate_left, rotate_right, set_l, set_p, set_r, swap_keys,
};

use super::types::AvlNodeLike;

#[inline]
fn height<K, N>(arena: &[N], i: Option<u32>) -> i32
where
    N: AvlNodeLike<K>,
{
    i.map_or(0, |i| arena[i as usize].h())
}

#[inline]
fn update<K, N>(arena: &mut [N], n: u32)
where
    N: AvlNodeLike<K>,
{
    let lh = height(arena, get_l(arena, n));
    let rh = height(arena, get_r(arena, n));
    arena[n as usize].set_h(1 + lh.max(rh));
}

/// `height(left) - height(right)` from stored heights.
#[inline]
fn balance<K, N>(arena: &[N], n: u32) -> i32
where
    N: AvlNodeLike<K>,
{
    height(arena, get_l(arena, n)) - height(arena, get_r(arena, n))
}

/// Left-left case: single right rotation.
fn ll_rotate<K, N>(arena: &mut [N], n: u32) -> u32
where
    N: AvlNodeLike<K>,
{
    let top = rotate_right(arena, n);
    update(arena, n);
    update(arena, top);
    top
}

/// Right-right case: single left rotation.
fn rr_rotate<K, N>(arena: &mut [N], n: u32) -> u32
where
    N: AvlNodeLike<K>,
{
    let top = rotate_left(arena, n);
    update(arena, n);
    update(arena, top);
    top
}

/// Left-right case: rotate the left child left, then `n` right.
fn lr_rotate<K, N>(arena: &mut [N], n: u32) -> u32
where
    N: AvlNodeLike<K>,
{
    let nl = get_l(arena, n).expect("left-right case has a left child");
    rr_rotate(arena, nl);
    ll_rotate(arena, n)
}

/// Right-left case: rotate the right child right, then `n` left.
fn rl_rotate<K, N>(arena: &mut [N], n: u32) -> u32
where
    N: AvlNodeLike<K>,
{
    let nr = get_r(arena, n).expect("right-left case has a right child");
    ll_rotate(arena, nr);
    rr_rotate(arena, n)
}

/// Recomputes the height of `n` and rotates if it is out of balance.
///
/// Returns the node now on top of the subtree.
pub fn rebalance<K, N>(arena: &mut [N], n: u32) -> u32
where
    N: AvlNodeLike<K>,
{
    update(arena, n);
    let bf = balance(arena, n);
    if bf > 1 {
        let nl = get_l(arena, n).expect("left-heavy node has a left child");
        if balance(arena, nl) < 0 {
            lr_rotate(arena, n)
        } else {
            ll_rotate(arena, n)
        }
    } else if bf < -1 {
        let nr = get_r(arena, n).expect("right-heavy node has a right child");
        if balance(arena, nr) > 0 {
            rl_rotate(arena, n)
        } else {
            rr_rotate(arena, n)
        }
    } else {
        n
    }
}

/// Rebalances every ancestor from `start` upward; returns the root.
///
/// Stops early once a subtree keeps both its top and its height, since
/// nothing above it can have changed.
pub fn retrace<K, N>(arena: &mut [N], mut root: u32, start: Option<u32>) -> u32
where
    N: AvlNodeLike<K>,
{
    let mut curr = start;
    while let Some(n) = curr {
        let before = arena[n as usize].h();
        let top = rebalance(arena, n);
        let parent = get_p(arena, top);
        if parent.is_none() {
            root = top;
        }
        if top == n && arena[n as usize].h() == before {
            break;
        }
        curr = parent;
    }
    root
}

/// Hangs the detached leaf `n` under `parent` and rebalances.
pub fn insert<K, N>(arena: &mut [N], root: u32, n: u32, parent: u32, left: bool) -> u32
where
    N: AvlNodeLike<K>,
{
    attach(arena, n, parent, left);
    retrace(arena, root, Some(parent))
}

/// Deletes the key stored at `n`, frees one arena slot and returns the root.
///
/// A node with two children trades keys with its in-order successor, which
/// then has at most one child and is spliced out instead.
pub fn remove<K, N>(arena: &mut Vec<N>, root: u32, mut n: u32) -> Option<u32>
where
    N: AvlNodeLike<K>,
{
    if let (Some(_), Some(r)) = (get_l(arena, n), get_r(arena, n)) {
        let successor = first(arena, Some(r)).expect("right subtree is non-empty");
        swap_keys(arena, n, successor);
        n = successor;
    }

    let p = get_p(arena, n);
    let child = get_l(arena, n).or(get_r(arena, n));
    if let Some(c) = child {
        set_p(arena, c, p);
    }
    replace_child(arena, p, n, child);
    set_p(arena, n, None);
    set_l(arena, n, None);
    set_r(arena, n, None);

    let root = match p {
        Some(_) => Some(retrace(arena, root, p)),
        None => child,
    };
    release(arena, root, n).0
}

fn assert_heights<K, N>(arena: &[N], root: u32) -> Result<i32, String>
where
    N: AvlNodeLike<K>,
{
    // Post-order with an explicit stack; `heights` is indexed by slot.
    let mut heights = vec![0i32; arena.len()];
    let mut stack = vec![(root, false)];
    while let Some((node, children_done)) = stack.pop() {
        let l = get_l(arena, node);
        let r = get_r(arena, node);
        if !children_done {
            stack.push((node, true));
            stack.extend(r.map(|r| (r, false)));
            stack.extend(l.map(|l| (l, false)));
            continue;
        }

        let lh = l.map_or(0, |l| heights[l as usize]);
        let rh = r.map_or(0, |r| heights[r as usize]);
        let expected = 1 + lh.max(rh);
        let actual = arena[node as usize].h();
        if actual != expected {
            return Err(format!(
                "Height mismatch: expected {expected}, got {actual}"
            ));
        }
        if (lh - rh).abs() > 1 {
            return Err(format!("AVL balance violated: {lh} vs {rh}"));
        }
        heights[node as usize] = expected;
    }
    Ok(heights[root as usize])
}

pub fn assert_avl_tree<K, N, C>(
    arena: &[N],
    root: Option<u32>,
    comparator: &C,
) -> Result<(), String>
where
    N: AvlNodeLike<K>,
    C: Compare<K>,
{
    assert_links_and_order(arena, root, comparator, arena.len())?;
    if let Some(root) = root {
        assert_heights(arena, root)?;
    }
    Ok(())
}

/// Debug printer for AVL trees.
pub fn print<K, N>(arena: &[N], root: Option<u32>) -> String
where
    K: Debug,
    N: AvlNodeLike<K>,
{
    print_binary(arena, root, "", &|n: &N| format!("{:?} [h={}]", n.key(), n.h()))
}
