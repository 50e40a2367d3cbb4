//! Arena-level helpers shared by the binary-tree engines.
//!
//! Every function takes the arena plus node indices. Rotations rewire the
//! parent back-link of the rotated subtree but never touch engine metadata
//! (heights, colors); engines update that themselves.

use crate::types::{Compare, KeyNode, Node};

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_l(v);
}

#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_r(v);
}

/// Leftmost node under `root`.
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_l(arena, idx) {
            Some(l) => curr = Some(l),
            None => return Some(idx),
        }
    }
    curr
}

/// Rightmost node under `root`.
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_r(arena, idx) {
            Some(r) => curr = Some(r),
            None => return Some(idx),
        }
    }
    curr
}

/// In-order successor.
pub fn next<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, node) {
        return first(arena, Some(r));
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(l) = get_l(arena, node) {
        return last(arena, Some(l));
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// Visits keys in ascending order without recursion.
pub fn for_each<K, N, F>(arena: &[N], root: Option<u32>, mut f: F)
where
    N: KeyNode<K>,
    F: FnMut(&K),
{
    let mut curr = first(arena, root);
    while let Some(i) = curr {
        f(arena[i as usize].key());
        curr = next(arena, i);
    }
}

/// Number of nodes on the longest root-to-leaf path; 0 when empty.
///
/// Walks with an explicit stack, so degenerate chains are fine.
pub fn height<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    let mut max = 0;
    let mut stack: Vec<(u32, usize)> = root.map(|r| (r, 1)).into_iter().collect();
    while let Some((i, depth)) = stack.pop() {
        max = max.max(depth);
        if let Some(l) = get_l(arena, i) {
            stack.push((l, depth + 1));
        }
        if let Some(r) = get_r(arena, i) {
            stack.push((r, depth + 1));
        }
    }
    max
}

/// Points `parent`'s link at `old` to `new` instead.
///
/// A `None` parent means `old` was the root; the caller owns root tracking.
#[inline]
pub fn replace_child<N: Node>(arena: &mut [N], parent: Option<u32>, old: u32, new: Option<u32>) {
    if let Some(p) = parent {
        if get_l(arena, p) == Some(old) {
            set_l(arena, p, new);
        } else {
            set_r(arena, p, new);
        }
    }
}

/// Rotates `n` down to the left; its right child takes its place.
///
/// ```text
///   n              r
///    \            /
///     r    →     n
///    /            \
///   rl             rl
/// ```
///
/// Returns the new subtree top.
pub fn rotate_left<N: Node>(arena: &mut [N], n: u32) -> u32 {
    let r = get_r(arena, n).expect("left rotation needs a right child");
    let rl = get_l(arena, r);
    let p = get_p(arena, n);

    set_r(arena, n, rl);
    if let Some(rl) = rl {
        set_p(arena, rl, Some(n));
    }
    set_l(arena, r, Some(n));
    set_p(arena, n, Some(r));
    set_p(arena, r, p);
    replace_child(arena, p, n, Some(r));
    r
}

/// Rotates `n` down to the right; its left child takes its place.
///
/// Returns the new subtree top.
pub fn rotate_right<N: Node>(arena: &mut [N], n: u32) -> u32 {
    let l = get_l(arena, n).expect("right rotation needs a left child");
    let lr = get_r(arena, l);
    let p = get_p(arena, n);

    set_l(arena, n, lr);
    if let Some(lr) = lr {
        set_p(arena, lr, Some(n));
    }
    set_r(arena, l, Some(n));
    set_p(arena, n, Some(l));
    set_p(arena, l, p);
    replace_child(arena, p, n, Some(l));
    l
}

/// Outcome of a key descent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// The tree is empty.
    Empty,
    /// An equivalent key lives at this index.
    Found(u32),
    /// The key belongs under `parent`, on its left side if `left`.
    /// `parent` is also the last node visited.
    Vacant { parent: u32, left: bool },
}

/// Descends from `root` towards `key`.
pub fn probe<K, N, C>(arena: &[N], root: Option<u32>, key: &K, comparator: &C) -> Probe
where
    N: KeyNode<K>,
    C: Compare<K>,
{
    let Some(mut curr) = root else {
        return Probe::Empty;
    };
    loop {
        let node = &arena[curr as usize];
        let (next, left) = if comparator.less(key, node.key()) {
            (node.l(), true)
        } else if comparator.less(node.key(), key) {
            (node.r(), false)
        } else {
            return Probe::Found(curr);
        };
        match next {
            Some(next) => curr = next,
            None => return Probe::Vacant { parent: curr, left },
        }
    }
}

/// Attaches the detached node `n` under `parent`.
pub fn attach<N: Node>(arena: &mut [N], n: u32, parent: u32, left: bool) {
    if left {
        set_l(arena, parent, Some(n));
    } else {
        set_r(arena, parent, Some(n));
    }
    set_p(arena, n, Some(parent));
}

/// Exchanges the keys stored at `a` and `b`, leaving links untouched.
pub fn swap_keys<K, N: KeyNode<K>>(arena: &mut [N], a: u32, b: u32) {
    if a == b {
        return;
    }
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let (head, tail) = arena.split_at_mut(hi as usize);
    std::mem::swap(head[lo as usize].key_mut(), tail[0].key_mut());
}

/// Frees the slot of the detached node `hole`.
///
/// The last arena node moves into `hole` and its parent and children are
/// re-pointed, so the arena stays dense. Returns the root (renumbered if the
/// root was the moved node) and the removed node.
pub fn release<N: Node>(arena: &mut Vec<N>, mut root: Option<u32>, hole: u32) -> (Option<u32>, N) {
    let moved = (arena.len() - 1) as u32;
    let removed = arena.swap_remove(hole as usize);
    if hole == moved {
        return (root, removed);
    }

    match get_p(arena, hole) {
        Some(p) => {
            if get_l(arena, p) == Some(moved) {
                set_l(arena, p, Some(hole));
            } else {
                set_r(arena, p, Some(hole));
            }
        }
        None => debug_assert_eq!(root, Some(moved), "parentless node must be the root"),
    }
    if root == Some(moved) {
        root = Some(hole);
    }
    if let Some(l) = get_l(arena, hole) {
        set_p(arena, l, Some(hole));
    }
    if let Some(r) = get_r(arena, hole) {
        set_p(arena, r, Some(hole));
    }
    (root, removed)
}

/// Checks parent back-links and strict in-order ascent without recursion.
pub fn assert_links_and_order<K, N, C>(
    arena: &[N],
    root: Option<u32>,
    comparator: &C,
    len: usize,
) -> Result<(), String>
where
    N: KeyNode<K>,
    C: Compare<K>,
{
    let Some(root) = root else {
        return if len == 0 && arena.is_empty() {
            Ok(())
        } else {
            Err(format!("Empty tree reports {len} keys and {} slots", arena.len()))
        };
    };
    if get_p(arena, root).is_some() {
        return Err("Root has parent".to_string());
    }

    let mut count = 0usize;
    let mut prev_node: Option<u32> = None;
    let mut curr = first(arena, Some(root));
    while let Some(i) = curr {
        if let Some(l) = get_l(arena, i) {
            if get_p(arena, l) != Some(i) {
                return Err("Broken parent link on left child".to_string());
            }
        }
        if let Some(r) = get_r(arena, i) {
            if get_p(arena, r) != Some(i) {
                return Err("Broken parent link on right child".to_string());
            }
        }
        if let Some(prev) = prev_node {
            if !comparator.less(arena[prev as usize].key(), arena[i as usize].key()) {
                return Err("Node order violated".to_string());
            }
        }
        count += 1;
        if count > arena.len() {
            return Err("Cycle in tree links".to_string());
        }
        prev_node = Some(i);
        curr = next(arena, i);
    }

    if count != len || count != arena.len() {
        return Err(format!(
            "Size mismatch: reachable {count}, recorded {len}, slots {}",
            arena.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NaturalOrder;

    #[derive(Debug, Clone)]
    struct N {
        key: u64,
        p: Option<u32>,
        l: Option<u32>,
        r: Option<u32>,
    }

    impl Node for N {
        fn p(&self) -> Option<u32> {
            self.p
        }
        fn l(&self) -> Option<u32> {
            self.l
        }
        fn r(&self) -> Option<u32> {
            self.r
        }
        fn set_p(&mut self, v: Option<u32>) {
            self.p = v;
        }
        fn set_l(&mut self, v: Option<u32>) {
            self.l = v;
        }
        fn set_r(&mut self, v: Option<u32>) {
            self.r = v;
        }
    }

    impl KeyNode<u64> for N {
        fn key(&self) -> &u64 {
            &self.key
        }
        fn key_mut(&mut self) -> &mut u64 {
            &mut self.key
        }
    }

    fn node(key: u64) -> N {
        N {
            key,
            p: None,
            l: None,
            r: None,
        }
    }

    /// 20 at the root, 10 and 30 below it, 25 under 30.
    fn sample() -> (Vec<N>, Option<u32>) {
        let mut arena = vec![node(20), node(10), node(30), node(25)];
        attach(&mut arena, 1, 0, true);
        attach(&mut arena, 2, 0, false);
        attach(&mut arena, 3, 2, true);
        (arena, Some(0))
    }

    fn keys(arena: &[N], root: Option<u32>) -> Vec<u64> {
        let mut out = Vec::new();
        for_each(arena, root, |k| out.push(*k));
        out
    }

    #[test]
    fn first_last_next_prev() {
        let (arena, root) = sample();
        assert_eq!(first(&arena, root), Some(1));
        assert_eq!(last(&arena, root), Some(2));
        assert_eq!(next(&arena, 0), Some(3));
        assert_eq!(next(&arena, 3), Some(2));
        assert_eq!(next(&arena, 2), None);
        assert_eq!(prev(&arena, 3), Some(0));
        assert_eq!(prev(&arena, 1), None);
    }

    #[test]
    fn height_counts_longest_path() {
        let (arena, root) = sample();
        assert_eq!(height(&arena, root), 3);
        assert_eq!(height(&arena, Some(1)), 1);
        assert_eq!(height::<N>(&[], None), 0);
    }

    #[test]
    fn rotations_preserve_order() {
        let (mut arena, _) = sample();
        let top = rotate_left(&mut arena, 0);
        assert_eq!(top, 2);
        assert_eq!(get_p(&arena, 2), None);
        assert_eq!(get_r(&arena, 0), Some(3));
        assert_eq!(keys(&arena, Some(top)), vec![10, 20, 25, 30]);
        assert_links_and_order(&arena, Some(top), &NaturalOrder, 4).unwrap();

        let top = rotate_right(&mut arena, top);
        assert_eq!(top, 0);
        assert_eq!(keys(&arena, Some(top)), vec![10, 20, 25, 30]);
        assert_links_and_order(&arena, Some(top), &NaturalOrder, 4).unwrap();
    }

    #[test]
    fn probe_reports_found_and_vacant() {
        let (arena, root) = sample();
        assert_eq!(probe(&arena, root, &25, &NaturalOrder), Probe::Found(3));
        assert_eq!(
            probe(&arena, root, &27, &NaturalOrder),
            Probe::Vacant {
                parent: 3,
                left: false
            }
        );
        assert_eq!(
            probe(&arena, root, &5, &NaturalOrder),
            Probe::Vacant {
                parent: 1,
                left: true
            }
        );
        assert_eq!(probe::<u64, N, _>(&[], None, &5, &NaturalOrder), Probe::Empty);
    }

    #[test]
    fn release_moves_last_slot_into_hole() {
        let (mut arena, root) = sample();
        // Detach 10 (slot 1); 25 (slot 3) is moved into slot 1.
        replace_child(&mut arena, Some(0), 1, None);
        let (root, removed) = release(&mut arena, root, 1);
        assert_eq!(removed.key, 10);
        assert_eq!(arena.len(), 3);
        assert_eq!(arena[1].key, 25);
        assert_eq!(get_l(&arena, 2), Some(1));
        assert_eq!(keys(&arena, root), vec![20, 25, 30]);
        assert_links_and_order(&arena, root, &NaturalOrder, 3).unwrap();
    }

    #[test]
    fn release_renumbers_root() {
        let mut arena = vec![node(1), node(2)];
        attach(&mut arena, 0, 1, true);
        replace_child(&mut arena, Some(1), 0, None);
        let (root, removed) = release(&mut arena, Some(1), 0);
        assert_eq!(removed.key, 1);
        assert_eq!(root, Some(0));
        assert_links_and_order(&arena, root, &NaturalOrder, 1).unwrap();
    }

    #[test]
    fn swap_keys_keeps_links() {
        let (mut arena, root) = sample();
        swap_keys(&mut arena, 0, 3);
        assert_eq!(arena[0].key, 25);
        assert_eq!(arena[3].key, 20);
        assert_eq!(get_l(&arena, 2), Some(3));
        assert!(assert_links_and_order(&arena, root, &NaturalOrder, 4).is_err());
    }
}
