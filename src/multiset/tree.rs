//! The balanced tree engine (Section 4.C): search, insert, delete under the
//! red-black invariants, with the `subtree_count` augmentation kept correct
//! across every rotation and splice (Section 4.D's order-statistic queries
//! live here too, since they are read-only traversals over the same arena).

use std::cmp::Ordering;
use std::fmt;

use super::iter::{DistinctKeys, Iter};
use super::node::{Color, Node};

/// A counted, ordered multiset over keys `K` under the strict total order
/// induced by `cmp`.
///
/// Distinct keys are stored one per node; inserting a key already present
/// increments its count instead of adding a second node (Section 1,
/// "no duplicate distinct keys").
#[derive(Clone)]
pub struct Tree<K, C> {
    pub(crate) nodes: Vec<Node<K>>,
    pub(crate) free: Vec<usize>,
    pub(crate) root: Option<usize>,
    pub(crate) cmp: C,
    pub(crate) modcount: u64,
}

impl<K: Ord> Tree<K, fn(&K, &K) -> Ordering> {
    /// Builds a tree ordering keys with `Ord::cmp`. Covers the integral and
    /// lexicographic-string built-ins from Section 4.A.
    pub fn new() -> Self {
        Self::with_comparator(K::cmp as fn(&K, &K) -> Ordering)
    }
}

impl<K: Ord> Default for Tree<K, fn(&K, &K) -> Ordering> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C: Fn(&K, &K) -> Ordering> Tree<K, C> {
    /// Builds a tree ordering keys with a caller-supplied strict total
    /// order. Violations of totality are undefined behaviour; the tree
    /// performs no validation (Section 4.A).
    pub fn with_comparator(cmp: C) -> Self {
        Tree {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            cmp,
            modcount: 0,
        }
    }

    // ---- arena plumbing -------------------------------------------------

    fn alloc(&mut self, node: Node<K>) -> usize {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = node;
            slot
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.free.push(idx);
    }

    pub(crate) fn color(&self, idx: Option<usize>) -> Color {
        idx.map(|i| self.nodes[i].color).unwrap_or(Color::Black)
    }

    fn set_color(&mut self, idx: Option<usize>, color: Color) {
        if let Some(i) = idx {
            self.nodes[i].color = color;
        }
    }

    pub(crate) fn sc(&self, idx: Option<usize>) -> usize {
        idx.map(|i| self.nodes[i].subtree_count).unwrap_or(0)
    }

    fn recompute(&mut self, idx: usize) {
        let l = self.nodes[idx].left;
        let r = self.nodes[idx].right;
        self.nodes[idx].subtree_count = self.nodes[idx].count + self.sc(l) + self.sc(r);
    }

    /// Recomputes `subtree_count` at `idx` and every ancestor up to the
    /// root, in that order. Correct whenever children subtree counts are
    /// already current — which holds for any node whose own children were
    /// the only thing that changed, climbed bottom-up (Section 4.C's
    /// rotation contract: "first recompute sc(x), then sc(y)").
    fn recompute_path_up(&mut self, mut idx: Option<usize>) {
        while let Some(i) = idx {
            self.recompute(i);
            idx = self.nodes[i].parent;
        }
    }

    pub(crate) fn minimum(&self, mut idx: usize) -> usize {
        while let Some(l) = self.nodes[idx].left {
            idx = l;
        }
        idx
    }

    pub(crate) fn maximum(&self, mut idx: usize) -> usize {
        while let Some(r) = self.nodes[idx].right {
            idx = r;
        }
        idx
    }

    fn find(&self, key: &K) -> Option<usize> {
        let mut cur = self.root;
        while let Some(i) = cur {
            match (self.cmp)(key, &self.nodes[i].key) {
                Ordering::Equal => return Some(i),
                Ordering::Less => cur = self.nodes[i].left,
                Ordering::Greater => cur = self.nodes[i].right,
            }
        }
        None
    }

    // ---- rotations --------------------------------------------------

    /// LEFT-ROTATE(x): `y = x.right` becomes the new subtree root.
    fn left_rotate(&mut self, x: usize) {
        let y = self.nodes[x]
            .right
            .expect("left_rotate requires a right child");
        let y_left = self.nodes[y].left;
        self.nodes[x].right = y_left;
        if let Some(yl) = y_left {
            self.nodes[yl].parent = Some(x);
        }
        self.nodes[y].parent = self.nodes[x].parent;
        match self.nodes[x].parent {
            None => self.root = Some(y),
            Some(p) => {
                if self.nodes[p].left == Some(x) {
                    self.nodes[p].left = Some(y);
                } else {
                    self.nodes[p].right = Some(y);
                }
            }
        }
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
        // Bottom-up: x's subtree shrank (lost y's left-of-y.left), fix it
        // before y, which now contains x's corrected count.
        self.recompute(x);
        self.recompute(y);
        log::trace!("left_rotate around {x}, new subtree root {y}");
    }

    /// RIGHT-ROTATE(y): `x = y.left` becomes the new subtree root.
    fn right_rotate(&mut self, y: usize) {
        let x = self.nodes[y]
            .left
            .expect("right_rotate requires a left child");
        let x_right = self.nodes[x].right;
        self.nodes[y].left = x_right;
        if let Some(xr) = x_right {
            self.nodes[xr].parent = Some(y);
        }
        self.nodes[x].parent = self.nodes[y].parent;
        match self.nodes[y].parent {
            None => self.root = Some(x),
            Some(p) => {
                if self.nodes[p].left == Some(y) {
                    self.nodes[p].left = Some(x);
                } else {
                    self.nodes[p].right = Some(x);
                }
            }
        }
        self.nodes[x].right = Some(y);
        self.nodes[y].parent = Some(x);
        self.recompute(y);
        self.recompute(x);
        log::trace!("right_rotate around {y}, new subtree root {x}");
    }

    // ---- public container surface -----------------------------------

    /// Total occurrence count across every stored key (`subtree_count` at
    /// the root). Not the number of distinct keys — see `Keys()` below.
    pub fn size(&self) -> usize {
        self.root.map(|r| self.nodes[r].subtree_count).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.modcount += 1;
        log::trace!("tree cleared");
    }

    /// `true` iff `key` is present (with a count of at least one).
    pub fn get(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// The multiplicity of `key`, or 0 if absent.
    pub fn count_of(&self, key: &K) -> usize {
        self.find(key).map(|i| self.nodes[i].count).unwrap_or(0)
    }

    /// Leftmost (smallest) key and its multiplicity, or `None` if empty.
    pub fn left(&self) -> Option<(&K, usize)> {
        self.root.map(|r| {
            let i = self.minimum(r);
            (&self.nodes[i].key, self.nodes[i].count)
        })
    }

    /// Rightmost (largest) key and its multiplicity, or `None` if empty.
    pub fn right(&self) -> Option<(&K, usize)> {
        self.root.map(|r| {
            let i = self.maximum(r);
            (&self.nodes[i].key, self.nodes[i].count)
        })
    }

    /// The occurrence-multiset in ascending order: each distinct key
    /// repeated `count` times. Intentionally asymmetric with `Size()`
    /// counting the same occurrences rather than distinct keys — see
    /// Section 9's "Open question" design note.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut out = Vec::with_capacity(self.size());
        self.inorder(self.root, &mut |n: &Node<K>| {
            for _ in 0..n.count {
                out.push(n.key.clone());
            }
        });
        out
    }

    fn inorder<F: FnMut(&Node<K>)>(&self, idx: Option<usize>, f: &mut F) {
        if let Some(i) = idx {
            self.inorder(self.nodes[i].left, f);
            f(&self.nodes[i]);
            self.inorder(self.nodes[i].right, f);
        }
    }

    // ---- Put / Remove -------------------------------------------------

    /// RB-INSERT, augmented with `count`/`subtree_count` maintenance.
    /// Never fails: a present key has its count incremented, an absent one
    /// gets a new red leaf followed by the usual fix-up.
    pub fn put(&mut self, key: K) {
        self.modcount += 1;
        if let Some(i) = self.find(&key) {
            self.nodes[i].count += 1;
            self.recompute_path_up(Some(i));
            log::trace!("put: incremented existing key");
            return;
        }

        let mut parent = None;
        let mut cur = self.root;
        let mut went_left = false;
        while let Some(i) = cur {
            parent = Some(i);
            match (self.cmp)(&key, &self.nodes[i].key) {
                Ordering::Less => {
                    went_left = true;
                    cur = self.nodes[i].left;
                }
                Ordering::Greater => {
                    went_left = false;
                    cur = self.nodes[i].right;
                }
                Ordering::Equal => unreachable!("find already located this key"),
            }
        }

        let new_idx = self.alloc(Node::leaf(key, Color::Red, parent));
        match parent {
            None => self.root = Some(new_idx),
            Some(p) => {
                if went_left {
                    self.nodes[p].left = Some(new_idx);
                } else {
                    self.nodes[p].right = Some(new_idx);
                }
            }
        }
        self.recompute_path_up(parent);
        self.insert_fixup(new_idx);
        log::trace!("put: inserted new key");
    }

    fn insert_fixup(&mut self, mut z: usize) {
        while let Some(zp) = self.nodes[z].parent {
            if self.nodes[zp].color != Color::Red {
                break;
            }
            // zp is red, so it cannot be the root; it has a parent.
            let zpp = self.nodes[zp]
                .parent
                .expect("a red node always has a black (non-absent) parent");
            if Some(zp) == self.nodes[zpp].left {
                let y = self.nodes[zpp].right;
                if self.color(y) == Color::Red {
                    log::trace!("insert_fixup: uncle red, recolour and move up from {z}");
                    self.nodes[zp].color = Color::Black;
                    self.set_color(y, Color::Black);
                    self.nodes[zpp].color = Color::Red;
                    z = zpp;
                } else {
                    if Some(z) == self.nodes[zp].right {
                        log::trace!("insert_fixup: zig-zag at {z}, left_rotate then fall through");
                        z = zp;
                        self.left_rotate(z);
                    }
                    log::trace!("insert_fixup: zig-zig at {z}, right_rotate");
                    let zp = self.nodes[z].parent.unwrap();
                    let zpp = self.nodes[zp].parent.unwrap();
                    self.nodes[zp].color = Color::Black;
                    self.nodes[zpp].color = Color::Red;
                    self.right_rotate(zpp);
                }
            } else {
                let y = self.nodes[zpp].left;
                if self.color(y) == Color::Red {
                    log::trace!("insert_fixup: uncle red, recolour and move up from {z}");
                    self.nodes[zp].color = Color::Black;
                    self.set_color(y, Color::Black);
                    self.nodes[zpp].color = Color::Red;
                    z = zpp;
                } else {
                    if Some(z) == self.nodes[zp].left {
                        log::trace!("insert_fixup: zig-zag at {z}, right_rotate then fall through");
                        z = zp;
                        self.right_rotate(z);
                    }
                    log::trace!("insert_fixup: zig-zig at {z}, left_rotate");
                    let zp = self.nodes[z].parent.unwrap();
                    let zpp = self.nodes[zp].parent.unwrap();
                    self.nodes[zp].color = Color::Black;
                    self.nodes[zpp].color = Color::Red;
                    self.left_rotate(zpp);
                }
            }
        }
        if let Some(r) = self.root {
            self.nodes[r].color = Color::Black;
        }
    }

    /// RB-DELETE. A no-op if `key` is absent. When present with a count
    /// above one, only the count is decremented; the node is physically
    /// spliced out only when its count reaches zero.
    pub fn remove(&mut self, key: &K) {
        let Some(z) = self.find(key) else {
            return;
        };
        self.modcount += 1;

        if self.nodes[z].count > 1 {
            self.nodes[z].count -= 1;
            self.recompute_path_up(Some(z));
            log::trace!("remove: decremented existing key");
            return;
        }

        let mut y = z;
        let mut y_original_color = self.nodes[y].color;
        let x: Option<usize>;
        let x_parent: Option<usize>;
        // Lowest node whose *children* changed as a direct result of the
        // splice; subtree_count is repaired by climbing from here to the
        // root once the structural edits below are complete.
        let recompute_start: Option<usize>;

        if self.nodes[z].left.is_none() {
            x = self.nodes[z].right;
            x_parent = self.nodes[z].parent;
            self.transplant(z, self.nodes[z].right);
            recompute_start = x_parent;
        } else if self.nodes[z].right.is_none() {
            x = self.nodes[z].left;
            x_parent = self.nodes[z].parent;
            self.transplant(z, self.nodes[z].left);
            recompute_start = x_parent;
        } else {
            let y_idx = self.minimum(self.nodes[z].right.unwrap());
            y = y_idx;
            y_original_color = self.nodes[y].color;
            x = self.nodes[y].right;
            let y_parent = self.nodes[y].parent;
            if y_parent == Some(z) {
                x_parent = Some(y);
                recompute_start = Some(y);
            } else {
                x_parent = y_parent;
                recompute_start = y_parent;
                self.transplant(y, self.nodes[y].right);
                self.nodes[y].right = self.nodes[z].right;
                if let Some(yr) = self.nodes[y].right {
                    self.nodes[yr].parent = Some(y);
                }
            }
            self.transplant(z, Some(y));
            self.nodes[y].left = self.nodes[z].left;
            if let Some(yl) = self.nodes[y].left {
                self.nodes[yl].parent = Some(y);
            }
            self.nodes[y].color = self.nodes[z].color;
        }

        self.recompute_path_up(recompute_start);
        self.free_node(z);

        if y_original_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }
        if let Some(r) = self.root {
            self.nodes[r].color = Color::Black;
        }
        log::trace!("remove: spliced out key");
    }

    /// Replaces the subtree rooted at `u` with the subtree rooted at `v`
    /// from `u`'s parent's point of view. Does not touch `u`/`v`'s own
    /// children.
    fn transplant(&mut self, u: usize, v: Option<usize>) {
        let p = self.nodes[u].parent;
        match p {
            None => self.root = v,
            Some(pp) => {
                if self.nodes[pp].left == Some(u) {
                    self.nodes[pp].left = v;
                } else {
                    self.nodes[pp].right = v;
                }
            }
        }
        if let Some(vi) = v {
            self.nodes[vi].parent = p;
        }
    }

    /// RB-DELETE-FIXUP, translated to an arena without a sentinel: `x` may
    /// be absent, so its parent is threaded through explicitly instead of
    /// being read off `x` itself.
    fn delete_fixup(&mut self, mut x: Option<usize>, mut x_parent: Option<usize>) {
        while x != self.root && self.color(x) == Color::Black {
            let Some(p) = x_parent else { break };
            if x == self.nodes[p].left {
                let mut w = self.nodes[p].right;
                if self.color(w) == Color::Red {
                    log::trace!("delete_fixup: sibling red at {p}, rotate and recolour");
                    self.set_color(w, Color::Black);
                    self.nodes[p].color = Color::Red;
                    self.left_rotate(p);
                    w = self.nodes[p].right;
                }
                let w_idx = w.expect("sibling of a non-root double-black node is never absent");
                if self.color(self.nodes[w_idx].left) == Color::Black
                    && self.color(self.nodes[w_idx].right) == Color::Black
                {
                    log::trace!("delete_fixup: sibling black with two black children, recolour and move up from {p}");
                    self.nodes[w_idx].color = Color::Red;
                    x = Some(p);
                    x_parent = self.nodes[p].parent;
                } else {
                    if self.color(self.nodes[w_idx].right) == Color::Black {
                        log::trace!("delete_fixup: sibling outer child black at {w_idx}, rotate inner");
                        self.set_color(self.nodes[w_idx].left, Color::Black);
                        self.nodes[w_idx].color = Color::Red;
                        self.right_rotate(w_idx);
                        w = self.nodes[p].right;
                    }
                    log::trace!("delete_fixup: sibling outer child red at {p}, rotate and terminate");
                    let w_idx = w.unwrap();
                    self.nodes[w_idx].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    self.set_color(self.nodes[w_idx].right, Color::Black);
                    self.left_rotate(p);
                    x = self.root;
                    x_parent = None;
                }
            } else {
                let mut w = self.nodes[p].left;
                if self.color(w) == Color::Red {
                    log::trace!("delete_fixup: sibling red at {p}, rotate and recolour");
                    self.set_color(w, Color::Black);
                    self.nodes[p].color = Color::Red;
                    self.right_rotate(p);
                    w = self.nodes[p].left;
                }
                let w_idx = w.expect("sibling of a non-root double-black node is never absent");
                if self.color(self.nodes[w_idx].right) == Color::Black
                    && self.color(self.nodes[w_idx].left) == Color::Black
                {
                    log::trace!("delete_fixup: sibling black with two black children, recolour and move up from {p}");
                    self.nodes[w_idx].color = Color::Red;
                    x = Some(p);
                    x_parent = self.nodes[p].parent;
                } else {
                    if self.color(self.nodes[w_idx].left) == Color::Black {
                        log::trace!("delete_fixup: sibling outer child black at {w_idx}, rotate inner");
                        self.set_color(self.nodes[w_idx].right, Color::Black);
                        self.nodes[w_idx].color = Color::Red;
                        self.left_rotate(w_idx);
                        w = self.nodes[p].left;
                    }
                    log::trace!("delete_fixup: sibling outer child red at {p}, rotate and terminate");
                    let w_idx = w.unwrap();
                    self.nodes[w_idx].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    self.set_color(self.nodes[w_idx].left, Color::Black);
                    self.right_rotate(p);
                    x = self.root;
                    x_parent = None;
                }
            }
        }
        self.set_color(x, Color::Black);
    }

    // ---- Section 4.D: order-statistic queries --------------------------

    /// Largest stored key `<= k`, with its multiplicity.
    pub fn floor(&self, k: &K) -> Option<(&K, usize)> {
        let mut cur = self.root;
        let mut candidate = None;
        while let Some(i) = cur {
            match (self.cmp)(&self.nodes[i].key, k) {
                Ordering::Equal => return Some((&self.nodes[i].key, self.nodes[i].count)),
                Ordering::Less => {
                    candidate = Some(i);
                    cur = self.nodes[i].right;
                }
                Ordering::Greater => cur = self.nodes[i].left,
            }
        }
        candidate.map(|i| (&self.nodes[i].key, self.nodes[i].count))
    }

    /// Smallest stored key `>= k`, with its multiplicity.
    pub fn ceiling(&self, k: &K) -> Option<(&K, usize)> {
        let mut cur = self.root;
        let mut candidate = None;
        while let Some(i) = cur {
            match (self.cmp)(&self.nodes[i].key, k) {
                Ordering::Equal => return Some((&self.nodes[i].key, self.nodes[i].count)),
                Ordering::Greater => {
                    candidate = Some(i);
                    cur = self.nodes[i].left;
                }
                Ordering::Less => cur = self.nodes[i].right,
            }
        }
        candidate.map(|i| (&self.nodes[i].key, self.nodes[i].count))
    }

    /// Number of stored occurrences with key strictly less than `k`.
    pub fn count_smaller(&self, k: &K) -> usize {
        let mut cur = self.root;
        let mut total = 0usize;
        while let Some(i) = cur {
            match (self.cmp)(&self.nodes[i].key, k) {
                Ordering::Less => {
                    total += self.nodes[i].count + self.sc(self.nodes[i].left);
                    cur = self.nodes[i].right;
                }
                Ordering::Greater => cur = self.nodes[i].left,
                Ordering::Equal => {
                    total += self.sc(self.nodes[i].left);
                    break;
                }
            }
        }
        total
    }

    /// Number of stored occurrences with key `<= k`.
    pub fn count_smaller_or_equal(&self, k: &K) -> usize {
        let mut cur = self.root;
        let mut total = 0usize;
        while let Some(i) = cur {
            match (self.cmp)(&self.nodes[i].key, k) {
                Ordering::Less => {
                    total += self.nodes[i].count + self.sc(self.nodes[i].left);
                    cur = self.nodes[i].right;
                }
                Ordering::Greater => cur = self.nodes[i].left,
                Ordering::Equal => {
                    total += self.nodes[i].count + self.sc(self.nodes[i].left);
                    break;
                }
            }
        }
        total
    }

    /// `Size() - count_smaller_or_equal(k)`.
    pub fn count_greater(&self, k: &K) -> usize {
        self.size() - self.count_smaller_or_equal(k)
    }

    /// `Size() - count_smaller(k)`.
    pub fn count_greater_or_equal(&self, k: &K) -> usize {
        self.size() - self.count_smaller(k)
    }

    // ---- Section 4.E: iteration ----------------------------------------

    /// A bidirectional `Begin`/`Next`/`Prev`/`End` cursor over distinct
    /// keys, starting in the `Begin` state.
    pub fn cursor(&self) -> Iter<'_, K, C> {
        Iter::new(self)
    }

    /// Forward adapter yielding `(key, count)` for each distinct key in
    /// ascending order.
    pub fn iter(&self) -> DistinctKeys<'_, K, C> {
        DistinctKeys::new(self)
    }
}

impl<K: fmt::Debug, C> fmt::Display for Tree<K, C> {
    /// ASCII tree-art rendering for debugging, in the spirit of the
    /// original's `String()`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            None => writeln!(f, "(empty)"),
            Some(r) => self.fmt_subtree(f, r, String::new()),
        }
    }
}

impl<K: fmt::Debug, C> Tree<K, C> {
    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, idx: usize, prefix: String) -> fmt::Result {
        if let Some(r) = self.nodes[idx].right {
            self.fmt_subtree(f, r, format!("{prefix}    "))?;
        }
        let color = match self.nodes[idx].color {
            Color::Red => "R",
            Color::Black => "B",
        };
        writeln!(
            f,
            "{prefix}{:?}({color}, x{})",
            self.nodes[idx].key, self.nodes[idx].count
        )?;
        if let Some(l) = self.nodes[idx].left {
            self.fmt_subtree(f, l, format!("{prefix}    "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invariants_hold<K: Ord + Clone + std::fmt::Debug, C: Fn(&K, &K) -> Ordering>(
        tree: &Tree<K, C>,
    ) {
        if tree.root.is_none() {
            return;
        }
        assert_eq!(
            tree.color(tree.root),
            Color::Black,
            "root must be black"
        );
        let mut black_height = None;
        check_node(tree, tree.root, &mut black_height, 0);

        fn check_node<K: Ord + Clone + std::fmt::Debug, C: Fn(&K, &K) -> Ordering>(
            tree: &Tree<K, C>,
            idx: Option<usize>,
            expected_bh: &mut Option<usize>,
            bh_so_far: usize,
        ) {
            let bh_so_far = if tree.color(idx) == Color::Black {
                bh_so_far + 1
            } else {
                bh_so_far
            };
            let Some(i) = idx else {
                match expected_bh {
                    None => *expected_bh = Some(bh_so_far),
                    Some(expected) => assert_eq!(*expected, bh_so_far, "unequal black heights"),
                }
                return;
            };
            if tree.color(Some(i)) == Color::Red {
                assert_ne!(tree.color(tree.nodes[i].left), Color::Red, "red-red violation");
                assert_ne!(tree.color(tree.nodes[i].right), Color::Red, "red-red violation");
            }
            let l = tree.nodes[i].left;
            let r = tree.nodes[i].right;
            assert_eq!(
                tree.nodes[i].subtree_count,
                tree.nodes[i].count + tree.sc(l) + tree.sc(r),
                "subtree_count invariant broken at a node"
            );
            if let Some(li) = l {
                assert_eq!(
                    (tree.cmp)(&tree.nodes[li].key, &tree.nodes[i].key),
                    Ordering::Less
                );
            }
            if let Some(ri) = r {
                assert_eq!(
                    (tree.cmp)(&tree.nodes[ri].key, &tree.nodes[i].key),
                    Ordering::Greater
                );
            }
            check_node(tree, l, expected_bh, bh_so_far);
            check_node(tree, r, expected_bh, bh_so_far);
        }
    }

    #[test]
    fn put_increments_count_and_total_size() {
        let mut t = Tree::new();
        t.put(1);
        t.put(1);
        t.put(2);
        assert_eq!(t.size(), 3);
        assert_eq!(t.count_of(&1), 2);
        assert_eq!(t.count_of(&2), 1);
        invariants_hold(&t);
    }

    #[test]
    fn scenario_1_insert_and_query() {
        let mut t = Tree::new();
        for k in [5, 6, 7, 3, 4, 1, 2, 1, 1, 2] {
            t.put(k);
        }
        assert_eq!(t.size(), 10);
        assert_eq!(t.keys(), vec![1, 1, 1, 2, 2, 3, 4, 5, 6, 7]);
        assert!(!t.get(&8));
        assert!(t.get(&1));
        invariants_hold(&t);
    }

    #[test]
    fn scenario_2_remove_down_to_empty() {
        let mut t = Tree::new();
        for k in [5, 6, 7, 3, 4, 1, 2, 1, 1, 2] {
            t.put(k);
        }
        for k in [5, 6, 7, 8, 5] {
            t.remove(&k);
        }
        assert_eq!(t.size(), 5);
        assert_eq!(t.keys(), vec![1, 1, 2, 3, 4]);
        assert!(!t.get(&5));
        invariants_hold(&t);

        for k in [1, 4, 2, 3, 2, 2] {
            t.remove(&k);
        }
        assert_eq!(t.keys(), vec![1]);
        invariants_hold(&t);

        t.remove(&1);
        assert!(t.is_empty());
        assert_eq!(t.size(), 0);
    }

    #[test]
    fn left_and_right_on_empty_and_populated_trees() {
        let empty: Tree<i32, _> = Tree::new();
        assert_eq!(empty.left(), None);
        assert_eq!(empty.right(), None);

        let mut t = Tree::new();
        for k in [5, 6, 7, 3, 4, 1, 2, 1, 1, 2] {
            t.put(k);
        }
        assert_eq!(t.left(), Some((&1, 3)));
        assert_eq!(t.right(), Some((&7, 1)));
    }

    #[test]
    fn scenario_3_floor_and_ceiling() {
        let mut t = Tree::new();
        for k in [5, 6, 7, 3, 4, 1, 2] {
            t.put(k);
        }
        assert_eq!(t.floor(&4), Some((&4, 1)));
        assert_eq!(t.floor(&0), None);
        assert_eq!(t.ceiling(&4), Some((&4, 1)));
        assert_eq!(t.ceiling(&8), None);
    }

    #[test]
    fn scenario_4_rank_queries_on_floats() {
        let mut t = Tree::with_comparator(super::super::comparator::float_comparator);
        for k in [10.0, 20.0, 30.0] {
            t.put(k);
        }
        assert_eq!(t.count_smaller_or_equal(&5.0), 0);
        assert_eq!(t.count_smaller(&5.0), 0);

        let mut t2 = Tree::with_comparator(super::super::comparator::float_comparator);
        for k in [1.0, 2.0, 3.0] {
            t2.put(k);
        }
        assert_eq!(t2.count_greater_or_equal(&5.0), 0);
        assert_eq!(t2.count_greater(&5.0), 0);
    }

    #[test]
    fn scenario_5_string_keys_sort_lexicographically() {
        let mut t = Tree::new();
        for k in ["c", "b", "a"] {
            t.put(k);
        }
        assert_eq!(t.keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn rank_identity_holds_after_mixed_mutation() {
        let mut t = Tree::new();
        for k in [5, 6, 7, 3, 4, 1, 2, 9, 9, 9] {
            t.put(k);
        }
        t.remove(&6);
        for probe in [-10, 0, 1, 4, 9, 40] {
            let smaller = t.count_smaller(&probe);
            let equal = t.count_of(&probe);
            let greater = t.count_greater(&probe);
            assert_eq!(smaller + equal + greater, t.size());
            assert_eq!(t.count_greater(&probe), t.size() - t.count_smaller_or_equal(&probe));
            assert_eq!(
                t.count_greater_or_equal(&probe),
                t.size() - t.count_smaller(&probe)
            );
        }
        invariants_hold(&t);
    }

    #[test]
    fn put_then_remove_restores_the_tree() {
        let mut t = Tree::new();
        for k in [5, 6, 7, 3, 4, 1, 2] {
            t.put(k);
        }
        let before_keys = t.keys();
        let before_size = t.size();
        t.put(42);
        t.remove(&42);
        assert_eq!(t.keys(), before_keys);
        assert_eq!(t.size(), before_size);
    }

    #[test]
    fn stress_random_inserts_and_removals_preserve_invariants() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut t: Tree<i32, _> = Tree::new();
        let mut model: Vec<i32> = Vec::new();

        for _ in 0..2000 {
            if rng.gen_bool(0.65) || model.is_empty() {
                let v = rng.gen_range(0..50);
                t.put(v);
                model.push(v);
            } else {
                let idx = rng.gen_range(0..model.len());
                let v = model.swap_remove(idx);
                t.remove(&v);
            }
            invariants_hold(&t);
            model.sort_unstable();
            assert_eq!(t.keys(), model, "multiset contents diverged from model");
        }
    }

    #[test]
    fn scenario_6_rank_functions_match_naive_linear_count() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(42);
        let mut t: Tree<i32, _> = Tree::new();
        let mut values = Vec::new();
        while values.len() < 100 {
            let v = rng.gen_range(0..30);
            if v == 5 {
                continue;
            }
            t.put(v);
            values.push(v);
        }

        for &e in &values {
            for probe in [e, -10, 40, 5] {
                let naive_smaller = values.iter().filter(|&&x| x < probe).count();
                let naive_equal = values.iter().filter(|&&x| x == probe).count();
                let naive_greater = values.iter().filter(|&&x| x > probe).count();
                let naive_smaller_eq = naive_smaller + naive_equal;
                let naive_greater_eq = naive_greater + naive_equal;

                assert_eq!(t.count_smaller(&probe), naive_smaller);
                assert_eq!(t.count_smaller_or_equal(&probe), naive_smaller_eq);
                assert_eq!(t.count_greater(&probe), naive_greater);
                assert_eq!(t.count_greater_or_equal(&probe), naive_greater_eq);
            }
        }
    }
}
