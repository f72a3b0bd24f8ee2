//! `KeySets`: a forest of balanced binary search trees over `1..n`, indexed by node id rather
//! than pointer. Nodes are arranged by an unweighted treap: a fresh, deterministic
//! priority derived from the node's id via a SplitMix64-style mixer takes the place of an
//! explicit rank or height field, which keeps `insert`/`delete`/`join`/`split` to a handful of
//! rotations apiece instead of the bookkeeping an AVL- or weight-balanced scheme would need.
//! Balancing policy is an open implementation choice; any O(log n) amortized
//! discipline satisfies the contract.
//!
//! `DualKeySets` below layers a second key and a `min2` subtree aggregate on top of the same
//! treap mechanics, maintaining the aggregate through every rotation in place of a general
//! caller-supplied refresh callback — the only client of that augmentation in this workspace.

use gerror::{require, Result};
use gtext::Key;
use std::cmp::Ordering;

fn mix(id: usize) -> u64 {
    let mut x = id as u64 ^ 0x9E3779B97F4A7C15;
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

///////////////////////////////////////////////// KeySets ////////////////////////////////////////////

pub struct KeySets {
    n: usize,
    left: Vec<usize>,
    right: Vec<usize>,
    parent: Vec<usize>,
    priority: Vec<u64>,
    key: Vec<Option<Key>>,
}

impl KeySets {
    pub fn new(n: usize) -> Self {
        KeySets {
            n,
            left: vec![0; n + 1],
            right: vec![0; n + 1],
            parent: vec![0; n + 1],
            priority: vec![0; n + 1],
            key: vec![None; n + 1],
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    fn valid(&self, i: usize) -> bool {
        i >= 1 && i <= self.n
    }

    fn is_root(&self, t: usize) -> bool {
        t != 0 && self.parent[t] == 0 && self.key[t].is_some()
    }

    /// Grow the domain to at least `new_n`, preserving every existing tree. O(new_n).
    pub fn expand(&mut self, new_n: usize) {
        if new_n <= self.n {
            return;
        }
        let grown = new_n.max(self.n + self.n / 2 + 1);
        self.left.resize(grown + 1, 0);
        self.right.resize(grown + 1, 0);
        self.parent.resize(grown + 1, 0);
        self.priority.resize(grown + 1, 0);
        self.key.resize(grown + 1, None);
        self.n = grown;
    }

    /// The key `u` was given by its most recent `insert` or `join`.
    pub fn key(&self, u: usize) -> Result<&Key> {
        require!(self.valid(u), "key: {u} is out of range");
        self.key[u].as_ref().ok_or_else(|| {
            gerror::GraphError::contract_violation(format!("key: {u} is not a live node"))
        })
    }

    /// The root of the tree containing `u`. O(log n) expected.
    pub fn root(&self, u: usize) -> Result<usize> {
        require!(u == 0 || self.valid(u), "root: {u} is out of range");
        let mut cur = u;
        while cur != 0 && self.parent[cur] != 0 {
            cur = self.parent[cur];
        }
        Ok(cur)
    }

    /// The node holding `key` in the tree rooted at `t` (`0` if tree is empty), or `0` if absent.
    pub fn search(&self, key: &Key, t: usize) -> Result<usize> {
        require!(t == 0 || self.is_root(t), "search: {t} is not a tree root");
        let mut cur = t;
        while cur != 0 {
            match key.cmp(self.key[cur].as_ref().unwrap()) {
                Ordering::Equal => return Ok(cur),
                Ordering::Less => cur = self.left[cur],
                Ordering::Greater => cur = self.right[cur],
            }
        }
        Ok(0)
    }

    fn rotate_right(&mut self, x: usize) -> usize {
        let y = self.left[x];
        self.left[x] = self.right[y];
        if self.right[y] != 0 {
            self.parent[self.right[y]] = x;
        }
        self.right[y] = x;
        self.parent[y] = self.parent[x];
        if self.parent[x] != 0 {
            if self.left[self.parent[x]] == x {
                self.left[self.parent[x]] = y;
            } else {
                self.right[self.parent[x]] = y;
            }
        }
        self.parent[x] = y;
        y
    }

    fn rotate_left(&mut self, x: usize) -> usize {
        let y = self.right[x];
        self.right[x] = self.left[y];
        if self.left[y] != 0 {
            self.parent[self.left[y]] = x;
        }
        self.left[y] = x;
        self.parent[y] = self.parent[x];
        if self.parent[x] != 0 {
            if self.left[self.parent[x]] == x {
                self.left[self.parent[x]] = y;
            } else {
                self.right[self.parent[x]] = y;
            }
        }
        self.parent[x] = y;
        y
    }

    /// Insert fresh node `u` with the given key into the tree rooted at `t` (`t == 0` starts a
    /// new singleton tree). Returns the new root. O(log n) expected.
    pub fn insert(&mut self, u: usize, t: usize, key: Key) -> Result<usize> {
        require!(self.valid(u), "insert: {u} is out of range");
        require!(self.key[u].is_none(), "insert: {u} is already a member of a tree");
        require!(t == 0 || self.is_root(t), "insert: {t} is not a tree root");
        self.key[u] = Some(key);
        self.left[u] = 0;
        self.right[u] = 0;
        self.parent[u] = 0;
        self.priority[u] = mix(u);
        if t == 0 {
            return Ok(u);
        }
        let mut cur = t;
        loop {
            let go_left = self.key[u].as_ref().unwrap() <= self.key[cur].as_ref().unwrap();
            if go_left {
                if self.left[cur] == 0 {
                    self.left[cur] = u;
                    self.parent[u] = cur;
                    break;
                }
                cur = self.left[cur];
            } else {
                if self.right[cur] == 0 {
                    self.right[cur] = u;
                    self.parent[u] = cur;
                    break;
                }
                cur = self.right[cur];
            }
        }
        while self.parent[u] != 0 && self.priority[u] > self.priority[self.parent[u]] {
            if self.left[self.parent[u]] == u {
                self.rotate_right(self.parent[u]);
            } else {
                self.rotate_left(self.parent[u]);
            }
        }
        self.root(u)
    }

    /// Remove `u` from its tree. Returns the new root of that tree, or `0` if it is now empty.
    /// O(log n) expected.
    pub fn delete(&mut self, u: usize) -> Result<usize> {
        require!(self.valid(u), "delete: {u} is out of range");
        require!(self.key[u].is_some(), "delete: {u} is not a member of a tree");
        while self.left[u] != 0 || self.right[u] != 0 {
            let go_right = self.right[u] != 0
                && (self.left[u] == 0 || self.priority[self.right[u]] > self.priority[self.left[u]]);
            if go_right {
                self.rotate_left(u);
            } else {
                self.rotate_right(u);
            }
        }
        let p = self.parent[u];
        if p != 0 {
            if self.left[p] == u {
                self.left[p] = 0;
            } else {
                self.right[p] = 0;
            }
        }
        self.parent[u] = 0;
        self.key[u] = None;
        if p == 0 {
            Ok(0)
        } else {
            self.root(p)
        }
    }

    fn merge3(&mut self, t1: usize, u: usize, t2: usize) -> usize {
        let p1 = if t1 != 0 { self.priority[t1] } else { 0 };
        let p2 = if t2 != 0 { self.priority[t2] } else { 0 };
        if self.priority[u] >= p1 && self.priority[u] >= p2 {
            self.left[u] = t1;
            self.right[u] = t2;
            if t1 != 0 {
                self.parent[t1] = u;
            }
            if t2 != 0 {
                self.parent[t2] = u;
            }
            self.parent[u] = 0;
            u
        } else if p1 >= p2 {
            let r = self.right[t1];
            let new_right = self.merge3(r, u, t2);
            self.right[t1] = new_right;
            self.parent[new_right] = t1;
            self.parent[t1] = 0;
            t1
        } else {
            let l = self.left[t2];
            let new_left = self.merge3(t1, u, l);
            self.left[t2] = new_left;
            self.parent[new_left] = t2;
            self.parent[t2] = 0;
            t2
        }
    }

    /// Join `t1`, singleton-or-fresh node `u`, and `t2` into one tree, requiring
    /// `max-key(t1) <= key(u) <= min-key(t2)`. `u` must already carry a key (from a prior
    /// `insert` or `split`). Returns the new root. O(log n) expected.
    pub fn join(&mut self, t1: usize, u: usize, t2: usize) -> Result<usize> {
        require!(t1 == 0 || self.is_root(t1), "join: {t1} is not a tree root");
        require!(t2 == 0 || self.is_root(t2), "join: {t2} is not a tree root");
        require!(self.valid(u), "join: {u} is out of range");
        require!(self.key[u].is_some(), "join: {u} has no assigned key");
        require!(self.left[u] == 0 && self.right[u] == 0, "join: {u} is not a singleton");
        Ok(self.merge3(t1, u, t2))
    }

    /// Split the tree containing `u` into `(L, R)`: `L` holds everything with key less than
    /// `key(u)` (including any duplicates living in `u`'s own left subtree); `R` holds `u` and
    /// everything with key greater. O(log n) expected via rotate-to-root.
    pub fn split(&mut self, u: usize) -> Result<(usize, usize)> {
        require!(self.valid(u), "split: {u} is out of range");
        require!(self.key[u].is_some(), "split: {u} is not a member of a tree");
        while self.parent[u] != 0 {
            let p = self.parent[u];
            if self.left[p] == u {
                self.rotate_right(p);
            } else {
                self.rotate_left(p);
            }
        }
        let l = self.left[u];
        self.left[u] = 0;
        if l != 0 {
            self.parent[l] = 0;
        }
        self.parent[u] = 0;
        Ok((l, u))
    }

    /// In-order walk of the tree rooted at `t`.
    pub fn items(&self, t: usize) -> Vec<usize> {
        let mut out = Vec::new();
        self.inorder(t, &mut out);
        out
    }

    fn inorder(&self, u: usize, out: &mut Vec<usize>) {
        if u == 0 {
            return;
        }
        self.inorder(self.left[u], out);
        out.push(u);
        self.inorder(self.right[u], out);
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn build(ks: &mut KeySets, pairs: &[(usize, i64)]) -> usize {
        let mut t = 0;
        for &(id, k) in pairs {
            t = ks.insert(id, t, Key::Int(k)).unwrap();
        }
        t
    }

    #[test]
    fn in_order_walk_is_sorted() {
        let mut ks = KeySets::new(6);
        let t = build(&mut ks, &[(1, 5), (2, 2), (3, 8), (4, 1), (5, 4), (6, 9)]);
        let keys: Vec<i64> = ks
            .items(t)
            .into_iter()
            .map(|i| match ks.key(i).unwrap() {
                Key::Int(v) => *v,
                _ => unreachable!(),
            })
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(sorted, keys);
    }

    #[test]
    fn search_finds_inserted_key() {
        let mut ks = KeySets::new(4);
        let t = build(&mut ks, &[(1, 10), (2, 20), (3, 30)]);
        assert_eq!(2, ks.search(&Key::Int(20), t).unwrap());
        assert_eq!(0, ks.search(&Key::Int(99), t).unwrap());
    }

    #[test]
    fn delete_preserves_remaining_order() {
        let mut ks = KeySets::new(5);
        let t = build(&mut ks, &[(1, 3), (2, 1), (3, 5), (4, 2), (5, 4)]);
        let t = ks.delete(3).unwrap();
        let rem: Vec<i64> = ks
            .items(ks.root(t).unwrap())
            .into_iter()
            .map(|i| match ks.key(i).unwrap() {
                Key::Int(v) => *v,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(vec![1, 2, 3, 4], rem);
    }

    #[test]
    fn split_then_join_round_trips() {
        let mut ks = KeySets::new(6);
        let t = build(&mut ks, &[(1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6)]);
        let (l, r) = ks.split(4).unwrap();
        assert_eq!(vec![1, 2, 3], ks.items(l));
        // r is 4 together with its old right subtree, 4 itself still attached to 5,6.
        assert_eq!(vec![4, 5, 6], ks.items(r));
        // detach 4 as a bare singleton, then rejoin the three pieces around it.
        let (_, r_tail) = ks.split(5).unwrap();
        let whole = ks.join(l, 4, r_tail).unwrap();
        assert_eq!(vec![1, 2, 3, 4, 5, 6], ks.items(whole));
    }

    #[test]
    fn insert_duplicate_member_is_contract_violation() {
        let mut ks = KeySets::new(3);
        let t = ks.insert(1, 0, Key::Int(1)).unwrap();
        assert!(ks.insert(1, t, Key::Int(2)).unwrap_err().is_contract_violation());
    }

    #[test]
    fn search_on_non_root_is_contract_violation() {
        let mut ks = KeySets::new(3);
        let t = build(&mut ks, &[(1, 1), (2, 2)]);
        let non_root = if t == 1 { 2 } else { 1 };
        assert!(ks.search(&Key::Int(1), non_root).unwrap_err().is_contract_violation());
    }
}


///////////////////////////////////////////////// DualKeySets ////////////////////////////////////////

/// A [`KeySets`]-shaped forest augmented with a second numeric key `key2` and a `min2` subtree
/// aggregate (the forest's `findmin`). The aggregate is maintained inline through every rotation
/// rather than via a general refresh callback, since this is the only augmented client in the
/// workspace.
pub struct DualKeySets {
    n: usize,
    left: Vec<usize>,
    right: Vec<usize>,
    parent: Vec<usize>,
    priority: Vec<u64>,
    key: Vec<Option<Key>>,
    key2: Vec<f64>,
    min2: Vec<f64>,
}

impl DualKeySets {
    pub fn new(n: usize) -> Self {
        DualKeySets {
            n,
            left: vec![0; n + 1],
            right: vec![0; n + 1],
            parent: vec![0; n + 1],
            priority: vec![0; n + 1],
            key: vec![None; n + 1],
            key2: vec![f64::INFINITY; n + 1],
            min2: vec![f64::INFINITY; n + 1],
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    fn valid(&self, i: usize) -> bool {
        i >= 1 && i <= self.n
    }

    fn is_root(&self, t: usize) -> bool {
        t != 0 && self.parent[t] == 0 && self.key[t].is_some()
    }

    pub fn key(&self, u: usize) -> Result<&Key> {
        require!(self.valid(u), "key: {u} is out of range");
        self.key[u].as_ref().ok_or_else(|| {
            gerror::GraphError::contract_violation(format!("key: {u} is not a live node"))
        })
    }

    pub fn key2(&self, u: usize) -> Result<f64> {
        require!(self.valid(u), "key2: {u} is out of range");
        require!(self.key[u].is_some(), "key2: {u} is not a live node");
        Ok(self.key2[u])
    }

    pub fn root(&self, u: usize) -> Result<usize> {
        require!(u == 0 || self.valid(u), "root: {u} is out of range");
        let mut cur = u;
        while cur != 0 && self.parent[cur] != 0 {
            cur = self.parent[cur];
        }
        Ok(cur)
    }

    fn recompute_min2(&mut self, x: usize) {
        if x == 0 {
            return;
        }
        let mut m = self.key2[x];
        if self.left[x] != 0 {
            m = m.min(self.min2[self.left[x]]);
        }
        if self.right[x] != 0 {
            m = m.min(self.min2[self.right[x]]);
        }
        self.min2[x] = m;
    }

    fn rotate_right(&mut self, x: usize) -> usize {
        let y = self.left[x];
        self.left[x] = self.right[y];
        if self.right[y] != 0 {
            self.parent[self.right[y]] = x;
        }
        self.right[y] = x;
        self.parent[y] = self.parent[x];
        if self.parent[x] != 0 {
            if self.left[self.parent[x]] == x {
                self.left[self.parent[x]] = y;
            } else {
                self.right[self.parent[x]] = y;
            }
        }
        self.parent[x] = y;
        self.recompute_min2(x);
        self.recompute_min2(y);
        y
    }

    fn rotate_left(&mut self, x: usize) -> usize {
        let y = self.right[x];
        self.right[x] = self.left[y];
        if self.left[y] != 0 {
            self.parent[self.left[y]] = x;
        }
        self.left[y] = x;
        self.parent[y] = self.parent[x];
        if self.parent[x] != 0 {
            if self.left[self.parent[x]] == x {
                self.left[self.parent[x]] = y;
            } else {
                self.right[self.parent[x]] = y;
            }
        }
        self.parent[x] = y;
        self.recompute_min2(x);
        self.recompute_min2(y);
        y
    }

    pub fn search(&self, key: &Key, t: usize) -> Result<usize> {
        require!(t == 0 || self.is_root(t), "search: {t} is not a tree root");
        let mut cur = t;
        while cur != 0 {
            match key.cmp(self.key[cur].as_ref().unwrap()) {
                Ordering::Equal => return Ok(cur),
                Ordering::Less => cur = self.left[cur],
                Ordering::Greater => cur = self.right[cur],
            }
        }
        Ok(0)
    }

    /// Insert fresh node `u` with primary key `key` and secondary key `key2` into the tree
    /// rooted at `t`. Returns the new root.
    pub fn insert(&mut self, u: usize, t: usize, key: Key, key2: f64) -> Result<usize> {
        require!(self.valid(u), "insert: {u} is out of range");
        require!(self.key[u].is_none(), "insert: {u} is already a member of a tree");
        require!(t == 0 || self.is_root(t), "insert: {t} is not a tree root");
        self.key[u] = Some(key);
        self.key2[u] = key2;
        self.min2[u] = key2;
        self.left[u] = 0;
        self.right[u] = 0;
        self.parent[u] = 0;
        self.priority[u] = mix(u);
        if t == 0 {
            return Ok(u);
        }
        let mut cur = t;
        loop {
            let go_left = self.key[u].as_ref().unwrap() <= self.key[cur].as_ref().unwrap();
            if go_left {
                if self.left[cur] == 0 {
                    self.left[cur] = u;
                    self.parent[u] = cur;
                    break;
                }
                cur = self.left[cur];
            } else {
                if self.right[cur] == 0 {
                    self.right[cur] = u;
                    self.parent[u] = cur;
                    break;
                }
                cur = self.right[cur];
            }
        }
        let mut cur = self.parent[u];
        while cur != 0 {
            self.recompute_min2(cur);
            cur = self.parent[cur];
        }
        while self.parent[u] != 0 && self.priority[u] > self.priority[self.parent[u]] {
            if self.left[self.parent[u]] == u {
                self.rotate_right(self.parent[u]);
            } else {
                self.rotate_left(self.parent[u]);
            }
        }
        self.root(u)
    }

    pub fn delete(&mut self, u: usize) -> Result<usize> {
        require!(self.valid(u), "delete: {u} is out of range");
        require!(self.key[u].is_some(), "delete: {u} is not a member of a tree");
        while self.left[u] != 0 || self.right[u] != 0 {
            let go_right = self.right[u] != 0
                && (self.left[u] == 0 || self.priority[self.right[u]] > self.priority[self.left[u]]);
            if go_right {
                self.rotate_left(u);
            } else {
                self.rotate_right(u);
            }
        }
        let p = self.parent[u];
        if p != 0 {
            if self.left[p] == u {
                self.left[p] = 0;
            } else {
                self.right[p] = 0;
            }
        }
        self.parent[u] = 0;
        self.key[u] = None;
        self.key2[u] = f64::INFINITY;
        self.min2[u] = f64::INFINITY;
        let mut cur = p;
        while cur != 0 {
            self.recompute_min2(cur);
            cur = self.parent[cur];
        }
        if p == 0 {
            Ok(0)
        } else {
            self.root(p)
        }
    }

    fn merge3(&mut self, t1: usize, u: usize, t2: usize) -> usize {
        let p1 = if t1 != 0 { self.priority[t1] } else { 0 };
        let p2 = if t2 != 0 { self.priority[t2] } else { 0 };
        let root = if self.priority[u] >= p1 && self.priority[u] >= p2 {
            self.left[u] = t1;
            self.right[u] = t2;
            if t1 != 0 {
                self.parent[t1] = u;
            }
            if t2 != 0 {
                self.parent[t2] = u;
            }
            self.parent[u] = 0;
            u
        } else if p1 >= p2 {
            let r = self.right[t1];
            let new_right = self.merge3(r, u, t2);
            self.right[t1] = new_right;
            self.parent[new_right] = t1;
            self.parent[t1] = 0;
            t1
        } else {
            let l = self.left[t2];
            let new_left = self.merge3(t1, u, l);
            self.left[t2] = new_left;
            self.parent[new_left] = t2;
            self.parent[t2] = 0;
            t2
        };
        self.recompute_min2(root);
        root
    }

    pub fn join(&mut self, t1: usize, u: usize, t2: usize) -> Result<usize> {
        require!(t1 == 0 || self.is_root(t1), "join: {t1} is not a tree root");
        require!(t2 == 0 || self.is_root(t2), "join: {t2} is not a tree root");
        require!(self.valid(u), "join: {u} is out of range");
        require!(self.key[u].is_some(), "join: {u} has no assigned key");
        require!(self.left[u] == 0 && self.right[u] == 0, "join: {u} is not a singleton");
        Ok(self.merge3(t1, u, t2))
    }

    pub fn split(&mut self, u: usize) -> Result<(usize, usize)> {
        require!(self.valid(u), "split: {u} is out of range");
        require!(self.key[u].is_some(), "split: {u} is not a member of a tree");
        while self.parent[u] != 0 {
            let p = self.parent[u];
            if self.left[p] == u {
                self.rotate_right(p);
            } else {
                self.rotate_left(p);
            }
        }
        let l = self.left[u];
        self.left[u] = 0;
        if l != 0 {
            self.parent[l] = 0;
        }
        self.parent[u] = 0;
        self.recompute_min2(u);
        Ok((l, u))
    }

    pub fn items(&self, t: usize) -> Vec<usize> {
        let mut out = Vec::new();
        self.inorder(t, &mut out);
        out
    }

    fn inorder(&self, u: usize, out: &mut Vec<usize>) {
        if u == 0 {
            return;
        }
        self.inorder(self.left[u], out);
        out.push(u);
        self.inorder(self.right[u], out);
    }

    /// The minimum `key2` among nodes of the tree rooted at `t` whose primary key is `<= limit`,
    /// or `0` (no item) if none qualify. O(log n).
    pub fn findmin(&self, t: usize, limit: &Key) -> Result<usize> {
        require!(t == 0 || self.is_root(t), "findmin: {t} is not a tree root");
        let (node, _) = self.findmin_rec(t, limit);
        Ok(node)
    }

    fn findmin_rec(&self, u: usize, limit: &Key) -> (usize, f64) {
        if u == 0 {
            return (0, f64::INFINITY);
        }
        if self.key[u].as_ref().unwrap() > limit {
            return self.findmin_rec(self.left[u], limit);
        }
        // u itself, and all of its left subtree, qualify; u's right subtree may partially qualify.
        let left_best = if self.left[u] != 0 {
            self.min2[self.left[u]]
        } else {
            f64::INFINITY
        };
        let mut best_node = u;
        let mut best_val = self.key2[u];
        if left_best < best_val {
            // need the actual node, not just the value
            let (ln, lv) = self.find_min2_node(self.left[u]);
            if lv < best_val {
                best_node = ln;
                best_val = lv;
            }
        }
        let (rn, rv) = self.findmin_rec(self.right[u], limit);
        if rv < best_val {
            best_node = rn;
            best_val = rv;
        }
        (best_node, best_val)
    }

    fn find_min2_node(&self, u: usize) -> (usize, f64) {
        if u == 0 {
            return (0, f64::INFINITY);
        }
        let target = self.min2[u];
        if self.key2[u] == target {
            return (u, target);
        }
        if self.left[u] != 0 && self.min2[self.left[u]] == target {
            return self.find_min2_node(self.left[u]);
        }
        self.find_min2_node(self.right[u])
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////


#[cfg(test)]
mod dual_stress {
    use super::*;
    use guacamole::{FromGuacamole, Guacamole};

    fn stress(seed: u64) {
        let n = 30;
        let mut dk = DualKeySets::new(n);
        let mut guac = Guacamole::new(seed);
        let mut present = vec![false; n + 1];
        let mut root = 0usize;
        for _ in 0..600 {
            let id = (u8::from_guacamole(&mut (), &mut guac) as usize % n) + 1;
            if present[id] {
                root = dk.delete(id).unwrap();
                present[id] = false;
            } else {
                let k = (u8::from_guacamole(&mut (), &mut guac) as i64) % 100;
                let k2 = (u8::from_guacamole(&mut (), &mut guac) as i64) as f64;
                root = dk.insert(id, root, Key::Int(k), k2).unwrap();
                present[id] = true;
            }
            for u in 1..=n {
                if !present[u] {
                    continue;
                }
                let mut expect = dk.key2(u).unwrap();
                if dk.left[u] != 0 {
                    expect = expect.min(dk.min2[dk.left[u]]);
                }
                if dk.right[u] != 0 {
                    expect = expect.min(dk.min2[dk.right[u]]);
                }
                assert_eq!(expect, dk.min2[u]);
            }
        }
    }

    #[test]
    fn guacamole5647382910564738291() {
        stress(5647382910564738291)
    }

    #[test]
    fn guacamole8374619203847561920() {
        stress(8374619203847561920)
    }
}
