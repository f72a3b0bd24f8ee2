//! `ReverseLists`: the same partition semantics as [`ixlistset::ListSet`], but each item stores two
//! symmetric neighbor slots with no fixed "next"/"prev" role. A list's first item is
//! the one item with a negated slot, `-last`; its other slot (if nonzero) is a true neighbor. The
//! last item has one slot `0` and the other a true neighbor. A singleton has slots `[-self, 0]`.
//! Traversal always needs to know which item you arrived from, since neither slot is intrinsically
//! "forward". This layout makes `reverse(L)` an O(1) relabeling of which end carries the marker,
//! rather than an O(length) pointer-flip.

use gerror::{require, GraphError, Result};
use gtext::{format_item, parse_item, tokenize};

///////////////////////////////////////////////// ReverseLists //////////////////////////////////////

#[derive(Clone)]
pub struct ReverseLists {
    n: usize,
    link: Vec<[i64; 2]>,
}

impl ReverseLists {
    /// Every item starts out as its own singleton list.
    pub fn new(n: usize) -> Self {
        let mut link = vec![[0i64, 0i64]; n + 1];
        for i in 1..=n {
            link[i] = [-(i as i64), 0];
        }
        ReverseLists { n, link }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    fn valid(&self, i: usize) -> bool {
        i >= 1 && i <= self.n
    }

    /// True iff `i` is the first item of its list (one of its slots is negative).
    pub fn is_first(&self, i: usize) -> bool {
        self.valid(i) && (self.link[i][0] < 0 || self.link[i][1] < 0)
    }

    fn last_of(&self, l: usize) -> usize {
        let [a, b] = self.link[l];
        if a < 0 {
            (-a) as usize
        } else {
            (-b) as usize
        }
    }

    /// Validates `l` is a list's first item and returns it.
    pub fn first(&self, l: usize) -> Result<usize> {
        require!(self.is_first(l), "first: {l} is not a list's first item");
        Ok(l)
    }

    /// The last item of the list whose first item is `l`. O(1).
    pub fn last(&self, l: usize) -> Result<usize> {
        require!(self.is_first(l), "last: {l} is not a list's first item");
        Ok(self.last_of(l))
    }

    /// The neighbor of `i` other than `from` (`from == 0` means "start walking at `i`, which must
    /// be a list's first item"). Returns `0` when there is no such neighbor, i.e. `i` is the list's
    /// last item (or a singleton, in the `from == 0` case). O(1).
    pub fn other(&self, i: usize, from: usize) -> Result<usize> {
        require!(self.valid(i), "other: {i} is out of range");
        let [a, b] = self.link[i];
        if from == 0 {
            require!(self.is_first(i), "other: {i} is not a list's first item");
            Ok(if a >= 0 { a as usize } else { b as usize })
        } else {
            let other = if a == from as i64 { b } else { a };
            Ok(other.max(0) as usize)
        }
    }

    fn replace_slot(&mut self, item: usize, old: i64, new: i64) {
        if self.link[item][0] == old {
            self.link[item][0] = new;
        } else {
            self.link[item][1] = new;
        }
    }

    /// Detach `i` into a singleton list of its own.
    pub fn singleton(&mut self, i: usize) -> Result<usize> {
        require!(self.valid(i), "singleton: {i} is out of range");
        self.link[i] = [-(i as i64), 0];
        Ok(i)
    }

    /// Append the list named `l2` onto the end of the list named `l1`, returning `l1`. O(1).
    pub fn join(&mut self, l1: usize, l2: usize) -> Result<usize> {
        require!(self.is_first(l1), "join: {l1} is not a list's first item");
        require!(self.is_first(l2), "join: {l2} is not a list's first item");
        require!(l1 != l2, "join: {l1} and {l2} name the same list");
        let last1 = self.last_of(l1);
        let last2 = self.last_of(l2);
        self.replace_slot(l1, -(last1 as i64), -(last2 as i64));
        self.replace_slot(last1, 0, l2 as i64);
        self.replace_slot(l2, -(last2 as i64), last1 as i64);
        Ok(l1)
    }

    /// Remove the first item `l` from its list, leaving it a singleton. Returns the remaining
    /// list's new first item, or `0` if the list is now empty. O(1).
    pub fn pop(&mut self, l: usize) -> Result<usize> {
        require!(self.is_first(l), "pop: {l} is not a list's first item");
        let last = self.last_of(l);
        if l == last {
            self.link[l] = [-(l as i64), 0];
            return Ok(0);
        }
        let nxt = self.other(l, 0)?;
        self.replace_slot(nxt, l as i64, -(last as i64));
        self.link[l] = [-(l as i64), 0];
        Ok(nxt)
    }

    /// Swap the meanings of the two end markers, making the last item first. O(1).
    pub fn reverse(&mut self, l: usize) -> Result<usize> {
        require!(self.is_first(l), "reverse: {l} is not a list's first item");
        let last = self.last_of(l);
        if l == last {
            return Ok(l);
        }
        self.replace_slot(l, -(last as i64), 0);
        self.replace_slot(last, 0, -(l as i64));
        Ok(last)
    }

    /// Items of the list named `l`, head to tail.
    pub fn items(&self, l: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut prev = 0;
        let mut cur = l;
        loop {
            out.push(cur);
            let nxt = self.other(cur, prev).unwrap_or(0);
            if nxt == 0 {
                break;
            }
            prev = cur;
            cur = nxt;
        }
        out
    }

    /// Render in canonical form: `"{" ("[" item* "]")* "}"`.
    pub fn to_canonical_string(&self) -> String {
        let mut seen = vec![false; self.n + 1];
        let mut parts = Vec::new();
        for start in 1..=self.n {
            if seen[start] || !self.is_first(start) {
                continue;
            }
            let mut s = String::from("[");
            for (k, item) in self.items(start).into_iter().enumerate() {
                if k > 0 {
                    s.push(' ');
                }
                s.push_str(&format_item(item, self.n));
                seen[item] = true;
            }
            s.push(']');
            parts.push(s);
        }
        format!("{{{}}}", parts.join(" "))
    }

    /// Parse the canonical form produced by [`ReverseLists::to_canonical_string`].
    pub fn from_canonical_string(s: &str, n: usize) -> Result<ReverseLists> {
        let toks = tokenize(s);
        let mut pos = 0;
        if toks.first().map(String::as_str) != Some("{") {
            return Err(GraphError::parse_failure("ReverseLists: expected '{'"));
        }
        pos += 1;
        let mut lists: Vec<Vec<usize>> = Vec::new();
        let mut placed = vec![false; n + 1];
        while toks.get(pos).map(String::as_str) == Some("[") {
            pos += 1;
            let mut items = Vec::new();
            while toks.get(pos).map(String::as_str) != Some("]") {
                let tok = toks
                    .get(pos)
                    .ok_or_else(|| GraphError::parse_failure("ReverseLists: unexpected end of input"))?;
                let item = parse_item(tok, n).ok_or_else(|| {
                    GraphError::parse_failure(format!("ReverseLists: bad item {tok:?}"))
                })?;
                if item == 0 || item > n || placed[item] {
                    return Err(GraphError::parse_failure(format!(
                        "ReverseLists: duplicate or invalid item {tok:?}"
                    )));
                }
                placed[item] = true;
                items.push(item);
                pos += 1;
            }
            pos += 1;
            if items.is_empty() {
                return Err(GraphError::parse_failure("ReverseLists: empty list group"));
            }
            lists.push(items);
        }
        if toks.get(pos).map(String::as_str) != Some("}") {
            return Err(GraphError::parse_failure("ReverseLists: expected '}'"));
        }
        pos += 1;
        if pos != toks.len() {
            return Err(GraphError::parse_failure("ReverseLists: trailing tokens"));
        }
        if placed.iter().skip(1).any(|&p| !p) {
            return Err(GraphError::parse_failure("ReverseLists: not every item was placed"));
        }
        let mut rl = ReverseLists::new(n);
        for items in lists {
            let last = *items.last().unwrap();
            for w in 0..items.len() {
                let it = items[w];
                let nxt = if w + 1 < items.len() { items[w + 1] as i64 } else { 0 };
                rl.link[it] = [nxt, 0];
            }
            rl.link[items[0]] = [-(last as i64), rl.link[items[0]][0].max(0)];
            for w in 1..items.len() {
                let it = items[w];
                let prv = items[w - 1] as i64;
                let fwd = if w + 1 < items.len() { items[w + 1] as i64 } else { 0 };
                rl.link[it] = [prv, fwd];
            }
        }
        Ok(rl)
    }
}

impl PartialEq for ReverseLists {
    /// Order-sensitive: compares the lists' current traversal order, not raw slot layout (which
    /// can differ across logically-identical lists after a `reverse`).
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n && self.to_canonical_string() == other.to_canonical_string()
    }
}

impl Eq for ReverseLists {}

impl std::fmt::Debug for ReverseLists {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReverseLists(n={}, {})", self.n, self.to_canonical_string())
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_and_traverse() {
        let mut rl = ReverseLists::new(4);
        rl.join(1, 2).unwrap();
        rl.join(1, 3).unwrap();
        assert_eq!(vec![1, 2, 3], rl.items(1));
    }

    #[test]
    fn reverse_flips_traversal_order() {
        let mut rl = ReverseLists::new(4);
        rl.join(1, 2).unwrap();
        rl.join(1, 3).unwrap();
        let new_first = rl.reverse(1).unwrap();
        assert_eq!(3, new_first);
        assert_eq!(vec![3, 2, 1], rl.items(3));
    }

    #[test]
    fn reverse_of_singleton_is_noop() {
        let mut rl = ReverseLists::new(3);
        assert_eq!(1, rl.reverse(1).unwrap());
        assert_eq!(vec![1], rl.items(1));
    }

    #[test]
    fn pop_shrinks_list() {
        let mut rl = ReverseLists::new(4);
        rl.join(1, 2).unwrap();
        rl.join(1, 3).unwrap();
        let new_first = rl.pop(1).unwrap();
        assert_eq!(2, new_first);
        assert_eq!(vec![2, 3], rl.items(2));
    }

    #[test]
    fn pop_last_item_empties_list() {
        let mut rl = ReverseLists::new(2);
        assert_eq!(0, rl.pop(1).unwrap());
        assert!(rl.is_first(1));
    }

    #[test]
    fn round_trip() {
        let mut rl = ReverseLists::new(5);
        rl.join(1, 2).unwrap();
        rl.join(1, 3).unwrap();
        let s = rl.to_canonical_string();
        let rl2 = ReverseLists::from_canonical_string(&s, 5).unwrap();
        assert_eq!(rl, rl2);
    }

    #[test]
    fn reverse_then_join_still_consistent() {
        let mut rl = ReverseLists::new(5);
        rl.join(1, 2).unwrap();
        rl.join(1, 3).unwrap();
        let new_first = rl.reverse(1).unwrap();
        let joined = rl.join(new_first, 4).unwrap();
        assert_eq!(vec![3, 2, 1, 4], rl.items(joined));
    }

    #[test]
    fn join_non_first_is_contract_violation() {
        let mut rl = ReverseLists::new(4);
        rl.join(1, 2).unwrap();
        assert!(rl.join(2, 3).unwrap_err().is_contract_violation());
    }
}
