//! `ListPair`: a partition of `1..n` into exactly two ordered lists.
//!
//! Both lists share the index domain and a single `next`/`prev` pair of arrays. `prev[i]` is
//! signed: positive names list 1, negative names list 2, and its magnitude is `i`'s true
//! predecessor, except at a list's first item, where the magnitude cyclically names the list's
//! last item (the same convention [`ixlistset::ListSet`] uses, minus the need to rediscover a
//! list's first item by walking, since `ListPair` only ever has two lists and keeps their
//! `first`/`last`/`length` as plain fields).

use gerror::{require, GraphError, Result};
use gtext::{format_item, parse_item, tokenize};

///////////////////////////////////////////////// ListPair //////////////////////////////////////////

#[derive(Clone)]
pub struct ListPair {
    n: usize,
    first: [usize; 2],
    last: [usize; 2],
    length: [usize; 2],
    next: Vec<i64>,
    prev: Vec<i64>,
}

impl ListPair {
    /// All items start in list 2, in index order; list 1 starts empty.
    pub fn new(n: usize) -> Self {
        let mut lp = ListPair {
            n,
            first: [0, 0],
            last: [0, 0],
            length: [0, n],
            next: vec![0; n + 1],
            prev: vec![0; n + 1],
        };
        if n > 0 {
            lp.first[1] = 1;
            lp.last[1] = n;
            for i in 1..=n {
                lp.next[i] = if i < n { (i + 1) as i64 } else { 0 };
            }
            lp.prev[1] = -(n as i64);
            for i in 2..=n {
                lp.prev[i] = -((i - 1) as i64);
            }
        }
        lp
    }

    pub fn n(&self) -> usize {
        self.n
    }

    fn valid_item(&self, i: usize) -> bool {
        i >= 1 && i <= self.n
    }

    fn valid_list(&self, k: usize) -> bool {
        k == 1 || k == 2
    }

    fn list_of(&self, i: usize) -> usize {
        if self.prev[i] > 0 {
            1
        } else {
            2
        }
    }

    fn set_prev(&mut self, item: usize, k: usize, magnitude: usize) {
        self.prev[item] = if k == 1 { magnitude as i64 } else { -(magnitude as i64) };
    }

    /// True iff `i` currently belongs to list `k`. O(1).
    pub fn in_list(&self, i: usize, k: usize) -> Result<bool> {
        require!(self.valid_item(i), "in: {i} is out of range");
        require!(self.valid_list(k), "in: {k} is not a list number");
        Ok(self.list_of(i) == k)
    }

    /// The first item of list `k`, or `0` if empty. O(1).
    pub fn first(&self, k: usize) -> Result<usize> {
        require!(self.valid_list(k), "first: {k} is not a list number");
        Ok(self.first[k - 1])
    }

    /// The last item of list `k`, or `0` if empty. O(1).
    pub fn last(&self, k: usize) -> Result<usize> {
        require!(self.valid_list(k), "last: {k} is not a list number");
        Ok(self.last[k - 1])
    }

    /// The number of items in list `k`. O(1).
    pub fn length(&self, k: usize) -> Result<usize> {
        require!(self.valid_list(k), "length: {k} is not a list number");
        Ok(self.length[k - 1])
    }

    /// The item following `i` in its list, or `0` if `i` is last. O(1).
    pub fn next(&self, i: usize) -> Result<usize> {
        require!(self.valid_item(i), "next: {i} is out of range");
        Ok(self.next[i] as usize)
    }

    /// The item preceding `i` in its list (cyclic to the last item when `i` is first). O(1).
    pub fn prev(&self, i: usize) -> Result<usize> {
        require!(self.valid_item(i), "prev: {i} is out of range");
        Ok(self.prev[i].unsigned_abs() as usize)
    }

    fn remove(&mut self, i: usize) -> usize {
        let k = self.list_of(i);
        let idx = k - 1;
        let p = self.prev[i].unsigned_abs() as usize;
        let nx = self.next[i];
        if i == self.first[idx] {
            let new_first = nx as usize;
            self.first[idx] = new_first;
            if new_first != 0 {
                self.set_prev(new_first, k, p);
            } else {
                self.last[idx] = 0;
            }
        } else {
            self.next[p] = nx;
            if nx != 0 {
                self.set_prev(nx as usize, k, p);
            } else {
                self.last[idx] = p;
                let first = self.first[idx];
                self.set_prev(first, k, p);
            }
        }
        self.length[idx] -= 1;
        k
    }

    fn insert_into(&mut self, i: usize, k: usize, j: usize) {
        let idx = k - 1;
        if j == 0 {
            let old_first = self.first[idx];
            if old_first == 0 {
                self.next[i] = 0;
                self.set_prev(i, k, i);
                self.last[idx] = i;
            } else {
                let old_last = self.last[idx];
                self.next[i] = old_first as i64;
                self.set_prev(i, k, old_last);
                self.set_prev(old_first, k, i);
            }
            self.first[idx] = i;
        } else {
            let after = self.next[j];
            self.next[j] = i as i64;
            self.next[i] = after;
            self.set_prev(i, k, j);
            if after != 0 {
                self.set_prev(after as usize, k, i);
            } else {
                self.last[idx] = i;
                let first = self.first[idx];
                self.set_prev(first, k, i);
            }
        }
        self.length[idx] += 1;
    }

    /// Move `i` to the other list, inserting it immediately after `j` there (or at that list's
    /// head if `j == 0`). O(1).
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        require!(self.valid_item(i), "swap: {i} is out of range");
        let k = self.list_of(i);
        let other = 3 - k;
        require!(
            j == 0 || self.in_list(j, other)?,
            "swap: {j} is not in the destination list"
        );
        self.remove(i);
        self.insert_into(i, other, j);
        Ok(())
    }

    fn items(&self, k: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cur = self.first[k - 1];
        while cur != 0 {
            out.push(cur);
            cur = self.next[cur] as usize;
        }
        out
    }

    /// Render in canonical form: `"[" list1-items " : " list2-items "]"`.
    pub fn to_canonical_string(&self) -> String {
        let l1: Vec<String> = self.items(1).iter().map(|&i| format_item(i, self.n)).collect();
        let l2: Vec<String> = self.items(2).iter().map(|&i| format_item(i, self.n)).collect();
        format!("[{} : {}]", l1.join(" "), l2.join(" "))
    }

    /// Parse the canonical form produced by [`ListPair::to_canonical_string`].
    pub fn from_canonical_string(s: &str, n: usize) -> Result<ListPair> {
        let toks = tokenize(s);
        let mut pos = 0;
        if toks.first().map(String::as_str) != Some("[") {
            return Err(GraphError::parse_failure("ListPair: expected '['"));
        }
        pos += 1;
        let mut placed = vec![false; n + 1];
        let mut sides: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
        let mut side = 0;
        while toks.get(pos).map(String::as_str) != Some("]") {
            match toks.get(pos).map(String::as_str) {
                Some(":") => {
                    side = 1;
                    pos += 1;
                }
                Some(tok) => {
                    let item = parse_item(tok, n)
                        .ok_or_else(|| GraphError::parse_failure(format!("ListPair: bad item {tok:?}")))?;
                    if item == 0 || item > n || placed[item] {
                        return Err(GraphError::parse_failure(format!(
                            "ListPair: duplicate or invalid item {tok:?}"
                        )));
                    }
                    placed[item] = true;
                    sides[side].push(item);
                    pos += 1;
                }
                None => return Err(GraphError::parse_failure("ListPair: unexpected end of input")),
            }
        }
        pos += 1;
        if pos != toks.len() {
            return Err(GraphError::parse_failure("ListPair: trailing tokens"));
        }
        if placed.iter().skip(1).any(|&p| !p) {
            return Err(GraphError::parse_failure("ListPair: not every item was placed"));
        }
        let mut lp = ListPair::new(n);
        for k in [1usize, 2usize] {
            let items = &sides[k - 1];
            let idx = k - 1;
            lp.first[idx] = items.first().copied().unwrap_or(0);
            lp.last[idx] = items.last().copied().unwrap_or(0);
            lp.length[idx] = items.len();
            for w in 0..items.len() {
                let it = items[w];
                lp.next[it] = if w + 1 < items.len() { items[w + 1] as i64 } else { 0 };
            }
            if let Some(&last) = items.last() {
                let first = items[0];
                lp.set_prev(first, k, last);
            }
            for w in 1..items.len() {
                lp.set_prev(items[w], k, items[w - 1]);
            }
        }
        Ok(lp)
    }
}

impl PartialEq for ListPair {
    /// Compares both lists, in order.
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n && self.items(1) == other.items(1) && self.items(2) == other.items(2)
    }
}

impl Eq for ListPair {}

impl std::fmt::Debug for ListPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ListPair(n={}, {})", self.n, self.to_canonical_string())
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_places_everything_in_list_two() {
        let lp = ListPair::new(4);
        assert_eq!(0, lp.length(1).unwrap());
        assert_eq!(4, lp.length(2).unwrap());
        assert_eq!("[ : a b c d]", lp.to_canonical_string());
    }

    #[test]
    fn swap_moves_between_lists() {
        let mut lp = ListPair::new(4);
        lp.swap(2, 0).unwrap();
        assert!(lp.in_list(2, 1).unwrap());
        assert_eq!("[b : a c d]", lp.to_canonical_string());
        lp.swap(4, 2).unwrap();
        assert_eq!("[b d : a c]", lp.to_canonical_string());
    }

    #[test]
    fn swap_into_destination_head() {
        let mut lp = ListPair::new(3);
        lp.swap(1, 0).unwrap();
        lp.swap(2, 0).unwrap();
        assert_eq!("[b a : c]", lp.to_canonical_string());
    }

    #[test]
    fn round_trip() {
        let mut lp = ListPair::new(5);
        lp.swap(2, 0).unwrap();
        lp.swap(4, 2).unwrap();
        let s = lp.to_canonical_string();
        let lp2 = ListPair::from_canonical_string(&s, 5).unwrap();
        assert_eq!(lp, lp2);
    }

    #[test]
    fn swap_to_non_member_destination_is_contract_violation() {
        let mut lp = ListPair::new(4);
        assert!(lp.swap(1, 2).unwrap_err().is_contract_violation());
    }
}
