//! `ListSet`: a partition of `1..n` into disjoint lists, each named by its first item.
//!
//! Every item carries two neighbor slots, `next[i]` and `prev[i]`; unlike [`ixlist::List`] there is
//! no "not a member" sentinel, since every item always belongs to exactly one list. A list's first
//! item is cyclic in the `prev` direction: `prev[first] == last`. `isFirst(i)` holds exactly when
//! `next[prev[i]] == 0`, since that is true only when `i`'s predecessor slot names a list's last
//! item (itself true only for the first item's cyclic back-pointer).

use std::cmp::Ordering;

use gerror::{require, GraphError, Result};
use gtext::{format_item, parse_item, tokenize};

///////////////////////////////////////////////// ListSet ///////////////////////////////////////////

#[derive(Clone)]
pub struct ListSet {
    n: usize,
    /// `0` marks the last item of a list; otherwise the next item.
    next: Vec<i64>,
    /// True predecessor, except at a list's first item, where it cyclically names the list's last.
    prev: Vec<usize>,
}

impl ListSet {
    /// Every item starts out as its own singleton list.
    pub fn new(n: usize) -> Self {
        let mut prev = vec![0usize; n + 1];
        for i in 1..=n {
            prev[i] = i;
        }
        ListSet {
            n,
            next: vec![0; n + 1],
            prev,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    fn valid(&self, i: usize) -> bool {
        i >= 1 && i <= self.n
    }

    /// True iff `i` is the first item of its list.
    pub fn is_first(&self, i: usize) -> bool {
        self.valid(i) && self.next[self.prev[i]] == 0
    }

    /// Validates that `l` is a list's first item and returns it. O(1).
    pub fn first(&self, l: usize) -> Result<usize> {
        require!(self.is_first(l), "first: {l} is not a list's first item");
        Ok(l)
    }

    /// The item following `i` within its list, or `0` if `i` is last. O(1).
    pub fn next(&self, i: usize) -> Result<usize> {
        require!(self.valid(i), "next: {i} is out of range");
        Ok(self.next[i] as usize)
    }

    /// The item preceding `i` within its list (cyclic at the first item). O(1).
    pub fn prev(&self, i: usize) -> Result<usize> {
        require!(self.valid(i), "prev: {i} is out of range");
        Ok(self.prev[i])
    }

    /// The last item of the list whose first item is `l`. O(1).
    pub fn last(&self, l: usize) -> Result<usize> {
        require!(self.is_first(l), "last: {l} is not a list's first item");
        Ok(self.prev[l])
    }

    /// Detach `i` into a singleton list of its own.
    fn make_singleton(&mut self, i: usize) {
        self.next[i] = 0;
        self.prev[i] = i;
    }

    /// Reset `i` to be a fresh singleton list. Used by callers building up a `ListSet` from scratch
    /// or after an item has been spliced out by [`ListSet::delete`].
    pub fn singleton(&mut self, i: usize) -> Result<usize> {
        require!(self.valid(i), "singleton: {i} is out of range");
        self.make_singleton(i);
        Ok(i)
    }

    /// Append the list named `l2` onto the end of the list named `l1`, returning `l1`. O(1).
    pub fn join(&mut self, l1: usize, l2: usize) -> Result<usize> {
        require!(self.is_first(l1), "join: {l1} is not a list's first item");
        require!(self.is_first(l2), "join: {l2} is not a list's first item");
        require!(l1 != l2, "join: {l1} and {l2} name the same list");
        let last1 = self.prev[l1];
        let last2 = self.prev[l2];
        self.next[last1] = l2 as i64;
        self.prev[l2] = last1;
        self.next[last2] = 0;
        self.prev[l1] = last2;
        Ok(l1)
    }

    /// Remove `i` from the list named `l`, leaving `i` a singleton. Returns the remaining list's
    /// (possibly changed) first item, or `0` if the list is now empty. O(1).
    pub fn delete(&mut self, i: usize, l: usize) -> Result<usize> {
        require!(self.is_first(l), "delete: {l} is not a list's first item");
        let new_first = if i == l {
            let nx = self.next[i];
            if nx == 0 {
                0
            } else {
                let nx = nx as usize;
                self.prev[nx] = self.prev[l];
                nx
            }
        } else {
            let p = self.prev[i];
            let nx = self.next[i];
            self.next[p] = nx;
            if nx != 0 {
                self.prev[nx as usize] = p;
            } else {
                self.prev[l] = p;
            }
            l
        };
        self.make_singleton(i);
        Ok(new_first)
    }

    /// Split the list named `l` just before `i`, returning `(front, back)` where `front` is the
    /// (possibly `0`, if `i == l`) first item of the items before `i` and `back == i`. O(1).
    pub fn split(&mut self, l: usize, i: usize) -> Result<(usize, usize)> {
        require!(self.is_first(l), "split: {l} is not a list's first item");
        if i == l {
            return Ok((0, l));
        }
        require!(self.valid(i), "split: {i} is out of range");
        let p = self.prev[i];
        let last = self.prev[l];
        self.next[p] = 0;
        self.prev[l] = p;
        self.prev[i] = last;
        Ok((l, i))
    }

    /// Rotate the list named `l` so that `i` becomes its first item. Returns `i`. O(1).
    pub fn rotate(&mut self, l: usize, i: usize) -> Result<usize> {
        require!(self.is_first(l), "rotate: {l} is not a list's first item");
        if i == l {
            return Ok(l);
        }
        require!(self.valid(i), "rotate: {i} is out of range");
        let p = self.prev[i];
        let last = self.prev[l];
        self.next[last] = l as i64;
        self.next[p] = 0;
        self.prev[i] = p;
        Ok(i)
    }

    /// Sort every list independently by `cmp`, applied to pairs of items. O(total length * log).
    pub fn sort(&mut self, cmp: impl Fn(usize, usize) -> Ordering) {
        let mut seen = vec![false; self.n + 1];
        for start in 1..=self.n {
            if seen[start] || !self.is_first(start) {
                continue;
            }
            let mut items = Vec::new();
            let mut cur = start;
            loop {
                items.push(cur);
                seen[cur] = true;
                let nx = self.next[cur];
                if nx == 0 {
                    break;
                }
                cur = nx as usize;
            }
            items.sort_by(|&a, &b| cmp(a, b));
            for (w, &it) in items.iter().enumerate() {
                self.next[it] = if w + 1 < items.len() { items[w + 1] as i64 } else { 0 };
            }
            let new_last = *items.last().unwrap();
            self.prev[items[0]] = new_last;
            for w in 1..items.len() {
                self.prev[items[w]] = items[w - 1];
            }
        }
    }

    /// Sort just the list named `l` by `cmp`, leaving every other list untouched. Returns the
    /// list's (possibly changed) first item. O(length of list * log).
    pub fn sort_list(&mut self, l: usize, cmp: impl Fn(usize, usize) -> Ordering) -> Result<usize> {
        require!(self.is_first(l), "sort_list: {l} is not a list's first item");
        let mut items = self.items(l);
        items.sort_by(|&a, &b| cmp(a, b));
        for (w, &it) in items.iter().enumerate() {
            self.next[it] = if w + 1 < items.len() { items[w + 1] as i64 } else { 0 };
        }
        let new_last = *items.last().unwrap();
        self.prev[items[0]] = new_last;
        for w in 1..items.len() {
            self.prev[items[w]] = items[w - 1];
        }
        Ok(items[0])
    }

    /// Walk `prev` from `i` back to its list's first item. O(length of list).
    pub fn find_list(&self, i: usize) -> usize {
        let mut cur = i;
        while !self.is_first(cur) {
            cur = self.prev[cur];
        }
        cur
    }

    /// Items of the list named `l`, head to tail.
    pub fn items(&self, l: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cur = l;
        loop {
            out.push(cur);
            let nx = self.next[cur];
            if nx == 0 {
                break;
            }
            cur = nx as usize;
        }
        out
    }

    /// Render in canonical form: `"{" ("[" item* "]")* "}"`, one bracketed group per list, lists
    /// ordered by their first item's index.
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

    /// Parse the canonical form produced by [`ListSet::to_canonical_string`].
    pub fn from_canonical_string(s: &str, n: usize) -> Result<ListSet> {
        let toks = tokenize(s);
        let mut pos = 0;
        let expect = |toks: &[String], pos: &mut usize, tok: &str| -> Result<()> {
            if toks.get(*pos).map(String::as_str) != Some(tok) {
                return Err(GraphError::parse_failure(format!("ListSet: expected {tok:?}")));
            }
            *pos += 1;
            Ok(())
        };
        expect(&toks, &mut pos, "{")?;
        let mut lists: Vec<Vec<usize>> = Vec::new();
        let mut placed = vec![false; n + 1];
        while toks.get(pos).map(String::as_str) == Some("[") {
            pos += 1;
            let mut items = Vec::new();
            while toks.get(pos).map(String::as_str) != Some("]") {
                let tok = toks
                    .get(pos)
                    .ok_or_else(|| GraphError::parse_failure("ListSet: unexpected end of input"))?;
                let item = parse_item(tok, n)
                    .ok_or_else(|| GraphError::parse_failure(format!("ListSet: bad item {tok:?}")))?;
                if item == 0 || item > n || placed[item] {
                    return Err(GraphError::parse_failure(format!(
                        "ListSet: duplicate or invalid item {tok:?}"
                    )));
                }
                placed[item] = true;
                items.push(item);
                pos += 1;
            }
            pos += 1;
            if items.is_empty() {
                return Err(GraphError::parse_failure("ListSet: empty list group"));
            }
            lists.push(items);
        }
        expect(&toks, &mut pos, "}")?;
        if pos != toks.len() {
            return Err(GraphError::parse_failure("ListSet: trailing tokens"));
        }
        if placed.iter().skip(1).any(|&p| !p) {
            return Err(GraphError::parse_failure("ListSet: not every item was placed"));
        }
        let mut ls = ListSet::new(n);
        for items in lists {
            for w in 0..items.len() {
                let it = items[w];
                ls.next[it] = if w + 1 < items.len() { items[w + 1] as i64 } else { 0 };
            }
            let last = *items.last().unwrap();
            ls.prev[items[0]] = last;
            for w in 1..items.len() {
                ls.prev[items[w]] = items[w - 1];
            }
        }
        Ok(ls)
    }
}

impl PartialEq for ListSet {
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n && self.next == other.next && self.prev == other.prev
    }
}

impl Eq for ListSet {}

impl std::fmt::Debug for ListSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ListSet(n={}, {})", self.n, self.to_canonical_string())
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> ListSet {
        // "{[a c] [b g] [e f] [h]}", n=8
        ListSet::from_canonical_string("{[a c] [b g] [e f] [h]}", 8).unwrap()
    }

    #[test]
    fn join_then_delete_updates_canonical_form() {
        let mut ls = example();
        assert_eq!(1, ls.join(1, 5).unwrap());
        assert_eq!("{[a c e f] [b g] [h]}", ls.to_canonical_string());
        assert_eq!(1, ls.delete(5, 1).unwrap());
        assert_eq!("{[a c f] [b g] [h]}", ls.to_canonical_string());
    }

    #[test]
    fn is_first_matches_singleton_and_multi() {
        let ls = ListSet::new(4);
        for i in 1..=4 {
            assert!(ls.is_first(i));
        }
    }

    #[test]
    fn round_trip() {
        let ls = example();
        let s = ls.to_canonical_string();
        let ls2 = ListSet::from_canonical_string(&s, 8).unwrap();
        assert_eq!(ls, ls2);
    }

    #[test]
    fn split_and_rotate() {
        let mut ls = ListSet::from_canonical_string("{[a b c d]}", 4).unwrap();
        let (front, back) = ls.split(1, 3).unwrap();
        assert_eq!(1, front);
        assert_eq!(3, back);
        assert_eq!(2, ls.last(1).unwrap());
        assert_eq!(4, ls.last(3).unwrap());

        let mut ls = ListSet::from_canonical_string("{[a b c d]}", 4).unwrap();
        let new_first = ls.rotate(1, 3).unwrap();
        assert_eq!(3, new_first);
        assert_eq!("{[c d a b]}", ls.to_canonical_string());
    }

    #[test]
    fn sort_orders_each_list_independently() {
        let mut ls = ListSet::from_canonical_string("{[c a b] [d]}", 4).unwrap();
        ls.sort(|a, b| a.cmp(&b));
        assert_eq!("{[a b c] [d]}", ls.to_canonical_string());
    }

    #[test]
    fn sort_list_leaves_other_lists_untouched() {
        let mut ls = ListSet::from_canonical_string("{[c a b] [d f e]}", 6).unwrap();
        let new_first = ls.sort_list(3, |a, b| a.cmp(&b)).unwrap();
        assert_eq!(1, new_first);
        assert_eq!("{[a b c] [d f e]}", ls.to_canonical_string());
    }

    #[test]
    fn find_list_walks_to_first() {
        let ls = example();
        assert_eq!(1, ls.find_list(3));
        assert_eq!(5, ls.find_list(6));
    }

    #[test]
    fn join_non_first_is_contract_violation() {
        let mut ls = example();
        assert!(ls.join(3, 1).unwrap_err().is_contract_violation());
    }

    #[test]
    fn from_string_rejects_missing_item() {
        assert!(ListSet::from_canonical_string("{[a b]}", 4).is_err());
    }
}

#[cfg(test)]
mod stress {
    use super::*;
    use guacamole::{FromGuacamole, Guacamole};

    fn reference_components(ls: &ListSet) -> Vec<Vec<usize>> {
        let mut out: Vec<Vec<usize>> = (1..=ls.n()).map(|i| ls.items(ls.find_list(i))).collect();
        out.sort();
        out.dedup();
        out
    }

    fn stress(seed: u64) {
        let n = 20;
        let mut ls = ListSet::new(n);
        let mut guac = Guacamole::new(seed);
        for _ in 0..500 {
            let op = u8::from_guacamole(&mut (), &mut guac) % 3;
            let a = (u8::from_guacamole(&mut (), &mut guac) as usize % n) + 1;
            let b = (u8::from_guacamole(&mut (), &mut guac) as usize % n) + 1;
            match op {
                0 => {
                    let la = ls.find_list(a);
                    let lb = ls.find_list(b);
                    if la != lb {
                        ls.join(la, lb).unwrap();
                    }
                }
                1 => {
                    let la = ls.find_list(a);
                    ls.delete(a, la).unwrap();
                }
                _ => {
                    let la = ls.find_list(a);
                    if ls.is_first(la) {
                        ls.rotate(la, a).ok();
                    }
                }
            }
            let _ = reference_components(&ls);
        }
        // every item still belongs to exactly one list (U1).
        let components = reference_components(&ls);
        let total: usize = components.iter().map(Vec::len).sum();
        assert_eq!(n, total);
    }

    #[test]
    fn guacamole4827193650192837461() {
        stress(4827193650192837461)
    }

    #[test]
    fn guacamole9182736450918273645() {
        stress(9182736450918273645)
    }
}
