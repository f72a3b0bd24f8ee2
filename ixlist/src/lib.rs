//! `List`: an ordered sequence of distinct items from `1..n`, with O(1) insert/remove/membership
//! and optional reverse links and per-item values materialized lazily.

use gerror::{require, GraphError, Result};
use gtext::{format_item, parse_item, tokenize};

const ABSENT: i64 = -1;

///////////////////////////////////////////////// List //////////////////////////////////////////////

/// An ordered sequence of distinct items from `1..n`. `V` is the optional per-item value type;
/// leave it as the default `()` for a plain list of integers.
#[derive(Clone)]
pub struct List<V = ()> {
    n: usize,
    first: usize,
    last: usize,
    length: usize,
    /// `next[i] == -1` means `i` is not on the list; `0` means `i` is the list's last item;
    /// otherwise the item immediately following `i`.
    next: Vec<i64>,
    /// Lazily materialized: `prev[i]` is the item immediately preceding `i`, or `0` if `i` is
    /// first. `None` until the first operation that needs predecessor access.
    prev: Option<Vec<usize>>,
    /// Lazily materialized per-item values, indexed the same as `next`/`prev`.
    values: Option<Vec<V>>,
}

impl<V: Clone + Default> List<V> {
    /// Create an empty list over the domain `1..=n`.
    pub fn new(n: usize) -> Self {
        List {
            n,
            first: 0,
            last: 0,
            length: 0,
            next: vec![ABSENT; n + 1],
            prev: None,
            values: None,
        }
    }

    /// The size of the index domain.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The list's first item, or `0` if empty.
    pub fn first(&self) -> usize {
        self.first
    }

    /// The list's last item, or `0` if empty.
    pub fn last(&self) -> usize {
        self.last
    }

    /// The number of items on the list.
    pub fn length(&self) -> usize {
        self.length
    }

    /// True iff the list has no items.
    pub fn empty(&self) -> bool {
        self.length == 0
    }

    /// True iff `i` is a valid item currently on the list.
    pub fn contains(&self, i: usize) -> bool {
        i >= 1 && i <= self.n && self.next[i] != ABSENT
    }

    /// Grow the index domain to at least `new_n`, preserving all existing items (grows
    /// to `max(new_n, 1.5*n)` in place).
    pub fn expand(&mut self, new_n: usize) {
        if new_n <= self.n {
            return;
        }
        let grown = new_n.max(self.n + self.n / 2 + 1);
        self.next.resize(grown + 1, ABSENT);
        if let Some(prev) = self.prev.as_mut() {
            prev.resize(grown + 1, 0);
        }
        if let Some(values) = self.values.as_mut() {
            values.resize_with(grown + 1, V::default);
        }
        self.n = grown;
    }

    /// The item following `i`, or `0` if `i` is last. O(1).
    pub fn next(&self, i: usize) -> Result<usize> {
        require!(self.contains(i), "next: {i} is not on the list");
        Ok(self.next[i] as usize)
    }

    /// The item preceding `i`, or `0` if `i` is first. O(1) once reverse links exist; the first
    /// call to `prev` (on any item) materializes them in O(n).
    pub fn prev(&mut self, i: usize) -> Result<usize> {
        require!(self.contains(i), "prev: {i} is not on the list");
        self.materialize_prev();
        Ok(self.prev.as_ref().unwrap()[i])
    }

    fn materialize_prev(&mut self) {
        if self.prev.is_some() {
            return;
        }
        let mut prev = vec![0usize; self.n + 1];
        let mut p = 0usize;
        let mut cur = self.first;
        while cur != 0 {
            prev[cur] = p;
            p = cur;
            cur = self.next[cur] as usize;
        }
        self.prev = Some(prev);
    }

    /// Insert `i` immediately after `j` (or at the head if `j == 0`). Fails if `i` is already
    /// present or `j != 0` and `j` is not a member. Expands `n` on demand. O(1).
    pub fn insert(&mut self, i: usize, j: usize) -> Result<()> {
        require!(i >= 1, "insert: item {i} must be >= 1");
        if i > self.n {
            self.expand(i);
        }
        require!(!self.contains(i), "insert: {i} is already on the list");
        require!(j == 0 || self.contains(j), "insert: {j} is not on the list");
        self.splice_in(i, j);
        Ok(())
    }

    fn splice_in(&mut self, i: usize, j: usize) {
        if j == 0 {
            self.next[i] = if self.first == 0 { 0 } else { self.first as i64 };
            if let Some(prev) = self.prev.as_mut() {
                if self.first != 0 {
                    prev[self.first] = i;
                }
                prev[i] = 0;
            }
            if self.first == 0 {
                self.last = i;
            }
            self.first = i;
        } else {
            let after = self.next[j];
            self.next[j] = i as i64;
            self.next[i] = after;
            if let Some(prev) = self.prev.as_mut() {
                prev[i] = j;
                if after != 0 {
                    prev[after as usize] = i;
                }
            }
            if j == self.last {
                self.last = i;
            }
        }
        self.length += 1;
    }

    /// Remove `next(i)` (or the head, if `i == 0`). O(1). Fails if there is no such item.
    pub fn delete_next(&mut self, i: usize) -> Result<usize> {
        require!(i == 0 || self.contains(i), "deleteNext: {i} is not on the list");
        let target = if i == 0 { self.first } else { self.next[i] as usize };
        require!(target != 0, "deleteNext: {i} has no next item");
        let after = self.next[target];
        if i == 0 {
            self.first = after as usize;
        } else {
            self.next[i] = after;
        }
        if target == self.last {
            self.last = i;
        }
        if let Some(prev) = self.prev.as_mut() {
            if after != 0 {
                prev[after as usize] = i;
            }
        }
        self.next[target] = ABSENT;
        self.length -= 1;
        Ok(target)
    }

    /// Remove `i` from the list. O(1) given reverse links; materializes them if absent.
    pub fn delete(&mut self, i: usize) -> Result<()> {
        require!(self.contains(i), "delete: {i} is not on the list");
        self.materialize_prev();
        let p = self.prev.as_ref().unwrap()[i];
        self.delete_next(p)?;
        Ok(())
    }

    /// Push `i` onto the head of the list (stack push).
    pub fn push(&mut self, i: usize) -> Result<()> {
        self.insert(i, 0)
    }

    /// Pop and return the head of the list, or `0` if empty (stack pop).
    pub fn pop(&mut self) -> Result<usize> {
        if self.first == 0 {
            return Ok(0);
        }
        self.delete_next(0)
    }

    /// Remove and return the last item of the list, or `0` if empty.
    pub fn pop_last(&mut self) -> Result<usize> {
        if self.last == 0 {
            return Ok(0);
        }
        self.materialize_prev();
        let last = self.last;
        let p = self.prev.as_ref().unwrap()[last];
        self.delete_next(p)
    }

    /// Append `i` to the tail of the list (queue enqueue).
    pub fn enq(&mut self, i: usize) -> Result<()> {
        let last = self.last;
        self.insert(i, last)
    }

    /// Remove and return the head of the list, or `0` if empty (queue dequeue).
    pub fn deq(&mut self) -> Result<usize> {
        self.pop()
    }

    /// Positional access: `k > 0` counts from the head (`at(1) == first()`), `k < 0` counts from
    /// the tail (`at(-1) == last()`). `k == 0` is a contract violation.
    pub fn at(&mut self, k: i64) -> Result<usize> {
        require!(k != 0, "at: position 0 is not valid");
        if k > 0 {
            let mut cur = self.first;
            for _ in 1..k {
                if cur == 0 {
                    return Ok(0);
                }
                cur = self.next[cur] as usize;
            }
            Ok(cur)
        } else {
            self.materialize_prev();
            let prev = self.prev.as_ref().unwrap();
            let mut cur = self.last;
            for _ in 1..(-k) {
                if cur == 0 {
                    return Ok(0);
                }
                cur = prev[cur];
            }
            Ok(cur)
        }
    }

    /// Compare two lists by membership only, ignoring order.
    pub fn set_equals(&self, other: &List<V>) -> bool {
        if self.length != other.length {
            return false;
        }
        let mut cur = self.first;
        while cur != 0 {
            if !other.contains(cur) {
                return false;
            }
            cur = self.next[cur] as usize;
        }
        true
    }

    /// Iterate the list's items from head to tail.
    pub fn iter(&self) -> ListIter<'_, V> {
        ListIter {
            list: self,
            cur: self.first,
        }
    }

    /// The value stored at `i`, materializing value storage (filled with `V::default()`) if this
    /// is the first value ever used on this list.
    pub fn value(&mut self, i: usize) -> Result<V> {
        require!(self.contains(i), "value: {i} is not on the list");
        self.materialize_values();
        Ok(self.values.as_ref().unwrap()[i].clone())
    }

    /// Set the value stored at `i`, materializing value storage if needed.
    pub fn set_value(&mut self, i: usize, v: V) -> Result<()> {
        require!(self.contains(i), "set_value: {i} is not on the list");
        self.materialize_values();
        self.values.as_mut().unwrap()[i] = v;
        Ok(())
    }

    fn materialize_values(&mut self) {
        if self.values.is_none() {
            self.values = Some(vec![V::default(); self.n + 1]);
        }
    }
}

impl List<()> {
    /// Render the list in canonical form: `"[" item* "]"`.
    pub fn to_canonical_string(&self) -> String {
        let mut s = String::from("[");
        let mut cur = self.first;
        let mut first = true;
        while cur != 0 {
            if !first {
                s.push(' ');
            }
            first = false;
            s.push_str(&format_item(cur, self.n));
            cur = self.next[cur] as usize;
        }
        s.push(']');
        s
    }

    /// Parse the canonical form produced by [`List::to_canonical_string`].
    pub fn from_canonical_string(s: &str, n: usize) -> Result<List<()>> {
        let toks = tokenize(s);
        if toks.first().map(String::as_str) != Some("[") || toks.last().map(String::as_str) != Some("]") {
            return Err(GraphError::parse_failure("List: expected '[' ... ']'"));
        }
        let mut list = List::new(n);
        for tok in &toks[1..toks.len() - 1] {
            let item = parse_item(tok, n)
                .ok_or_else(|| GraphError::parse_failure(format!("List: bad item {tok:?}")))?;
            if item == 0 || list.contains(item) {
                return Err(GraphError::parse_failure(format!(
                    "List: duplicate or zero item {tok:?}"
                )));
            }
            let last = list.last;
            list.insert(item, last).map_err(|_| {
                GraphError::parse_failure(format!("List: could not insert item {tok:?}"))
            })?;
        }
        Ok(list)
    }
}

impl PartialEq for List<()> {
    /// Order-sensitive equality.
    fn eq(&self, other: &Self) -> bool {
        if self.length != other.length {
            return false;
        }
        let mut a = self.first;
        let mut b = other.first;
        while a != 0 {
            if a != b {
                return false;
            }
            a = self.next[a] as usize;
            b = other.next[b] as usize;
        }
        b == 0
    }
}

impl Eq for List<()> {}

impl std::fmt::Debug for List<()> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "List(n={}, {})", self.n, self.to_canonical_string())
    }
}

/////////////////////////////////////////////// ListIter ///////////////////////////////////////////

/// Iterator over a [`List`]'s items, head to tail.
pub struct ListIter<'a, V> {
    list: &'a List<V>,
    cur: usize,
}

impl<'a, V> Iterator for ListIter<'a, V> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.cur == 0 {
            None
        } else {
            let item = self.cur;
            self.cur = self.list.next[item] as usize;
            Some(item)
        }
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_then_relink_preserves_items() {
        // worked scenario: grow, then relink
        let mut l: List<()> = List::new(5);
        l.enq(3).unwrap();
        l.enq(1).unwrap();
        l.enq(4).unwrap();
        l.push(2).unwrap();
        l.insert(5, 1).unwrap();
        assert_eq!("[2 3 1 5 4]", l.to_canonical_string());
        assert_eq!(4, l.at(-1).unwrap());
        assert_eq!(1, l.prev(5).unwrap());
        l.delete(1).unwrap();
        assert_eq!("[2 3 5 4]", l.to_canonical_string());
    }

    #[test]
    fn insert_duplicate_is_contract_violation() {
        let mut l: List<()> = List::new(4);
        l.push(1).unwrap();
        assert!(l.insert(1, 0).unwrap_err().is_contract_violation());
    }

    #[test]
    fn insert_after_non_member_is_contract_violation() {
        let mut l: List<()> = List::new(4);
        assert!(l.insert(1, 2).unwrap_err().is_contract_violation());
    }

    #[test]
    fn next_of_non_member_is_contract_violation() {
        let l: List<()> = List::new(4);
        assert!(l.next(1).unwrap_err().is_contract_violation());
    }

    #[test]
    fn round_trip() {
        let mut l: List<()> = List::new(5);
        l.enq(3).unwrap();
        l.enq(1).unwrap();
        l.enq(4).unwrap();
        let s = l.to_canonical_string();
        let l2 = List::from_canonical_string(&s, 5).unwrap();
        assert_eq!(l, l2);
    }

    #[test]
    fn from_string_rejects_duplicate() {
        assert!(List::<()>::from_canonical_string("[a a]", 5).is_err());
    }

    #[test]
    fn set_equals_ignores_order() {
        let mut a: List<()> = List::new(5);
        a.enq(1).unwrap();
        a.enq(2).unwrap();
        let mut b: List<()> = List::new(5);
        b.enq(2).unwrap();
        b.enq(1).unwrap();
        assert!(a.set_equals(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn expand_preserves_state() {
        let mut l: List<()> = List::new(2);
        l.push(1).unwrap();
        l.insert(5, 1).unwrap();
        assert!(l.n() >= 5);
        assert!(l.contains(1));
        assert_eq!(0, l.next(1).unwrap());
        assert_eq!("[1 5]", l.to_canonical_string());
    }

    #[test]
    fn values_are_lazy() {
        let mut l: List<i32> = List::new(4);
        l.push(1).unwrap();
        l.set_value(1, 42).unwrap();
        assert_eq!(42, l.value(1).unwrap());
    }

    #[test]
    fn pop_last_materializes_reverse_links() {
        let mut l: List<()> = List::new(4);
        l.enq(1).unwrap();
        l.enq(2).unwrap();
        l.enq(3).unwrap();
        assert_eq!(3, l.pop_last().unwrap());
        assert_eq!("[1 2]", l.to_canonical_string());
    }
}

#[cfg(test)]
mod stress {
    use super::*;
    use guacamole::{FromGuacamole, Guacamole};
    use std::collections::BTreeSet;

    fn stress(seed: u64) {
        let n = 64;
        let mut l: List<()> = List::new(n);
        let mut reference: BTreeSet<usize> = BTreeSet::new();
        let mut guac = Guacamole::new(seed);
        for _ in 0..2_000 {
            let op = u8::from_guacamole(&mut (), &mut guac) % 4;
            let item = (u8::from_guacamole(&mut (), &mut guac) as usize % n) + 1;
            match op {
                0 => {
                    if !reference.contains(&item) {
                        l.enq(item).unwrap();
                        reference.insert(item);
                    }
                }
                1 => {
                    if !reference.contains(&item) {
                        l.push(item).unwrap();
                        reference.insert(item);
                    }
                }
                2 => {
                    if reference.contains(&item) {
                        l.delete(item).unwrap();
                        reference.remove(&item);
                    }
                }
                _ => {
                    assert_eq!(reference.contains(&item), l.contains(item));
                }
            }
            assert_eq!(reference.len(), l.length());
        }
    }

    #[test]
    fn guacamole3135396816021318057() {
        stress(3135396816021318057)
    }

    #[test]
    fn guacamole8271940185722410981() {
        stress(8271940185722410981)
    }

    #[test]
    fn guacamole11304981239477773416() {
        stress(11304981239477773416)
    }
}
