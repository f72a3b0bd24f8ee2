//! `Map`: a key-ordered associative container over a growable pool of index-based pair slots
//! Keys live in a single [`keysets::KeySets`] tree; values sit in a flat array
//! indexed by pair id; unused pair ids are tracked by an [`ixlist::List`] free list, in the same
//! free-list-over-a-dense-array style the workspace's other pooled containers use.

use gerror::{require, Result};
use gtext::Key;
use ixlist::List;
use keysets::KeySets;

///////////////////////////////////////////////// Map ////////////////////////////////////////////////

pub struct Map<V: Clone + Default> {
    forest: KeySets,
    top: usize,
    value: Vec<V>,
    free: List<()>,
    capacity: usize,
}

impl<V: Clone + Default> Map<V> {
    pub fn new(capacity: usize) -> Self {
        let mut free = List::new(capacity);
        for i in (1..=capacity).rev() {
            free.push(i).unwrap();
        }
        Map {
            forest: KeySets::new(capacity),
            top: 0,
            value: vec![V::default(); capacity + 1],
            free,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.forest.items(self.top).len()
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    fn grow(&mut self) {
        let grown = self.capacity + self.capacity / 2 + 1;
        self.forest.expand(grown);
        self.free.expand(grown);
        self.value.resize(grown + 1, V::default());
        for i in (self.capacity + 1..=grown).rev() {
            self.free.push(i).unwrap();
        }
        self.capacity = grown;
    }

    /// The pair id holding `k` in the top tree, or `0` if `k` is absent. O(log n).
    pub fn get_pair(&self, k: &Key) -> Result<usize> {
        self.forest.search(k, self.top)
    }

    /// The value stored under `k`, if present. O(log n).
    pub fn get(&self, k: &Key) -> Result<Option<V>> {
        let p = self.get_pair(k)?;
        Ok(if p == 0 { None } else { Some(self.value[p].clone()) })
    }

    /// Insert or overwrite the value under `k`. Expands the pool by at least 50% if it is
    /// exhausted. O(log n) amortized.
    pub fn put(&mut self, k: Key, v: V) -> Result<()> {
        let existing = self.forest.search(&k, self.top)?;
        if existing != 0 {
            self.value[existing] = v;
            return Ok(());
        }
        if self.free.empty() {
            self.grow();
        }
        let p = self.free.pop()?;
        self.value[p] = v;
        self.top = self.forest.insert(p, self.top, k)?;
        Ok(())
    }

    /// Remove `k`, freeing its pair id. O(log n).
    pub fn delete(&mut self, k: &Key) -> Result<()> {
        let p = self.forest.search(k, self.top)?;
        require!(p != 0, "delete: key not present");
        self.top = self.forest.delete(p)?;
        self.value[p] = V::default();
        self.free.push(p)?;
        Ok(())
    }

    /// All `(key, value)` pairs in ascending key order. O(n).
    pub fn items(&self) -> Vec<(Key, V)> {
        self.forest
            .items(self.top)
            .into_iter()
            .map(|p| (self.forest.key(p).unwrap().clone(), self.value[p].clone()))
            .collect()
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get_round_trip() {
        let mut m: Map<i64> = Map::new(4);
        m.put(Key::Int(3), 300).unwrap();
        m.put(Key::Int(1), 100).unwrap();
        m.put(Key::Int(2), 200).unwrap();
        assert_eq!(Some(200), m.get(&Key::Int(2)).unwrap());
        assert_eq!(None, m.get(&Key::Int(9)).unwrap());
    }

    #[test]
    fn put_overwrites_existing_key() {
        let mut m: Map<i64> = Map::new(4);
        m.put(Key::Int(1), 1).unwrap();
        m.put(Key::Int(1), 2).unwrap();
        assert_eq!(1, m.len());
        assert_eq!(Some(2), m.get(&Key::Int(1)).unwrap());
    }

    #[test]
    fn iteration_is_key_ordered() {
        let mut m: Map<i64> = Map::new(5);
        for k in [5, 1, 4, 2, 3] {
            m.put(Key::Int(k), k * 10).unwrap();
        }
        let keys: Vec<i64> = m
            .items()
            .into_iter()
            .map(|(k, _)| match k {
                Key::Int(v) => v,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(vec![1, 2, 3, 4, 5], keys);
    }

    #[test]
    fn delete_frees_the_slot_for_reuse() {
        let mut m: Map<i64> = Map::new(2);
        m.put(Key::Int(1), 10).unwrap();
        m.put(Key::Int(2), 20).unwrap();
        m.delete(&Key::Int(1)).unwrap();
        assert_eq!(1, m.len());
        m.put(Key::Int(3), 30).unwrap();
        assert_eq!(2, m.len());
    }

    #[test]
    fn delete_missing_key_is_contract_violation() {
        let mut m: Map<i64> = Map::new(2);
        assert!(m.delete(&Key::Int(1)).unwrap_err().is_contract_violation());
    }

    #[test]
    fn pool_expands_past_initial_capacity() {
        let mut m: Map<i64> = Map::new(2);
        for k in 1..=10 {
            m.put(Key::Int(k), k).unwrap();
        }
        assert_eq!(10, m.len());
        for k in 1..=10 {
            assert_eq!(Some(k), m.get(&Key::Int(k)).unwrap());
        }
    }
}

#[cfg(test)]
mod stress {
    use super::*;
    use guacamole::{FromGuacamole, Guacamole};
    use std::collections::BTreeMap;

    fn stress(seed: u64) {
        let mut m: Map<i64> = Map::new(4);
        let mut reference: BTreeMap<i64, i64> = BTreeMap::new();
        let mut guac = Guacamole::new(seed);
        for _ in 0..400 {
            let k = (u8::from_guacamole(&mut (), &mut guac) as i64) % 30;
            if u8::from_guacamole(&mut (), &mut guac) % 3 == 0 {
                if reference.remove(&k).is_some() {
                    m.delete(&Key::Int(k)).unwrap();
                }
            } else {
                let v = u8::from_guacamole(&mut (), &mut guac) as i64;
                reference.insert(k, v);
                m.put(Key::Int(k), v).unwrap();
            }
        }
        let items = m.items();
        assert_eq!(reference.len(), items.len());
        for (k, v) in items {
            let Key::Int(ik) = k else { unreachable!() };
            assert_eq!(Some(&v), reference.get(&ik));
        }
    }

    #[test]
    fn guacamole6273849502736485920() {
        stress(6273849502736485920)
    }

    #[test]
    fn guacamole3948572016394857201() {
        stress(3948572016394857201)
    }
}
