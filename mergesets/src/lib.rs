//! `MergeSets`: a classical disjoint-set forest over `1..n` with union-by-rank and path
//! compression.

use biometrics::Counter;
use gerror::{require, Result};

///////////////////////////////////////////////// MergeSets //////////////////////////////////////////

pub struct MergeSets {
    n: usize,
    parent: Vec<usize>,
    rank: Vec<u8>,
    /// Number of [`MergeSets::find`] calls.
    pub finds: Counter,
    /// Number of [`MergeSets::merge`] calls that actually united two distinct trees.
    pub merges: Counter,
    /// Total number of parent pointers rewritten by path compression.
    pub steps: Counter,
}

impl MergeSets {
    /// Every item starts out as its own singleton set.
    pub fn new(n: usize) -> Self {
        MergeSets {
            n,
            parent: (0..=n).collect(),
            rank: vec![0; n + 1],
            finds: Counter::new("mergesets.finds"),
            merges: Counter::new("mergesets.merges"),
            steps: Counter::new("mergesets.steps"),
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    fn valid(&self, i: usize) -> bool {
        i >= 1 && i <= self.n
    }

    /// The canonical root of the set containing `i`, with path compression. Amortized near-O(1).
    pub fn find(&mut self, i: usize) -> Result<usize> {
        require!(self.valid(i), "find: {i} is out of range");
        self.finds.click();
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            self.steps.click();
            cur = next;
        }
        Ok(root)
    }

    /// The canonical root of the set containing `i`, without path compression. Used only for
    /// equality tests and debugging, so that it never perturbs the tree shape under test. O(log n)
    /// amortized given union-by-rank, O(n) worst case if called without any intervening `find`.
    pub fn findroot(&self, i: usize) -> Result<usize> {
        require!(self.valid(i), "findroot: {i} is out of range");
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        Ok(root)
    }

    /// Unite the trees rooted at `i` and `j` by rank. Both must already be roots. O(1).
    pub fn merge(&mut self, i: usize, j: usize) -> Result<usize> {
        require!(self.valid(i), "merge: {i} is out of range");
        require!(self.valid(j), "merge: {j} is out of range");
        require!(self.parent[i] == i, "merge: {i} is not a root");
        require!(self.parent[j] == j, "merge: {j} is not a root");
        if i == j {
            return Ok(i);
        }
        self.merges.click();
        let new_root = match self.rank[i].cmp(&self.rank[j]) {
            std::cmp::Ordering::Less => {
                self.parent[i] = j;
                j
            }
            std::cmp::Ordering::Greater => {
                self.parent[j] = i;
                i
            }
            std::cmp::Ordering::Equal => {
                self.parent[j] = i;
                self.rank[i] += 1;
                i
            }
        };
        Ok(new_root)
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use biometrics::Sensor;

    #[test]
    fn merge_chains_collapse_to_one_root() {
        let mut ms = MergeSets::new(6);
        let r1 = ms.find(1).unwrap();
        let r2 = ms.find(2).unwrap();
        ms.merge(r1, r2).unwrap();
        let r3 = ms.find(3).unwrap();
        let r4 = ms.find(4).unwrap();
        ms.merge(r3, r4).unwrap();
        let r1 = ms.find(1).unwrap();
        let r3 = ms.find(3).unwrap();
        ms.merge(r1, r3).unwrap();

        assert_eq!(ms.find(4).unwrap(), ms.find(2).unwrap());
        assert_ne!(ms.find(5).unwrap(), ms.find(1).unwrap());
        assert_eq!(6, ms.find(6).unwrap());
    }

    #[test]
    fn merge_on_non_root_is_contract_violation() {
        let mut ms = MergeSets::new(4);
        ms.merge(1, 2).unwrap();
        let non_root = if ms.findroot(1).unwrap() == 1 { 2 } else { 1 };
        assert!(ms.merge(non_root, 3).unwrap_err().is_contract_violation());
    }

    #[test]
    fn find_compresses_paths() {
        let mut ms = MergeSets::new(3);
        ms.merge(1, 2).unwrap();
        ms.merge(ms.findroot(1).unwrap(), 3).unwrap();
        let root = ms.find(3).unwrap();
        assert_eq!(root, ms.find(1).unwrap());
        assert_eq!(root, ms.find(2).unwrap());
    }

    #[test]
    fn counters_track_activity() {
        let mut ms = MergeSets::new(4);
        ms.merge(1, 2).unwrap();
        assert_eq!(1, ms.merges.read());
        ms.find(1).unwrap();
        assert!(ms.finds.read() >= 1);
    }
}

#[cfg(test)]
mod stress {
    use super::*;
    use guacamole::{FromGuacamole, Guacamole};

    fn reference_find(parent: &[usize], mut i: usize) -> usize {
        while parent[i] != i {
            i = parent[i];
        }
        i
    }

    fn stress(seed: u64) {
        let n = 24;
        let mut ms = MergeSets::new(n);
        let mut reference: Vec<usize> = (0..=n).collect();
        let mut guac = Guacamole::new(seed);
        for _ in 0..500 {
            let a = (u8::from_guacamole(&mut (), &mut guac) as usize % n) + 1;
            let b = (u8::from_guacamole(&mut (), &mut guac) as usize % n) + 1;
            let ra = ms.find(a).unwrap();
            let rb = ms.find(b).unwrap();
            if ra != rb {
                ms.merge(ra, rb).unwrap();
                let (old, new) = if reference_find(&reference, ra) < reference_find(&reference, rb) {
                    (rb, ra)
                } else {
                    (ra, rb)
                };
                let old_root = reference_find(&reference, old);
                let new_root = reference_find(&reference, new);
                reference[old_root] = new_root;
            }
        }
        for i in 1..=n {
            for j in 1..=n {
                let same_impl = ms.find(i).unwrap() == ms.find(j).unwrap();
                let same_ref = reference_find(&reference, i) == reference_find(&reference, j);
                assert_eq!(same_ref, same_impl, "i={i} j={j}");
            }
        }
    }

    #[test]
    fn guacamole7362819450738291056() {
        stress(7362819450738291056)
    }

    #[test]
    fn guacamole2837461059283746105() {
        stress(2837461059283746105)
    }
}
