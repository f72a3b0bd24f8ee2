//! The bipartite graph `G` that `EdgeGroups` groups edges over. Inputs are
//! `1..n_i`; outputs are `n_i+1..n_i+n_o`, per the glossary's global vertex numbering.
//!
//! `EdgeGroups` observes this graph but does not own it; in place of a
//! stored borrow with a lifetime threaded through every container, operations that can delete an
//! edge (`EdgeGroups::merge`) take `&mut Graph` explicitly, passing the borrowed collaborator into
//! the call rather than storing it.

use gerror::{require, Result};

pub struct Graph {
    n_i: usize,
    n_o: usize,
    /// `input[e] == 0` marks `e` as deleted or never allocated.
    input: Vec<usize>,
    output: Vec<usize>,
}

impl Graph {
    /// `edges[k] = (u, v)` with `u` in `1..=n_i` and `v` in `1..=n_o` (local output index, offset
    /// to the global `n_i+v` internally). Edge ids are `1..=edges.len()`.
    pub fn new(n_i: usize, n_o: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut input = vec![0; edges.len() + 1];
        let mut output = vec![0; edges.len() + 1];
        for (k, &(u, v)) in edges.iter().enumerate() {
            require!(u >= 1 && u <= n_i, "Graph::new: edge {k} has input {u} out of range");
            require!(v >= 1 && v <= n_o, "Graph::new: edge {k} has output {v} out of range");
            input[k + 1] = u;
            output[k + 1] = n_i + v;
        }
        Ok(Graph { n_i, n_o, input, output })
    }

    pub fn n_inputs(&self) -> usize {
        self.n_i
    }

    pub fn n_outputs(&self) -> usize {
        self.n_o
    }

    pub fn n(&self) -> usize {
        self.n_i + self.n_o
    }

    pub fn m(&self) -> usize {
        self.input.len() - 1
    }

    fn valid(&self, e: usize) -> bool {
        e >= 1 && e < self.input.len()
    }

    pub fn exists(&self, e: usize) -> bool {
        self.valid(e) && self.input[e] != 0
    }

    pub fn input(&self, e: usize) -> Result<usize> {
        require!(self.exists(e), "input: {e} is not a live edge");
        Ok(self.input[e])
    }

    pub fn output(&self, e: usize) -> Result<usize> {
        require!(self.exists(e), "output: {e} is not a live edge");
        Ok(self.output[e])
    }

    /// Tombstone `e`: it is no longer a member of the graph. Idempotent.
    pub fn remove_edge(&mut self, e: usize) {
        if self.valid(e) {
            self.input[e] = 0;
            self.output[e] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_use_global_numbering() {
        let g = Graph::new(2, 3, &[(1, 1), (1, 2), (2, 3)]).unwrap();
        assert_eq!(1, g.input(1).unwrap());
        assert_eq!(3, g.output(1).unwrap());
        assert_eq!(5, g.output(3).unwrap());
    }

    #[test]
    fn removed_edge_is_no_longer_live() {
        let mut g = Graph::new(1, 1, &[(1, 1)]).unwrap();
        g.remove_edge(1);
        assert!(!g.exists(1));
        assert!(g.input(1).is_err());
    }
}
