//! `EdgeGroups`: a partition of a bipartite graph's edges into groups anchored at an input
//! vertex, each touching at most one edge per output. Built from the same containers
//! as the rest of the workspace: a [`ixlistpair::ListPair`] separates in-use from free group ids,
//! one [`ixlistset::ListSet`] partitions edges by group, and a second partitions groups by hub.

mod graph;

pub use graph::Graph;

use gerror::{require, GraphError, Result};
use gtext::tokenize;
use ixlistpair::ListPair;
use ixlistset::ListSet;

fn format_group_id(g: usize, n_g: usize) -> String {
    if g == 0 {
        "-".to_string()
    } else if n_g <= 26 && g <= 26 {
        ((b'A' + (g - 1) as u8) as char).to_string()
    } else {
        g.to_string()
    }
}

fn parse_group_id(tok: &str, n_g: usize) -> Option<usize> {
    if tok == "-" {
        return Some(0);
    }
    if n_g <= 26 {
        let mut chars = tok.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if c.is_ascii_uppercase() {
            return Some((c as usize) - (b'A' as usize) + 1);
        }
    }
    tok.parse::<usize>().ok()
}

///////////////////////////////////////////////// EdgeGroups /////////////////////////////////////////

pub struct EdgeGroups {
    n_i: usize,
    n_g: usize,
    /// `group[e]`, `0` if `e` is ungrouped.
    group: Vec<usize>,
    fanout: Vec<usize>,
    hub: Vec<usize>,
    /// Current first edge of each group's edge list, `0` if the group is free or empty.
    group_head: Vec<usize>,
    /// Current first group of each hub's group list, `0` if the hub has none.
    hub_head: Vec<usize>,
    ids: ListPair,
    edges_of_group: ListSet,
    groups_by_hub: ListSet,
}

impl EdgeGroups {
    /// `n_i` inputs, up to `n_g` simultaneous groups, `m` edges in the graph this will be used
    /// with (edge ids are shared with that graph's domain).
    pub fn new(n_i: usize, n_g: usize, m: usize) -> Self {
        EdgeGroups {
            n_i,
            n_g,
            group: vec![0; m + 1],
            fanout: vec![0; n_g + 1],
            hub: vec![0; n_g + 1],
            group_head: vec![0; n_g + 1],
            hub_head: vec![0; n_i + 1],
            ids: ListPair::new(n_g),
            edges_of_group: ListSet::new(m),
            groups_by_hub: ListSet::new(n_g),
        }
    }

    pub fn n_inputs(&self) -> usize {
        self.n_i
    }

    pub fn n_groups(&self) -> usize {
        self.n_g
    }

    fn valid_group(&self, g: usize) -> bool {
        g >= 1 && g <= self.n_g
    }

    pub fn group_of(&self, e: usize) -> Result<usize> {
        require!(e >= 1 && e < self.group.len(), "group: {e} is out of range");
        Ok(self.group[e])
    }

    pub fn fanout(&self, g: usize) -> Result<usize> {
        require!(self.valid_group(g), "fanout: {g} is out of range");
        Ok(self.fanout[g])
    }

    pub fn hub(&self, g: usize) -> Result<usize> {
        require!(self.valid_group(g), "hub: {g} is out of range");
        require!(self.hub[g] != 0, "hub: {g} is not in use");
        Ok(self.hub[g])
    }

    /// Edge ids currently in group `g`, in list order.
    pub fn edges(&self, g: usize) -> Result<Vec<usize>> {
        require!(self.valid_group(g), "edges: {g} is out of range");
        Ok(if self.group_head[g] == 0 {
            Vec::new()
        } else {
            self.edges_of_group.items(self.group_head[g])
        })
    }

    /// Group ids currently anchored at input `u`, in list order.
    pub fn groups_at(&self, u: usize) -> Result<Vec<usize>> {
        require!(u >= 1 && u <= self.n_i, "groups_at: {u} is out of range");
        Ok(if self.hub_head[u] == 0 {
            Vec::new()
        } else {
            self.groups_by_hub.items(self.hub_head[u])
        })
    }

    /// The edge in group `g` whose output is `v`, or `0` if none. O(fanout(g)).
    pub fn find_edge(&self, v: usize, g: usize, graph: &Graph) -> Result<usize> {
        require!(self.valid_group(g), "find_edge: {g} is out of range");
        for e in self.edges(g)? {
            if graph.output(e)? == v {
                return Ok(e);
            }
        }
        Ok(0)
    }

    /// Add edge `e` to group `g` (`0` allocates a fresh group). Returns the group id used.
    pub fn add(&mut self, e: usize, g: usize, graph: &Graph) -> Result<usize> {
        require!(graph.exists(e), "add: {e} is not a live edge");
        require!(self.group[e] == 0, "add: {e} already belongs to a group");
        let u = graph.input(e)?;
        let gid = if g == 0 {
            let free = self.ids.first(2)?;
            require!(free != 0, "add: no free group ids remain");
            self.ids.swap(free, 0)?;
            self.hub[free] = u;
            self.fanout[free] = 0;
            self.group_head[free] = 0;
            free
        } else {
            require!(self.valid_group(g), "add: {g} is out of range");
            if self.ids.in_list(g, 2)? {
                self.ids.swap(g, 0)?;
                self.hub[g] = u;
                self.fanout[g] = 0;
                self.group_head[g] = 0;
            } else {
                require!(self.hub[g] == u, "add: {e}'s input does not match group {g}'s hub");
                require!(
                    self.find_edge(graph.output(e)?, g, graph)? == 0,
                    "add: group {g} already has an edge to this output"
                );
            }
            g
        };
        self.group[e] = gid;
        self.group_head[gid] = if self.group_head[gid] == 0 {
            self.edges_of_group.singleton(e)?
        } else {
            self.edges_of_group.join(self.group_head[gid], e)?
        };
        self.fanout[gid] += 1;
        if self.fanout[gid] == 1 {
            self.hub_head[u] = if self.hub_head[u] == 0 {
                self.groups_by_hub.singleton(gid)?
            } else {
                self.groups_by_hub.join(self.hub_head[u], gid)?
            };
        }
        Ok(gid)
    }

    /// Remove `e` from its group, freeing the group id if it becomes empty.
    pub fn delete(&mut self, e: usize) -> Result<()> {
        let g = self.group[e];
        require!(g != 0, "delete: {e} does not belong to a group");
        self.group_head[g] = self.edges_of_group.delete(e, self.group_head[g])?;
        self.group[e] = 0;
        self.fanout[g] -= 1;
        if self.fanout[g] == 0 {
            let u = self.hub[g];
            self.hub_head[u] = self.groups_by_hub.delete(g, self.hub_head[u])?;
            self.hub[g] = 0;
            self.ids.swap(g, 0)?;
        }
        Ok(())
    }

    /// Merge `g2` into `g1`. Both must share a hub. Any edge of `g2` whose output already
    /// appears in `g1` is deleted from `graph` outright; the rest move into `g1`. `g2` is
    /// retired. O(fanout(g1) + fanout(g2)) amortized, plus an O(fanout(g1)) scan per surviving
    /// edge of `g2` to detect output collisions.
    pub fn merge(&mut self, g1: usize, g2: usize, graph: &mut Graph) -> Result<()> {
        require!(
            self.valid_group(g1) && self.ids.in_list(g1, 1)?,
            "merge: {g1} is not an in-use group"
        );
        require!(
            self.valid_group(g2) && self.ids.in_list(g2, 1)?,
            "merge: {g2} is not an in-use group"
        );
        require!(self.hub[g1] == self.hub[g2], "merge: {g1} and {g2} do not share a hub");
        if g1 == g2 {
            return Ok(());
        }
        let u = self.hub[g2];
        let edges = self.edges(g2)?;
        for e in edges {
            let v = graph.output(e)?;
            self.group_head[g2] = self.edges_of_group.delete(e, self.group_head[g2])?;
            self.fanout[g2] -= 1;
            self.group[e] = 0;
            if self.find_edge(v, g1, graph)? != 0 {
                graph.remove_edge(e);
            } else {
                self.group[e] = g1;
                self.group_head[g1] = if self.group_head[g1] == 0 {
                    self.edges_of_group.singleton(e)?
                } else {
                    self.edges_of_group.join(self.group_head[g1], e)?
                };
                self.fanout[g1] += 1;
            }
        }
        self.hub_head[u] = self.groups_by_hub.delete(g2, self.hub_head[u])?;
        self.hub[g2] = 0;
        self.ids.swap(g2, 0)?;
        Ok(())
    }

    /// Reorder the groups at `u` by decreasing `fanout`.
    pub fn sort_groups(&mut self, u: usize) -> Result<()> {
        require!(u >= 1 && u <= self.n_i, "sort_groups: {u} is out of range");
        if self.hub_head[u] != 0 {
            let fanout = &self.fanout;
            self.hub_head[u] = self
                .groups_by_hub
                .sort_list(self.hub_head[u], |a, b| fanout[b].cmp(&fanout[a]))?;
        }
        Ok(())
    }

    pub fn sort_all_groups(&mut self) -> Result<()> {
        for u in 1..=self.n_i {
            self.sort_groups(u)?;
        }
        Ok(())
    }

    /// Canonical form: `"{" (input "[" ("(" outputs ")" group-letter)* "]")* "}"`.
    pub fn to_canonical_string(&self, graph: &Graph) -> Result<String> {
        let mut parts = Vec::new();
        for u in 1..=self.n_i {
            if self.hub_head[u] == 0 {
                continue;
            }
            let mut group_strs = Vec::new();
            for g in self.groups_at(u)? {
                let outs: Vec<String> = self
                    .edges(g)?
                    .into_iter()
                    .map(|e| graph.output(e).map(|v| gtext::format_item(v - self.n_i, graph.n_outputs())))
                    .collect::<Result<_>>()?;
                group_strs.push(format!("({}){}", outs.join(" "), format_group_id(g, self.n_g)));
            }
            parts.push(format!("{}[{}]", gtext::format_item(u, self.n_i), group_strs.join(" ")));
        }
        Ok(format!("{{{}}}", parts.join(" ")))
    }

    /// Parse the canonical form, rebuilding both the underlying graph and the grouping.
    pub fn from_canonical_string(
        s: &str,
        n_i: usize,
        n_o: usize,
        n_g: usize,
    ) -> Result<(Graph, EdgeGroups)> {
        let toks = tokenize(s);
        let mut pos = 0;
        let expect = |toks: &[String], pos: &mut usize, tok: &str| -> Result<()> {
            if toks.get(*pos).map(String::as_str) != Some(tok) {
                return Err(GraphError::parse_failure(format!("EdgeGroups: expected {tok:?}")));
            }
            *pos += 1;
            Ok(())
        };
        expect(&toks, &mut pos, "{")?;
        let mut edges: Vec<(usize, usize)> = Vec::new();
        let mut assignments: Vec<(usize, usize)> = Vec::new();
        while toks.get(pos).map(String::as_str) != Some("}") {
            let u_tok = toks
                .get(pos)
                .ok_or_else(|| GraphError::parse_failure("EdgeGroups: unexpected end of input"))?;
            let u = gtext::parse_item(u_tok, n_i)
                .ok_or_else(|| GraphError::parse_failure(format!("EdgeGroups: bad input {u_tok:?}")))?;
            if u == 0 || u > n_i {
                return Err(GraphError::parse_failure(format!("EdgeGroups: input {u} out of range")));
            }
            pos += 1;
            expect(&toks, &mut pos, "[")?;
            while toks.get(pos).map(String::as_str) != Some("]") {
                expect(&toks, &mut pos, "(")?;
                let mut outs = Vec::new();
                while toks.get(pos).map(String::as_str) != Some(")") {
                    let v_tok = toks
                        .get(pos)
                        .ok_or_else(|| GraphError::parse_failure("EdgeGroups: unexpected end of input"))?;
                    let v = gtext::parse_item(v_tok, n_o).ok_or_else(|| {
                        GraphError::parse_failure(format!("EdgeGroups: bad output {v_tok:?}"))
                    })?;
                    outs.push(v);
                    pos += 1;
                }
                pos += 1;
                let gid_tok = toks
                    .get(pos)
                    .ok_or_else(|| GraphError::parse_failure("EdgeGroups: missing group id"))?;
                let gid = parse_group_id(gid_tok, n_g)
                    .ok_or_else(|| GraphError::parse_failure(format!("EdgeGroups: bad group id {gid_tok:?}")))?;
                pos += 1;
                for v in outs {
                    edges.push((u, v));
                    assignments.push((edges.len(), gid));
                }
            }
            pos += 1;
        }
        pos += 1;
        if pos != toks.len() {
            return Err(GraphError::parse_failure("EdgeGroups: trailing tokens"));
        }
        let graph = Graph::new(n_i, n_o, &edges)?;
        let mut eg = EdgeGroups::new(n_i, n_g, edges.len());
        for (e, gid) in assignments {
            eg.add(e, gid, &graph)?;
        }
        Ok((graph, eg))
    }
}

impl PartialEq for EdgeGroups {
    /// Structural equality: same edge-to-group assignment and same group-to-hub assignment,
    /// group id for group id. Two partitions that group edges identically but under swapped
    /// group ids compare unequal; callers that need id-independent comparison should compare via
    /// `to_canonical_string` instead.
    fn eq(&self, other: &Self) -> bool {
        self.n_i == other.n_i && self.group == other.group && self.hub == other.hub
    }
}

impl Eq for EdgeGroups {}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fanout_and_edges_match_group_membership() {
        // input 1 has edges to outputs 4 and 5; input 2 has an edge to output 4.
        let graph = Graph::new(2, 5, &[(1, 4), (1, 5), (2, 4)]).unwrap();
        let mut eg = EdgeGroups::new(2, 4, 3);
        let g1 = eg.add(1, 0, &graph).unwrap();
        eg.add(2, g1, &graph).unwrap();
        let g2 = eg.add(3, 0, &graph).unwrap();
        assert_eq!(2, eg.fanout(g1).unwrap());
        assert_eq!(1, eg.fanout(g2).unwrap());
        assert_eq!(vec![1, 2], eg.edges(g1).unwrap());
    }

    #[test]
    fn add_rejects_mismatched_hub() {
        let graph = Graph::new(2, 2, &[(1, 1), (2, 2)]).unwrap();
        let mut eg = EdgeGroups::new(2, 2, 2);
        let g = eg.add(1, 0, &graph).unwrap();
        assert!(eg.add(2, g, &graph).unwrap_err().is_contract_violation());
    }

    #[test]
    fn add_rejects_duplicate_output_in_group() {
        let graph = Graph::new(1, 2, &[(1, 1), (1, 1)]).unwrap();
        let mut eg = EdgeGroups::new(1, 2, 2);
        let g = eg.add(1, 0, &graph).unwrap();
        assert!(eg.add(2, g, &graph).unwrap_err().is_contract_violation());
    }

    #[test]
    fn delete_returns_group_to_free_list_when_empty() {
        let graph = Graph::new(1, 1, &[(1, 1)]).unwrap();
        let mut eg = EdgeGroups::new(1, 1, 1);
        let g = eg.add(1, 0, &graph).unwrap();
        eg.delete(1).unwrap();
        assert_eq!(0, eg.fanout(g).unwrap());
        // the id is free again, so allocating fresh reuses it.
        let g2 = eg.add(1, 0, &graph).unwrap();
        assert_eq!(g, g2);
    }

    #[test]
    fn merge_drops_colliding_outputs_from_graph() {
        let mut graph = Graph::new(1, 2, &[(1, 1), (1, 2), (1, 1)]).unwrap();
        let mut eg = EdgeGroups::new(1, 2, 3);
        let g1 = eg.add(1, 0, &graph).unwrap(); // g1: output 1
        let g2 = eg.add(2, 0, &graph).unwrap(); // g2: output 2
        eg.add(3, g2, &graph).unwrap(); // g2: outputs 2, 1 (edge 3 -> output 1, collides with g1)
        eg.merge(g1, g2, &mut graph).unwrap();
        assert_eq!(vec![1, 2], eg.edges(g1).unwrap());
        assert!(!graph.exists(3));
        assert_eq!(0, eg.fanout(g2).unwrap());
    }

    #[test]
    fn merge_requires_shared_hub() {
        let mut graph = Graph::new(2, 2, &[(1, 1), (2, 2)]).unwrap();
        let mut eg = EdgeGroups::new(2, 2, 2);
        let g1 = eg.add(1, 0, &graph).unwrap();
        let g2 = eg.add(2, 0, &graph).unwrap();
        assert!(eg.merge(g1, g2, &mut graph).unwrap_err().is_contract_violation());
    }

    #[test]
    fn sort_groups_orders_by_decreasing_fanout() {
        let graph = Graph::new(1, 3, &[(1, 1), (1, 2), (1, 3)]).unwrap();
        let mut eg = EdgeGroups::new(1, 2, 3);
        let small = eg.add(1, 0, &graph).unwrap();
        let big = eg.add(2, 0, &graph).unwrap();
        eg.add(3, big, &graph).unwrap();
        eg.sort_groups(1).unwrap();
        assert_eq!(vec![big, small], eg.groups_at(1).unwrap());
    }

    #[test]
    fn round_trip() {
        let graph = Graph::new(2, 3, &[(1, 1), (1, 2), (1, 3), (2, 1)]).unwrap();
        let mut eg = EdgeGroups::new(2, 3, 4);
        let g1 = eg.add(1, 0, &graph).unwrap();
        eg.add(2, g1, &graph).unwrap();
        eg.add(3, g1, &graph).unwrap();
        eg.add(4, 0, &graph).unwrap();
        let s = eg.to_canonical_string(&graph).unwrap();
        let (graph2, eg2) = EdgeGroups::from_canonical_string(&s, 2, 3, 3).unwrap();
        assert_eq!(s, eg2.to_canonical_string(&graph2).unwrap());
    }
}
