//! `EdgeGroupColors`: a proper coloring of an [`edgegroups::EdgeGroups`]'s edges, one color per
//! edge, drawn from a per-group palette bound at the edges' shared hub.
//!
//! Mirrors the same index-based idiom as the rest of this workspace: edges are partitioned by
//! their current color (including the `0` = uncolored bucket) with a [`ixlistset::ListSet`], and
//! each hub owns its own `ListSet` over the color domain `1..=C` split into an "unused" sublist
//! plus one sublist per group currently holding some of that hub's colors. `colorFromPalettes`,
//! the matching-driven bulk coloring pass, is not part of this crate: it consumes these
//! primitives together with an external matcher, the same way `EdgeGroups` consumes a graph it
//! does not own.

use edgegroups::{EdgeGroups, Graph};
use gerror::{require, GraphError, Result};
use gtext::tokenize;
use ixlistset::ListSet;

fn format_group_letter(g: usize, n_g: usize) -> String {
    if n_g <= 26 && g <= 26 {
        ((b'A' + (g - 1) as u8) as char).to_string()
    } else {
        g.to_string()
    }
}

fn parse_group_letter(tok: &str, n_g: usize) -> Option<usize> {
    if n_g <= 26 {
        let mut chars = tok.chars();
        let c = chars.next()?;
        if chars.next().is_none() && c.is_ascii_uppercase() {
            return Some((c as usize) - (b'A' as usize) + 1);
        }
    }
    tok.parse::<usize>().ok()
}

pub struct EdgeGroupColors {
    n_i: usize,
    n_g: usize,
    max_c: usize,
    n_vertices: usize,
    /// `color[e]`, `0` means uncolored.
    color: Vec<usize>,
    /// Edges partitioned by current color (color `0`'s bucket included).
    by_color: ListSet,
    /// `color_head[c]`: current first edge colored `c`, `0` if none.
    color_head: Vec<usize>,
    /// `owner[u][c]`: the group that holds `c` in its palette at hub `u`, `0` if none.
    owner: Vec<Vec<usize>>,
    /// `usage[vertex][c]`: count of edges incident to `vertex` currently colored `c`.
    usage: Vec<Vec<usize>>,
    /// One `ListSet` per hub over the color domain `1..=max_c`.
    palette: Vec<ListSet>,
    /// Per hub, the first item of the sublist of colors not yet bound to any group there.
    unused_head: Vec<usize>,
    /// Per group, the first item of its bound-color sublist within its hub's `ListSet`.
    first_color: Vec<usize>,
    palette_size: Vec<usize>,
    max_color: usize,
    number_colored: usize,
}

impl EdgeGroupColors {
    /// `n_i` inputs, up to `n_g` groups, a color budget of `max_c`, `m` edges in the graph, and
    /// `n_vertices` total graph vertices (for the `usage` table's domain).
    pub fn new(n_i: usize, n_g: usize, max_c: usize, m: usize, n_vertices: usize) -> Self {
        let mut palette = Vec::with_capacity(n_i + 1);
        let mut unused_head = vec![0; n_i + 1];
        palette.push(ListSet::new(0));
        for u in 1..=n_i {
            let mut ls = ListSet::new(max_c);
            let mut head = if max_c > 0 { 1 } else { 0 };
            for c in 2..=max_c {
                head = ls.join(head, c).unwrap();
            }
            unused_head[u] = head;
            palette.push(ls);
        }
        let mut by_color = ListSet::new(m);
        let mut head0 = if m > 0 { 1 } else { 0 };
        for e in 2..=m {
            head0 = by_color.join(head0, e).unwrap();
        }
        let mut color_head = vec![0; max_c + 1];
        color_head[0] = head0;
        EdgeGroupColors {
            n_i,
            n_g,
            max_c,
            n_vertices,
            color: vec![0; m + 1],
            by_color,
            color_head,
            owner: vec![vec![0; max_c + 1]; n_i + 1],
            usage: vec![vec![0; max_c + 1]; n_vertices + 1],
            palette,
            unused_head,
            first_color: vec![0; n_g + 1],
            palette_size: vec![0; n_g + 1],
            max_color: 0,
            number_colored: 0,
        }
    }

    fn valid_group(&self, g: usize) -> bool {
        g >= 1 && g <= self.n_g
    }

    fn valid_edge(&self, e: usize) -> bool {
        e >= 1 && e < self.color.len()
    }

    fn valid_color(&self, c: usize) -> bool {
        c >= 1 && c <= self.max_c
    }

    fn valid_hub(&self, u: usize) -> bool {
        u >= 1 && u <= self.n_i
    }

    pub fn max_color(&self) -> usize {
        self.max_color
    }

    /// The fixed size of the color domain `1..=C` this instance was constructed with.
    pub fn color_budget(&self) -> usize {
        self.max_c
    }

    pub fn number_colored(&self) -> usize {
        self.number_colored
    }

    pub fn color_of(&self, e: usize) -> Result<usize> {
        require!(self.valid_edge(e), "color_of: {e} is out of range");
        Ok(self.color[e])
    }

    /// Edges currently colored `c` (`c = 0` for the uncolored bucket), in list order.
    pub fn edges_colored(&self, c: usize) -> Result<Vec<usize>> {
        require!(c <= self.max_c, "edges_colored: {c} is out of range");
        Ok(if self.color_head[c] == 0 {
            Vec::new()
        } else {
            self.by_color.items(self.color_head[c])
        })
    }

    /// The colors currently bound to `g`'s palette, in list order.
    pub fn palette(&self, g: usize) -> Result<Vec<usize>> {
        require!(self.valid_group(g), "palette: {g} is out of range");
        if self.first_color[g] == 0 {
            return Ok(Vec::new());
        }
        let u = self.hub_of_group(g)?;
        Ok(self.palette[u].items(self.first_color[g]))
    }

    pub fn palette_size(&self, g: usize) -> Result<usize> {
        require!(self.valid_group(g), "palette_size: {g} is out of range");
        Ok(self.palette_size[g])
    }

    /// The group that owns color `c` at hub `u`, or `0` if none does.
    pub fn owner(&self, u: usize, c: usize) -> usize {
        if self.valid_hub(u) && c <= self.max_c {
            self.owner[u][c]
        } else {
            0
        }
    }

    /// The number of edges incident to `vertex` currently colored `c`.
    pub fn usage(&self, vertex: usize, c: usize) -> usize {
        if vertex <= self.n_vertices && c <= self.max_c {
            self.usage[vertex][c]
        } else {
            0
        }
    }

    /// Linear scan over hubs to find which one's `ListSet` holds `g`'s bound-color sublist.
    /// `palette(g)` is the only caller that needs this; everywhere else an `EdgeGroups` handle
    /// is already in scope and `eg.hub(g)` is the cheaper way to get the same answer.
    fn hub_of_group(&self, g: usize) -> Result<usize> {
        require!(self.valid_group(g), "hub_of_group: {g} is out of range");
        for u in 1..=self.n_i {
            if self.first_color[g] != 0 && self.palette[u].find_list(self.first_color[g]) == self.first_color[g] {
                return Ok(u);
            }
        }
        Err(GraphError::contract_violation(format!(
            "hub_of_group: {g} has no bound colors; hub is unknown without an EdgeGroups handle"
        )))
    }

    /// Add `c` to `g`'s palette. No-op if already present. Preconditions: no other group at
    /// `hub(g)` owns `c`, and no edge incident to `hub(g)` currently carries `c`.
    pub fn bind(&mut self, c: usize, g: usize, eg: &EdgeGroups) -> Result<()> {
        require!(self.valid_color(c), "bind: {c} is out of range");
        require!(self.valid_group(g), "bind: {g} is out of range");
        let u = eg.hub(g)?;
        if self.owner[u][c] == g {
            return Ok(());
        }
        require!(self.owner[u][c] == 0, "bind: color {c} is already owned by another group at this hub");
        require!(self.usage[u][c] == 0, "bind: color {c} is already in use at this hub");
        self.unused_head[u] = self.palette[u].delete(c, self.unused_head[u])?;
        self.first_color[g] = if self.first_color[g] == 0 {
            self.palette[u].singleton(c)?
        } else {
            self.palette[u].join(self.first_color[g], c)?
        };
        self.palette_size[g] += 1;
        self.owner[u][c] = g;
        self.max_color = self.max_color.max(c);
        Ok(())
    }

    /// Remove `c` from `g`'s palette. Requires no edge of `g` to currently carry `c`.
    pub fn release(&mut self, c: usize, g: usize, eg: &EdgeGroups) -> Result<()> {
        require!(self.valid_group(g), "release: {g} is out of range");
        let u = eg.hub(g)?;
        require!(self.owner[u][c] == g, "release: {c} is not owned by group {g}");
        for e in eg.edges(g)? {
            require!(self.color[e] != c, "release: edge {e} still carries color {c}");
        }
        self.first_color[g] = self.palette[u].delete(c, self.first_color[g])?;
        self.palette_size[g] -= 1;
        self.owner[u][c] = 0;
        self.unused_head[u] = if self.unused_head[u] == 0 {
            self.palette[u].singleton(c)?
        } else {
            self.palette[u].join(self.unused_head[u], c)?
        };
        Ok(())
    }

    /// True iff `c` can legally be assigned to `e` right now (U8's availability predicate). `0`
    /// is always available.
    pub fn available(&self, e: usize, c: usize, eg: &EdgeGroups, graph: &Graph) -> Result<bool> {
        if c == 0 {
            return Ok(true);
        }
        let g = eg.group_of(e)?;
        require!(g != 0, "available: {e} does not belong to a group");
        let u = graph.input(e)?;
        let v = graph.output(e)?;
        let owner = self.owner(u, c);
        Ok(self.usage(v, c) == 0 && (owner == 0 || owner == g))
    }

    /// Assign color `c` to `e` (`0` clears it). If `c` is not yet owned at `e`'s hub, binds it
    /// to `e`'s group first as a convenience — a deliberate relaxation of a stricter contract
    /// that would require the caller to `bind` explicitly, kept because it matches how single-
    /// edge colorings are built up incrementally in practice, and documented here rather than
    /// silently assumed.
    pub fn color(&mut self, e: usize, c: usize, eg: &EdgeGroups, graph: &Graph) -> Result<()> {
        require!(self.valid_edge(e), "color: {e} is out of range");
        let g = eg.group_of(e)?;
        require!(g != 0, "color: {e} does not belong to a group");
        let u = graph.input(e)?;
        if c != 0 && self.owner(u, c) == 0 {
            self.bind(c, g, eg)?;
        }
        require!(self.available(e, c, eg, graph)?, "color: {c} is not available for edge {e}");
        let v = graph.output(e)?;
        let old = self.color[e];
        self.color_head[old] = self.by_color.delete(e, self.color_head[old])?;
        if old != 0 {
            self.usage[u][old] -= 1;
            self.usage[v][old] -= 1;
            self.number_colored -= 1;
        }
        self.color[e] = c;
        self.color_head[c] = if self.color_head[c] == 0 {
            self.by_color.singleton(e)?
        } else {
            self.by_color.join(self.color_head[c], e)?
        };
        if c != 0 {
            self.usage[u][c] += 1;
            self.usage[v][c] += 1;
            self.number_colored += 1;
        }
        Ok(())
    }

    /// Equivalent to `color(e, 0, ...)`.
    pub fn clear_edge(&mut self, e: usize, eg: &EdgeGroups, graph: &Graph) -> Result<()> {
        self.color(e, 0, eg, graph)
    }

    /// True iff every edge belonging to some group is colored.
    pub fn complete(&self, eg: &EdgeGroups) -> Result<bool> {
        for e in 1..self.color.len() {
            if eg.group_of(e)? != 0 && self.color[e] == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Restore every edge to color `0` and every palette to empty.
    pub fn reset(&mut self, eg: &EdgeGroups) -> Result<()> {
        // Edges must give up their colors before `release` will let a palette give up those
        // colors: `release` enforces that no edge of the group still carries the color being
        // released.
        for e in 1..self.color.len() {
            if self.color[e] != 0 {
                let old = self.color[e];
                self.color_head[old] = self.by_color.delete(e, self.color_head[old])?;
                self.color[e] = 0;
                self.color_head[0] = if self.color_head[0] == 0 {
                    self.by_color.singleton(e)?
                } else {
                    self.by_color.join(self.color_head[0], e)?
                };
            }
        }
        for g in 1..=self.n_g {
            if self.palette_size[g] > 0 {
                for c in self.palette(g)? {
                    self.release(c, g, eg)?;
                }
            }
        }
        self.usage.iter_mut().for_each(|row| row.iter_mut().for_each(|u| *u = 0));
        self.max_color = 0;
        self.number_colored = 0;
        Ok(())
    }

    /// Equality per the contract: the two underlying groupings must match, and every group's
    /// palette must hold the same colors, order irrelevant. Implemented as a method rather than
    /// `std::cmp::PartialEq` since this type, like the rest of its operations, does not own an
    /// `EdgeGroups` handle — the caller already has one on hand for every other call here.
    pub fn same_coloring_state(&self, eg: &EdgeGroups, other: &Self, other_eg: &EdgeGroups) -> Result<bool> {
        if eg != other_eg || self.n_g != other.n_g {
            return Ok(false);
        }
        for g in 1..=self.n_g {
            let mut a = self.palette(g)?;
            let mut b = other.palette(g)?;
            a.sort_unstable();
            b.sort_unstable();
            if a != b {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Canonical form: `"{" (color "[" (input "(" (output | ".")* ")" group-letter)* "]")* "}"`.
    /// Only colors in actual use appear. Within a color's block, one entry is written per group
    /// that has at least one edge in that color: every output of the group is listed in order,
    /// written as itself where that edge currently carries this color and as `.` where it
    /// doesn't, so the group's full shape stays visible even where the color is partial.
    pub fn to_canonical_string(&self, eg: &EdgeGroups, graph: &Graph) -> Result<String> {
        let mut color_parts = Vec::new();
        for c in 1..=self.max_c {
            if self.color_head[c] == 0 {
                continue;
            }
            let mut entries = Vec::new();
            for u in 1..=self.n_i {
                for g in eg.groups_at(u)? {
                    let edges = eg.edges(g)?;
                    if !edges.iter().any(|&e| self.color[e] == c) {
                        continue;
                    }
                    let toks: Vec<String> = edges
                        .iter()
                        .map(|&e| {
                            if self.color[e] == c {
                                graph
                                    .output(e)
                                    .map(|v| gtext::format_item(v - eg.n_inputs(), graph.n_outputs()))
                            } else {
                                Ok(".".to_string())
                            }
                        })
                        .collect::<Result<_>>()?;
                    entries.push(format!(
                        "{}({}){}",
                        gtext::format_item(u, eg.n_inputs()),
                        toks.join(" "),
                        format_group_letter(g, self.n_g)
                    ));
                }
            }
            color_parts.push(format!("{}[{}]", c, entries.join(" ")));
        }
        Ok(format!("{{{}}}", color_parts.join(" ")))
    }

    /// Parse the canonical form against an already-built `EdgeGroups`/`Graph` pair, applying the
    /// colors it describes. Groups not mentioned stay uncolored; `self` should be freshly reset.
    pub fn from_canonical_string(&mut self, s: &str, eg: &EdgeGroups, graph: &Graph) -> Result<()> {
        let toks = tokenize(s);
        let mut pos = 0;
        let expect = |toks: &[String], pos: &mut usize, tok: &str| -> Result<()> {
            if toks.get(*pos).map(String::as_str) != Some(tok) {
                return Err(GraphError::parse_failure(format!("EdgeGroupColors: expected {tok:?}")));
            }
            *pos += 1;
            Ok(())
        };
        expect(&toks, &mut pos, "{")?;
        while toks.get(pos).map(String::as_str) != Some("}") {
            let c_tok = toks
                .get(pos)
                .ok_or_else(|| GraphError::parse_failure("EdgeGroupColors: unexpected end of input"))?;
            let c: usize = c_tok
                .parse()
                .map_err(|_| GraphError::parse_failure(format!("EdgeGroupColors: bad color {c_tok:?}")))?;
            pos += 1;
            expect(&toks, &mut pos, "[")?;
            while toks.get(pos).map(String::as_str) != Some("]") {
                let u_tok = toks
                    .get(pos)
                    .ok_or_else(|| GraphError::parse_failure("EdgeGroupColors: unexpected end of input"))?;
                let u = gtext::parse_item(u_tok, self.n_i)
                    .ok_or_else(|| GraphError::parse_failure(format!("EdgeGroupColors: bad input {u_tok:?}")))?;
                pos += 1;
                expect(&toks, &mut pos, "(")?;
                let mut edges_in_order = Vec::new();
                while toks.get(pos).map(String::as_str) != Some(")") {
                    let tok = toks
                        .get(pos)
                        .ok_or_else(|| GraphError::parse_failure("EdgeGroupColors: unexpected end of input"))?
                        .clone();
                    edges_in_order.push(tok);
                    pos += 1;
                }
                pos += 1;
                let gid_tok = toks
                    .get(pos)
                    .ok_or_else(|| GraphError::parse_failure("EdgeGroupColors: missing group id"))?;
                let g = parse_group_letter(gid_tok, self.n_g)
                    .ok_or_else(|| GraphError::parse_failure(format!("EdgeGroupColors: bad group id {gid_tok:?}")))?;
                pos += 1;
                let edges = eg.edges(g)?;
                require!(
                    edges.len() == edges_in_order.len(),
                    "EdgeGroupColors: group {g} at input {u} has the wrong number of outputs"
                );
                for (&e, tok) in edges.iter().zip(edges_in_order.iter()) {
                    if tok != "." {
                        self.color(e, c, eg, graph)?;
                    }
                }
            }
            pos += 1;
        }
        pos += 1;
        if pos != toks.len() {
            return Err(GraphError::parse_failure("EdgeGroupColors: trailing tokens"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for EdgeGroupColors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EdgeGroupColors(n_g={}, max_color={}, number_colored={})",
            self.n_g, self.max_color, self.number_colored
        )
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////


#[cfg(test)]
mod stress {
    use super::*;
    use guacamole::{FromGuacamole, Guacamole};

    fn stress(seed: u64) {
        let n_i = 3;
        let n_o = 6;
        let mut edges = Vec::new();
        for u in 1..=n_i {
            for v in 1..=n_o {
                edges.push((u, v));
            }
        }
        let graph = Graph::new(n_i, n_o, &edges).unwrap();
        let mut eg = EdgeGroups::new(n_i, n_i * n_o, edges.len());
        for e in 1..=edges.len() {
            eg.add(e, 0, &graph).unwrap();
        }
        let max_c = 4;
        let mut colors = EdgeGroupColors::new(n_i, eg.n_groups(), max_c, edges.len(), graph.n());
        let mut guac = Guacamole::new(seed);
        for e in 1..=edges.len() {
            let c = (u8::from_guacamole(&mut (), &mut guac) as usize % max_c) + 1;
            let _ = colors.color(e, c, &eg, &graph); // rejection by U8 is expected and fine.
        }
        for v in (n_i + 1)..=(n_i + n_o) {
            for c in 1..=max_c {
                assert!(colors.usage(v, c) <= 1);
            }
        }
        for u in 1..=n_i {
            for c in 1..=max_c {
                let owner = colors.owner(u, c);
                if owner != 0 {
                    for g2 in 1..=eg.n_groups() {
                        if g2 != owner && eg.hub(g2).unwrap_or(0) == u {
                            assert_ne!(owner, colors.owner(u, c));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn guacamole3847561920384756192() {
        stress(3847561920384756192)
    }

    #[test]
    fn guacamole9203847561920384756() {
        stress(9203847561920384756)
    }
}
