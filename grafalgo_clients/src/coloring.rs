//! Edge-group coloring clients: heuristics that drive an `EdgeGroupColors` to a proper, complete
//! coloring. `EdgeGroups`/`EdgeGroupColors` provide every primitive these need
//! (`bind`/`color`/`available`/`palette`); this module only sequences calls to them.

use edgegroupcolors::EdgeGroupColors;
use edgegroups::{EdgeGroups, Graph};
use gerror::Result;
use guacamole::{FromGuacamole, Guacamole};

use crate::flow::MinCostFlowSolver;
use crate::matching::BipartiteMatcher;

fn ungrouped_or_colored(colors: &EdgeGroupColors, e: usize) -> bool {
    colors.color_of(e).map_or(true, |c| c != 0)
}

/// First-fit coloring bounded by `colors`'s fixed color budget: every group's edges in turn,
/// smallest available color. Gives up (returns `Ok(false)`) the moment an edge has no available
/// color rather than expanding the palette, which is what makes it "bounded".
pub fn greedy_bounded_coloring(eg: &EdgeGroups, colors: &mut EdgeGroupColors, graph: &Graph) -> Result<bool> {
    for g in 1..=eg.n_groups() {
        let edges = match eg.edges(g) {
            Ok(es) => es,
            Err(_) => continue,
        };
        for e in edges {
            if ungrouped_or_colored(colors, e) {
                continue;
            }
            if !first_fit(colors, eg, graph, e)? {
                return Ok(false);
            }
        }
    }
    colors.complete(eg)
}

/// Same first-fit rule as [`greedy_bounded_coloring`], but groups are processed in decreasing
/// fanout order first, the classic heuristic of coloring the highest-degree vertices first to
/// leave the most room for everything that follows.
pub fn chvatal_coloring(eg: &EdgeGroups, colors: &mut EdgeGroupColors, graph: &Graph) -> Result<bool> {
    let mut groups: Vec<usize> = (1..=eg.n_groups()).filter(|&g| eg.fanout(g).unwrap_or(0) > 0).collect();
    groups.sort_by_key(|&g| std::cmp::Reverse(eg.fanout(g).unwrap_or(0)));
    for g in groups {
        for e in eg.edges(g)? {
            if ungrouped_or_colored(colors, e) {
                continue;
            }
            if !first_fit(colors, eg, graph, e)? {
                return Ok(false);
            }
        }
    }
    colors.complete(eg)
}

/// Colors edges in layers: all groups' first edge, then all groups' second edge, and so on,
/// rather than exhausting one group before moving to the next. Spreads contention for any single
/// hub's colors across the whole pass instead of concentrating it group by group.
pub fn layered_coloring(eg: &EdgeGroups, colors: &mut EdgeGroupColors, graph: &Graph) -> Result<bool> {
    let max_fanout = (1..=eg.n_groups()).map(|g| eg.fanout(g).unwrap_or(0)).max().unwrap_or(0);
    for layer in 0..max_fanout {
        for g in 1..=eg.n_groups() {
            let edges = match eg.edges(g) {
                Ok(es) => es,
                Err(_) => continue,
            };
            if layer >= edges.len() {
                continue;
            }
            let e = edges[layer];
            if ungrouped_or_colored(colors, e) {
                continue;
            }
            if !first_fit(colors, eg, graph, e)? {
                return Ok(false);
            }
        }
    }
    colors.complete(eg)
}

fn first_fit(colors: &mut EdgeGroupColors, eg: &EdgeGroups, graph: &Graph, e: usize) -> Result<bool> {
    for c in 1..=colors.color_budget() {
        if colors.available(e, c, eg, graph)? {
            colors.color(e, c, eg, graph)?;
            return Ok(true);
        }
    }
    Ok(false)
}

/// Visits every uncolored edge and every candidate color in an order shuffled by `guac`,
/// assigning the first available color under that random order. Unlike the other heuristics here,
/// the randomization is itself the strategy, not an incidental tie-break.
pub fn random_palette_coloring(
    eg: &EdgeGroups,
    colors: &mut EdgeGroupColors,
    graph: &Graph,
    guac: &mut Guacamole,
) -> Result<bool> {
    let mut edges = Vec::new();
    for g in 1..=eg.n_groups() {
        if let Ok(es) = eg.edges(g) {
            edges.extend(es);
        }
    }
    shuffle(&mut edges, guac);

    let mut palette_order: Vec<usize> = (1..=colors.color_budget()).collect();
    for e in edges {
        if ungrouped_or_colored(colors, e) {
            continue;
        }
        shuffle(&mut palette_order, guac);
        let mut assigned = false;
        for &c in &palette_order {
            if colors.available(e, c, eg, graph)? {
                colors.color(e, c, eg, graph)?;
                assigned = true;
                break;
            }
        }
        if !assigned {
            return Ok(false);
        }
    }
    colors.complete(eg)
}

fn shuffle<T>(items: &mut [T], guac: &mut Guacamole) {
    for i in (1..items.len()).rev() {
        let j = (u64::from_guacamole(&mut (), guac) as usize) % (i + 1);
        items.swap(i, j);
    }
}

/// For each output in turn, constructs the bipartite "palette graph" of groups-at-that-output vs.
/// the union of their palette colors and asks `matcher` for a maximum matching. Colors the
/// output's edges from the match; an output with an unmatched group is left uncolored and counts
/// as a failure for that output, without otherwise disturbing earlier outputs' colors. Returns
/// overall success iff every output's edges were fully colored.
pub fn color_from_palettes(
    eg: &EdgeGroups,
    colors: &mut EdgeGroupColors,
    graph: &Graph,
    matcher: &dyn BipartiteMatcher,
    outputs: Option<&[usize]>,
) -> Result<bool> {
    let default_targets: Vec<usize>;
    let targets: &[usize] = match outputs {
        Some(vs) => vs,
        None => {
            let n_i = graph.n_inputs();
            default_targets = (n_i + 1..=n_i + graph.n_outputs()).collect();
            &default_targets
        }
    };
    let mut all_ok = true;
    for &v in targets {
        if !color_from_palettes_one(eg, colors, graph, matcher, v)? {
            all_ok = false;
        }
    }
    Ok(all_ok)
}

fn groups_at_output(eg: &EdgeGroups, graph: &Graph, v: usize) -> Result<Vec<(usize, usize)>> {
    let mut found = Vec::new();
    for g in 1..=eg.n_groups() {
        let edges = match eg.edges(g) {
            Ok(es) => es,
            Err(_) => continue,
        };
        for e in edges {
            if graph.output(e)? == v {
                found.push((g, e));
                break;
            }
        }
    }
    Ok(found)
}

fn color_from_palettes_one(
    eg: &EdgeGroups,
    colors: &mut EdgeGroupColors,
    graph: &Graph,
    matcher: &dyn BipartiteMatcher,
    v: usize,
) -> Result<bool> {
    let groups_and_edges = groups_at_output(eg, graph, v)?
        .into_iter()
        .filter(|&(_, e)| colors.color_of(e).unwrap_or(0) == 0)
        .collect::<Vec<_>>();
    if groups_and_edges.is_empty() {
        return Ok(true);
    }

    let mut palette_colors: Vec<usize> = Vec::new();
    let mut group_palettes = Vec::with_capacity(groups_and_edges.len());
    for &(g, _) in &groups_and_edges {
        let p = colors.palette(g)?;
        for &c in &p {
            if !palette_colors.contains(&c) {
                palette_colors.push(c);
            }
        }
        group_palettes.push(p);
    }
    if palette_colors.is_empty() {
        return Ok(false);
    }

    let mut bipartite_edges = Vec::new();
    for (gi, p) in group_palettes.iter().enumerate() {
        for (ci, &c) in palette_colors.iter().enumerate() {
            if p.contains(&c) {
                bipartite_edges.push((gi + 1, ci + 1));
            }
        }
    }
    let matching = matcher.max_matching(groups_and_edges.len(), palette_colors.len(), &bipartite_edges);
    if matching[1..].iter().any(|&r| r == 0) {
        return Ok(false);
    }
    for (gi, &(_, e)) in groups_and_edges.iter().enumerate() {
        let c = palette_colors[matching[gi + 1] - 1];
        colors.color(e, c, eg, graph)?;
    }
    Ok(true)
}

/// The hardest of the heuristics named here: for each output, grows every incident group's
/// palette just enough (via a min-cost-flow "palette-expansion" network, binary searching the
/// smallest usable color count) that [`color_from_palettes`] can then finish the output, and
/// stops the first time an output can't be completed within `colors`'s fixed color budget.
pub fn min_cost_flow_assisted_coloring(
    eg: &EdgeGroups,
    colors: &mut EdgeGroupColors,
    graph: &Graph,
    matcher: &dyn BipartiteMatcher,
    flow: &dyn MinCostFlowSolver,
) -> Result<bool> {
    let n_i = graph.n_inputs();
    for v in (n_i + 1)..=(n_i + graph.n_outputs()) {
        if !expand_palette_for_output(eg, colors, graph, flow, v)? {
            return Ok(false);
        }
        if !color_from_palettes_one(eg, colors, graph, matcher, v)? {
            return Ok(false);
        }
    }
    colors.complete(eg)
}

fn expand_palette_for_output(
    eg: &EdgeGroups,
    colors: &mut EdgeGroupColors,
    graph: &Graph,
    flow: &dyn MinCostFlowSolver,
    v: usize,
) -> Result<bool> {
    let groups: Vec<usize> = groups_at_output(eg, graph, v)?
        .into_iter()
        .filter(|&(_, e)| colors.color_of(e).unwrap_or(0) == 0)
        .map(|(g, _)| g)
        .collect();
    if groups.is_empty() {
        return Ok(true);
    }
    let hubs: Vec<usize> = groups.iter().map(|&g| eg.hub(g)).collect::<Result<_>>()?;

    let mut c_budget = groups.len();
    while c_budget <= colors.color_budget() {
        if try_expand_with_budget(colors, eg, &groups, &hubs, c_budget, flow)? {
            return Ok(true);
        }
        c_budget += 1;
    }
    Ok(false)
}

/// Network layout (1-indexed nodes): `1` = source, `2..=1+n_groups` = groups, the next `c_budget`
/// nodes = colors `1..=c_budget`, last node = sink.
fn try_expand_with_budget(
    colors: &mut EdgeGroupColors,
    eg: &EdgeGroups,
    groups: &[usize],
    hubs: &[usize],
    c_budget: usize,
    flow: &dyn MinCostFlowSolver,
) -> Result<bool> {
    let n_groups = groups.len();
    let source = 1;
    let color_node = |c: usize| 1 + n_groups + c;
    let sink = color_node(c_budget) + 1;
    let n = sink;

    let mut arcs = Vec::new();
    for gi in 0..n_groups {
        arcs.push((source, 2 + gi, 1usize, 0i64));
    }
    for (gi, (&g, &u)) in groups.iter().zip(hubs.iter()).enumerate() {
        for c in 1..=c_budget {
            let owner = colors.owner(u, c);
            if owner == 0 || owner == g {
                let cost = if owner == g { 0 } else { colors.palette_size(g)? as i64 };
                arcs.push((2 + gi, color_node(c), 1, cost));
            }
        }
    }
    for c in 1..=c_budget {
        arcs.push((color_node(c), sink, 1, 0));
    }

    let (_, flow_per_arc) = match flow.min_cost_flow(n, source, sink, &arcs, n_groups) {
        Some(result) => result,
        None => return Ok(false),
    };

    for (i, &(from, to, _, _)) in arcs.iter().enumerate() {
        if flow_per_arc[i] == 0 || from < 2 || from >= 2 + n_groups {
            continue;
        }
        let gi = from - 2;
        let c = to - (1 + n_groups);
        let g = groups[gi];
        if colors.owner(hubs[gi], c) != g {
            colors.bind(c, g, eg)?;
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::AugmentingPathMatcher;
    use crate::flow::SuccessiveShortestPaths;

    fn setup() -> (Graph, EdgeGroups) {
        // input 1 -> outputs 3,4 (global); input 2 -> output 4.
        let graph = Graph::new(2, 2, &[(1, 1), (1, 2), (2, 2)]).unwrap();
        let mut eg = EdgeGroups::new(2, 2, 3);
        let g1 = eg.add(1, 0, &graph).unwrap();
        eg.add(2, g1, &graph).unwrap();
        eg.add(3, 0, &graph).unwrap();
        (graph, eg)
    }

    #[test]
    fn greedy_bounded_completes_when_budget_is_sufficient() {
        let (graph, eg) = setup();
        let mut colors = EdgeGroupColors::new(2, eg.n_groups(), 4, 3, graph.n());
        assert!(greedy_bounded_coloring(&eg, &mut colors, &graph).unwrap());
        assert!(colors.complete(&eg).unwrap());
    }

    #[test]
    fn greedy_bounded_fails_when_budget_is_too_small() {
        let (graph, eg) = setup();
        let mut colors = EdgeGroupColors::new(2, eg.n_groups(), 1, 3, graph.n());
        assert!(!greedy_bounded_coloring(&eg, &mut colors, &graph).unwrap());
    }

    #[test]
    fn chvatal_coloring_completes() {
        let (graph, eg) = setup();
        let mut colors = EdgeGroupColors::new(2, eg.n_groups(), 4, 3, graph.n());
        assert!(chvatal_coloring(&eg, &mut colors, &graph).unwrap());
        assert!(colors.complete(&eg).unwrap());
    }

    #[test]
    fn layered_coloring_completes() {
        let (graph, eg) = setup();
        let mut colors = EdgeGroupColors::new(2, eg.n_groups(), 4, 3, graph.n());
        assert!(layered_coloring(&eg, &mut colors, &graph).unwrap());
        assert!(colors.complete(&eg).unwrap());
    }

    #[test]
    fn random_palette_coloring_completes_with_enough_colors() {
        let (graph, eg) = setup();
        let mut colors = EdgeGroupColors::new(2, eg.n_groups(), 4, 3, graph.n());
        let mut guac = Guacamole::new(42);
        assert!(random_palette_coloring(&eg, &mut colors, &graph, &mut guac).unwrap());
        assert!(colors.complete(&eg).unwrap());
    }

    #[test]
    fn color_from_palettes_assigns_distinct_colors_at_a_shared_output() {
        let (graph, eg) = setup();
        let mut colors = EdgeGroupColors::new(2, eg.n_groups(), 4, 3, graph.n());
        let g1 = eg.group_of(1).unwrap();
        let g2 = eg.group_of(3).unwrap();
        colors.bind(1, g1, &eg).unwrap();
        colors.bind(1, g2, &eg).unwrap();
        colors.bind(2, g2, &eg).unwrap();
        let matcher = AugmentingPathMatcher;
        assert!(color_from_palettes(&eg, &mut colors, &graph, &matcher, None).unwrap());
        assert_ne!(colors.color_of(2).unwrap(), colors.color_of(3).unwrap());
        assert!(colors.complete(&eg).unwrap());
    }

    #[test]
    fn min_cost_flow_assisted_coloring_completes_from_empty_palettes() {
        let (graph, eg) = setup();
        let mut colors = EdgeGroupColors::new(2, eg.n_groups(), 4, 3, graph.n());
        let matcher = AugmentingPathMatcher;
        let flow = SuccessiveShortestPaths;
        assert!(min_cost_flow_assisted_coloring(&eg, &mut colors, &graph, &matcher, &flow).unwrap());
        assert!(colors.complete(&eg).unwrap());
    }
}
