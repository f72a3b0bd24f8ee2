//! Minimum-cost flow, the other external collaborator the coloring clients lean on. The
//! palette-expansion network built by `min_cost_flow_assisted_coloring` is the only network this
//! workspace ever constructs; which min-cost-flow algorithm answers it is not this crate's concern.

/// Nodes are `1..=n`. `arcs[i] = (from, to, capacity, cost)`, cost per unit of flow. Returns the
/// total cost and the flow carried by each arc (parallel to `arcs`) for a minimum-cost flow of
/// exactly `value` units from `source` to `sink`, or `None` if that much flow isn't feasible.
pub trait MinCostFlowSolver {
    fn min_cost_flow(
        &self,
        n: usize,
        source: usize,
        sink: usize,
        arcs: &[(usize, usize, usize, i64)],
        value: usize,
    ) -> Option<(i64, Vec<usize>)>;
}

/// Successive shortest augmenting paths, one unit of flow at a time, shortest path found by
/// Bellman-Ford over the residual graph. O(value * n * m); correct for the small, unit-capacity-
/// dominated networks this workspace builds, not a performance claim.
pub struct SuccessiveShortestPaths;

impl MinCostFlowSolver for SuccessiveShortestPaths {
    fn min_cost_flow(
        &self,
        n: usize,
        source: usize,
        sink: usize,
        arcs: &[(usize, usize, usize, i64)],
        value: usize,
    ) -> Option<(i64, Vec<usize>)> {
        let m = arcs.len();
        let mut cap = vec![0usize; 2 * m];
        let mut cost = vec![0i64; 2 * m];
        let mut from = vec![0usize; 2 * m];
        let mut to = vec![0usize; 2 * m];
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n + 1];
        for (i, &(f, t, c, w)) in arcs.iter().enumerate() {
            cap[2 * i] = c;
            cost[2 * i] = w;
            from[2 * i] = f;
            to[2 * i] = t;
            cap[2 * i + 1] = 0;
            cost[2 * i + 1] = -w;
            from[2 * i + 1] = t;
            to[2 * i + 1] = f;
            adj[f].push(2 * i);
            adj[t].push(2 * i + 1);
        }

        let mut flow_per_arc = vec![0usize; m];
        let mut remaining = value;
        let mut total_cost = 0i64;
        while remaining > 0 {
            let mut dist = vec![i64::MAX; n + 1];
            let mut in_edge = vec![usize::MAX; n + 1];
            dist[source] = 0;
            for _ in 0..n {
                let mut changed = false;
                for e in 0..2 * m {
                    if cap[e] == 0 || dist[from[e]] == i64::MAX {
                        continue;
                    }
                    let nd = dist[from[e]] + cost[e];
                    if nd < dist[to[e]] {
                        dist[to[e]] = nd;
                        in_edge[to[e]] = e;
                        changed = true;
                    }
                }
                if !changed {
                    break;
                }
            }
            if dist[sink] == i64::MAX {
                return None;
            }
            let mut bottleneck = remaining;
            let mut v = sink;
            while v != source {
                let e = in_edge[v];
                bottleneck = bottleneck.min(cap[e]);
                v = from[e];
            }
            let mut v = sink;
            while v != source {
                let e = in_edge[v];
                cap[e] -= bottleneck;
                cap[e ^ 1] += bottleneck;
                if e % 2 == 0 {
                    flow_per_arc[e / 2] += bottleneck;
                } else {
                    flow_per_arc[e / 2] -= bottleneck;
                }
                total_cost += cost[e] * bottleneck as i64;
                v = from[e];
            }
            remaining -= bottleneck;
        }
        Some((total_cost, flow_per_arc))
    }
}
