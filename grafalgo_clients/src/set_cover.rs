//! Greedy and primal-dual weighted set cover: sets are indexed `1..=sets.len()`, elements
//! `1..=n_elements`. These are standalone clients (no `EdgeGroups`/`EdgeGroupColors` involved) kept
//! here as the other representative consumer of the contract-first style the rest of this
//! workspace is built in.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use gerror::{require, Result};
use ixlist::List;

#[derive(PartialEq)]
struct Ratio(f64);

impl Eq for Ratio {}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.partial_cmp(other).unwrap_or(std::cmp::Ordering::Equal)
    }
}

/// Repeatedly picks the set minimizing `weight(s) / uncovered(s)` via a lazily-updated
/// min-heap: whenever an element is covered, every set containing it gets its key stale, and a
/// fresh entry is pushed the next time that set is popped and found out of date rather than
/// eagerly rewriting every affected heap entry. `types[j - 1]`, if given, restricts the cover to
/// at most one set per nonzero type. Returns the chosen sets in the order they were picked.
pub fn greedy_set_cover(
    n_elements: usize,
    sets: &[Vec<usize>],
    weight: &[f64],
    types: Option<&[usize]>,
) -> Result<List> {
    let n_sets = sets.len();
    require!(weight.len() == n_sets, "greedy_set_cover: weight/sets length mismatch");
    if let Some(t) = types {
        require!(t.len() == n_sets, "greedy_set_cover: types/sets length mismatch");
    }

    let mut uncovered_count = vec![0usize; n_sets + 1];
    let mut element_sets: Vec<Vec<usize>> = vec![Vec::new(); n_elements + 1];
    for j in 1..=n_sets {
        for &e in &sets[j - 1] {
            require!(e >= 1 && e <= n_elements, "greedy_set_cover: element {e} out of range");
            uncovered_count[j] += 1;
            element_sets[e].push(j);
        }
    }

    let max_type = types.map_or(0, |t| t.iter().copied().max().unwrap_or(0));
    let mut type_used = vec![false; max_type + 1];
    let mut covered = vec![false; n_elements + 1];
    let mut chosen_flags = vec![false; n_sets + 1];
    let mut remaining = (1..=n_elements).filter(|&e| !covered[e]).count();

    let mut heap: BinaryHeap<Reverse<(Ratio, usize)>> = BinaryHeap::new();
    for j in 1..=n_sets {
        if uncovered_count[j] > 0 {
            heap.push(Reverse((Ratio(weight[j - 1] / uncovered_count[j] as f64), j)));
        }
    }

    let mut chosen = List::new(n_sets.max(1));
    while remaining > 0 {
        let Reverse((ratio, j)) = match heap.pop() {
            Some(top) => top,
            None => break,
        };
        if chosen_flags[j] || uncovered_count[j] == 0 {
            continue;
        }
        if let Some(t) = types {
            let ty = t[j - 1];
            if ty != 0 && type_used[ty] {
                continue;
            }
        }
        let current_ratio = weight[j - 1] / uncovered_count[j] as f64;
        if (current_ratio - ratio.0).abs() > 1e-12 {
            heap.push(Reverse((Ratio(current_ratio), j)));
            continue;
        }

        chosen_flags[j] = true;
        chosen.enq(j)?;
        if let Some(t) = types {
            let ty = t[j - 1];
            if ty != 0 {
                type_used[ty] = true;
            }
        }
        for &e in &sets[j - 1] {
            if covered[e] {
                continue;
            }
            covered[e] = true;
            remaining -= 1;
            for &j2 in &element_sets[e] {
                if !chosen_flags[j2] {
                    uncovered_count[j2] -= 1;
                }
            }
        }
    }
    require!(remaining == 0, "greedy_set_cover: the given sets do not cover every element");
    Ok(chosen)
}

/// Maintains a dual variable `y[i]` per uncovered element and a slack `weight[j] - sum(y[i] for i
/// in set j)` per set. At each step, raises `y` on the first uncovered element by the minimum
/// slack among its incident sets, which zeroes exactly one set's slack; that set joins the cover.
/// Returns the chosen sets in the order they were picked.
pub fn primal_dual_set_cover(n_elements: usize, sets: &[Vec<usize>], weight: &[f64]) -> Result<List> {
    let n_sets = sets.len();
    require!(weight.len() == n_sets, "primal_dual_set_cover: weight/sets length mismatch");

    let mut covered = vec![false; n_elements + 1];
    let mut chosen_flags = vec![false; n_sets + 1];
    let mut y = vec![0.0f64; n_elements + 1];
    let mut chosen = List::new(n_sets.max(1));

    loop {
        let first_uncovered = (1..=n_elements).find(|&e| !covered[e]);
        let i = match first_uncovered {
            Some(i) => i,
            None => break,
        };
        let incident: Vec<usize> = (1..=n_sets)
            .filter(|&j| !chosen_flags[j] && sets[j - 1].contains(&i))
            .collect();
        require!(!incident.is_empty(), "primal_dual_set_cover: element {i} is in no remaining set");

        let min_slack = incident
            .iter()
            .map(|&j| weight[j - 1] - sets[j - 1].iter().map(|&e| y[e]).sum::<f64>())
            .fold(f64::INFINITY, f64::min);
        y[i] += min_slack;

        for &j in &incident {
            let slack = weight[j - 1] - sets[j - 1].iter().map(|&e| y[e]).sum::<f64>();
            if slack.abs() < 1e-9 && !chosen_flags[j] {
                chosen_flags[j] = true;
                chosen.enq(j)?;
                for &e in &sets[j - 1] {
                    covered[e] = true;
                }
            }
        }
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_prefers_the_efficient_set() {
        // set 1: {1,2,3} weight 3 (ratio 1.0); set 2: {1} weight 1 (ratio 1.0); set 3: {2,3}
        // weight 1 (ratio 0.5). The cheap pair should be picked before the big set.
        let sets = vec![vec![1, 2, 3], vec![1], vec![2, 3]];
        let weight = [3.0, 1.0, 1.0];
        let mut cover = greedy_set_cover(3, &sets, &weight, None).unwrap();
        assert_eq!(3, cover.deq().unwrap());
        assert_eq!(2, cover.deq().unwrap());
        assert_eq!(0, cover.deq().unwrap());
    }

    #[test]
    fn type_constraint_allows_at_most_one_set_per_type() {
        // set 1 and set 2 are both type 1 and tie on ratio; picking set 1 must rule set 2 out
        // even though it is just as cheap, forcing the cover to fall back to set 3 for element 2.
        let sets = vec![vec![1], vec![2], vec![1, 2]];
        let weight = [1.0, 1.0, 3.0];
        let types = [1usize, 1, 0];
        let mut cover = greedy_set_cover(2, &sets, &weight, Some(&types)).unwrap();
        let mut picked = Vec::new();
        loop {
            let j = cover.deq().unwrap();
            if j == 0 {
                break;
            }
            picked.push(j);
        }
        assert!(!picked.contains(&2));
        let type1_count = picked.iter().filter(|&&j| types[j - 1] == 1).count();
        assert!(type1_count <= 1);
        let mut covered = vec![false; 3];
        for &j in &picked {
            for &e in &sets[j - 1] {
                covered[e] = true;
            }
        }
        assert!(covered[1..].iter().all(|&c| c));
    }

    #[test]
    fn infeasible_cover_is_a_contract_violation() {
        let sets = vec![vec![1]];
        let weight = [1.0];
        assert!(greedy_set_cover(2, &sets, &weight, None).unwrap_err().is_contract_violation());
    }

    #[test]
    fn primal_dual_covers_every_element() {
        let sets = vec![vec![1, 2], vec![2, 3], vec![1, 3]];
        let weight = [1.0, 1.0, 1.0];
        let mut cover = primal_dual_set_cover(3, &sets, &weight).unwrap();
        let mut covered = vec![false; 4];
        loop {
            let j = cover.deq().unwrap();
            if j == 0 {
                break;
            }
            for &e in &sets[j - 1] {
                covered[e] = true;
            }
        }
        assert!(covered[1..].iter().all(|&c| c));
    }
}
