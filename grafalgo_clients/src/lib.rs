//! Design-level clients built on top of `edgegroups`/`edgegroupcolors`: representative consumers
//! that exercise the full contract of the layered container stack without owning any of it.
//!
//! Two families live here. Set cover (`set_cover`) is a standalone client over a plain bipartite
//! sets-vs-elements encoding. Edge-group coloring (`coloring`) drives an `EdgeGroupColors` through
//! `bind`/`color`/`available`, delegating the two genuinely hard subproblems (maximum bipartite
//! matching and minimum-cost flow) to the traits in `matching` and `flow`. Concrete solvers for
//! those traits are provided as reference implementations so the clients here are exercised end to
//! end, not because this crate wants to be a matching/flow library.

pub mod coloring;
pub mod flow;
pub mod matching;
pub mod set_cover;

pub use coloring::{
    chvatal_coloring, color_from_palettes, greedy_bounded_coloring, layered_coloring,
    min_cost_flow_assisted_coloring, random_palette_coloring,
};
pub use flow::{MinCostFlowSolver, SuccessiveShortestPaths};
pub use matching::{AugmentingPathMatcher, BipartiteMatcher};
pub use set_cover::{greedy_set_cover, primal_dual_set_cover};
