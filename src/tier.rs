// src/tier.rs
//
// Tier assignment: layered fixed point over the recipe graph.
//
// - Elements with no recipes are tier 1 at iteration 0.
// - Each pass reads a snapshot of what was resolved by the end of the previous pass.
//   An element resolves in the first pass where at least one recipe has every
//   ingredient resolved; its tier is 1 + the highest recipe tier among those recipes.
// - Once set, a tier never changes, even if a recipe unlocked later would give a
//   lower one.
// - Whatever is left when a pass makes no progress (or the pass cap is hit) is forced
//   to tier 1 and reported. Cycles and references to unknown names end up here.

use std::fmt;

use crate::config::consts::BASE_TIER;
use crate::config::options::ResolveOptions;
use crate::graph::{EntityGraph, EntityId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierInfo {
    pub tier: u32,
    pub resolved: bool,
    /// Pass in which the tier was fixed; `None` for fallbacks.
    pub iteration: Option<usize>,
    pub fallback: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// Every recipe is blocked and some recipe names an element that isn't in the graph.
    DanglingReference { missing: Vec<String> },
    /// Blocked on elements that never resolved: a cycle, or downstream of one.
    Unresolved,
    /// The pass cap was reached while passes were still making progress.
    IterationCap,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::DanglingReference { missing } => {
                write!(f, "references unknown element(s): {}", missing.join(", "))
            }
            FallbackReason::Unresolved => f.write_str("potential circular dependency"),
            FallbackReason::IterationCap => f.write_str("iteration cap reached"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub id: EntityId,
    pub name: String,
    pub reason: FallbackReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}, set to tier {}", self.name, self.reason, BASE_TIER)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// One entry per element, in graph order.
    pub tiers: Vec<TierInfo>,
    /// Relaxation passes run (iteration 0, the base layer, not counted).
    pub iterations: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn tier_of(&self, id: EntityId) -> u32 {
        self.tiers[id].tier
    }

    pub fn max_tier(&self) -> u32 {
        self.tiers.iter().map(|t| t.tier).max().unwrap_or(0)
    }

    pub fn converged(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Write tiers back onto the graph.
    pub fn apply(&self, graph: &mut EntityGraph) {
        for (id, info) in self.tiers.iter().enumerate() {
            let e = graph.entity_mut(id);
            e.tier = info.tier;
            e.resolved = info.resolved;
        }
    }
}

/// Recipes with ingredient names looked up once; `None` marks a name not in the graph.
type Linked = Vec<Vec<Option<EntityId>>>;

fn link(graph: &EntityGraph) -> Vec<Linked> {
    graph
        .entities()
        .iter()
        .map(|e| {
            e.recipes
                .iter()
                .map(|r| r.ingredients.iter().map(|n| graph.id_of(n)).collect())
                .collect()
        })
        .collect()
}

/// Highest ingredient tier, if every ingredient is resolved in `snapshot`.
/// Empty recipes never qualify.
fn recipe_tier(recipe: &[Option<EntityId>], snapshot: &[Option<u32>]) -> Option<u32> {
    if recipe.is_empty() {
        return None;
    }
    recipe.iter().try_fold(0u32, |acc, ing| {
        let t = (*ing).and_then(|id| snapshot[id])?;
        Some(acc.max(t))
    })
}

/// Tier this element would take in the current pass, if any recipe is ready.
fn candidate(recipes: &Linked, snapshot: &[Option<u32>]) -> Option<u32> {
    recipes
        .iter()
        .filter_map(|r| recipe_tier(r, snapshot))
        .max()
        .map(|t| t + 1)
}

#[cfg(not(feature = "parallel"))]
fn scan(links: &[Linked], snapshot: &[Option<u32>], pending: &[EntityId]) -> Vec<(EntityId, u32)> {
    pending
        .iter()
        .filter_map(|&id| candidate(&links[id], snapshot).map(|t| (id, t)))
        .collect()
}

#[cfg(feature = "parallel")]
fn scan(links: &[Linked], snapshot: &[Option<u32>], pending: &[EntityId]) -> Vec<(EntityId, u32)> {
    use rayon::prelude::*;
    pending
        .par_iter()
        .filter_map(|&id| candidate(&links[id], snapshot).map(|t| (id, t)))
        .collect()
}

/// Assign a tier to every element. Pure: the graph is not touched.
pub fn resolve(graph: &EntityGraph, opts: &ResolveOptions) -> Resolution {
    let n = graph.len();
    let links = link(graph);

    let mut snapshot: Vec<Option<u32>> = vec![None; n];
    let mut iteration_of: Vec<Option<usize>> = vec![None; n];

    for (id, e) in graph.iter() {
        if e.is_base() {
            snapshot[id] = Some(BASE_TIER);
            iteration_of[id] = Some(0);
            tracing::trace!(name = %e.name, "base element");
        }
    }

    let mut pending: Vec<EntityId> = (0..n).filter(|&id| snapshot[id].is_none()).collect();
    tracing::debug!(total = n, base = n - pending.len(), "tier pass start");

    let mut iterations = 0usize;
    let mut hit_cap = false;

    while !pending.is_empty() {
        if iterations >= opts.max_iterations {
            hit_cap = true;
            break;
        }
        iterations += 1;

        // reads only the previous pass; writes land after the scan
        let found = scan(&links, &snapshot, &pending);
        if found.is_empty() {
            break;
        }
        for &(id, tier) in &found {
            snapshot[id] = Some(tier);
            iteration_of[id] = Some(iterations);
            tracing::trace!(name = %graph.entity(id).name, tier, "calculated");
        }
        pending.retain(|&id| snapshot[id].is_none());
        tracing::debug!(iteration = iterations, resolved = found.len(), left = pending.len(), "tier pass");
    }

    let mut diagnostics = Vec::with_capacity(pending.len());
    for &id in &pending {
        let reason = if hit_cap {
            FallbackReason::IterationCap
        } else {
            classify(graph, &links[id], id)
        };
        let d = Diagnostic { id, name: graph.entity(id).name.clone(), reason };
        tracing::warn!("{d}");
        diagnostics.push(d);
    }

    let tiers = (0..n)
        .map(|id| match snapshot[id] {
            Some(tier) => TierInfo { tier, resolved: true, iteration: iteration_of[id], fallback: false },
            None => TierInfo { tier: BASE_TIER, resolved: true, iteration: None, fallback: true },
        })
        .collect();

    tracing::info!(iterations, fallbacks = diagnostics.len(), "tiers resolved");

    Resolution { tiers, iterations, diagnostics }
}

fn classify(graph: &EntityGraph, recipes: &Linked, id: EntityId) -> FallbackReason {
    let mut missing: Vec<String> = graph
        .entity(id)
        .recipes
        .iter()
        .zip(recipes)
        .flat_map(|(r, linked)| {
            r.ingredients
                .iter()
                .zip(linked)
                .filter(|(_, l)| l.is_none())
                .map(|(name, _)| name.clone())
        })
        .collect();
    missing.sort();
    missing.dedup();

    if missing.is_empty() {
        FallbackReason::Unresolved
    } else {
        FallbackReason::DanglingReference { missing }
    }
}

/// Resolve and annotate in one step: `(graph) -> (graph', diagnostics)`.
pub fn resolve_graph(mut graph: EntityGraph, opts: &ResolveOptions) -> (EntityGraph, Vec<Diagnostic>) {
    let res = resolve(&graph, opts);
    res.apply(&mut graph);
    (graph, res.diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(items: Vec<(&'static str, Vec<Vec<&'static str>>)>) -> EntityGraph {
        items.into_iter().collect()
    }

    fn opts() -> ResolveOptions {
        ResolveOptions::default()
    }

    #[test]
    fn empty_graph() {
        let r = resolve(&EntityGraph::new(), &opts());
        assert!(r.tiers.is_empty());
        assert_eq!(r.iterations, 0);
        assert!(r.converged());
    }

    #[test]
    fn only_base_elements_need_no_pass() {
        let graph = g(vec![("Water", vec![]), ("Fire", vec![])]);
        let r = resolve(&graph, &opts());
        assert_eq!(r.iterations, 0);
        assert!(r.tiers.iter().all(|t| t.tier == 1 && t.iteration == Some(0)));
    }

    #[test]
    fn recipe_tier_needs_every_ingredient() {
        let snap = vec![Some(1), None, Some(3)];
        assert_eq!(recipe_tier(&[Some(0), Some(2)], &snap), Some(3));
        assert_eq!(recipe_tier(&[Some(0), Some(1)], &snap), None);
        assert_eq!(recipe_tier(&[Some(0), None], &snap), None);
        assert_eq!(recipe_tier(&[], &snap), None);
    }

    #[test]
    fn empty_recipe_falls_back() {
        let mut graph = EntityGraph::new();
        let id = graph.insert("Void").unwrap();
        graph.add_recipe_unchecked(id, &[]);
        let r = resolve(&graph, &opts());
        assert_eq!(r.diagnostics.len(), 1);
        assert_eq!(r.diagnostics[0].reason, FallbackReason::Unresolved);
    }

    #[test]
    fn cap_of_zero_forces_everything_non_base() {
        let graph = g(vec![("A", vec![]), ("B", vec![]), ("AB", vec![vec!["A", "B"]])]);
        let r = resolve(&graph, &ResolveOptions { max_iterations: 0 });
        assert_eq!(r.iterations, 0);
        assert_eq!(r.diagnostics.len(), 1);
        assert_eq!(r.diagnostics[0].reason, FallbackReason::IterationCap);
        assert!(r.tiers[2].fallback);
    }

    #[test]
    fn diagnostic_reads_like_a_warning() {
        let d = Diagnostic { id: 0, name: "Egg".into(), reason: FallbackReason::Unresolved };
        assert_eq!(d.to_string(), "Egg: potential circular dependency, set to tier 1");
    }

    #[test]
    fn apply_writes_tiers_back() {
        let graph = g(vec![("Water", vec![]), ("Fire", vec![]), ("Steam", vec![vec!["Water", "Fire"]])]);
        let (graph, diags) = resolve_graph(graph, &opts());
        assert!(diags.is_empty());
        let steam = graph.get("Steam").unwrap();
        assert!(steam.resolved);
        assert_eq!(steam.tier, 2);
    }
}
