//! Overlap resolution
//!
//! Reduces a set of possibly-overlapping entities to a pairwise
//! non-overlapping subset. Entities are first grouped into clusters by
//! transitive span intersection; within each cluster a greedy interval
//! selection keeps one survivor at a time until the cluster is exhausted.

use crate::entity::{sort_by_span, Entity};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How to pick the survivor inside an overlap cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapStrategy {
    /// Keep the most confident entity; ties broken by longer span, then
    /// earlier start
    #[default]
    HighestConfidence,
    /// Keep the longest entity; ties broken by higher confidence, then
    /// earlier start
    Longest,
    /// Keep the earliest entity; ties broken by higher confidence
    First,
}

impl OverlapStrategy {
    fn prefer(&self, a: &Entity, b: &Entity) -> Ordering {
        match self {
            OverlapStrategy::HighestConfidence => a
                .confidence
                .total_cmp(&b.confidence)
                .then(a.len().cmp(&b.len()))
                .then(b.start.cmp(&a.start)),
            OverlapStrategy::Longest => a
                .len()
                .cmp(&b.len())
                .then(a.confidence.total_cmp(&b.confidence))
                .then(b.start.cmp(&a.start)),
            OverlapStrategy::First => b
                .start
                .cmp(&a.start)
                .then(a.confidence.total_cmp(&b.confidence)),
        }
    }
}

/// Resolve overlapping entities with the given strategy
///
/// The output is pairwise non-overlapping, a subset of the input, and
/// sorted by span.
pub fn resolve_overlaps(entities: Vec<Entity>, strategy: OverlapStrategy) -> Vec<Entity> {
    if entities.len() < 2 {
        return entities;
    }

    let mut sorted = entities;
    sort_by_span(&mut sorted);

    let mut resolved = Vec::with_capacity(sorted.len());
    for cluster in clusters(sorted) {
        resolved.extend(select_survivors(cluster, strategy));
    }
    sort_by_span(&mut resolved);
    resolved
}

/// Split span-sorted entities into maximal transitive-overlap clusters
fn clusters(sorted: Vec<Entity>) -> Vec<Vec<Entity>> {
    let mut groups: Vec<Vec<Entity>> = Vec::new();
    let mut current: Vec<Entity> = Vec::new();
    let mut current_end = 0usize;

    for entity in sorted {
        if current.is_empty() || entity.start < current_end {
            current_end = current_end.max(entity.end);
            current.push(entity);
        } else {
            groups.push(std::mem::take(&mut current));
            current_end = entity.end;
            current.push(entity);
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Greedy selection within one cluster: pick the preferred entity, drop
/// everything overlapping it, repeat on the remainder
fn select_survivors(mut cluster: Vec<Entity>, strategy: OverlapStrategy) -> Vec<Entity> {
    let mut survivors = Vec::new();
    while !cluster.is_empty() {
        let best = cluster
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| strategy.prefer(a, b))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let survivor = cluster.swap_remove(best);
        cluster.retain(|e| !e.overlaps(&survivor));
        survivors.push(survivor);
    }
    survivors
}
