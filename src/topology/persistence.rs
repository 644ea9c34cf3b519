//! Vietoris-Rips persistence over a precomputed distance matrix.
//!
//! Vertices enter the filtration at 0, edges at their pairwise distance,
//! and triangles at their diameter. Boundary matrix reduction over Z/2
//! yields finite birth/death pairs plus the essential classes that never
//! die.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::constants;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Highest homology dimension to report (0 = components, 1 = loops)
    pub max_dimension: usize,

    /// Cap on observation count; larger inputs are step-sampled
    pub max_points: usize,

    /// Edges beyond this filtration value are not built
    pub distance_ceiling: f64,

    /// Pairs with persistence at or below this floor are discarded
    pub persistence_floor: f64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            max_dimension: constants::tda::DEFAULT_MAX_DIMENSION,
            max_points: constants::tda::DEFAULT_MAX_POINTS,
            distance_ceiling: f64::INFINITY,
            persistence_floor: constants::tda::DEFAULT_PERSISTENCE_FLOOR,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PersistenceEngine {
    config: PersistenceConfig,
}

#[derive(Debug, Clone)]
struct Simplex {
    value: f64,
    dim: usize,
    vertices: Vec<usize>,
}

impl PersistenceEngine {
    pub fn new(config: PersistenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    /// Compute the persistence diagram of the Vietoris-Rips filtration over
    /// a symmetric distance matrix.
    pub fn compute_from_distances(&self, distances: &Array2<f64>) -> PersistenceDiagram {
        // Loops are the highest dimension this filtration builds cofaces
        // for; anything above would report spurious essential classes.
        let max_dim = self.config.max_dimension.min(1);
        let n_total = distances.nrows();
        if n_total == 0 {
            return PersistenceDiagram::new(max_dim);
        }

        // Step-sample oversized inputs.
        let indices: Vec<usize> = if n_total > self.config.max_points {
            let step = (n_total + self.config.max_points - 1) / self.config.max_points;
            (0..n_total).step_by(step).collect()
        } else {
            (0..n_total).collect()
        };
        let n = indices.len();
        let d = |i: usize, j: usize| distances[[indices[i], indices[j]]];

        let ceiling = self.config.distance_ceiling;
        let admissible = |dist: f64| dist.is_finite() && dist <= ceiling;

        let mut simplices: Vec<Simplex> = Vec::with_capacity(n + n * (n - 1) / 2);
        for i in 0..n {
            simplices.push(Simplex {
                value: 0.0,
                dim: 0,
                vertices: vec![i],
            });
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let dist = d(i, j);
                if admissible(dist) {
                    simplices.push(Simplex {
                        value: dist,
                        dim: 1,
                        vertices: vec![i, j],
                    });
                }
            }
        }
        // Triangles are only needed to kill loops.
        if max_dim >= 1 {
            for i in 0..n {
                for j in (i + 1)..n {
                    let dij = d(i, j);
                    if !admissible(dij) {
                        continue;
                    }
                    for k in (j + 1)..n {
                        let dik = d(i, k);
                        let djk = d(j, k);
                        if !admissible(dik) || !admissible(djk) {
                            continue;
                        }
                        simplices.push(Simplex {
                            value: dij.max(dik).max(djk),
                            dim: 2,
                            vertices: vec![i, j, k],
                        });
                    }
                }
            }
        }

        // Filtration order: by value, faces before cofaces on ties.
        simplices.sort_by(|a, b| {
            a.value
                .partial_cmp(&b.value)
                .unwrap_or(Ordering::Equal)
                .then(a.dim.cmp(&b.dim))
        });

        let mut index_of: HashMap<Vec<usize>, usize> = HashMap::with_capacity(simplices.len());
        for (idx, simplex) in simplices.iter().enumerate() {
            index_of.insert(simplex.vertices.clone(), idx);
        }

        let boundaries: Vec<Vec<usize>> = simplices
            .iter()
            .map(|simplex| {
                if simplex.dim == 0 {
                    return Vec::new();
                }
                let mut boundary: Vec<usize> = (0..simplex.vertices.len())
                    .map(|omit| {
                        let mut face = simplex.vertices.clone();
                        face.remove(omit);
                        index_of[&face]
                    })
                    .collect();
                boundary.sort_unstable();
                boundary
            })
            .collect();

        // Column reduction: cancel shared pivots until each column's lowest
        // row is unique or the column clears.
        let mut reduced = boundaries;
        let mut pivot_owner: HashMap<usize, usize> = HashMap::new();
        let mut pairs: Vec<(usize, usize)> = Vec::new();

        for col in 0..reduced.len() {
            loop {
                let Some(&low) = reduced[col].last() else {
                    break;
                };
                let Some(&owner) = pivot_owner.get(&low) else {
                    break;
                };
                let merged = add_mod2(&reduced[col], &reduced[owner]);
                reduced[col] = merged;
            }
            if let Some(&low) = reduced[col].last() {
                pivot_owner.insert(low, col);
                pairs.push((low, col));
            }
        }

        let mut diagram = PersistenceDiagram::new(max_dim);
        let mut destroyed: HashSet<usize> = HashSet::new();
        for &(birth_idx, death_idx) in &pairs {
            destroyed.insert(birth_idx);
            let creator = &simplices[birth_idx];
            if creator.dim > max_dim {
                continue;
            }
            let birth = creator.value;
            let death = simplices[death_idx].value;
            if death - birth > self.config.persistence_floor {
                diagram.add_interval(creator.dim, birth, death);
            }
        }
        // Essential classes: creators whose cycle is never filled in.
        for (idx, simplex) in simplices.iter().enumerate() {
            if simplex.dim > max_dim {
                continue;
            }
            if reduced[idx].is_empty() && !destroyed.contains(&idx) {
                diagram.add_interval(simplex.dim, simplex.value, f64::INFINITY);
            }
        }

        debug!(
            points = n,
            simplices = simplices.len(),
            intervals = diagram.len(),
            "reduced filtration"
        );
        diagram
    }
}

/// Symmetric difference of two sorted index columns (Z/2 addition).
fn add_mod2(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Birth/death intervals grouped by homology dimension. Essential classes
/// carry an infinite death.
#[derive(Debug, Clone)]
pub struct PersistenceDiagram {
    intervals_by_dim: Vec<Vec<(f64, f64)>>,
}

impl PersistenceDiagram {
    pub fn new(max_dimension: usize) -> Self {
        Self {
            intervals_by_dim: vec![Vec::new(); max_dimension + 1],
        }
    }

    pub fn add_interval(&mut self, dim: usize, birth: f64, death: f64) {
        if dim >= self.intervals_by_dim.len() {
            self.intervals_by_dim.resize(dim + 1, Vec::new());
        }
        self.intervals_by_dim[dim].push((birth, death));
    }

    pub fn max_dimension(&self) -> usize {
        self.intervals_by_dim.len() - 1
    }

    pub fn intervals(&self, dim: usize) -> &[(f64, f64)] {
        self.intervals_by_dim
            .get(dim)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.intervals_by_dim.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finite lifetimes; essential classes contribute 0.
    pub fn persistence_values(&self) -> Vec<f64> {
        self.intervals_by_dim
            .iter()
            .flatten()
            .map(|&(birth, death)| {
                if death.is_infinite() {
                    0.0
                } else {
                    death - birth
                }
            })
            .collect()
    }

    pub fn total_persistence(&self) -> f64 {
        self.persistence_values().iter().sum()
    }

    pub fn filter_by_persistence(&self, threshold: f64) -> Self {
        Self {
            intervals_by_dim: self
                .intervals_by_dim
                .iter()
                .map(|intervals| {
                    intervals
                        .iter()
                        .filter(|(birth, death)| death - birth > threshold)
                        .copied()
                        .collect()
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn distance_matrix(n: usize, fill: impl Fn(usize, usize) -> f64) -> Array2<f64> {
        Array2::from_shape_fn((n, n), |(i, j)| if i == j { 0.0 } else { fill(i, j) })
    }

    #[test]
    fn test_two_clusters_merge_at_gap_distance() {
        // Points {0, 1} and {2, 3}: tight within, distance 1 across.
        let distances = distance_matrix(4, |i, j| {
            let same_cluster = (i < 2) == (j < 2);
            if same_cluster {
                0.1
            } else {
                1.0
            }
        });

        let engine = PersistenceEngine::new(PersistenceConfig::default());
        let diagram = engine.compute_from_distances(&distances);

        let mut h0: Vec<(f64, f64)> = diagram.intervals(0).to_vec();
        h0.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

        assert_eq!(h0.len(), 4);
        // Two intra-cluster merges, then one bridge, then the survivor.
        assert!((h0[0].1 - 0.1).abs() < 1e-12);
        assert!((h0[1].1 - 0.1).abs() < 1e-12);
        assert!((h0[2].1 - 1.0).abs() < 1e-12);
        assert!(h0[3].1.is_infinite());
    }

    #[test]
    fn test_hexagon_carries_one_loop() {
        // Regular hexagon with unit sides: chords are 1, √3, or 2.
        let chord = |i: usize, j: usize| {
            let gap = (i as i64 - j as i64).unsigned_abs().min(6 - (i as i64 - j as i64).unsigned_abs()) as f64;
            2.0 * (gap * std::f64::consts::PI / 6.0).sin()
        };
        let distances = distance_matrix(6, chord);

        let engine = PersistenceEngine::new(PersistenceConfig::default());
        let diagram = engine.compute_from_distances(&distances);

        let h1: Vec<(f64, f64)> = diagram
            .intervals(1)
            .iter()
            .filter(|(_, death)| death.is_finite())
            .copied()
            .collect();
        assert_eq!(h1.len(), 1);
        let (birth, death) = h1[0];
        assert!((birth - 1.0).abs() < 1e-9);
        assert!((death - 3f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_single_component_survivor_count() {
        let distances = distance_matrix(5, |i, j| 0.2 + 0.01 * (i + j) as f64);
        let engine = PersistenceEngine::new(PersistenceConfig::default());
        let diagram = engine.compute_from_distances(&distances);

        let essential = diagram
            .intervals(0)
            .iter()
            .filter(|(_, death)| death.is_infinite())
            .count();
        assert_eq!(essential, 1);
    }

    #[test]
    fn test_empty_input_yields_empty_diagram() {
        let distances = Array2::<f64>::zeros((0, 0));
        let engine = PersistenceEngine::new(PersistenceConfig::default());
        let diagram = engine.compute_from_distances(&distances);
        assert!(diagram.is_empty());
    }

    #[test]
    fn test_max_points_step_sampling() {
        let distances = distance_matrix(40, |i, j| (i as f64 - j as f64).abs() * 0.05);
        let engine = PersistenceEngine::new(PersistenceConfig {
            max_points: 10,
            ..PersistenceConfig::default()
        });
        let diagram = engine.compute_from_distances(&distances);

        // 40 points sampled at step 4 leaves 10; 9 merges + 1 survivor.
        assert_eq!(diagram.intervals(0).len(), 10);
    }

    #[test]
    fn test_total_persistence_and_filter() {
        let mut diagram = PersistenceDiagram::new(1);
        diagram.add_interval(0, 0.0, 1.0);
        diagram.add_interval(0, 0.0, 0.05);
        diagram.add_interval(1, 0.5, f64::INFINITY);

        assert!((diagram.total_persistence() - 1.05).abs() < 1e-12);

        let filtered = diagram.filter_by_persistence(0.1);
        assert_eq!(filtered.intervals(0).len(), 1);
        // Infinite lifetimes always clear the threshold.
        assert_eq!(filtered.intervals(1).len(), 1);
    }
}
