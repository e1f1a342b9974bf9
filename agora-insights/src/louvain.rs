// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Louvain Community Detection
//!
//! Greedy modularity maximization in two alternating phases:
//!
//! 1. **Local Moving Phase**: visit nodes in a seeded order and move each to
//!    the neighboring community with the largest positive modularity gain
//! 2. **Aggregation Phase**: collapse communities into super-nodes; inter-
//!    community weights are summed, intra-community weight becomes a self-loop
//! 3. **Repeat**: until a level brings no improvement or one super-node remains
//!
//! ## Modularity
//!
//! Q = Σc [ Lc/m - γ (Kc / 2m)² ]
//!
//! Where:
//! - Lc = total weight of edges inside community c
//! - Kc = sum of weighted degrees of nodes in c (self-loops count twice)
//! - m = total edge weight
//! - γ = resolution
//!
//! Reference: Blondel et al., "Fast unfolding of communities in large networks"

use agora_core::{CommunityId, DetectionConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::graph::InteractionGraph;
use crate::partition::Partition;

/// Gains below this are treated as ties
const GAIN_EPSILON: f64 = 1e-12;

/// Result of one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub partition: Partition,
    /// Modularity of the final partition
    pub modularity: f64,
    /// Aggregation levels that were kept
    pub levels: usize,
}

/// Louvain community detection
pub struct CommunityDetector {
    config: DetectionConfig,
}

impl CommunityDetector {
    /// Create a detector with default parameters
    pub fn new() -> Self {
        Self {
            config: DetectionConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Default parameters with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(DetectionConfig::with_seed(seed))
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Partition every node of the graph into communities
    pub fn detect(&self, graph: &InteractionGraph) -> Partition {
        self.run(graph).partition
    }

    /// Partition the graph and report the final modularity
    pub fn run(&self, graph: &InteractionGraph) -> Detection {
        let n = graph.node_count();
        let resolution = self.config.resolution;

        let mut level_graph = LevelGraph::from_graph(graph);

        if level_graph.total_weight <= 0.0 {
            // No edges, each node is its own community
            let labels: Vec<CommunityId> = (0..n as CommunityId).collect();
            return Detection {
                partition: Partition::from_labels(graph, &labels),
                modularity: 0.0,
                levels: 0,
            };
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);

        // Input node -> current super-node
        let mut assignment: Vec<usize> = (0..n).collect();
        let mut modularity = level_graph.modularity(&(0..n).collect::<Vec<_>>(), resolution);
        let mut levels = 0;

        for level in 0..self.config.max_levels {
            let communities = self.local_moving_phase(&level_graph, &mut rng);
            let (communities, count) = renumber(&communities);
            let new_modularity = level_graph.modularity(&communities, resolution);

            tracing::debug!(
                level,
                nodes = level_graph.node_count(),
                communities = count,
                modularity = new_modularity,
                "Louvain level finished"
            );

            let improved = new_modularity - modularity >= self.config.min_improvement;
            if levels > 0 && !improved {
                break;
            }

            for slot in assignment.iter_mut() {
                *slot = communities[*slot];
            }
            modularity = new_modularity;
            levels += 1;

            // Nothing merged, or everything merged: no further level can help
            if count == level_graph.node_count() || count == 1 || !improved {
                break;
            }

            level_graph = level_graph.aggregate(&communities, count);
        }

        let labels = renumber_by_first_appearance(&assignment);
        Detection {
            partition: Partition::from_labels(graph, &labels),
            modularity,
            levels,
        }
    }

    /// Local moving phase: move nodes to maximize modularity gain.
    /// Returns the community of every node of `graph`.
    fn local_moving_phase(&self, graph: &LevelGraph, rng: &mut StdRng) -> Vec<usize> {
        let n = graph.node_count();
        let resolution = self.config.resolution;
        let two_m = 2.0 * graph.total_weight;

        let mut communities: Vec<usize> = (0..n).collect();
        let mut community_degree: Vec<f64> = graph.degrees.clone();

        // Seeded order for visiting nodes
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);

        for _pass in 0..self.config.max_passes {
            let mut moved = false;

            for &node in &order {
                let current = communities[node];
                let node_degree = graph.degrees[node];

                // Weight from node to each neighboring community, first-seen order
                let mut neighbor_weights: Vec<(usize, f64)> = Vec::new();
                let mut slots: HashMap<usize, usize> = HashMap::new();
                for &(neighbor, weight) in &graph.adjacency[node] {
                    let community = communities[neighbor];
                    let slot = *slots.entry(community).or_insert_with(|| {
                        neighbor_weights.push((community, 0.0));
                        neighbor_weights.len() - 1
                    });
                    neighbor_weights[slot].1 += weight;
                }

                // Take the node out of its community
                community_degree[current] -= node_degree;

                let gain = |community: usize, weight: f64| {
                    weight - resolution * community_degree[community] * node_degree / two_m
                };

                let weight_to_current = slots
                    .get(&current)
                    .map(|&slot| neighbor_weights[slot].1)
                    .unwrap_or(0.0);

                let mut best_community = current;
                let mut best_gain = gain(current, weight_to_current);

                for &(community, weight) in &neighbor_weights {
                    if community == current {
                        continue;
                    }
                    let candidate = gain(community, weight);
                    if candidate > best_gain + GAIN_EPSILON {
                        best_gain = candidate;
                        best_community = community;
                    }
                }

                community_degree[best_community] += node_degree;
                if best_community != current {
                    communities[node] = best_community;
                    moved = true;
                }
            }

            if !moved {
                break;
            }
        }

        communities
    }
}

impl Default for CommunityDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Modularity of a partition over the full interaction graph
pub fn modularity(graph: &InteractionGraph, partition: &Partition, resolution: f64) -> f64 {
    let level_graph = LevelGraph::from_graph(graph);
    let labels: Vec<usize> = graph
        .nodes()
        .iter()
        .map(|node| {
            partition
                .community_of(node)
                .map(|c| c as usize)
                .unwrap_or(usize::MAX)
        })
        .collect();
    let (labels, _) = renumber(&labels);
    level_graph.modularity(&labels, resolution)
}

/// Compact weighted graph used at each aggregation level
struct LevelGraph {
    /// Node -> (neighbor, weight), self-loops excluded
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
    /// Weighted degree; self-loops count twice
    degrees: Vec<f64>,
    total_weight: f64,
}

impl LevelGraph {
    fn from_graph(graph: &InteractionGraph) -> Self {
        let n = graph.node_count();
        let mut adjacency = vec![Vec::new(); n];
        let mut self_loops = vec![0.0; n];

        for node in 0..n {
            for (neighbor, weight) in graph.neighbors(node) {
                if neighbor == node {
                    self_loops[node] += weight;
                } else {
                    adjacency[node].push((neighbor, weight));
                }
            }
        }

        Self::assemble(adjacency, self_loops, graph.total_weight())
    }

    fn assemble(adjacency: Vec<Vec<(usize, f64)>>, self_loops: Vec<f64>, total_weight: f64) -> Self {
        let degrees = adjacency
            .iter()
            .zip(&self_loops)
            .map(|(row, &self_loop)| row.iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self_loop)
            .collect();

        Self {
            adjacency,
            self_loops,
            degrees,
            total_weight,
        }
    }

    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Collapse each community into a super-node
    fn aggregate(&self, communities: &[usize], count: usize) -> Self {
        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); count];
        let mut slots: Vec<HashMap<usize, usize>> = vec![HashMap::new(); count];
        let mut self_loops = vec![0.0; count];

        for (node, row) in self.adjacency.iter().enumerate() {
            let from = communities[node];
            self_loops[from] += self.self_loops[node];

            for &(neighbor, weight) in row {
                let to = communities[neighbor];
                if from == to {
                    // Each internal edge is seen from both endpoints
                    self_loops[from] += weight / 2.0;
                } else {
                    let slot = *slots[from].entry(to).or_insert_with(|| {
                        adjacency[from].push((to, 0.0));
                        adjacency[from].len() - 1
                    });
                    adjacency[from][slot].1 += weight;
                }
            }
        }

        Self::assemble(adjacency, self_loops, self.total_weight)
    }

    /// Modularity of a labelling given as dense community indices
    fn modularity(&self, communities: &[usize], resolution: f64) -> f64 {
        if self.total_weight <= 0.0 {
            return 0.0;
        }

        let count = communities.iter().copied().max().map_or(0, |c| c + 1);
        let mut internal = vec![0.0; count];
        let mut degree = vec![0.0; count];

        for (node, row) in self.adjacency.iter().enumerate() {
            let community = communities[node];
            internal[community] += self.self_loops[node];
            degree[community] += self.degrees[node];
            for &(neighbor, weight) in row {
                if communities[neighbor] == community {
                    internal[community] += weight / 2.0;
                }
            }
        }

        let m = self.total_weight;
        internal
            .iter()
            .zip(&degree)
            .map(|(&l, &k)| l / m - resolution * (k / (2.0 * m)).powi(2))
            .sum()
    }
}

/// Renumber labels to be contiguous, in order of first appearance
fn renumber(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let renumbered = labels
        .iter()
        .map(|&label| {
            let next = mapping.len();
            *mapping.entry(label).or_insert(next)
        })
        .collect();
    (renumbered, mapping.len())
}

fn renumber_by_first_appearance(labels: &[usize]) -> Vec<CommunityId> {
    renumber(labels)
        .0
        .into_iter()
        .map(|c| c as CommunityId)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::EdgeRecord;
    use std::collections::HashSet;

    fn graph_of(pairs: &[(&str, &str)]) -> InteractionGraph {
        let records: Vec<EdgeRecord> = pairs
            .iter()
            .map(|(s, t)| EdgeRecord::new(*s, *t, "topic"))
            .collect();
        InteractionGraph::from_records(&records)
    }

    #[test]
    fn test_triangle_and_pair() {
        let graph = graph_of(&[("A", "B"), ("B", "C"), ("C", "A"), ("D", "E")]);
        let partition = CommunityDetector::with_seed(42).detect(&graph);

        assert_eq!(partition.community_count(), 2);
        let abc = partition.community_of("A").unwrap();
        assert_eq!(partition.community_of("B"), Some(abc));
        assert_eq!(partition.community_of("C"), Some(abc));
        let de = partition.community_of("D").unwrap();
        assert_ne!(abc, de);
        assert_eq!(partition.community_of("E"), Some(de));
    }

    #[test]
    fn test_two_cliques_with_bridge() {
        let graph = graph_of(&[
            ("a1", "a2"),
            ("a1", "a3"),
            ("a1", "a4"),
            ("a2", "a3"),
            ("a2", "a4"),
            ("a3", "a4"),
            ("b1", "b2"),
            ("b1", "b3"),
            ("b1", "b4"),
            ("b2", "b3"),
            ("b2", "b4"),
            ("b3", "b4"),
            ("a1", "b1"),
        ]);

        let detection = CommunityDetector::with_seed(7).run(&graph);
        let partition = &detection.partition;

        assert_eq!(partition.community_count(), 2);
        assert_ne!(partition.community_of("a2"), partition.community_of("b2"));
        assert_eq!(partition.community_of("a1"), partition.community_of("a4"));
        assert!(detection.modularity > 0.3);
    }

    #[test]
    fn test_same_seed_same_partition() {
        let graph = graph_of(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "D"),
            ("D", "A"),
            ("C", "E"),
            ("E", "F"),
            ("F", "G"),
            ("G", "E"),
        ]);

        let first = CommunityDetector::with_seed(3).run(&graph);
        let second = CommunityDetector::with_seed(3).run(&graph);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_edges_gives_singletons() {
        let mut graph = InteractionGraph::new();
        graph.get_or_create_node("X");
        graph.get_or_create_node("Y");

        let detection = CommunityDetector::new().run(&graph);
        assert_eq!(detection.partition.community_count(), 2);
        assert_eq!(detection.partition.community_of("X"), Some(0));
        assert_eq!(detection.partition.community_of("Y"), Some(1));
        assert_eq!(detection.modularity, 0.0);
    }

    #[test]
    fn test_empty_graph() {
        let detection = CommunityDetector::new().run(&InteractionGraph::new());
        assert!(detection.partition.is_empty());
    }

    #[test]
    fn test_complete_graph_single_community() {
        let graph = graph_of(&[
            ("A", "B"),
            ("A", "C"),
            ("A", "D"),
            ("B", "C"),
            ("B", "D"),
            ("C", "D"),
        ]);
        let partition = CommunityDetector::new().detect(&graph);
        assert_eq!(partition.community_count(), 1);
    }

    #[test]
    fn test_ids_contiguous_from_zero() {
        let graph = graph_of(&[("A", "B"), ("C", "D"), ("E", "F")]);
        let partition = CommunityDetector::new().detect(&graph);

        let ids: HashSet<CommunityId> = partition.community_ids().into_iter().collect();
        assert_eq!(ids, (0..3).collect());
        assert_eq!(partition.community_of("A"), Some(0));
    }

    #[test]
    fn test_modularity_of_known_split() {
        let graph = graph_of(&[("A", "B"), ("B", "C"), ("C", "A"), ("D", "E")]);
        let partition = Partition::from_pairs(
            [("A", 0), ("B", 0), ("C", 0), ("D", 1), ("E", 1)]
                .into_iter()
                .map(|(n, c)| (n.to_string(), c)),
        );

        // m = 4; L = 3 and 1; K = 6 and 2
        let expected = (3.0 / 4.0 - (6.0f64 / 8.0).powi(2)) + (1.0 / 4.0 - (2.0f64 / 8.0).powi(2));
        assert!((modularity(&graph, &partition, 1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_self_loop_graph_still_partitions() {
        let graph = graph_of(&[("A", "A"), ("A", "B"), ("C", "D")]);
        let partition = CommunityDetector::new().detect(&graph);
        assert_eq!(partition.len(), 4);
        assert_eq!(partition.community_of("A"), partition.community_of("B"));
    }
}
