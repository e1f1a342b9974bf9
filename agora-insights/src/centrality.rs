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

//! Centrality measures on induced subgraphs
//!
//! All measures are unweighted (hop distances) and normalized to [0, 1].
//! Self-loops are ignored. Graphs with a single node score 0 everywhere.

use std::collections::{HashMap, VecDeque};

use crate::graph::{InteractionGraph, NodeIndex};

/// Per-node centrality values inside one subgraph
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Centrality {
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
}

impl Centrality {
    /// Arithmetic mean of the three measures
    pub fn combined(&self) -> f64 {
        (self.degree + self.betweenness + self.closeness) / 3.0
    }
}

/// Subgraph induced by a node subset, with local dense indices
pub struct Subgraph {
    /// Local index -> graph index
    members: Vec<NodeIndex>,
    /// Local adjacency, self-loops and outside neighbors excluded
    adjacency: Vec<Vec<usize>>,
}

impl Subgraph {
    /// Induce the subgraph on `members` (order preserved)
    pub fn induced(graph: &InteractionGraph, members: &[NodeIndex]) -> Self {
        let local: HashMap<NodeIndex, usize> = members
            .iter()
            .enumerate()
            .map(|(i, &node)| (node, i))
            .collect();

        let adjacency = members
            .iter()
            .map(|&node| {
                graph
                    .neighbors(node)
                    .filter(|&(neighbor, _)| neighbor != node)
                    .filter_map(|(neighbor, _)| local.get(&neighbor).copied())
                    .collect()
            })
            .collect();

        Self {
            members: members.to_vec(),
            adjacency,
        }
    }

    fn len(&self) -> usize {
        self.members.len()
    }

    /// Number of induced edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Degree, betweenness and closeness for every local node
    pub fn centrality(&self) -> Vec<Centrality> {
        let n = self.len();
        if n <= 1 {
            return vec![Centrality::default(); n];
        }

        let degree = self.degree_centrality();
        let betweenness = self.betweenness_centrality();
        let closeness = self.closeness_centrality();

        (0..n)
            .map(|i| Centrality {
                degree: degree[i],
                betweenness: betweenness[i],
                closeness: closeness[i],
            })
            .collect()
    }

    /// Fraction of the other nodes each node is connected to
    fn degree_centrality(&self) -> Vec<f64> {
        let scale = 1.0 / (self.len() - 1) as f64;
        self.adjacency
            .iter()
            .map(|row| row.len() as f64 * scale)
            .collect()
    }

    /// Brandes' algorithm on an unweighted undirected graph
    fn betweenness_centrality(&self) -> Vec<f64> {
        let n = self.len();
        let mut betweenness = vec![0.0; n];
        if n <= 2 {
            return betweenness;
        }

        for source in 0..n {
            let mut stack = Vec::with_capacity(n);
            let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
            let mut sigma = vec![0.0f64; n];
            let mut distance: Vec<Option<usize>> = vec![None; n];

            sigma[source] = 1.0;
            distance[source] = Some(0);
            let mut queue = VecDeque::from([source]);

            while let Some(v) = queue.pop_front() {
                stack.push(v);
                let next = distance[v].map_or(0, |d| d + 1);
                for &w in &self.adjacency[v] {
                    if distance[w].is_none() {
                        distance[w] = Some(next);
                        queue.push_back(w);
                    }
                    if distance[w] == Some(next) {
                        sigma[w] += sigma[v];
                        predecessors[w].push(v);
                    }
                }
            }

            let mut delta = vec![0.0f64; n];
            while let Some(w) = stack.pop() {
                for &v in &predecessors[w] {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
                if w != source {
                    betweenness[w] += delta[w];
                }
            }
        }

        // Every unordered pair was counted from both ends
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for value in betweenness.iter_mut() {
            *value *= scale;
        }
        betweenness
    }

    /// Inverse average distance to reachable nodes, scaled by the reachable
    /// fraction of the subgraph
    fn closeness_centrality(&self) -> Vec<f64> {
        let n = self.len();
        (0..n)
            .map(|source| {
                let distances = self.bfs_distances(source);
                let reachable = distances.iter().filter(|d| d.is_some()).count() - 1;
                let total: usize = distances.iter().flatten().sum();
                if total == 0 {
                    return 0.0;
                }
                let r = reachable as f64;
                (r / total as f64) * (r / (n - 1) as f64)
            })
            .collect()
    }

    fn bfs_distances(&self, source: usize) -> Vec<Option<usize>> {
        let mut distance = vec![None; self.len()];
        distance[source] = Some(0);
        let mut queue = VecDeque::from([(source, 0usize)]);

        while let Some((v, d)) = queue.pop_front() {
            for &w in &self.adjacency[v] {
                if distance[w].is_none() {
                    distance[w] = Some(d + 1);
                    queue.push_back((w, d + 1));
                }
            }
        }
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::EdgeRecord;

    fn subgraph(pairs: &[(&str, &str)]) -> Subgraph {
        let records: Vec<EdgeRecord> = pairs
            .iter()
            .map(|(s, t)| EdgeRecord::new(*s, *t, "t"))
            .collect();
        let graph = InteractionGraph::from_records(&records);
        let members: Vec<NodeIndex> = (0..graph.node_count()).collect();
        Subgraph::induced(&graph, &members)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_star_center_dominates() {
        // hub = index 0
        let scores = subgraph(&[("hub", "a"), ("hub", "b"), ("hub", "c")]).centrality();

        assert!(close(scores[0].degree, 1.0));
        assert!(close(scores[0].betweenness, 1.0));
        assert!(close(scores[0].closeness, 1.0));
        assert!(close(scores[0].combined(), 1.0));

        assert!(close(scores[1].degree, 1.0 / 3.0));
        assert!(close(scores[1].betweenness, 0.0));
        // distances 1, 2, 2 -> 3 / 5
        assert!(close(scores[1].closeness, 0.6));
    }

    #[test]
    fn test_path_middle_betweenness() {
        let scores = subgraph(&[("a", "b"), ("b", "c")]).centrality();
        assert!(close(scores[1].betweenness, 1.0));
        assert!(close(scores[0].betweenness, 0.0));
    }

    #[test]
    fn test_disconnected_closeness_scaled() {
        // a-b and c-d in one node set
        let scores = subgraph(&[("a", "b"), ("c", "d")]).centrality();
        // reachable 1 of 3, distance 1 -> 1 * 1/3
        assert!(close(scores[0].closeness, 1.0 / 3.0));
        assert!(close(scores[0].betweenness, 0.0));
    }

    #[test]
    fn test_single_node_is_zero() {
        let mut graph = InteractionGraph::new();
        graph.get_or_create_node("X");
        let scores = Subgraph::induced(&graph, &[0]).centrality();
        assert_eq!(scores, vec![Centrality::default()]);
        assert_eq!(scores[0].combined(), 0.0);
    }

    #[test]
    fn test_induced_excludes_outside_and_self_loops() {
        let graph = InteractionGraph::from_records(&[
            EdgeRecord::new("a", "a", "t"),
            EdgeRecord::new("a", "b", "t"),
            EdgeRecord::new("b", "c", "t"),
        ]);
        let sub = Subgraph::induced(&graph, &[0, 1]);
        assert_eq!(sub.edge_count(), 1);
        assert_eq!(sub.len(), 2);
    }
}
