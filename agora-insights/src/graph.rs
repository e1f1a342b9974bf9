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

//! Interaction Graph
//!
//! Weighted undirected graph built from edge records. Nodes and edges are
//! kept in first-seen order so every traversal downstream is reproducible:
//! - Node lookup by identifier or dense index
//! - Adjacency lists for neighbor iteration
//! - Last-write-wins weights for repeated pairs

use agora_core::{EdgeRecord, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dense node index, assigned in first-seen order
pub type NodeIndex = usize;

/// Undirected edge between two node indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Endpoint seen first in the originating record
    pub source: NodeIndex,
    /// Other endpoint
    pub target: NodeIndex,
    /// Weight of the most recent record for this pair
    pub weight: f64,
}

impl GraphEdge {
    /// True when both endpoints are the same node
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Statistics about the interaction graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub self_loop_count: usize,
    /// Sum of edge weights (each edge once)
    pub total_weight: f64,
    /// Actual edges / possible edges, self-loops excluded
    pub density: f64,
}

/// Weighted undirected interaction graph
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    nodes: Vec<NodeId>,
    node_index: HashMap<NodeId, NodeIndex>,
    edges: Vec<GraphEdge>,
    /// Unordered pair (min, max) -> position in `edges`
    edge_index: HashMap<(NodeIndex, NodeIndex), usize>,
    /// Node -> (neighbor, edge position), in edge creation order
    adjacency: Vec<Vec<(NodeIndex, usize)>>,
}

impl InteractionGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from records in order
    pub fn from_records(records: &[EdgeRecord]) -> Self {
        let mut graph = Self::new();
        for record in records {
            graph.add_record(record);
        }
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            records = records.len(),
            "Built interaction graph"
        );
        graph
    }

    /// Add one record, creating or overwriting the edge for its pair
    pub fn add_record(&mut self, record: &EdgeRecord) {
        let source = self.get_or_create_node(&record.source);
        let target = self.get_or_create_node(&record.target);
        self.add_edge(source, target, record.weight);
    }

    /// Get or create a node by identifier
    pub fn get_or_create_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&index) = self.node_index.get(id) {
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(id.to_string());
        self.node_index.insert(id.to_string(), index);
        self.adjacency.push(Vec::new());
        index
    }

    /// Insert an edge or overwrite the weight of an existing one
    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, weight: f64) {
        let key = pair_key(source, target);

        if let Some(&position) = self.edge_index.get(&key) {
            self.edges[position].weight = weight;
            return;
        }

        let position = self.edges.len();
        self.edges.push(GraphEdge {
            source,
            target,
            weight,
        });
        self.edge_index.insert(key, position);

        self.adjacency[source].push((target, position));
        if source != target {
            self.adjacency[target].push((source, position));
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node identifiers in insertion order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Edges in creation order
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Identifier of a node index
    pub fn node_id(&self, index: NodeIndex) -> Option<&str> {
        self.nodes.get(index).map(String::as_str)
    }

    /// Index of a node identifier
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Neighbors with edge weights; a self-loop lists the node itself once
    pub fn neighbors(&self, index: NodeIndex) -> impl Iterator<Item = (NodeIndex, f64)> + '_ {
        self.adjacency
            .get(index)
            .into_iter()
            .flatten()
            .map(move |&(neighbor, position)| (neighbor, self.edges[position].weight))
    }

    /// Weight of the edge between two nodes, if any
    pub fn weight_between(&self, a: NodeIndex, b: NodeIndex) -> Option<f64> {
        self.edge_index
            .get(&pair_key(a, b))
            .map(|&position| self.edges[position].weight)
    }

    /// Weighted degree; a self-loop counts twice
    pub fn weighted_degree(&self, index: NodeIndex) -> f64 {
        self.neighbors(index)
            .map(|(neighbor, weight)| if neighbor == index { 2.0 * weight } else { weight })
            .sum()
    }

    /// Sum of all edge weights, each edge counted once
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        let node_count = self.node_count();
        let self_loop_count = self.edges.iter().filter(|e| e.is_self_loop()).count();
        let simple_edges = self.edge_count() - self_loop_count;

        let density = if node_count > 1 {
            2.0 * simple_edges as f64 / (node_count * (node_count - 1)) as f64
        } else {
            0.0
        };

        GraphStats {
            node_count,
            edge_count: self.edge_count(),
            self_loop_count,
            total_weight: self.total_weight(),
            density,
        }
    }
}

fn pair_key(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
