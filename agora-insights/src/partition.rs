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

//! Community partition
//!
//! Assignment of every node to exactly one community, plus the derived
//! rosters. Immutable once produced by the detector.

use agora_core::{CommunityId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::graph::InteractionGraph;

/// Node -> community mapping with per-community rosters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    assignments: BTreeMap<NodeId, CommunityId>,
    /// Community -> members, in graph insertion order
    rosters: BTreeMap<CommunityId, Vec<NodeId>>,
}

impl Partition {
    /// Build from one label per graph node (indexed like `graph.nodes()`)
    pub fn from_labels(graph: &InteractionGraph, labels: &[CommunityId]) -> Self {
        Self::from_pairs(
            graph
                .nodes()
                .iter()
                .cloned()
                .zip(labels.iter().copied()),
        )
    }

    /// Build from explicit (node, community) pairs; later pairs override
    /// earlier ones for the same node
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, CommunityId)>,
    {
        let mut assignments = BTreeMap::new();
        let mut order = Vec::new();
        for (node, community) in pairs {
            if assignments.insert(node.clone(), community).is_none() {
                order.push(node);
            }
        }

        let mut rosters: BTreeMap<CommunityId, Vec<NodeId>> = BTreeMap::new();
        for node in order {
            let community = assignments[&node];
            rosters.entry(community).or_default().push(node);
        }

        Self {
            assignments,
            rosters,
        }
    }

    /// Community of a node
    pub fn community_of(&self, node: &str) -> Option<CommunityId> {
        self.assignments.get(node).copied()
    }

    /// Members of a community (empty for unknown ids)
    pub fn members(&self, community: CommunityId) -> &[NodeId] {
        self.rosters
            .get(&community)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Community ids, ascending
    pub fn community_ids(&self) -> Vec<CommunityId> {
        self.rosters.keys().copied().collect()
    }

    pub fn contains_community(&self, community: CommunityId) -> bool {
        self.rosters.contains_key(&community)
    }

    pub fn community_count(&self) -> usize {
        self.rosters.len()
    }

    /// Number of assigned nodes
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// (node, community) pairs ordered by node identifier
    pub fn iter(&self) -> impl Iterator<Item = (&str, CommunityId)> + '_ {
        self.assignments.iter().map(|(n, &c)| (n.as_str(), c))
    }

    /// Rosters keyed by community id
    pub fn rosters(&self) -> &BTreeMap<CommunityId, Vec<NodeId>> {
        &self.rosters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_builds_rosters() {
        let partition = Partition::from_pairs(vec![
            ("B".to_string(), 1),
            ("A".to_string(), 0),
            ("C".to_string(), 1),
        ]);

        assert_eq!(partition.len(), 3);
        assert_eq!(partition.community_ids(), vec![0, 1]);
        assert_eq!(partition.members(1), &["B", "C"]);
        assert_eq!(partition.community_of("A"), Some(0));
        assert!(partition.members(9).is_empty());
    }

    #[test]
    fn test_reassignment_moves_node() {
        let partition = Partition::from_pairs(vec![("A".to_string(), 0), ("A".to_string(), 2)]);

        assert_eq!(partition.community_of("A"), Some(2));
        assert!(!partition.contains_community(0));
        assert_eq!(partition.community_count(), 1);
    }
}
