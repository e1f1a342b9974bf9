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

//! Influence Ranker
//!
//! Scores every member of a community on its induced subgraph (degree,
//! betweenness and closeness centrality, averaged) and selects the top node.
//! Ties on the combined score go to the lexicographically smallest node id.

use agora_core::{AgoraError, AgoraResult, CommunityId, NodeId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::centrality::Subgraph;
use crate::graph::{InteractionGraph, NodeIndex};
use crate::partition::Partition;

/// Centrality breakdown for one node within its community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeScore {
    pub node: NodeId,
    pub community: CommunityId,
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    /// Mean of the three measures, in [0, 1]
    pub score: f64,
}

/// The top-ranked node of a community
pub type Influencer = NodeScore;

/// Ranks community members by combined centrality
pub struct InfluenceRanker<'a> {
    graph: &'a InteractionGraph,
    partition: &'a Partition,
}

impl<'a> InfluenceRanker<'a> {
    pub fn new(graph: &'a InteractionGraph, partition: &'a Partition) -> Self {
        Self { graph, partition }
    }

    /// Top influencer per community; `None` ranks every community
    pub fn rank(
        &self,
        communities: Option<&[CommunityId]>,
    ) -> AgoraResult<BTreeMap<CommunityId, Influencer>> {
        let ids = match communities {
            Some(ids) => ids.to_vec(),
            None => self.partition.community_ids(),
        };

        let mut influencers = BTreeMap::new();
        for community in ids {
            if let Some(top) = self.top(community)? {
                influencers.insert(community, top);
            }
        }
        Ok(influencers)
    }

    /// Highest-scoring member of one community
    pub fn top(&self, community: CommunityId) -> AgoraResult<Option<Influencer>> {
        Ok(self.scores(community)?.into_iter().next())
    }

    /// Every member of a community, best first
    pub fn scores(&self, community: CommunityId) -> AgoraResult<Vec<NodeScore>> {
        if !self.partition.contains_community(community) {
            return Err(AgoraError::UnknownCommunity(community));
        }

        let members = self.partition.members(community);
        let indices = members
            .iter()
            .map(|node| {
                self.graph
                    .index_of(node)
                    .ok_or_else(|| AgoraError::lookup(node.clone()))
            })
            .collect::<AgoraResult<Vec<NodeIndex>>>()?;

        let subgraph = Subgraph::induced(self.graph, &indices);
        let mut scores: Vec<NodeScore> = subgraph
            .centrality()
            .into_iter()
            .zip(members)
            .map(|(centrality, node)| NodeScore {
                node: node.clone(),
                community,
                degree: centrality.degree,
                betweenness: centrality.betweenness,
                closeness: centrality.closeness,
                score: centrality.combined(),
            })
            .collect();

        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.node.cmp(&b.node))
        });

        tracing::trace!(
            community,
            members = scores.len(),
            edges = subgraph.edge_count(),
            "Ranked community members"
        );

        Ok(scores)
    }
}
