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

//! End-to-end analysis pipeline
//!
//! Graph Builder -> Community Detector -> {Topic Indexer, Influence Ranker}
//! -> Sentiment Classifier. Every artifact is computed once in [`Analysis::run`]
//! and handed out read-only afterwards.

use agora_core::{AgoraError, AgoraResult, AnalysisConfig, CommunityId, EdgeRecord, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::graph::{GraphStats, InteractionGraph};
use crate::influence::{InfluenceRanker, Influencer, NodeScore};
use crate::louvain::{CommunityDetector, Detection};
use crate::partition::Partition;
use crate::sentiment::{SentimentClassifier, SentimentDistribution, SentimentRecord};
use crate::topics::{SearchHit, TopicCount, TopicIndex};

/// Overview of one community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunitySummary {
    pub id: CommunityId,
    pub member_count: usize,
    /// Edges with both endpoints in the community, self-loops included
    pub internal_edges: usize,
    pub internal_weight: f64,
    pub influencer: Option<NodeId>,
    pub influence_score: f64,
    pub top_topic: Option<TopicCount>,
}

/// Serializable snapshot of a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub seed: u64,
    pub stats: GraphStats,
    pub modularity: f64,
    pub levels: usize,
    pub partition: Partition,
    pub communities: Vec<CommunitySummary>,
    pub influencers: BTreeMap<CommunityId, Influencer>,
    pub trending: Vec<TopicCount>,
    pub sentiment: SentimentDistribution,
}

impl AnalysisReport {
    pub fn to_json(&self) -> AgoraResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Results of one analysis run
#[derive(Debug, Clone)]
pub struct Analysis {
    seed: u64,
    graph: InteractionGraph,
    detection: Detection,
    topics: TopicIndex,
    influencers: BTreeMap<CommunityId, Influencer>,
    sentiment: Vec<SentimentRecord>,
}

impl Analysis {
    /// Run the full pipeline over interaction records
    pub fn run(records: &[EdgeRecord], config: &AnalysisConfig) -> AgoraResult<Self> {
        config.validate()?;
        if records.is_empty() {
            tracing::warn!("No interaction records, analysis will be empty");
        }

        let graph = InteractionGraph::from_records(records);
        let detection = CommunityDetector::with_config(config.detection.clone()).run(&graph);
        let topics = TopicIndex::build(records, &detection.partition)?;
        let influencers = InfluenceRanker::new(&graph, &detection.partition).rank(None)?;
        let sentiment =
            SentimentClassifier::from_config(&config.sentiment).classify_records(topics.records());

        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            communities = detection.partition.community_count(),
            modularity = detection.modularity,
            "Analysis complete"
        );

        Ok(Self {
            seed: config.detection.seed,
            graph,
            detection,
            topics,
            influencers,
            sentiment,
        })
    }

    /// Validate and parse CSV input, then run
    pub fn from_csv<R: Read>(reader: R, config: &AnalysisConfig) -> AgoraResult<Self> {
        let records = agora_core::read_records(reader)?;
        Self::run(&records, config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> AgoraResult<Self> {
        let records = agora_core::read_records_from_path(path)?;
        Self::run(&records, config)
    }

    pub fn graph(&self) -> &InteractionGraph {
        &self.graph
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    pub fn partition(&self) -> &Partition {
        &self.detection.partition
    }

    pub fn modularity(&self) -> f64 {
        self.detection.modularity
    }

    /// Community ids, ascending
    pub fn communities(&self) -> Vec<CommunityId> {
        self.detection.partition.community_ids()
    }

    pub fn community_of(&self, node: &str) -> AgoraResult<CommunityId> {
        self.detection
            .partition
            .community_of(node)
            .ok_or_else(|| AgoraError::lookup(node))
    }

    /// Members of a community in graph insertion order
    pub fn roster(&self, community: CommunityId) -> AgoraResult<&[NodeId]> {
        self.ensure_community(community)?;
        Ok(self.detection.partition.members(community))
    }

    /// Top influencer of every community
    pub fn influencers(&self) -> &BTreeMap<CommunityId, Influencer> {
        &self.influencers
    }

    pub fn influencer(&self, community: CommunityId) -> AgoraResult<&Influencer> {
        self.influencers
            .get(&community)
            .ok_or(AgoraError::UnknownCommunity(community))
    }

    /// Full member ranking of one community, best first
    pub fn member_scores(&self, community: CommunityId) -> AgoraResult<Vec<NodeScore>> {
        InfluenceRanker::new(&self.graph, &self.detection.partition).scores(community)
    }

    pub fn trending_topics(&self, community: CommunityId) -> Vec<TopicCount> {
        self.topics.trending_topics(community)
    }

    pub fn trending_topics_global(&self) -> Vec<TopicCount> {
        self.topics.trending_topics_global()
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.topics.search(query)
    }

    /// Every classified topic record, in input order
    pub fn sentiment_records(&self) -> &[SentimentRecord] {
        &self.sentiment
    }

    /// Classified topic records of one community, in input order
    pub fn sentiment_table(&self, community: CommunityId) -> Vec<SentimentRecord> {
        self.sentiment
            .iter()
            .filter(|record| record.community == community)
            .cloned()
            .collect()
    }

    pub fn sentiment_distribution(&self) -> SentimentDistribution {
        SentimentDistribution::from_records(&self.sentiment)
    }

    pub fn community_summary(&self, community: CommunityId) -> AgoraResult<CommunitySummary> {
        self.ensure_community(community)?;

        let partition = &self.detection.partition;
        let mut internal_edges = 0;
        let mut internal_weight = 0.0;
        for edge in self.graph.edges() {
            let inside = [edge.source, edge.target].iter().all(|&idx| {
                self.graph
                    .node_id(idx)
                    .and_then(|node| partition.community_of(node))
                    == Some(community)
            });
            if inside {
                internal_edges += 1;
                internal_weight += edge.weight;
            }
        }

        let influencer = self.influencers.get(&community);
        Ok(CommunitySummary {
            id: community,
            member_count: partition.members(community).len(),
            internal_edges,
            internal_weight,
            influencer: influencer.map(|i| i.node.clone()),
            influence_score: influencer.map(|i| i.score).unwrap_or(0.0),
            top_topic: self.trending_topics(community).into_iter().next(),
        })
    }

    pub fn summaries(&self) -> AgoraResult<Vec<CommunitySummary>> {
        self.communities()
            .into_iter()
            .map(|id| self.community_summary(id))
            .collect()
    }

    pub fn report(&self) -> AgoraResult<AnalysisReport> {
        Ok(AnalysisReport {
            seed: self.seed,
            stats: self.stats(),
            modularity: self.detection.modularity,
            levels: self.detection.levels,
            partition: self.detection.partition.clone(),
            communities: self.summaries()?,
            influencers: self.influencers.clone(),
            trending: self.trending_topics_global(),
            sentiment: self.sentiment_distribution(),
        })
    }

    fn ensure_community(&self, community: CommunityId) -> AgoraResult<()> {
        if self.detection.partition.contains_community(community) {
            Ok(())
        } else {
            Err(AgoraError::UnknownCommunity(community))
        }
    }
}
