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

//! Agora Insights
//!
//! Community analysis over a labeled interaction graph:
//! - Graph construction with last-write-wins edge weights
//! - Seeded Louvain community detection
//! - Per-community influencer ranking (degree, betweenness, closeness)
//! - Topic indexing, trending topics and case-insensitive search
//! - Lexicon-based topic sentiment
//!
//! ## Architecture
//!
//! ```text
//! EdgeRecords → InteractionGraph → CommunityDetector → Partition
//!                                                         ↓
//!                                     ┌───────────────────┴───────────────────┐
//!                                TopicIndex                           InfluenceRanker
//!                                     ↓                                       ↓
//!                           SentimentClassifier                          Influencers
//! ```
//!
//! [`Analysis`] runs the whole chain once and exposes the results read-only.
//! Given the same records and seed every output is identical.

pub mod analysis;
pub mod centrality;
pub mod graph;
pub mod influence;
pub mod louvain;
pub mod partition;
pub mod sentiment;
pub mod topics;

pub use analysis::{Analysis, AnalysisReport, CommunitySummary};
pub use centrality::{Centrality, Subgraph};
pub use graph::{GraphEdge, GraphStats, InteractionGraph, NodeIndex};
pub use influence::{InfluenceRanker, Influencer, NodeScore};
pub use louvain::{modularity, CommunityDetector, Detection};
pub use partition::Partition;
pub use sentiment::{
    Sentiment, SentimentClass, SentimentClassifier, SentimentDistribution, SentimentRecord,
};
pub use topics::{SearchHit, TopicCount, TopicIndex, TopicRecord};
