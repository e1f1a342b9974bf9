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

//! Topic Index
//!
//! Attributes every record's conversation topic to the community of the
//! record's *source* node (never the target) and answers frequency and
//! substring queries over the attributed topics.

use agora_core::{AgoraError, AgoraResult, CommunityId, EdgeRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::partition::Partition;

/// A topic attributed to a community
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub community: CommunityId,
    pub topic: String,
}

/// A topic and how many records mention it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

/// A community matching a topic search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub community: CommunityId,
    /// Number of member nodes in the community
    pub member_count: usize,
}

/// Topics per community, in input order, duplicates retained
#[derive(Debug, Clone, Default)]
pub struct TopicIndex {
    records: Vec<TopicRecord>,
    by_community: BTreeMap<CommunityId, Vec<String>>,
    member_counts: BTreeMap<CommunityId, usize>,
}

impl TopicIndex {
    /// Attribute every record to its source node's community
    pub fn build(records: &[EdgeRecord], partition: &Partition) -> AgoraResult<Self> {
        let mut topic_records = Vec::with_capacity(records.len());
        let mut by_community: BTreeMap<CommunityId, Vec<String>> = BTreeMap::new();

        for record in records {
            let community = partition
                .community_of(&record.source)
                .ok_or_else(|| AgoraError::lookup(record.source.clone()))?;

            by_community
                .entry(community)
                .or_default()
                .push(record.conversation.clone());
            topic_records.push(TopicRecord {
                community,
                topic: record.conversation.clone(),
            });
        }

        let member_counts = partition
            .rosters()
            .iter()
            .map(|(&community, members)| (community, members.len()))
            .collect();

        Ok(Self {
            records: topic_records,
            by_community,
            member_counts,
        })
    }

    /// All attributed topics, in input order
    pub fn records(&self) -> &[TopicRecord] {
        &self.records
    }

    /// Topics of one community, in input order
    pub fn topics(&self, community: CommunityId) -> &[String] {
        self.by_community
            .get(&community)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Topics of a community by descending count, ties by first occurrence
    pub fn trending_topics(&self, community: CommunityId) -> Vec<TopicCount> {
        most_common(self.topics(community).iter().map(String::as_str))
    }

    /// Same ranking over every record
    pub fn trending_topics_global(&self) -> Vec<TopicCount> {
        most_common(self.records.iter().map(|r| r.topic.as_str()))
    }

    /// Communities with at least one topic containing `query`,
    /// case-insensitively. An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        self.by_community
            .iter()
            .filter(|(_, topics)| topics.iter().any(|t| t.to_lowercase().contains(&needle)))
            .map(|(&community, _)| SearchHit {
                community,
                member_count: self.member_counts.get(&community).copied().unwrap_or(0),
            })
            .collect()
    }
}

/// Count occurrences, most frequent first, ties in first-seen order
fn most_common<'a, I>(topics: I) -> Vec<TopicCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<TopicCount> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for topic in topics {
        match positions.get(topic) {
            Some(&i) => counts[i].count += 1,
            None => {
                positions.insert(topic, counts.len());
                counts.push(TopicCount {
                    topic: topic.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition() -> Partition {
        Partition::from_pairs(
            [("A", 0), ("B", 0), ("C", 0), ("D", 1), ("E", 1)]
                .into_iter()
                .map(|(n, c)| (n.to_string(), c)),
        )
    }

    fn records() -> Vec<EdgeRecord> {
        vec![
            EdgeRecord::new("A", "B", "budget"),
            EdgeRecord::new("B", "C", "budget"),
            EdgeRecord::new("C", "A", "budget"),
            EdgeRecord::new("D", "E", "weather"),
        ]
    }

    #[test]
    fn test_topics_attributed_to_source_community() {
        let index = TopicIndex::build(&records(), &partition()).unwrap();

        assert_eq!(index.topics(0), &["budget", "budget", "budget"]);
        assert_eq!(index.topics(1), &["weather"]);
        assert!(index.topics(7).is_empty());
    }

    #[test]
    fn test_source_only_attribution() {
        // D is in community 1, the target A in community 0
        let index = TopicIndex::build(&[EdgeRecord::new("D", "A", "crossover")], &partition())
            .unwrap();
        assert_eq!(index.topics(1), &["crossover"]);
        assert!(index.topics(0).is_empty());
    }

    #[test]
    fn test_trending_ties_keep_first_occurrence() {
        let records = vec![
            EdgeRecord::new("A", "B", "rent"),
            EdgeRecord::new("A", "B", "tax"),
            EdgeRecord::new("B", "C", "tax"),
            EdgeRecord::new("C", "A", "rent"),
            EdgeRecord::new("C", "A", "parks"),
        ];
        let index = TopicIndex::build(&records, &partition()).unwrap();

        let trending = index.trending_topics(0);
        let order: Vec<(&str, usize)> = trending.iter().map(|t| (t.topic.as_str(), t.count)).collect();
        assert_eq!(order, vec![("rent", 2), ("tax", 2), ("parks", 1)]);
    }

    #[test]
    fn test_trending_global() {
        let index = TopicIndex::build(&records(), &partition()).unwrap();
        let global = index.trending_topics_global();
        assert_eq!(global[0], TopicCount { topic: "budget".into(), count: 3 });
        assert_eq!(global[1], TopicCount { topic: "weather".into(), count: 1 });
    }

    #[test]
    fn test_search_case_insensitive() {
        let index = TopicIndex::build(&records(), &partition()).unwrap();

        assert_eq!(
            index.search("BUDGET"),
            vec![SearchHit { community: 0, member_count: 3 }]
        );
        assert_eq!(
            index.search("ea"),
            vec![SearchHit { community: 1, member_count: 2 }]
        );
        assert!(index.search("").is_empty());
        assert!(index.search("sports").is_empty());
    }

    #[test]
    fn test_search_keeps_whitespace() {
        let records = vec![
            EdgeRecord::new("A", "B", "taxes"),
            EdgeRecord::new("D", "E", "budget talk"),
        ];
        let index = TopicIndex::build(&records, &partition()).unwrap();

        assert!(index.search("x ").is_empty());
        assert_eq!(
            index.search(" "),
            vec![SearchHit { community: 1, member_count: 2 }]
        );
        assert_eq!(
            index.search(" TALK"),
            vec![SearchHit { community: 1, member_count: 2 }]
        );
    }

    #[test]
    fn test_unknown_source_is_lookup_error() {
        let err = TopicIndex::build(&[EdgeRecord::new("Z", "A", "x")], &partition()).unwrap_err();
        assert!(matches!(err, AgoraError::Lookup { node } if node == "Z"));
    }

    #[test]
    fn test_empty_records() {
        let index = TopicIndex::build(&[], &Partition::default()).unwrap();
        assert!(index.records().is_empty());
        assert!(index.trending_topics_global().is_empty());
    }
}
