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

//! Integration tests for the analysis pipeline

use agora_core::{AgoraError, AnalysisConfig, DetectionConfig, EdgeRecord};
use agora_insights::{
    Analysis, CommunityDetector, InfluenceRanker, InteractionGraph, Partition, SentimentClass,
    SentimentClassifier,
};
use proptest::prelude::*;

fn rec(source: &str, target: &str, topic: &str, weight: f64) -> EdgeRecord {
    EdgeRecord::new(source, target, topic).with_weight(weight)
}

fn triangle_and_pair() -> Vec<EdgeRecord> {
    vec![
        rec("A", "B", "budget", 1.0),
        rec("B", "C", "budget", 1.0),
        rec("C", "A", "budget", 1.0),
        rec("D", "E", "weather", 1.0),
    ]
}

fn config_with_seed(seed: u64) -> AnalysisConfig {
    AnalysisConfig {
        detection: DetectionConfig::with_seed(seed),
        ..Default::default()
    }
}

/// Triangle and disjoint pair split into two communities
#[test]
fn test_triangle_and_pair() {
    let analysis = Analysis::run(&triangle_and_pair(), &AnalysisConfig::default()).unwrap();

    let a = analysis.community_of("A").unwrap();
    let d = analysis.community_of("D").unwrap();
    assert_ne!(a, d);
    assert_eq!(analysis.roster(a).unwrap(), ["A", "B", "C"]);
    assert_eq!(analysis.roster(d).unwrap(), ["D", "E"]);

    let budget = analysis.trending_topics(a);
    assert_eq!(budget.len(), 1);
    assert_eq!(budget[0].topic, "budget");
    assert_eq!(budget[0].count, 3);

    let weather = analysis.trending_topics(d);
    assert_eq!(weather[0].topic, "weather");
    assert_eq!(weather[0].count, 1);
}

/// Topic search ignores case
#[test]
fn test_search_is_case_insensitive() {
    let analysis = Analysis::run(&triangle_and_pair(), &AnalysisConfig::default()).unwrap();
    let a = analysis.community_of("A").unwrap();

    let hits = analysis.search("BUDGET");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].community, a);
    assert_eq!(hits[0].member_count, 3);

    assert!(analysis.search("").is_empty());
    // whitespace is part of the needle
    assert!(analysis.search("budget ").is_empty());
    assert!(analysis.search("sports").is_empty());
}

/// An isolated node is its own community with a zero score
#[test]
fn test_singleton_influencer() {
    let mut graph = InteractionGraph::from_records(&triangle_and_pair());
    graph.get_or_create_node("X");
    let partition = CommunityDetector::new().detect(&graph);

    let x = partition.community_of("X").unwrap();
    assert_eq!(partition.members(x), ["X"]);

    let influencers = InfluenceRanker::new(&graph, &partition).rank(Some(&[x])).unwrap();
    assert_eq!(influencers[&x].node, "X");
    assert_eq!(influencers[&x].score, 0.0);
}

/// A node whose only edge is to itself scores zero too
#[test]
fn test_self_loop_only_node() {
    let mut records = triangle_and_pair();
    records.push(rec("X", "X", "monologue", 2.0));
    let analysis = Analysis::run(&records, &AnalysisConfig::default()).unwrap();

    let x = analysis.community_of("X").unwrap();
    assert_eq!(analysis.roster(x).unwrap(), ["X"]);
    assert_eq!(analysis.influencer(x).unwrap().score, 0.0);
}

/// Last record for a pair sets its weight, in either direction
#[test]
fn test_last_write_wins() {
    let records = vec![rec("A", "B", "t", 1.0), rec("B", "A", "t", 5.0)];
    let graph = InteractionGraph::from_records(&records);

    assert_eq!(graph.edge_count(), 1);
    let (a, b) = (graph.index_of("A").unwrap(), graph.index_of("B").unwrap());
    assert_eq!(graph.weight_between(a, b), Some(5.0));
}

/// Same input and seed give identical output
#[test]
fn test_determinism() {
    let mut records = triangle_and_pair();
    records.extend([
        rec("C", "D", "bridge", 0.5),
        rec("E", "F", "weather", 1.0),
        rec("F", "D", "storm", 1.0),
        rec("G", "A", "budget", 2.0),
    ]);

    let first = Analysis::run(&records, &config_with_seed(7)).unwrap();
    let second = Analysis::run(&records, &config_with_seed(7)).unwrap();

    assert_eq!(first.partition(), second.partition());
    assert_eq!(first.influencers(), second.influencers());
    assert_eq!(first.sentiment_records(), second.sentiment_records());
    assert_eq!(first.report().unwrap(), second.report().unwrap());
}

/// Polarity sign decides the class
#[test]
fn test_sentiment_examples() {
    let classifier = SentimentClassifier::new();

    let positive = classifier.classify("excellent progress on the budget");
    assert!(positive.polarity > 0.0);
    assert_eq!(positive.class, SentimentClass::Positive);

    let negative = classifier.classify("the weather was awful");
    assert!(negative.polarity < 0.0);
    assert_eq!(negative.class, SentimentClass::Negative);

    for text in ["", "weather", "quarterly budget meeting"] {
        let neutral = classifier.classify(text);
        assert_eq!(neutral.polarity, 0.0);
        assert_eq!(neutral.class, SentimentClass::Neutral);
    }
}

/// Schema validation runs before any row is parsed
#[test]
fn test_missing_columns() {
    let csv = "from,to,conversation\nA,B,hi\n";
    let err = Analysis::from_csv(csv.as_bytes(), &AnalysisConfig::default()).unwrap_err();
    match err {
        AgoraError::Schema { missing } => assert_eq!(missing, vec!["source", "target"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unknown_community() {
    let analysis = Analysis::run(&triangle_and_pair(), &AnalysisConfig::default()).unwrap();
    assert!(matches!(
        analysis.influencer(42),
        Err(AgoraError::UnknownCommunity(42))
    ));
    assert!(matches!(
        analysis.member_scores(42),
        Err(AgoraError::UnknownCommunity(42))
    ));
}

fn arb_records() -> impl Strategy<Value = Vec<EdgeRecord>> {
    let node = (0u8..8).prop_map(|i| format!("n{i}"));
    let topic = prop_oneof![
        Just("budget"),
        Just("great weather"),
        Just("not good"),
        Just("sports"),
    ];
    prop::collection::vec((node.clone(), node, topic, 0.5f64..3.0), 0..24).prop_map(|rows| {
        rows.into_iter()
            .map(|(s, t, topic, w)| rec(&s, &t, topic, w))
            .collect()
    })
}

fn assert_covers(graph: &InteractionGraph, partition: &Partition) {
    assert_eq!(partition.len(), graph.node_count());
    let rostered: usize = partition.rosters().values().map(Vec::len).sum();
    assert_eq!(rostered, graph.node_count());
    for node in graph.nodes() {
        assert!(partition.community_of(node).is_some(), "{node} unassigned");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn partition_covers_every_node_once(records in arb_records(), seed in any::<u64>()) {
        let analysis = Analysis::run(&records, &config_with_seed(seed)).unwrap();
        assert_covers(analysis.graph(), analysis.partition());

        let ids = analysis.communities();
        let expected: Vec<u32> = (0..ids.len() as u32).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn influencers_belong_and_scores_in_range(records in arb_records()) {
        let analysis = Analysis::run(&records, &AnalysisConfig::default()).unwrap();

        for (&community, influencer) in analysis.influencers() {
            prop_assert_eq!(analysis.community_of(&influencer.node).unwrap(), community);
            for score in analysis.member_scores(community).unwrap() {
                prop_assert!((0.0..=1.0).contains(&score.score));
                prop_assert!(score.score <= influencer.score);
            }
        }
        prop_assert_eq!(analysis.influencers().len(), analysis.communities().len());
    }

    #[test]
    fn trending_counts_match_records(records in arb_records()) {
        let analysis = Analysis::run(&records, &AnalysisConfig::default()).unwrap();

        for community in analysis.communities() {
            let counted: usize = analysis
                .trending_topics(community)
                .iter()
                .map(|t| t.count)
                .sum();
            let sourced = records
                .iter()
                .filter(|r| analysis.community_of(&r.source).unwrap() == community)
                .count();
            prop_assert_eq!(counted, sourced);
        }
        prop_assert_eq!(analysis.sentiment_distribution().total(), records.len());
    }
}
