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

//! Sentiment Classifier
//!
//! Lexicon-based polarity scoring for topic strings. Each recognised word
//! contributes its lexicon score, scaled by any intensifier directly before it
//! and damped/flipped by a negation within the preceding few tokens. The
//! polarity is the mean over scored words, clamped to [-1, 1].

use agora_core::{CommunityId, SentimentConfig};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::topics::TopicRecord;

/// How many tokens a negation reaches forward
const NEGATION_WINDOW: usize = 3;

/// Applied to a negated word's score
const NEGATION_FACTOR: f64 = -0.5;

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("good", 0.6),
    ("great", 0.8),
    ("excellent", 0.9),
    ("amazing", 0.9),
    ("awesome", 0.9),
    ("wonderful", 0.9),
    ("fantastic", 0.9),
    ("love", 0.8),
    ("loved", 0.8),
    ("like", 0.4),
    ("best", 0.9),
    ("better", 0.5),
    ("happy", 0.7),
    ("glad", 0.6),
    ("nice", 0.5),
    ("fine", 0.3),
    ("positive", 0.6),
    ("success", 0.7),
    ("successful", 0.7),
    ("win", 0.6),
    ("growth", 0.5),
    ("improve", 0.5),
    ("improved", 0.5),
    ("improvement", 0.5),
    ("benefit", 0.5),
    ("helpful", 0.6),
    ("useful", 0.5),
    ("thanks", 0.5),
    ("thank", 0.5),
    ("agree", 0.4),
    ("support", 0.4),
    ("celebrate", 0.7),
    ("exciting", 0.7),
    ("excited", 0.7),
    ("beautiful", 0.8),
    ("brilliant", 0.9),
    ("perfect", 1.0),
    ("strong", 0.4),
    ("safe", 0.4),
    ("fair", 0.4),
    ("fun", 0.6),
    ("enjoy", 0.6),
    ("pleased", 0.6),
    ("progress", 0.5),
    ("hope", 0.4),
    ("hopeful", 0.5),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("bad", -0.7),
    ("terrible", -0.9),
    ("awful", -0.9),
    ("horrible", -0.9),
    ("hate", -0.8),
    ("hated", -0.8),
    ("worst", -1.0),
    ("worse", -0.6),
    ("poor", -0.6),
    ("sad", -0.6),
    ("angry", -0.7),
    ("annoying", -0.6),
    ("wrong", -0.5),
    ("fail", -0.7),
    ("failed", -0.7),
    ("failure", -0.7),
    ("problem", -0.4),
    ("problems", -0.4),
    ("issue", -0.3),
    ("broken", -0.6),
    ("crisis", -0.7),
    ("decline", -0.5),
    ("loss", -0.5),
    ("lose", -0.5),
    ("risk", -0.3),
    ("danger", -0.6),
    ("dangerous", -0.6),
    ("unfair", -0.6),
    ("disappointing", -0.7),
    ("disappointed", -0.7),
    ("negative", -0.6),
    ("ugly", -0.7),
    ("boring", -0.5),
    ("scary", -0.6),
    ("afraid", -0.5),
    ("worried", -0.5),
    ("worry", -0.5),
    ("complaint", -0.5),
    ("disaster", -0.9),
    ("cut", -0.3),
    ("cuts", -0.3),
    ("delay", -0.4),
    ("delayed", -0.4),
    ("corrupt", -0.8),
    ("useless", -0.7),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("so", 1.2),
    ("too", 1.2),
    ("quite", 1.1),
    ("slightly", 0.6),
    ("somewhat", 0.7),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "neither", "nor", "without", "dont", "don't",
    "doesnt", "doesn't", "didnt", "didn't", "isnt", "isn't", "wasnt", "wasn't", "arent",
    "aren't", "cant", "can't", "cannot", "wont", "won't",
];

/// Discrete sentiment bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentClass {
    Positive,
    Negative,
    Neutral,
}

impl SentimentClass {
    /// Strict sign rule, no dead zone around zero
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            SentimentClass::Positive
        } else if polarity < 0.0 {
            SentimentClass::Negative
        } else {
            SentimentClass::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentClass::Positive => "Positive",
            SentimentClass::Negative => "Negative",
            SentimentClass::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Polarity and class of one string
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub polarity: f64,
    pub class: SentimentClass,
}

impl Sentiment {
    fn from_polarity(polarity: f64) -> Self {
        Self {
            polarity,
            class: SentimentClass::from_polarity(polarity),
        }
    }
}

/// One classified topic record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub community: CommunityId,
    pub topic: String,
    pub class: SentimentClass,
    pub polarity: f64,
}

/// Count per sentiment class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a SentimentRecord>) -> Self {
        let mut dist = Self::default();
        for record in records {
            dist.add(record.class);
        }
        dist
    }

    pub fn add(&mut self, class: SentimentClass) {
        match class {
            SentimentClass::Positive => self.positive += 1,
            SentimentClass::Negative => self.negative += 1,
            SentimentClass::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, class: SentimentClass) -> usize {
        match class {
            SentimentClass::Positive => self.positive,
            SentimentClass::Negative => self.negative,
            SentimentClass::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Stateless lexicon scorer
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    lexicon: HashMap<String, f64>,
    intensifiers: HashMap<&'static str, f64>,
    negations: HashSet<String>,
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentClassifier {
    /// Built-in lexicon only
    pub fn new() -> Self {
        Self::from_config(&SentimentConfig::default())
    }

    /// Built-in lexicon with configured overrides applied on top
    pub fn from_config(config: &SentimentConfig) -> Self {
        let mut lexicon: HashMap<String, f64> = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS)
            .map(|(word, score)| (word.to_string(), *score))
            .collect();
        for (word, score) in &config.lexicon {
            if !score.is_finite() {
                tracing::warn!(word = %word, "Ignoring non-finite lexicon score");
                continue;
            }
            lexicon.insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
        }

        let negations = if config.negations.is_empty() {
            NEGATIONS.iter().map(|w| w.to_string()).collect()
        } else {
            config.negations.iter().map(|w| w.to_lowercase()).collect()
        };

        Self {
            lexicon,
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negations,
        }
    }

    /// Polarity in [-1, 1]; strings without scored words are 0
    pub fn polarity(&self, text: &str) -> f64 {
        let mut scores = Vec::new();
        let mut boost = 1.0;
        // tokens left in which a negation still applies
        let mut negated = 0usize;

        for token in tokenize(text) {
            if self.negations.contains(&token) {
                negated = NEGATION_WINDOW;
                boost = 1.0;
            } else if let Some(factor) = self.intensifiers.get(token.as_str()) {
                boost *= factor;
            } else if let Some(&base) = self.lexicon.get(&token) {
                let mut score = base * boost;
                if negated > 0 {
                    score *= NEGATION_FACTOR;
                    negated = 0;
                }
                scores.push(score);
                boost = 1.0;
            } else {
                negated = negated.saturating_sub(1);
                boost = 1.0;
            }
        }

        if scores.is_empty() {
            return 0.0;
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let polarity = mean.clamp(-1.0, 1.0);
        // normalise -0.0
        if polarity == 0.0 {
            0.0
        } else {
            polarity
        }
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        Sentiment::from_polarity(self.polarity(text))
    }

    /// Classify topic records, preserving their order
    pub fn classify_records(&self, records: &[TopicRecord]) -> Vec<SentimentRecord> {
        records
            .iter()
            .map(|record| {
                let sentiment = self.classify(&record.topic);
                SentimentRecord {
                    community: record.community,
                    topic: record.topic.clone(),
                    class: sentiment.class,
                    polarity: sentiment.polarity,
                }
            })
            .collect()
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\'').to_lowercase())
        .filter(|t| !t.is_empty())
}
