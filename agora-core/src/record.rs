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

//! Interaction records and identifier types

use serde::{Deserialize, Serialize};

/// Opaque participant identifier
pub type NodeId = String;

/// Community label assigned by detection
pub type CommunityId = u32;

/// Weight used when a record carries none (or an unparseable one)
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One row of the interaction table: who talked to whom, about what
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Originating participant
    pub source: NodeId,
    /// Receiving participant
    pub target: NodeId,
    /// Topic of the conversation
    pub conversation: String,
    /// Interaction strength
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

impl EdgeRecord {
    /// Create a record with the default weight
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        conversation: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            conversation: conversation.into(),
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Set the weight; non-finite values fall back to the default
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = if weight.is_finite() {
            weight
        } else {
            DEFAULT_WEIGHT
        };
        self
    }

    /// True when source and target name the same participant
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
