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

//! Agora error types

use thiserror::Error;

use crate::record::{CommunityId, NodeId};

/// Result type for analysis operations
pub type AgoraResult<T> = Result<T, AgoraError>;

/// Errors raised to the caller of the analysis engine
#[derive(Debug, Error)]
pub enum AgoraError {
    /// Required input columns are missing
    #[error("Input is missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A record references a node absent from the computed partition
    #[error("Node not found in partition: {node}")]
    Lookup { node: NodeId },

    /// A ranking request named a community the partition does not contain
    #[error("Unknown community: {0}")]
    UnknownCommunity(CommunityId),

    /// Malformed tabular input
    #[error("CSV error: {0}")]
    Csv(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgoraError {
    /// Build a schema error, sorting the missing column names
    pub fn schema<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut missing: Vec<String> = missing.into_iter().map(Into::into).collect();
        missing.sort();
        AgoraError::Schema { missing }
    }

    /// Build a lookup error for the offending node
    pub fn lookup(node: impl Into<NodeId>) -> Self {
        AgoraError::Lookup { node: node.into() }
    }
}

impl From<csv::Error> for AgoraError {
    fn from(e: csv::Error) -> Self {
        AgoraError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for AgoraError {
    fn from(e: serde_json::Error) -> Self {
        AgoraError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for AgoraError {
    fn from(e: toml::de::Error) -> Self {
        AgoraError::Config(e.to_string())
    }
}
