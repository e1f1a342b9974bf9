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

//! Agora Core
//!
//! Shared data model, error type, configuration and tabular intake for the
//! agora community analysis engine.
//!
//! The analytical work (graph construction, community detection, influence
//! ranking, topic indexing and sentiment) lives in `agora-insights`; this
//! crate only defines what flows into it.

pub mod config;
pub mod error;
pub mod intake;
pub mod record;

pub use config::{AnalysisConfig, DetectionConfig, SentimentConfig};
pub use error::{AgoraError, AgoraResult};
pub use intake::{read_records, read_records_from_path, validate_columns, REQUIRED_COLUMNS};
pub use record::{CommunityId, EdgeRecord, NodeId, DEFAULT_WEIGHT};
