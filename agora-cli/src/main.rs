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

//! Agora CLI
//!
//! Loads an interaction CSV, runs the analysis pipeline and prints the
//! requested view as text or JSON. All computation happens in
//! `agora-insights`.

use agora_core::{AnalysisConfig, CommunityId};
use agora_insights::{Analysis, SentimentClass, TopicCount};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "agora")]
#[command(about = "Agora - community analysis for interaction graphs", long_about = None)]
struct Cli {
    /// Interaction table (CSV with source, target, conversation[, weight])
    #[arg(short, long)]
    input: PathBuf,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the detection seed
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List communities with their influencer and top topic
    Communities,

    /// Show one community's members, rankings and topics
    Community {
        /// Community ID
        id: CommunityId,
    },

    /// Find communities discussing a topic (case-insensitive)
    Search {
        /// Substring to look for
        query: String,
    },

    /// Most discussed topics
    Trending {
        /// Restrict to one community
        #[arg(long)]
        community: Option<CommunityId>,

        /// Maximum topics to print
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Topic sentiment
    Sentiment {
        /// Show the table for one community instead of the distribution
        #[arg(long)]
        community: Option<CommunityId>,
    },

    /// Full analysis report
    Report,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays clean
    let default_filter = if cli.verbose {
        "agora=debug,agora_core=debug,agora_insights=debug"
    } else {
        "agora=info,agora_core=info,agora_insights=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = AnalysisConfig::load(cli.config.clone()).context("Failed to load config")?;
    if let Some(seed) = cli.seed {
        config.detection.seed = seed;
    }

    info!("Analyzing {:?} (seed {})", cli.input, config.detection.seed);
    let analysis = Analysis::from_path(&cli.input, &config)
        .with_context(|| format!("Failed to analyze {}", cli.input.display()))?;

    match cli.command {
        Commands::Communities => {
            let summaries = analysis.summaries()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                println!(
                    "{} communities, modularity {:.4}",
                    summaries.len(),
                    analysis.modularity()
                );
                for s in &summaries {
                    println!(
                        "  #{:<3} {:>4} members  influencer: {} ({:.3})  top topic: {}",
                        s.id,
                        s.member_count,
                        s.influencer.as_deref().unwrap_or("-"),
                        s.influence_score,
                        s.top_topic.as_ref().map(|t| t.topic.as_str()).unwrap_or("-"),
                    );
                }
            }
        }

        Commands::Community { id } => {
            let summary = analysis.community_summary(id)?;
            let roster = analysis.roster(id)?;
            let scores = analysis.member_scores(id)?;
            let trending = analysis.trending_topics(id);

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "summary": summary,
                        "members": roster,
                        "scores": scores,
                        "trending": trending,
                    }))?
                );
            } else {
                println!("Community #{}", id);
                println!("  Members ({}): {}", roster.len(), roster.join(", "));
                println!(
                    "  Internal edges: {} (weight {:.2})",
                    summary.internal_edges, summary.internal_weight
                );
                println!("  Ranking:");
                for s in &scores {
                    println!(
                        "    {:<20} score {:.3}  degree {:.3}  betweenness {:.3}  closeness {:.3}",
                        s.node, s.score, s.degree, s.betweenness, s.closeness
                    );
                }
                print_topics("  Trending:", &trending, usize::MAX);
            }
        }

        Commands::Search { query } => {
            let hits = analysis.search(&query);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else if hits.is_empty() {
                println!("No community discusses '{}'", query);
            } else {
                for hit in &hits {
                    println!("  #{:<3} {} members", hit.community, hit.member_count);
                }
            }
        }

        Commands::Trending { community, limit } => {
            let mut topics = match community {
                Some(id) => {
                    analysis.roster(id)?;
                    analysis.trending_topics(id)
                }
                None => analysis.trending_topics_global(),
            };
            topics.truncate(limit);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&topics)?);
            } else {
                print_topics("Trending:", &topics, limit);
            }
        }

        Commands::Sentiment { community } => match community {
            Some(id) => {
                analysis.roster(id)?;
                let table = analysis.sentiment_table(id);
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&table)?);
                } else {
                    for record in &table {
                        println!(
                            "  {:<9} {:>+.3}  {}",
                            record.class, record.polarity, record.topic
                        );
                    }
                }
            }
            None => {
                let dist = analysis.sentiment_distribution();
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&dist)?);
                } else {
                    for class in [
                        SentimentClass::Positive,
                        SentimentClass::Negative,
                        SentimentClass::Neutral,
                    ] {
                        println!("  {:<9} {}", class, dist.get(class));
                    }
                }
            }
        },

        Commands::Report => {
            let report = analysis.report()?;
            if cli.json {
                println!("{}", report.to_json()?);
            } else {
                let stats = &report.stats;
                println!("Nodes: {}  Edges: {}", stats.node_count, stats.edge_count);
                println!("Total weight: {:.2}  Density: {:.4}", stats.total_weight, stats.density);
                println!(
                    "Communities: {}  Modularity: {:.4}",
                    report.communities.len(),
                    report.modularity
                );
                println!(
                    "Sentiment: {} positive, {} negative, {} neutral",
                    report.sentiment.positive, report.sentiment.negative, report.sentiment.neutral
                );
                print_topics("Trending:", &report.trending, 10);
            }
        }
    }

    Ok(())
}

fn print_topics(heading: &str, topics: &[TopicCount], limit: usize) {
    println!("{}", heading);
    if topics.is_empty() {
        println!("    (none)");
    }
    for topic in topics.iter().take(limit) {
        println!("    {:>4}  {}", topic.count, topic.topic);
    }
}
