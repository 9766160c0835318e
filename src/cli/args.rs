//! Command line argument parsing
//!
//! This module handles CLI argument parsing with subcommands:
//! - `mst`: Minimum spanning tree over a user's tasks
//! - `flow`: Maximum flow through a user's task costs
//! - `similar-users`: Owners of tasks sharing a start task's category
//! - `similar-tasks`: Task pairs with similar names
//! - `huffman`: Huffman codes for category names or arbitrary text
//! - `reminders`: Tasks with upcoming deadlines
//! - `show-config`: Show configuration discovery information

use crate::graph::{FlowAlgorithm, Traversal};
use crate::task::{TaskId, UserId};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlowArg {
    FordFulkerson,
    EdmondsKarp,
    Dinic,
}

impl From<FlowArg> for FlowAlgorithm {
    fn from(arg: FlowArg) -> Self {
        match arg {
            FlowArg::FordFulkerson => FlowAlgorithm::FordFulkerson,
            FlowArg::EdmondsKarp => FlowAlgorithm::EdmondsKarp,
            FlowArg::Dinic => FlowAlgorithm::Dinic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraversalArg {
    Bfs,
    Dfs,
}

impl From<TraversalArg> for Traversal {
    fn from(arg: TraversalArg) -> Self {
        match arg {
            TraversalArg::Bfs => Traversal::Bfs,
            TraversalArg::Dfs => Traversal::Dfs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CostArg {
    /// Uniform random costs in [1, 10)
    Random,
    /// |cost(a) - cost(b)| + 1
    Difference,
}

/// What to run, resolved from the parsed arguments
#[derive(Debug, PartialEq)]
pub enum ExecutionMode {
    Analysis(AnalysisRequest),
    ShowConfig,
}

/// A single analysis over a dataset
#[derive(Debug, PartialEq)]
pub struct AnalysisRequest {
    pub data: PathBuf,
    pub config_override: Option<PathBuf>,
    pub command: AnalysisCommand,
}

#[derive(Debug, PartialEq)]
pub enum AnalysisCommand {
    Mst {
        owner: Option<UserId>,
        costs: CostArg,
        seed: Option<u64>,
    },
    Flow {
        owner: Option<UserId>,
        algorithm: Option<FlowAlgorithm>,
    },
    SimilarUsers {
        start: TaskId,
        traversal: Option<Traversal>,
    },
    SimilarTasks {
        owner: Option<UserId>,
        threshold: Option<f64>,
    },
    Huffman {
        text: Option<String>,
    },
    Reminders {
        today: Option<NaiveDate>,
        days: Option<u32>,
    },
}

#[derive(Debug, Parser)]
#[command(name = "taskscheduler")]
#[command(author = "Taskscheduler Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Graph, flow, similarity and Huffman analyses over personal task data")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Minimum spanning tree over tasks (Prim's algorithm)
    Mst {
        /// Dataset file (JSON)
        #[arg(short = 'd', long = "data")]
        data: PathBuf,
        /// Only use tasks owned by this user
        #[arg(short = 'o', long = "owner")]
        owner: Option<UserId>,
        /// Edge cost model
        #[arg(long = "costs", value_enum, default_value = "random")]
        costs: CostArg,
        /// Seed for random costs (overrides config)
        #[arg(long = "seed")]
        seed: Option<u64>,
    },
    /// Maximum flow from a virtual source through task costs to a sink
    Flow {
        #[arg(short = 'd', long = "data")]
        data: PathBuf,
        #[arg(short = 'o', long = "owner")]
        owner: Option<UserId>,
        /// Algorithm (defaults to the configured one)
        #[arg(short = 'a', long = "algorithm", value_enum)]
        algorithm: Option<FlowArg>,
    },
    /// Owners of tasks sharing the start task's category
    SimilarUsers {
        #[arg(short = 'd', long = "data")]
        data: PathBuf,
        /// Task to start from
        #[arg(short = 's', long = "start")]
        start: TaskId,
        /// Traversal order (defaults to the configured one)
        #[arg(short = 't', long = "traversal", value_enum)]
        traversal: Option<TraversalArg>,
    },
    /// Task pairs whose names are similar (LCS ratio)
    SimilarTasks {
        #[arg(short = 'd', long = "data")]
        data: PathBuf,
        #[arg(short = 'o', long = "owner")]
        owner: Option<UserId>,
        /// Minimum ratio in [0, 1] (overrides config)
        #[arg(long = "threshold")]
        threshold: Option<f64>,
    },
    /// Huffman codes for the category names, or for --text
    Huffman {
        #[arg(short = 'd', long = "data")]
        data: PathBuf,
        /// Encode this text instead of the category names
        #[arg(long = "text")]
        text: Option<String>,
    },
    /// Tasks with deadlines in the coming days
    Reminders {
        #[arg(short = 'd', long = "data")]
        data: PathBuf,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long = "today")]
        today: Option<NaiveDate>,
        /// Window length in days (overrides config)
        #[arg(long = "days")]
        days: Option<u32>,
    },
    /// Show configuration discovery information
    ShowConfig,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Result<ExecutionMode, String> {
        let (data, command) = match &self.command {
            Some(Commands::Mst {
                data,
                owner,
                costs,
                seed,
            }) => (
                data,
                AnalysisCommand::Mst {
                    owner: *owner,
                    costs: *costs,
                    seed: *seed,
                },
            ),
            Some(Commands::Flow {
                data,
                owner,
                algorithm,
            }) => (
                data,
                AnalysisCommand::Flow {
                    owner: *owner,
                    algorithm: algorithm.map(Into::into),
                },
            ),
            Some(Commands::SimilarUsers {
                data,
                start,
                traversal,
            }) => (
                data,
                AnalysisCommand::SimilarUsers {
                    start: *start,
                    traversal: traversal.map(Into::into),
                },
            ),
            Some(Commands::SimilarTasks {
                data,
                owner,
                threshold,
            }) => {
                if let Some(t) = threshold {
                    if !(0.0..=1.0).contains(t) {
                        return Err(format!("Threshold must be within [0, 1], got {t}"));
                    }
                }
                (
                    data,
                    AnalysisCommand::SimilarTasks {
                        owner: *owner,
                        threshold: *threshold,
                    },
                )
            }
            Some(Commands::Huffman { data, text }) => {
                (data, AnalysisCommand::Huffman { text: text.clone() })
            }
            Some(Commands::Reminders { data, today, days }) => (
                data,
                AnalysisCommand::Reminders {
                    today: *today,
                    days: *days,
                },
            ),
            Some(Commands::ShowConfig) => return Ok(ExecutionMode::ShowConfig),
            None => {
                return Err(
                    "No command specified. Use 'taskscheduler --help' to see available commands."
                        .to_string(),
                );
            }
        };

        Ok(ExecutionMode::Analysis(AnalysisRequest {
            data: data.clone(),
            config_override: self.config.clone(),
            command,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_flow_command() {
        let args = parse(&[
            "taskscheduler",
            "flow",
            "--data",
            "tasks.json",
            "--owner",
            "3",
            "--algorithm",
            "dinic",
        ]);

        let mode = args.mode().unwrap();
        assert_eq!(
            mode,
            ExecutionMode::Analysis(AnalysisRequest {
                data: PathBuf::from("tasks.json"),
                config_override: None,
                command: AnalysisCommand::Flow {
                    owner: Some(3),
                    algorithm: Some(FlowAlgorithm::Dinic),
                },
            })
        );
    }

    #[test]
    fn test_mst_defaults_to_random_costs() {
        let args = parse(&["taskscheduler", "mst", "-d", "tasks.json"]);
        match args.mode().unwrap() {
            ExecutionMode::Analysis(request) => {
                assert_eq!(
                    request.command,
                    AnalysisCommand::Mst {
                        owner: None,
                        costs: CostArg::Random,
                        seed: None,
                    }
                );
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let args = parse(&[
            "taskscheduler",
            "similar-users",
            "-d",
            "tasks.json",
            "--start",
            "4",
            "--traversal",
            "dfs",
            "--config",
            "custom.toml",
            "-v",
        ]);
        assert!(args.verbose);

        match args.mode().unwrap() {
            ExecutionMode::Analysis(request) => {
                assert_eq!(request.config_override, Some(PathBuf::from("custom.toml")));
                assert_eq!(
                    request.command,
                    AnalysisCommand::SimilarUsers {
                        start: 4,
                        traversal: Some(Traversal::Dfs),
                    }
                );
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn test_reminders_date_parsing() {
        let args = parse(&[
            "taskscheduler",
            "reminders",
            "-d",
            "tasks.json",
            "--today",
            "2026-02-14",
        ]);
        match args.mode().unwrap() {
            ExecutionMode::Analysis(request) => {
                assert_eq!(
                    request.command,
                    AnalysisCommand::Reminders {
                        today: NaiveDate::from_ymd_opt(2026, 2, 14),
                        days: None,
                    }
                );
            }
            other => panic!("unexpected mode {other:?}"),
        }

        assert!(
            Args::try_parse_from(["taskscheduler", "reminders", "-d", "t.json", "--today", "soon"])
                .is_err()
        );
    }

    #[test]
    fn test_threshold_out_of_range() {
        let args = parse(&[
            "taskscheduler",
            "similar-tasks",
            "-d",
            "tasks.json",
            "--threshold",
            "1.5",
        ]);
        assert!(args.mode().is_err());
    }

    #[test]
    fn test_show_config_and_missing_command() {
        let args = parse(&["taskscheduler", "show-config"]);
        assert_eq!(args.mode().unwrap(), ExecutionMode::ShowConfig);

        let args = Args {
            config: None,
            verbose: false,
            command: None,
        };
        assert!(args.mode().is_err());
    }
}
