use anyhow::{Context, Result};
use chrono::Local;
use taskscheduler::cli::{
    AnalysisCommand, AnalysisRequest, Args, ConfigDiscovery, CostArg, DatasetLoader, ExecutionMode,
};
use taskscheduler::{
    AnalysisConfig, CostDifference, CostModel, Task, TaskAnalyzer, TaskStore, UserId, env,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose {
        env::VERBOSE_LOG_FILTER
    } else {
        env::DEFAULT_LOG_FILTER
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let result = match mode {
        ExecutionMode::Analysis(request) => run_analysis(request),
        ExecutionMode::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn run_analysis(request: AnalysisRequest) -> Result<()> {
    let config = ConfigDiscovery::load(request.config_override.as_deref())?;
    let store = DatasetLoader::load(&request.data)
        .with_context(|| format!("Failed to load dataset {}", request.data.display()))?;
    info!("Running {:?}", request.command);

    let analyzer = TaskAnalyzer::new(&store, &config);

    match request.command {
        AnalysisCommand::Mst { owner, costs, seed } => {
            let tasks = select_tasks(&store, owner);
            let mut cost_model: Box<dyn CostModel> = match (costs, seed) {
                (CostArg::Difference, _) => Box::new(CostDifference),
                (CostArg::Random, Some(seed)) => Box::new(AnalysisConfig {
                    cost_seed: Some(seed),
                    ..config.clone()
                }
                .random_costs()),
                (CostArg::Random, None) => Box::new(config.random_costs()),
            };
            let mst = analyzer.compute_mst(&tasks, cost_model.as_mut())?;

            println!("🌲 Minimum spanning tree over {} tasks:", tasks.len());
            for edge in mst.tree.edges() {
                println!(
                    "  {} - {}  (cost {:.2})",
                    describe(tasks[edge.parent]),
                    describe(tasks[edge.child]),
                    edge.weight
                );
            }
            println!("  Total weight: {:.2}", mst.tree.total_weight());
        }
        AnalysisCommand::Flow { owner, algorithm } => {
            let tasks = select_tasks(&store, owner);
            let algorithm = algorithm.unwrap_or(config.default_flow_algorithm);
            let summary = analyzer.max_flow(&tasks, algorithm)?;

            println!(
                "🌊 Maximum flow ({}) over {} tasks: {:.2}",
                summary.algorithm,
                tasks.len(),
                summary.total_flow
            );
        }
        AnalysisCommand::SimilarUsers { start, traversal } => {
            let traversal = traversal.unwrap_or(config.default_traversal);
            let users = analyzer.find_similar_users(start, traversal);
            let category = match store.get_task(start).ok().and_then(|t| t.category) {
                Some(id) => format!("'{}'", store.get_category(id)?.name),
                None => "no category".to_string(),
            };

            if users.is_empty() {
                println!("No similar users found for task {}", start);
            } else {
                println!(
                    "👥 Users sharing {} with task {} ({}):",
                    category, start, traversal
                );
                for user in users {
                    println!("  {} <{}>", user.id, user.email);
                }
            }
        }
        AnalysisCommand::SimilarTasks { owner, threshold } => {
            let tasks = select_tasks(&store, owner);
            let config = AnalysisConfig {
                similarity_threshold: threshold.unwrap_or(config.similarity_threshold),
                ..config.clone()
            };
            let pairs = TaskAnalyzer::new(&store, &config).find_similar_task_pairs(&tasks);

            if pairs.is_empty() {
                println!(
                    "No task pairs reach similarity {:.2}",
                    config.similarity_threshold
                );
            }
            for pair in pairs {
                println!(
                    "🔗 {} ~ {}  ({:.0}%)",
                    describe(pair.first),
                    describe(pair.second),
                    pair.ratio * 100.0
                );
            }
        }
        AnalysisCommand::Huffman { text } => {
            let (text, code, bits) = match text {
                Some(text) => {
                    let code = analyzer.build_huffman_codes(&text);
                    let bits = code.encode(&text)?;
                    (text, code, bits)
                }
                None => analyzer.encode_categories()?,
            };

            println!("📦 Huffman codes for {:?}:", text);
            for (symbol, bits) in code.codes() {
                println!("  {:?}: {}", symbol, bits);
            }
            println!("Encoded ({} bits): {}", bits.len(), bits);
        }
        AnalysisCommand::Reminders { today, days } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let days = days.unwrap_or(config.reminder_window_days);
            let due = store.upcoming_reminders(today, days);

            if due.is_empty() {
                println!("No deadlines in the next {} days", days);
            }
            for task in due {
                let deadline = task
                    .deadline
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                let priority = task
                    .priority
                    .map(|p| format!(" [P{}]", p))
                    .unwrap_or_default();
                println!("⏰ {} {}{}", deadline, describe(task), priority);
            }
        }
    }

    Ok(())
}

fn select_tasks(store: &TaskStore, owner: Option<UserId>) -> Vec<&Task> {
    match owner {
        Some(owner) => store.tasks_owned_by(owner),
        None => store.all_tasks(),
    }
}

fn describe(task: &Task) -> String {
    format!("#{} {}", task.id, task.name)
}
