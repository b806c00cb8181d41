mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use tasker_core::{
    parse_due_date, Config, FieldUpdate, Priority, StatusFilter, TaskDraft, TaskError,
    TaskRepository, TaskUpdate,
};

#[derive(Parser)]
#[command(name = "tasker", version)]
#[command(about = "A small personal task tracker", long_about = None)]
struct Cli {
    /// Path to the JSON file where tasks are stored
    /// (default: $TASKER_STORAGE, then ~/.tasker/tasks.json)
    #[arg(
        long,
        short = 'd',
        visible_alias = "database",
        global = true,
        value_name = "PATH"
    )]
    storage: Option<PathBuf>,

    /// Print debug logging to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new task (usage: add "Write report" --due 2025-06-30 --priority high)
    Add {
        /// Title of the task
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        /// Optional longer description
        #[arg(long, short = 'm')]
        description: Option<String>,
        /// Due date: YYYY-MM-DD, today, tomorrow, eow, eom, +3d, fri, 2:fri
        #[arg(long, visible_alias = "due-date", short = 't', value_name = "DATE")]
        due: Option<String>,
        /// Priority: low, medium or high
        #[arg(long, short, value_name = "LEVEL")]
        priority: Option<Priority>,
    },
    /// List stored tasks
    List {
        /// Filter tasks by completion state
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
        /// Show descriptions and timestamps
        #[arg(long)]
        detailed: bool,
    },
    /// Update fields of an existing task
    Update {
        /// Identifier of the task to update
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
        #[arg(long, visible_alias = "due-date", value_name = "DATE", conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        #[arg(long, value_name = "LEVEL", conflicts_with = "clear_priority")]
        priority: Option<Priority>,
        /// Remove the priority
        #[arg(long)]
        clear_priority: bool,
        /// Mark the task as completed or pending
        #[arg(long, value_name = "true|false")]
        completed: Option<bool>,
    },
    /// Mark a task as completed
    Complete {
        id: u64,
        /// Set the task back to pending
        #[arg(long)]
        undo: bool,
    },
    /// Delete a task
    Delete { id: u64 },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    All,
    Pending,
    Completed,
}

impl StatusArg {
    fn filter(self) -> Option<StatusFilter> {
        match self {
            StatusArg::All => None,
            StatusArg::Pending => Some(StatusFilter::Pending),
            StatusArg::Completed => Some(StatusFilter::Completed),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<TaskError>() {
        Some(TaskError::Validation(_)) => 2,
        Some(TaskError::NotFound(_)) => 3,
        Some(TaskError::Parse { .. }) => 4,
        Some(TaskError::Io { .. }) => 5,
        Some(TaskError::Config(_)) | None => 1,
    }
}

fn parse_due(input: &str) -> Result<chrono::NaiveDate> {
    Ok(parse_due_date(input, Local::now().date_naive())?)
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.storage)?;
    log::debug!("using storage {}", config.storage_path.display());
    let mut repo = TaskRepository::from_config(&config).context("Could not load tasks")?;

    match cli.command {
        Commands::Add {
            title,
            description,
            due,
            priority,
        } => {
            let draft = TaskDraft {
                title: title.join(" "),
                description,
                due_date: due.as_deref().map(parse_due).transpose()?,
                priority,
            };
            let task = repo.add(draft)?;
            println!("Created task #{}: {}", task.id, task.title);
            if let Some(due) = task.due_date {
                println!("  Due: {}", due);
            }
            if let Some(priority) = task.priority {
                println!("  Priority: {}", priority);
            }
        }
        Commands::List { status, detailed } => {
            let tasks = repo.list(status.filter());
            let today = Local::now().date_naive();
            if detailed {
                println!("{}", render::detailed(&tasks, today));
            } else {
                println!("{}", render::table(&tasks, today));
            }
        }
        Commands::Update {
            id,
            title,
            description,
            clear_description,
            due,
            clear_due,
            priority,
            clear_priority,
            completed,
        } => {
            let update = TaskUpdate {
                title,
                description: FieldUpdate::from_flags(description, clear_description),
                due_date: FieldUpdate::from_flags(
                    due.as_deref().map(parse_due).transpose()?,
                    clear_due,
                ),
                priority: FieldUpdate::from_flags(priority, clear_priority),
                completed,
            };
            if update.is_empty() {
                let err = TaskError::validation("Nothing to update: pass at least one field");
                return Err(err.into());
            }
            let task = repo.update(id, update)?;
            println!("Updated task #{}", task.id);
        }
        Commands::Complete { id, undo } => {
            let task = repo.complete(id, undo)?;
            let state = if task.completed { "completed" } else { "pending" };
            println!("Marked task #{} as {}", task.id, state);
        }
        Commands::Delete { id } => {
            let task = repo.delete(id)?;
            println!("Deleted task #{}: {}", task.id, task.title);
        }
    }
    Ok(())
}
