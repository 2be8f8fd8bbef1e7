use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use quickwin_core::time::parse_duration_minutes;
use quickwin_core::{Clock, SystemClock};
use quickwin_store::{JsonFileRepository, TaskStore};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;
mod state;

use commands::ListFilter;
use render::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "quickwin", version, about = "Rank tasks by priority, deadline and effort")]
struct Cli {
    /// More logging on stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Task file to use instead of the configured one
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Task(TaskCommand),

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Commands that open the task file.
#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// Add a task
    Add {
        title: String,

        /// 1 (very low) to 5 (critical)
        #[arg(short, long, default_value_t = 3)]
        priority: i64,

        /// Estimated work: 45, 45m, 2h, 1h30m
        #[arg(short, long)]
        duration: String,

        /// "YYYY-MM-DD HH:MM" in the configured timezone, or RFC 3339
        #[arg(long)]
        deadline: Option<String>,
    },

    /// List tasks
    List(ListArgs),

    /// Show one task and why it ranks where it does
    Show { id: u64 },

    /// Change fields of a task
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        priority: Option<i64>,
        #[arg(short, long)]
        duration: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        /// Remove the deadline
        #[arg(long)]
        no_deadline: bool,
    },

    /// Mark a task completed
    Done { id: u64 },

    /// Mark a task pending again
    Undo { id: u64 },

    /// Delete a task
    Delete { id: u64 },

    /// Print the ranked execution order
    Schedule {
        /// Only tasks that fit in this much time (e.g. 90m, 3h)
        #[arg(short, long, conflicts_with = "all_day")]
        budget: Option<String>,

        /// Use the configured working day as budget
        #[arg(long)]
        all_day: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Task counts and completion rate
    Stats {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
#[group(multiple = false)]
struct ListArgs {
    #[arg(long)]
    pending: bool,
    #[arg(long)]
    completed: bool,
    #[arg(long)]
    overdue: bool,
}

impl ListArgs {
    fn filter(&self) -> ListFilter {
        if self.pending {
            ListFilter::Pending
        } else if self.completed {
            ListFilter::Completed
        } else if self.overdue {
            ListFilter::Overdue
        } else {
            ListFilter::All
        }
    }
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.quickwin/config.toml with defaults
    Init,
    /// Print the effective configuration
    Show,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load_config()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Config { command } => run_config(&command, &cfg, &mut out)?,
        Command::Task(command) => run_task_command(command, cli.data, &cfg, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

fn run_task_command(
    command: TaskCommand,
    data: Option<PathBuf>,
    cfg: &config::Config,
    out: &mut impl Write,
) -> Result<()> {
    let tasks_path = match data {
        Some(p) => p,
        None => cfg.tasks_path()?,
    };
    tracing::debug!(path = %tasks_path.display(), "using task file");

    let mut store = TaskStore::open(JsonFileRepository::new(&tasks_path))
        .with_context(|| format!("open task file {}", tasks_path.display()))?;

    // Sampled once so every ranking in this invocation agrees on the time.
    let now = SystemClock.now();

    match command {
        TaskCommand::Add {
            title,
            priority,
            duration,
            deadline,
        } => commands::add(&mut store, cfg, out, &title, priority, &duration, deadline.as_deref()),

        TaskCommand::List(args) => commands::list(&store, cfg, out, args.filter(), now),

        TaskCommand::Show { id } => commands::show(&store, cfg, out, id, now),

        TaskCommand::Update {
            id,
            title,
            priority,
            duration,
            deadline,
            no_deadline,
        } => commands::update(
            &mut store,
            cfg,
            out,
            id,
            title,
            priority,
            duration.as_deref(),
            deadline.as_deref(),
            no_deadline,
        ),

        TaskCommand::Done { id } => commands::set_completed(&mut store, out, id, true),

        TaskCommand::Undo { id } => commands::set_completed(&mut store, out, id, false),

        TaskCommand::Delete { id } => commands::delete(&mut store, out, id),

        TaskCommand::Schedule {
            budget,
            all_day,
            format,
        } => {
            let budget = match budget {
                Some(b) => Some(parse_duration_minutes(&b)?),
                None if all_day => Some(cfg.schedule.working_minutes),
                None => None,
            };
            commands::schedule(&store, cfg, out, budget, format, now)
        }

        TaskCommand::Stats { json } => commands::stats(&store, out, json, now),
    }
}

fn run_config(command: &ConfigCommand, cfg: &config::Config, out: &mut impl Write) -> Result<()> {
    match command {
        ConfigCommand::Init => {
            let p = config::config_path()?;
            if p.exists() {
                writeln!(out, "Config already exists: {}", p.display())?;
                return Ok(());
            }
            let p = config::save_config(&config::Config::default())?;
            writeln!(out, "Wrote {}", p.display())?;
        }
        ConfigCommand::Show => {
            writeln!(out, "# {}", config::config_path()?.display())?;
            write!(out, "{}", toml::to_string_pretty(cfg).context("serialize config")?)?;
            writeln!(out, "# tasks file: {}", cfg.tasks_path()?.display())?;
        }
    }
    Ok(())
}
