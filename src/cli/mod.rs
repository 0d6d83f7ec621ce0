//! Command-line interface for taskflow
//!
//! This module defines the CLI structure using clap derive macros. The CLI is
//! a thin presentation layer over the dashboard controller backed by the JSON
//! file store; it owns no business state of its own.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::dashboard::{AutoConfirm, Confirmation, Dashboard};
use crate::error::Result;
use crate::store::FileStore;

mod category;
mod task;

/// taskflow - single-user task management
///
/// Create, edit, complete, filter, sort, group, and categorize tasks,
/// persisted as JSON under the store directory.
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "TASKFLOW_STORE_DIR")]
    pub store_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks with optional filtering, sorting, and grouping
    List {
        /// Status filter: all, active, completed, high (defaults from config)
        #[arg(long)]
        filter: Option<String>,

        /// Only tasks in this category (name or id)
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive title search
        #[arg(long)]
        search: Option<String>,

        /// Sort key: order, priority, due, title (defaults from config)
        #[arg(long)]
        sort: Option<String>,

        /// Group key: status, priority, category
        #[arg(long)]
        group: Option<String>,
    },

    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Priority: high, medium, low
        #[arg(long)]
        priority: Option<String>,

        /// Category (name or id)
        #[arg(long)]
        category: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// Edit an existing task
    Edit {
        /// Task id
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New priority: high, medium, low
        #[arg(long)]
        priority: Option<String>,

        /// New category (name or id)
        #[arg(long, conflicts_with = "clear_category")]
        category: Option<String>,

        /// Detach the task from its category
        #[arg(long)]
        clear_category: bool,

        /// New due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Toggle a task's completion state
    Done {
        /// Task id
        id: i64,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: i64,
    },

    /// Renumber tasks into the given sequence
    Reorder {
        /// Task ids in their new order
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Mark every active task as complete
    CompleteAll,

    /// Delete every completed task
    ClearCompleted,

    /// Show task counts for the current collection
    Counts {
        /// Restrict counts to this category (name or id)
        #[arg(long)]
        category: Option<String>,
    },

    /// Category management
    #[command(subcommand)]
    Cat(CatCommands),
}

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CatCommands {
    /// Add a new category
    Add {
        /// Category name
        name: String,

        /// Color: red, orange, yellow, green, blue, indigo, purple, pink
        #[arg(long, default_value = "blue")]
        color: String,
    },

    /// List categories
    List,

    /// Rename or recolor a category
    Set {
        /// Category id
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New color
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category (tasks are detached, not deleted)
    Rm {
        /// Category id
        id: i64,
    },
}

impl Cli {
    /// Name of the invoked command, for output envelopes.
    pub fn command_name(&self) -> &'static str {
        match &self.command {
            Commands::List { .. } => "list",
            Commands::Add { .. } => "add",
            Commands::Edit { .. } => "edit",
            Commands::Done { .. } => "done",
            Commands::Rm { .. } => "rm",
            Commands::Reorder { .. } => "reorder",
            Commands::CompleteAll => "complete-all",
            Commands::ClearCompleted => "clear-completed",
            Commands::Counts { .. } => "counts",
            Commands::Cat(CatCommands::Add { .. }) => "cat add",
            Commands::Cat(CatCommands::List) => "cat list",
            Commands::Cat(CatCommands::Set { .. }) => "cat set",
            Commands::Cat(CatCommands::Rm { .. }) => "cat rm",
        }
    }

    /// Run the CLI to completion on a current-thread runtime.
    pub fn run(self) -> Result<()> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let config = Config::load(&cwd)?;
        let store_dir = self
            .store_dir
            .clone()
            .unwrap_or_else(|| config.resolve_store_dir());

        let store = FileStore::new(store_dir);
        let confirmation: Box<dyn Confirmation> = if self.yes {
            Box::new(AutoConfirm)
        } else {
            Box::new(StdinConfirm)
        };

        let mut dashboard = Dashboard::new(store, confirmation);
        dashboard.set_sort_key(config.default_sort_key());
        dashboard.set_status_filter(config.default_status_filter());

        // Single-threaded cooperative scheduling; gateway calls suspend the
        // one flow at their await points.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.dispatch(&mut dashboard))
    }

    async fn dispatch(self, dashboard: &mut Dashboard<FileStore>) -> Result<()> {
        dashboard.load().await?;

        let options = crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::List {
                filter,
                category,
                search,
                sort,
                group,
            } => {
                task::run_list(
                    dashboard,
                    task::ListOptions {
                        filter,
                        category,
                        search,
                        sort,
                        group,
                        output: options,
                    },
                )
                .await
            }
            Commands::Add {
                title,
                priority,
                category,
                due,
            } => {
                task::run_add(
                    dashboard,
                    task::AddOptions {
                        title,
                        priority,
                        category,
                        due,
                        output: options,
                    },
                )
                .await
            }
            Commands::Edit {
                id,
                title,
                priority,
                category,
                clear_category,
                due,
                clear_due,
            } => {
                task::run_edit(
                    dashboard,
                    task::EditOptions {
                        id,
                        title,
                        priority,
                        category,
                        clear_category,
                        due,
                        clear_due,
                        output: options,
                    },
                )
                .await
            }
            Commands::Done { id } => task::run_done(dashboard, id, options).await,
            Commands::Rm { id } => task::run_rm(dashboard, id, options).await,
            Commands::Reorder { ids } => task::run_reorder(dashboard, &ids, options).await,
            Commands::CompleteAll => task::run_complete_all(dashboard, options).await,
            Commands::ClearCompleted => task::run_clear_completed(dashboard, options).await,
            Commands::Counts { category } => {
                task::run_counts(dashboard, category, options).await
            }
            Commands::Cat(cat) => match cat {
                CatCommands::Add { name, color } => {
                    category::run_add(dashboard, name, color, options).await
                }
                CatCommands::List => category::run_list(dashboard, options).await,
                CatCommands::Set { id, name, color } => {
                    category::run_set(dashboard, id, name, color, options).await
                }
                CatCommands::Rm { id } => category::run_rm(dashboard, id, options).await,
            },
        }
    }
}

/// Interactive confirmation over stdin.
struct StdinConfirm;

impl Confirmation for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes" | "Yes")
    }
}
