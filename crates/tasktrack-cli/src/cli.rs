use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tasktrack")]
#[command(about = "TaskTrack - task storage command line", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database URL (overrides TASKTRACK__DATABASE__* settings)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Cancel the operation if it takes longer than this many seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List every task
    List,

    /// Create a task
    Create {
        /// Author user id
        #[arg(long)]
        author: i64,

        /// Assignee user id
        #[arg(long)]
        assigned: i64,

        /// Task title
        #[arg(long)]
        title: String,

        /// Task content
        #[arg(long)]
        content: String,
    },

    /// List tasks written by an author
    ByAuthor {
        /// Author user id
        author: i64,
    },

    /// List tasks carrying a label
    ByLabel {
        /// Label name
        label: String,
    },

    /// Set a task's close date
    Close {
        /// Task id
        id: i64,

        /// Close date as a unix timestamp (defaults to now)
        #[arg(long)]
        at: Option<i64>,
    },

    /// Delete a task
    Delete {
        /// Task id
        id: i64,
    },
}
