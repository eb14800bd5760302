use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rTimesplit
/// CLI application to split daily working time across projects with SQLite
#[derive(Parser)]
#[command(
    name = "rtimesplit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Split your daily working time across projects, stages and tasks using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the user key taken from the configuration
    #[arg(global = true, long = "user")]
    pub user: Option<String>,

    /// Run in test mode (no config file update, no file logging)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Confirm and save the target of a day, leaving its entries untouched
    Target {
        /// Date (YYYY-MM-DD or "today")
        date: String,

        /// Total duration of the day (8h, 7h30m, 450, 7:30); default from config
        duration: Option<String>,
    },

    /// Edit the allocations of a day in one session
    Edit {
        /// Date (YYYY-MM-DD or "today")
        date: String,

        #[arg(long = "target", help = "Confirm or change the daily target")]
        target: Option<String>,

        #[arg(
            long = "entry",
            value_name = "SPEC",
            help = "Add a committed entry: project[/stage[/task]]=duration (e.g. p1/s1=2h, p2=25%)"
        )]
        entries: Vec<String>,

        #[arg(
            long = "draft",
            value_name = "SPEC",
            help = "Stage a draft: project[/stage[/task]]=duration"
        )]
        drafts: Vec<String>,

        #[arg(
            long = "duplicate",
            help = "Stage the entries of the latest earlier day as drafts"
        )]
        duplicate: bool,

        #[arg(
            long = "remove",
            value_name = "ID",
            help = "Remove an entry or draft by id (full id or the 8-char prefix)"
        )]
        remove: Vec<String>,

        #[arg(long = "commit", help = "Commit all valid drafts")]
        commit: bool,

        #[arg(
            long = "save",
            help = "Save target and committed entries (otherwise only a preview is shown)"
        )]
        save: bool,
    },

    /// Show the saved allocations of a day
    Show {
        /// Date (YYYY-MM-DD or "today")
        date: String,
    },

    /// Month grid with per-day status (empty / partial / complete)
    Calendar {
        #[arg(long = "month", help = "Month to show (YYYY-MM, default: current)")]
        month: Option<String>,
    },

    /// List reference data: open projects, stages of a project, tasks of a stage
    Refs {
        #[arg(long = "project", help = "List the stages of this project")]
        project: Option<String>,

        #[arg(
            long = "stage",
            conflicts_with = "project",
            help = "List the tasks of this stage"
        )]
        stage: Option<String>,
    },

    /// Export allocations to CSV or JSON
    Export {
        #[arg(long = "format", value_enum, help = "Output format")]
        format: ExportFormat,

        #[arg(long = "file", help = "Absolute path of the output file")]
        file: String,

        #[arg(
            long = "range",
            help = "Period: YYYY, YYYY-MM, YYYY-MM-DD or start:end of the same form"
        )]
        range: Option<String>,

        #[arg(long = "force", help = "Overwrite the output file without asking")]
        force: bool,
    },
}
