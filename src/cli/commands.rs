use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::error::OkrError;

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "okrtrack",
    version = VERSION,
    about = "OKR and habit tracking from checklist tasks in a markdown vault",
    after_help = "\
CONFIG:
  Read from --config, else $OKRTRACK_CONFIG, else ./okrtrack.toml.
  --vault and --cycle override the file.

TASK SYNTAX:
  - [x] Title #task (okr:: [[Cycle#O1 KR1 Name]]) [Story Points:: 3] ✅ 2024-11-20
  Markers: [ ] todo, [x] done, [/] in progress, [-] cancelled, [|] blocked.
  Exactly one of #epic/#story/#task sets the type; two or more reject the note.

CYCLE NOTE:
  Front matter start_date/end_date. `# O1: Name` headings define objectives,
  `### O1 KR1: Name` headings key results, followed by
  [criteria::count|duration|story-points] [target::N] (keywords::[\"a\", \"b\"])

EXIT CODES:
  0  Success
  1  Error (config, missing note, malformed cycle note, etc.)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Vault root (overrides config)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Cycle-defining note name (overrides config)
    #[arg(long, global = true)]
    pub cycle: Option<String>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,
}

impl GlobalArgs {
    pub fn load_config(&self) -> Result<Config, OkrError> {
        let config = Config::load(self.config.as_deref())?
            .with_overrides(self.vault.clone(), self.cycle.clone());
        config.validate()?;
        Ok(config)
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the task tree of one note
    Tasks {
        /// Note name (file stem)
        note: String,
        /// Keep only subtrees linked to this key result tag
        #[arg(long)]
        okr: Option<String>,
    },

    /// Show the objectives and key results of the cycle
    Okr,

    /// Show tasks from all daily notes
    #[command(after_help = "\
NOTE:
  Keywords match titles case-insensitively; any keyword is enough.
  Dates bound the daily note date, not dates written on the task.
  Tasks that fail are removed; their matching subtasks move up.")]
    Daily {
        /// Title keyword (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        /// First daily note date to include
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last daily note date to include
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show the per-day score series of each key result
    Score {
        /// Only this key result, e.g. "O1 KR2"
        #[arg(long)]
        kr: Option<String>,
    },

    /// Show habit scores by day and week
    Habits,

    /// Summarize the current cycle and any notes that were skipped
    Status,
}
