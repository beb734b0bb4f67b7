use clap::Parser;
use std::process;

use okrtrack::cli;
use okrtrack::cli::commands::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli_args = Cli::parse();
    let global = cli_args.global;

    let exit_code = match cli_args.command {
        Commands::Tasks { note, okr } => cli::tasks::run(&note, okr.as_deref(), &global),
        Commands::Okr => cli::okr::run(&global),
        Commands::Daily { keywords, from, to } => cli::daily::run(&keywords, from, to, &global),
        Commands::Score { kr } => cli::score::run(kr.as_deref(), &global),
        Commands::Habits => cli::habits::run(&global),
        Commands::Status => cli::status::run(&global),
    };

    process::exit(exit_code);
}
