use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gymflow-cli", version, about = "Gymflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the automation engine loop
    Run(commands::run::RunArgs),
    /// Member management
    Member {
        #[command(subcommand)]
        action: commands::member::MemberAction,
    },
    /// Automation plan catalog
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Automation execution log
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Follow-up task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Dashboard statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Member { action } => commands::member::run(action),
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Log { action } => commands::log::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
