//! # upkeep
//!
//! Keeps track of maintenance for a small fleet of machines (coffee machines,
//! grinders, or anything custom) from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! # Add a coffee machine; it gets the default filter and descaling tasks
//! upkeep machine add "Office Coffee" --type coffee_machine --start 2024-01-01
//!
//! # See the fleet, then one machine in detail
//! upkeep machine list
//! upkeep machine show 1
//!
//! # Log 12.5 litres against the filter, then record a filter change
//! upkeep usage 1 filter 12.5
//! upkeep done 1 filter
//!
//! # Everything that needs attention
//! upkeep due
//! ```
//!
//! Machines are numbered from 1 in the order they were added.
//!
//! ## Data Storage
//!
//! Machines are saved as JSON in the local data directory
//! (`~/.local/share/upkeep/machines.json` on Linux). Override it with
//! `--data` or the `UPKEEP_DATA` environment variable.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use upkeep::commands::*;
use upkeep::logging::init_logging;
use upkeep::models::today;
use upkeep::{Error, Fleet, JsonStore};

#[derive(Parser)]
#[command(name = "upkeep")]
#[command(about = "Maintenance tracker for coffee machines, grinders and other equipment", long_about = None)]
struct Cli {
    /// Path to the data file
    #[arg(long, global = true, env = "UPKEEP_DATA")]
    data: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage machines
    Machine {
        #[command(subcommand)]
        command: MachineCommands,
    },
    /// Manage the maintenance tasks of a machine
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Register usage for a task (e.g. litres processed)
    Usage {
        /// Machine number
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        machine: u64,
        /// Task ID
        task: String,
        /// Quantity to add
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Record that a task was performed today
    Done {
        /// Machine number
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        machine: u64,
        /// Task ID
        task: String,
    },
    /// List overdue tasks across all machines
    Due,
    /// List known machine types and their default tasks
    Types,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum MachineCommands {
    /// Add a machine
    Add {
        /// Machine name
        name: String,
        /// Machine type (see `upkeep types`); anything else is a custom type
        #[arg(short, long)]
        r#type: Option<String>,
        /// Start date in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        start: Option<String>,
    },
    /// List machines
    List,
    /// Show a machine and its tasks
    Show {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        machine: u64,
    },
    /// Remove a machine
    Remove {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        machine: u64,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Add a task to a machine
    Add {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        machine: u64,
        /// Task name
        name: String,
        /// Days between maintenances
        #[arg(short, long)]
        days: String,
        /// Usage between maintenances; enables usage tracking
        #[arg(short, long)]
        usage: Option<String>,
        /// Explicit task ID (generated from the name otherwise)
        #[arg(long)]
        id: Option<String>,
    },
    /// Edit a task
    Edit {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        machine: u64,
        /// Task ID
        task: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New days between maintenances
        #[arg(short, long)]
        days: Option<String>,
        /// New usage threshold; enables usage tracking
        #[arg(short, long, conflicts_with = "no_usage")]
        usage: Option<String>,
        /// Stop tracking usage
        #[arg(long)]
        no_usage: bool,
    },
    /// Remove a task
    Remove {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        machine: u64,
        /// Task ID
        task: String,
    },
}

/// Default location of the data file.
///
/// `~/.local/share/upkeep/machines.json` on Linux, `./machines.json` when no
/// data directory is known.
fn default_data_path() -> PathBuf {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("upkeep");
    p.push("machines.json");
    p
}

/// Machine numbers on the command line start at 1.
fn index(machine: u64) -> usize {
    machine.saturating_sub(1) as usize
}

fn run(command: Commands, fleet: &mut Fleet) -> upkeep::Result<()> {
    match command {
        Commands::Machine { command } => match command {
            MachineCommands::Add { name, r#type, start } => cmd_machine_add(fleet, name, r#type, start, false).map(|_| ()),
            MachineCommands::List => {
                cmd_machine_list(fleet, today());
                Ok(())
            }
            MachineCommands::Show { machine } => cmd_machine_show(fleet, index(machine), today()),
            MachineCommands::Remove { machine } => cmd_machine_remove(fleet, index(machine), false),
        },
        Commands::Task { command } => match command {
            TaskCommands::Add { machine, name, days, usage, id } => cmd_task_add(fleet, index(machine), name, days, usage, id, false),
            TaskCommands::Edit { machine, task, name, days, usage, no_usage } => cmd_task_edit(fleet, index(machine), task, name, days, usage, no_usage, false),
            TaskCommands::Remove { machine, task } => cmd_task_remove(fleet, index(machine), task, false),
        },
        Commands::Usage { machine, task, quantity } => cmd_usage(fleet, index(machine), task, quantity, false),
        Commands::Done { machine, task } => cmd_done(fleet, index(machine), task, false),
        Commands::Due => {
            cmd_due(fleet, today());
            Ok(())
        }
        Commands::Types | Commands::Completions { .. } => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Types => {
            cmd_types();
            return ExitCode::SUCCESS;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "upkeep", &mut io::stdout());
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let path = cli.data.unwrap_or_else(default_data_path);
    let mut fleet = match Fleet::open(JsonStore::new(path)) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to load machines: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &mut fleet) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::MachineNotFound(i)) => {
            eprintln!("Machine {} not found.", i + 1);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
