mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortize::AmortizeArgs;
use commands::grid::GridCellArgs;
use commands::model::ModelArgs;
use commands::policy::PolicyArgs;

/// Buy-versus-rent housing decision engine
#[derive(Parser)]
#[command(
    name = "rentbuy",
    version,
    about = "Buy-versus-rent housing decision engine",
    long_about = "Compares buying a home with a mortgage against renting and investing \
                  the difference, under Shanghai and Beijing purchase policy. Reports \
                  cost totals, month-by-month net worth, macro scenarios, a sensitivity \
                  grid and household stress tests."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full buy-versus-rent model
    Model(ModelArgs),
    /// Resolve the effective purchase policy for a city
    Policy(PolicyArgs),
    /// Amortize a single loan tranche
    Amortize(AmortizeArgs),
    /// Recompute one sensitivity-grid cell
    GridCell(GridCellArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Model(args) => commands::model::run_model(args),
        Commands::Policy(args) => commands::policy::run_policy(args),
        Commands::Amortize(args) => commands::amortize::run_amortize(args),
        Commands::GridCell(args) => commands::grid::run_grid_cell(args),
        Commands::Version => {
            println!("rentbuy {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
