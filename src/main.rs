//! modelgen CLI: YAML schema in, Python model modules out.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "modelgen",
    version,
    about = "Generate SQLAlchemy / Flask-SQLAlchemy models and Alembic metadata from a YAML schema"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: modelgen::cli::Commands,
}

fn main() {
    let cli = Cli::parse();
    modelgen::cli::init_logging(cli.verbose);
    if let Err(e) = modelgen::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
