use anyhow::Result;
use clap::{Parser, Subcommand};
use plast::algorithm::{self, PlastArgs};
use plast::config::AlgoKind;

#[derive(Parser)]
#[command(name = "plast")]
#[command(version = "0.1.0")]
#[command(about = "Parallel local alignment search over sequence databases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Protein vs Protein
    Plastp(PlastArgs),

    /// Nucleotide vs Nucleotide, both strands
    Plastn(PlastArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Plastp(args) => algorithm::run(AlgoKind::Plastp, args)?,
        Commands::Plastn(args) => algorithm::run(AlgoKind::Plastn, args)?,
    }
    Ok(())
}
