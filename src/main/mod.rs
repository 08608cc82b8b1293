use std::path::PathBuf;

use clap::{Parser, Subcommand};
#[cfg(feature = "dev-commands")]
use gsmooth::commands::gsmooth_random_series;
use gsmooth::{commands::gsmooth_smooth, prelude::*};

const INFO: &str = "\
gsmooth: masked running averages over per-site genomic tracks
usage: gsmooth [--help] <subcommand>

Subcommands:

  smooth: smooth a per-site TSV track with a masked running average.

";

#[derive(Parser)]
#[clap(name = "gsmooth")]
#[clap(about = INFO)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Smooth {
        /// a TSV genome file of chromosome names and their lengths
        #[arg(long, required = true)]
        seqlens: PathBuf,

        /// an input TSV track of sequence name, 0-based position, and value
        /// rows, where '.' marks a masked site
        #[arg(required = true)]
        trackfile: PathBuf,

        /// number of sites the moving average considers
        #[arg(long, required = true)]
        window_size: usize,

        /// smallest fraction of valid sites a window needs before its
        /// output site is kept
        #[arg(long, default_value_t = DEFAULT_MIN_VALID_FRACTION)]
        min_valid_fraction: f64,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    #[cfg(feature = "dev-commands")]
    RandomSeries {
        /// a TSV genome file of chromosome names and their lengths
        #[arg(required = true)]
        seqlens: PathBuf,

        /// fraction of sites to mask
        #[arg(long, default_value_t = 0.1)]
        masked_fraction: f64,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn run() -> Result<(), GSmoothError> {
    let cli = Cli::parse();
    let result = match &cli.command {
        Some(Commands::Smooth {
            seqlens,
            trackfile,
            window_size,
            min_valid_fraction,
            output,
        }) => gsmooth_smooth(
            trackfile,
            seqlens,
            *window_size,
            *min_valid_fraction,
            output.as_ref(),
        ),
        #[cfg(feature = "dev-commands")]
        Some(Commands::RandomSeries {
            seqlens,
            masked_fraction,
            output,
        }) => gsmooth_random_series(seqlens, *masked_fraction, output.as_ref()),
        None => {
            println!("{}\n", INFO);
            std::process::exit(1);
        }
    };
    let output = result?;
    if !output.report.is_empty() {
        eprintln!("{}", output.report);
    }
    Ok(())
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
