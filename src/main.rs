use std::error::Error;
use std::io::{self, BufWriter, Write};

use clap::Parser;
use log::Level;

use wavelign::fasta::read_fasta_file;
use wavelign::logger;
use wavelign::mapper::{self, MappingParameters};

#[derive(Parser, Debug)]
#[command(long_about = None)]
struct Args {
    /// Path to query FASTA (may be gzip-compressed)
    query_path: String,

    /// Path to target FASTA (may be gzip-compressed)
    target_path: String,

    /// Window length for base-level segment alignments
    #[arg(short = 's', long, default_value_t = 256)]
    segment_length: usize,

    /// Minimum identity required to emit a record
    #[arg(short = 'i', long, default_value_t = 0.0)]
    min_identity: f64,

    /// Banding: minimum wavefront length before adaptive reduction (0 disables)
    #[arg(short = 'l', long, default_value_t = 0)]
    min_wavefront_length: i32,

    /// Banding: maximum distance from the best diagonal (0 disables)
    #[arg(short = 'd', long, default_value_t = 0)]
    max_distance_threshold: i32,

    /// Align every window pair instead of running the guided search
    #[arg(long, default_value_t = false)]
    full_scan: bool,

    /// Verbose output
    #[arg(short = 'v', default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logger::init(if args.verbose { Level::Debug } else { Level::Info })?;

    let queries = read_fasta_file(&args.query_path)?;
    let targets = read_fasta_file(&args.target_path)?;

    let parameters = MappingParameters {
        segment_length: args.segment_length,
        min_identity: args.min_identity,
        min_wavefront_length: args.min_wavefront_length,
        max_distance_threshold: args.max_distance_threshold,
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for query in &queries {
        for target in &targets {
            if args.full_scan {
                mapper::full_scan(query, target, &parameters, &mut out)?;
            } else {
                mapper::map_pair(query, target, &parameters, &mut out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Args::command().debug_assert()
}
