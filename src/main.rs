use clap::{Parser, Subcommand};
use fpbits::{
    bitops::{
        Containment, hex_contains, hex_intersect_popcount, hex_popcount, hex_tanimoto,
        hex_union_popcount,
    },
    error::{HexError, StrategyError},
    numerics::{AlignedBlock, PopcountStrategy},
    statistics::Stats,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use std::{hint::black_box, process::ExitCode, time::Instant};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Similarity metrics over byte and hex fingerprints
#[derive(Parser, Debug)]
#[command(name = "fpbits")]
#[command(about = "Popcount, Tanimoto and subset tests over molecular fingerprints", long_about = None)]
struct Args {
    /// Print reports as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count the bits set in a hex fingerprint
    Popcount {
        /// Hex fingerprint (0-9, A-F, a-f)
        fingerprint: String,
    },

    /// Compare two hex fingerprints of the same length
    Compare {
        /// Query fingerprint
        query: String,
        /// Target fingerprint
        target: String,
    },

    /// Time a popcount strategy against the scalar tables on random fingerprints
    Bench {
        /// Fingerprint size in bytes
        #[arg(long, default_value_t = 128)]
        bytes: usize,

        /// Number of fingerprint pairs to process
        #[arg(long, default_value_t = 100_000)]
        iterations: usize,

        /// Popcount strategy to time: auto, scalar or ssse3
        #[arg(long, default_value = "auto")]
        strategy: PopcountStrategy,

        /// Seed for the random fingerprints
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("{which} fingerprint: {source}")]
    Hex {
        which: &'static str,
        #[source]
        source: HexError,
    },

    #[error("fingerprints have different lengths ({query} vs {target})")]
    LengthMismatch { query: usize, target: usize },

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error("{strategy} counted {got} bits, scalar counted {expected}")]
    Disagreement {
        strategy: PopcountStrategy,
        got: u64,
        expected: u64,
    },

    #[error("could not serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Debug)]
struct PopcountReport {
    length: usize,
    popcount: u64,
}

#[derive(Serialize, Debug)]
struct CompareReport {
    length: usize,
    query_popcount: u64,
    target_popcount: u64,
    intersect_popcount: u64,
    union_popcount: u64,
    tanimoto: f64,
    query_in_target: bool,
    target_in_query: bool,
}

/// Benchmark configuration, echoed back in the report.
#[derive(Serialize, Debug, Clone, Copy)]
struct BenchParams {
    bytes: usize,
    iterations: usize,
    strategy: PopcountStrategy,
    seed: u64,
}

#[derive(Serialize, Debug)]
struct BenchReport {
    params: BenchParams,
    strategy_stats: Stats,
    scalar_stats: Stats,
    speedup: f64,
}

fn hex_arg<'a>(which: &'static str, fp: &'a str) -> Result<&'a [u8], CliError> {
    let bytes = fp.as_bytes();
    // validate once up front so every later call is known to succeed
    hex_popcount(bytes).map_err(|source| CliError::Hex { which, source })?;
    Ok(bytes)
}

fn run_popcount(fingerprint: &str) -> Result<PopcountReport, CliError> {
    let fp = fingerprint.as_bytes();
    let popcount = hex_popcount(fp).map_err(|source| CliError::Hex {
        which: "input",
        source,
    })?;
    Ok(PopcountReport {
        length: fp.len(),
        popcount,
    })
}

fn run_compare(query: &str, target: &str) -> Result<CompareReport, CliError> {
    let q = hex_arg("query", query)?;
    let t = hex_arg("target", target)?;
    if q.len() != t.len() {
        return Err(CliError::LengthMismatch {
            query: q.len(),
            target: t.len(),
        });
    }

    let in_both = |source| CliError::Hex {
        which: "query or target",
        source,
    };
    Ok(CompareReport {
        length: q.len(),
        query_popcount: hex_popcount(q).map_err(in_both)?,
        target_popcount: hex_popcount(t).map_err(in_both)?,
        intersect_popcount: hex_intersect_popcount(q, t).map_err(in_both)?,
        union_popcount: hex_union_popcount(q, t).map_err(in_both)?,
        tanimoto: hex_tanimoto(q, t).map_err(in_both)?,
        query_in_target: hex_contains(q, t) == Containment::Contained,
        target_in_query: hex_contains(t, q) == Containment::Contained,
    })
}

fn random_fingerprint(rng: &mut StdRng, num_bytes: usize) -> Vec<AlignedBlock> {
    let mut bytes = vec![0u8; num_bytes];
    rng.fill(&mut bytes[..]);
    AlignedBlock::allocate_padded(&bytes)
}

fn time_strategy(
    strategy: PopcountStrategy,
    pairs: &[(Vec<AlignedBlock>, Vec<AlignedBlock>)],
    num_bytes: usize,
) -> Stats {
    let mut stats = Stats::new();
    let start_time = Instant::now();
    for (fp1, fp2) in tqdm::tqdm(pairs.iter()) {
        let bits = black_box(strategy.popcount(black_box(fp1)));
        stats.bump_call(num_bytes, bits);
        let bits = black_box(strategy.intersect_popcount(black_box(fp1), black_box(fp2)));
        stats.bump_call(num_bytes, bits);
    }
    stats.add_elapsed(start_time.elapsed());
    stats
}

fn run_bench(params: BenchParams) -> Result<BenchReport, CliError> {
    let strategy = params.strategy.checked()?;

    info!(
        bytes = params.bytes,
        iterations = params.iterations,
        %strategy,
        "generating random fingerprints"
    );
    let mut rng = StdRng::seed_from_u64(params.seed);
    let pairs: Vec<_> = (0..params.iterations)
        .map(|_| {
            (
                random_fingerprint(&mut rng, params.bytes),
                random_fingerprint(&mut rng, params.bytes),
            )
        })
        .collect();
    let padded_bytes = pairs
        .first()
        .map_or(0, |(fp, _)| AlignedBlock::as_bytes(fp).len());
    if padded_bytes != params.bytes {
        warn!(
            requested = params.bytes,
            padded = padded_bytes,
            "fingerprint size padded to whole 16-byte blocks"
        );
    }

    info!(%strategy, "timing");
    let strategy_stats = time_strategy(strategy, &pairs, padded_bytes);
    info!("timing scalar reference");
    let scalar_stats = time_strategy(PopcountStrategy::Scalar, &pairs, padded_bytes);

    if strategy_stats.get_bits_counted() != scalar_stats.get_bits_counted() {
        return Err(CliError::Disagreement {
            strategy,
            got: strategy_stats.get_bits_counted(),
            expected: scalar_stats.get_bits_counted(),
        });
    }

    let speedup = if strategy_stats.get_elapsed().is_zero() {
        0.0
    } else {
        scalar_stats.get_elapsed().as_secs_f64() / strategy_stats.get_elapsed().as_secs_f64()
    };

    Ok(BenchReport {
        params: BenchParams { strategy, ..params },
        strategy_stats,
        scalar_stats,
        speedup,
    })
}

fn print_text_bench(report: &BenchReport) {
    let mb = |stats: &Stats| stats.throughput() / (1024.0 * 1024.0);
    println!(
        "{} popcount: {} calls in {:.3}s ({:.2} MiB/s)",
        report.params.strategy,
        report.strategy_stats.get_calls(),
        report.strategy_stats.get_elapsed().as_secs_f64(),
        mb(&report.strategy_stats)
    );
    println!(
        "scalar popcount: {} calls in {:.3}s ({:.2} MiB/s)",
        report.scalar_stats.get_calls(),
        report.scalar_stats.get_elapsed().as_secs_f64(),
        mb(&report.scalar_stats)
    );
    println!(
        "Checksum: {} bits, speedup {:.2}x",
        report.strategy_stats.get_bits_counted(),
        report.speedup
    );
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Popcount { fingerprint } => {
            let report = run_popcount(&fingerprint)?;
            if args.json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                println!("{}", report.popcount);
            }
        }
        Command::Compare { query, target } => {
            let report = run_compare(&query, &target)?;
            if args.json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                println!("popcount      {} / {}", report.query_popcount, report.target_popcount);
                println!("intersection  {}", report.intersect_popcount);
                println!("union         {}", report.union_popcount);
                println!("tanimoto      {:.6}", report.tanimoto);
                println!("query in target  {}", report.query_in_target);
                println!("target in query  {}", report.target_in_query);
            }
        }
        Command::Bench {
            bytes,
            iterations,
            strategy,
            seed,
        } => {
            let report = run_bench(BenchParams {
                bytes,
                iterations,
                strategy,
                seed,
            })?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_text_bench(&report);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
