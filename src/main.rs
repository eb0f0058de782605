use std::io::Read;
use std::path::PathBuf;

use clap::Parser;

use hamcycle::graph::parse_edge_list;
use hamcycle::oracle::{render_verdict, HamiltonicityOracle, OracleConfig, DEFAULT_FIELD_FACTOR};
use hamcycle::validate::{cross_check, Agreement, EXACT_MAX_VERTICES};

/// Decide whether a bipartite graph has a Hamiltonian cycle (Björklund's algebraic sieve).
///
/// Input: `n K` followed by `K` edges `a b`, where `a` names a vertex of the first part
/// and `b` a vertex of the second. Prints `yes` or `no`.
#[derive(Parser, Debug)]
#[command(name = "hamcycle")]
#[command(version)]
struct Cli {
    /// Edge-list file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Deterministic seed for the labelings
    #[arg(long)]
    seed: Option<u64>,

    /// Number of independent trials (default: vertex count)
    #[arg(long)]
    trials: Option<usize>,

    /// Constant c in the field-size rule 2^k > c*n
    #[arg(long, default_value_t = DEFAULT_FIELD_FACTOR)]
    field_factor: usize,

    /// Evaluate subsets on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Skip the edge-count and degree prechecks
    #[arg(long)]
    no_prechecks: bool,

    /// Cross-check the verdict with an exact search (n <= 20)
    #[arg(long)]
    verify: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let text = match read_input(cli.input.as_ref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read input: {e}");
            std::process::exit(2);
        }
    };

    let graph = match parse_edge_list(&text) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Invalid input: {e}");
            std::process::exit(2);
        }
    };
    log::info!(
        "read graph: n={}, {} edges",
        graph.n(),
        graph.edge_count()
    );

    let oracle = HamiltonicityOracle::new(OracleConfig {
        trials: cli.trials,
        field_factor: cli.field_factor,
        seed: cli.seed,
        parallel: !cli.sequential,
        prechecks: !cli.no_prechecks,
    });

    let decision = match oracle.decide(&graph) {
        Ok(decision) => decision,
        Err(e) if e.is_invariant_violation() => {
            eprintln!("Internal error: {e}");
            std::process::exit(70);
        }
        Err(e) => {
            eprintln!("Cannot decide: {e}");
            std::process::exit(2);
        }
    };
    log::info!("{decision:?}");

    println!("{}", render_verdict(decision.is_hamiltonian()));

    if cli.verify {
        if graph.n() > EXACT_MAX_VERTICES {
            log::warn!(
                "--verify skipped: exact search supports n <= {EXACT_MAX_VERTICES}, got {}",
                graph.n()
            );
            return;
        }
        match cross_check(&graph, &decision) {
            Ok(Agreement::Agree) => log::info!("exact search agrees"),
            Ok(Agreement::FalseNegative) => {
                log::warn!("exact search found a Hamiltonian cycle the trials missed");
            }
            Ok(Agreement::FalsePositive) => {
                eprintln!("Verification FAILED: exact search finds no Hamiltonian cycle");
                std::process::exit(3);
            }
            Err(e) => {
                eprintln!("Verification error: {e}");
                std::process::exit(2);
            }
        }
    }
}

fn read_input(path: Option<&PathBuf>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
