use clap::{Parser, Subcommand};
use prime_problems::{io_utils, ProblemRequest, Response, SolveResult, Solver, SolverConfig};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "prime-problems")]
#[command(about = "Answer number-theory queries over arbitrary-precision integers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Configuration file (JSON) - CLI options override its values")]
    config: Option<String>,

    #[arg(long, global = true, help = "Seed for Miller-Rabin witnesses (reproducible runs)")]
    seed: Option<u64>,

    #[arg(long, global = true, help = "Miller-Rabin rounds")]
    rounds: Option<u32>,

    #[arg(long, global = true, help = "Primality mode: auto, trial_division, miller_rabin")]
    mode: Option<String>,

    #[arg(long, global = true, help = "Per-request timeout in seconds")]
    timeout: Option<u64>,

    #[arg(long, global = true, help = "Worker threads (default: all cores)")]
    threads: Option<usize>,

    #[arg(short, long, global = true, help = "Output file for results (JSON)")]
    output: Option<String>,

    #[arg(long, global = true, default_value = "text", help = "Log format: text or json")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Test a single number for primality")]
    IsPrime {
        #[arg(help = "The number to test")]
        number: String,
    },

    #[command(about = "Find the first prime of the form 123...n...321")]
    Pattern {
        #[arg(long, default_value = "1000")]
        n_lower: u32,

        #[arg(long, default_value = "3000")]
        n_upper: u32,
    },

    #[command(about = "List repunit primes R_N with N prime")]
    Repunit {
        #[arg(long, default_value = "2")]
        n_lower: u32,

        #[arg(long, default_value = "1040")]
        n_upper: u32,
    },

    #[command(about = "List Mersenne primes 2^p - 1 for odd prime p")]
    Mersenne {
        #[arg(long, default_value = "2201")]
        p_lower: u32,

        #[arg(long, default_value = "2299")]
        p_upper: u32,
    },

    #[command(about = "Find primes between p1^2 and p2^2")]
    Interval {
        p1: u64,

        p2: u64,

        #[arg(long, default_value = "4")]
        max_primes: usize,
    },

    #[command(about = "Find the smallest palindromic prime with at least N digits")]
    Palindrome {
        #[arg(long, default_value = "10")]
        min_digits: usize,

        #[arg(long, help = "Digit ceiling (overrides config file)")]
        max_digits: Option<usize>,
    },

    #[command(about = "Find the first Goldbach pair for an even number")]
    Goldbach {
        #[arg(default_value = "20")]
        even_n: u64,
    },

    #[command(about = "Build the perfect number for a Mersenne exponent")]
    Perfect {
        #[arg(default_value = "5")]
        p: u32,
    },

    #[command(about = "Solve a JSON array of requests concurrently")]
    Batch {
        #[arg(help = "Path to the requests file")]
        requests_file: String,
    },

    #[command(about = "Generate a default configuration file")]
    InitConfig {
        #[arg(help = "Output file path (default: solver_config.json)")]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_format);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

/// Returns whether every request was answered.
fn run(cli: Cli) -> SolveResult<bool> {
    let config = build_config(&cli)?;
    let output = cli.output.clone();

    let request = match cli.command {
        Commands::InitConfig { output } => {
            init_config_file(output.as_deref().unwrap_or("solver_config.json"))?;
            return Ok(true);
        }
        Commands::Batch { requests_file } => {
            let requests: Vec<ProblemRequest> = io_utils::load_json(Path::new(&requests_file))?;
            let solver = Solver::new(config)?;
            tracing::info!(requests = requests.len(), threads = solver.threads(), "solving batch");

            let report = solver.solve_batch(&requests);
            let all_solved = report
                .responses
                .iter()
                .all(|r| matches!(r, Response::Solved(_)));
            emit(&report, output.as_deref())?;
            return Ok(all_solved);
        }
        Commands::IsPrime { number } => ProblemRequest::IsPrime { n: number },
        Commands::Pattern { n_lower, n_upper } => ProblemRequest::PatternPrime { n_lower, n_upper },
        Commands::Repunit { n_lower, n_upper } => ProblemRequest::RepunitPrimes { n_lower, n_upper },
        Commands::Mersenne { p_lower, p_upper } => ProblemRequest::MersennePrimes { p_lower, p_upper },
        Commands::Interval { p1, p2, max_primes } => {
            ProblemRequest::IntervalDensity { p1, p2, max_primes }
        }
        Commands::Palindrome {
            min_digits,
            max_digits,
        } => ProblemRequest::PalindromicPrime {
            min_digits,
            max_digits,
        },
        Commands::Goldbach { even_n } => ProblemRequest::Goldbach { even_n },
        Commands::Perfect { p } => ProblemRequest::PerfectNumber { p },
    };

    let solver = Solver::new(config)?;
    let start_time = Instant::now();
    let response = Response::from(solver.solve(&request));
    tracing::debug!(elapsed_secs = start_time.elapsed().as_secs_f64(), "request finished");

    let solved = matches!(response, Response::Solved(_));
    emit(&response, output.as_deref())?;
    Ok(solved)
}

fn build_config(cli: &Cli) -> SolveResult<SolverConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!(path = %path, "loading configuration");
            SolverConfig::load_from_file(Path::new(path))?
        }
        None => SolverConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(rounds) = cli.rounds {
        config.primality.rounds = rounds;
    }
    if let Some(mode) = &cli.mode {
        config.primality.mode = mode.parse()?;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = Some(timeout);
    }
    if let Some(threads) = cli.threads {
        config.threads = Some(threads);
    }

    config.validate()?;
    Ok(config)
}

fn emit<T: serde::Serialize>(value: &T, output: Option<&str>) -> SolveResult<()> {
    match output {
        Some(path) => {
            io_utils::save_json(value, Path::new(path))?;
            tracing::info!(path, "results saved");
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn init_config_file(output: &str) -> SolveResult<()> {
    let config = SolverConfig::default();
    config.save_to_file(Path::new(output))?;

    println!("Default configuration file created: {}", output);
    println!("\nConfiguration:");
    println!("  Primality mode:        {:?}", config.primality.mode);
    println!("  Trial division below:  {}", config.primality.trial_division_limit);
    println!("  Miller-Rabin rounds:   {}", config.primality.rounds);
    println!("  Max palindrome digits: {}", config.max_palindrome_digits);
    println!("\nYou can now edit this file and use:");
    println!("  prime-problems --config {} <command>", output);
    Ok(())
}
