pub mod config;
pub mod control;
pub mod error;
pub mod generators;
pub mod io_utils;
pub mod palindromic;
pub mod primality;
pub mod results;
pub mod search;
pub mod solver;

pub use config::SolverConfig;
pub use control::SearchControl;
pub use error::{ProblemError, SolveResult};
pub use generators::{mersenne_number, palindrome_from_half, pattern_number, repunit, PalindromeTier};
pub use palindromic::{find_palindromic_prime, PalindromeSearchConfig};
pub use primality::{
    FixedWitnesses, PrimalityConfig, PrimalityMode, PrimalityOracle, RandomWitnesses, WitnessSource,
};
pub use results::{BatchReport, ErrorReport, ProblemResult, Response};
pub use search::{
    find_goldbach_pair, find_interval_primes, find_mersenne_primes, find_pattern_prime,
    find_repunit_primes, perfect_number, SearchRange,
};
pub use solver::{ProblemRequest, Solver};
